//! Batch PNG to WEBP conversion for a flat directory of images.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{RewindError, RewindResult};

/// Directory converted by `rewind convert` when no `--dir` is given.
pub const DEFAULT_DEVLOG_DIR: &str = "/home/ubuntu/icpchue/next-app/public/devlog";

/// Outcome of [`convert_dir`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConvertReport {
    /// `(png, webp)` pairs that were converted and whose source was deleted.
    pub converted: Vec<(PathBuf, PathBuf)>,
    /// Files that could not be converted, with the error message.
    pub failed: Vec<(PathBuf, String)>,
}

impl ConvertReport {
    /// Return `true` when every candidate file was converted.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Convert every `*.png` regular file directly inside `dir` to lossless WEBP and delete the PNG.
///
/// Files are processed in file-name order. A failure on one file is logged and recorded in the
/// report; only failing to list `dir` is an error.
#[tracing::instrument]
pub fn convert_dir(dir: &Path) -> RewindResult<ConvertReport> {
    tracing::info!("Scanning {}...", dir.display());

    let mut pngs = Vec::new();
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to list directory '{}'", dir.display()))?;
    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to list directory '{}'", dir.display()))?;
        let path = entry.path();
        if is_png_name(&path) && path.is_file() {
            pngs.push(path);
        }
    }
    pngs.sort();

    let mut report = ConvertReport::default();
    for png in pngs {
        let name = file_name(&png);
        match convert_png_to_webp(&png) {
            Ok(webp) => {
                report.converted.push((png, webp));
            }
            Err(e) => {
                tracing::warn!("Error converting {name}: {e}");
                report.failed.push((png, e.to_string()));
            }
        }
    }

    tracing::info!("Done.");
    Ok(report)
}

/// Convert one PNG file to a lossless WEBP next to it, then delete the PNG.
///
/// The WEBP is encoded in memory first, so a decode or encode failure leaves the directory
/// untouched. Returns the path of the written WEBP.
pub fn convert_png_to_webp(png: &Path) -> RewindResult<PathBuf> {
    let webp = webp_path_for(png);

    let bytes =
        std::fs::read(png).with_context(|| format!("failed to read '{}'", png.display()))?;
    let img = image::load_from_memory(&bytes)
        .map_err(|e| RewindError::asset(format!("image decode failed: {e}")))?;
    let encoded = encode_webp_lossless(&img)?;

    std::fs::write(&webp, encoded)
        .with_context(|| format!("failed to write '{}'", webp.display()))?;
    tracing::info!("Converted {} to {}", file_name(png), file_name(&webp));

    std::fs::remove_file(png).with_context(|| format!("failed to delete '{}'", png.display()))?;
    tracing::info!("Deleted {}", file_name(png));
    Ok(webp)
}

/// Same path with the extension replaced by `webp`.
pub fn webp_path_for(png: &Path) -> PathBuf {
    png.with_extension("webp")
}

fn encode_webp_lossless(img: &image::DynamicImage) -> RewindResult<Vec<u8>> {
    let mut out = Vec::new();
    let encoder = image::codecs::webp::WebPEncoder::new_lossless(&mut out);
    let res = if img.color().has_alpha() {
        let rgba = img.to_rgba8();
        encoder.encode(
            rgba.as_raw(),
            rgba.width(),
            rgba.height(),
            image::ExtendedColorType::Rgba8,
        )
    } else {
        let rgb = img.to_rgb8();
        encoder.encode(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            image::ExtendedColorType::Rgb8,
        )
    };
    res.map_err(|e| RewindError::render(format!("webp encode failed: {e}")))?;
    Ok(out)
}

fn is_png_name(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(".png"))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
#[path = "../../tests/unit/convert/webp.rs"]
mod tests;
