use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    assets::store::RecapAssets,
    compile::recap::compile_recap,
    foundation::error::{RewindError, RewindResult},
    model::input::RecapInput,
    render::backend::{FrameRGBA, RenderBackend},
    render::cpu::CpuRenderer,
    text::fonts::{FontBook, FontOpts},
};

#[derive(Clone, Debug)]
/// Options for rendering one recap card.
pub struct RecapOpts {
    /// Asset root: bundled fonts, the logo and achievement icons are resolved below it.
    pub root: PathBuf,
    /// Font file locations.
    pub fonts: FontOpts,
}

impl Default for RecapOpts {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            fonts: FontOpts::default(),
        }
    }
}

impl RecapOpts {
    /// Options rooted at `root` with font overrides read from the environment.
    pub fn from_env(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            fonts: FontOpts::from_env(),
        }
    }
}

/// Prepare + compile + render one recap card.
///
/// Pipeline:
/// 1. [`FontBook::load`] and [`RecapAssets::prepare`] (all file IO happens here)
/// 2. [`compile_recap`](crate::compile_recap)
/// 3. [`RenderBackend::render_plan`] on a [`CpuRenderer`]
///
/// Missing fonts and images degrade the card instead of failing. Returns a [`FrameRGBA`]
/// containing **premultiplied** RGBA8 pixels.
#[tracing::instrument(skip_all, fields(root = %opts.root.display()))]
pub fn render_recap(input: &RecapInput, opts: &RecapOpts) -> RewindResult<FrameRGBA> {
    let fonts = FontBook::load(&opts.root, &opts.fonts);
    let assets = RecapAssets::prepare(input, &opts.root);

    let mut renderer = CpuRenderer::new();
    let plan = compile_recap(input, &fonts, renderer.text_engine_mut(), &assets)?;
    tracing::debug!(ops = plan.ops.len(), "compiled recap plan");
    renderer.render_plan(&plan, &fonts, &assets)
}

/// Render a recap card and write it to `out`.
///
/// The image format follows the extension of `out`; missing parent directories are created.
#[tracing::instrument(skip(input, opts))]
pub fn render_recap_to_file(input: &RecapInput, out: &Path, opts: &RecapOpts) -> RewindResult<()> {
    let frame = render_recap(input, opts)?;
    save_frame(&frame, out)?;
    tracing::info!("wrote recap card to '{}'", out.display());
    Ok(())
}

/// Encode `frame` as opaque RGB8 in the format implied by the extension of `path`.
pub fn save_frame(frame: &FrameRGBA, path: &Path) -> RewindResult<()> {
    let format = image::ImageFormat::from_path(path).map_err(|e| {
        RewindError::render(format!(
            "cannot pick an image format for '{}': {e}",
            path.display()
        ))
    })?;

    let rgba = frame.to_straight_rgba8();
    let rgb = rgba
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect::<Vec<u8>>();
    let img = image::RgbImage::from_raw(frame.width, frame.height, rgb)
        .ok_or_else(|| RewindError::render("frame byte len mismatch"))?;

    ensure_parent_dir(path)?;
    img.save_with_format(path, format).map_err(|e| {
        RewindError::render(format!("failed to write '{}': {e}", path.display()))
    })
}

/// Create the parent directory of `path` when it does not exist yet.
pub fn ensure_parent_dir(path: &Path) -> RewindResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("failed to create output directory '{}'", parent.display())
        })?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
