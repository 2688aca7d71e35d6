use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::{
    assets::decode::decode_image_resized,
    compile::theme,
    foundation::error::{RewindError, RewindResult},
    model::input::RecapInput,
};

/// Logo location, relative to the asset root.
pub const LOGO_PATH: &str = "public/logo.webp";
/// Directory that achievement icon paths are relative to.
pub const PUBLIC_DIR: &str = "public";

#[derive(Clone, Debug)]
/// Prepared raster image in premultiplied RGBA8 form.
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Index of a prepared image inside [`RecapAssets`].
pub struct ImageId(pub(crate) u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Outcome of preparing one achievement icon.
pub enum AchievementSlot {
    /// Icon decoded and resized.
    Icon(ImageId),
    /// The referenced file does not exist.
    Missing,
    /// The path was invalid or the file could not be decoded.
    Broken,
}

#[derive(Clone, Debug, Default)]
/// Images referenced by one recap card, decoded and resized up front.
///
/// Preparation never fails: every problem is logged and turns into a missing logo or a
/// placeholder slot, so compilation and rendering stay IO-free.
pub struct RecapAssets {
    images: Vec<PreparedImage>,
    logo: Option<ImageId>,
    achievements: Vec<AchievementSlot>,
}

impl RecapAssets {
    /// No logo and no achievements.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the logo and the first six achievement icons below `root`.
    #[tracing::instrument(skip(input))]
    pub fn prepare(input: &RecapInput, root: &Path) -> Self {
        let mut out = Self::default();

        let logo_path = root.join(LOGO_PATH);
        if logo_path.is_file() {
            match load_resized(&logo_path, theme::LOGO_SIZE) {
                Ok(img) => out.logo = Some(out.insert(img)),
                Err(e) => tracing::warn!("skipping logo '{}': {e}", logo_path.display()),
            }
        } else {
            tracing::debug!("no logo at '{}'", logo_path.display());
        }

        let entries = input.achievements().iter().take(theme::MAX_ACHIEVEMENTS);
        for (i, entry) in entries.enumerate() {
            let slot = match entry.image.as_deref() {
                Some(image) => out.prepare_achievement(root, image),
                None => {
                    tracing::warn!("achievement {i} has no image path");
                    AchievementSlot::Broken
                }
            };
            out.achievements.push(slot);
        }

        out
    }

    /// Add an image and return its id.
    pub fn insert(&mut self, image: PreparedImage) -> ImageId {
        let id = ImageId(self.images.len() as u32);
        self.images.push(image);
        id
    }

    /// Append an achievement slot.
    pub fn push_achievement(&mut self, slot: AchievementSlot) {
        self.achievements.push(slot);
    }

    /// Use `id` as the header logo.
    pub fn set_logo(&mut self, id: ImageId) {
        self.logo = Some(id);
    }

    /// Header logo, if one was loaded.
    pub fn logo(&self) -> Option<ImageId> {
        self.logo
    }

    /// Achievement slots in display order.
    pub fn achievements(&self) -> &[AchievementSlot] {
        &self.achievements
    }

    /// Lookup a prepared image.
    pub fn get(&self, id: ImageId) -> RewindResult<&PreparedImage> {
        self.images
            .get(id.0 as usize)
            .ok_or_else(|| RewindError::asset(format!("unknown ImageId {}", id.0)))
    }

    fn prepare_achievement(&mut self, root: &Path, image: &str) -> AchievementSlot {
        let path = match achievement_path(root, image) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!("achievement icon '{image}': {e}");
                return AchievementSlot::Broken;
            }
        };
        if !path.exists() {
            tracing::debug!("achievement icon '{}' not found", path.display());
            return AchievementSlot::Missing;
        }

        match load_resized(&path, theme::ACHIEVEMENT_ICON_SIZE) {
            Ok(img) => AchievementSlot::Icon(self.insert(img)),
            Err(e) => {
                tracing::warn!("achievement icon '{}': {e}", path.display());
                AchievementSlot::Broken
            }
        }
    }
}

fn load_resized(path: &Path, size: u32) -> RewindResult<PreparedImage> {
    let bytes = std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    decode_image_resized(&bytes, size, size)
}

/// Resolve an achievement `image` value to a file below `<root>/public`.
///
/// One leading `/` is stripped; the rest must be a relative path without `..`.
pub fn achievement_path(root: &Path, image: &str) -> RewindResult<PathBuf> {
    let rel = image.strip_prefix('/').unwrap_or(image);
    let norm = normalize_rel_path(rel)?;
    Ok(root.join(PUBLIC_DIR).join(Path::new(&norm)))
}

/// Normalize and validate asset-root-relative paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> RewindResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(RewindError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(RewindError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(RewindError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(RewindError::validation(
            "asset path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
