use crate::{
    assets::store::RecapAssets, compile::plan::RecapPlan, foundation::error::RewindResult,
    text::fonts::FontBook,
};

/// A rendered frame as RGBA8 pixels.
///
/// Frames are **premultiplied alpha** by default. The `premultiplied` flag is included to make
/// this explicit at API boundaries.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel at `(x, y)` as `[r, g, b, a]`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Straight-alpha copy of the pixel data.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if self.premultiplied {
            unpremultiply_rgba8_in_place(&mut out);
        }
        out
    }
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

/// A renderer that can execute a compiled [`RecapPlan`] into a [`FrameRGBA`].
///
/// Most users do not call [`RenderBackend::render_plan`] directly; prefer
/// [`crate::render_recap`], which handles preparation and compilation.
pub trait RenderBackend {
    /// Execute `plan` against prepared fonts and images and read back the final frame.
    fn render_plan(
        &mut self,
        plan: &RecapPlan,
        fonts: &FontBook,
        assets: &RecapAssets,
    ) -> RewindResult<FrameRGBA>;
}
