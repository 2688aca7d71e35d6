use crate::foundation::error::{RewindError, RewindResult};

pub use kurbo::{Point, Rect};

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a validated canvas with non-zero dimensions that fit the CPU raster limits.
    pub fn new(width: u32, height: u32) -> RewindResult<Self> {
        if width == 0 || height == 0 {
            return Err(RewindError::validation("canvas width/height must be > 0"));
        }
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(RewindError::validation(
                "canvas width/height must fit in u16",
            ));
        }
        Ok(Self { width, height })
    }

    /// Full-canvas rectangle anchored at the origin.
    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }
}

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color with explicit alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Blend `self` towards `other` by `mask/255`, rounding to nearest.
    ///
    /// `mask == 0` returns `self`, `mask == 255` returns `other`.
    pub fn mix(self, other: Self, mask: u8) -> Self {
        fn channel(a: u8, b: u8, m: u8) -> u8 {
            let m = u32::from(m);
            ((u32::from(a) * (255 - m) + u32::from(b) * m + 127) / 255) as u8
        }

        Self {
            r: channel(self.r, other.r, mask),
            g: channel(self.g, other.g, mask),
            b: channel(self.b, other.b, mask),
            a: channel(self.a, other.a, mask),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
