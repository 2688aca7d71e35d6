use std::collections::HashMap;

use crate::{
    foundation::core::Rgba8,
    foundation::error::{RewindError, RewindResult},
    text::fonts::{FaceId, FontBook, FontWeight},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl From<Rgba8> for TextBrushRgba8 {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// Register `bytes` in a throwaway context and return the primary family name.
///
/// `None` means Parley could not read any face from the bytes.
pub(crate) fn probe_family_name(bytes: &[u8]) -> Option<String> {
    let mut font_ctx = parley::FontContext::default();
    register_family(&mut font_ctx, bytes).ok()
}

fn register_family(font_ctx: &mut parley::FontContext, bytes: &[u8]) -> RewindResult<String> {
    let families = font_ctx
        .collection
        .register_fonts(parley::fontique::Blob::from(bytes.to_vec()), None);
    let family_id = families
        .first()
        .map(|(id, _)| *id)
        .ok_or_else(|| RewindError::font("no font families registered from font bytes"))?;

    Ok(font_ctx
        .collection
        .family_name(family_id)
        .ok_or_else(|| RewindError::font("registered font family has no name"))?
        .to_string())
}

struct FaceContext {
    font_ctx: parley::FontContext,
    family_name: String,
}

/// Stateful helper for shaping text with the faces of a [`FontBook`].
///
/// Every face gets its own Parley font context holding only that face, so a layout can never
/// silently fall back to a different face. Shaping and bidi reordering of right-to-left text are
/// done by Parley.
pub struct TextLayoutEngine {
    faces: HashMap<FaceId, Option<FaceContext>>,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct a new layout engine with fresh Parley contexts.
    pub fn new() -> Self {
        Self {
            faces: HashMap::new(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    /// Shape and lay out a single unwrapped line of text.
    ///
    /// The first line's baseline sits at the font ascent below the layout origin.
    pub fn layout(
        &mut self,
        fonts: &FontBook,
        face: FaceId,
        text: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> RewindResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(RewindError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let font_face = fonts.get(face)?;
        if !self.faces.contains_key(&face) {
            let mut font_ctx = parley::FontContext::default();
            let registered = match register_family(&mut font_ctx, font_face.bytes()) {
                Ok(family_name) => Some(FaceContext {
                    font_ctx,
                    family_name,
                }),
                Err(e) => {
                    tracing::warn!(source = ?font_face.source, "cannot register font: {e}");
                    None
                }
            };
            self.faces.insert(face, registered);
        }
        let Some(Some(ctx)) = self.faces.get_mut(&face) else {
            return Err(RewindError::font(format!(
                "font face {} is not usable for layout",
                face.0
            )));
        };

        let weight = match font_face.weight {
            FontWeight::Regular => parley::style::FontWeight::NORMAL,
            FontWeight::Bold => parley::style::FontWeight::BOLD,
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut ctx.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(ctx.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(weight));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }

    /// Advance width of `text`, trailing whitespace included.
    pub fn measure(
        &mut self,
        fonts: &FontBook,
        face: FaceId,
        text: &str,
        size_px: f32,
    ) -> RewindResult<f32> {
        let layout = self.layout(fonts, face, text, size_px, TextBrushRgba8::default())?;
        Ok(layout.full_width())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/layout.rs"]
mod tests;
