use crate::{
    assets::store::ImageId,
    foundation::core::{Canvas, Point, Rect, Rgba8},
    text::fonts::FaceId,
};

#[derive(Clone, Debug)]
/// Backend-agnostic render plan for one recap card.
///
/// Ops are executed in order, each one drawn over the result of the previous ones. A plan holds
/// no IO handles: images and fonts are referenced by id into the prepared stores.
pub struct RecapPlan {
    /// Output canvas.
    pub canvas: Canvas,
    /// Ordered draw operations.
    pub ops: Vec<DrawOp>,
}

impl RecapPlan {
    /// Iterate over the text ops in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &TextOp> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(t) => Some(t),
            _ => None,
        })
    }

    /// First text op whose content equals `text`.
    pub fn find_text(&self, text: &str) -> Option<&TextOp> {
        self.texts().find(|t| t.text == text)
    }
}

#[derive(Clone, Debug, PartialEq)]
/// A single drawing operation in a [`RecapPlan`].
pub enum DrawOp {
    /// Fill `rect` row by row, blending from `top` to `bottom`.
    ///
    /// Row `y` uses mask `floor(255 * y / height)`.
    VerticalGradient {
        /// Area to fill.
        rect: Rect,
        /// Color of the first row.
        top: Rgba8,
        /// Color approached by the last row.
        bottom: Rgba8,
    },
    /// Rounded rectangle with optional fill, outline and glow.
    RoundedRect(RoundedRectOp),
    /// Straight stroked line.
    Line {
        /// Start point.
        from: Point,
        /// End point.
        to: Point,
        /// Stroke color.
        color: Rgba8,
        /// Stroke width in pixels.
        width: f64,
    },
    /// Single line of text whose top-left corner is `origin`.
    Text(TextOp),
    /// Prepared image drawn at its native size with its top-left corner at `origin`.
    Image {
        /// Prepared image to draw.
        image: ImageId,
        /// Top-left corner.
        origin: Point,
    },
}

#[derive(Clone, Debug, PartialEq)]
/// Rounded rectangle parameters.
pub struct RoundedRectOp {
    /// Outer bounds; the outline is drawn inside them.
    pub rect: Rect,
    /// Corner radius.
    pub radius: f64,
    /// Interior color, `None` for an outline only.
    pub fill: Option<Rgba8>,
    /// Outline color, `None` for no outline.
    pub outline: Option<Rgba8>,
    /// Outline width in pixels.
    pub outline_width: f64,
    /// Soft halo drawn outside `rect` before the rectangle itself.
    pub glow: Option<Rgba8>,
}

impl RoundedRectOp {
    /// Filled card with a 1px outline.
    pub fn card(rect: Rect, radius: f64, fill: Rgba8, outline: Rgba8) -> Self {
        Self {
            rect,
            radius,
            fill: Some(fill),
            outline: Some(outline),
            outline_width: 1.0,
            glow: None,
        }
    }

    /// Empty box with a 1px outline.
    pub fn outline(rect: Rect, radius: f64, outline: Rgba8) -> Self {
        Self {
            rect,
            radius,
            fill: None,
            outline: Some(outline),
            outline_width: 1.0,
            glow: None,
        }
    }

    /// Add a glow halo.
    pub fn with_glow(mut self, glow: Rgba8) -> Self {
        self.glow = Some(glow);
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
/// Text draw parameters.
pub struct TextOp {
    /// Logical text; bidi reordering happens at layout time.
    pub text: String,
    /// Face selected for this text.
    pub face: FaceId,
    /// Font size in pixels.
    pub size_px: f32,
    /// Top-left corner of the line box.
    pub origin: Point,
    /// Fill color.
    pub color: Rgba8,
}
