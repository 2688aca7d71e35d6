use std::collections::HashMap;
use std::sync::Arc;

use kurbo::Shape;

use crate::{
    assets::store::{ImageId, RecapAssets},
    compile::plan::{DrawOp, RecapPlan, RoundedRectOp, TextOp},
    compile::theme,
    foundation::core::{Point, Rect, Rgba8},
    foundation::error::{RewindError, RewindResult},
    render::backend::{FrameRGBA, RenderBackend},
    text::fonts::{FaceId, FontBook},
    text::layout::TextLayoutEngine,
};

/// CPU raster backend powered by `vello_cpu`.
///
/// Face and image ids are resolved against the [`FontBook`] and [`RecapAssets`] passed to each
/// [`RenderBackend::render_plan`] call. The text layout cache is keyed by face id, so one renderer
/// should only ever see a single font book.
pub struct CpuRenderer {
    ctx: Option<vello_cpu::RenderContext>,
    text_engine: TextLayoutEngine,
}

impl Default for CpuRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuRenderer {
    /// Create a renderer with empty caches.
    pub fn new() -> Self {
        Self {
            ctx: None,
            text_engine: TextLayoutEngine::new(),
        }
    }

    /// Layout engine shared with plan compilation, so measurement and drawing shape text the same
    /// way.
    pub fn text_engine_mut(&mut self) -> &mut TextLayoutEngine {
        &mut self.text_engine
    }

    fn take_ctx(&mut self, width: u16, height: u16) -> vello_cpu::RenderContext {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        ctx
    }

    fn draw_op(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        op: &DrawOp,
        fonts: &FontBook,
        assets: &RecapAssets,
        font_cache: &mut HashMap<FaceId, vello_cpu::peniko::FontData>,
    ) -> RewindResult<()> {
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        match op {
            DrawOp::VerticalGradient { rect, top, bottom } => {
                draw_vertical_gradient(ctx, *rect, *top, *bottom);
            }
            DrawOp::RoundedRect(r) => draw_rounded_rect(ctx, r),
            DrawOp::Line {
                from,
                to,
                color,
                width,
            } => {
                let mut path = vello_cpu::kurbo::BezPath::new();
                path.move_to(point_to_cpu(*from));
                path.line_to(point_to_cpu(*to));
                ctx.set_paint(color_to_cpu(*color));
                ctx.set_stroke(vello_cpu::kurbo::Stroke::new(*width));
                ctx.stroke_path(&path);
            }
            DrawOp::Text(t) => {
                // A face that cannot be shaped drops the text, not the whole card.
                if let Err(e) = self.draw_text(ctx, t, fonts, font_cache) {
                    tracing::warn!("skipping text {:?}: {e}", t.text);
                }
            }
            DrawOp::Image { image, origin } => draw_image(ctx, *image, *origin, assets)?,
        }
        Ok(())
    }

    fn draw_text(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        op: &TextOp,
        fonts: &FontBook,
        font_cache: &mut HashMap<FaceId, vello_cpu::peniko::FontData>,
    ) -> RewindResult<()> {
        let layout = self.text_engine.layout(
            fonts,
            op.face,
            &op.text,
            op.size_px,
            op.color.into(),
        )?;

        let font = match font_cache.get(&op.face) {
            Some(f) => f.clone(),
            None => {
                let face = fonts.get(op.face)?;
                let font = vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(face.bytes().to_vec()),
                    face.index,
                );
                font_cache.insert(op.face, font.clone());
                font
            }
        };

        ctx.set_transform(vello_cpu::kurbo::Affine::translate((
            op.origin.x,
            op.origin.y,
        )));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        Ok(())
    }
}

impl RenderBackend for CpuRenderer {
    #[tracing::instrument(skip_all, fields(ops = plan.ops.len()))]
    fn render_plan(
        &mut self,
        plan: &RecapPlan,
        fonts: &FontBook,
        assets: &RecapAssets,
    ) -> RewindResult<FrameRGBA> {
        let width: u16 = plan
            .canvas
            .width
            .try_into()
            .map_err(|_| RewindError::render("canvas width exceeds u16"))?;
        let height: u16 = plan
            .canvas
            .height
            .try_into()
            .map_err(|_| RewindError::render("canvas height exceeds u16"))?;

        let mut ctx = self.take_ctx(width, height);
        let mut font_cache = HashMap::new();
        let mut result = Ok(());
        for op in &plan.ops {
            result = self.draw_op(&mut ctx, op, fonts, assets, &mut font_cache);
            if result.is_err() {
                break;
            }
        }

        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        if result.is_ok() {
            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
        }
        self.ctx = Some(ctx);
        result?;

        Ok(FrameRGBA {
            width: plan.canvas.width,
            height: plan.canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

/// Mask for row `y` of a `height`-row gradient: `floor(255 * y / height)`.
pub(crate) fn gradient_mask(y: u32, height: u32) -> u8 {
    if height == 0 {
        return 0;
    }
    ((255 * u64::from(y)) / u64::from(height)).min(255) as u8
}

fn draw_vertical_gradient(
    ctx: &mut vello_cpu::RenderContext,
    rect: Rect,
    top: Rgba8,
    bottom: Rgba8,
) {
    let y0 = rect.y0.floor().max(0.0) as u32;
    let rows = rect.height().ceil().max(0.0) as u32;
    for y in 0..rows {
        let color = top.mix(bottom, gradient_mask(y, rows));
        let row_y = f64::from(y0 + y);
        ctx.set_paint(color_to_cpu(color));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            rect.x0,
            row_y,
            rect.x1,
            row_y + 1.0,
        ));
    }
}

fn draw_rounded_rect(ctx: &mut vello_cpu::RenderContext, op: &RoundedRectOp) {
    if let Some(glow) = op.glow {
        for i in (1..=theme::GLOW_STEPS).rev() {
            let step = f64::from(i);
            let alpha = (theme::GLOW_MAX_ALPHA * (1.0 - step / 5.0)).floor() as u8;
            stroke_rounded(ctx, op.rect.inset(step), op.radius + step, glow.with_alpha(alpha), 1.0);
        }
    }

    if let Some(fill) = op.fill {
        let path = rounded_path(op.rect, op.radius);
        ctx.set_paint(color_to_cpu(fill));
        ctx.fill_path(&path);
    }

    if let Some(outline) = op.outline
        && op.outline_width > 0.0
    {
        stroke_rounded(ctx, op.rect, op.radius, outline, op.outline_width);
    }
}

// Strokes a `width`-wide outline that stays inside `rect`.
fn stroke_rounded(
    ctx: &mut vello_cpu::RenderContext,
    rect: Rect,
    radius: f64,
    color: Rgba8,
    width: f64,
) {
    let half = width / 2.0;
    let path = rounded_path(rect.inset(-half), (radius - half).max(0.0));
    ctx.set_paint(color_to_cpu(color));
    ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
    ctx.stroke_path(&path);
}

fn rounded_path(rect: Rect, radius: f64) -> vello_cpu::kurbo::BezPath {
    let path = kurbo::RoundedRect::from_rect(rect, radius).to_path(0.1);
    bezpath_to_cpu(&path)
}

fn draw_image(
    ctx: &mut vello_cpu::RenderContext,
    id: ImageId,
    origin: Point,
    assets: &RecapAssets,
) -> RewindResult<()> {
    let img = assets.get(id)?;
    let pixmap = pixmap_from_premul_bytes(&img.rgba8_premul, img.width, img.height)?;
    let paint = vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    };
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));
    ctx.set_paint(paint);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(img.width),
        f64::from(img.height),
    ));
    Ok(())
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3))
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> RewindResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| RewindError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| RewindError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(RewindError::render("pixmap byte len mismatch"));
    }
    // Pixmap stores PremulRgba8; prepared images are already premultiplied.
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
