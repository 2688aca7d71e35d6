use crate::{
    assets::store::{AchievementSlot, RecapAssets},
    compile::plan::{DrawOp, RecapPlan, RoundedRectOp, TextOp},
    compile::theme::{self, FontSpec},
    foundation::core::{Canvas, Point, Rect, Rgba8},
    foundation::error::RewindResult,
    model::input::RecapInput,
    text::fonts::FontBook,
    text::layout::TextLayoutEngine,
};

/// One cell of the 2x2 stat grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatCard {
    /// Upper-case caption.
    pub label: &'static str,
    /// Headline value.
    pub value: String,
    /// Caption under the value.
    pub sub: &'static str,
    /// Accent line color.
    pub accent: Rgba8,
}

/// The four stat cards in row-major order.
pub fn stat_cards(input: &RecapInput) -> [StatCard; 4] {
    [
        StatCard {
            label: "TOTAL SOLVED",
            value: input.total_solved().to_string(),
            sub: "Problems",
            accent: theme::ACCENT_SOLVED,
        },
        StatCard {
            label: "MAX STREAK",
            value: input.max_streak().to_string(),
            sub: "Day Streak",
            accent: theme::ACCENT_STREAK,
        },
        StatCard {
            label: "GLOBAL RANK",
            value: format!("Better than {}%", input.better_than_percent()),
            sub: "of users",
            accent: theme::ACCENT_RANK,
        },
        StatCard {
            label: "TOP SKILL",
            value: input.top_skill(),
            sub: "Most Practiced",
            accent: theme::ACCENT_SKILL,
        },
    ]
}

/// Lay out the recap card for `input` as an ordered list of draw ops.
///
/// Pure apart from text measurement: fonts and images must already be prepared. Text whose
/// font could not be resolved is left out; a failed measurement counts as zero width.
#[tracing::instrument(skip_all)]
pub fn compile_recap(
    input: &RecapInput,
    fonts: &FontBook,
    text: &mut TextLayoutEngine,
    assets: &RecapAssets,
) -> RewindResult<RecapPlan> {
    let canvas = Canvas::new(theme::CANVAS_WIDTH, theme::CANVAS_HEIGHT)?;
    let mut b = PlanBuilder {
        fonts,
        engine: text,
        ops: Vec::new(),
    };

    b.ops.push(DrawOp::VerticalGradient {
        rect: canvas.rect(),
        top: theme::BG_TOP,
        bottom: theme::BG_BOTTOM,
    });

    header(&mut b, assets);
    greeting(&mut b, input);
    stat_grid(&mut b, input);
    top_problem(&mut b, input);
    achievements(&mut b, assets);
    footer(&mut b, canvas);

    Ok(RecapPlan { canvas, ops: b.ops })
}

struct PlanBuilder<'a> {
    fonts: &'a FontBook,
    engine: &'a mut TextLayoutEngine,
    ops: Vec<DrawOp>,
}

impl PlanBuilder<'_> {
    fn text(&mut self, text: &str, font: FontSpec, x: f64, y: f64, color: Rgba8) {
        let Some(face) = self.fonts.face_for(text, font.weight) else {
            tracing::debug!("no font for {:?}; skipping text {text:?}", font.weight);
            return;
        };
        self.ops.push(DrawOp::Text(TextOp {
            text: text.to_string(),
            face,
            size_px: font.size_px,
            origin: Point::new(x, y),
            color,
        }));
    }

    fn measure(&mut self, text: &str, font: FontSpec) -> f64 {
        let Some(face) = self.fonts.face_for(text, font.weight) else {
            return 0.0;
        };
        match self.engine.measure(self.fonts, face, text, font.size_px) {
            Ok(w) => f64::from(w),
            Err(e) => {
                tracing::warn!("cannot measure {text:?}: {e}");
                0.0
            }
        }
    }

    fn rounded(&mut self, op: RoundedRectOp) {
        self.ops.push(DrawOp::RoundedRect(op));
    }
}

/// Box whose far edges cover the pixel row and column at `x + w` and `y + h`.
fn pixel_box(x: f64, y: f64, w: f64, h: f64) -> Rect {
    Rect::new(x, y, x + w + 1.0, y + h + 1.0)
}

fn header(b: &mut PlanBuilder<'_>, assets: &RecapAssets) {
    if let Some(image) = assets.logo() {
        b.ops.push(DrawOp::Image {
            image,
            origin: Point::new(theme::LOGO_X, theme::LOGO_Y),
        });
    }

    let y = theme::LOGO_Y + theme::HEADER_TEXT_DY;
    b.text(theme::BRAND_TEXT, theme::FONT_BRAND, theme::BRAND_X, y, theme::WHITE);
    b.text(
        theme::DIVIDER_TEXT,
        theme::FONT_BRAND_THIN,
        theme::DIVIDER_X,
        y,
        theme::GRAY_DIM,
    );
    b.text(
        theme::EDITION_TEXT,
        theme::FONT_BRAND_THIN,
        theme::EDITION_X,
        y,
        theme::GOLD,
    );
}

fn greeting(b: &mut PlanBuilder<'_>, input: &RecapInput) {
    b.text(
        "Hi",
        theme::FONT_H1,
        theme::GREETING_X,
        theme::GREETING_Y,
        theme::GRAY_LIGHT,
    );
    // Font choice follows the bare username, not the trailing comma.
    let name = input.username();
    if let Some(face) = b.fonts.face_for(name, theme::FONT_H1.weight) {
        b.ops.push(DrawOp::Text(TextOp {
            text: format!("{name},"),
            face,
            size_px: theme::FONT_H1.size_px,
            origin: Point::new(theme::USERNAME_X, theme::GREETING_Y),
            color: theme::WHITE,
        }));
    }

    let x = theme::GREETING_X;
    let y = theme::DAYS_Y;
    b.text("It's been", theme::FONT_H2, x, y, theme::GRAY_DIM);
    let prefix_w = b.measure("It's been ", theme::FONT_H2);

    let days = format!("{} days", input.days_active());
    b.text(&days, theme::FONT_H2, x + prefix_w, y, theme::GOLD);
    let days_w = b.measure(&days, theme::FONT_H2);

    b.text(
        "with us.",
        theme::FONT_H2,
        x + prefix_w + days_w + theme::DAYS_SUFFIX_GAP,
        y,
        theme::GRAY_DIM,
    );
}

fn stat_grid(b: &mut PlanBuilder<'_>, input: &RecapInput) {
    let card_w = theme::card_width();
    for (i, card) in stat_cards(input).iter().enumerate() {
        let row = (i / 2) as f64;
        let col = (i % 2) as f64;
        let cx = theme::MARGIN + col * (card_w + theme::GRID_GAP);
        let cy = theme::GRID_TOP + row * (theme::CARD_HEIGHT + theme::GRID_GAP);

        b.rounded(RoundedRectOp::card(
            pixel_box(cx, cy, card_w, theme::CARD_HEIGHT),
            theme::CARD_RADIUS,
            theme::CARD_FILL,
            theme::CARD_OUTLINE,
        ));

        let tx = cx + theme::CARD_PAD_X;
        b.text(
            card.label,
            theme::FONT_SMALL,
            tx,
            cy + theme::CARD_LABEL_DY,
            theme::GRAY_DIM,
        );
        b.text(
            &card.value,
            theme::value_font(&card.value),
            tx,
            cy + theme::CARD_VALUE_DY,
            theme::WHITE,
        );
        b.text(
            card.sub,
            theme::FONT_SMALL,
            tx,
            cy + theme::CARD_SUB_DY,
            theme::GRAY_DIM,
        );
        b.ops.push(DrawOp::Line {
            from: Point::new(tx, cy + theme::CARD_ACCENT_DY),
            to: Point::new(tx + theme::CARD_ACCENT_LEN, cy + theme::CARD_ACCENT_DY),
            color: card.accent,
            width: theme::CARD_ACCENT_WIDTH,
        });
    }
}

fn top_problem(b: &mut PlanBuilder<'_>, input: &RecapInput) {
    let x = theme::MARGIN;
    let y = theme::problem_top();
    let w = f64::from(theme::CANVAS_WIDTH) - theme::MARGIN * 2.0;

    b.rounded(RoundedRectOp::card(
        pixel_box(x, y, w, theme::PROBLEM_HEIGHT),
        theme::CARD_RADIUS,
        theme::PROBLEM_FILL,
        theme::PROBLEM_OUTLINE,
    ));

    let tx = x + theme::PROBLEM_PAD;
    b.text(
        "MOST ATTEMPTED PROBLEM",
        theme::FONT_MINI,
        tx,
        y + theme::PROBLEM_PAD,
        theme::GRAY_DIM,
    );
    b.text(
        input.top_problem(),
        theme::FONT_DISPLAY,
        tx,
        y + theme::PROBLEM_NAME_DY,
        theme::WHITE,
    );

    let attempts = format!("{} Attempts", input.top_problem_attempts());
    let pill_w = b.measure(&attempts, theme::FONT_SMALL) + theme::PILL_PAD_X * 2.0;
    let pill_y = y + theme::PILL_DY;
    b.rounded(RoundedRectOp::card(
        pixel_box(tx, pill_y, pill_w, theme::PILL_HEIGHT),
        theme::PILL_RADIUS,
        theme::GOLD.with_alpha(theme::PILL_FILL_ALPHA),
        theme::GOLD,
    ));
    b.text(
        &attempts,
        theme::FONT_SMALL,
        tx + theme::PILL_PAD_X,
        pill_y + theme::PILL_TEXT_DY,
        theme::GOLD,
    );
}

fn achievements(b: &mut PlanBuilder<'_>, assets: &RecapAssets) {
    let title_y = theme::problem_top() + theme::PROBLEM_HEIGHT + theme::ACHIEVEMENTS_DY;
    b.text(
        "ACHIEVEMENTS UNLOCKED",
        theme::FONT_SMALL,
        theme::MARGIN,
        title_y,
        theme::GRAY_DIM,
    );

    let y = title_y + theme::ACHIEVEMENT_ROW_DY;
    let size = theme::ACHIEVEMENT_SIZE;
    let slots = assets.achievements().iter().take(theme::MAX_ACHIEVEMENTS);
    for (i, slot) in slots.enumerate() {
        let x = theme::MARGIN + (i as f64) * (size + theme::ACHIEVEMENT_GAP);
        let rect = pixel_box(x, y, size, size);
        match *slot {
            AchievementSlot::Icon(image) => {
                b.rounded(RoundedRectOp::card(
                    rect,
                    theme::CARD_RADIUS,
                    theme::ACHIEVEMENT_FILL,
                    theme::ACHIEVEMENT_OUTLINE,
                ));
                b.ops.push(DrawOp::Image {
                    image,
                    origin: Point::new(x + theme::ACHIEVEMENT_INSET, y + theme::ACHIEVEMENT_INSET),
                });
            }
            AchievementSlot::Missing | AchievementSlot::Broken => {
                b.rounded(RoundedRectOp::outline(
                    rect,
                    theme::CARD_RADIUS,
                    theme::GRAY_DIM,
                ));
            }
        }
    }
}

fn footer(b: &mut PlanBuilder<'_>, canvas: Canvas) {
    let w = b.measure(theme::FOOTER_TEXT, theme::FONT_SMALL);
    let x = f64::from(canvas.width) - theme::MARGIN - w;
    let y = f64::from(canvas.height) - theme::FOOTER_BOTTOM_DY;
    b.text(theme::FOOTER_TEXT, theme::FONT_SMALL, x, y, theme::GRAY_DIM);
}

#[cfg(test)]
#[path = "../../tests/unit/compile/recap.rs"]
mod tests;
