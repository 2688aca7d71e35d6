//! Fixed layout constants for the recap card.
//!
//! Offsets are in pixels on the 800x1200 canvas. Only [`card_width`] and [`problem_top`] are
//! derived; everything else is a literal.

use crate::{foundation::core::Rgba8, text::fonts::FontWeight};

/// Canvas width in pixels.
pub const CANVAS_WIDTH: u32 = 800;
/// Canvas height in pixels.
pub const CANVAS_HEIGHT: u32 = 1200;

/// Gradient color of the first row.
pub const BG_TOP: Rgba8 = Rgba8::rgb(15, 15, 15);
/// Gradient color approached by the last row.
pub const BG_BOTTOM: Rgba8 = Rgba8::rgb(5, 5, 5);

pub const GOLD: Rgba8 = Rgba8::rgb(232, 193, 90);
pub const WHITE: Rgba8 = Rgba8::rgb(255, 255, 255);
pub const GRAY_LIGHT: Rgba8 = Rgba8::rgb(200, 200, 200);
pub const GRAY_DIM: Rgba8 = Rgba8::rgb(120, 120, 120);

pub const ACCENT_SOLVED: Rgba8 = GOLD;
pub const ACCENT_STREAK: Rgba8 = Rgba8::rgb(100, 200, 255);
pub const ACCENT_RANK: Rgba8 = Rgba8::rgb(100, 255, 150);
pub const ACCENT_SKILL: Rgba8 = Rgba8::rgb(255, 100, 150);

/// Font weight and pixel size for one text role.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontSpec {
    /// Weight of the face to use.
    pub weight: FontWeight,
    /// Font size in pixels.
    pub size_px: f32,
}

const fn font_spec(weight: FontWeight, size_px: f32) -> FontSpec {
    FontSpec { weight, size_px }
}

pub const FONT_DISPLAY: FontSpec = font_spec(FontWeight::Bold, 72.0);
pub const FONT_H1: FontSpec = font_spec(FontWeight::Bold, 48.0);
pub const FONT_H2: FontSpec = font_spec(FontWeight::Bold, 36.0);
pub const FONT_NUMBER: FontSpec = font_spec(FontWeight::Bold, 55.0);
pub const FONT_BODY: FontSpec = font_spec(FontWeight::Regular, 24.0);
pub const FONT_SMALL: FontSpec = font_spec(FontWeight::Regular, 18.0);
pub const FONT_MINI: FontSpec = font_spec(FontWeight::Bold, 14.0);
pub const FONT_BRAND: FontSpec = font_spec(FontWeight::Bold, 28.0);
pub const FONT_BRAND_THIN: FontSpec = font_spec(FontWeight::Regular, 28.0);

/// Values longer than this many characters drop from [`FONT_NUMBER`] to [`FONT_H2`].
pub const VALUE_MEDIUM_AFTER: usize = 8;
/// Values longer than this many characters drop to [`FONT_BODY`].
pub const VALUE_SMALL_AFTER: usize = 12;

/// Pick the stat-card value font from the value's character count.
pub fn value_font(value: &str) -> FontSpec {
    let len = value.chars().count();
    if len > VALUE_SMALL_AFTER {
        FONT_BODY
    } else if len > VALUE_MEDIUM_AFTER {
        FONT_H2
    } else {
        FONT_NUMBER
    }
}

// Header.
pub const LOGO_X: f64 = 50.0;
pub const LOGO_Y: f64 = 50.0;
pub const LOGO_SIZE: u32 = 60;
pub const HEADER_TEXT_DY: f64 = 12.0;
pub const BRAND_X: f64 = 125.0;
pub const DIVIDER_X: f64 = 280.0;
pub const EDITION_X: f64 = 310.0;
pub const BRAND_TEXT: &str = "ICPC HUE";
pub const DIVIDER_TEXT: &str = "|";
pub const EDITION_TEXT: &str = "REWIND 2025";

// Greeting.
pub const GREETING_Y: f64 = 160.0;
pub const GREETING_X: f64 = 50.0;
pub const USERNAME_X: f64 = 120.0;
pub const DAYS_Y: f64 = 230.0;
pub const DAYS_SUFFIX_GAP: f64 = 10.0;

// Layout grid.
pub const MARGIN: f64 = 50.0;
pub const GRID_TOP: f64 = 340.0;
pub const GRID_GAP: f64 = 20.0;
pub const CARD_HEIGHT: f64 = 180.0;
pub const CARD_RADIUS: f64 = 15.0;
pub const CARD_FILL: Rgba8 = Rgba8::rgb(30, 30, 30);
pub const CARD_OUTLINE: Rgba8 = Rgba8::rgb(60, 60, 60);
pub const CARD_PAD_X: f64 = 25.0;
pub const CARD_LABEL_DY: f64 = 25.0;
pub const CARD_ACCENT_DY: f64 = 50.0;
pub const CARD_ACCENT_LEN: f64 = 30.0;
pub const CARD_ACCENT_WIDTH: f64 = 2.0;
pub const CARD_VALUE_DY: f64 = 55.0;
pub const CARD_SUB_DY: f64 = 130.0;

/// Stat card width: two cards and one gap between the margins.
pub fn card_width() -> f64 {
    ((f64::from(CANVAS_WIDTH) - MARGIN * 2.0 - GRID_GAP) / 2.0).floor()
}

// Top problem card.
pub const PROBLEM_EXTRA_GAP: f64 = 20.0;
pub const PROBLEM_HEIGHT: f64 = 200.0;
pub const PROBLEM_FILL: Rgba8 = Rgba8::rgb(25, 25, 25);
pub const PROBLEM_OUTLINE: Rgba8 = Rgba8::rgb(50, 50, 50);
pub const PROBLEM_PAD: f64 = 30.0;
pub const PROBLEM_NAME_DY: f64 = 60.0;
pub const PILL_DY: f64 = 140.0;
pub const PILL_HEIGHT: f64 = 32.0;
pub const PILL_RADIUS: f64 = 16.0;
pub const PILL_PAD_X: f64 = 15.0;
pub const PILL_TEXT_DY: f64 = 5.0;
pub const PILL_FILL_ALPHA: u8 = 40;

/// Top edge of the wide problem card.
pub fn problem_top() -> f64 {
    GRID_TOP + 2.0 * (CARD_HEIGHT + GRID_GAP) + PROBLEM_EXTRA_GAP
}

// Achievements.
pub const ACHIEVEMENTS_DY: f64 = 50.0;
pub const ACHIEVEMENT_ROW_DY: f64 = 40.0;
pub const ACHIEVEMENT_SIZE: f64 = 90.0;
pub const ACHIEVEMENT_GAP: f64 = 20.0;
pub const ACHIEVEMENT_INSET: f64 = 10.0;
pub const ACHIEVEMENT_ICON_SIZE: u32 = 70;
pub const ACHIEVEMENT_FILL: Rgba8 = Rgba8::rgb(20, 20, 20);
pub const ACHIEVEMENT_OUTLINE: Rgba8 = Rgba8::rgb(50, 50, 50);
pub const MAX_ACHIEVEMENTS: usize = 6;

// Footer.
pub const FOOTER_TEXT: &str = "Generated on ICPCHUE.XYZ";
pub const FOOTER_BOTTOM_DY: f64 = 60.0;

// Optional glow around rounded cards.
pub const GLOW_STEPS: u32 = 4;
pub const GLOW_MAX_ALPHA: f64 = 10.0;
