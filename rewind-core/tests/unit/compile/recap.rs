use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use super::*;
use crate::{
    assets::store::PreparedImage,
    text::fonts::{FontFace, FontOpts, FontWeight},
    text::script::ScriptClass,
};

// Dummy bytes: every face resolves but measures as zero width.
fn fake_book(with_arabic: bool) -> FontBook {
    let mut book = FontBook::empty();
    for weight in [FontWeight::Regular, FontWeight::Bold] {
        let id = book.insert(FontFace::from_bytes(vec![0; 4], ScriptClass::Default, weight));
        book.set_default(weight, id);
        if with_arabic {
            let id = book.insert(FontFace::from_bytes(vec![1; 4], ScriptClass::Arabic, weight));
            book.set_arabic(weight, id);
        }
    }
    book
}

// Real faces from the system font database, or `None` when the machine has none.
fn system_book() -> Option<FontBook> {
    let missing = |name: &str| PathBuf::from(format!("/nonexistent/rewind/{name}.ttf"));
    let opts = FontOpts {
        bundled_regular: PathBuf::from("none/Regular.ttf"),
        bundled_bold: PathBuf::from("none/Bold.ttf"),
        system_fallback: missing("Fallback"),
        arabic_regular: missing("ArabicRegular"),
        arabic_bold: missing("ArabicBold"),
        ..FontOpts::default()
    };
    let book = FontBook::load(Path::new("/nonexistent/rewind-root"), &opts);
    book.default_face(FontWeight::Regular)?;
    book.default_face(FontWeight::Bold)?;
    Some(book)
}

fn measure(fonts: &FontBook, text: &str, font: FontSpec) -> f64 {
    let face = fonts.face_for(text, font.weight).unwrap();
    let w = TextLayoutEngine::new()
        .measure(fonts, face, text, font.size_px)
        .unwrap();
    f64::from(w)
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

fn compile(input: &RecapInput, fonts: &FontBook, assets: &RecapAssets) -> RecapPlan {
    let mut engine = TextLayoutEngine::new();
    compile_recap(input, fonts, &mut engine, assets).unwrap()
}

fn input(json: &str) -> RecapInput {
    RecapInput::from_json_str(json).unwrap()
}

fn rounded_rects(plan: &RecapPlan) -> Vec<&RoundedRectOp> {
    plan.ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::RoundedRect(r) => Some(r),
            _ => None,
        })
        .collect()
}

#[test]
fn plan_starts_with_full_canvas_gradient() {
    let plan = compile(&RecapInput::default(), &fake_book(false), &RecapAssets::empty());
    assert_eq!((plan.canvas.width, plan.canvas.height), (800, 1200));
    assert_eq!(
        plan.ops[0],
        DrawOp::VerticalGradient {
            rect: Rect::new(0.0, 0.0, 800.0, 1200.0),
            top: theme::BG_TOP,
            bottom: theme::BG_BOTTOM,
        }
    );
}

#[test]
fn rank_shows_complement_in_smallest_value_font() {
    let plan = compile(
        &input(r#"{"rankPercentile": 25}"#),
        &fake_book(false),
        &RecapAssets::empty(),
    );
    let rank = plan.find_text("Better than 75%").unwrap();
    assert_eq!(rank.size_px, theme::FONT_BODY.size_px);
    assert_eq!(rank.origin, Point::new(75.0, 595.0));
}

#[test]
fn stat_cards_fill_a_two_by_two_grid() {
    let plan = compile(
        &input(r#"{"totalSolved": 310, "maxStreak": 21, "topTags": [{"tag": "dp"}]}"#),
        &fake_book(false),
        &RecapAssets::empty(),
    );

    let solved = plan.find_text("310").unwrap();
    assert_eq!(solved.origin, Point::new(75.0, 395.0));
    assert_eq!(solved.size_px, theme::FONT_NUMBER.size_px);

    let streak = plan.find_text("21").unwrap();
    assert_eq!(streak.origin, Point::new(435.0, 395.0));

    let skill = plan.find_text("Dp").unwrap();
    assert_eq!(skill.origin, Point::new(435.0, 595.0));

    let cards: Vec<_> = rounded_rects(&plan)
        .into_iter()
        .filter(|r| r.fill == Some(theme::CARD_FILL))
        .map(|r| r.rect)
        .collect();
    assert_eq!(
        cards,
        vec![
            Rect::new(50.0, 340.0, 391.0, 521.0),
            Rect::new(410.0, 340.0, 751.0, 521.0),
            Rect::new(50.0, 540.0, 391.0, 721.0),
            Rect::new(410.0, 540.0, 751.0, 721.0),
        ]
    );

    let accents: Vec<_> = plan
        .ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::Line { color, .. } => Some(*color),
            _ => None,
        })
        .collect();
    assert_eq!(
        accents,
        vec![
            theme::ACCENT_SOLVED,
            theme::ACCENT_STREAK,
            theme::ACCENT_RANK,
            theme::ACCENT_SKILL
        ]
    );
}

#[test]
fn medium_length_skill_uses_h2() {
    let plan = compile(
        &input(r#"{"topTags": [{"tag": "two pointers"}]}"#),
        &fake_book(false),
        &RecapAssets::empty(),
    );
    let skill = plan.find_text("Two Pointers").unwrap();
    assert_eq!(skill.size_px, theme::FONT_H2.size_px);
}

#[test]
fn defaults_fill_every_field() {
    let plan = compile(&input("{}"), &fake_book(false), &RecapAssets::empty());
    for text in [
        "User,",
        "0 days",
        "General",
        "N/A",
        "0 Attempts",
        "Better than 0%",
        theme::FOOTER_TEXT,
    ] {
        assert!(plan.find_text(text).is_some(), "missing text {text:?}");
    }
}

#[test]
fn arabic_username_selects_arabic_face() {
    let fonts = fake_book(true);
    let plan = compile(
        &input(r#"{"username": "محمد"}"#),
        &fonts,
        &RecapAssets::empty(),
    );
    let name = plan.find_text("محمد,").unwrap();
    assert_eq!(fonts.get(name.face).unwrap().script, ScriptClass::Arabic);
    assert_eq!(fonts.get(name.face).unwrap().weight, FontWeight::Bold);

    let hi = plan.find_text("Hi").unwrap();
    assert_eq!(fonts.get(hi.face).unwrap().script, ScriptClass::Default);
}

#[test]
fn arabic_problem_name_selects_arabic_face() {
    let fonts = fake_book(true);
    let plan = compile(
        &input(r#"{"topProblem": "مسألة"}"#),
        &fonts,
        &RecapAssets::empty(),
    );
    let problem = plan.find_text("مسألة").unwrap();
    assert_eq!(fonts.get(problem.face).unwrap().script, ScriptClass::Arabic);
    assert_eq!(problem.size_px, theme::FONT_DISPLAY.size_px);
}

#[test]
fn missing_fonts_drop_text_but_keep_shapes() {
    let plan = compile(&input("{}"), &FontBook::empty(), &RecapAssets::empty());
    assert_eq!(plan.texts().count(), 0);
    // Four stat cards, the problem card and the pill.
    assert_eq!(rounded_rects(&plan).len(), 6);
}

#[test]
fn achievement_slots_advance_by_size_and_gap() {
    let mut assets = RecapAssets::empty();
    let icon = assets.insert(PreparedImage {
        width: 70,
        height: 70,
        rgba8_premul: Arc::new(vec![255; 70 * 70 * 4]),
    });
    assets.push_achievement(AchievementSlot::Icon(icon));
    assets.push_achievement(AchievementSlot::Missing);
    assets.push_achievement(AchievementSlot::Broken);

    let plan = compile(&RecapInput::default(), &fake_book(false), &assets);

    let images: Vec<_> = plan
        .ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::Image { image, origin } => Some((*image, *origin)),
            _ => None,
        })
        .collect();
    assert_eq!(images, vec![(icon, Point::new(60.0, 1060.0))]);

    let placeholders: Vec<_> = rounded_rects(&plan)
        .into_iter()
        .filter(|r| r.fill.is_none())
        .collect();
    assert_eq!(placeholders.len(), 2);
    assert_eq!(placeholders[0].rect, Rect::new(160.0, 1050.0, 251.0, 1141.0));
    assert_eq!(placeholders[1].rect, Rect::new(270.0, 1050.0, 361.0, 1141.0));
    assert!(
        placeholders
            .iter()
            .all(|r| r.outline == Some(theme::GRAY_DIM))
    );
}

#[test]
fn logo_is_drawn_right_after_background() {
    let mut assets = RecapAssets::empty();
    let logo = assets.insert(PreparedImage {
        width: 60,
        height: 60,
        rgba8_premul: Arc::new(vec![0; 60 * 60 * 4]),
    });
    assets.set_logo(logo);

    let plan = compile(&RecapInput::default(), &fake_book(false), &assets);
    assert_eq!(
        plan.ops[1],
        DrawOp::Image {
            image: logo,
            origin: Point::new(50.0, 50.0),
        }
    );
}

#[test]
fn footer_is_right_aligned_to_margin() {
    let plan = compile(&RecapInput::default(), &fake_book(false), &RecapAssets::empty());
    let footer = plan.find_text(theme::FOOTER_TEXT).unwrap();
    // Unmeasurable fonts count as zero width.
    assert_eq!(footer.origin, Point::new(750.0, 1140.0));
}

#[test]
fn compilation_is_deterministic() {
    let doc = input(
        r#"{"username": "alice", "daysActive": 120, "totalSolved": 310,
            "topTags": [{"tag": "graphs"}], "topProblem": "Watermelon", "topProblemAttempts": 7}"#,
    );
    let fonts = fake_book(true);
    let a = compile(&doc, &fonts, &RecapAssets::empty());
    let b = compile(&doc, &fonts, &RecapAssets::empty());
    assert_eq!(a.ops, b.ops);
}

#[test]
fn measured_widths_place_greeting_pill_and_footer() {
    let Some(fonts) = system_book() else {
        eprintln!("skipping: no system font available");
        return;
    };
    let plan = compile(
        &input(r#"{"daysActive": 120, "topProblemAttempts": 7}"#),
        &fonts,
        &RecapAssets::empty(),
    );

    let prefix_w = measure(&fonts, "It's been ", theme::FONT_H2);
    assert!(prefix_w > 0.0);
    let days = plan.find_text("120 days").unwrap();
    assert_close(days.origin.x, theme::GREETING_X + prefix_w);

    let days_w = measure(&fonts, "120 days", theme::FONT_H2);
    let with_us = plan.find_text("with us.").unwrap();
    assert_close(
        with_us.origin.x,
        days.origin.x + days_w + theme::DAYS_SUFFIX_GAP,
    );

    let attempts_w = measure(&fonts, "7 Attempts", theme::FONT_SMALL);
    let pill_fill = theme::GOLD.with_alpha(theme::PILL_FILL_ALPHA);
    let pill = rounded_rects(&plan)
        .into_iter()
        .find(|r| r.fill == Some(pill_fill))
        .unwrap();
    // Far edges are inclusive, so the box spans one extra pixel.
    assert_close(
        pill.rect.width(),
        attempts_w + theme::PILL_PAD_X * 2.0 + 1.0,
    );
    let attempts = plan.find_text("7 Attempts").unwrap();
    assert_close(attempts.origin.x, pill.rect.x0 + theme::PILL_PAD_X);

    let footer = plan.find_text(theme::FOOTER_TEXT).unwrap();
    let footer_w = measure(&fonts, theme::FOOTER_TEXT, theme::FONT_SMALL);
    assert!(footer_w > 0.0);
    assert_close(footer.origin.x + footer_w, 750.0);
}

#[test]
fn long_arabic_skill_uses_arabic_body_font() {
    let fonts = fake_book(true);
    let tag = "البرمجة الديناميكية";
    assert!(tag.chars().count() > theme::VALUE_SMALL_AFTER);
    let plan = compile(
        &input(&format!(r#"{{"topTags": [{{"tag": "{tag}"}}]}}"#)),
        &fonts,
        &RecapAssets::empty(),
    );

    let skill = plan.find_text(tag).unwrap();
    let face = fonts.get(skill.face).unwrap();
    assert_eq!(face.script, ScriptClass::Arabic);
    assert_eq!(face.weight, theme::FONT_BODY.weight);
    assert_eq!(skill.size_px, theme::FONT_BODY.size_px);
}

#[test]
fn short_arabic_skill_uses_arabic_number_font() {
    let fonts = fake_book(true);
    let tag = "رسوم";
    assert!(tag.chars().count() <= theme::VALUE_MEDIUM_AFTER);
    let plan = compile(
        &input(&format!(r#"{{"topTags": [{{"tag": "{tag}"}}]}}"#)),
        &fonts,
        &RecapAssets::empty(),
    );

    let skill = plan.find_text(tag).unwrap();
    let face = fonts.get(skill.face).unwrap();
    assert_eq!(face.script, ScriptClass::Arabic);
    assert_eq!(face.weight, theme::FONT_NUMBER.weight);
    assert_eq!(skill.size_px, theme::FONT_NUMBER.size_px);
}
