//! Rewind renders a user's yearly statistics as a fixed-layout recap card and batch-converts PNG
//! screenshots to WEBP.
//!
//! # Pipeline overview
//!
//! 1. **Load**: `JSON -> RecapInput` (lenient: every field has a default)
//! 2. **Prepare**: resolve fonts into a [`FontBook`] and decode images into [`RecapAssets`]
//! 3. **Compile**: `RecapInput -> RecapPlan` (an ordered list of backend-agnostic draw ops)
//! 4. **Render**: `RecapPlan -> FrameRGBA` (CPU backend powered by `vello_cpu`)
//! 5. **Encode**: write the frame in the format implied by the output extension
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: the same input, fonts and images produce byte-identical output.
//! - **No IO in renderers**: all file access is front-loaded in the prepare step.
//! - **Degrade, don't fail**: missing fonts or icons are logged and drawn around.
//!
//! Text is shaped by Parley, which also handles joining and bidi reordering of Arabic script.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod compile;
mod convert;
mod foundation;
mod model;
mod render;
mod text;

pub use assets::decode::decode_image_resized;
pub use assets::store::{
    AchievementSlot, ImageId, LOGO_PATH, PUBLIC_DIR, PreparedImage, RecapAssets, achievement_path,
    normalize_rel_path,
};
pub use compile::plan::{DrawOp, RecapPlan, RoundedRectOp, TextOp};
pub use compile::recap::{StatCard, compile_recap, stat_cards};
pub use compile::theme::{CANVAS_HEIGHT, CANVAS_WIDTH, FontSpec, value_font};
pub use convert::webp::{
    ConvertReport, DEFAULT_DEVLOG_DIR, convert_dir, convert_png_to_webp, webp_path_for,
};
pub use foundation::core::{Canvas, Point, Rect, Rgba8};
pub use foundation::error::{RewindError, RewindResult};
pub use model::input::{AchievementEntry, RecapInput, TagEntry, title_case};
pub use render::backend::{FrameRGBA, RenderBackend};
pub use render::cpu::CpuRenderer;
pub use render::pipeline::{
    RecapOpts, ensure_parent_dir, render_recap, render_recap_to_file, save_frame,
};
pub use text::fonts::{
    ARABIC_BOLD_FONT, ARABIC_REGULAR_FONT, BUNDLED_BOLD_FONT, BUNDLED_REGULAR_FONT, FaceId,
    FontBook, FontFace, FontOpts, FontSource, FontWeight, SYSTEM_FALLBACK_FONT,
};
pub use text::layout::{TextBrushRgba8, TextLayoutEngine};
pub use text::script::{ScriptClass, is_arabic};
