/// Coarse script classification used to pick a font family for a string.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScriptClass {
    /// Anything without Arabic-range code points.
    #[default]
    Default,
    /// Contains at least one Arabic-range code point.
    Arabic,
}

impl ScriptClass {
    /// Classify `text` by a direct code-point range check.
    pub fn of(text: &str) -> Self {
        if is_arabic(text) {
            Self::Arabic
        } else {
            Self::Default
        }
    }
}

/// Return `true` when `text` contains a code point from the Arabic blocks.
///
/// Covered ranges: Arabic (U+0600..=U+06FF), Arabic Presentation Forms-A (U+FB50..=U+FDFF) and
/// Arabic Presentation Forms-B (U+FE70..=U+FEFF).
pub fn is_arabic(text: &str) -> bool {
    text.chars().any(is_arabic_char)
}

fn is_arabic_char(c: char) -> bool {
    matches!(
        u32::from(c),
        0x0600..=0x06FF | 0xFB50..=0xFDFF | 0xFE70..=0xFEFF
    )
}

#[cfg(test)]
#[path = "../../tests/unit/text/script.rs"]
mod tests;
