//! Best-effort source language detection.

/// Marker passed to providers when the source language is not known.
pub const AUTO_DETECT: &str = "auto";

/// Guess the language of `text`.
///
/// Never fails. Providers detect the source language themselves, so the
/// answer is [`AUTO_DETECT`] unless the text is unambiguously in a script
/// used by a single language.
pub fn detect_language(text: &str) -> &'static str {
    let mut letters = 0usize;
    let mut hiragana_katakana = 0usize;
    let mut hangul = 0usize;
    let mut greek = 0usize;

    for ch in text.chars().filter(|c| c.is_alphabetic()) {
        letters += 1;
        match ch as u32 {
            0x3040..=0x30FF => hiragana_katakana += 1,
            0xAC00..=0xD7AF | 0x1100..=0x11FF => hangul += 1,
            0x0370..=0x03FF => greek += 1,
            _ => {}
        }
    }

    if letters == 0 {
        return AUTO_DETECT;
    }
    let majority = |count: usize| count * 2 > letters;
    if majority(hiragana_katakana) {
        "ja"
    } else if majority(hangul) {
        "ko"
    } else if majority(greek) {
        "el"
    } else {
        AUTO_DETECT
    }
}
