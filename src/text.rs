//! Text normalization helpers shared by the extractors and the analysis core.

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Default heading-like pattern: a leading enumerator ("1.") or a capitalized
/// phrase optionally ending in a colon. Anchored at the start only.
pub const DEFAULT_HEADING_PATTERN: &str = r"^(\d+\.|[A-Z][A-Za-z0-9\- ]+:?)";

/// Collapse runs of whitespace into single spaces and trim both ends.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Length in characters (not bytes).
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Fraction of whitespace-separated words whose first character is uppercase.
///
/// Returns 0.0 for text without words.
pub fn capitalization_ratio(text: &str) -> f32 {
    let mut words = 0usize;
    let mut capitalized = 0usize;
    for word in text.split_whitespace() {
        words += 1;
        if word.chars().next().is_some_and(char::is_uppercase) {
            capitalized += 1;
        }
    }
    capitalized as f32 / words.max(1) as f32
}

/// NFC-normalize text decoded from a content stream.
pub fn normalize_unicode(text: &str) -> String {
    text.nfc().collect()
}

/// Matcher for heading-like text.
#[derive(Debug, Clone)]
pub struct HeadingPattern {
    regex: Regex,
}

impl HeadingPattern {
    /// Compile a custom pattern.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl Default for HeadingPattern {
    fn default() -> Self {
        Self {
            regex: Regex::new(DEFAULT_HEADING_PATTERN).expect("default heading pattern compiles"),
        }
    }
}

/// Check if character is from a script that doesn't use word spaces.
///
/// Chinese and Japanese don't use spaces between words, but Korean does.
pub fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and Extension A
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    // Extensions B-F
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}
