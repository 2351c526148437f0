//! Outline records produced by the analysis pipeline.

use serde::{Deserialize, Serialize};

use super::BoundingBox;

/// Heading level, ranked by descending typographic salience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// Number of levels the outline supports.
    pub const COUNT: usize = 3;

    /// Level for a zero-based salience rank (0 → H1).
    pub fn from_rank(rank: usize) -> Option<Self> {
        match rank {
            0 => Some(HeadingLevel::H1),
            1 => Some(HeadingLevel::H2),
            2 => Some(HeadingLevel::H3),
            _ => None,
        }
    }

    /// Numeric level (1-3).
    pub fn number(&self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
        }
    }
}

impl std::fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified heading anchored to a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingCandidate {
    pub level: HeadingLevel,
    pub text: String,
    pub page: u32,
}

impl HeadingCandidate {
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
        }
    }
}

/// The located title and the area it covers on the first page.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TitleResult {
    pub text: String,
    pub bbox: Option<BoundingBox>,
}

impl TitleResult {
    /// The result for a document without a usable first page.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Final per-document output: `{title, outline}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutlineRecord {
    pub title: String,
    pub outline: Vec<HeadingCandidate>,
}

impl OutlineRecord {
    pub fn new(title: impl Into<String>, outline: Vec<HeadingCandidate>) -> Self {
        Self {
            title: title.into(),
            outline,
        }
    }

    /// Number of headings in the outline.
    pub fn heading_count(&self) -> usize {
        self.outline.len()
    }

    /// Headings of a given level, in outline order.
    pub fn headings_at(&self, level: HeadingLevel) -> impl Iterator<Item = &HeadingCandidate> {
        self.outline.iter().filter(move |h| h.level == level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_level_rank() {
        assert_eq!(HeadingLevel::from_rank(0), Some(HeadingLevel::H1));
        assert_eq!(HeadingLevel::from_rank(2), Some(HeadingLevel::H3));
        assert_eq!(HeadingLevel::from_rank(3), None);
        assert_eq!(HeadingLevel::H2.number(), 2);
        assert!(HeadingLevel::H1 < HeadingLevel::H3);
    }

    #[test]
    fn test_heading_level_serializes_as_label() {
        let json = serde_json::to_string(&HeadingLevel::H2).unwrap();
        assert_eq!(json, "\"H2\"");
    }

    #[test]
    fn test_record_key_order() {
        let record = OutlineRecord::new(
            "Title",
            vec![HeadingCandidate::new(HeadingLevel::H1, "Intro", 1)],
        );
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"title":"Title","outline":[{"level":"H1","text":"Intro","page":1}]}"#
        );
        assert_eq!(record.headings_at(HeadingLevel::H1).count(), 1);
        assert_eq!(record.headings_at(HeadingLevel::H2).count(), 0);
    }

    #[test]
    fn test_empty_title() {
        let title = TitleResult::empty();
        assert!(title.is_empty());
        assert!(title.bbox.is_none());
    }
}
