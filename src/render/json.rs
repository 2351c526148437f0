//! JSON rendering for outline records.
//!
//! Keys keep declaration order (`title`, then `outline`; `level`, `text`,
//! `page` per heading) and non-ASCII text is written as UTF-8, not escaped.

use std::io::Write;

use crate::error::{Error, Result};
use crate::model::OutlineRecord;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with two-space indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert an outline record to JSON.
pub fn to_json(record: &OutlineRecord, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(record),
        JsonFormat::Compact => serde_json::to_string(record),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Write an outline record as JSON, followed by a newline.
pub fn write_json<W: Write>(record: &OutlineRecord, format: JsonFormat, mut writer: W) -> Result<()> {
    let json = to_json(record, format)?;
    writer.write_all(json.as_bytes())?;
    writer.write_all(b"\n")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HeadingCandidate, HeadingLevel};

    fn record() -> OutlineRecord {
        OutlineRecord::new(
            "Rapport annuel 2024 – Übersicht",
            vec![HeadingCandidate::new(HeadingLevel::H1, "1. Introduction", 1)],
        )
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&record(), JsonFormat::Pretty).unwrap();
        let expected = r#"{
  "title": "Rapport annuel 2024 – Übersicht",
  "outline": [
    {
      "level": "H1",
      "text": "1. Introduction",
      "page": 1
    }
  ]
}"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&OutlineRecord::default(), JsonFormat::Compact).unwrap();
        assert_eq!(json, r#"{"title":"","outline":[]}"#);
    }

    #[test]
    fn test_write_json_round_trip() {
        let mut buffer = Vec::new();
        write_json(&record(), JsonFormat::Compact, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.ends_with("}\n"));
        let parsed: OutlineRecord = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, record());
    }
}
