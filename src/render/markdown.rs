//! Markdown rendering for outline records.

use crate::model::{HeadingLevel, OutlineRecord};

/// Render an outline as a Markdown title plus a nested bullet list.
///
/// H1 entries start at the margin, H2 and H3 are indented by two and four
/// spaces. Page numbers are shown 1-based.
pub fn to_markdown(record: &OutlineRecord) -> String {
    let mut output = String::new();

    if !record.title.is_empty() {
        output.push_str("# ");
        output.push_str(&escape_markdown(&record.title));
        output.push_str("\n\n");
    }

    for heading in &record.outline {
        let indent = match heading.level {
            HeadingLevel::H1 => "",
            HeadingLevel::H2 => "  ",
            HeadingLevel::H3 => "    ",
        };
        output.push_str(&format!(
            "{}- {} (p. {})\n",
            indent,
            escape_markdown(&heading.text),
            heading.page + 1
        ));
    }

    output
}

fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' | '|' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}
