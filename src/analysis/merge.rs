//! Joining of headings wrapped across several lines.

use crate::model::HeadingCandidate;

/// Merge consecutive candidates that share page and level.
///
/// Texts are joined with a single space. Merging an already merged list
/// returns it unchanged.
pub fn merge_headings(candidates: Vec<HeadingCandidate>) -> Vec<HeadingCandidate> {
    let mut merged: Vec<HeadingCandidate> = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        match merged.last_mut() {
            Some(last) if last.page == candidate.page && last.level == candidate.level => {
                last.text.push(' ');
                last.text.push_str(&candidate.text);
            }
            _ => merged.push(candidate),
        }
    }

    merged
}
