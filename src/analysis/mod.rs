//! Layout-to-structure inference.
//!
//! The analysis turns one document's fragments into an [`OutlineRecord`]:
//!
//! - [`TitleLocator`] finds the title group on the first page
//! - [`HeadingClassifier`] ranks typography into H1..H3 and labels fragments
//! - [`merge_headings`] joins headings wrapped across lines
//!
//! Every step is a pure function of its input. Documents share no state, so
//! callers may analyze them on as many threads as they like.

mod config;
mod headings;
mod merge;
mod stats;
mod title;

pub use config::{AnalysisConfig, HeadingConfig, TitleConfig};
pub use headings::{HeadingClassifier, HeadingRanking, RankedSignature};
pub use merge::merge_headings;
pub use stats::{
    BodyTextStrategy, MostFrequentSignature, SignatureCount, SignatureHistogram,
    TextVolumeSignature,
};
pub use title::TitleLocator;

use crate::model::{Fragment, OutlineRecord, TitleResult};

/// Combines title location and heading classification into one record.
#[derive(Debug, Clone, Default)]
pub struct OutlineAnalyzer {
    title: TitleLocator,
    headings: HeadingClassifier,
}

impl OutlineAnalyzer {
    /// Create an analyzer with the given thresholds.
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            title: TitleLocator::new(config.title),
            headings: HeadingClassifier::new(config.heading),
        }
    }

    /// Replace the body-text detection strategy.
    pub fn with_body_strategy(mut self, strategy: impl BodyTextStrategy + 'static) -> Self {
        self.headings = self.headings.with_body_strategy(strategy);
        self
    }

    /// Locate the title only.
    pub fn title(&self, fragments: &[Fragment]) -> TitleResult {
        self.title.locate(fragments)
    }

    /// Infer the full outline of one document.
    ///
    /// An empty fragment list yields an empty title and outline.
    pub fn analyze(&self, fragments: &[Fragment]) -> OutlineRecord {
        let title = self.title.locate(fragments);
        let outline = merge_headings(self.headings.classify(fragments));
        log::debug!(
            "Outline inferred: title {:?}, {} headings from {} fragments",
            title.text,
            outline.len(),
            fragments.len()
        );
        OutlineRecord::new(title.text, outline)
    }
}

/// Infer an outline with default thresholds.
pub fn infer_outline(fragments: &[Fragment]) -> OutlineRecord {
    OutlineAnalyzer::default().analyze(fragments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundingBox, HeadingCandidate, HeadingLevel};

    fn at(page: u32, text: &str, size: f32, font: &str, y: f32) -> Fragment {
        Fragment::new(page, text, size, font, BoundingBox::new(72.0, y, 400.0, y + size))
    }

    #[test]
    fn test_empty_document() {
        let record = infer_outline(&[]);
        assert_eq!(record, OutlineRecord::default());
    }

    #[test]
    fn test_wrapped_heading_is_merged() {
        let mut fragments = vec![
            at(0, "Field Guide", 26.0, "Bold", 60.0),
            at(1, "Chapter One About", 20.0, "Bold", 60.0),
            at(1, "Mountain Birds", 20.0, "Bold", 84.0),
        ];
        for i in 0..6 {
            fragments.push(at(1, "plain paragraph text follows here", 10.0, "Serif", 200.0 + i as f32 * 14.0));
        }

        let record = infer_outline(&fragments);
        assert_eq!(record.title, "Field Guide");
        assert_eq!(
            record.outline,
            vec![HeadingCandidate::new(HeadingLevel::H1, "Chapter One About Mountain Birds", 1)]
        );
    }

    #[test]
    fn test_custom_config() {
        let config = AnalysisConfig::new().with_heading(HeadingConfig::new().with_length_range(8, 12));
        let analyzer = OutlineAnalyzer::new(config);
        let mut fragments = vec![
            at(1, "Short Head", 16.0, "Bold", 40.0),
            at(1, "A Much Longer Heading", 16.0, "Bold", 80.0),
        ];
        for i in 0..4 {
            fragments.push(at(1, "plain paragraph text follows here", 10.0, "Serif", 200.0 + i as f32 * 14.0));
        }

        let record = analyzer.analyze(&fragments);
        assert_eq!(record.title, "");
        assert_eq!(record.outline, vec![HeadingCandidate::new(HeadingLevel::H1, "Short Head", 1)]);
    }
}
