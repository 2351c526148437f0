//! Heading classification by typographic salience.
//!
//! Per document, the body-text signature is excluded and the largest
//! remaining signatures become H1..H3. Matching fragments on pages after the
//! first are filtered for heading-like text and emitted in reading order.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::model::{Fragment, HeadingCandidate, HeadingLevel, TypographySignature};
use crate::text::{capitalization_ratio, char_len};

use super::config::HeadingConfig;
use super::stats::{BodyTextStrategy, MostFrequentSignature, SignatureHistogram};

/// A heading signature and the level it was assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedSignature {
    pub signature: TypographySignature,
    pub level: HeadingLevel,
    /// Number of fragments carrying this signature
    pub count: usize,
}

/// Heading levels chosen for one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadingRanking {
    /// Signature assumed to be body text
    pub body: Option<TypographySignature>,
    /// Heading signatures, largest font first
    pub levels: Vec<RankedSignature>,
}

impl HeadingRanking {
    /// Level assigned to an exact signature.
    pub fn level_of(&self, signature: &TypographySignature) -> Option<HeadingLevel> {
        self.levels
            .iter()
            .find(|r| &r.signature == signature)
            .map(|r| r.level)
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Classifies fragments into H1/H2/H3 heading candidates.
#[derive(Debug, Clone)]
pub struct HeadingClassifier {
    config: HeadingConfig,
    body: Arc<dyn BodyTextStrategy>,
}

impl Default for HeadingClassifier {
    fn default() -> Self {
        Self::new(HeadingConfig::default())
    }
}

impl HeadingClassifier {
    /// Create a classifier using the most frequent signature as body text.
    pub fn new(config: HeadingConfig) -> Self {
        Self {
            config,
            body: Arc::new(MostFrequentSignature),
        }
    }

    /// Replace the body-text detection strategy.
    pub fn with_body_strategy(mut self, strategy: impl BodyTextStrategy + 'static) -> Self {
        self.body = Arc::new(strategy);
        self
    }

    pub fn config(&self) -> &HeadingConfig {
        &self.config
    }

    /// Fragments that take part in the heading statistics: pages after the
    /// first, with enough text to matter.
    fn eligible<'a>(&self, fragments: &'a [Fragment]) -> Vec<&'a Fragment> {
        fragments
            .iter()
            .filter(|f| f.page > 0 && char_len(&f.cleaned_text()) > self.config.min_fragment_len)
            .collect()
    }

    /// Determine the body signature and rank the heading signatures.
    pub fn rank(&self, fragments: &[Fragment]) -> HeadingRanking {
        let eligible = self.eligible(fragments);
        self.rank_eligible(&eligible)
    }

    fn rank_eligible(&self, eligible: &[&Fragment]) -> HeadingRanking {
        let histogram = SignatureHistogram::from_fragments(eligible.iter().copied());
        if histogram.is_empty() {
            return HeadingRanking::default();
        }

        let body = self.body.body_signature(&histogram);
        let mut candidates: Vec<_> = histogram
            .by_frequency()
            .into_iter()
            .filter(|e| Some(&e.signature) != body.as_ref())
            .collect();
        // Stable: equal sizes keep frequency order.
        candidates.sort_by(|a, b| {
            b.signature
                .font_size
                .partial_cmp(&a.signature.font_size)
                .unwrap_or(Ordering::Equal)
        });

        let levels = candidates
            .into_iter()
            .take(self.config.levels.min(HeadingLevel::COUNT))
            .enumerate()
            .filter_map(|(rank, entry)| {
                HeadingLevel::from_rank(rank).map(|level| RankedSignature {
                    signature: entry.signature.clone(),
                    level,
                    count: entry.count,
                })
            })
            .collect::<Vec<_>>();

        if let Some(ref body) = body {
            log::debug!("Body text typography: {}", body);
        }
        for ranked in &levels {
            log::debug!(
                "{} typography: {} ({} fragments)",
                ranked.level,
                ranked.signature,
                ranked.count
            );
        }

        HeadingRanking { body, levels }
    }

    /// Classify heading candidates in reading order (page, then vertical position).
    pub fn classify(&self, fragments: &[Fragment]) -> Vec<HeadingCandidate> {
        let mut eligible = self.eligible(fragments);
        let ranking = self.rank_eligible(&eligible);
        if ranking.is_empty() {
            return Vec::new();
        }
        let level_map: HashMap<&TypographySignature, HeadingLevel> = ranking
            .levels
            .iter()
            .map(|r| (&r.signature, r.level))
            .collect();

        eligible.sort_by(|a, b| {
            a.page.cmp(&b.page).then_with(|| {
                a.origin
                    .y
                    .partial_cmp(&b.origin.y)
                    .unwrap_or(Ordering::Equal)
            })
        });

        let mut seen: HashSet<String> = HashSet::new();
        let mut headings = Vec::new();
        for fragment in eligible {
            let Some(&level) = level_map.get(&fragment.signature()) else {
                continue;
            };

            let text = fragment.cleaned_text();
            let len = char_len(&text);
            if len < self.config.min_heading_len || len > self.config.max_heading_len {
                continue;
            }
            if !seen.insert(text.to_lowercase()) {
                continue;
            }
            if !self.looks_like_heading(&text) {
                continue;
            }

            headings.push(HeadingCandidate::new(level, text, fragment.page));
        }

        headings
    }

    /// Capitalized enough, or shaped like a heading.
    fn looks_like_heading(&self, text: &str) -> bool {
        capitalization_ratio(text) >= self.config.min_capitalization_ratio
            || self.config.pattern.is_match(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::stats::TextVolumeSignature;
    use crate::model::BoundingBox;

    fn at(page: u32, text: &str, size: f32, font: &str, y: f32) -> Fragment {
        Fragment::new(page, text, size, font, BoundingBox::new(72.0, y, 300.0, y + size))
    }

    fn body(page: u32, y: f32) -> Fragment {
        at(page, "ordinary running body text here", 10.0, "Regular", y)
    }

    fn classify(fragments: &[Fragment]) -> Vec<HeadingCandidate> {
        HeadingClassifier::default().classify(fragments)
    }

    #[test]
    fn test_empty_input() {
        assert!(classify(&[]).is_empty());
        assert!(HeadingClassifier::default().rank(&[]).is_empty());
    }

    #[test]
    fn test_heading_text_is_cleaned() {
        let mut fragments: Vec<Fragment> = (0..5).map(|i| body(1, 200.0 + i as f32 * 12.0)).collect();
        // Emitted with whitespace collapsed.
        fragments.push(at(1, "   Storage \n  Layout    ", 16.0, "Bold", 50.0));
        // Padding does not lift a short heading over the length floor.
        fragments.push(at(1, "  Scope          ", 16.0, "Bold", 100.0));

        assert_eq!(
            classify(&fragments),
            vec![HeadingCandidate::new(HeadingLevel::H1, "Storage Layout", 1)]
        );
    }

    #[test]
    fn test_first_page_is_ignored() {
        let fragments = vec![at(0, "Cover Page Heading", 20.0, "Bold", 50.0), body(0, 100.0)];
        assert!(classify(&fragments).is_empty());
    }

    #[test]
    fn test_ranking_by_size() {
        let mut fragments: Vec<Fragment> = (0..10).map(|i| body(1, 200.0 + i as f32 * 12.0)).collect();
        fragments.push(at(1, "Small Heading Text", 12.0, "Bold", 150.0));
        fragments.push(at(1, "Chapter One Begins", 20.0, "Bold", 50.0));
        fragments.push(at(1, "Section Heading Text", 16.0, "Bold", 100.0));
        fragments.push(at(2, "Tiny Caption Label", 11.0, "Italic", 50.0));

        let ranking = HeadingClassifier::default().rank(&fragments);
        assert_eq!(ranking.body, Some(TypographySignature::new(10.0, "Regular")));
        let sizes: Vec<f32> = ranking.levels.iter().map(|r| r.signature.font_size).collect();
        assert_eq!(sizes, vec![20.0, 16.0, 12.0]);
        assert_eq!(
            ranking.level_of(&TypographySignature::new(16.0, "Bold")),
            Some(HeadingLevel::H2)
        );
        assert_eq!(ranking.level_of(&TypographySignature::new(11.0, "Italic")), None);

        let headings = classify(&fragments);
        assert_eq!(
            headings,
            vec![
                HeadingCandidate::new(HeadingLevel::H1, "Chapter One Begins", 1),
                HeadingCandidate::new(HeadingLevel::H2, "Section Heading Text", 1),
                HeadingCandidate::new(HeadingLevel::H3, "Small Heading Text", 1),
            ]
        );
    }

    #[test]
    fn test_fewer_than_three_levels() {
        let mut fragments: Vec<Fragment> = (0..5).map(|i| body(1, 200.0 + i as f32 * 12.0)).collect();
        fragments.push(at(1, "The Only Heading", 14.0, "Bold", 50.0));
        let headings = classify(&fragments);
        assert_eq!(headings, vec![HeadingCandidate::new(HeadingLevel::H1, "The Only Heading", 1)]);
    }

    #[test]
    fn test_length_bounds() {
        let long = format!("Heading {}", "X".repeat(112));
        assert_eq!(long.chars().count(), 120);
        let too_long = format!("{}Y", long);

        let mut fragments: Vec<Fragment> = (0..5).map(|i| body(1, 500.0 + i as f32 * 12.0)).collect();
        fragments.push(at(1, "Abcdefgh", 16.0, "Bold", 50.0));
        fragments.push(at(1, "Abcdefghi", 16.0, "Bold", 100.0));
        fragments.push(at(1, &long, 16.0, "Bold", 150.0));
        fragments.push(at(1, &too_long, 16.0, "Bold", 200.0));

        let texts: Vec<String> = classify(&fragments).into_iter().map(|h| h.text).collect();
        assert_eq!(texts, vec!["Abcdefghi".to_string(), long]);
    }

    #[test]
    fn test_minimum_length_after_prefilter() {
        // With the statistics pre-filter relaxed, the heading floor decides.
        let classifier = HeadingClassifier::new(HeadingConfig {
            min_fragment_len: 0,
            ..HeadingConfig::default()
        });
        let mut fragments: Vec<Fragment> = (0..5).map(|i| body(1, 500.0 + i as f32 * 12.0)).collect();
        fragments.push(at(1, "Abcdefg", 16.0, "Bold", 50.0));
        fragments.push(at(1, "Abcdefgh", 16.0, "Bold", 100.0));

        let texts: Vec<String> = classifier.classify(&fragments).into_iter().map(|h| h.text).collect();
        assert_eq!(texts, vec!["Abcdefgh".to_string()]);
    }

    #[test]
    fn test_deduplication_is_case_insensitive() {
        let mut fragments: Vec<Fragment> = (0..5).map(|i| body(1, 500.0 + i as f32 * 12.0)).collect();
        fragments.push(at(2, "Running Header Text", 14.0, "Bold", 20.0));
        fragments.push(at(1, "RUNNING HEADER TEXT", 14.0, "Bold", 20.0));
        fragments.push(at(3, "Running  Header Text", 14.0, "Bold", 20.0));

        let headings = classify(&fragments);
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].text, "RUNNING HEADER TEXT");
        assert_eq!(headings[0].page, 1);
    }

    #[test]
    fn test_sentence_fragments_are_rejected() {
        let mut fragments: Vec<Fragment> = (0..5).map(|i| body(1, 500.0 + i as f32 * 12.0)).collect();
        fragments.push(at(1, "which is why the results were ignored", 14.0, "Bold", 50.0));
        fragments.push(at(1, "2. methods and materials", 14.0, "Bold", 100.0));
        fragments.push(at(1, "Results and discussion", 14.0, "Bold", 150.0));

        let texts: Vec<String> = classify(&fragments).into_iter().map(|h| h.text).collect();
        assert_eq!(
            texts,
            vec![
                "2. methods and materials".to_string(),
                "Results and discussion".to_string()
            ]
        );
    }

    #[test]
    fn test_reading_order_across_levels() {
        let mut fragments: Vec<Fragment> = (0..8).map(|i| body(1, 500.0 + i as f32 * 12.0)).collect();
        fragments.push(at(3, "Third Page Heading", 20.0, "Bold", 40.0));
        fragments.push(at(2, "Second Page Subsection", 14.0, "Bold", 300.0));
        fragments.push(at(2, "Second Page Chapter", 20.0, "Bold", 100.0));

        let headings = classify(&fragments);
        let order: Vec<(u32, HeadingLevel)> = headings.iter().map(|h| (h.page, h.level)).collect();
        assert_eq!(
            order,
            vec![
                (2, HeadingLevel::H1),
                (2, HeadingLevel::H2),
                (3, HeadingLevel::H1)
            ]
        );
    }

    #[test]
    fn test_level_limit() {
        let classifier = HeadingClassifier::new(HeadingConfig::new().with_levels(1));
        let mut fragments: Vec<Fragment> = (0..5).map(|i| body(1, 500.0 + i as f32 * 12.0)).collect();
        fragments.push(at(1, "Large Heading Here", 20.0, "Bold", 50.0));
        fragments.push(at(1, "Smaller Heading Here", 14.0, "Bold", 100.0));

        let headings = classifier.classify(&fragments);
        assert_eq!(headings, vec![HeadingCandidate::new(HeadingLevel::H1, "Large Heading Here", 1)]);
    }

    #[test]
    fn test_alternative_body_strategy() {
        // Many short bold lines outnumber the body spans.
        let mut fragments: Vec<Fragment> = (0..6)
            .map(|i| at(1, &format!("Numbered Item {}", i), 12.0, "Bold", 50.0 + i as f32 * 20.0))
            .collect();
        fragments.push(at(
            1,
            "A long paragraph of running body text that clearly carries the most characters.",
            10.0,
            "Regular",
            400.0,
        ));
        fragments.push(at(
            1,
            "Another paragraph of ordinary prose continues below with more of the same words.",
            10.0,
            "Regular",
            420.0,
        ));
        fragments.push(at(1, "Major Section Title", 18.0, "Bold", 20.0));

        let default_levels = HeadingClassifier::default().rank(&fragments);
        assert_eq!(default_levels.body, Some(TypographySignature::new(12.0, "Bold")));

        let classifier = HeadingClassifier::default().with_body_strategy(TextVolumeSignature);
        let ranking = classifier.rank(&fragments);
        assert_eq!(ranking.body, Some(TypographySignature::new(10.0, "Regular")));
        assert_eq!(ranking.levels[0].signature, TypographySignature::new(18.0, "Bold"));
        assert_eq!(ranking.levels[1].signature, TypographySignature::new(12.0, "Bold"));
    }
}
