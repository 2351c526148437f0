//! Typography statistics and body-text detection.

use std::collections::HashMap;

use crate::model::{Fragment, TypographySignature};
use crate::text::char_len;

/// Frequency of one signature within a document.
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureCount {
    pub signature: TypographySignature,
    /// Number of fragments with this signature
    pub count: usize,
    /// Total cleaned characters across those fragments
    pub chars: usize,
}

/// Signature frequencies, kept in first-encountered order.
#[derive(Debug, Clone, Default)]
pub struct SignatureHistogram {
    entries: Vec<SignatureCount>,
    index: HashMap<TypographySignature, usize>,
}

impl SignatureHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a histogram over the given fragments.
    pub fn from_fragments<'a, I>(fragments: I) -> Self
    where
        I: IntoIterator<Item = &'a Fragment>,
    {
        let mut histogram = Self::new();
        for fragment in fragments {
            histogram.add(fragment);
        }
        histogram
    }

    /// Record one fragment observation.
    pub fn add(&mut self, fragment: &Fragment) {
        let chars = char_len(&fragment.cleaned_text());
        let signature = fragment.signature();
        match self.index.get(&signature) {
            Some(&i) => {
                let entry = &mut self.entries[i];
                entry.count += 1;
                entry.chars += chars;
            }
            None => {
                self.index.insert(signature.clone(), self.entries.len());
                self.entries.push(SignatureCount {
                    signature,
                    count: 1,
                    chars,
                });
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct signatures.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn count(&self, signature: &TypographySignature) -> usize {
        self.index
            .get(signature)
            .map(|&i| self.entries[i].count)
            .unwrap_or(0)
    }

    /// Entries in first-encountered order.
    pub fn entries(&self) -> &[SignatureCount] {
        &self.entries
    }

    /// Entries by descending count; equal counts keep first-encountered order.
    pub fn by_frequency(&self) -> Vec<&SignatureCount> {
        let mut sorted: Vec<&SignatureCount> = self.entries.iter().collect();
        sorted.sort_by(|a, b| b.count.cmp(&a.count));
        sorted
    }

    /// The statistical mode; ties go to the first-encountered signature.
    pub fn most_common(&self) -> Option<&SignatureCount> {
        self.by_frequency().into_iter().next()
    }
}

/// Strategy for picking the signature that represents body text.
///
/// The classifier excludes whatever this returns from the heading ranking.
pub trait BodyTextStrategy: Send + Sync + std::fmt::Debug {
    /// Pick the body-text signature, or `None` to exclude nothing.
    fn body_signature(&self, histogram: &SignatureHistogram) -> Option<TypographySignature>;
}

/// Body text is the signature with the most fragments.
#[derive(Debug, Clone, Copy, Default)]
pub struct MostFrequentSignature;

impl BodyTextStrategy for MostFrequentSignature {
    fn body_signature(&self, histogram: &SignatureHistogram) -> Option<TypographySignature> {
        histogram.most_common().map(|e| e.signature.clone())
    }
}

/// Body text is the signature carrying the most characters.
///
/// Useful for heading-heavy documents where short heading lines outnumber
/// long paragraph spans.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextVolumeSignature;

impl BodyTextStrategy for TextVolumeSignature {
    fn body_signature(&self, histogram: &SignatureHistogram) -> Option<TypographySignature> {
        let mut best: Option<&SignatureCount> = None;
        for entry in histogram.entries() {
            if best.map_or(true, |b| entry.chars > b.chars) {
                best = Some(entry);
            }
        }
        best.map(|e| e.signature.clone())
    }
}
