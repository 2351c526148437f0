//! Tunable thresholds for title and heading inference.

use crate::model::HeadingLevel;
use crate::text::HeadingPattern;

/// Options for locating the title on the first page.
#[derive(Debug, Clone)]
pub struct TitleConfig {
    /// Fraction of the first page's text extent treated as the top band
    pub band_ratio: f32,

    /// Fragments must have more than this many characters to be considered
    pub min_text_len: usize,

    /// Font size tolerance when re-matching the title typography
    pub size_tolerance: f32,

    /// Successive title lines must be closer than this multiple of the title font size
    pub gap_multiplier: f32,
}

impl TitleConfig {
    /// Create title options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the top band ratio.
    pub fn with_band_ratio(mut self, ratio: f32) -> Self {
        self.band_ratio = ratio;
        self
    }

    /// Set the font size tolerance.
    pub fn with_size_tolerance(mut self, tolerance: f32) -> Self {
        self.size_tolerance = tolerance;
        self
    }

    /// Set the line gap multiplier.
    pub fn with_gap_multiplier(mut self, multiplier: f32) -> Self {
        self.gap_multiplier = multiplier;
        self
    }
}

impl Default for TitleConfig {
    fn default() -> Self {
        Self {
            band_ratio: 0.35,
            min_text_len: 2,
            size_tolerance: 0.1,
            gap_multiplier: 2.5,
        }
    }
}

/// Options for classifying heading fragments.
#[derive(Debug, Clone)]
pub struct HeadingConfig {
    /// Number of heading levels to assign (1-3)
    pub levels: usize,

    /// Fragments must have more than this many characters to enter the statistics
    pub min_fragment_len: usize,

    /// Shortest accepted heading text
    pub min_heading_len: usize,

    /// Longest accepted heading text
    pub max_heading_len: usize,

    /// Minimum fraction of capitalized words for text that doesn't match the pattern
    pub min_capitalization_ratio: f32,

    /// Heading-like text pattern
    pub pattern: HeadingPattern,
}

impl HeadingConfig {
    /// Create heading options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of heading levels (clamped to 1-3).
    pub fn with_levels(mut self, levels: usize) -> Self {
        self.levels = levels.clamp(1, HeadingLevel::COUNT);
        self
    }

    /// Set the accepted heading length range.
    pub fn with_length_range(mut self, min: usize, max: usize) -> Self {
        self.min_heading_len = min;
        self.max_heading_len = max;
        self
    }

    /// Set the minimum capitalization ratio.
    pub fn with_min_capitalization_ratio(mut self, ratio: f32) -> Self {
        self.min_capitalization_ratio = ratio;
        self
    }

    /// Set the heading-like text pattern.
    pub fn with_pattern(mut self, pattern: HeadingPattern) -> Self {
        self.pattern = pattern;
        self
    }
}

impl Default for HeadingConfig {
    fn default() -> Self {
        Self {
            levels: HeadingLevel::COUNT,
            min_fragment_len: 8,
            min_heading_len: 8,
            max_heading_len: 120,
            min_capitalization_ratio: 0.5,
            pattern: HeadingPattern::default(),
        }
    }
}

/// Combined analysis options.
#[derive(Debug, Clone, Default)]
pub struct AnalysisConfig {
    pub title: TitleConfig,
    pub heading: HeadingConfig,
}

impl AnalysisConfig {
    /// Create analysis options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set title options.
    pub fn with_title(mut self, title: TitleConfig) -> Self {
        self.title = title;
        self
    }

    /// Set heading options.
    pub fn with_heading(mut self, heading: HeadingConfig) -> Self {
        self.heading = heading;
        self
    }
}
