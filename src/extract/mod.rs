//! Fragment collaborators.
//!
//! Extractors turn a page-oriented source into the flat, page-major fragment
//! list the analysis consumes. Two sources ship with the crate:
//!
//! - [`PdfExtractor`] reads text spans straight from PDF content streams
//! - [`OcrDocument`] converts Tesseract TSV output of rasterized pages
//!
//! Malformed fragments are rejected here, at the boundary, so the analysis
//! can assume well-formed input.

mod backend;
mod ocr;
mod pdf;

pub use backend::{
    decode_text_simple, BackendFontInfo, ContentOp, LopdfBackend, PageId, PdfBackend, PdfValue,
};
pub use ocr::{group_lines, parse_tsv, OcrDocument, OcrLine, OcrOptions, OcrWord};
pub use pdf::PdfExtractor;

use std::ops::RangeInclusive;

use crate::error::{Error, Result};
use crate::model::Fragment;

/// Anything that can produce a document's fragments.
pub trait FragmentSource {
    /// Produce all fragments in page-major extraction order.
    ///
    /// A collaborator failure is a hard error; a partial fragment list is
    /// never returned.
    fn fragments(&self) -> Result<Vec<Fragment>>;
}

impl FragmentSource for [Fragment] {
    fn fragments(&self) -> Result<Vec<Fragment>> {
        Ok(self.to_vec())
    }
}

impl FragmentSource for Vec<Fragment> {
    fn fragments(&self) -> Result<Vec<Fragment>> {
        Ok(self.clone())
    }
}

/// Options for extracting fragments from PDF documents.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Whether to process pages in parallel
    pub parallel: bool,

    /// Page selection (which pages to extract)
    pub pages: PageSelection,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip pages that fail to extract).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            parallel: true,
            pages: PageSelection::All,
        }
    }
}

/// Error handling mode during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any page error
    #[default]
    Strict,
    /// Skip failing pages and continue
    Lenient,
}

/// Page selection for extraction.
///
/// Page numbers are 1-indexed, as users write them. Extracted fragments carry
/// zero-based page indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// Extract all pages
    #[default]
    All,
    /// Extract a range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Extract specific pages (1-indexed)
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        let invalid = || Error::InvalidPageRange(s.to_string());

        if let Some((start, end)) = s.split_once('-') {
            if !start.contains(',') && !end.contains(',') {
                let start = parse_page_number(start).ok_or_else(invalid)?;
                let end = parse_page_number(end).ok_or_else(invalid)?;
                if start > end {
                    return Err(invalid());
                }
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut pages = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if let Some((start, end)) = part.split_once('-') {
                let start = parse_page_number(start).ok_or_else(invalid)?;
                let end = parse_page_number(end).ok_or_else(invalid)?;
                if start > end {
                    return Err(invalid());
                }
                pages.extend(start..=end);
            } else {
                pages.push(parse_page_number(part).ok_or_else(invalid)?);
            }
        }

        pages.sort_unstable();
        pages.dedup();
        Ok(PageSelection::Pages(pages))
    }
}

/// Pages are 1-indexed; zero is rejected.
fn parse_page_number(s: &str) -> Option<u32> {
    s.trim().parse::<u32>().ok().filter(|&p| p > 0)
}
