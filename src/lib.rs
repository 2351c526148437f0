//! # pdfoutline
//!
//! Infer a document outline (a title and H1-H3 headings) from the typography
//! of PDF text.
//!
//! PDFs rarely carry reliable structure tags, but their typography does:
//! headings are set larger than body text, and the title dominates the top of
//! the first page. This crate extracts positioned text fragments and turns
//! their font statistics into an outline record.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfoutline::{extract_outline, render, JsonFormat};
//!
//! fn main() -> pdfoutline::Result<()> {
//!     let record = extract_outline("report.pdf")?;
//!     println!("{}", render::to_json(&record, JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Extraction** ([`extract`]): PDF content streams or OCR output become
//!   [`Fragment`]s carrying text, font, size and position
//! - **Analysis** ([`analysis`]): title location, heading classification and
//!   merging of wrapped headings
//! - **Output** ([`render`], [`batch`]): JSON or Markdown, per file or for a
//!   whole directory

pub mod analysis;
pub mod batch;
pub mod detect;
pub mod error;
pub mod extract;
pub mod model;
pub mod render;
pub mod text;

// Re-export commonly used types
pub use analysis::{
    infer_outline, AnalysisConfig, BodyTextStrategy, HeadingClassifier, HeadingConfig,
    OutlineAnalyzer, TitleConfig, TitleLocator,
};
pub use batch::{BatchOptions, BatchReport};
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_pdf, PdfFormat};
pub use error::{Error, Result};
pub use extract::{
    ErrorMode, ExtractOptions, FragmentSource, OcrDocument, OcrOptions, PageSelection,
    PdfExtractor,
};
pub use model::{
    BoundingBox, Fragment, HeadingCandidate, HeadingLevel, OutlineRecord, Point, TitleResult,
    TypographySignature,
};
pub use render::JsonFormat;

use std::path::Path;

/// Extract the outline of a PDF file with default options.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::extract_outline;
///
/// let record = extract_outline("report.pdf").unwrap();
/// println!("{}: {} headings", record.title, record.heading_count());
/// ```
pub fn extract_outline<P: AsRef<Path>>(path: P) -> Result<OutlineRecord> {
    PdfOutline::new().outline(path)
}

/// Extract the outline of a PDF held in memory.
pub fn extract_outline_from_bytes(data: &[u8]) -> Result<OutlineRecord> {
    PdfOutline::new().outline_bytes(data)
}

/// Extract the positioned text fragments of a PDF file.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::{extract_fragments, ExtractOptions, PageSelection};
///
/// let options = ExtractOptions::new().with_pages(PageSelection::Range(1..=2));
/// for fragment in extract_fragments("report.pdf", options).unwrap() {
///     println!("{} {} {}", fragment.page, fragment.font_size, fragment.text);
/// }
/// ```
pub fn extract_fragments<P: AsRef<Path>>(path: P, options: ExtractOptions) -> Result<Vec<Fragment>> {
    PdfExtractor::open(path, options)?.extract()
}

/// Infer an outline from any fragment source.
pub fn outline_from_source<S: FragmentSource + ?Sized>(
    source: &S,
    analyzer: &OutlineAnalyzer,
) -> Result<OutlineRecord> {
    let fragments = source.fragments()?;
    Ok(analyzer.analyze(&fragments))
}

/// Builder combining extraction options and analysis thresholds.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::{HeadingConfig, PdfOutline};
///
/// let record = PdfOutline::new()
///     .lenient()
///     .with_heading(HeadingConfig::new().with_levels(2))
///     .outline("report.pdf")?;
/// # Ok::<(), pdfoutline::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct PdfOutline {
    extract: ExtractOptions,
    analysis: AnalysisConfig,
}

impl PdfOutline {
    /// Create a builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip pages that fail to extract instead of failing the document.
    pub fn lenient(mut self) -> Self {
        self.extract = self.extract.lenient();
        self
    }

    /// Disable parallel page extraction.
    pub fn sequential(mut self) -> Self {
        self.extract = self.extract.sequential();
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.extract = self.extract.with_pages(pages);
        self
    }

    /// Set title detection thresholds.
    pub fn with_title(mut self, title: TitleConfig) -> Self {
        self.analysis = self.analysis.with_title(title);
        self
    }

    /// Set heading classification thresholds.
    pub fn with_heading(mut self, heading: HeadingConfig) -> Self {
        self.analysis = self.analysis.with_heading(heading);
        self
    }

    fn analyzer(&self) -> OutlineAnalyzer {
        OutlineAnalyzer::new(self.analysis.clone())
    }

    /// Outline a PDF file.
    pub fn outline<P: AsRef<Path>>(&self, path: P) -> Result<OutlineRecord> {
        let extractor = PdfExtractor::open(path, self.extract.clone())?;
        outline_from_source(&extractor, &self.analyzer())
    }

    /// Outline a PDF from bytes.
    pub fn outline_bytes(&self, data: &[u8]) -> Result<OutlineRecord> {
        let extractor = PdfExtractor::from_bytes(data, self.extract.clone())?;
        outline_from_source(&extractor, &self.analyzer())
    }

    /// Outline a document already recognized by OCR.
    pub fn outline_ocr(&self, document: &OcrDocument) -> Result<OutlineRecord> {
        outline_from_source(document, &self.analyzer())
    }
}
