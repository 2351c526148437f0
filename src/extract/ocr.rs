//! Fragments from OCR output.
//!
//! Rasterized pages are recognized by Tesseract (`tesseract page.png out tsv`).
//! Each TSV row is one recognition unit; only word rows carry text. Words are
//! grouped into lines, and each line becomes a fragment whose font size is the
//! line's pixel height.

use crate::error::{Error, Result};
use crate::model::{BoundingBox, Fragment};
use crate::text::{clean_text, normalize_unicode};

use super::FragmentSource;

/// Columns in a Tesseract TSV row.
const TSV_COLUMNS: usize = 12;

/// Options for converting recognized pages into fragments.
#[derive(Debug, Clone)]
pub struct OcrOptions {
    /// Rasterization zoom factor; pixel geometry is divided by it
    pub zoom: f32,

    /// Words below this confidence (0-100) are discarded
    pub min_confidence: f32,

    /// Font name given to every OCR fragment
    pub font_name: String,
}

impl OcrOptions {
    /// Create OCR options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rasterization zoom factor.
    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.zoom = zoom;
        self
    }

    /// Set the confidence floor.
    pub fn with_min_confidence(mut self, confidence: f32) -> Self {
        self.min_confidence = confidence;
        self
    }

    /// Set the font name assigned to fragments.
    pub fn with_font_name(mut self, name: impl Into<String>) -> Self {
        self.font_name = name.into();
        self
    }
}

impl Default for OcrOptions {
    fn default() -> Self {
        Self {
            zoom: 3.0,
            min_confidence: 70.0,
            font_name: "ocr".to_string(),
        }
    }
}

/// One row of Tesseract TSV output.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrWord {
    pub level: u32,
    pub block_num: u32,
    pub par_num: u32,
    pub line_num: u32,
    pub word_num: u32,
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    /// Recognition confidence, -1 for non-word rows
    pub conf: f32,
    pub text: String,
}

/// Parse Tesseract TSV output for one page.
///
/// The header row is optional. Rows with missing or non-numeric columns are
/// an error; the text column may be empty.
pub fn parse_tsv(input: &str) -> Result<Vec<OcrWord>> {
    let mut words = Vec::new();

    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        if line.trim().is_empty() || (index == 0 && line.starts_with("level")) {
            continue;
        }

        let columns: Vec<&str> = line.splitn(TSV_COLUMNS, '\t').collect();
        if columns.len() < TSV_COLUMNS - 1 {
            return Err(Error::Ocr(format!(
                "line {}: expected {} columns, found {}",
                line_no,
                TSV_COLUMNS,
                columns.len()
            )));
        }

        let int = |i: usize| -> Result<u32> {
            columns[i].trim().parse().map_err(|_| {
                Error::Ocr(format!("line {}: invalid number {:?}", line_no, columns[i]))
            })
        };
        let real = |i: usize| -> Result<f32> {
            columns[i].trim().parse().map_err(|_| {
                Error::Ocr(format!("line {}: invalid number {:?}", line_no, columns[i]))
            })
        };

        // Column 1 is page_num; one input is always one page.
        words.push(OcrWord {
            level: int(0)?,
            block_num: int(2)?,
            par_num: int(3)?,
            line_num: int(4)?,
            word_num: int(5)?,
            left: real(6)?,
            top: real(7)?,
            width: real(8)?,
            height: real(9)?,
            conf: real(10)?,
            text: columns.get(11).map(|t| t.trim().to_string()).unwrap_or_default(),
        });
    }

    Ok(words)
}

/// A recognized text line in pixel space.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrLine {
    pub text: String,
    pub bbox: BoundingBox,
    /// Tallest word height in the line
    pub height: f32,
}

/// Group confident words into lines, in order of first appearance.
///
/// Words are keyed by (block, paragraph, line). Empty words and words below
/// `min_confidence` are dropped.
pub fn group_lines(words: &[OcrWord], min_confidence: f32) -> Vec<OcrLine> {
    let mut keys: Vec<(u32, u32, u32)> = Vec::new();
    let mut lines: Vec<(Vec<&str>, BoundingBox, f32)> = Vec::new();

    for word in words {
        if word.text.is_empty() || word.conf < min_confidence {
            continue;
        }
        let bbox = BoundingBox::new(
            word.left,
            word.top,
            word.left + word.width,
            word.top + word.height,
        );
        let key = (word.block_num, word.par_num, word.line_num);

        match keys.iter().position(|k| *k == key) {
            Some(i) => {
                let line = &mut lines[i];
                line.0.push(word.text.as_str());
                line.1 = line.1.union(&bbox);
                line.2 = line.2.max(word.height);
            }
            None => {
                keys.push(key);
                lines.push((vec![word.text.as_str()], bbox, word.height));
            }
        }
    }

    lines
        .into_iter()
        .map(|(texts, bbox, height)| OcrLine {
            text: clean_text(&texts.join(" ")),
            bbox,
            height,
        })
        .collect()
}

/// Recognized pages of one document.
#[derive(Debug, Clone)]
pub struct OcrDocument {
    pages: Vec<Vec<OcrWord>>,
    options: OcrOptions,
}

impl OcrDocument {
    /// Build from already parsed pages, first page first.
    pub fn new(pages: Vec<Vec<OcrWord>>, options: OcrOptions) -> Self {
        Self { pages, options }
    }

    /// Parse one TSV document per page, first page first.
    pub fn from_tsv_pages<I, S>(pages: I, options: OcrOptions) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let pages = pages
            .into_iter()
            .enumerate()
            .map(|(i, tsv)| {
                parse_tsv(tsv.as_ref()).map_err(|e| Error::Ocr(format!("page {}: {}", i + 1, e)))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(pages, options))
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Convert recognized lines to fragments in page space.
    pub fn to_fragments(&self) -> Result<Vec<Fragment>> {
        let zoom = self.options.zoom;
        if !zoom.is_finite() || zoom <= 0.0 {
            return Err(Error::Ocr(format!("zoom must be positive, got {}", zoom)));
        }

        let mut fragments = Vec::new();
        for (page, words) in self.pages.iter().enumerate() {
            for line in group_lines(words, self.options.min_confidence) {
                let bbox = BoundingBox::new(
                    line.bbox.x0 / zoom,
                    line.bbox.y0 / zoom,
                    line.bbox.x1 / zoom,
                    line.bbox.y1 / zoom,
                );
                let fragment = Fragment::new(
                    page as u32,
                    normalize_unicode(&line.text),
                    line.height / zoom,
                    self.options.font_name.clone(),
                    bbox,
                );
                match fragment.validate() {
                    Ok(()) => fragments.push(fragment),
                    Err(e) => log::warn!("Skipping OCR line: {}", e),
                }
            }
        }

        log::debug!(
            "Converted {} OCR pages into {} fragments",
            self.pages.len(),
            fragments.len()
        );
        Ok(fragments)
    }
}

impl FragmentSource for OcrDocument {
    fn fragments(&self) -> Result<Vec<Fragment>> {
        self.to_fragments()
    }
}
