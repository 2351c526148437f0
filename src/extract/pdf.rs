//! Fragment extraction from PDF content streams.

use std::collections::HashMap;
use std::path::Path;

use rayon::prelude::*;

use crate::detect::detect_format_from_bytes;
use crate::error::{Error, Result};
use crate::model::{BoundingBox, Fragment};
use crate::text::{is_spaceless_script_char, normalize_unicode};

use super::backend::{LopdfBackend, PageId, PdfBackend, PdfValue};
use super::{ErrorMode, ExtractOptions, FragmentSource};

/// Fraction of the font size above the baseline.
const ASCENT: f32 = 0.8;
/// Fraction of the font size below the baseline.
const DESCENT: f32 = 0.2;
/// Estimated average glyph width as a fraction of the font size.
const GLYPH_WIDTH: f32 = 0.5;
/// TJ adjustment (thousandths of text space) treated as a word break.
const TJ_SPACE_THRESHOLD: f32 = 200.0;
/// Font size before any Tf operator.
const DEFAULT_FONT_SIZE: f32 = 12.0;
/// Horizontal gap (in ems) between joined shows that reads as a word break.
const WORD_GAP: f32 = TJ_SPACE_THRESHOLD / 1000.0;
/// Shows further apart than this (in ems) start a new fragment.
const SPAN_MAX_GAP: f32 = 3.0;
/// Baseline drift (in ems) still treated as the same line.
const BASELINE_TOLERANCE: f32 = 0.1;

/// Walks PDF pages and emits one [`Fragment`] per span: consecutive shows
/// sharing a font, size and baseline.
pub struct PdfExtractor<B: PdfBackend = LopdfBackend> {
    backend: B,
    options: ExtractOptions,
}

impl PdfExtractor<LopdfBackend> {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P, options: ExtractOptions) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data, options)
    }

    /// Parse a PDF from bytes.
    pub fn from_bytes(data: &[u8], options: ExtractOptions) -> Result<Self> {
        let format = detect_format_from_bytes(data)?;
        log::debug!("Loading {}", format);
        let backend = LopdfBackend::load_bytes(data)?;
        Ok(Self::with_backend(backend, options))
    }
}

impl<B: PdfBackend> PdfExtractor<B> {
    /// Use an already loaded backend.
    pub fn with_backend(backend: B, options: ExtractOptions) -> Self {
        Self { backend, options }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.backend.pages().len() as u32
    }

    /// Extract fragments from all selected pages, page-major.
    pub fn extract(&self) -> Result<Vec<Fragment>> {
        let pages: Vec<(u32, PageId)> = self
            .backend
            .pages()
            .into_iter()
            .filter(|(num, _)| self.options.pages.includes(*num))
            .collect();

        let results: Vec<(u32, Result<Vec<Fragment>>)> = if self.options.parallel {
            pages
                .par_iter()
                .map(|&(num, id)| (num, self.extract_page_id(num, id)))
                .collect()
        } else {
            pages
                .iter()
                .map(|&(num, id)| (num, self.extract_page_id(num, id)))
                .collect()
        };

        let mut fragments = Vec::new();
        for (page_num, result) in results {
            match result {
                Ok(page_fragments) => fragments.extend(page_fragments),
                Err(e) => {
                    if self.options.error_mode == ErrorMode::Strict {
                        return Err(e);
                    }
                    log::warn!("Failed to extract text from page {}: {}", page_num, e);
                }
            }
        }

        log::debug!("Extracted {} fragments from {} pages", fragments.len(), pages.len());
        Ok(fragments)
    }

    /// Extract fragments from one page (1-indexed page number).
    pub fn extract_page(&self, page_num: u32) -> Result<Vec<Fragment>> {
        let pages = self.backend.pages();
        let page_id = pages
            .get(&page_num)
            .ok_or(Error::PageOutOfRange(page_num, pages.len() as u32))?;
        self.extract_page_id(page_num, *page_id)
    }

    fn extract_page_id(&self, page_num: u32, page_id: PageId) -> Result<Vec<Fragment>> {
        let fonts: HashMap<Vec<u8>, String> = self
            .backend
            .page_fonts(page_id)?
            .into_iter()
            .map(|f| (f.name, f.base_font))
            .collect();
        let (_, height) = self.backend.page_size(page_id);
        let content = self.backend.page_content(page_id)?;
        let ops = self.backend.decode_content(&content)?;

        let mut walker = PageWalker {
            backend: &self.backend,
            page_id,
            page_index: page_num.saturating_sub(1),
            page_height: height,
            fonts: &fonts,
            state: TextState::default(),
            saved: Vec::new(),
            span: None,
            fragments: Vec::new(),
        };
        for op in &ops {
            walker.apply(&op.operator, &op.operands);
        }
        Ok(walker.finish())
    }
}

impl<B: PdfBackend> FragmentSource for PdfExtractor<B> {
    fn fragments(&self) -> Result<Vec<Fragment>> {
        self.extract()
    }
}

/// Text state tracked across a page's content stream.
///
/// Everything except the text matrix and the BT/ET flag is part of the
/// graphics state saved by `q` and restored by `Q`.
#[derive(Debug, Clone)]
struct TextState {
    font_resource: Vec<u8>,
    font_name: String,
    font_size: f32,
    leading: f32,
    ctm: Matrix,
    matrix: TextMatrix,
    in_text_block: bool,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font_resource: Vec::new(),
            font_name: String::new(),
            font_size: DEFAULT_FONT_SIZE,
            leading: 0.0,
            ctm: Matrix::IDENTITY,
            matrix: TextMatrix::default(),
            in_text_block: false,
        }
    }
}

/// Affine transform `[a b c d e f]` in PDF row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    fn translation(tx: f32, ty: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// `self × other`: apply `self` first, then `other`.
    fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    /// Length of the transformed unit vertical, i.e. the font size scale.
    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// Text matrix and line matrix.
#[derive(Debug, Clone, Copy)]
struct TextMatrix {
    current: Matrix,
    line: Matrix,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            current: Matrix::IDENTITY,
            line: Matrix::IDENTITY,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, matrix: Matrix) {
        self.current = matrix;
        self.line = matrix;
    }

    /// Move to the start of the next line, offset from the current line start.
    fn translate(&mut self, tx: f32, ty: f32) {
        self.line = Matrix::translation(tx, ty).multiply(&self.line);
        self.current = self.line;
    }

    /// Advance along the baseline after showing text.
    fn advance(&mut self, tx: f32) {
        self.current = Matrix::translation(tx, 0.0).multiply(&self.current);
    }
}

/// Consecutive shows on one baseline in one typography, not yet emitted.
#[derive(Debug)]
struct Span {
    text: String,
    font_name: String,
    size: f32,
    x0: f32,
    x1: f32,
    baseline: f32,
}

impl Span {
    /// Whether a show at `x0` on `baseline` continues this span.
    fn continues(&self, font_name: &str, size: f32, x0: f32, baseline: f32) -> bool {
        self.font_name == font_name
            && self.size == size
            && (self.baseline - baseline).abs() <= size * BASELINE_TOLERANCE
            && x0 > self.x0
            && x0 - self.x1 <= size * SPAN_MAX_GAP
    }

    fn extend(&mut self, text: &str, x0: f32, x1: f32) {
        let gap = x0 - self.x1;
        let needs_space = gap > self.size * WORD_GAP
            && !self.text.ends_with(char::is_whitespace)
            && !text.starts_with(char::is_whitespace)
            && self
                .text
                .chars()
                .last()
                .is_some_and(|c| !is_spaceless_script_char(c));
        if needs_space {
            self.text.push(' ');
        }
        self.text.push_str(text);
        self.x1 = self.x1.max(x1);
    }

    fn into_fragment(self, page: u32) -> Option<Fragment> {
        let text = self.text.trim();
        if text.is_empty() {
            return None;
        }
        let bbox = BoundingBox::new(
            self.x0,
            self.baseline - ASCENT * self.size,
            self.x1,
            self.baseline + DESCENT * self.size,
        );
        Some(Fragment::new(
            page,
            normalize_unicode(text),
            self.size,
            self.font_name,
            bbox,
        ))
    }
}

struct PageWalker<'a, B: PdfBackend> {
    backend: &'a B,
    page_id: PageId,
    page_index: u32,
    page_height: f32,
    fonts: &'a HashMap<Vec<u8>, String>,
    state: TextState,
    saved: Vec<TextState>,
    span: Option<Span>,
    fragments: Vec<Fragment>,
}

impl<B: PdfBackend> PageWalker<'_, B> {
    fn apply(&mut self, operator: &str, operands: &[PdfValue]) {
        let number = |i: usize| operands.get(i).and_then(PdfValue::as_number);
        let matrix = || {
            (operands.len() >= 6).then(|| {
                Matrix::new(
                    number(0).unwrap_or(1.0),
                    number(1).unwrap_or(0.0),
                    number(2).unwrap_or(0.0),
                    number(3).unwrap_or(1.0),
                    number(4).unwrap_or(0.0),
                    number(5).unwrap_or(0.0),
                )
            })
        };

        match operator {
            "q" => self.saved.push(self.state.clone()),
            "Q" => {
                if let Some(saved) = self.saved.pop() {
                    let matrix = self.state.matrix;
                    let in_text_block = self.state.in_text_block;
                    self.state = saved;
                    self.state.matrix = matrix;
                    self.state.in_text_block = in_text_block;
                }
            }
            "cm" => {
                if let Some(m) = matrix() {
                    self.state.ctm = m.multiply(&self.state.ctm);
                }
            }
            "BT" => {
                self.state.in_text_block = true;
                self.state.matrix = TextMatrix::default();
            }
            "ET" => {
                self.state.in_text_block = false;
            }
            "Tf" => {
                if let Some(PdfValue::Name(resource)) = operands.first() {
                    self.state.font_name = self
                        .fonts
                        .get(resource)
                        .cloned()
                        .unwrap_or_else(|| String::from_utf8_lossy(resource).to_string());
                    self.state.font_resource = resource.clone();
                }
                self.state.font_size = number(1).unwrap_or(DEFAULT_FONT_SIZE);
            }
            "TL" => {
                self.state.leading = number(0).unwrap_or(0.0);
            }
            "Td" => {
                self.state
                    .matrix
                    .translate(number(0).unwrap_or(0.0), number(1).unwrap_or(0.0));
            }
            "TD" => {
                let ty = number(1).unwrap_or(0.0);
                self.state.leading = -ty;
                self.state.matrix.translate(number(0).unwrap_or(0.0), ty);
            }
            "Tm" => {
                if let Some(m) = matrix() {
                    self.state.matrix.set(m);
                }
            }
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(PdfValue::Str(bytes)) = operands.first() {
                    let text = self.decode(bytes);
                    self.show(text);
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(items)) = operands.first() {
                    let text = self.decode_array(items);
                    self.show(text);
                }
            }
            "'" => {
                self.next_line();
                if let Some(PdfValue::Str(bytes)) = operands.first() {
                    let text = self.decode(bytes);
                    self.show(text);
                }
            }
            "\"" => {
                self.next_line();
                if let Some(PdfValue::Str(bytes)) = operands.get(2) {
                    let text = self.decode(bytes);
                    self.show(text);
                }
            }
            _ => {}
        }
    }

    fn next_line(&mut self) {
        let leading = self.state.leading;
        self.state.matrix.translate(0.0, -leading);
    }

    fn decode(&self, bytes: &[u8]) -> String {
        self.backend
            .decode_text(self.page_id, &self.state.font_resource, bytes)
    }

    /// Decode a TJ array, turning large positioning gaps into spaces.
    fn decode_array(&self, items: &[PdfValue]) -> String {
        let mut combined = String::new();
        for item in items {
            match item {
                PdfValue::Str(bytes) => combined.push_str(&self.decode(bytes)),
                PdfValue::Integer(_) | PdfValue::Real(_) => {
                    let adjustment = -item.as_number().unwrap_or(0.0);
                    if adjustment > TJ_SPACE_THRESHOLD
                        && !combined.ends_with(' ')
                        && !combined.ends_with('\u{00A0}')
                        && combined
                            .chars()
                            .last()
                            .is_some_and(|c| !is_spaceless_script_char(c))
                    {
                        combined.push(' ');
                    }
                }
                _ => {}
            }
        }
        combined
    }

    /// Place shown text in page space and add it to the current span.
    fn show(&mut self, text: String) {
        let char_count = text.chars().count() as f32;
        let rendering = self.state.matrix.current.multiply(&self.state.ctm);
        let size = round_size(self.state.font_size * rendering.vertical_scale());
        let (x, baseline) = (rendering.e, self.page_height - rendering.f);
        self.state
            .matrix
            .advance(char_count * self.state.font_size * GLYPH_WIDTH);

        if !self.state.in_text_block || text.is_empty() {
            return;
        }

        let x1 = x + char_count * size * GLYPH_WIDTH;
        if let Some(span) = self
            .span
            .as_mut()
            .filter(|s| s.continues(&self.state.font_name, size, x, baseline))
        {
            span.extend(&text, x, x1);
            return;
        }

        self.flush();
        self.span = Some(Span {
            text,
            font_name: self.state.font_name.clone(),
            size,
            x0: x,
            x1,
            baseline,
        });
    }

    /// Emit the pending span, if any.
    fn flush(&mut self) {
        let page = self.page_index;
        let Some(fragment) = self.span.take().and_then(|s| s.into_fragment(page)) else {
            return;
        };
        match fragment.validate() {
            Ok(()) => self.fragments.push(fragment),
            Err(e) => log::warn!("Skipping fragment: {}", e),
        }
    }

    fn finish(mut self) -> Vec<Fragment> {
        self.flush();
        self.fragments
    }
}

/// Round to hundredths so equal sizes compare equal after matrix scaling.
fn round_size(size: f32) -> f32 {
    (size * 100.0).round() / 100.0
}
