//! Directory batch processing.
//!
//! Every `.pdf` in the input directory is outlined independently and written
//! to `<output>/<stem>.json`. A document that fails to load or extract is
//! recorded in the report; the remaining documents are still processed.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::analysis::{AnalysisConfig, OutlineAnalyzer};
use crate::error::Result;
use crate::extract::{ExtractOptions, FragmentSource, PdfExtractor};
use crate::model::OutlineRecord;
use crate::render::{to_json, JsonFormat};

/// Options for a batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Extraction options applied to every document
    pub extract: ExtractOptions,

    /// Analysis thresholds applied to every document
    pub analysis: AnalysisConfig,

    /// Output JSON format
    pub format: JsonFormat,

    /// Whether to process documents in parallel
    pub parallel: bool,
}

impl BatchOptions {
    /// Create batch options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set extraction options.
    pub fn with_extract(mut self, extract: ExtractOptions) -> Self {
        self.extract = extract;
        self
    }

    /// Set analysis thresholds.
    pub fn with_analysis(mut self, analysis: AnalysisConfig) -> Self {
        self.analysis = analysis;
        self
    }

    /// Set the output JSON format.
    pub fn with_format(mut self, format: JsonFormat) -> Self {
        self.format = format;
        self
    }

    /// Process one document at a time.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            // Documents already run in parallel; pages within one do not need to.
            extract: ExtractOptions::default().sequential(),
            analysis: AnalysisConfig::default(),
            format: JsonFormat::Pretty,
            parallel: true,
        }
    }
}

/// A document outlined and written successfully.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSuccess {
    pub input: PathBuf,
    pub output: PathBuf,
    pub title: String,
    pub heading_count: usize,
}

/// A document that could not be processed.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchFailure {
    pub input: PathBuf,
    pub error: String,
}

/// Outcome of a batch run, in input file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub successes: Vec<BatchSuccess>,
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    /// Number of documents attempted.
    pub fn total(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// List `.pdf` files (case-insensitive extension) in a directory, sorted by name.
pub fn find_documents<P: AsRef<Path>>(input_dir: P) -> Result<Vec<PathBuf>> {
    let mut documents = Vec::new();
    for entry in fs::read_dir(input_dir)? {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
        if is_pdf && path.is_file() {
            documents.push(path);
        }
    }
    documents.sort();
    Ok(documents)
}

/// Output path for a source document: `<output_dir>/<stem>.json`.
pub fn output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let mut name = input.file_stem().unwrap_or(input.as_os_str()).to_os_string();
    name.push(".json");
    output_dir.join(name)
}

/// Outline one PDF file.
pub fn outline_document<P: AsRef<Path>>(
    path: P,
    extract: &ExtractOptions,
    analyzer: &OutlineAnalyzer,
) -> Result<OutlineRecord> {
    let extractor = PdfExtractor::open(path, extract.clone())?;
    let fragments = extractor.fragments()?;
    Ok(analyzer.analyze(&fragments))
}

/// Process every PDF in `input_dir`, writing one JSON record per document.
///
/// Fails only when the directories themselves cannot be read or created.
pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
    input_dir: P,
    output_dir: Q,
    options: &BatchOptions,
) -> Result<BatchReport> {
    run_with_progress(input_dir, output_dir, options, |_| {})
}

/// Like [`run`], calling `on_done` after each document finishes.
///
/// The callback may be invoked from several threads at once.
pub fn run_with_progress<P, Q, F>(
    input_dir: P,
    output_dir: Q,
    options: &BatchOptions,
    on_done: F,
) -> Result<BatchReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    F: Fn(&Path) + Sync,
{
    let output_dir = output_dir.as_ref();
    let documents = find_documents(input_dir)?;
    fs::create_dir_all(output_dir)?;
    log::info!("Processing {} documents", documents.len());

    let analyzer = OutlineAnalyzer::new(options.analysis.clone());
    let process = |input: &PathBuf| {
        let result = process_one(input, output_dir, options, &analyzer);
        on_done(input);
        (input.clone(), result)
    };

    let results: Vec<(PathBuf, Result<BatchSuccess>)> = if options.parallel {
        documents.par_iter().map(process).collect()
    } else {
        documents.iter().map(process).collect()
    };

    let mut report = BatchReport::default();
    for (input, result) in results {
        match result {
            Ok(success) => report.successes.push(success),
            Err(e) => {
                log::warn!("Failed to process {}: {}", input.display(), e);
                report.failures.push(BatchFailure {
                    input,
                    error: e.to_string(),
                });
            }
        }
    }

    log::info!(
        "Batch finished: {} succeeded, {} failed",
        report.successes.len(),
        report.failures.len()
    );
    Ok(report)
}

fn process_one(
    input: &Path,
    output_dir: &Path,
    options: &BatchOptions,
    analyzer: &OutlineAnalyzer,
) -> Result<BatchSuccess> {
    let record = outline_document(input, &options.extract, analyzer)?;
    let output = output_path(input, output_dir);
    let mut json = to_json(&record, options.format)?;
    json.push('\n');
    fs::write(&output, json)?;
    log::debug!("Wrote {}", output.display());

    Ok(BatchSuccess {
        input: input.to_path_buf(),
        output,
        heading_count: record.heading_count(),
        title: record.title,
    })
}
