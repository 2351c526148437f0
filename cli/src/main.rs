//! pdfoutline CLI - infer PDF titles and heading outlines

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfoutline::{
    batch, extract_fragments, render, BatchOptions, ExtractOptions, JsonFormat, OcrDocument,
    OcrOptions, PageSelection, PdfOutline,
};

#[derive(Parser)]
#[command(name = "pdfoutline")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Infer a PDF's title and H1-H3 outline from its typography", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the outline of one PDF
    Outline {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long, conflicts_with = "markdown")]
        compact: bool,

        /// Output a Markdown bullet list instead of JSON
        #[arg(long)]
        markdown: bool,

        /// Skip pages that fail to extract
        #[arg(long)]
        lenient: bool,
    },

    /// Outline every PDF in a directory
    Batch {
        /// Directory containing PDF files
        #[arg(value_name = "INPUT_DIR", default_value = "input")]
        input: PathBuf,

        /// Directory receiving one JSON file per PDF
        #[arg(value_name = "OUTPUT_DIR", default_value = "output")]
        output: PathBuf,

        /// Process one document at a time
        #[arg(long)]
        sequential: bool,

        /// Skip pages that fail to extract
        #[arg(long)]
        lenient: bool,

        /// Write compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Dump extracted text fragments as JSON
    Fragments {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,
    },

    /// Outline a document from Tesseract TSV output, one file per page
    Ocr {
        /// TSV files in page order
        #[arg(value_name = "TSV", required = true)]
        inputs: Vec<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Zoom factor the pages were rasterized at
        #[arg(long, default_value = "3.0")]
        zoom: f32,

        /// Minimum word confidence (0-100)
        #[arg(long, default_value = "70")]
        min_confidence: f32,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Outline {
            input,
            output,
            compact,
            markdown,
            lenient,
        } => cmd_outline(&input, output.as_deref(), compact, markdown, lenient),
        Commands::Batch {
            input,
            output,
            sequential,
            lenient,
            compact,
        } => cmd_batch(&input, &output, sequential, lenient, compact),
        Commands::Fragments { input, pages } => cmd_fragments(&input, pages.as_deref()),
        Commands::Ocr {
            inputs,
            output,
            zoom,
            min_confidence,
        } => cmd_ocr(&inputs, output.as_deref(), zoom, min_confidence),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

/// Write to a file, or print to stdout.
fn emit(content: &str, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_outline(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    markdown: bool,
    lenient: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    log::debug!("Outlining {}", input.display());
    let mut builder = PdfOutline::new();
    if lenient {
        builder = builder.lenient();
    }
    let record = builder.outline(input)?;

    let content = if markdown {
        render::to_markdown(&record)
    } else {
        render::to_json(&record, json_format(compact))?
    };
    emit(&content, output)
}

fn cmd_batch(
    input: &Path,
    output: &Path,
    sequential: bool,
    lenient: bool,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let documents = batch::find_documents(input)?;
    if documents.is_empty() {
        println!("{} {}", "No PDF files found in".yellow(), input.display());
        return Ok(());
    }

    let mut options = BatchOptions::new().with_format(json_format(compact));
    if sequential {
        options = options.sequential();
    }
    if lenient {
        let extract = options.extract.clone().lenient();
        options = options.with_extract(extract);
    }

    let pb = ProgressBar::new(documents.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let report = batch::run_with_progress(input, output, &options, |path| {
        pb.set_message(
            path.file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
        );
        pb.inc(1);
    })?;
    pb.finish_with_message("Done!");

    println!();
    for success in &report.successes {
        println!(
            "  {} {} {} ({} headings)",
            "✓".green(),
            success.output.display(),
            format!("\"{}\"", success.title).dimmed(),
            success.heading_count
        );
    }
    for failure in &report.failures {
        println!("  {} {}: {}", "✗".red(), failure.input.display(), failure.error);
    }

    println!(
        "\n{} {} succeeded, {} failed",
        "Summary:".bold(),
        report.successes.len().to_string().green(),
        report.failures.len().to_string().red()
    );

    if report.has_failures() {
        return Err(format!("{} of {} documents failed", report.failures.len(), report.total()).into());
    }
    Ok(())
}

fn cmd_fragments(input: &Path, pages: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let page_selection = match pages {
        Some(p) => PageSelection::parse(p)?,
        None => PageSelection::All,
    };

    let options = ExtractOptions::new().lenient().with_pages(page_selection);
    let fragments = extract_fragments(input, options)?;
    println!("{}", serde_json::to_string_pretty(&fragments)?);
    Ok(())
}

fn cmd_ocr(
    inputs: &[PathBuf],
    output: Option<&Path>,
    zoom: f32,
    min_confidence: f32,
) -> Result<(), Box<dyn std::error::Error>> {
    let pages = inputs
        .iter()
        .map(fs::read_to_string)
        .collect::<Result<Vec<_>, _>>()?;

    let options = OcrOptions::new()
        .with_zoom(zoom)
        .with_min_confidence(min_confidence);
    let document = OcrDocument::from_tsv_pages(&pages, options)?;
    let record = PdfOutline::new().outline_ocr(&document)?;

    emit(&render::to_json(&record, JsonFormat::Pretty)?, output)
}

fn cmd_version() {
    println!("{} {}", "pdfoutline".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF title and outline inference tool");
    println!();
    println!("License: MIT");
}
