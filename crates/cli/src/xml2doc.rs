//! xml2doc - rebuild a structured document from extraction XML.
//!
//! Reads the XML dump produced by an external page-extraction tool,
//! rebuilds the document model (words, fonts, images, line segments),
//! optionally builds the drawings side-channel and runs the geometric
//! analysis passes, then writes the document as JSON.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Parser};
use folio_core::input::{parse_drawings_file, parse_text_file};
use folio_core::model::Document;
use folio_core::passes::{MarginalsConfig, detect_drawings, detect_marginals};
use folio_core::utils::sort_elements_by_order;
use tracing::info;

/// Rebuild a structured document from an extraction XML dump.
#[derive(Parser, Debug)]
#[command(name = "xml2doc")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the extraction XML dump
    input: PathBuf,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    // === Drawings side-channel ===
    /// Extraction XML holding the page shapes used to build the drawings
    /// side-channel (defaults to reusing the input dump)
    #[arg(long = "drawings-xml")]
    drawings_xml: Option<PathBuf>,

    /// Where the drawings side-channel JSON is written and read
    #[arg(long = "drawings-file")]
    drawings_file: Option<PathBuf>,

    /// Group the side-channel line segments into drawings
    #[arg(long = "detect-drawings", action = ArgAction::SetTrue)]
    detect_drawings: bool,

    // === Marginals detection ===
    /// Detect headers and footers and set the document margins
    #[arg(long = "detect-marginals", action = ArgAction::SetTrue)]
    detect_marginals: bool,

    /// A comma-separated list of page numbers excluded from marginals
    /// detection
    #[arg(long = "ignore-pages")]
    ignore_pages: Option<String>,

    /// Maximum percentage of the page height/width a margin may take
    #[arg(long = "max-margin-percentage", default_value = "15.0")]
    max_margin_percentage: f64,

    /// Size tolerance in percent when grouping pages of similar size
    #[arg(long = "similarity-size-percentage", default_value = "5.0")]
    similarity_size_percentage: f64,

    // === Output ===
    /// Path to file where the document JSON is written, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,

    /// Pretty-print the JSON output
    #[arg(long, action = ArgAction::SetTrue)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    let mut doc = parse_text_file(&args.input)
        .with_context(|| format!("cannot parse {}", args.input.display()))?;
    info!(pages = doc.pages.len(), "document rebuilt");

    if args.detect_drawings || args.drawings_xml.is_some() {
        let drawings_xml = args.drawings_xml.clone().unwrap_or_else(|| args.input.clone());
        let drawings_file = args
            .drawings_file
            .clone()
            .unwrap_or_else(|| args.input.with_extension("drawings.json"));
        build_side_channel(&drawings_xml, &drawings_file)?;
        doc.drawings_file = Some(drawings_file);
    } else if let Some(drawings_file) = args.drawings_file.clone() {
        doc.drawings_file = Some(drawings_file);
    }

    if args.detect_drawings {
        detect_drawings(&mut doc).context("drawing detection failed")?;
    }

    if args.detect_marginals {
        let config = MarginalsConfig {
            ignore_pages: parse_ignore_pages(args.ignore_pages.as_deref())?,
            max_margin_percentage: Some(args.max_margin_percentage),
            similarity_size_percentage: args.similarity_size_percentage,
        };
        detect_marginals(&mut doc, &config);
    }

    for page in &mut doc.pages {
        sort_elements_by_order(&mut page.elements);
    }

    write_document(&doc, &args.outfile, args.pretty)
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn build_side_channel(drawings_xml: &Path, drawings_file: &Path) -> anyhow::Result<()> {
    let drawings_doc = parse_drawings_file(drawings_xml)
        .with_context(|| format!("cannot parse {}", drawings_xml.display()))?;
    let file = File::create(drawings_file)
        .with_context(|| format!("cannot create {}", drawings_file.display()))?;
    serde_json::to_writer(BufWriter::new(file), &drawings_doc)?;
    info!(path = %drawings_file.display(), "drawings side-channel written");
    Ok(())
}

fn parse_ignore_pages(raw: Option<&str>) -> anyhow::Result<Vec<usize>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| {
            p.parse::<usize>()
                .with_context(|| format!("invalid page number: {p}"))
        })
        .collect()
}

fn write_document(doc: &Document, outfile: &str, pretty: bool) -> anyhow::Result<()> {
    let mut writer: Box<dyn Write> = if outfile == "-" {
        Box::new(io::stdout().lock())
    } else {
        Box::new(BufWriter::new(
            File::create(outfile).with_context(|| format!("cannot create {outfile}"))?,
        ))
    };
    if pretty {
        serde_json::to_writer_pretty(&mut writer, doc)?;
    } else {
        serde_json::to_writer(&mut writer, doc)?;
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
