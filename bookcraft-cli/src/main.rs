//! BookCraft CLI - export book projects from the command line

mod commands;

use anyhow::Result;
use bookcraft_core::ExportFormat;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Parse and validate jobs argument (must be at least 1)
fn parse_jobs(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    if n < 1 {
        Err("jobs must be at least 1".to_string())
    } else {
        Ok(n)
    }
}

fn parse_format(s: &str) -> Result<ExportFormat, String> {
    s.parse()
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("'{}': {}", s, e))
}

#[derive(Parser)]
#[command(name = "bookcraft")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a project file to HTML, PDF or DOCX
    Export {
        /// Project JSON file
        input: String,

        /// Output format (html, pdf, docx)
        #[arg(short, long, value_parser = parse_format)]
        format: ExportFormat,

        /// Output file path (defaults to the sanitized book title)
        #[arg(short, long)]
        output: Option<String>,

        /// Export as a paying user (no watermark)
        #[arg(long)]
        entitled: bool,

        /// Title page date, YYYY-MM-DD (defaults to today)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },

    /// Print the estimated table of contents
    Toc {
        /// Project JSON file
        input: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print one chapter's normalized markup
    Normalize {
        /// Project JSON file
        input: String,

        /// Chapter number
        #[arg(short, long)]
        chapter: u32,
    },

    /// Batch export every project file in a directory
    Batch {
        /// Input directory
        input_dir: String,

        /// Output directory
        #[arg(short, long)]
        output_dir: String,

        /// Output format (html, pdf, docx)
        #[arg(short, long, value_parser = parse_format)]
        format: ExportFormat,

        /// Number of parallel jobs (must be at least 1)
        #[arg(short, long, default_value = "4", value_parser = parse_jobs)]
        jobs: usize,

        /// Export as a paying user (no watermark)
        #[arg(long)]
        entitled: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "bookcraft_cli=debug,bookcraft_core=debug"
    } else {
        "bookcraft_cli=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Export {
            input,
            format,
            output,
            entitled,
            date,
        } => commands::export(&input, output.as_deref(), format, entitled, date),

        Commands::Toc { input, json } => commands::toc(&input, json),

        Commands::Normalize { input, chapter } => commands::normalize(&input, chapter),

        Commands::Batch {
            input_dir,
            output_dir,
            format,
            jobs,
            entitled,
        } => commands::batch(&input_dir, &output_dir, format, jobs, entitled),
    }
}
