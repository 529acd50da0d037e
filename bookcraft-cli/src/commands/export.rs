//! Export command implementation

use super::read_project;
use anyhow::{Context, Result};
use bookcraft_core::{ExportFormat, ExportOptions, ExportPipeline};
use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Export one project file
pub fn export(
    input: &str,
    output: Option<&str>,
    format: ExportFormat,
    entitled: bool,
    date: Option<NaiveDate>,
) -> Result<()> {
    let project = read_project(Path::new(input))?;

    let mut options = ExportOptions::new();
    if let Some(date) = date {
        options = options.with_date(date);
    }
    let pipeline = ExportPipeline::with_options(options);

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Rendering {}...", format));

    let artifact = pipeline
        .render(&project, entitled, format)
        .with_context(|| format!("Failed to render {}", input))?;

    tracing::info!(
        "Rendered '{}' ({} chapters, {} bytes)",
        project.title,
        project.chapters,
        artifact.bytes.len()
    );

    let output_path = output
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&artifact.filename));
    std::fs::write(&output_path, &artifact.bytes)
        .with_context(|| format!("Failed to write output file: {}", output_path.display()))?;

    pb.finish_with_message(format!(
        "Exported '{}' to {} -> {}",
        project.title,
        format,
        output_path.display()
    ));

    Ok(())
}
