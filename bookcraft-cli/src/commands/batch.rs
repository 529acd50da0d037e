//! Batch export command implementation

use super::read_project;
use anyhow::{bail, Context, Result};
use bookcraft_core::{ExportFormat, ExportPipeline};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Batch export every `.json` project in a directory
pub fn batch(
    input_dir: &str,
    output_dir: &str,
    format: ExportFormat,
    jobs: usize,
    entitled: bool,
) -> Result<()> {
    let input_path = Path::new(input_dir);
    let output_path = Path::new(output_dir);

    // Ensure output directory exists
    fs::create_dir_all(output_path)?;

    let files: Vec<_> = fs::read_dir(input_path)
        .with_context(|| format!("Failed to read {}", input_dir))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect();

    if files.is_empty() {
        println!("No project files found in {}", input_dir);
        return Ok(());
    }

    println!("Found {} projects to export", files.len());

    let pipeline = ExportPipeline::new();

    // Set up progress tracking
    let multi_progress = MultiProgress::new();
    let overall_pb = multi_progress.add(ProgressBar::new(files.len() as u64));
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")?
            .progress_chars("##-"),
    );

    let success_count = AtomicUsize::new(0);
    let error_count = AtomicUsize::new(0);

    // Configure thread pool
    rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build_global()
        .ok(); // Ignore if already configured

    files.par_iter().for_each(|file_path| {
        match process_file(file_path, output_path, &pipeline, format, entitled) {
            Ok(_) => {
                success_count.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                error_count.fetch_add(1, Ordering::Relaxed);
                tracing::error!("Failed to export {:?}: {:#}", file_path, e);
            }
        }

        overall_pb.inc(1);
    });

    overall_pb.finish();

    let success = success_count.load(Ordering::Relaxed);
    let errors = error_count.load(Ordering::Relaxed);

    println!("\nBatch export complete:");
    println!("  Success: {}", success);
    println!("  Errors:  {}", errors);

    if errors > 0 {
        bail!("Batch export completed with {} errors", errors);
    }

    Ok(())
}

fn process_file(
    input_path: &Path,
    output_dir: &Path,
    pipeline: &ExportPipeline,
    format: ExportFormat,
    entitled: bool,
) -> Result<()> {
    let project = read_project(input_path)?;
    let artifact = pipeline.render(&project, entitled, format)?;

    // Named after the input file so projects with equal titles don't collide
    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .context("Could not determine output filename from input")?;
    let output_file = output_dir.join(format!("{}.{}", stem, format.file_extension()));

    fs::write(&output_file, &artifact.bytes)?;

    tracing::info!("Exported {:?} -> {:?}", input_path, output_file);

    Ok(())
}
