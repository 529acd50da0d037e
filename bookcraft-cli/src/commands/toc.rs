//! Table of contents command implementation

use super::read_project;
use anyhow::Result;
use bookcraft_core::{ExportFormat, ExportPipeline, LayoutPolicy};
use std::path::Path;

/// Print the table of contents a paginated export would carry
pub fn toc(input: &str, json: bool) -> Result<()> {
    let project = read_project(Path::new(input))?;
    let doc = ExportPipeline::new().assemble(&project, true, ExportFormat::Pdf);

    if json {
        println!("{}", serde_json::to_string_pretty(&doc.toc)?);
        return Ok(());
    }

    let policy = LayoutPolicy::default();
    for entry in &doc.toc {
        let marker = if entry.generated { ' ' } else { '*' };
        println!(
            "{}{} {} {}",
            marker,
            entry.title,
            policy.toc_leader(&entry.title, entry.estimated_page),
            entry.estimated_page
        );
    }
    if doc.toc.iter().any(|e| !e.generated) {
        println!("\n* not generated yet");
    }

    Ok(())
}
