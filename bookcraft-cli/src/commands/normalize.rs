//! Normalize command implementation

use super::read_project;
use anyhow::{bail, Result};
use bookcraft_core::{extract_titles, Normalizer};
use std::path::Path;

/// Print one chapter as canonical markup
pub fn normalize(input: &str, chapter: u32) -> Result<()> {
    let project = read_project(Path::new(input))?;

    if chapter == 0 || chapter > project.chapters {
        bail!(
            "Chapter {} is out of range (the book has {} chapters)",
            chapter,
            project.chapters
        );
    }
    let Some(raw) = project.chapter_content(chapter) else {
        bail!("Chapter {} has not been generated yet", chapter);
    };

    let title = extract_titles(&project.outline).title_for(chapter);
    println!("{}", Normalizer::new().normalize_markup(raw, chapter, &title));

    Ok(())
}
