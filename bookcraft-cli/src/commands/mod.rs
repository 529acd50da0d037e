//! CLI command implementations

mod batch;
mod export;
mod normalize;
mod toc;

pub use batch::batch;
pub use export::export;
pub use normalize::normalize;
pub use toc::toc;

use anyhow::{Context, Result};
use bookcraft_core::source::load_project;
use bookcraft_core::BookProject;
use std::path::Path;

/// Load a project file, with the path in the error
fn read_project(input: &Path) -> Result<BookProject> {
    load_project(input).with_context(|| format!("Failed to load project {}", input.display()))
}
