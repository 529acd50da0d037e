//! Core types shared by the export pipeline

mod artifact;
mod block;
mod chapter;
mod document;
mod project;
mod toc;

pub use artifact::{sanitize_filename, ExportArtifact, ExportFormat};
pub use block::{canonical_spans, escape_markup, spans_to_markup, Block, Span};
pub use chapter::NormalizedChapter;
pub use document::{BookDocument, ChapterDocument, PLACEHOLDER_TEXT};
pub use project::BookProject;
pub use toc::{fallback_title, ChapterTitleMap, TocEntry};
