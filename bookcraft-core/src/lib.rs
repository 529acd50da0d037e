//! BookCraft Core Library
//!
//! This crate turns a stored book project (outline plus raw AI-generated
//! chapter text) into a downloadable HTML, PDF or DOCX document. Chapter
//! text is normalized into canonical blocks, titles are recovered from the
//! outline, page numbers are estimated for the table of contents, and one
//! encoder renders the result. Unentitled paginated exports carry a
//! watermark.

pub mod encoder;
pub mod error;
pub mod export;
pub mod layout;
pub mod normalize;
pub mod outline;
pub mod pagination;
pub mod source;
pub mod types;
pub mod watermark;

pub use error::{BookcraftError, ExportError, RenderError, Result, SourceError, WatermarkError};
pub use export::{ExportOptions, ExportPipeline, ExportService};
pub use layout::{ExtractionStrategy, LayoutPolicy};
pub use normalize::Normalizer;
pub use outline::{extract_titles, TitlePattern};
pub use pagination::{estimate_toc, PAGINATED_START_PAGE, WORDS_PER_PAGE};
pub use types::{
    Block, BookDocument, BookProject, ChapterDocument, ChapterTitleMap, ExportArtifact,
    ExportFormat, NormalizedChapter, Span, TocEntry,
};
pub use watermark::{WatermarkStamper, WATERMARK_NOTICE};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_creation() {
        let project = BookProject::new("Test Book", 50, 5);
        assert_eq!(project.title, "Test Book");
        assert_eq!(project.language, "en");
        assert!(project.chapters_content.is_empty());
    }
}
