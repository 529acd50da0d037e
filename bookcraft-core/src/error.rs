//! Error types for BookCraft Core

use thiserror::Error;

/// Result type alias using BookcraftError
pub type Result<T> = std::result::Result<T, BookcraftError>;

/// Top-level error type for all BookCraft operations
#[derive(Debug, Error)]
pub enum BookcraftError {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the external collaborators (project store, purchase ledger)
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Malformed record: {0}")]
    Malformed(String),

    #[error("Backend error: {0}")]
    BackendError(String),
}

/// Errors that occur while constructing or serializing a backend document
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<zip::result::ZipError> for RenderError {
    fn from(err: zip::result::ZipError) -> Self {
        RenderError::Archive(err.to_string())
    }
}

impl From<quick_xml::Error> for RenderError {
    fn from(err: quick_xml::Error) -> Self {
        RenderError::EncodingFailed(format!("XML: {}", err))
    }
}

/// Errors raised while stamping a watermark. Never escapes an export.
#[derive(Debug, Error)]
pub enum WatermarkError {
    #[error("Watermark text rejected: {0}")]
    InvalidNotice(String),

    #[error("No room for watermark on page {page}")]
    NoRoom { page: usize },
}

/// Failure of one export request, as seen by the HTTP layer
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Project not found: {0}")]
    NotFound(String),

    #[error("Export failed: {0}")]
    Render(#[from] RenderError),

    #[error("Upstream error: {0}")]
    Upstream(String),
}

impl From<SourceError> for ExportError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::NotFound(what) => ExportError::NotFound(what),
            other => ExportError::Upstream(other.to_string()),
        }
    }
}
