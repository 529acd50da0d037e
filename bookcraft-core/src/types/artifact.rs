//! Export artifacts returned to the caller

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Output formats the export core can produce
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Self-contained styled hypertext
    Html,
    /// Paginated print document
    Pdf,
    /// Word-processor document
    Docx,
}

impl ExportFormat {
    /// File extension for this format
    pub fn file_extension(&self) -> &'static str {
        match self {
            ExportFormat::Html => "html",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
        }
    }

    /// MIME type for this format
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Html => "text/html; charset=utf-8",
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }

    /// Whether the format has physical pages (title page and TOC page first)
    pub fn is_paginated(&self) -> bool {
        !matches!(self, ExportFormat::Html)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" | "htm" => Ok(ExportFormat::Html),
            "pdf" => Ok(ExportFormat::Pdf),
            "docx" | "word" => Ok(ExportFormat::Docx),
            other => Err(format!("Unsupported export format: {}", other)),
        }
    }
}

/// A finished export: opaque bytes plus what the caller needs to serve them
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
    pub filename: String,
}

impl ExportArtifact {
    pub fn new(format: ExportFormat, bytes: Vec<u8>, filename: impl Into<String>) -> Self {
        Self {
            format,
            bytes,
            filename: filename.into(),
        }
    }

    pub fn content_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// Filename stem derived from the project title.
///
/// Keeps alphanumerics, spaces, hyphens and underscores, then turns spaces
/// into underscores. Falls back to `book_{id}` when nothing is left.
pub fn sanitize_filename(title: &str, id: &Uuid) -> String {
    let kept: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '-' || *c == '_')
        .collect();
    let stem = kept.trim().replace(' ', "_");
    if stem.is_empty() {
        format!("book_{}", id)
    } else {
        stem
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        let id = Uuid::nil();
        assert_eq!(sanitize_filename("The Art: of War!", &id), "The_Art_of_War");
        assert_eq!(sanitize_filename("  dash-and_under  ", &id), "dash-and_under");
        assert_eq!(
            sanitize_filename("?!/", &id),
            "book_00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("PDF".parse::<ExportFormat>(), Ok(ExportFormat::Pdf));
        assert_eq!("docx".parse::<ExportFormat>(), Ok(ExportFormat::Docx));
        assert!("epub".parse::<ExportFormat>().is_err());
        assert!(!ExportFormat::Html.is_paginated());
    }
}
