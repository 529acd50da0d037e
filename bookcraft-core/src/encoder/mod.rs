//! Encoders for rendering an assembled book to output formats

mod docx;
mod html;
mod pdf;
mod typeface;

pub use docx::{DocxEncoder, DocxParagraph, DocxSection, FooterPart, SectionFooterStamper};
pub use html::HtmlEncoder;
pub use pdf::{ComposedPage, FlowElement, PageConfig, PageStamp, PageStamper, ParagraphStyle, PdfEncoder};
pub use typeface::{Face, FaceSet};

use crate::error::RenderError;
use crate::export::ExportOptions;
use crate::types::{BookDocument, ExportFormat};
use std::io::Write;

/// Trait for encoding books to output formats
pub trait Encoder: Send + Sync {
    /// Encode a book to a writer
    fn encode(&self, doc: &BookDocument, writer: &mut dyn Write) -> Result<(), RenderError>;

    /// The format this encoder produces
    fn format(&self) -> ExportFormat;

    /// File extension for this format
    fn file_extension(&self) -> &str {
        self.format().file_extension()
    }

    /// MIME type for this format
    fn mime_type(&self) -> &str {
        self.format().mime_type()
    }
}

/// Get an encoder for a format, configured from the export options
pub fn encoder_for_format(format: ExportFormat, options: &ExportOptions) -> Box<dyn Encoder> {
    match format {
        ExportFormat::Html => Box::new(HtmlEncoder::new().with_policy(options.layout.clone())),
        ExportFormat::Pdf => Box::new(
            PdfEncoder::new()
                .with_policy(options.layout.clone())
                .with_page_config(options.page.clone())
                .with_notice(options.notice.clone()),
        ),
        ExportFormat::Docx => Box::new(
            DocxEncoder::new()
                .with_policy(options.layout.clone())
                .with_notice(options.notice.clone()),
        ),
    }
}
