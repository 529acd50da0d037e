//! Hypertext encoder: one self-contained, styled HTML page

use crate::error::RenderError;
use crate::layout::LayoutPolicy;
use crate::types::{spans_to_markup, Block, BookDocument, ChapterDocument, ExportFormat, PLACEHOLDER_TEXT};
use std::io::Write;
use tracing::instrument;

const STYLESHEET: &str = r#"
body { font-family: Georgia, 'Times New Roman', serif; max-width: 42em; margin: 0 auto; padding: 2em; line-height: 1.6; color: #222; }
.title-block { text-align: center; margin: 4em 0; }
.title-block h1 { font-size: 2.4em; margin-bottom: 0.3em; }
.title-block .author { font-style: italic; }
.toc { margin: 3em 0; page-break-after: always; }
.toc ol { list-style: none; padding: 0; }
.toc li { display: flex; white-space: nowrap; font-family: 'Courier New', monospace; }
.toc .leader { overflow: hidden; flex: 1; color: #999; }
.chapter { margin-top: 3em; }
.chapter h2 { text-align: center; }
p.narrative { text-indent: 1.5em; text-align: justify; }
p.dialogue { margin-left: 1.5em; }
p.placeholder { font-style: italic; color: #777; }
"#;

/// Encoder for standalone HTML
#[derive(Debug, Clone, Default)]
pub struct HtmlEncoder {
    policy: LayoutPolicy,
}

impl HtmlEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the layout policy used for the TOC leaders
    pub fn with_policy(mut self, policy: LayoutPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Render the whole page
    pub fn render(&self, doc: &BookDocument) -> String {
        let mut html = String::new();
        html.push_str(&format!(
            "<!DOCTYPE html>\n<html lang=\"{}\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n",
            escape_html(&doc.language),
            escape_html(&doc.title),
            STYLESHEET
        ));

        html.push_str("<header class=\"title-block\">\n");
        html.push_str(&format!("<h1>{}</h1>\n", escape_html(&doc.title)));
        if !doc.author.is_empty() {
            html.push_str(&format!("<p class=\"author\">{}</p>\n", escape_html(&doc.author)));
        }
        html.push_str(&format!("<p class=\"date\">{}</p>\n", doc.display_date()));
        html.push_str("</header>\n");

        html.push_str(&self.toc_to_html(doc));
        for chapter in &doc.chapters {
            html.push_str(&self.chapter_to_html(chapter));
        }

        html.push_str("</body>\n</html>\n");
        html
    }

    /// Visual table of contents: title, dot leader, page number
    fn toc_to_html(&self, doc: &BookDocument) -> String {
        let mut html = String::from("<nav class=\"toc\">\n<h2>Table of Contents</h2>\n<ol>\n");
        for entry in &doc.toc {
            html.push_str(&format!(
                "<li><span class=\"title\">{}</span><span class=\"leader\">{}</span><span class=\"page\">{}</span></li>\n",
                escape_html(&entry.title),
                self.policy.toc_leader(&entry.title, entry.estimated_page),
                entry.estimated_page
            ));
        }
        html.push_str("</ol>\n</nav>\n");
        html
    }

    fn chapter_to_html(&self, chapter: &ChapterDocument) -> String {
        let mut html = format!(
            "<section class=\"chapter\" id=\"chapter-{}\">\n<h2>{}</h2>\n",
            chapter.number,
            escape_html(&chapter.title)
        );
        match chapter.body_blocks() {
            Some(blocks) => html.push_str(&blocks_to_html(blocks)),
            None => html.push_str(&format!("<p class=\"placeholder\">{}</p>\n", PLACEHOLDER_TEXT)),
        }
        html.push_str("</section>\n");
        html
    }
}

/// Blocks to HTML; consecutive list items share one `<ul>`
fn blocks_to_html(blocks: &[Block]) -> String {
    let mut html = String::new();
    let mut in_list = false;
    for block in blocks {
        let is_item = matches!(block, Block::ListItem { .. });
        if is_item && !in_list {
            html.push_str("<ul>\n");
        } else if !is_item && in_list {
            html.push_str("</ul>\n");
        }
        in_list = is_item;

        let inner = spans_to_markup(block.spans());
        match block {
            Block::Heading { .. } => html.push_str(&format!("<h3>{}</h3>\n", inner)),
            Block::Paragraph { is_dialogue, .. } => {
                let class = if *is_dialogue { "dialogue" } else { "narrative" };
                html.push_str(&format!("<p class=\"{}\">{}</p>\n", class, inner));
            }
            Block::ListItem { .. } => html.push_str(&format!("<li>{}</li>\n", inner)),
        }
    }
    if in_list {
        html.push_str("</ul>\n");
    }
    html
}

impl super::Encoder for HtmlEncoder {
    #[instrument(skip_all, fields(title = %doc.title))]
    fn encode(&self, doc: &BookDocument, writer: &mut dyn Write) -> Result<(), RenderError> {
        writer.write_all(self.render(doc).as_bytes())?;
        Ok(())
    }

    fn format(&self) -> ExportFormat {
        ExportFormat::Html
    }
}

/// Escape HTML special characters
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
