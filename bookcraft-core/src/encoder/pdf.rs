//! Print encoder
//!
//! The book is first flattened into [`FlowElement`]s (title page, TOC page,
//! chapter title blocks, styled paragraphs, page breaks). A page composer
//! then lays them onto A4 pages with line wrapping and finalizes each page
//! as it fills up. Pages are built as printpdf 0.8 `Op` lists and
//! serialized through `PdfDocument::save`.
//!
//! Text is set in the embedded faces from [`super::typeface`], and line
//! wrapping and justification measure words with the same faces.

use super::typeface::{Face, FaceSet};
use crate::error::{RenderError, WatermarkError};
use crate::layout::LayoutPolicy;
use crate::types::{Block, BookDocument, ExportFormat, Span, PLACEHOLDER_TEXT};
use crate::watermark::{validate_notice, WatermarkStage, WatermarkStamper, WATERMARK_NOTICE};
use printpdf::{
    Color, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt, Rgb, TextItem,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io::Write;
use tracing::{debug, info, instrument, warn};

/// Watermark font size in points
const WATERMARK_SIZE: f32 = 8.0;

/// Watermark baseline distance from the page bottom
const WATERMARK_OFFSET_MM: f32 = 12.0;

/// Page geometry and base typography
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PageConfig {
    /// Page width in millimetres
    pub width_mm: f32,
    /// Page height in millimetres
    pub height_mm: f32,
    /// Margin on every side, in millimetres
    pub margin_mm: f32,
    /// Body text size in points
    pub body_size: f32,
    /// Line height as a multiple of the font size
    pub line_spacing: f32,
    /// Paragraph indent in points
    pub indent_pt: f32,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            width_mm: 210.0,
            height_mm: 297.0,
            margin_mm: 20.0,
            body_size: 11.0,
            line_spacing: 1.4,
            indent_pt: 18.0,
        }
    }
}

impl PageConfig {
    fn width_pt(&self) -> f32 {
        Mm(self.width_mm).into_pt().0
    }

    fn height_pt(&self) -> f32 {
        Mm(self.height_mm).into_pt().0
    }

    fn margin_pt(&self) -> f32 {
        Mm(self.margin_mm).into_pt().0
    }

    fn content_width(&self) -> f32 {
        self.width_pt() - 2.0 * self.margin_pt()
    }
}

/// How a paragraph is set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphStyle {
    /// Indented block, no first-line indent, left aligned
    Dialogue,
    /// Justified with a first-line indent
    Narrative,
}

/// Layout-independent content, in reading order
#[derive(Debug, Clone, PartialEq)]
pub enum FlowElement {
    /// Horizontally centered text
    Centered { text: String, size: f32, bold: bool },
    /// Bold, left-aligned sub-heading
    Heading { text: String },
    /// TOC line: title, dot leader, page number
    TocLine { title: String, leader: String, page: u32 },
    Paragraph { spans: Vec<Span>, style: ParagraphStyle },
    /// Bulleted item
    ListItem { spans: Vec<Span> },
    /// Vertical space in points
    Spacer(f32),
    PageBreak,
}

/// A finished page: its drawing operations and the text lines set on it
#[derive(Debug, Clone, Default)]
pub struct ComposedPage {
    pub ops: Vec<Op>,
    pub lines: Vec<String>,
}

impl ComposedPage {
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Watermark for one PDF page
#[derive(Debug, Clone)]
pub struct PageStamp {
    ops: Vec<Op>,
    text: String,
}

/// Stamps the notice in small grey type at the bottom of every page
pub struct PageStamper<'a> {
    notice: String,
    page_width: f32,
    face: &'a Face,
}

impl<'a> PageStamper<'a> {
    pub fn new(notice: impl Into<String>, config: &PageConfig, faces: &'a FaceSet) -> Self {
        Self {
            notice: notice.into(),
            page_width: config.width_pt(),
            face: faces.face(false),
        }
    }
}

impl WatermarkStamper for PageStamper<'_> {
    type Target = ComposedPage;
    type Stamp = PageStamp;

    fn stamp(&self, _page: &ComposedPage, index: usize) -> Result<PageStamp, WatermarkError> {
        validate_notice(&self.notice)?;
        let width = self.face.width(&self.notice, WATERMARK_SIZE);
        if width > self.page_width {
            return Err(WatermarkError::NoRoom { page: index + 1 });
        }

        let mut ops = vec![
            Op::SaveGraphicsState,
            Op::SetFillColor {
                col: Color::Rgb(Rgb::new(0.6, 0.6, 0.6, None)),
            },
        ];
        ops.extend(text_ops(
            self.face,
            &self.notice,
            (self.page_width - width) / 2.0,
            Mm(WATERMARK_OFFSET_MM).into_pt().0,
            WATERMARK_SIZE,
        ));
        ops.push(Op::RestoreGraphicsState);

        Ok(PageStamp {
            ops,
            text: self.notice.clone(),
        })
    }
}

/// Encoder for PDF
#[derive(Debug, Clone)]
pub struct PdfEncoder {
    page: PageConfig,
    policy: LayoutPolicy,
    notice: String,
}

impl PdfEncoder {
    pub fn new() -> Self {
        Self {
            page: PageConfig::default(),
            policy: LayoutPolicy::default(),
            notice: WATERMARK_NOTICE.to_string(),
        }
    }

    /// Set page configuration
    pub fn with_page_config(mut self, config: PageConfig) -> Self {
        self.page = config;
        self
    }

    /// Set the shared layout policy
    pub fn with_policy(mut self, policy: LayoutPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the watermark notice
    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = notice.into();
        self
    }

    /// Flatten the book into flow elements
    pub fn build_flow(&self, doc: &BookDocument) -> Vec<FlowElement> {
        let body = self.page.body_size;
        let mut flow = vec![
            FlowElement::Spacer(self.page.height_pt() * 0.25),
            FlowElement::Centered {
                text: doc.title.clone(),
                size: 26.0,
                bold: true,
            },
            FlowElement::Spacer(18.0),
        ];
        if !doc.author.is_empty() {
            flow.push(FlowElement::Centered {
                text: doc.author.clone(),
                size: 14.0,
                bold: false,
            });
            flow.push(FlowElement::Spacer(8.0));
        }
        flow.push(FlowElement::Centered {
            text: doc.display_date(),
            size: body,
            bold: false,
        });
        flow.push(FlowElement::PageBreak);

        flow.push(FlowElement::Centered {
            text: "Table of Contents".to_string(),
            size: 18.0,
            bold: true,
        });
        flow.push(FlowElement::Spacer(12.0));
        for entry in &doc.toc {
            flow.push(FlowElement::TocLine {
                title: entry.title.clone(),
                leader: self.policy.toc_leader(&entry.title, entry.estimated_page),
                page: entry.estimated_page,
            });
        }
        flow.push(FlowElement::PageBreak);

        let total = doc.chapters.len();
        for (index, chapter) in doc.chapters.iter().enumerate() {
            if let Some(label) = chapter.label() {
                flow.push(FlowElement::Centered {
                    text: label,
                    size: 12.0,
                    bold: false,
                });
            }
            flow.push(FlowElement::Centered {
                text: chapter.title.clone(),
                size: 18.0,
                bold: true,
            });
            flow.push(FlowElement::Spacer(18.0));

            match chapter.body_markup() {
                Some(markup) => {
                    for block in self.policy.extract_blocks(&markup) {
                        flow.push(block_element(block));
                    }
                }
                None => flow.push(FlowElement::Paragraph {
                    spans: vec![Span::text(PLACEHOLDER_TEXT)],
                    style: ParagraphStyle::Narrative,
                }),
            }

            if self.policy.page_break_after(index, total) {
                flow.push(FlowElement::PageBreak);
            }
        }
        flow
    }

    /// Lay the book out into pages, watermarked when the document asks for it
    pub fn compose(&self, doc: &BookDocument) -> Result<Vec<ComposedPage>, RenderError> {
        let faces = FaceSet::load()?;
        Ok(self.compose_with(doc, &faces))
    }

    fn compose_with(&self, doc: &BookDocument, faces: &FaceSet) -> Vec<ComposedPage> {
        let flow = self.build_flow(doc);
        let stamper = PageStamper::new(self.notice.clone(), &self.page, faces);
        let stage = doc.watermark.then(|| WatermarkStage::new(&stamper));

        let mut composer = PageComposer::new(&self.page, faces, stage);
        for element in &flow {
            composer.place(element);
        }
        composer.finish()
    }
}

impl Default for PdfEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl super::Encoder for PdfEncoder {
    #[instrument(skip_all, fields(title = %doc.title, watermark = doc.watermark))]
    fn encode(&self, doc: &BookDocument, writer: &mut dyn Write) -> Result<(), RenderError> {
        let mut pdf = PdfDocument::new(&doc.title);
        let mut faces = FaceSet::load()?;
        faces.register(&mut pdf);

        let composed = self.compose_with(doc, &faces);
        let (width, height) = (Mm(self.page.width_mm), Mm(self.page.height_mm));
        let pages: Vec<PdfPage> = composed
            .into_iter()
            .map(|page| PdfPage::new(width, height, page.ops))
            .collect();
        let page_count = pages.len();
        pdf.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let bytes = pdf.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            debug!(count = warnings.len(), "printpdf reported warnings");
        }

        writer.write_all(&bytes)?;
        info!(pages = page_count, bytes = bytes.len(), "PDF rendered");
        Ok(())
    }

    fn format(&self) -> ExportFormat {
        ExportFormat::Pdf
    }
}

fn block_element(block: Block) -> FlowElement {
    match block {
        Block::Heading { spans } => FlowElement::Heading {
            text: spans.iter().map(Span::as_str).collect(),
        },
        Block::Paragraph { spans, is_dialogue } => FlowElement::Paragraph {
            spans,
            style: if is_dialogue {
                ParagraphStyle::Dialogue
            } else {
                ParagraphStyle::Narrative
            },
        },
        Block::ListItem { spans } => FlowElement::ListItem { spans },
    }
}

/// A run of text within a word, in one weight
#[derive(Debug, Clone)]
struct Piece {
    text: String,
    bold: bool,
}

/// Unbreakable unit; pieces are set without space between them
#[derive(Debug, Clone)]
struct Word {
    pieces: Vec<Piece>,
}

impl Word {
    fn width(&self, faces: &FaceSet, size: f32) -> f32 {
        self.pieces
            .iter()
            .map(|p| faces.face(p.bold).width(&p.text, size))
            .sum()
    }

    fn text(&self) -> String {
        self.pieces.iter().map(|p| p.text.as_str()).collect()
    }
}

fn words_from_spans(spans: &[Span]) -> Vec<Word> {
    let mut words: Vec<Word> = Vec::new();
    let mut at_boundary = true;
    for span in spans {
        for (i, part) in span.as_str().split(' ').enumerate() {
            if i > 0 {
                at_boundary = true;
            }
            if part.is_empty() {
                continue;
            }
            let piece = Piece {
                text: part.to_string(),
                bold: span.is_bold(),
            };
            let glued = !at_boundary;
            at_boundary = false;
            if glued {
                if let Some(word) = words.last_mut() {
                    word.pieces.push(piece);
                    continue;
                }
            }
            words.push(Word {
                pieces: vec![piece],
            });
        }
    }
    words
}

fn words_from_text(text: &str, bold: bool) -> Vec<Word> {
    let span = if bold {
        Span::bold(text)
    } else {
        Span::text(text)
    };
    words_from_spans(&[span])
}

/// Greedy line breaking; the first line may be narrower
fn wrap_words(
    faces: &FaceSet,
    words: Vec<Word>,
    first_width: f32,
    width: f32,
    size: f32,
) -> Vec<Vec<Word>> {
    let space = space_width(faces, size);
    let mut lines: Vec<Vec<Word>> = Vec::new();
    let mut line: Vec<Word> = Vec::new();
    let mut used = 0.0;

    for word in words {
        let w = word.width(faces, size);
        let avail = if lines.is_empty() { first_width } else { width };
        if !line.is_empty() && used + space + w > avail {
            lines.push(std::mem::take(&mut line));
            used = 0.0;
        }
        used += if line.is_empty() { w } else { space + w };
        line.push(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

fn space_width(faces: &FaceSet, size: f32) -> f32 {
    faces.face(false).width(" ", size)
}

fn text_ops(face: &Face, text: &str, x: f32, y: f32, size: f32) -> Vec<Op> {
    vec![
        Op::StartTextSection,
        Op::SetTextCursor {
            pos: Point {
                x: Pt(x),
                y: Pt(y),
            },
        },
        Op::SetFontSize {
            size: Pt(size),
            font: face.id().clone(),
        },
        Op::WriteText {
            items: vec![TextItem::Text(text.to_string())],
            font: face.id().clone(),
        },
        Op::EndTextSection,
    ]
}

/// Horizontal treatment of a run of lines
#[derive(Debug, Clone, Copy)]
struct LineLayout {
    size: f32,
    /// Offset of every line from the left margin
    left: f32,
    /// Extra offset of the first line
    first_indent: f32,
    justify: bool,
}

/// Places flow elements onto pages
struct PageComposer<'a> {
    config: &'a PageConfig,
    faces: &'a FaceSet,
    pages: Vec<ComposedPage>,
    current: ComposedPage,
    /// Top of the next line, in points from the page bottom
    cursor: f32,
    stage: Option<WatermarkStage<'a, PageStamper<'a>>>,
    /// Characters set as `.notdef`
    missing: BTreeSet<char>,
}

impl<'a> PageComposer<'a> {
    fn new(
        config: &'a PageConfig,
        faces: &'a FaceSet,
        stage: Option<WatermarkStage<'a, PageStamper<'a>>>,
    ) -> Self {
        Self {
            config,
            faces,
            pages: Vec::new(),
            current: ComposedPage::default(),
            cursor: config.height_pt() - config.margin_pt(),
            stage,
            missing: BTreeSet::new(),
        }
    }

    fn place(&mut self, element: &FlowElement) {
        let body = self.config.body_size;
        let indent = self.config.indent_pt;
        match element {
            FlowElement::Centered { text, size, bold } => {
                let lines = wrap_words(
                    self.faces,
                    words_from_text(text, *bold),
                    self.config.content_width(),
                    self.config.content_width(),
                    *size,
                );
                for line in lines {
                    let width = line_width(self.faces, &line, *size);
                    let x = (self.config.width_pt() - width) / 2.0;
                    self.set_line(&line, x, 0.0, *size);
                }
            }
            FlowElement::Heading { text } => {
                let size = body + 2.0;
                self.cursor -= size * 0.5;
                let layout = LineLayout {
                    size,
                    left: 0.0,
                    first_indent: 0.0,
                    justify: false,
                };
                self.set_paragraph(words_from_text(text, true), layout);
            }
            FlowElement::TocLine {
                title,
                leader,
                page,
            } => {
                let text = format!("{} {} {}", title, leader, page);
                let layout = LineLayout {
                    size: body,
                    left: 0.0,
                    first_indent: 0.0,
                    justify: false,
                };
                self.set_paragraph(words_from_text(&text, false), layout);
            }
            FlowElement::Paragraph { spans, style } => {
                let layout = match style {
                    ParagraphStyle::Dialogue => LineLayout {
                        size: body,
                        left: indent,
                        first_indent: 0.0,
                        justify: false,
                    },
                    ParagraphStyle::Narrative => LineLayout {
                        size: body,
                        left: 0.0,
                        first_indent: indent,
                        justify: true,
                    },
                };
                self.set_paragraph(words_from_spans(spans), layout);
                self.cursor -= body * 0.5;
            }
            FlowElement::ListItem { spans } => {
                let mut words = words_from_text("\u{2022}", false);
                words.extend(words_from_spans(spans));
                let layout = LineLayout {
                    size: body,
                    left: indent,
                    first_indent: 0.0,
                    justify: false,
                };
                self.set_paragraph(words, layout);
                self.cursor -= body * 0.25;
            }
            FlowElement::Spacer(height) => {
                self.cursor -= height;
                if self.cursor < self.config.margin_pt() {
                    self.finalize_page();
                }
            }
            FlowElement::PageBreak => {
                if !self.current.is_empty() {
                    self.finalize_page();
                }
            }
        }
    }

    fn set_paragraph(&mut self, words: Vec<Word>, layout: LineLayout) {
        let width = self.config.content_width() - layout.left;
        let lines = wrap_words(
            self.faces,
            words,
            width - layout.first_indent,
            width,
            layout.size,
        );
        let last = lines.len().saturating_sub(1);
        for (i, line) in lines.iter().enumerate() {
            let first_indent = if i == 0 { layout.first_indent } else { 0.0 };
            let x = self.config.margin_pt() + layout.left + first_indent;
            let extra = if layout.justify && i < last && line.len() > 1 {
                let slack = width - first_indent - line_width(self.faces, line, layout.size);
                slack.max(0.0) / (line.len() - 1) as f32
            } else {
                0.0
            };
            self.set_line(line, x, extra, layout.size);
        }
    }

    /// Set one line starting at `x`, with `extra` added to every word gap
    fn set_line(&mut self, line: &[Word], x: f32, extra: f32, size: f32) {
        let height = size * self.config.line_spacing;
        if self.cursor - height < self.config.margin_pt() {
            self.finalize_page();
        }
        let baseline = self.cursor - size;
        let gap = space_width(self.faces, size) + extra;

        let mut x = x;
        for word in line {
            for piece in &word.pieces {
                let face = self.faces.face(piece.bold);
                self.missing.extend(self.faces.missing(&piece.text));
                self.current
                    .ops
                    .extend(text_ops(face, &piece.text, x, baseline, size));
                x += face.width(&piece.text, size);
            }
            x += gap;
        }
        self.current
            .lines
            .push(line.iter().map(Word::text).collect::<Vec<_>>().join(" "));
        self.cursor -= height;
    }

    /// Close the current page and fire the page-finalize event
    fn finalize_page(&mut self) {
        let page = std::mem::take(&mut self.current);
        if let Some(stage) = self.stage.as_mut() {
            stage.stamp(&page);
        }
        self.pages.push(page);
        self.cursor = self.config.height_pt() - self.config.margin_pt();
    }

    fn finish(mut self) -> Vec<ComposedPage> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.finalize_page();
        }
        let mut pages = self.pages;
        if let Some(stamps) = self.stage.and_then(WatermarkStage::commit) {
            for (page, stamp) in pages.iter_mut().zip(stamps) {
                page.ops.extend(stamp.ops);
                page.lines.push(stamp.text);
            }
        }
        if !self.missing.is_empty() {
            let chars: String = self.missing.iter().take(16).collect();
            warn!(
                count = self.missing.len(),
                chars = %chars,
                "Characters without a glyph in the embedded face"
            );
        }
        debug!(pages = pages.len(), "Composed pages");
        pages
    }
}

fn line_width(faces: &FaceSet, line: &[Word], size: f32) -> f32 {
    let words: f32 = line.iter().map(|w| w.width(faces, size)).sum();
    words + space_width(faces, size) * line.len().saturating_sub(1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::Encoder;
    use crate::types::{ChapterDocument, NormalizedChapter, TocEntry};
    use chrono::NaiveDate;

    fn paragraph(text: &str) -> Block {
        Block::Paragraph {
            spans: vec![Span::text(text)],
            is_dialogue: false,
        }
    }

    fn document(watermark: bool) -> BookDocument {
        let mut doc = BookDocument::new("Arden", NaiveDate::from_ymd_opt(2026, 5, 1).unwrap());
        doc.author = "Literary".to_string();
        doc.watermark = watermark;
        doc.toc = vec![TocEntry::new(1, "Dawn", 3), TocEntry::new(2, "Chapter 2", 4)];
        doc.chapters = vec![
            ChapterDocument::new(
                1,
                "Dawn",
                Some(NormalizedChapter::new(vec![
                    paragraph("The sun rose slowly over the hills of Arden."),
                    Block::Paragraph {
                        spans: vec![
                            Span::text("\u{201c}Look,\u{201d} said "),
                            Span::bold("Mara"),
                            Span::text(", pointing east."),
                        ],
                        is_dialogue: true,
                    },
                ])),
            ),
            ChapterDocument::new(2, "Chapter 2", None),
        ];
        doc
    }

    fn all_lines(pages: &[ComposedPage]) -> Vec<String> {
        pages.iter().flat_map(|p| p.lines.clone()).collect()
    }

    #[test]
    fn test_page_structure() {
        let pages = PdfEncoder::new().compose(&document(false)).unwrap();
        assert_eq!(pages.len(), 4);
        assert_eq!(pages[0].lines[0], "Arden");
        assert_eq!(pages[1].lines[0], "Table of Contents");
        assert!(pages[2].lines.contains(&"Dawn".to_string()));
        assert!(pages[3].lines.contains(&PLACEHOLDER_TEXT.to_string()));
    }

    #[test]
    fn test_toc_line_uses_policy_leader() {
        let pages = PdfEncoder::new().compose(&document(false)).unwrap();
        let leader = LayoutPolicy::default().toc_leader("Dawn", 3);
        assert!(pages[1].lines.contains(&format!("Dawn {} 3", leader)));
    }

    #[test]
    fn test_bold_span_glued_to_punctuation() {
        let pages = PdfEncoder::new().compose(&document(false)).unwrap();
        assert!(all_lines(&pages)
            .iter()
            .any(|l| l.contains("said Mara, pointing east.")));
    }

    #[test]
    fn test_watermark_on_every_page() {
        let pages = PdfEncoder::new().compose(&document(true)).unwrap();
        assert!(pages
            .iter()
            .all(|p| p.lines.last().map(String::as_str) == Some(WATERMARK_NOTICE)));
    }

    #[test]
    fn test_entitled_has_no_watermark() {
        let pages = PdfEncoder::new().compose(&document(false)).unwrap();
        assert!(!all_lines(&pages).iter().any(|l| l == WATERMARK_NOTICE));
    }

    #[test]
    fn test_failed_stamp_drops_watermark() {
        let encoder = PdfEncoder::new().with_notice("x".repeat(400));
        let pages = encoder.compose(&document(true)).unwrap();
        assert_eq!(pages.len(), 4);
        assert!(!all_lines(&pages).iter().any(|l| l.starts_with("xxx")));
    }

    #[test]
    fn test_long_chapter_flows_onto_more_pages() {
        let mut doc = document(false);
        let text = "word ".repeat(120);
        let blocks = (0..30).map(|_| paragraph(text.trim())).collect();
        doc.chapters[0].content = Some(NormalizedChapter::new(blocks));
        let pages = PdfEncoder::new().compose(&doc).unwrap();
        assert!(pages.len() > 4);
    }

    #[test]
    fn test_wrap_respects_width() {
        let faces = FaceSet::load().unwrap();
        let words = words_from_text("aaaa bbbb cccc dddd", false);
        let lines = wrap_words(&faces, words, 60.0, 60.0, 10.0);
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_encode_writes_pdf() {
        let mut out = Vec::new();
        PdfEncoder::new().encode(&document(true), &mut out).unwrap();
        assert!(out.starts_with(b"%PDF"));
    }

    #[test]
    fn test_fallback_title_has_no_label() {
        let pages = PdfEncoder::new().compose(&document(false)).unwrap();
        assert!(pages[2].lines.contains(&"Chapter 1".to_string()));
        let repeats = pages[3].lines.iter().filter(|l| *l == "Chapter 2").count();
        assert_eq!(repeats, 1);
    }

    /// Text of every page as a PDF reader decodes it
    fn page_texts(pdf: &[u8]) -> Vec<String> {
        let parsed = lopdf::Document::load_mem(pdf).unwrap();
        let count = parsed.get_pages().len() as u32;
        (1..=count)
            .map(|n| parsed.extract_text(&[n]).unwrap())
            .collect()
    }

    #[test]
    fn test_encoded_watermark_decodes_on_every_page() {
        let mut out = Vec::new();
        PdfEncoder::new().encode(&document(true), &mut out).unwrap();
        let texts = page_texts(&out);
        assert_eq!(texts.len(), 4);
        for text in &texts {
            assert!(text.contains(WATERMARK_NOTICE), "page text: {text}");
        }
    }

    #[test]
    fn test_encoded_text_keeps_typographic_characters() {
        let words = [
            "\u{ab}Bonjour\u{bb}",
            "\u{2018}quoted\u{2019}",
            "\u{2014}",
            "\u{201c}Look\u{201d}",
        ];
        let mut doc = document(false);
        doc.chapters[0].content = Some(NormalizedChapter::new(vec![paragraph(&words.join(" "))]));
        let mut out = Vec::new();
        PdfEncoder::new().encode(&doc, &mut out).unwrap();
        let text = page_texts(&out).concat();
        for word in words {
            assert!(text.contains(word), "missing {word} in {text}");
        }
        assert!(!text.contains(WATERMARK_NOTICE));
    }
}
