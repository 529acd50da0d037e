//! Word-processor encoder
//!
//! Writes a WordprocessingML package: every XML part is produced with a
//! quick-xml [`Writer`] and stored in a zip container. The document has
//! one section for the title block, one for the TOC and one per chapter;
//! each section starts on a new page.

use crate::error::{RenderError, WatermarkError};
use crate::layout::LayoutPolicy;
use crate::types::{Block, BookDocument, ExportFormat, Span, PLACEHOLDER_TEXT};
use crate::watermark::{validate_notice, WatermarkStage, WatermarkStamper, WATERMARK_NOTICE};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::{Cursor, Write};
use tracing::{info, instrument};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PKG_RELS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const CONTENT_TYPES_NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const REL_TYPE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Footer distance from the page bottom (12 mm in twips)
const FOOTER_TWIPS: u32 = 680;

/// A styled paragraph
#[derive(Debug, Clone, PartialEq)]
pub struct DocxParagraph {
    /// Paragraph style id from `word/styles.xml`
    pub style: &'static str,
    pub spans: Vec<Span>,
}

impl DocxParagraph {
    pub fn text(&self) -> String {
        self.spans.iter().map(Span::as_str).collect()
    }
}

/// One document section
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocxSection {
    pub paragraphs: Vec<DocxParagraph>,
}

impl DocxSection {
    fn push(&mut self, style: &'static str, spans: &[Span]) {
        self.paragraphs.push(DocxParagraph {
            style,
            spans: spans.to_vec(),
        });
    }

    fn push_text(&mut self, style: &'static str, text: &str) {
        self.push(style, &[Span::text(text)]);
    }
}

/// A footer part plus the relationship that links it to its section
#[derive(Debug, Clone, PartialEq)]
pub struct FooterPart {
    /// Part name under `word/`
    pub part_name: String,
    pub rel_id: String,
    pub text: String,
}

/// Gives every section a footer carrying the notice
#[derive(Debug, Clone)]
pub struct SectionFooterStamper {
    notice: String,
}

impl SectionFooterStamper {
    pub fn new(notice: impl Into<String>) -> Self {
        Self {
            notice: notice.into(),
        }
    }
}

impl WatermarkStamper for SectionFooterStamper {
    type Target = DocxSection;
    type Stamp = FooterPart;

    fn stamp(&self, _section: &DocxSection, index: usize) -> Result<FooterPart, WatermarkError> {
        validate_notice(&self.notice)?;
        let number = index + 1;
        Ok(FooterPart {
            part_name: format!("footer{}.xml", number),
            rel_id: format!("rIdFooter{}", number),
            text: self.notice.clone(),
        })
    }
}

/// Encoder for DOCX
#[derive(Debug, Clone)]
pub struct DocxEncoder {
    policy: LayoutPolicy,
    notice: String,
}

impl DocxEncoder {
    pub fn new() -> Self {
        Self {
            policy: LayoutPolicy::default(),
            notice: WATERMARK_NOTICE.to_string(),
        }
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

    /// Title block, TOC, then one section per chapter
    pub fn build_sections(&self, doc: &BookDocument) -> Vec<DocxSection> {
        let mut sections = Vec::with_capacity(doc.chapters.len() + 2);

        let mut title = DocxSection::default();
        title.push_text("Title", &doc.title);
        if !doc.author.is_empty() {
            title.push_text("Subtitle", &doc.author);
        }
        title.push_text("Subtitle", &doc.display_date());
        sections.push(title);

        let mut toc = DocxSection::default();
        toc.push_text("TOCHeading", "Table of Contents");
        for entry in &doc.toc {
            let line = format!(
                "{} {} {}",
                entry.title,
                self.policy.toc_leader(&entry.title, entry.estimated_page),
                entry.estimated_page
            );
            toc.push_text("TOCLine", &line);
        }
        sections.push(toc);

        for chapter in &doc.chapters {
            let mut section = DocxSection::default();
            if let Some(label) = chapter.label() {
                section.push_text("ChapterLabel", &label);
            }
            section.push_text("Heading1", &chapter.title);
            match chapter.body_markup() {
                Some(markup) => {
                    for block in self.policy.extract_blocks(&markup) {
                        match &block {
                            Block::Heading { spans } => section.push("Heading2", spans),
                            Block::Paragraph { spans, is_dialogue } => {
                                let style = if *is_dialogue { "Dialogue" } else { "Narrative" };
                                section.push(style, spans);
                            }
                            Block::ListItem { spans } => {
                                let mut item = vec![Span::text("\u{2022} ")];
                                item.extend(spans.iter().cloned());
                                section.push("ListBullet", &item);
                            }
                        }
                    }
                }
                None => section.push_text("Narrative", PLACEHOLDER_TEXT),
            }
            sections.push(section);
        }
        sections
    }

    /// Footers for every section, or `None` when unwatermarked or stamping failed
    fn stamp_sections(&self, doc: &BookDocument, sections: &[DocxSection]) -> Option<Vec<FooterPart>> {
        if !doc.watermark {
            return None;
        }
        let stamper = SectionFooterStamper::new(self.notice.clone());
        let mut stage = WatermarkStage::new(&stamper);
        for section in sections {
            stage.stamp(section);
        }
        stage.commit()
    }
}

impl Default for DocxEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl super::Encoder for DocxEncoder {
    #[instrument(skip_all, fields(title = %doc.title, watermark = doc.watermark))]
    fn encode(&self, doc: &BookDocument, writer: &mut dyn Write) -> Result<(), RenderError> {
        let sections = self.build_sections(doc);
        let footers = self.stamp_sections(doc, &sections);
        let footers = footers.as_deref().unwrap_or_default();

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let mut parts: Vec<(String, Vec<u8>)> = vec![
            ("[Content_Types].xml".to_string(), xml_part(|w| write_content_types(w, footers))?),
            ("_rels/.rels".to_string(), xml_part(write_root_rels)?),
            ("docProps/core.xml".to_string(), xml_part(|w| write_core_properties(w, doc))?),
            ("word/document.xml".to_string(), xml_part(|w| write_document(w, &sections, footers))?),
            ("word/styles.xml".to_string(), STYLES_XML.as_bytes().to_vec()),
            ("word/_rels/document.xml.rels".to_string(), xml_part(|w| write_document_rels(w, footers))?),
        ];
        for footer in footers {
            parts.push((format!("word/{}", footer.part_name), xml_part(|w| write_footer(w, footer))?));
        }

        for (name, xml) in &parts {
            zip.start_file(name.as_str(), options)?;
            zip.write_all(xml)?;
        }
        let bytes = zip.finish()?.into_inner();

        writer.write_all(&bytes)?;
        info!(sections = sections.len(), bytes = bytes.len(), "DOCX rendered");
        Ok(())
    }

    fn format(&self) -> ExportFormat {
        ExportFormat::Docx
    }
}

type XmlWriter = Writer<Cursor<Vec<u8>>>;

/// Run `body` after the XML declaration and return the finished part
fn xml_part<F>(body: F) -> Result<Vec<u8>, RenderError>
where
    F: FnOnce(&mut XmlWriter) -> Result<(), quick_xml::Error>,
{
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    body(&mut writer)?;
    Ok(writer.into_inner().into_inner())
}

fn start<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    attributes: &[(&str, &str)],
) -> Result<(), quick_xml::Error> {
    let mut elem = BytesStart::new(name);
    elem.extend_attributes(attributes.iter().copied());
    writer.write_event(Event::Start(elem))?;
    Ok(())
}

fn end<W: Write>(writer: &mut Writer<W>, name: &str) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn empty<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    attributes: &[(&str, &str)],
) -> Result<(), quick_xml::Error> {
    let mut elem = BytesStart::new(name);
    elem.extend_attributes(attributes.iter().copied());
    writer.write_event(Event::Empty(elem))?;
    Ok(())
}

fn write_text_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    attributes: &[(&str, &str)],
    content: &str,
) -> Result<(), quick_xml::Error> {
    start(writer, name, attributes)?;
    writer.write_event(Event::Text(BytesText::new(content)))?;
    end(writer, name)
}

fn write_paragraph<W: Write>(
    writer: &mut Writer<W>,
    paragraph: &DocxParagraph,
) -> Result<(), quick_xml::Error> {
    start(writer, "w:p", &[])?;
    start(writer, "w:pPr", &[])?;
    empty(writer, "w:pStyle", &[("w:val", paragraph.style)])?;
    end(writer, "w:pPr")?;
    for span in &paragraph.spans {
        start(writer, "w:r", &[])?;
        if span.is_bold() {
            start(writer, "w:rPr", &[])?;
            empty(writer, "w:b", &[])?;
            end(writer, "w:rPr")?;
        }
        write_text_element(writer, "w:t", &[("xml:space", "preserve")], span.as_str())?;
        end(writer, "w:r")?;
    }
    end(writer, "w:p")
}

fn write_section_properties<W: Write>(
    writer: &mut Writer<W>,
    footer: Option<&FooterPart>,
) -> Result<(), quick_xml::Error> {
    let footer_twips = FOOTER_TWIPS.to_string();
    start(writer, "w:sectPr", &[])?;
    if let Some(footer) = footer {
        empty(
            writer,
            "w:footerReference",
            &[("w:type", "default"), ("r:id", footer.rel_id.as_str())],
        )?;
    }
    empty(writer, "w:type", &[("w:val", "nextPage")])?;
    empty(writer, "w:pgSz", &[("w:w", "11906"), ("w:h", "16838")])?;
    empty(
        writer,
        "w:pgMar",
        &[
            ("w:top", "1134"),
            ("w:right", "1134"),
            ("w:bottom", "1134"),
            ("w:left", "1134"),
            ("w:header", "709"),
            ("w:footer", footer_twips.as_str()),
            ("w:gutter", "0"),
        ],
    )?;
    end(writer, "w:sectPr")
}

/// Sections are closed by a `sectPr` in an empty paragraph, except the
/// last one, whose `sectPr` sits directly in the body
fn write_document<W: Write>(
    writer: &mut Writer<W>,
    sections: &[DocxSection],
    footers: &[FooterPart],
) -> Result<(), quick_xml::Error> {
    start(writer, "w:document", &[("xmlns:w", W_NS), ("xmlns:r", R_NS)])?;
    start(writer, "w:body", &[])?;
    let last = sections.len().saturating_sub(1);
    for (i, section) in sections.iter().enumerate() {
        for paragraph in &section.paragraphs {
            write_paragraph(writer, paragraph)?;
        }
        let footer = footers.get(i);
        if i < last {
            start(writer, "w:p", &[])?;
            start(writer, "w:pPr", &[])?;
            write_section_properties(writer, footer)?;
            end(writer, "w:pPr")?;
            end(writer, "w:p")?;
        } else {
            write_section_properties(writer, footer)?;
        }
    }
    end(writer, "w:body")?;
    end(writer, "w:document")
}

fn write_footer<W: Write>(writer: &mut Writer<W>, footer: &FooterPart) -> Result<(), quick_xml::Error> {
    start(writer, "w:ftr", &[("xmlns:w", W_NS), ("xmlns:r", R_NS)])?;
    let paragraph = DocxParagraph {
        style: "Footer",
        spans: vec![Span::text(footer.text.as_str())],
    };
    write_paragraph(writer, &paragraph)?;
    end(writer, "w:ftr")
}

fn write_content_types<W: Write>(
    writer: &mut Writer<W>,
    footers: &[FooterPart],
) -> Result<(), quick_xml::Error> {
    start(writer, "Types", &[("xmlns", CONTENT_TYPES_NS)])?;
    empty(
        writer,
        "Default",
        &[
            ("Extension", "rels"),
            ("ContentType", "application/vnd.openxmlformats-package.relationships+xml"),
        ],
    )?;
    empty(writer, "Default", &[("Extension", "xml"), ("ContentType", "application/xml")])?;

    let mut overrides = vec![
        (
            "/word/document.xml".to_string(),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
        ),
        (
            "/word/styles.xml".to_string(),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml",
        ),
        (
            "/docProps/core.xml".to_string(),
            "application/vnd.openxmlformats-package.core-properties+xml",
        ),
    ];
    for footer in footers {
        overrides.push((
            format!("/word/{}", footer.part_name),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml",
        ));
    }
    for (part, content_type) in &overrides {
        empty(
            writer,
            "Override",
            &[("PartName", part.as_str()), ("ContentType", *content_type)],
        )?;
    }
    end(writer, "Types")
}

fn write_relationship<W: Write>(
    writer: &mut Writer<W>,
    id: &str,
    kind: &str,
    target: &str,
) -> Result<(), quick_xml::Error> {
    empty(
        writer,
        "Relationship",
        &[("Id", id), ("Type", kind), ("Target", target)],
    )
}

fn write_root_rels(writer: &mut XmlWriter) -> Result<(), quick_xml::Error> {
    start(writer, "Relationships", &[("xmlns", PKG_RELS_NS)])?;
    write_relationship(
        writer,
        "rId1",
        &format!("{}/officeDocument", REL_TYPE),
        "word/document.xml",
    )?;
    write_relationship(
        writer,
        "rId2",
        &format!("{}/metadata/core-properties", PKG_RELS_NS),
        "docProps/core.xml",
    )?;
    end(writer, "Relationships")
}

fn write_document_rels<W: Write>(
    writer: &mut Writer<W>,
    footers: &[FooterPart],
) -> Result<(), quick_xml::Error> {
    start(writer, "Relationships", &[("xmlns", PKG_RELS_NS)])?;
    write_relationship(writer, "rIdStyles", &format!("{}/styles", REL_TYPE), "styles.xml")?;
    for footer in footers {
        write_relationship(
            writer,
            &footer.rel_id,
            &format!("{}/footer", REL_TYPE),
            &footer.part_name,
        )?;
    }
    end(writer, "Relationships")
}

fn write_core_properties<W: Write>(
    writer: &mut Writer<W>,
    doc: &BookDocument,
) -> Result<(), quick_xml::Error> {
    start(
        writer,
        "cp:coreProperties",
        &[
            (
                "xmlns:cp",
                "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
            ),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?;
    write_text_element(writer, "dc:title", &[], &doc.title)?;
    write_text_element(writer, "dc:creator", &[], &doc.author)?;
    write_text_element(writer, "dc:language", &[], &doc.language)?;
    let created = format!("{}T00:00:00Z", doc.date.format("%Y-%m-%d"));
    write_text_element(
        writer,
        "dcterms:created",
        &[("xsi:type", "dcterms:W3CDTF")],
        &created,
    )?;
    end(writer, "cp:coreProperties")
}

// Sizes are half-points, indents twips.
const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Georgia" w:hAnsi="Georgia" w:cs="Georgia"/><w:sz w:val="22"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after="120" w:line="312" w:lineRule="auto"/></w:pPr></w:pPrDefault></w:docDefaults>
<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
<w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:basedOn w:val="Normal"/><w:pPr><w:spacing w:before="2400" w:after="360"/><w:jc w:val="center"/></w:pPr><w:rPr><w:b/><w:sz w:val="52"/></w:rPr></w:style>
<w:style w:type="paragraph" w:styleId="Subtitle"><w:name w:val="Subtitle"/><w:basedOn w:val="Normal"/><w:pPr><w:jc w:val="center"/></w:pPr><w:rPr><w:i/><w:sz w:val="28"/></w:rPr></w:style>
<w:style w:type="paragraph" w:styleId="TOCHeading"><w:name w:val="TOC Heading"/><w:basedOn w:val="Normal"/><w:pPr><w:spacing w:after="240"/><w:jc w:val="center"/></w:pPr><w:rPr><w:b/><w:sz w:val="36"/></w:rPr></w:style>
<w:style w:type="paragraph" w:styleId="TOCLine"><w:name w:val="TOC Line"/><w:basedOn w:val="Normal"/><w:rPr><w:rFonts w:ascii="Courier New" w:hAnsi="Courier New" w:cs="Courier New"/><w:sz w:val="20"/></w:rPr></w:style>
<w:style w:type="paragraph" w:styleId="ChapterLabel"><w:name w:val="Chapter Label"/><w:basedOn w:val="Normal"/><w:pPr><w:jc w:val="center"/></w:pPr><w:rPr><w:sz w:val="24"/></w:rPr></w:style>
<w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:pPr><w:keepNext/><w:spacing w:after="360"/><w:jc w:val="center"/><w:outlineLvl w:val="0"/></w:pPr><w:rPr><w:b/><w:sz w:val="36"/></w:rPr></w:style>
<w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/><w:basedOn w:val="Normal"/><w:pPr><w:keepNext/><w:spacing w:before="240"/><w:outlineLvl w:val="1"/></w:pPr><w:rPr><w:b/><w:sz w:val="26"/></w:rPr></w:style>
<w:style w:type="paragraph" w:styleId="Dialogue"><w:name w:val="Dialogue"/><w:basedOn w:val="Normal"/><w:pPr><w:ind w:left="360" w:firstLine="0"/><w:jc w:val="left"/></w:pPr></w:style>
<w:style w:type="paragraph" w:styleId="Narrative"><w:name w:val="Narrative"/><w:basedOn w:val="Normal"/><w:pPr><w:ind w:firstLine="360"/><w:jc w:val="both"/></w:pPr></w:style>
<w:style w:type="paragraph" w:styleId="ListBullet"><w:name w:val="List Bullet"/><w:basedOn w:val="Normal"/><w:pPr><w:ind w:left="360"/></w:pPr></w:style>
<w:style w:type="paragraph" w:styleId="Footer"><w:name w:val="footer"/><w:basedOn w:val="Normal"/><w:pPr><w:jc w:val="center"/></w:pPr><w:rPr><w:color w:val="999999"/><w:sz w:val="16"/></w:rPr></w:style>
</w:styles>"#;
