//! The assembled book handed to the encoders

use super::{fallback_title, Block, NormalizedChapter, TocEntry};
use chrono::NaiveDate;

/// Placeholder sentence for chapters without content
pub const PLACEHOLDER_TEXT: &str = "This chapter has not been generated yet.";

/// Everything an encoder needs to render one export
#[derive(Debug, Clone, PartialEq)]
pub struct BookDocument {
    pub title: String,

    /// Shown under the title; the project's writing style
    pub author: String,

    /// Language code (ISO 639-1)
    pub language: String,

    /// Date printed on the title page
    pub date: NaiveDate,

    /// Estimated TOC, page numbers already offset for the target format
    pub toc: Vec<TocEntry>,

    /// Chapters `1..=N`, in order
    pub chapters: Vec<ChapterDocument>,

    /// Whether the watermark overlay applies
    pub watermark: bool,
}

impl BookDocument {
    pub fn new(title: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            author: String::new(),
            language: "en".to_string(),
            date,
            toc: Vec::new(),
            chapters: Vec::new(),
            watermark: false,
        }
    }

    /// Date formatted for the title page
    pub fn display_date(&self) -> String {
        self.date.format("%B %-d, %Y").to_string()
    }
}

/// One chapter slot: resolved title plus content, if generated
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterDocument {
    pub number: u32,
    pub title: String,
    pub content: Option<NormalizedChapter>,
}

impl ChapterDocument {
    pub fn new(number: u32, title: impl Into<String>, content: Option<NormalizedChapter>) -> Self {
        Self {
            number,
            title: title.into(),
            content,
        }
    }

    /// "Chapter N" line printed above the title, unless the title already
    /// is that fallback
    pub fn label(&self) -> Option<String> {
        let label = fallback_title(self.number);
        (self.title != label).then_some(label)
    }

    /// Content blocks under the chapter heading, without a heading that
    /// merely repeats the title. `None` for missing chapters.
    pub fn body_blocks(&self) -> Option<&[Block]> {
        let content = self.content.as_ref()?;
        Some(content.body_blocks(|text| {
            crate::normalize::restates_title(text, self.number, &self.title)
        }))
    }

    /// Canonical markup of [`Self::body_blocks`]
    pub fn body_markup(&self) -> Option<String> {
        self.body_blocks()
            .map(|blocks| NormalizedChapter::new(blocks.to_vec()).to_markup())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Span;

    #[test]
    fn test_body_skips_repeated_title() {
        let content = NormalizedChapter::new(vec![
            Block::Heading {
                spans: vec![Span::text("Chapter 2: Dusk")],
            },
            Block::Paragraph {
                spans: vec![Span::text("Night fell.")],
                is_dialogue: false,
            },
        ]);
        let chapter = ChapterDocument::new(2, "Dusk", Some(content));
        assert_eq!(chapter.body_blocks().map(<[Block]>::len), Some(1));
        assert_eq!(chapter.body_markup().as_deref(), Some("<p>Night fell.</p>"));
    }

    #[test]
    fn test_missing_chapter_has_no_body() {
        assert!(ChapterDocument::new(3, "Chapter 3", None).body_blocks().is_none());
    }

    #[test]
    fn test_label_skipped_for_fallback_title() {
        assert_eq!(
            ChapterDocument::new(1, "Dawn", None).label().as_deref(),
            Some("Chapter 1")
        );
        assert_eq!(ChapterDocument::new(2, "Chapter 2", None).label(), None);
    }

    #[test]
    fn test_display_date() {
        let doc = BookDocument::new("T", NaiveDate::from_ymd_opt(2026, 3, 7).unwrap());
        assert_eq!(doc.display_date(), "March 7, 2026");
    }
}
