//! Table of contents types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single entry in the table of contents
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TocEntry {
    /// Chapter number, 1-based
    pub chapter_number: u32,

    /// Display title
    pub title: String,

    /// Estimated first page of the chapter
    pub estimated_page: u32,

    /// Whether the chapter has content yet
    pub generated: bool,
}

impl TocEntry {
    /// Create a new TOC entry
    pub fn new(chapter_number: u32, title: impl Into<String>, estimated_page: u32) -> Self {
        Self {
            chapter_number,
            title: title.into(),
            estimated_page,
            generated: true,
        }
    }

    /// Mark whether the chapter has been generated
    pub fn with_generated(mut self, generated: bool) -> Self {
        self.generated = generated;
        self
    }
}

/// Chapter number to title, as recovered from the outline
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChapterTitleMap {
    titles: BTreeMap<u32, String>,
}

impl ChapterTitleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a title; a later insert for the same chapter wins
    pub fn insert(&mut self, chapter: u32, title: impl Into<String>) {
        self.titles.insert(chapter, title.into());
    }

    /// Title recovered from the outline, if any
    pub fn get(&self, chapter: u32) -> Option<&str> {
        self.titles.get(&chapter).map(String::as_str)
    }

    /// Title to display, falling back to "Chapter {n}"
    pub fn title_for(&self, chapter: u32) -> String {
        self.get(chapter)
            .map(str::to_string)
            .unwrap_or_else(|| fallback_title(chapter))
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

/// Title used for chapters the outline does not name
pub fn fallback_title(chapter: u32) -> String {
    format!("Chapter {}", chapter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_fallback() {
        let mut titles = ChapterTitleMap::new();
        titles.insert(1, "Dawn");
        assert_eq!(titles.title_for(1), "Dawn");
        assert_eq!(titles.title_for(2), "Chapter 2");
        assert_eq!(titles.len(), 1);
    }

    #[test]
    fn test_last_insert_wins() {
        let mut titles = ChapterTitleMap::new();
        titles.insert(3, "First");
        titles.insert(3, "Second");
        assert_eq!(titles.get(3), Some("Second"));
    }
}
