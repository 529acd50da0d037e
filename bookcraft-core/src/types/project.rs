//! The book project record handed to the export core

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// A book project as stored by the project service.
/// The export core only ever reads it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookProject {
    /// Unique identifier for this project
    pub id: Uuid,

    /// Owning user
    #[serde(default)]
    pub owner: String,

    /// Book title
    pub title: String,

    /// Language code (ISO 639-1)
    #[serde(default = "default_language")]
    pub language: String,

    /// Writing-style tag chosen at project creation
    #[serde(default)]
    pub writing_style: String,

    /// Target page count
    pub pages: u32,

    /// Target chapter count
    pub chapters: u32,

    /// Raw outline text, possibly empty
    #[serde(default)]
    pub outline: String,

    /// Raw AI content per chapter number; missing numbers are not generated yet
    #[serde(default)]
    pub chapters_content: BTreeMap<u32, String>,
}

fn default_language() -> String {
    "en".to_string()
}

impl BookProject {
    /// Create an empty project with the given title and targets
    pub fn new(title: impl Into<String>, pages: u32, chapters: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner: String::new(),
            title: title.into(),
            language: default_language(),
            writing_style: String::new(),
            pages,
            chapters,
            outline: String::new(),
            chapters_content: BTreeMap::new(),
        }
    }

    /// Set the owner
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    /// Set the outline
    pub fn with_outline(mut self, outline: impl Into<String>) -> Self {
        self.outline = outline.into();
        self
    }

    /// Set the writing style
    pub fn with_writing_style(mut self, style: impl Into<String>) -> Self {
        self.writing_style = style.into();
        self
    }

    /// Add raw content for a chapter
    pub fn with_chapter(mut self, number: u32, content: impl Into<String>) -> Self {
        self.chapters_content.insert(number, content.into());
        self
    }

    /// Raw content for a chapter, treating blank content as absent
    pub fn chapter_content(&self, number: u32) -> Option<&str> {
        self.chapters_content
            .get(&number)
            .map(String::as_str)
            .filter(|c| !c.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_deserializes_string_keys() {
        let json = r#"{
            "id": "12345678-1234-1234-1234-123456789abc",
            "owner": "u1",
            "title": "Arden",
            "pages": 50,
            "chapters": 5,
            "chapters_content": {"1": "It began.", "3": "   "}
        }"#;
        let project: BookProject = serde_json::from_str(json).unwrap();
        assert_eq!(project.language, "en");
        assert_eq!(project.chapter_content(1), Some("It began."));
        assert_eq!(project.chapter_content(2), None);
        assert_eq!(project.chapter_content(3), None);
    }
}
