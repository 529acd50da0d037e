//! Normalized chapter: one chapter of AI output after cleanup

use super::Block;
use serde::{Deserialize, Serialize};

/// A chapter's content reduced to headings, paragraphs and list items
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizedChapter {
    /// The content blocks, in reading order
    pub blocks: Vec<Block>,
}

impl NormalizedChapter {
    /// Create a chapter from blocks
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Total words across all blocks
    pub fn word_count(&self) -> usize {
        self.blocks.iter().map(Block::word_count).sum()
    }

    /// Canonical markup: one block per line, blocks separated by a blank line
    pub fn to_markup(&self) -> String {
        self.blocks
            .iter()
            .map(Block::to_markup)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Blocks to render under a chapter heading.
    ///
    /// A leading heading that restates the chapter title is skipped, since
    /// every backend prints the title itself.
    pub fn body_blocks<'a>(&'a self, restates_title: impl Fn(&str) -> bool) -> &'a [Block] {
        match self.blocks.first() {
            Some(first @ Block::Heading { .. }) if restates_title(&first.plain_text()) => {
                &self.blocks[1..]
            }
            _ => &self.blocks,
        }
    }
}
