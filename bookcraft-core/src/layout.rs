//! Layout policy shared by the paginated backends
//!
//! The PDF and DOCX encoders both hold a [`LayoutPolicy`] and ask it how
//! wide a TOC line is, which paragraphs are dialogue, where page breaks go
//! and how a chapter's blocks are recovered from its markup.

use crate::normalize::markup::{container_blocks, strip_markup};
use crate::types::{canonical_spans, Block, Span};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Ordered fallback tiers for recovering a chapter's blocks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    /// Split on `<p>`, `<h1-6>` and `<li>` containers
    Containers,
    /// Strip markup and split on blank lines
    BlankLineRuns,
    /// Strip markup and gather consecutive non-empty lines
    LineRuns,
}

impl ExtractionStrategy {
    /// Run this tier over a chapter's markup
    pub fn extract(&self, markup: &str, policy: &LayoutPolicy) -> Vec<Block> {
        match self {
            ExtractionStrategy::Containers => container_blocks(markup, policy),
            ExtractionStrategy::BlankLineRuns => strip_markup(markup)
                .split("\n\n")
                .filter_map(|run| policy.text_run(run))
                .collect(),
            ExtractionStrategy::LineRuns => {
                let stripped = strip_markup(markup);
                let mut runs = Vec::new();
                let mut current: Vec<&str> = Vec::new();
                for line in stripped.lines() {
                    if line.trim().is_empty() {
                        if !current.is_empty() {
                            runs.push(current.join(" "));
                            current.clear();
                        }
                    } else {
                        current.push(line.trim());
                    }
                }
                if !current.is_empty() {
                    runs.push(current.join(" "));
                }
                runs.iter().filter_map(|run| policy.text_run(run)).collect()
            }
        }
    }

    /// Whether the tier's result is good enough to stop there
    pub fn accepts(&self, blocks: &[Block]) -> bool {
        match self {
            ExtractionStrategy::Containers => blocks.len() >= 2,
            ExtractionStrategy::BlankLineRuns | ExtractionStrategy::LineRuns => !blocks.is_empty(),
        }
    }
}

/// Layout rules for the paginated backends
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LayoutPolicy {
    /// Characters per TOC line, title and page number included
    pub toc_line_width: usize,
    /// Leader dots never drop below this
    pub min_leader_dots: usize,
    /// A paragraph containing any of these is dialogue
    pub dialogue_marks: Vec<char>,
    /// Stripped-text runs must be longer than this to count
    pub min_run_chars: usize,
    /// Extraction tiers, tried in order
    pub extraction_order: Vec<ExtractionStrategy>,
}

impl Default for LayoutPolicy {
    fn default() -> Self {
        Self {
            toc_line_width: 70,
            min_leader_dots: 5,
            dialogue_marks: vec![
                '"', '\u{201c}', '\u{201d}', '\u{201e}', '\u{ab}', '\u{bb}', '\u{300c}',
                '\u{300d}', '\u{300e}', '\u{300f}',
            ],
            min_run_chars: 20,
            extraction_order: vec![
                ExtractionStrategy::Containers,
                ExtractionStrategy::BlankLineRuns,
                ExtractionStrategy::LineRuns,
            ],
        }
    }
}

impl LayoutPolicy {
    /// Number of leader dots between a TOC title and its page number
    pub fn leader_len(&self, title: &str, page: u32) -> usize {
        let used = title.chars().count() + page.to_string().len();
        self.toc_line_width
            .saturating_sub(used)
            .max(self.min_leader_dots)
    }

    /// The dot leader itself
    pub fn toc_leader(&self, title: &str, page: u32) -> String {
        ".".repeat(self.leader_len(title, page))
    }

    pub fn is_dialogue(&self, text: &str) -> bool {
        text.chars().any(|c| self.dialogue_marks.contains(&c))
    }

    /// Chapters are followed by a page break, except the last one
    pub fn page_break_after(&self, index: usize, total: usize) -> bool {
        index + 1 < total
    }

    /// First accepted tier and its blocks, or `None` if every tier fails
    pub fn select_extraction(&self, markup: &str) -> Option<(ExtractionStrategy, Vec<Block>)> {
        self.extraction_order.iter().find_map(|strategy| {
            let blocks = strategy.extract(markup, self);
            strategy.accepts(&blocks).then_some((*strategy, blocks))
        })
    }

    /// Blocks to lay out for a chapter; empty means heading only
    pub fn extract_blocks(&self, markup: &str) -> Vec<Block> {
        match self.select_extraction(markup) {
            Some((strategy, blocks)) => {
                debug!(?strategy, blocks = blocks.len(), "Extraction tier selected");
                blocks
            }
            None => {
                debug!("No extraction tier accepted the chapter");
                Vec::new()
            }
        }
    }

    fn text_run(&self, run: &str) -> Option<Block> {
        let run = run.trim();
        if run.chars().count() <= self.min_run_chars {
            return None;
        }
        Some(Block::Paragraph {
            is_dialogue: self.is_dialogue(run),
            spans: canonical_spans(vec![Span::text(run)]),
        })
    }
}
