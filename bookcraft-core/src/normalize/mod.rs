//! Content normalizer
//!
//! Turns one chapter of raw AI output (markdown, HTML fragments, chatty
//! preambles, code fences, or any mix of these) into a [`NormalizedChapter`].
//! Normalizing never fails, and normalizing already-normalized markup
//! gives back the same chapter.

mod emphasis;
pub(crate) mod markup;
mod preamble;

pub use markup::strip_markup;

use crate::layout::LayoutPolicy;
use crate::types::NormalizedChapter;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static EXCESS_BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n(?:[ \t]*\r?\n){2,}").unwrap());

/// Cleans raw chapter text into canonical blocks
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    policy: LayoutPolicy,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom layout policy for dialogue classification
    pub fn with_policy(policy: LayoutPolicy) -> Self {
        Self { policy }
    }

    /// Normalize one chapter's raw text
    pub fn normalize(&self, raw: &str, chapter_number: u32, title: &str) -> NormalizedChapter {
        let text = preamble::strip_fences(raw);
        let balanced = markup::containers_balanced(&text);
        let text = if balanced {
            markup::line_up(&text)
        } else {
            text
        };
        let text = preamble::strip_preamble(&text);
        let text = preamble::collapse_duplicate_heading(&text, chapter_number, title);
        let text = emphasis::convert_emphasis(&text);
        let text = EXCESS_BLANK_LINES.replace_all(&text, "\n\n");
        let text = text.trim();

        let blocks = if balanced {
            markup::parse_blocks(text, &self.policy)
        } else {
            debug!(chapter = chapter_number, "Unbalanced containers, falling back to plain paragraphs");
            markup::plain_paragraphs(text, &self.policy)
        };
        let blocks = preamble::drop_preamble_blocks(blocks);

        debug!(chapter = chapter_number, blocks = blocks.len(), "Normalized chapter");
        NormalizedChapter::new(blocks)
    }

    /// Normalize and serialize to canonical markup
    pub fn normalize_markup(&self, raw: &str, chapter_number: u32, title: &str) -> String {
        self.normalize(raw, chapter_number, title).to_markup()
    }
}

/// Whether `text` restates the chapter title, with or without a
/// `Chapter {n}` prefix. Case, punctuation and spacing are ignored.
pub fn restates_title(text: &str, chapter_number: u32, title: &str) -> bool {
    let candidate = simplify(text);
    if candidate.is_empty() {
        return false;
    }
    let bare = simplify(title);
    let prefix = format!("chapter {}", chapter_number);

    candidate == bare
        || candidate == prefix
        || candidate
            .strip_prefix(&prefix)
            .is_some_and(|rest| rest.starts_with(' ') && rest.trim() == bare)
}

fn simplify(s: &str) -> String {
    s.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
