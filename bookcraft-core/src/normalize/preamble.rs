//! Wrapper noise around AI output: code fences, chatty preambles and
//! repeated chapter headings

use super::markup::{strip_markup, MARKDOWN_HEADING};
use super::restates_title;
use crate::types::Block;
use regex::Regex;
use std::sync::LazyLock;
use tracing::trace;

static FENCE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*```[A-Za-z0-9_+\-]*[ \t]*(?:\r?\n|$)").unwrap());

static FENCE_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\r?\n)[ \t]*```[ \t]*\s*$").unwrap());

/// A fence marker alone on its line
static FENCE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*```[A-Za-z0-9_+\-]*\s*$").unwrap());

static HEADING_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(?:<h[1-6]\b|#{1,6}\s)").unwrap());

/// Conversational openers, matched at the start of a line
static FILLER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^(?:",
        r"here\s+is|here\s+are|here's|here’s|certainly|sure|of\s+course|absolutely|",
        r"below\s+is|below\s+are|the\s+following|outline|",
        r"voici|voilà|bien\s+sûr|",
        r"aquí\s+está|aquí\s+tienes|claro|por\s+supuesto|",
        r"hier\s+ist|hier\s+sind|natürlich|gerne|",
        r"ecco|certo|",
        r"aqui\s+está|com\s+certeza",
        r")\b"
    ))
    .unwrap()
});

static BOLD_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\*\*[^*]+\*\*|__[^_]+__)\s*:?$").unwrap());

static RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:-{3,}|_{3,}|\*{3,}|={3,})$").unwrap());

/// Remove a code fence opening and/or closing the text
pub(crate) fn strip_fences(text: &str) -> String {
    let text = FENCE_OPEN.replace(text, "");
    FENCE_CLOSE.replace(&text, "").into_owned()
}

/// Drop filler lines that come before the first heading.
///
/// Text without any heading marker is returned untouched.
pub(crate) fn strip_preamble(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let Some(first_heading) = lines.iter().position(|l| HEADING_MARKER.is_match(l)) else {
        return text.to_string();
    };

    lines
        .iter()
        .enumerate()
        .filter(|(i, line)| {
            let filler = *i < first_heading && is_filler_line(line);
            if filler {
                trace!(line = %line.trim(), "Dropping preamble line");
            }
            !filler
        })
        .map(|(_, line)| *line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Block-level pass of the same rule, for filler that only shows once
/// bare lines are joined into paragraphs.
pub(crate) fn drop_preamble_blocks(blocks: Vec<Block>) -> Vec<Block> {
    let Some(first_heading) = blocks
        .iter()
        .position(|b| matches!(b, Block::Heading { .. }))
    else {
        return blocks;
    };

    blocks
        .into_iter()
        .enumerate()
        .filter(|(i, block)| *i >= first_heading || !is_filler_block(block))
        .map(|(_, block)| block)
        .collect()
}

fn is_filler_line(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return false;
    }
    BOLD_LINE.is_match(trimmed) || RULE.is_match(trimmed) || is_filler_text(&strip_markup(trimmed))
}

fn is_filler_block(block: &Block) -> bool {
    let spans = block.spans();
    let bold_only = matches!(block, Block::Paragraph { .. })
        && !spans.is_empty()
        && spans.iter().all(|s| s.is_bold());
    bold_only || is_filler_text(&block.plain_text())
}

fn is_filler_text(text: &str) -> bool {
    if FENCE_LINE.is_match(text) {
        return true;
    }
    let without_stars = text.replace('*', "");
    let opener = without_stars
        .trim_start_matches(|c: char| {
            c.is_whitespace() || c.is_ascii_digit() || matches!(c, '#' | '>' | '-' | '•' | '.' | ')')
        })
        .trim_end();
    FILLER.is_match(opener)
}

/// Keep only the first of a title line and a markdown header restating it
pub(crate) fn collapse_duplicate_heading(text: &str, chapter_number: u32, title: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let restates = |line: &str| restates_title(&heading_text(line), chapter_number, title);

    let mut kept: Vec<&str> = Vec::with_capacity(lines.len());
    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        kept.push(line);
        i += 1;
        if !restates(line) {
            continue;
        }
        while let Some(next) = lines[i..]
            .iter()
            .position(|l| !l.trim().is_empty())
            .map(|offset| i + offset)
        {
            if !(MARKDOWN_HEADING.is_match(lines[next]) && restates(lines[next])) {
                break;
            }
            trace!(line = %lines[next].trim(), "Dropping repeated chapter heading");
            kept.extend_from_slice(&lines[i..next]);
            i = next + 1;
        }
    }
    kept.join("\n")
}

fn heading_text(line: &str) -> String {
    strip_markup(line)
        .trim()
        .trim_start_matches('#')
        .replace('*', "")
        .trim()
        .to_string()
}
