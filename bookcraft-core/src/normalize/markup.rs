//! Block container recognition and inline span extraction

use crate::layout::LayoutPolicy;
use crate::types::{canonical_spans, Block, Span};
use regex::Regex;
use scraper::{Html, Node};
use std::sync::LazyLock;

/// Paragraph, heading and list-item containers, matched lazily to their close tag
static CONTAINER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<p\b[^>]*>.*?</p\s*>|<h[1-6]\b[^>]*>.*?</h[1-6]\s*>|<li\b[^>]*>.*?</li\s*>")
        .unwrap()
});

static CONTAINER_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(?:p|h[1-6]|li)\b[^>]*>").unwrap());

static CONTAINER_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</(?:p|h[1-6]|li)\s*>").unwrap());

static BLOCK_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</(?:p|h[1-6]|li|div|blockquote)\s*>|<br\s*/?>").unwrap());

static BLANK_SPLIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n[ \t]*\n").unwrap());

/// `# Heading` style line
pub(crate) static MARKDOWN_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#{1,6}\s+(.*?)[\s#]*$").unwrap());

static RULE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:-{3,}|_{3,}|\*{3,}|={3,})\s*$").unwrap());

static BULLET_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-•–]\s+(.+)$").unwrap());

static NUMBERED_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+[.)]\s+.+)$").unwrap());

/// Put every container on a line of its own, with its content on one line
pub(crate) fn line_up(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut last = 0;
    for m in CONTAINER.find_iter(text) {
        out.push_str(&text[last..m.start()]);
        out.push('\n');
        out.push_str(&m.as_str().replace(['\r', '\n'], " "));
        out.push('\n');
        last = m.end();
    }
    out.push_str(&text[last..]);
    out
}

/// Whether every container that opens also closes
pub(crate) fn containers_balanced(text: &str) -> bool {
    CONTAINER_OPEN.find_iter(text).count() == CONTAINER_CLOSE.find_iter(text).count()
}

/// Parse lined-up markup into blocks.
///
/// Tagged containers are taken as they are; bare text between them is
/// re-wrapped line by line.
pub(crate) fn parse_blocks(text: &str, policy: &LayoutPolicy) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut last = 0;
    for m in CONTAINER.find_iter(text) {
        bare_blocks(&text[last..m.start()], policy, &mut blocks);
        if let Some(block) = container_block(m.as_str(), policy) {
            blocks.push(block);
        }
        last = m.end();
    }
    bare_blocks(&text[last..], policy, &mut blocks);
    blocks.retain(|b| !b.is_empty());
    blocks
}

/// Blocks recovered from already-normalized or tagged markup
pub(crate) fn container_blocks(markup: &str, policy: &LayoutPolicy) -> Vec<Block> {
    parse_blocks(&line_up(markup), policy)
}

fn container_block(container: &str, policy: &LayoutPolicy) -> Option<Block> {
    let open_end = container.find('>')? + 1;
    let close_start = container.rfind("</")?;
    if close_start < open_end {
        return None;
    }
    let spans = inline_spans(&container[open_end..close_start]);
    let tag = container[1..open_end].to_ascii_lowercase();

    let block = if tag.starts_with("li") {
        Block::ListItem { spans }
    } else if tag.starts_with('h') {
        Block::Heading { spans }
    } else {
        paragraph(spans, policy)
    };
    Some(block)
}

fn bare_blocks(text: &str, policy: &LayoutPolicy, blocks: &mut Vec<Block>) {
    let mut run: Vec<&str> = Vec::new();

    let flush = |run: &mut Vec<&str>, blocks: &mut Vec<Block>| {
        if !run.is_empty() {
            blocks.push(paragraph(inline_spans(&run.join("\n")), policy));
            run.clear();
        }
    };

    for line in text.lines() {
        if line.trim().is_empty() || RULE_LINE.is_match(line) {
            flush(&mut run, blocks);
        } else if let Some(caps) = MARKDOWN_HEADING.captures(line) {
            flush(&mut run, blocks);
            blocks.push(Block::Heading {
                spans: inline_spans(&caps[1]),
            });
        } else if let Some(caps) = BULLET_LINE
            .captures(line)
            .or_else(|| NUMBERED_LINE.captures(line))
        {
            flush(&mut run, blocks);
            blocks.push(Block::ListItem {
                spans: inline_spans(&caps[1]),
            });
        } else {
            run.push(line);
        }
    }
    flush(&mut run, blocks);
}

fn paragraph(spans: Vec<Span>, policy: &LayoutPolicy) -> Block {
    let text: String = spans.iter().map(Span::as_str).collect();
    Block::Paragraph {
        is_dialogue: policy.is_dialogue(&text),
        spans,
    }
}

/// Inline spans of an HTML fragment. Only `<strong>`/`<b>` keep their weight;
/// every other tag is unwrapped to its text.
pub(crate) fn inline_spans(fragment: &str) -> Vec<Span> {
    let html = Html::parse_fragment(fragment);
    let mut spans = Vec::new();
    collect_spans(*html.root_element(), false, &mut spans);
    canonical_spans(spans)
}

fn collect_spans(node: ego_tree::NodeRef<Node>, bold: bool, out: &mut Vec<Span>) {
    for child in node.children() {
        match child.value() {
            Node::Text(text) => {
                let s: &str = text;
                out.push(if bold { Span::bold(s) } else { Span::text(s) });
            }
            Node::Element(el) => match el.name() {
                "strong" | "b" => collect_spans(child, true, out),
                "br" => out.push(Span::text(" ")),
                _ => collect_spans(child, bold, out),
            },
            _ => {}
        }
    }
}

/// All text of a markup string, block boundaries kept as blank lines
pub fn strip_markup(markup: &str) -> String {
    let spaced = BLOCK_BREAK.replace_all(markup, "$0\n\n");
    let html = Html::parse_fragment(&spaced);
    html.root_element().text().collect()
}

/// Last-resort rendering: tags stripped, blank-line runs as paragraphs
pub(crate) fn plain_paragraphs(text: &str, policy: &LayoutPolicy) -> Vec<Block> {
    let stripped = strip_markup(text);
    BLANK_SPLIT
        .split(&stripped)
        .map(|run| paragraph(canonical_spans(vec![Span::text(run)]), policy))
        .filter(|b| !b.is_empty())
        .collect()
}
