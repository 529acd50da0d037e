//! Block and span types for normalized chapter content

use serde::{Deserialize, Serialize};

/// Inline run of text. Only bold survives normalization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Span {
    /// Plain text
    Text(String),

    /// Bold/strong text
    Bold(String),
}

impl Span {
    /// Create a plain text span
    pub fn text(s: impl Into<String>) -> Self {
        Span::Text(s.into())
    }

    /// Create a bold span
    pub fn bold(s: impl Into<String>) -> Self {
        Span::Bold(s.into())
    }

    /// The span's text, regardless of weight
    pub fn as_str(&self) -> &str {
        match self {
            Span::Text(s) | Span::Bold(s) => s,
        }
    }

    pub fn is_bold(&self) -> bool {
        matches!(self, Span::Bold(_))
    }

    fn with_text(&self, text: String) -> Self {
        match self {
            Span::Text(_) => Span::Text(text),
            Span::Bold(_) => Span::Bold(text),
        }
    }
}

/// Block-level element of a normalized chapter
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// Sub-heading inside a chapter
    Heading { spans: Vec<Span> },

    /// Paragraph of prose, classified as dialogue or narrative
    Paragraph { spans: Vec<Span>, is_dialogue: bool },

    /// Item of a bulleted or numbered list
    ListItem { spans: Vec<Span> },
}

impl Block {
    /// Inline spans of this block
    pub fn spans(&self) -> &[Span] {
        match self {
            Block::Heading { spans } | Block::ListItem { spans } => spans,
            Block::Paragraph { spans, .. } => spans,
        }
    }

    /// Concatenated text of all spans
    pub fn plain_text(&self) -> String {
        self.spans().iter().map(Span::as_str).collect()
    }

    /// Whether the block carries no visible text
    pub fn is_empty(&self) -> bool {
        self.spans().iter().all(|s| s.as_str().trim().is_empty())
    }

    /// Number of whitespace-separated words
    pub fn word_count(&self) -> usize {
        self.plain_text().split_whitespace().count()
    }

    /// Serialize to the canonical inline markup
    pub fn to_markup(&self) -> String {
        let inner = spans_to_markup(self.spans());
        match self {
            Block::Heading { .. } => format!("<h3>{}</h3>", inner),
            Block::Paragraph { .. } => format!("<p>{}</p>", inner),
            Block::ListItem { .. } => format!("<li>{}</li>", inner),
        }
    }
}

/// Serialize spans, escaping markup-significant characters
pub fn spans_to_markup(spans: &[Span]) -> String {
    let mut out = String::new();
    for span in spans {
        match span {
            Span::Text(s) => out.push_str(&escape_markup(s)),
            Span::Bold(s) => {
                out.push_str("<strong>");
                out.push_str(&escape_markup(s));
                out.push_str("</strong>");
            }
        }
    }
    out
}

/// Bring spans into canonical form.
///
/// Whitespace-only bold becomes plain, neighbours of the same weight merge,
/// whitespace runs collapse to one space across span boundaries, the ends are
/// trimmed and empty spans dropped. Asterisks never survive.
pub fn canonical_spans(spans: Vec<Span>) -> Vec<Span> {
    let spans = spans.into_iter().map(|span| match span {
        Span::Bold(s) if s.trim().is_empty() => Span::Text(s),
        other => other,
    });
    let merged = merge_adjacent(spans);

    let mut collapsed = Vec::with_capacity(merged.len());
    let mut prev_space = true;
    for span in merged {
        let mut buf = String::with_capacity(span.as_str().len());
        for ch in span.as_str().chars() {
            if ch == '*' {
                continue;
            }
            if ch.is_whitespace() {
                if !prev_space {
                    buf.push(' ');
                    prev_space = true;
                }
            } else {
                buf.push(ch);
                prev_space = false;
            }
        }
        collapsed.push(span.with_text(buf));
    }

    if let Some(last) = collapsed.iter_mut().rev().find(|s| !s.as_str().is_empty()) {
        let trimmed = last.as_str().trim_end().to_string();
        *last = last.with_text(trimmed);
    }
    collapsed.retain(|s| !s.as_str().is_empty());
    merge_adjacent(collapsed)
}

fn merge_adjacent(spans: impl IntoIterator<Item = Span>) -> Vec<Span> {
    let mut out: Vec<Span> = Vec::new();
    for span in spans {
        if let Some(prev) = out.last_mut() {
            match (prev, &span) {
                (Span::Text(p), Span::Text(n)) | (Span::Bold(p), Span::Bold(n)) => {
                    p.push_str(n);
                    continue;
                }
                _ => {}
            }
        }
        out.push(span);
    }
    out
}

/// Escape the characters that would otherwise read as markup
pub fn escape_markup(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
