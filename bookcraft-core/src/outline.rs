//! Chapter title extraction from the book outline
//!
//! Outlines come back from the model in many shapes. Titles are recovered
//! with an ordered list of [`TitlePattern`]s: the first pattern that finds
//! anything at all decides the whole map.

use crate::normalize::markup::line_up;
use crate::normalize::strip_markup;
use crate::types::ChapterTitleMap;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static CHAPTER_PREFIXED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^chapter\s+(\d+)\s*[:.\-–—]\s*(.+)$").unwrap());

static NUMBERED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)\.\s+(.+)$").unwrap());

static LOOSE_CHAPTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bchapter\s+(\d+)\b(.*)$").unwrap());

static HEADING_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:<h[1-6]\b|#{1,6}\s|\*\*.+\*\*\s*$|<(?:strong|b)>.*</(?:strong|b)>\s*$)")
        .unwrap()
});

/// Title recognition rules, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitlePattern {
    /// `Chapter 3: The Storm`, also with `.`, `-` or dash separators
    ChapterPrefixed,
    /// `3. The Storm`
    Numbered,
    /// A heading line mentioning `Chapter 3` anywhere; the rest is the title
    LooseHeading,
}

impl TitlePattern {
    pub const ALL: [TitlePattern; 3] = [
        TitlePattern::ChapterPrefixed,
        TitlePattern::Numbered,
        TitlePattern::LooseHeading,
    ];

    /// Match a single outline line
    pub fn match_line(&self, line: &OutlineLine) -> Option<(u32, String)> {
        let (number, title) = match self {
            TitlePattern::ChapterPrefixed => {
                let caps = CHAPTER_PREFIXED.captures(&line.text)?;
                (caps[1].parse().ok()?, caps[2].to_string())
            }
            TitlePattern::Numbered => {
                let caps = NUMBERED.captures(&line.text)?;
                (caps[1].parse().ok()?, caps[2].to_string())
            }
            TitlePattern::LooseHeading => {
                if !line.is_heading {
                    return None;
                }
                let caps = LOOSE_CHAPTER.captures(&line.text)?;
                (caps[1].parse().ok()?, caps[2].to_string())
            }
        };
        clean_title(&title).map(|title| (number, title))
    }

    /// Apply this pattern to every line; later duplicates win
    pub fn extract(&self, lines: &[OutlineLine]) -> ChapterTitleMap {
        let mut titles = ChapterTitleMap::new();
        for (number, title) in lines.iter().filter_map(|line| self.match_line(line)) {
            titles.insert(number, title);
        }
        titles
    }
}

/// One outline line with its markup removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineLine {
    /// Text without tags, leading `#` or asterisks
    pub text: String,
    /// Whether the raw line was a heading (tag, `#` header or bold line)
    pub is_heading: bool,
}

impl OutlineLine {
    pub fn parse(raw: &str) -> Self {
        let text = strip_markup(raw)
            .trim()
            .trim_start_matches('#')
            .replace('*', "")
            .trim()
            .to_string();
        Self {
            text,
            is_heading: HEADING_LINE.is_match(raw),
        }
    }
}

/// Split an outline into cleaned lines, one per container or text line
pub fn outline_lines(outline: &str) -> Vec<OutlineLine> {
    line_up(outline)
        .lines()
        .map(OutlineLine::parse)
        .filter(|line| !line.text.is_empty())
        .collect()
}

/// Recover chapter titles from an outline.
///
/// Never fabricates entries: chapters the outline does not name are simply
/// absent from the map.
pub fn extract_titles(outline: &str) -> ChapterTitleMap {
    let lines = outline_lines(outline);
    for pattern in TitlePattern::ALL {
        let titles = pattern.extract(&lines);
        if !titles.is_empty() {
            debug!(?pattern, count = titles.len(), "Title pattern matched");
            return titles;
        }
    }
    debug!("No chapter titles found in outline");
    ChapterTitleMap::new()
}

fn clean_title(raw: &str) -> Option<String> {
    let is_artifact =
        |c: char| c.is_whitespace() || matches!(c, ':' | '-' | '*' | '#' | '_' | '–' | '—');
    let is_quote = |c: char| matches!(c, '"' | '\'' | '“' | '”' | '«' | '»' | '‘' | '’');

    let title = raw
        .trim_matches(is_artifact)
        .trim_matches(is_quote)
        .trim();
    (!title.is_empty()).then(|| title.to_string())
}
