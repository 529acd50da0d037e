//! Page-number estimation for the table of contents

use crate::types::{ChapterTitleMap, ExportFormat, TocEntry};

/// First chapter page in paginated formats (after the title and TOC pages)
pub const PAGINATED_START_PAGE: u32 = 3;

/// First chapter "page" in hypertext output
pub const HTML_START_PAGE: u32 = 1;

/// Words that fit on one printed page
pub const WORDS_PER_PAGE: usize = 275;

/// Where chapter numbering starts for a format
pub fn start_page_for(format: ExportFormat) -> u32 {
    if format.is_paginated() {
        PAGINATED_START_PAGE
    } else {
        HTML_START_PAGE
    }
}

/// Estimate one TOC entry per chapter `1..=chapters`.
///
/// `word_counts[i]` is the word count of chapter `i + 1`, `None` when the
/// chapter has not been generated. Generated chapters take
/// `max(1, words / WORDS_PER_PAGE)` pages; the others take their share of
/// the target page count, at least one.
pub fn estimate_toc(
    pages: u32,
    chapters: u32,
    word_counts: &[Option<usize>],
    titles: &ChapterTitleMap,
    start_page: u32,
) -> Vec<TocEntry> {
    if chapters == 0 {
        return Vec::new();
    }
    let share = (pages / chapters).max(1);

    let mut current_page = start_page;
    (1..=chapters)
        .map(|number| {
            let words = word_counts.get(number as usize - 1).copied().flatten();
            let entry = TocEntry::new(number, titles.title_for(number), current_page)
                .with_generated(words.is_some());
            let span = match words {
                Some(words) => ((words / WORDS_PER_PAGE) as u32).max(1),
                None => share,
            };
            current_page = current_page.saturating_add(span);
            entry
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_generated_chapter() {
        let mut titles = ChapterTitleMap::new();
        titles.insert(1, "Dawn");
        let toc = estimate_toc(50, 5, &[Some(300)], &titles, PAGINATED_START_PAGE);
        let pages: Vec<u32> = toc.iter().map(|e| e.estimated_page).collect();
        assert_eq!(pages, vec![3, 4, 14, 24, 34]);
        assert_eq!(toc[0].title, "Dawn");
        assert!(toc[0].generated);
        assert_eq!(toc[1].title, "Chapter 2");
        assert!(!toc[1].generated);
    }

    #[test]
    fn test_html_starts_at_one() {
        let toc = estimate_toc(10, 2, &[], &ChapterTitleMap::new(), start_page_for(ExportFormat::Html));
        assert_eq!(toc[0].estimated_page, 1);
        assert_eq!(toc[1].estimated_page, 6);
    }

    #[test]
    fn test_short_chapters_take_a_page() {
        let toc = estimate_toc(1, 3, &[Some(10), None, Some(0)], &ChapterTitleMap::new(), 3);
        let pages: Vec<u32> = toc.iter().map(|e| e.estimated_page).collect();
        assert_eq!(pages, vec![3, 4, 5]);
    }

    #[test]
    fn test_no_chapters() {
        assert!(estimate_toc(10, 0, &[], &ChapterTitleMap::new(), 3).is_empty());
    }

    proptest! {
        #[test]
        fn prop_toc_is_monotonic(
            chapters in 1u32..40,
            extra_pages in 0u32..400,
            words in prop::collection::vec(prop::option::of(0usize..20_000), 0..40),
        ) {
            let pages = chapters + extra_pages;
            let toc = estimate_toc(pages, chapters, &words, &ChapterTitleMap::new(), PAGINATED_START_PAGE);
            prop_assert_eq!(toc.len(), chapters as usize);
            prop_assert_eq!(toc[0].estimated_page, PAGINATED_START_PAGE);
            for pair in toc.windows(2) {
                prop_assert_eq!(pair[1].chapter_number, pair[0].chapter_number + 1);
                prop_assert!(pair[1].estimated_page > pair[0].estimated_page);
            }
        }
    }
}
