//! Markdown emphasis to bold tags

use regex::Regex;
use std::sync::LazyLock;

static BULLET_ASTERISK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^([ \t]*)\*[ \t]+").unwrap());

static STRONG_DOUBLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^\n]+?)\*\*").unwrap());

static STRONG_SINGLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*\n]+?)\*").unwrap());

/// Turn `* item` into a list marker and `**x**` / `*x*` into `<strong>`.
/// Whatever asterisks remain afterwards are dropped.
pub(crate) fn convert_emphasis(text: &str) -> String {
    let text = BULLET_ASTERISK.replace_all(text, "${1}- ");
    let text = STRONG_DOUBLE.replace_all(&text, "<strong>$1</strong>");
    let text = STRONG_SINGLE.replace_all(&text, "<strong>$1</strong>");
    text.replace('*', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_and_single() {
        assert_eq!(
            convert_emphasis("a **big** and *small* word"),
            "a <strong>big</strong> and <strong>small</strong> word"
        );
    }

    #[test]
    fn test_bullets_are_list_markers() {
        assert_eq!(
            convert_emphasis("* first\n  * **second**"),
            "- first\n  - <strong>second</strong>"
        );
    }

    #[test]
    fn test_stray_asterisks_removed() {
        assert_eq!(convert_emphasis("rating: 5*"), "rating: 5");
        assert_eq!(convert_emphasis("**unclosed"), "unclosed");
    }
}
