use std::sync::LazyLock;

use regex::Regex;

static BRACKETED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\[.*?\]").unwrap());
static PARENTHETICAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\(.*?\)").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static SPACE_BEFORE_PUNCT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+([,.!?])").unwrap());

/// Normalize raw caption text for summarization.
///
/// Drops `[Music]`-style annotations and `(inaudible)`-style asides, collapses
/// whitespace, and pulls terminal punctuation back onto the preceding word.
/// Applying it twice gives the same result as applying it once.
pub fn clean(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    let cleaned = BRACKETED.replace_all(text, "");
    let cleaned = PARENTHETICAL.replace_all(&cleaned, "");
    let cleaned = WHITESPACE.replace_all(&cleaned, " ");
    let cleaned = SPACE_BEFORE_PUNCT.replace_all(&cleaned, "$1");

    cleaned.trim().to_string()
}
