//! Answer decoration: keyword highlighting and clickable links.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());

static URL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(https?://[\w\-./?&=%#:~]+)").unwrap());

/// Wrap answer words that appear in the normalized query in `<mark>` tags.
///
/// `normalized_query` is the output of [`crate::normalize::normalize`]. Each
/// whitespace-separated answer word is lowercased and stripped of non-word
/// characters for comparison; the original word is what gets wrapped, and
/// only when the cleaned form is longer than 2 characters. Rejoining uses
/// single spaces, so runs of whitespace in the answer are not preserved.
pub fn highlight_keywords(answer: &str, normalized_query: &str) -> String {
    let query_words: HashSet<&str> = normalized_query.split_whitespace().collect();

    answer
        .split_whitespace()
        .map(|word| {
            let clean = NON_WORD.replace_all(&word.to_lowercase(), "").into_owned();
            if clean.chars().count() > 2 && query_words.contains(clean.as_str()) {
                format!("<mark>{word}</mark>")
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Wrap every http/https URL in an anchor pointing at itself, opening in a
/// new context with safe-referrer attributes. The original URL text is both
/// the target and the label.
pub fn linkify(text: &str) -> String {
    URL_REGEX
        .replace_all(
            text,
            r#"<a href="$1" target="_blank" rel="noopener noreferrer">$1</a>"#,
        )
        .into_owned()
}
