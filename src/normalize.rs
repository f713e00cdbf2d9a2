//! Text normalization for keyword comparison.
//!
//! Produces the lexical form used by the keyword highlighter: lowercase
//! tokens with stopwords removed and suffixes stripped. The semantic match
//! never sees this form; it embeds the raw text.

/// Common English stop words excluded from keyword comparison.
const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "is", "are", "was", "were", "be", "been", "being",
    "in", "on", "at", "to", "for", "of", "with", "by", "from", "as",
    "and", "or", "but", "not", "no", "so", "if", "then", "do", "does",
    "did", "have", "has", "had", "it", "its", "this", "that", "these",
    "those", "i", "you", "we", "they", "he", "she", "my", "your", "our",
    "what", "how", "can", "will", "would", "should", "there", "here",
];

/// Normalize raw text into a space-joined string of base-form tokens.
///
/// Lowercases, splits on non-alphanumeric characters, drops stopwords and
/// empty tokens, and stems what remains.
pub fn normalize(text: &str) -> String {
    tokenize(text).join(" ")
}

/// Tokenize text into lowercase, stopword-filtered, stemmed terms.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .map(|s| s.to_lowercase())
        .filter(|s| !s.is_empty() && !STOP_WORDS.contains(&s.as_str()))
        .map(|s| stem(&s))
        .collect()
}

/// Suffix-stripping stemmer for English. Reduces related word forms to a
/// shared base (e.g. "returning" -> "return", "policies" -> "policy").
/// Not a full lemmatizer; close enough for highlight matching.
pub fn stem(word: &str) -> String {
    let w = word.to_lowercase();
    if w.len() < 4 {
        return w;
    }

    // Longest suffixes first
    const SUFFIXES: &[(&str, &str)] = &[
        ("ization", "ize"),
        ("ational", "ate"),
        ("fulness", "ful"),
        ("iveness", "ive"),
        ("tional", "tion"),
        ("ements", "e"),
        ("ations", "ate"),
        ("ments", "ment"),
        ("ation", "ate"),
        ("ities", "ity"),
        ("ously", "ous"),
        ("ively", "ive"),
        ("fully", "ful"),
        ("ings", ""),
        ("ment", ""),
        ("ness", ""),
        ("able", ""),
        ("ible", ""),
        ("ally", "al"),
        ("ful", ""),
        ("ous", ""),
        ("ive", ""),
        ("ing", ""),
        ("ies", "y"),
        ("ion", ""),
        ("ity", ""),
        ("ers", ""),
        ("est", ""),
        ("ed", ""),
        ("er", ""),
        ("ly", ""),
        ("es", ""),
        ("s", ""),
    ];

    for (suffix, replacement) in SUFFIXES {
        if w.ends_with(suffix) {
            let base = &w[..w.len() - suffix.len()];
            if base.len() >= 3 {
                return format!("{}{}", base, replacement);
            }
        }
    }

    w
}
