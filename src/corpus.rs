//! FAQ corpus loading and substring suggestions.
//!
//! The corpus is a static ordered list of question/answer pairs read once at
//! startup, from `faq_data.json` or, failing that, `faq_data.csv`. Entries
//! are identified by index position and never mutated after load.

use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default number of suggestions returned for a partial query.
pub const SUGGESTION_LIMIT: usize = 5;

/// Minimum partial-query length before suggestions are produced.
const SUGGESTION_MIN_CHARS: usize = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("malformed corpus file {path}: {reason}")]
    Malformed { path: String, reason: String },
}

/// The loaded FAQ corpus. Read-only after construction.
#[derive(Debug, Default, Clone)]
pub struct Corpus {
    entries: Vec<FaqEntry>,
}

impl Corpus {
    pub fn from_entries(entries: Vec<FaqEntry>) -> Self {
        Self { entries }
    }

    /// Load the corpus, trying the JSON file first and falling back to CSV.
    ///
    /// Both files absent is not fatal: the service degrades to answering
    /// nothing. A file that exists but fails to parse is a configuration
    /// error and aborts the load.
    pub fn load(json_path: &Path, csv_path: &Path) -> Result<Self, CorpusError> {
        match Self::load_json(json_path) {
            Ok(corpus) => {
                log::info!("loaded {} FAQs from {}", corpus.len(), json_path.display());
                return Ok(corpus);
            }
            Err(CorpusError::Io { ref source, .. }) if source.kind() == ErrorKind::NotFound => {}
            Err(err) => return Err(err),
        }

        match Self::load_csv(csv_path) {
            Ok(corpus) => {
                log::info!("loaded {} FAQs from {}", corpus.len(), csv_path.display());
                Ok(corpus)
            }
            Err(CorpusError::Io { ref source, .. }) if source.kind() == ErrorKind::NotFound => {
                log::error!(
                    "no FAQ data file found ({} or {}); serving an empty corpus",
                    json_path.display(),
                    csv_path.display()
                );
                Ok(Self::default())
            }
            Err(err) => Err(err),
        }
    }

    fn load_json(path: &Path) -> Result<Self, CorpusError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CorpusError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let entries: Vec<FaqEntry> =
            serde_json::from_str(&raw).map_err(|err| CorpusError::Malformed {
                path: path.display().to_string(),
                reason: err.to_string(),
            })?;

        Ok(Self { entries })
    }

    fn load_csv(path: &Path) -> Result<Self, CorpusError> {
        if let Err(source) = std::fs::metadata(path) {
            return Err(CorpusError::Io {
                path: path.display().to_string(),
                source,
            });
        }

        let mut reader = csv::Reader::from_path(path).map_err(|err| CorpusError::Malformed {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;

        let headers = reader
            .headers()
            .map_err(|err| CorpusError::Malformed {
                path: path.display().to_string(),
                reason: err.to_string(),
            })?
            .clone();

        let question_col = headers.iter().position(|h| h == "question");
        let answer_col = headers.iter().position(|h| h == "answer");
        let (question_col, answer_col) = match (question_col, answer_col) {
            (Some(q), Some(a)) => (q, a),
            _ => {
                return Err(CorpusError::Malformed {
                    path: path.display().to_string(),
                    reason: "missing `question` or `answer` column".to_string(),
                })
            }
        };

        let mut entries = vec![];
        for (row, record) in reader.records().enumerate() {
            let record = record.map_err(|err| CorpusError::Malformed {
                path: path.display().to_string(),
                reason: err.to_string(),
            })?;

            let get = |col: usize, name: &str| {
                record
                    .get(col)
                    .map(str::to_string)
                    .ok_or_else(|| CorpusError::Malformed {
                        path: path.display().to_string(),
                        reason: format!("row {} is missing `{}`", row + 1, name),
                    })
            };

            entries.push(FaqEntry {
                question: get(question_col, "question")?,
                answer: get(answer_col, "answer")?,
            });
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[FaqEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&FaqEntry> {
        self.entries.get(index)
    }

    pub fn questions(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.question.as_str())
    }

    /// Find up to `limit` questions containing `query` as a case-insensitive
    /// substring, in corpus order. Queries shorter than 2 characters yield
    /// nothing.
    pub fn suggestions(&self, query: &str, limit: usize) -> Vec<String> {
        if query.chars().count() < SUGGESTION_MIN_CHARS {
            return vec![];
        }

        let query_lower = query.to_lowercase();
        let mut suggestions = vec![];

        for entry in &self.entries {
            if entry.question.to_lowercase().contains(&query_lower) {
                suggestions.push(entry.question.clone());
                if suggestions.len() >= limit {
                    break;
                }
            }
        }

        suggestions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Corpus {
        Corpus::from_entries(vec![
            FaqEntry {
                question: "What is your return policy?".to_string(),
                answer: "You can return items within 30 days.".to_string(),
            },
            FaqEntry {
                question: "How do I track my order?".to_string(),
                answer: "Visit https://example.com/track to track it.".to_string(),
            },
            FaqEntry {
                question: "Do you ship internationally?".to_string(),
                answer: "Yes, we ship worldwide.".to_string(),
            },
        ])
    }

    #[test]
    fn test_suggestions_substring_match() {
        let corpus = sample();
        let got = corpus.suggestions("return", SUGGESTION_LIMIT);
        assert_eq!(got, vec!["What is your return policy?".to_string()]);
    }

    #[test]
    fn test_suggestions_case_insensitive() {
        let corpus = sample();
        let got = corpus.suggestions("RETURN", SUGGESTION_LIMIT);
        assert_eq!(got.len(), 1);
    }

    #[test]
    fn test_suggestions_short_query_yields_nothing() {
        let corpus = sample();
        assert!(corpus.suggestions("r", SUGGESTION_LIMIT).is_empty());
        assert!(corpus.suggestions("", SUGGESTION_LIMIT).is_empty());
    }

    #[test]
    fn test_suggestions_respects_limit_and_order() {
        let entries = (0..10)
            .map(|i| FaqEntry {
                question: format!("shipping question {i}"),
                answer: "answer".to_string(),
            })
            .collect();
        let corpus = Corpus::from_entries(entries);

        let got = corpus.suggestions("shipping", 5);
        assert_eq!(got.len(), 5);
        assert_eq!(got[0], "shipping question 0");
        assert_eq!(got[4], "shipping question 4");
    }

    #[test]
    fn test_suggestions_empty_corpus() {
        let corpus = Corpus::default();
        assert!(corpus.suggestions("anything", SUGGESTION_LIMIT).is_empty());
    }

    #[test]
    fn test_load_json() {
        let tmp = tempfile::tempdir().unwrap();
        let json_path = tmp.path().join("faq_data.json");
        std::fs::write(
            &json_path,
            r#"[{"question": "Q1", "answer": "A1"}, {"question": "Q2", "answer": "A2"}]"#,
        )
        .unwrap();

        let corpus = Corpus::load(&json_path, &tmp.path().join("faq_data.csv")).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.get(0).unwrap().question, "Q1");
    }

    #[test]
    fn test_load_falls_back_to_csv() {
        let tmp = tempfile::tempdir().unwrap();
        let csv_path = tmp.path().join("faq_data.csv");
        std::fs::write(&csv_path, "question,answer\nQ1,A1\nQ2,A2\n").unwrap();

        let corpus = Corpus::load(&tmp.path().join("faq_data.json"), &csv_path).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.get(1).unwrap().answer, "A2");
    }

    #[test]
    fn test_load_both_missing_degrades_to_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let corpus = Corpus::load(
            &tmp.path().join("faq_data.json"),
            &tmp.path().join("faq_data.csv"),
        )
        .unwrap();
        assert!(corpus.is_empty());
    }

    #[test]
    fn test_load_malformed_json_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let json_path = tmp.path().join("faq_data.json");
        std::fs::write(&json_path, r#"[{"question": "Q1"}]"#).unwrap();

        let result = Corpus::load(&json_path, &tmp.path().join("faq_data.csv"));
        assert!(matches!(result, Err(CorpusError::Malformed { .. })));
    }

    #[test]
    fn test_load_csv_missing_column_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let csv_path = tmp.path().join("faq_data.csv");
        std::fs::write(&csv_path, "question,response\nQ1,A1\n").unwrap();

        let result = Corpus::load(&tmp.path().join("faq_data.json"), &csv_path);
        assert!(matches!(result, Err(CorpusError::Malformed { .. })));
    }
}
