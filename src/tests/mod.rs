mod web;

use crate::corpus::{Corpus, FaqEntry};
use crate::semantic::{Embedder, EmbeddingError};

/// Embedder backed by canned vectors for exact texts. Anything without a
/// canned vector errors, so a test fails loudly when the engine embeds a
/// text it was not expected to.
pub struct StubEmbedder {
    dimensions: usize,
    canned: Vec<(String, Vec<f32>)>,
}

impl StubEmbedder {
    pub fn new(dimensions: usize, canned: &[(&str, &[f32])]) -> Self {
        Self {
            dimensions,
            canned: canned
                .iter()
                .map(|(text, vector)| (text.to_string(), vector.to_vec()))
                .collect(),
        }
    }
}

impl Embedder for StubEmbedder {
    fn name(&self) -> &str {
        "canned"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.canned
            .iter()
            .find(|(known, _)| known == text)
            .map(|(_, vector)| vector.clone())
            .ok_or_else(|| {
                EmbeddingError::EmbeddingFailed(format!("no canned vector for {text:?}"))
            })
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        texts.iter().map(|text| self.embed(text)).collect()
    }
}

pub fn corpus_of(pairs: &[(&str, &str)]) -> Corpus {
    Corpus::from_entries(
        pairs
            .iter()
            .map(|(question, answer)| FaqEntry {
                question: question.to_string(),
                answer: answer.to_string(),
            })
            .collect(),
    )
}
