//! The chat engine: corpus, embeddings, and matching behind one context.
//!
//! Built once at startup and shared read-only across requests. Replaces
//! ambient globals with an explicit object so initialization order is
//! visible at the call site.

use crate::config::Config;
use crate::corpus::{Corpus, CorpusError, SUGGESTION_LIMIT};
use crate::format::{highlight_keywords, linkify};
use crate::normalize::normalize;
use crate::semantic::{CorpusIndex, Embedder, EmbeddingError, EmbeddingModel, MatcherError};

use serde::Serialize;
use std::path::Path;
use std::time::Duration;

/// Fixed reply when no FAQ scores above the confidence threshold.
pub const NO_ANSWER: &str =
    "Sorry, I don't have an answer for that. Could you please rephrase your question?";

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("corpus error: {0}")]
    Corpus(#[from] CorpusError),

    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("matcher error: {0}")]
    Matcher(#[from] MatcherError),

    #[error("corpus/embedding length mismatch: {entries} entries, {vectors} vectors")]
    LengthMismatch { entries: usize, vectors: usize },
}

/// One chat reply, ready for serialization.
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub answer: String,
    pub suggestions: Vec<String>,
    pub confidence: f32,
}

pub struct ChatEngine {
    corpus: Corpus,
    index: CorpusIndex,
    model: Box<dyn Embedder>,
    threshold: f32,
}

impl ChatEngine {
    /// Load the corpus, load the model, and batch-embed every question.
    ///
    /// Model load failure aborts startup. A missing corpus does not: the
    /// engine then answers every query with the no-answer fallback.
    pub fn boot(config: &Config, base_path: &Path) -> Result<Self, EngineError> {
        let corpus = Corpus::load(
            &base_path.join(&config.corpus.json_file),
            &base_path.join(&config.corpus.csv_file),
        )?;

        let model = EmbeddingModel::new(
            &config.semantic.model,
            base_path.to_path_buf(),
            Some(Duration::from_secs(config.semantic.download_timeout_secs)),
        )?;

        Self::from_parts(corpus, Box::new(model), config.semantic.threshold)
    }

    /// Build the engine from an already-loaded corpus and any embedder.
    /// `boot` is the production path into this.
    pub fn from_parts(
        corpus: Corpus,
        model: Box<dyn Embedder>,
        threshold: f32,
    ) -> Result<Self, EngineError> {
        let questions: Vec<String> = corpus.questions().map(str::to_string).collect();
        let vectors = model.embed_batch(&questions)?;
        let index = CorpusIndex::new(vectors, model.dimensions())?;

        // questions, answers, and embeddings must stay aligned by index
        if index.len() != corpus.len() {
            return Err(EngineError::LengthMismatch {
                entries: corpus.len(),
                vectors: index.len(),
            });
        }

        log::info!(
            "engine ready: {} FAQs, model {} ({} dims), threshold {}",
            corpus.len(),
            model.name(),
            model.dimensions(),
            threshold,
        );

        Ok(Self {
            corpus,
            index,
            model,
            threshold,
        })
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Answer one free-text message.
    ///
    /// Embeds the raw message, picks the best corpus match, and either
    /// decorates that answer (highlight + links) or falls back when the
    /// similarity is below the threshold. Suggestions ride along either way.
    ///
    /// An empty or whitespace-only message short-circuits to the fallback
    /// with confidence 0.0; the model is never invoked for it.
    pub fn reply(&self, message: &str) -> Result<ChatReply, EngineError> {
        log::info!("user question: {message}");

        let suggestions = self.corpus.suggestions(message, SUGGESTION_LIMIT);

        if self.corpus.is_empty() || message.trim().is_empty() {
            return Ok(ChatReply {
                answer: NO_ANSWER.to_string(),
                suggestions,
                confidence: 0.0,
            });
        }

        let query_vector = self.model.embed(message)?;
        let best = match self.index.best_match(&query_vector)? {
            Some(best) => best,
            None => {
                return Ok(ChatReply {
                    answer: NO_ANSWER.to_string(),
                    suggestions,
                    confidence: 0.0,
                })
            }
        };

        let entry = self
            .corpus
            .get(best.index)
            .expect("index and corpus are the same length");

        log::info!(
            "best match: {} (similarity: {:.3})",
            entry.question,
            best.similarity
        );

        let answer = if !is_confident(best.similarity, self.threshold) {
            log::info!("no good match found");
            NO_ANSWER.to_string()
        } else {
            let highlighted = highlight_keywords(&entry.answer, &normalize(message));
            linkify(&highlighted)
        };

        Ok(ChatReply {
            answer,
            suggestions,
            confidence: best.similarity,
        })
    }

    /// Suggestions without touching the model. Used by `/suggestions`.
    pub fn suggest(&self, query: &str) -> Vec<String> {
        self.corpus.suggestions(query, SUGGESTION_LIMIT)
    }
}

/// Threshold policy. Rejection uses strict `<`, so a similarity of exactly
/// the threshold still answers.
pub fn is_confident(similarity: f32, threshold: f32) -> bool {
    similarity >= threshold
}
