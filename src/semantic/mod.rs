//! Semantic matching infrastructure.
//!
//! Uses fastembed-rs to embed corpus questions and incoming queries, and a
//! linear-scan cosine-similarity argmax to pick the best FAQ match.
//!
//! - `embeddings`: wraps fastembed for embedding generation
//! - `matcher`: ordered in-memory vector index with stable argmax

pub mod embeddings;
pub mod matcher;

pub use embeddings::{Embedder, EmbeddingError, EmbeddingModel};
pub use matcher::{CorpusIndex, MatchResult, MatcherError};

/// Default embedding model (the one the service was tuned against).
pub const DEFAULT_MODEL: &str = "all-MiniLM-L6-v2";

/// Default minimum similarity before an answer is returned.
pub const DEFAULT_THRESHOLD: f32 = 0.3;
