//! Ordered in-memory vector index with stable argmax matching.
//!
//! Vectors are stored in corpus order; entry identity is index position.
//! Matching is a linear scan over every vector, O(corpus size) per query.
//! Fine at FAQ scale; an ANN index would only be worth it if it kept the
//! exact argmax and first-index tie-break.

/// Best match for a query vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult {
    /// Index of the best-scoring corpus vector.
    pub index: usize,
    /// Cosine similarity in [-1.0, 1.0].
    pub similarity: f32,
}

#[derive(Debug, thiserror::Error)]
pub enum MatcherError {
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

/// Corpus embeddings, aligned by index with the FAQ entries.
pub struct CorpusIndex {
    vectors: Vec<Vec<f32>>,
    dimensions: usize,
}

impl CorpusIndex {
    /// Build the index from the boot-time batch embedding.
    ///
    /// All vectors must share `dimensions`; the corpus loader guarantees one
    /// vector per entry.
    pub fn new(vectors: Vec<Vec<f32>>, dimensions: usize) -> Result<Self, MatcherError> {
        for v in &vectors {
            if v.len() != dimensions {
                return Err(MatcherError::DimensionMismatch {
                    expected: dimensions,
                    got: v.len(),
                });
            }
        }

        Ok(Self {
            vectors,
            dimensions,
        })
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Find the corpus vector most similar to `query`.
    ///
    /// Scans every vector and keeps the strict maximum, so ties resolve to
    /// the first index reached. Returns `None` for an empty index.
    pub fn best_match(&self, query: &[f32]) -> Result<Option<MatchResult>, MatcherError> {
        if query.len() != self.dimensions {
            return Err(MatcherError::DimensionMismatch {
                expected: self.dimensions,
                got: query.len(),
            });
        }

        let query_norm = l2_norm(query);

        let mut best: Option<MatchResult> = None;
        for (index, vector) in self.vectors.iter().enumerate() {
            let similarity = cosine_similarity(query, query_norm, vector);
            match best {
                Some(b) if similarity <= b.similarity => {}
                _ => best = Some(MatchResult { index, similarity }),
            }
        }

        Ok(best)
    }
}

fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Cosine similarity with the query norm precomputed.
/// Zero-norm on either side scores 0.0 rather than NaN.
fn cosine_similarity(query: &[f32], query_norm: f32, target: &[f32]) -> f32 {
    let target_norm = l2_norm(target);
    if query_norm < f32::EPSILON || target_norm < f32::EPSILON {
        return 0.0;
    }

    let dot: f32 = query.iter().zip(target.iter()).map(|(a, b)| a * b).sum();
    dot / (query_norm * target_norm)
}
