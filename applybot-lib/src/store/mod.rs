//! Vector storage backends
//!
//! Documents live in memory for the life of the process. Nothing is
//! persisted; a restart rebuilds the index from the source page.
//!
//! # Storage Model
//!
//! Each stored item consists of:
//! - Document: the rendered QA text and metadata
//! - Embedding: the vector representation
//!
//! # Usage
//!
//! ```ignore
//! use applybot_lib::store::{VectorStore, MemoryStore};
//!
//! let mut store = MemoryStore::new();
//!
//! // Insert documents with their embeddings
//! store.insert(&documents, &embeddings)?;
//!
//! // Search by vector similarity
//! let results = store.search(&query_embedding, 4)?;
//! ```

use std::cmp::Ordering;

use crate::document::Document;
use crate::embed::Embedding;
use crate::Result;

/// A search result with similarity score
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The matched document
    pub document: Document,
    /// Similarity score (higher is more similar)
    /// For cosine similarity: -1.0 to 1.0
    pub score: f32,
}

/// Trait for vector storage backends
pub trait VectorStore: Send + Sync {
    /// Insert documents with their embeddings
    ///
    /// # Arguments
    /// * `documents` - The documents to store
    /// * `embeddings` - Corresponding embeddings (must be same length)
    fn insert(&mut self, documents: &[Document], embeddings: &[Embedding]) -> Result<()>;

    /// Search for similar documents
    ///
    /// # Arguments
    /// * `query_embedding` - The query vector
    /// * `k` - Number of results to return
    ///
    /// # Returns
    /// Top-k results sorted by similarity (highest first)
    fn search(&self, query_embedding: &Embedding, k: usize) -> Result<Vec<SearchResult>>;

    /// Get total number of stored documents
    fn len(&self) -> usize;

    /// Check if store is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Order results by descending score. Equal scores keep their relative order
/// when used with a stable sort; NaN scores rank last.
pub(crate) fn by_score_desc(a: &SearchResult, b: &SearchResult) -> Ordering {
    rank_key(b.score).total_cmp(&rank_key(a.score))
}

// Folds -0.0 into 0.0 so that equal similarities stay ties.
fn rank_key(score: f32) -> f32 {
    if score.is_nan() {
        f32::NEG_INFINITY
    } else if score == 0.0 {
        0.0
    } else {
        score
    }
}

mod memory;

pub use memory::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::QaPair;

    fn result(position: usize, score: f32) -> SearchResult {
        SearchResult {
            document: Document::from_pair(&QaPair::new("q", "a"), position, None),
            score,
        }
    }

    #[test]
    fn test_nan_scores_sort_last() {
        let mut results: Vec<SearchResult> = (0..64)
            .map(|i| result(i, if i % 3 == 0 { f32::NAN } else { i as f32 }))
            .collect();

        results.sort_by(by_score_desc);

        let finite = results.iter().take_while(|r| !r.score.is_nan()).count();
        assert_eq!(finite, 42);
        assert_eq!(results[0].document.metadata.position, 62);
        assert!(results[finite..].iter().all(|r| r.score.is_nan()));
    }
}
