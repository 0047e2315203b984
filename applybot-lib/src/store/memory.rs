use crate::document::Document;
use crate::embed::Embedding;
use crate::store::{SearchResult, VectorStore, by_score_desc};
use crate::{Error, Result};

/// In-memory vector store.
///
/// Uses brute-force cosine similarity search, which is plenty for the few
/// dozen QA pairs a single page holds. Documents are kept in insertion order
/// and ties in score preserve it.
#[derive(Default)]
pub struct MemoryStore {
    entries: Vec<(Document, Embedding)>,
    dimension: Option<usize>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Dimension of the stored vectors, once anything has been inserted.
    #[must_use]
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }
}

impl VectorStore for MemoryStore {
    fn insert(&mut self, documents: &[Document], embeddings: &[Embedding]) -> Result<()> {
        if documents.len() != embeddings.len() {
            return Err(Error::InvalidInput(format!(
                "{} documents but {} embeddings",
                documents.len(),
                embeddings.len()
            )));
        }

        let mut dimension = self.dimension;
        for embedding in embeddings {
            if !is_finite(embedding) {
                return Err(Error::Store("embedding contains non-finite values".into()));
            }
            match dimension {
                Some(d) if d != embedding.len() => {
                    return Err(Error::Store(format!(
                        "embedding dimension {} does not match store dimension {d}",
                        embedding.len()
                    )));
                }
                Some(_) => {}
                None => dimension = Some(embedding.len()),
            }
        }

        self.dimension = dimension;
        self.entries.extend(
            documents
                .iter()
                .cloned()
                .zip(embeddings.iter().cloned()),
        );
        Ok(())
    }

    fn search(&self, query: &Embedding, k: usize) -> Result<Vec<SearchResult>> {
        if let Some(d) = self.dimension {
            if d != query.len() {
                return Err(Error::Store(format!(
                    "query dimension {} does not match store dimension {d}",
                    query.len()
                )));
            }
        }
        if !is_finite(query) {
            return Err(Error::Store("query embedding contains non-finite values".into()));
        }

        let mut results: Vec<SearchResult> = self
            .entries
            .iter()
            .map(|(document, embedding)| SearchResult {
                document: document.clone(),
                score: cosine_similarity(query, embedding),
            })
            .collect();

        results.sort_by(by_score_desc);
        results.truncate(k);
        Ok(results)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

fn is_finite(vector: &[f32]) -> bool {
    vector.iter().all(|x| x.is_finite())
}

/// Compute cosine similarity between two vectors.
///
/// Returns a value in [-1, 1] where 1 means identical direction.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same length");

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
