//! Fixed top-k retrieval
//!
//! Thin wrapper that pins `k` on a [`QaIndex`] and drops the scores.

use crate::document::Document;
use crate::embed::Embedder;
use crate::index::QaIndex;
use crate::store::VectorStore;
use crate::Result;

/// Number of documents retrieved per question.
pub const DEFAULT_TOP_K: usize = 4;

pub struct Retriever<E: Embedder, S: VectorStore> {
    index: QaIndex<E, S>,
    k: usize,
}

impl<E: Embedder, S: VectorStore> Retriever<E, S> {
    #[must_use]
    pub fn new(index: QaIndex<E, S>, k: usize) -> Self {
        Self { index, k }
    }

    /// The `k` stored documents most similar to `question`, best first.
    pub fn retrieve(&self, question: &str) -> Result<Vec<Document>> {
        Ok(self
            .index
            .query(question, self.k)?
            .into_iter()
            .map(|r| r.document)
            .collect())
    }

    #[must_use]
    pub fn index(&self) -> &QaIndex<E, S> {
        &self.index
    }
}
