//! Embedding index over question/answer pairs
//!
//! Combines embedder and store into a build-once, query-many index.
//!
//! # Usage
//!
//! ```ignore
//! use applybot_lib::index::QaIndex;
//!
//! let index = QaIndex::build(embedder, MemoryStore::new(), &pairs, Some(url))?;
//! let results = index.query("What makes you a good fit?", 4)?;
//! ```

use crate::document::Document;
use crate::embed::Embedder;
use crate::extract::QaPair;
use crate::store::{SearchResult, VectorStore};
use crate::{Error, Result};

/// Immutable similarity index built from a page's QA pairs.
pub struct QaIndex<E: Embedder, S: VectorStore> {
    embedder: E,
    store: S,
}

impl<E: Embedder, S: VectorStore> QaIndex<E, S> {
    /// Embed every pair and load it into `store`.
    ///
    /// Any embedding or storage failure is reported as [`Error::IndexBuild`].
    pub fn build(
        embedder: E,
        mut store: S,
        pairs: &[QaPair],
        source_url: Option<&str>,
    ) -> Result<Self> {
        let documents: Vec<Document> = pairs
            .iter()
            .enumerate()
            .map(|(position, pair)| Document::from_pair(pair, position, source_url))
            .collect();

        if !documents.is_empty() {
            let texts: Vec<&str> = documents.iter().map(|d| d.text.as_str()).collect();
            let embeddings = embedder
                .embed_documents(&texts)
                .map_err(|e| Error::IndexBuild(e.to_string()))?;
            store
                .insert(&documents, &embeddings)
                .map_err(|e| Error::IndexBuild(e.to_string()))?;
        }

        tracing::info!(
            "Built index of {} documents with {}",
            store.len(),
            embedder.model_name()
        );

        Ok(Self { embedder, store })
    }

    /// Return the `k` documents most similar to `text`, best first.
    ///
    /// Failures are reported as [`Error::Retrieval`].
    pub fn query(&self, text: &str, k: usize) -> Result<Vec<SearchResult>> {
        let query_embedding = self
            .embedder
            .embed_query(text)
            .map_err(|e| Error::Retrieval(e.to_string()))?;

        self.store
            .search(&query_embedding, k)
            .map_err(|e| Error::Retrieval(e.to_string()))
    }

    /// Returns the number of indexed documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if no documents are indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}
