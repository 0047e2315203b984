//! Text embedding
//!
//! The default backend is a remote OpenAI-compatible embeddings endpoint
//! (`text-embedding-ada-002`). With the `local-embed` feature, BAAI's
//! bge-large-en-v1.5 can run in-process through fastembed instead.
//!
//! # Usage
//!
//! ```ignore
//! use applybot_lib::embed::{Embedder, OpenAiEmbedder};
//!
//! let embedder = OpenAiEmbedder::from_config(&config)?;
//!
//! // Embed documents (for indexing)
//! let doc_embeddings = embedder.embed_documents(&["Q: Why us?\nA: ...", "Q: Why now?\nA: ..."])?;
//!
//! // Embed query (for searching)
//! let query_embedding = embedder.embed_query("What makes you a good fit?")?;
//! ```

use crate::Result;

/// A vector embedding - fixed size array of floats
pub type Embedding = Vec<f32>;

/// Trait for text embedding models
///
/// Implementations take `&self` so a built index can be shared across
/// threads and queried without locking.
pub trait Embedder: Send + Sync {
    /// Embed multiple documents for indexing
    ///
    /// Returns exactly one embedding per input, in input order.
    fn embed_documents(&self, texts: &[&str]) -> Result<Vec<Embedding>>;

    /// Embed a single query for searching
    ///
    /// Note: Some models (like BGE) use different prompts for queries vs documents.
    /// This method handles that distinction.
    fn embed_query(&self, text: &str) -> Result<Embedding>;

    /// Returns the model name/identifier
    fn model_name(&self) -> &str;
}

impl<E: Embedder + ?Sized> Embedder for Box<E> {
    fn embed_documents(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        (**self).embed_documents(texts)
    }

    fn embed_query(&self, text: &str) -> Result<Embedding> {
        (**self).embed_query(text)
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

#[cfg(feature = "local-embed")]
mod bge;
mod openai;

#[cfg(feature = "local-embed")]
pub use bge::*;
pub use openai::*;
