use std::sync::Mutex;

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use crate::embed::{Embedder, Embedding};
use crate::{Error, Result};

/// BGE embedder using BAAI/bge-large-en-v1.5.
///
/// Uses fastembed for ONNX-based inference. This model produces 1024-dimensional
/// embeddings and supports up to 512 tokens per input. Inference needs
/// exclusive access to the session, hence the mutex.
pub struct BgeEmbedder {
    model: Mutex<TextEmbedding>,
}

impl BgeEmbedder {
    /// Create a new BGE embedder.
    ///
    /// Downloads the model on first use (~1.2GB).
    pub fn new() -> Result<Self> {
        let opts = InitOptions::new(EmbeddingModel::BGELargeENV15)
            .with_show_download_progress(true);

        TextEmbedding::try_new(opts)
            .map(|model| Self { model: Mutex::new(model) })
            .map_err(|e| Error::Embedding(e.to_string()))
    }

    fn embed(&self, texts: Vec<String>) -> Result<Vec<Embedding>> {
        let mut model = self
            .model
            .lock()
            .map_err(|_| Error::Embedding("embedding model lock poisoned".to_string()))?;

        model
            .embed(texts, None)
            .map_err(|e| Error::Embedding(e.to_string()))
    }
}

impl Embedder for BgeEmbedder {
    fn model_name(&self) -> &str {
        "BAAI/bge-large-en-v1.5"
    }

    fn embed_documents(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        self.embed(texts.iter().map(|t| t.to_string()).collect())
    }

    fn embed_query(&self, text: &str) -> Result<Embedding> {
        // BGE uses a special prompt prefix for queries to improve retrieval
        let query_text = format!("Represent this sentence for searching relevant passages: {text}");

        self.embed(vec![query_text])?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Embedding("model returned no embeddings".to_string()))
    }
}
