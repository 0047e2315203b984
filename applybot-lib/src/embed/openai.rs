use crate::config::Config;
use crate::embed::{Embedder, Embedding};
use crate::openai::OpenAiClient;
use crate::{Error, Result};

/// Embedder backed by an OpenAI-compatible `/embeddings` endpoint.
///
/// Documents and queries are embedded the same way; ada-002 has no query
/// prefix.
pub struct OpenAiEmbedder {
    client: OpenAiClient,
    model: String,
}

impl OpenAiEmbedder {
    #[must_use]
    pub fn new(client: OpenAiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            OpenAiClient::from_config(config)?,
            config.openai.embedding_model.clone(),
        ))
    }
}

impl Embedder for OpenAiEmbedder {
    fn embed_documents(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        self.client.embeddings(&self.model, texts)
    }

    fn embed_query(&self, text: &str) -> Result<Embedding> {
        self.client
            .embeddings(&self.model, &[text])?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Embedding("service returned no embeddings".to_string()))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
