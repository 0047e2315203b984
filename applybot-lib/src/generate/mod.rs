//! Answer generation
//!
//! Sends an assembled prompt to a language model and returns its reply.

use crate::config::Config;
use crate::openai::OpenAiClient;
use crate::Result;

/// Trait for language-model backends
pub trait Generator: Send + Sync {
    /// Complete `prompt`, returning the model's text.
    ///
    /// Failures are reported as [`crate::Error::Generation`].
    fn generate(&self, prompt: &str) -> Result<String>;
}

impl<G: Generator + ?Sized> Generator for Box<G> {
    fn generate(&self, prompt: &str) -> Result<String> {
        (**self).generate(prompt)
    }
}

/// Chat-completions generator with a fixed model and temperature.
pub struct OpenAiGenerator {
    client: OpenAiClient,
    model: String,
    temperature: f32,
}

impl OpenAiGenerator {
    #[must_use]
    pub fn new(client: OpenAiClient, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            client,
            model: model.into(),
            temperature,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            OpenAiClient::from_config(config)?,
            config.openai.chat_model.clone(),
            config.openai.temperature,
        ))
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl Generator for OpenAiGenerator {
    fn generate(&self, prompt: &str) -> Result<String> {
        tracing::debug!("Generating with {} (temperature {})", self.model, self.temperature);
        self.client.chat(&self.model, self.temperature, prompt)
    }
}
