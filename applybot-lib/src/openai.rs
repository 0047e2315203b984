//! Blocking client for OpenAI-compatible APIs.
//!
//! Covers the two endpoints the pipeline needs: `/embeddings` for indexing
//! and retrieval, and `/chat/completions` for generation. Any server speaking
//! the same wire format (OpenAI, Ollama, llama.cpp, vLLM) works by pointing
//! `api_base` at it.

use std::time::Duration;

use serde_json::{Value, json};

use crate::config::Config;
use crate::{Error, Result};

/// HTTP client bound to one API base URL and key.
pub struct OpenAiClient {
    /// Base URL for the API (e.g., "https://api.openai.com/v1").
    base_url: String,
    /// Bearer token; omitted from requests when empty.
    api_key: String,
    client: reqwest::blocking::Client,
}

impl OpenAiClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        if config.openai.api_key.is_empty() {
            tracing::warn!("No OpenAI API key configured; requests will be sent unauthenticated");
        }
        Self::new(
            &config.openai.api_base,
            &config.openai.api_key,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    fn apply_auth(
        &self,
        req: reqwest::blocking::RequestBuilder,
    ) -> reqwest::blocking::RequestBuilder {
        if self.api_key.is_empty() {
            req
        } else {
            req.header("Authorization", format!("Bearer {}", self.api_key))
        }
    }

    /// POST `body` to `path` and return the parsed JSON response.
    fn post(&self, path: &str, body: &Value) -> std::result::Result<Value, String> {
        let url = format!("{}{}", self.base_url, path);
        let req = self.client.post(&url).json(body);

        let resp = self
            .apply_auth(req)
            .send()
            .map_err(|e| format!("connection failed ({url}): {e}"))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().unwrap_or_default();
            return Err(format!("API error {status}: {text}"));
        }

        resp.json().map_err(|e| format!("invalid response: {e}"))
    }

    /// Embed a batch of texts, returning one vector per input in input order.
    pub fn embeddings(&self, model: &str, inputs: &[&str]) -> Result<Vec<Vec<f32>>> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let body = json!({
            "model": model,
            "input": inputs,
        });
        let json = self.post("/embeddings", &body).map_err(Error::Embedding)?;
        let vectors = parse_embeddings(&json)?;

        if vectors.len() != inputs.len() {
            return Err(Error::Embedding(format!(
                "expected {} embeddings, got {}",
                inputs.len(),
                vectors.len()
            )));
        }

        Ok(vectors)
    }

    /// Run a single-turn chat completion and return the reply text.
    pub fn chat(&self, model: &str, temperature: f32, prompt: &str) -> Result<String> {
        let body = json!({
            "model": model,
            "temperature": temperature,
            "messages": [{ "role": "user", "content": prompt }],
        });
        let json = self
            .post("/chat/completions", &body)
            .map_err(Error::Generation)?;

        parse_chat_content(&json)
    }
}

/// Read `data[*].embedding`, ordered by each entry's `index`.
///
/// The indices must cover `0..n` exactly once, and every value must be finite.
fn parse_embeddings(json: &Value) -> Result<Vec<Vec<f32>>> {
    let data = json["data"]
        .as_array()
        .ok_or_else(|| Error::Embedding("no data in embeddings response".into()))?;

    let mut entries = data
        .iter()
        .enumerate()
        .map(|(i, item)| -> Result<(usize, Vec<f32>)> {
            let index = item["index"].as_u64().map_or(i, |v| v as usize);
            let vector = item["embedding"]
                .as_array()
                .ok_or_else(|| Error::Embedding(format!("entry {i} has no embedding")))?
                .iter()
                .map(|v| parse_component(i, v))
                .collect::<Result<Vec<f32>>>()?;
            Ok((index, vector))
        })
        .collect::<Result<Vec<_>>>()?;

    entries.sort_by_key(|(index, _)| *index);
    if let Some((expected, (index, _))) = entries
        .iter()
        .enumerate()
        .find(|(expected, (index, _))| index != expected)
    {
        return Err(Error::Embedding(format!(
            "embedding index {index} where {expected} was expected"
        )));
    }

    Ok(entries.into_iter().map(|(_, vector)| vector).collect())
}

fn parse_component(entry: usize, value: &Value) -> Result<f32> {
    let value = value
        .as_f64()
        .ok_or_else(|| Error::Embedding(format!("entry {entry} has non-numeric values")))?
        as f32;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::Embedding(format!("entry {entry} has non-finite values")))
    }
}

fn parse_chat_content(json: &Value) -> Result<String> {
    let choice = json["choices"]
        .get(0)
        .ok_or_else(|| Error::Generation("no choices in response".into()))?;

    choice["message"]["content"]
        .as_str()
        .map(String::from)
        .ok_or_else(|| Error::Generation("response has no message content".into()))
}
