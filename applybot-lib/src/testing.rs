//! Deterministic stand-ins for the remote services, for tests.

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::Mutex;
use std::thread;

use serde_json::Value;

use crate::embed::{Embedder, Embedding};
use crate::generate::Generator;
use crate::{Error, Result};

const VOCAB_SIZE: usize = 4096;

/// Bag-of-words embedder. Every distinct lowercase word gets its own
/// dimension the first time it is seen, so texts sharing words score high.
#[derive(Default)]
pub struct WordEmbedder {
    vocab: Mutex<HashMap<String, usize>>,
}

impl WordEmbedder {
    fn embed(&self, text: &str) -> Result<Embedding> {
        let mut vocab = self
            .vocab
            .lock()
            .map_err(|_| Error::Embedding("vocabulary lock poisoned".into()))?;
        let mut vector = vec![0.0; VOCAB_SIZE];

        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
        {
            let next = vocab.len();
            let slot = *vocab.entry(word).or_insert(next);
            if slot >= VOCAB_SIZE {
                return Err(Error::Embedding("vocabulary full".into()));
            }
            vector[slot] += 1.0;
        }

        Ok(vector)
    }
}

impl Embedder for WordEmbedder {
    fn embed_documents(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    fn embed_query(&self, text: &str) -> Result<Embedding> {
        self.embed(text)
    }

    fn model_name(&self) -> &str {
        "word-count"
    }
}

/// Embedder whose service is always down.
pub struct FailingEmbedder;

impl Embedder for FailingEmbedder {
    fn embed_documents(&self, _texts: &[&str]) -> Result<Vec<Embedding>> {
        Err(Error::Embedding("embedding service unavailable".into()))
    }

    fn embed_query(&self, _text: &str) -> Result<Embedding> {
        Err(Error::Embedding("embedding service unavailable".into()))
    }

    fn model_name(&self) -> &str {
        "failing"
    }
}

/// Generator that replies with the prompt it was given.
pub struct EchoGenerator;

impl Generator for EchoGenerator {
    fn generate(&self, prompt: &str) -> Result<String> {
        Ok(prompt.to_string())
    }
}

/// Generator whose model is always down.
pub struct FailingGenerator;

impl Generator for FailingGenerator {
    fn generate(&self, _prompt: &str) -> Result<String> {
        Err(Error::Generation("model unavailable".into()))
    }
}

/// One HTTP request as seen by [`serve_json_once`].
pub struct CapturedRequest {
    /// Request line and headers, lowercased.
    pub head: String,
    pub body: Value,
}

/// Answer one request on a local port with `response` as JSON.
///
/// Returns the base URL and a handle yielding the captured request.
pub fn serve_json_once(response: Value) -> (String, thread::JoinHandle<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let payload = response.to_string();

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut head = String::new();
        let mut content_length = 0;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            if line == "\r\n" || line.is_empty() {
                break;
            }
            let line = line.to_lowercase();
            if let Some(length) = line.strip_prefix("content-length:") {
                content_length = length.trim().parse().unwrap();
            }
            head.push_str(&line);
        }

        let mut body = vec![0; content_length];
        reader.read_exact(&mut body).unwrap();

        let reply = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\
             Content-Length: {}\r\nConnection: close\r\n\r\n{payload}",
            payload.len()
        );
        stream.write_all(reply.as_bytes()).unwrap();

        CapturedRequest {
            head,
            body: serde_json::from_slice(&body).unwrap(),
        }
    });

    (base, handle)
}
