//! Error types for ApplyBot

use thiserror::Error;

/// Result type alias for ApplyBot operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ApplyBot operations
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to download or parse the source page
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Failed to build the embedding index at start-up
    #[error("index build error: {0}")]
    IndexBuild(String),

    /// Failed to embed or look up a query
    #[error("retrieval error: {0}")]
    Retrieval(String),

    /// The language model call failed
    #[error("generation error: {0}")]
    Generation(String),

    /// Failed to load or run the embedding model
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Failed to store or retrieve from vector store
    #[error("store error: {0}")]
    Store(String),

    /// Invalid input provided
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Configuration could not be read or parsed
    #[error("config error: {0}")]
    Config(String),

    /// The index was never built, so nothing can be answered
    #[error("index not ready: {0}")]
    NotReady(String),
}
