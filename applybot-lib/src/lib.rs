//! ApplyBot - answers job-application questions in the applicant's own voice
//!
//! # Architecture
//!
//! ```text
//! Page -> Fetcher -> Extractor -> Embedder -> Store        (once, at start-up)
//!                                               |
//! Question -> Embedder -> Retriever <-----------+
//!                             |
//!                      Prompt -> Generator -> Answer         (per question)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use applybot_lib::{config::Config, pipeline::DefaultPipeline};
//!
//! let config = Config::load()?;
//! let pipeline = DefaultPipeline::from_config(&config)?;
//!
//! let answer = pipeline.answer("What makes you a good fit for this position?");
//! ```

pub mod config;
pub mod document;
pub mod embed;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod generate;
pub mod index;
pub mod openai;
pub mod pipeline;
pub mod prompt;
pub mod retrieve;
pub mod store;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
