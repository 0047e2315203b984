//! Indexed documents
//!
//! Each [`QaPair`] becomes one [`Document`] when the index is built. Documents
//! are immutable once stored.

use std::hash::{DefaultHasher, Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::extract::QaPair;

/// Kind tag attached to every document built from a question/answer pair.
pub const QA_PAIR_KIND: &str = "qa_pair";

/// A stored piece of retrievable text
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Document {
    /// Identifier derived from the text and its position
    pub id: String,
    /// Rendered text ("Q: ...\nA: ...")
    pub text: String,
    /// Where the text came from and what it is
    pub metadata: DocumentMetadata,
}

/// Metadata associated with a document
#[derive(Debug, Clone, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct DocumentMetadata {
    /// Document kind (e.g. "qa_pair")
    pub kind: String,
    /// Position of the pair within the source page (0-indexed)
    pub position: usize,
    /// Page the pair was scraped from
    pub source_url: Option<String>,
}

impl Document {
    /// Build the document for the `position`-th pair of a page.
    #[must_use]
    pub fn from_pair(pair: &QaPair, position: usize, source_url: Option<&str>) -> Self {
        let text = pair.render();
        Self {
            id: generate_id(&text, position),
            text,
            metadata: DocumentMetadata {
                kind: QA_PAIR_KIND.to_string(),
                position,
                source_url: source_url.map(str::to_string),
            },
        }
    }

    #[must_use]
    pub fn kind(&self) -> &str {
        &self.metadata.kind
    }
}

fn generate_id(text: &str, position: usize) -> String {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    position.hash(&mut hasher);
    format!("{:x}", hasher.finish())
}
