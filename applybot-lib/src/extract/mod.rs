//! Question/answer pairing
//!
//! The source page is a flat run of headers and paragraphs. Each `<h3>` opens
//! a new question and the paragraphs after it are its answer. This module
//! turns that run of [`Fragment`]s into [`QaPair`]s.
//!
//! # Usage
//!
//! ```ignore
//! use applybot_lib::extract::{extract_pairs, Fragment};
//!
//! let fragments = vec![
//!     Fragment::question("Why this role?"),
//!     Fragment::answer("I enjoy building developer tools."),
//! ];
//! let pairs = extract_pairs(&fragments);
//! assert_eq!(pairs[0].render(), "Q: Why this role?\nA: I enjoy building developer tools.");
//! ```

use serde::{Deserialize, Serialize};

/// Question used when an answer shows up before any header.
pub const UNKNOWN_QUESTION: &str = "Unknown Question";

/// What a piece of page text represents
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum FragmentKind {
    Question,
    Answer,
}

/// A labelled piece of text, in document order
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Fragment {
    pub kind: FragmentKind,
    pub text: String,
}

impl Fragment {
    pub fn question(text: impl Into<String>) -> Self {
        Self {
            kind: FragmentKind::Question,
            text: text.into(),
        }
    }

    pub fn answer(text: impl Into<String>) -> Self {
        Self {
            kind: FragmentKind::Answer,
            text: text.into(),
        }
    }
}

/// A prior application question together with the answer given to it
#[derive(Debug, Clone, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

impl QaPair {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// Returns `true` if neither a question nor an answer has been seen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.question.is_empty() && self.answer.is_empty()
    }

    /// Text that gets embedded and shown to the model.
    #[must_use]
    pub fn render(&self) -> String {
        format!("Q: {}\nA: {}", self.question, self.answer)
    }
}

/// Pair up questions and answers in a single left-to-right pass.
///
/// - A question closes the open pair (if it holds anything) and opens a new one.
/// - An answer fills the open pair, using [`UNKNOWN_QUESTION`] if no question
///   came first. A later answer replaces an earlier one.
/// - The open pair is emitted at the end if it holds anything.
#[must_use]
pub fn extract_pairs(fragments: &[Fragment]) -> Vec<QaPair> {
    let (mut pairs, open) = fragments.iter().fold(
        (Vec::new(), QaPair::default()),
        |(mut pairs, mut open), fragment| {
            match fragment.kind {
                FragmentKind::Question => {
                    if !open.is_empty() {
                        pairs.push(open);
                    }
                    open = QaPair::new(fragment.text.as_str(), "");
                }
                FragmentKind::Answer => {
                    if open.question.is_empty() {
                        open.question = UNKNOWN_QUESTION.to_string();
                    }
                    // TODO: multi-paragraph answers keep only their last
                    // paragraph; confirm with the page owner whether to join them
                    open.answer = fragment.text.clone();
                }
            }
            (pairs, open)
        },
    );

    if !open.is_empty() {
        pairs.push(open);
    }

    pairs
}
