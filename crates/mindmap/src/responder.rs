//! Question answering.
//!
//! A [`Responder`] answers a question asked about one node. The editor wraps
//! each answer into a new child of that node.

use std::collections::HashMap;

use thiserror::Error;

use mindmap_core::identifier::Id;

/// An answer produced by a [`Responder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    text: String,
}

impl Answer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponderError {
    #[error("Responder is unavailable: {0}")]
    Unavailable(String),

    #[error("Question was rejected: {0}")]
    Rejected(String),
}

/// Something that can answer questions about a node.
pub trait Responder {
    /// Answers `question`, asked about `node`.
    ///
    /// # Errors
    ///
    /// Returns a [`ResponderError`] when no answer can be produced.
    fn answer(&self, node: Id, question: &str) -> Result<Answer, ResponderError>;
}

/// A responder with prepared answers per node.
///
/// Nodes without a prepared answer get a generic one quoting the question.
#[derive(Debug, Clone, Default)]
pub struct CannedResponder {
    answers: HashMap<Id, String>,
}

impl CannedResponder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepares `answer` for questions about `node`. The answer may contain
    /// `{question}`, which is replaced with the question asked.
    pub fn with_answer(mut self, node: Id, answer: impl Into<String>) -> Self {
        self.answers.insert(node, answer.into());
        self
    }
}

impl Responder for CannedResponder {
    fn answer(&self, node: Id, question: &str) -> Result<Answer, ResponderError> {
        if question.trim().is_empty() {
            return Err(ResponderError::Rejected("question is empty".to_string()));
        }
        let text = match self.answers.get(&node) {
            Some(template) => template.replace("{question}", question),
            None => format!("A general answer to \"{question}\""),
        };
        Ok(Answer::new(text))
    }
}
