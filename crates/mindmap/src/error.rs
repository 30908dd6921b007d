//! Error types for mind map operations.
//!
//! This module provides the main error type [`MindMapError`] which wraps
//! the error conditions of importing, laying out and exporting a map.

use std::io;

use thiserror::Error;

use mindmap_core::error::GraphError;
use mindmap_ingest::IngestError;

/// The main error type for mind map operations.
///
/// # Diagnostic Variants
///
/// The `Ingest` variant keeps the rejected input next to the error, so a
/// caller can point at the offending line and column when the input was not
/// valid JSON.
#[derive(Debug, Error)]
pub enum MindMapError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Ingest { err: IngestError, src: String },

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),
}

impl From<crate::export::Error> for MindMapError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl MindMapError {
    /// Create a new `Ingest` error with the associated source text.
    pub fn new_ingest_error(err: IngestError, src: impl Into<String>) -> Self {
        Self::Ingest {
            err,
            src: src.into(),
        }
    }
}
