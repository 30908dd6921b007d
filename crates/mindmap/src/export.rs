//! Export of mind maps.
//!
//! The [`Exporter`] trait is the last stage of the pipeline:
//!
//! ```text
//! JSON input
//!     ↓ ingest
//! MindMap
//!     ↓ layout / edits
//! MindMap with positions
//!     ↓ export (this module)
//! Canonical JSON document
//! ```
//!
//! [`document`] builds the canonical [`Document`] of a map. Backends such as
//! [`json::Json`] write it out.

pub mod json;

use mindmap_core::{document::Document, model::MindMap};

use crate::config::AppConfig;

/// Abstraction for export backends.
pub trait Exporter {
    /// Writes `document` in the backend's output format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the document cannot be converted to the
    /// target format, or [`Error::Io`] if writing the output fails.
    fn export_document(&mut self, document: &Document) -> Result<(), Error>;
}

/// Builds the canonical document of `map`.
///
/// Styles are written in full using the configured defaults, and every node
/// carries the edge attachment sides of the configured layout direction.
pub fn document(map: &MindMap, config: &AppConfig) -> Document {
    let handles = config.layout().direction().handles();
    Document::from_map(map, &config.style().defaults())
        .with_handles(handles.source.as_str(), handles.target.as_str())
}

/// Errors that can occur during export.
#[derive(Debug)]
pub enum Error {
    /// A conversion failure described by `message`.
    Render(String),
    /// An I/O error encountered while writing output.
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}
