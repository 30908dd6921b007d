//! Errors raised while ingesting external JSON.
//!
//! Every [`IngestError`] carries an [`ErrorCode`] for documentation and
//! searchability. Codes are organized by phase:
//! - `E0xx` - JSON syntax errors
//! - `E1xx` - Shape detection errors
//! - `E2xx` - Structural errors in the converted graph

mod error_code;

pub use error_code::ErrorCode;

use thiserror::Error;

use mindmap_core::error::GraphError;

/// Error type for the ingestion pipeline.
///
/// Ingestion failures are expected, user-facing conditions (a bad input
/// file). They never leave a partially converted map behind.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IngestError {
    /// The input is not valid JSON.
    #[error("invalid JSON at line {line}, column {column}: {message}")]
    Json {
        message: String,
        line: usize,
        column: usize,
    },

    /// The input matches none of the supported shapes.
    #[error("unrecognized input format: {0}")]
    UnrecognizedFormat(String),

    /// The input has the canonical shape but a field has the wrong type.
    #[error("invalid mind map document: {0}")]
    InvalidDocument(String),

    /// Zero or several records qualify as the root.
    #[error("{}", no_root_message(candidates))]
    NoRootFound { candidates: Vec<String> },

    /// A linked record names a parent that does not exist.
    #[error("record `{record}` points to missing parent `{parent}`")]
    DanglingEdge { record: String, parent: String },

    /// The converted graph breaks a structural invariant.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

fn no_root_message(candidates: &[String]) -> String {
    match candidates {
        [] => "no root found: no record is without a parent".to_string(),
        many => format!(
            "no root found: {} records are without a parent ({})",
            many.len(),
            many.join(", ")
        ),
    }
}

impl IngestError {
    /// Returns the [`ErrorCode`] of this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            IngestError::Json { .. } => ErrorCode::E001,
            IngestError::UnrecognizedFormat(_) => ErrorCode::E100,
            IngestError::InvalidDocument(_) => ErrorCode::E101,
            IngestError::NoRootFound { .. } => ErrorCode::E200,
            IngestError::DanglingEdge { .. } => ErrorCode::E201,
            IngestError::Graph(GraphError::DuplicateId(_)) => ErrorCode::E202,
            IngestError::Graph(GraphError::CycleDetected(_)) => ErrorCode::E203,
            IngestError::Graph(GraphError::DanglingEdge { .. }) => ErrorCode::E201,
            IngestError::Graph(_) => ErrorCode::E204,
        }
    }

    /// Returns a hint on how to fix the input, if there is one.
    pub fn help(&self) -> Option<&'static str> {
        match self {
            IngestError::Json { .. } => None,
            IngestError::UnrecognizedFormat(_) => {
                Some("expected a JSON object: `{ nodes, edges }` or records with a `Previous` field")
            }
            IngestError::InvalidDocument(_) => {
                Some("node ids, edge sources and edge targets must be strings")
            }
            IngestError::NoRootFound { .. } => {
                Some("exactly one record must have `\"Previous\": null`")
            }
            IngestError::DanglingEdge { .. } | IngestError::Graph(GraphError::DanglingEdge { .. }) => {
                Some("every parent reference must name an existing record")
            }
            IngestError::Graph(GraphError::CycleDetected(_)) => {
                Some("parent references must not loop back")
            }
            IngestError::Graph(_) => None,
        }
    }

    /// Returns the 1-based `(line, column)` of a JSON syntax error.
    pub fn location(&self) -> Option<(usize, usize)> {
        match self {
            IngestError::Json { line, column, .. } => Some((*line, *column)),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for IngestError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() {
            return IngestError::InvalidDocument(err.to_string());
        }
        IngestError::Json {
            message: err.to_string(),
            line: err.line(),
            column: err.column(),
        }
    }
}

#[cfg(test)]
mod tests {
    use mindmap_core::identifier::Id;

    use super::*;

    #[test]
    fn test_json_error_keeps_location() {
        let err: IngestError = serde_json::from_str::<serde_json::Value>("{\n  \"a\": ,\n}")
            .unwrap_err()
            .into();

        assert_eq!(err.code(), ErrorCode::E001);
        assert_eq!(err.location().map(|(line, _)| line), Some(2));
    }

    #[test]
    fn test_no_root_message_lists_candidates() {
        let err = IngestError::NoRootFound {
            candidates: vec!["A".to_string(), "B".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "no root found: 2 records are without a parent (A, B)"
        );

        let none = IngestError::NoRootFound { candidates: vec![] };
        assert!(none.to_string().contains("no record"));
    }

    #[test]
    fn test_graph_error_codes() {
        let cycle = IngestError::from(GraphError::CycleDetected(Id::new("a")));
        assert_eq!(cycle.code(), ErrorCode::E203);
        assert!(cycle.help().is_some());

        let duplicate = IngestError::from(GraphError::DuplicateId(Id::new("a")));
        assert_eq!(duplicate.code(), ErrorCode::E202);
        assert_eq!(duplicate.to_string(), "duplicate id `a`");
    }
}
