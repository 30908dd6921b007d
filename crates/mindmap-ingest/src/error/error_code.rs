//! Error codes for ingestion errors.

use std::fmt;

/// Error codes for categorizing ingestion errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Syntax Errors (E0xx)
    // =========================================================================
    /// Invalid JSON.
    ///
    /// The input could not be parsed as JSON at all.
    E001,

    // =========================================================================
    // Detection Errors (E1xx)
    // =========================================================================
    /// Unrecognized format.
    ///
    /// The input is not an object, or freeform import is disabled and the
    /// object has no known shape.
    E100,

    /// Invalid canonical document.
    ///
    /// The input has `nodes` and `edges` arrays but a field has the wrong type.
    E101,

    // =========================================================================
    // Structural Errors (E2xx)
    // =========================================================================
    /// No root found.
    ///
    /// Zero or several records have no parent.
    E200,

    /// Dangling edge.
    ///
    /// A parent reference or edge endpoint names a missing node.
    E201,

    /// Duplicate id.
    ///
    /// Two nodes or two edges share an id.
    E202,

    /// Cycle detected.
    ///
    /// Following parent links leads back to the starting node.
    E203,

    /// Invalid root.
    ///
    /// The root has a parent or is otherwise unusable.
    E204,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
            ErrorCode::E204 => "E204",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "invalid JSON",
            ErrorCode::E100 => "unrecognized format",
            ErrorCode::E101 => "invalid mind map document",
            ErrorCode::E200 => "no root found",
            ErrorCode::E201 => "dangling edge",
            ErrorCode::E202 => "duplicate id",
            ErrorCode::E203 => "cycle detected",
            ErrorCode::E204 => "invalid root",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
