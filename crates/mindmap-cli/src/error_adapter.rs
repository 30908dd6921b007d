//! Error adapter for converting MindMapError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! Import errors carry the rejected input. When the input was not valid JSON,
//! the diagnostic points at the offending line and column.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use mindmap::{IngestError, MindMapError};

/// Adapter for an import error and the input it rejected.
pub struct IngestAdapter<'a> {
    err: &'a IngestError,
    src: &'a str,
}

impl<'a> IngestAdapter<'a> {
    pub fn new(err: &'a IngestError, src: &'a str) -> Self {
        Self { err, src }
    }
}

impl fmt::Debug for IngestAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestAdapter")
            .field("err", &self.err)
            .finish()
    }
}

impl fmt::Display for IngestAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.err, f)
    }
}

impl std::error::Error for IngestAdapter<'_> {}

impl MietteDiagnostic for IngestAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.err.code()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.err
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.err
            .location()
            .map(|_| &self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let (line, column) = self.err.location()?;
        let span = location_to_span(self.src, line, column);
        let label = LabeledSpan::new_primary_with_span(Some(self.err.code().description().to_string()), span);
        Some(Box::new(std::iter::once(label)))
    }
}

/// Adapter for [`MindMapError`] variants without source information.
pub struct ErrorAdapter<'a>(pub &'a MindMapError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            MindMapError::Io(_) => "mindmap::io",
            MindMapError::Ingest { .. } => "mindmap::ingest",
            MindMapError::Graph(_) => "mindmap::graph",
            MindMapError::Config(_) => "mindmap::config",
            MindMapError::Export(_) => "mindmap::export",
        };
        Some(Box::new(code))
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// An import error with the rejected input.
    Ingest(IngestAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Ingest(i) => fmt::Display::fmt(i, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Ingest(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Ingest(i) => i.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Ingest(i) => i.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Ingest(i) => i.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Ingest(i) => i.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert a one-based line and column into a one-character [`SourceSpan`].
///
/// Positions past the end of a line or of the input are clamped.
fn location_to_span(src: &str, line: usize, column: usize) -> SourceSpan {
    let line_start: usize = src
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    let line_text = src[line_start..].split('\n').next().unwrap_or_default();
    let column_offset: usize = line_text
        .chars()
        .take(column.saturating_sub(1))
        .map(char::len_utf8)
        .sum();
    let offset = line_start + column_offset;
    let len = src[offset..].chars().next().map_or(0, char::len_utf8);
    SourceSpan::new(offset.into(), len)
}

/// Convert a [`MindMapError`] into a list of reportable errors.
pub fn to_reportables(err: &MindMapError) -> Vec<Reportable<'_>> {
    match err {
        MindMapError::Ingest { err, src } => vec![Reportable::Ingest(IngestAdapter::new(err, src))],
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

#[cfg(test)]
mod tests {
    use mindmap::{ErrorCode, MindMapBuilder, identifier::Id};

    use super::*;

    #[test]
    fn test_syntax_error_points_at_location() {
        let source = "{\n  \"nodes\": [,]\n}";
        let err = MindMapBuilder::default().import(source).unwrap_err();

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);

        let labels: Vec<_> = reportables[0].labels().unwrap().collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(&source[labels[0].offset()..labels[0].offset() + 1], ",");
        assert_eq!(reportables[0].code().unwrap().to_string(), ErrorCode::E001.as_str());
    }

    #[test]
    fn test_structural_error_has_help_but_no_labels() {
        let source = r#"{"A": {"Previous": null}, "B": {"Previous": null}}"#;
        let err = MindMapBuilder::default().import(source).unwrap_err();

        let reportables = to_reportables(&err);

        assert!(reportables[0].labels().is_none());
        assert!(reportables[0].source_code().is_none());
        assert!(reportables[0].help().is_some());
    }

    #[test]
    fn test_non_ingest_error() {
        let err = MindMapError::Graph(mindmap::GraphError::UnknownNode(Id::new("x")));

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 1);
        match &reportables[0] {
            Reportable::Error(e) => assert_eq!(e.code().unwrap().to_string(), "mindmap::graph"),
            Reportable::Ingest(_) => panic!("Expected Error"),
        }
    }

    #[test]
    fn test_span_is_clamped() {
        let span = location_to_span("ab\ncd", 2, 10);
        assert_eq!(span.offset(), 5);
        assert_eq!(span.len(), 0);
    }
}
