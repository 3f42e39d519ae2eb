//! Diagnostic type shared by every stage of the pipeline.
//!
//! Lex, parse, and resolve errors all collect into the same `Diagnostic`
//! shape so the public `minify`/`reflect` entry points and the CLI's
//! terminal renderer share one type instead of each stage inventing its own.

use serde::{Deserialize, Serialize};

use crate::position::Position;
use crate::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Info,
    Note,
}

/// A single diagnostic: a message tied to a 1-based line/column, with
/// enough structure for both human-readable and machine-readable output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub message: String,
    pub line: u32,
    pub column: u32,
    pub severity: DiagnosticSeverity,
    /// Byte span in the source, when the producing stage has one handy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    /// End position, when the diagnostic covers a range rather than a point.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<Position>,
    /// Short stable code for programmatic matching (e.g. `"E0301"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>, position: Position, severity: DiagnosticSeverity) -> Self {
        Diagnostic {
            message: message.into(),
            line: position.line,
            column: position.column,
            severity,
            span: None,
            end: None,
            code: None,
        }
    }

    pub fn error(message: impl Into<String>, position: Position) -> Self {
        Self::new(message, position, DiagnosticSeverity::Error)
    }

    pub fn warning(message: impl Into<String>, position: Position) -> Self {
        Self::new(message, position, DiagnosticSeverity::Warning)
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    #[must_use]
    pub fn with_end(mut self, end: Position) -> Self {
        self.end = Some(end);
        self
    }

    #[must_use]
    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_sets_line_and_column_from_position() {
        let d = Diagnostic::error("unexpected token", Position::new(3, 7));
        assert_eq!((d.line, d.column), (3, 7));
        assert!(d.is_error());
    }

    #[test]
    fn warning_is_not_error() {
        let d = Diagnostic::warning("unused variable", Position::new(1, 1));
        assert!(!d.is_error());
    }

    #[test]
    fn display_formats_as_line_colon_column() {
        let d = Diagnostic::error("bad", Position::new(2, 5));
        assert_eq!(d.to_string(), "2:5: bad");
    }
}
