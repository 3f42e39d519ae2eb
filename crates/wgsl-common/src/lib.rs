//! Common types shared across every crate in the wgsl-minify pipeline.
//!
//! This crate exists for the same reason the teacher project keeps a
//! `tsz-common` crate: types that every stage needs (spans, positions,
//! diagnostics, options, reserved-word tables) live here once so that
//! `wgsl-lexer`, `wgsl-parser`, `wgsl-resolve`, `wgsl-analyze`, and
//! `wgsl-emit` can all depend on them without depending on each other.

pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticSeverity};

pub mod options;
pub use options::{MinifyOptions, SourceMapOptions};

pub mod position;
pub use position::{LineMap, Position};

pub mod reserved;

pub mod span;
pub use span::{Span, SpanBuilder, Spanned};
