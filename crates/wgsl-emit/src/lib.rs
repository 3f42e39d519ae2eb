//! Renaming and printing: the final pipeline stage, turning a resolved and
//! analyzed [`wgsl_parser::ast::Module`] back into source text.
//!
//! Build a [`Renamer`] with [`build_minifying_renamer`] (or use
//! [`NoopRenamer`] directly), then hand it to [`print`] together with the
//! whitespace and syntax options that govern the printed form.

pub mod print;
pub mod rename;

pub use print::{print, PrintOutput, SourceMapping};
pub use rename::{build_minifying_renamer, frequency_shuffled_alphabets, MinifyingRenamer, NoopRenamer, Renamer};
