//! Purity refinement and tree-shaking: the pipeline stage between resolution
//! and renaming/printing.
//!
//! Call [`purity::analyze_purity`] once symbols are resolved, then
//! [`tree_shake::mark_live`] to compute the live set the printer and
//! renamer consult.

pub mod purity;
pub mod tree_shake;

pub use purity::analyze_purity;
pub use tree_shake::mark_live;
