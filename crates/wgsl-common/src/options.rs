//! `MinifyOptions` — the core's only configuration surface.
//!
//! Constructing one is the caller's job; nothing here reads a config file
//! or an environment variable. That responsibility, like CLI flag parsing,
//! belongs to the external collaborator in the `cli` feature of the root
//! package.

use serde::{Deserialize, Serialize};

/// Options recognized by [`crate::MinifyOptions`] consumers, matching the
/// options table in the external-interfaces section of the specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinifyOptions {
    /// Enable the minified whitespace policy.
    pub minify_whitespace: bool,
    /// Use the minifying renamer instead of the no-op one.
    pub minify_identifiers: bool,
    /// Permit literal-level tidying (e.g. `1.0` -> `1.`). May be a no-op.
    pub minify_syntax: bool,
    /// Switch external-binding policy from preserve to mangle.
    pub mangle_external_bindings: bool,
    /// Enable tree-shaking; when false every symbol is marked live.
    pub tree_shaking: bool,
    /// Mark any struct type directly named by a uniform/storage var as
    /// `MustNotBeRenamed`.
    pub preserve_uniform_struct_types: bool,
    /// Identifier spellings to add to the reserved set; these are never
    /// emitted by the renamer and the symbols that use them are pinned.
    pub keep_names: Vec<String>,
    /// Enable source-map mapping-record collection.
    pub source_map: bool,
    /// Settings for source-map collection, consulted only when `source_map`
    /// is set.
    pub source_map_options: SourceMapOptions,
}

impl Default for MinifyOptions {
    fn default() -> Self {
        MinifyOptions {
            minify_whitespace: true,
            minify_identifiers: true,
            minify_syntax: false,
            mangle_external_bindings: false,
            tree_shaking: true,
            preserve_uniform_struct_types: false,
            keep_names: Vec::new(),
            source_map: false,
            source_map_options: SourceMapOptions::default(),
        }
    }
}

impl MinifyOptions {
    /// All transforms disabled: the no-op renamer, pretty whitespace, no
    /// tree-shaking. Useful as a baseline for roundtrip tests.
    #[must_use]
    pub fn identity() -> Self {
        MinifyOptions {
            minify_whitespace: false,
            minify_identifiers: false,
            minify_syntax: false,
            mangle_external_bindings: false,
            tree_shaking: false,
            preserve_uniform_struct_types: false,
            keep_names: Vec::new(),
            source_map: false,
            source_map_options: SourceMapOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceMapOptions {
    /// Name recorded as the generated file in the mapping output.
    pub file_name: Option<String>,
    /// Name recorded as the original source in the mapping output.
    pub source_name: Option<String>,
    /// Whether to carry the original source text alongside the mappings.
    pub include_source_content: bool,
}

impl Default for SourceMapOptions {
    fn default() -> Self {
        SourceMapOptions { file_name: None, source_name: None, include_source_content: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_enables_minification() {
        let opts = MinifyOptions::default();
        assert!(opts.minify_whitespace);
        assert!(opts.minify_identifiers);
        assert!(opts.tree_shaking);
        assert!(!opts.mangle_external_bindings);
    }

    #[test]
    fn identity_disables_every_transform() {
        let opts = MinifyOptions::identity();
        assert!(!opts.minify_whitespace);
        assert!(!opts.minify_identifiers);
        assert!(!opts.tree_shaking);
    }
}
