use wgsl_common::position::Position;
use wgsl_common::{Diagnostic, MinifyOptions, Span};

#[test]
fn error_diagnostic_formats_as_line_colon_column_colon_message() {
    let diagnostic = Diagnostic::error("unexpected token", Position::new(3, 7)).with_span(Span::new(10, 11));
    assert!(diagnostic.is_error());
    assert_eq!(diagnostic.to_string(), "3:7: unexpected token");
    assert_eq!(diagnostic.span, Some(Span::new(10, 11)));
}

#[test]
fn warning_diagnostic_is_not_an_error() {
    let diagnostic = Diagnostic::warning("unused binding", Position::new(1, 1));
    assert!(!diagnostic.is_error());
}

#[test]
fn default_options_minify_whitespace_identifiers_and_tree_shake_but_nothing_else() {
    let options = MinifyOptions::default();
    assert!(options.minify_whitespace);
    assert!(options.minify_identifiers);
    assert!(options.tree_shaking);
    assert!(!options.minify_syntax);
    assert!(!options.mangle_external_bindings);
    assert!(!options.source_map);
}

#[test]
fn identity_options_disable_every_transform() {
    let options = MinifyOptions::identity();
    assert!(!options.minify_whitespace);
    assert!(!options.minify_identifiers);
    assert!(!options.minify_syntax);
    assert!(!options.mangle_external_bindings);
    assert!(!options.tree_shaking);
}
