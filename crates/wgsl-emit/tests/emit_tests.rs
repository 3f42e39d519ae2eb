use wgsl_common::MinifyOptions;
use wgsl_emit::{build_minifying_renamer, print, NoopRenamer};

fn prepare(source: &str, options: &MinifyOptions) -> wgsl_parser::ast::Module {
    let mut output = wgsl_parser::parse(source);
    assert!(output.errors.iter().all(|d| !d.is_error()));
    wgsl_resolve::resolve(&mut output.module, source, options);
    wgsl_analyze::analyze_purity(&mut output.module);
    wgsl_analyze::mark_live(&mut output.module, options);
    output.module
}

#[test]
fn noop_renamer_reprints_original_spellings() {
    let source = "const value = 1;\n";
    let module = prepare(source, &MinifyOptions::identity());
    let printed = print(&module, &NoopRenamer, source, &MinifyOptions::identity());
    assert!(printed.code.contains("value"));
}

#[test]
fn minifying_renamer_shrinks_every_used_renameable_identifier() {
    let source = "fn accumulate() -> f32 {\n  let accumulator = 1.0;\n  return accumulator;\n}\n\
                   fn caller() -> f32 { return accumulate(); }\n";
    let mut module = prepare(source, &MinifyOptions::default());
    let options = MinifyOptions::default();
    let renamer = build_minifying_renamer(&mut module, &options);
    let printed = print(&module, &renamer, source, &options);
    assert!(!printed.code.contains("accumulator"));
    assert!(!printed.code.contains("accumulate("));
}

#[test]
fn keep_names_pins_a_used_symbol_from_renaming() {
    let source = "const kept = 1;\nconst other = kept + 1;\n";
    let mut module = prepare(source, &MinifyOptions::default());
    let mut options = MinifyOptions::default();
    options.keep_names = vec!["kept".to_string()];
    let renamer = build_minifying_renamer(&mut module, &options);
    let printed = print(&module, &renamer, source, &options);
    assert!(printed.code.contains("kept"));
}

#[test]
fn source_map_only_records_symbols_whose_spelling_actually_changed() {
    let source = "const kept = 1;\n";
    let mut module = prepare(source, &MinifyOptions::default());
    let mut options = MinifyOptions::default();
    options.source_map = true;
    options.keep_names = vec!["kept".to_string()];
    let renamer = build_minifying_renamer(&mut module, &options);
    let printed = print(&module, &renamer, source, &options);
    assert!(printed.mappings.iter().all(|m| m.original_name != "kept"));
}

#[test]
fn minified_whitespace_output_has_no_line_breaks() {
    let source = "fn f() -> f32 {\n  return 1.0;\n}\n";
    let module = prepare(source, &MinifyOptions::default());
    let printed = print(&module, &NoopRenamer, source, &MinifyOptions::default());
    assert!(!printed.code.contains('\n'));
}
