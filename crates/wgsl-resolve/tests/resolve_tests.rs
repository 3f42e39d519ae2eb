use wgsl_common::MinifyOptions;
use wgsl_parser::ast::{Decl, Expr, Stmt};
use wgsl_parser::symbol::SymbolFlags;

fn parse_and_resolve(source: &str, options: &MinifyOptions) -> wgsl_parser::ast::Module {
    let mut output = wgsl_parser::parse(source);
    assert!(output.errors.iter().all(|d| !d.is_error()));
    let diagnostics = wgsl_resolve::resolve(&mut output.module, source, options);
    assert!(diagnostics.iter().all(|d| !d.is_error()));
    output.module
}

#[test]
fn call_to_module_scope_function_resolves_to_its_symbol() {
    let module = parse_and_resolve(
        "fn helper() -> f32 { return 1.0; }\nfn caller() -> f32 { return helper(); }\n",
        &MinifyOptions::identity(),
    );
    let Decl::Function { body, .. } = &module.decls[1] else { panic!("expected function") };
    let Stmt::Return { value: Some(Expr::Call { callee, .. }), .. } = &body[0] else {
        panic!("expected a return of a call expression")
    };
    match callee {
        wgsl_parser::ast::Callee::Function { ref_, .. } => assert!(ref_.is_valid()),
        other => panic!("expected a function callee, got {other:?}"),
    }
}

#[test]
fn uniform_binding_keeps_must_not_be_renamed_by_default() {
    let module = parse_and_resolve("@group(0) @binding(0) var<uniform> u: f32;\n", &MinifyOptions::default());
    let Decl::Var { symbol, .. } = &module.decls[0] else { panic!("expected a var decl") };
    let sym = module.symbols.get(*symbol).unwrap();
    assert!(sym.flags.contains(SymbolFlags::MUST_NOT_BE_RENAMED));
}

#[test]
fn mangle_external_bindings_lifts_the_must_not_be_renamed_flag() {
    let mut options = MinifyOptions::default();
    options.mangle_external_bindings = true;
    let module = parse_and_resolve("@group(0) @binding(0) var<uniform> u: f32;\n", &options);
    let Decl::Var { symbol, .. } = &module.decls[0] else { panic!("expected a var decl") };
    let sym = module.symbols.get(*symbol).unwrap();
    assert!(!sym.flags.contains(SymbolFlags::MUST_NOT_BE_RENAMED));
}

#[test]
fn preserve_uniform_struct_types_pins_the_struct_symbol() {
    let mut options = MinifyOptions::default();
    options.preserve_uniform_struct_types = true;
    let module = parse_and_resolve(
        "struct Uniforms { time: f32 }\n@group(0) @binding(0) var<uniform> u: Uniforms;\n",
        &options,
    );
    let Decl::Struct { symbol, .. } = &module.decls[0] else { panic!("expected a struct decl") };
    let sym = module.symbols.get(*symbol).unwrap();
    assert!(sym.flags.contains(SymbolFlags::MUST_NOT_BE_RENAMED));
}
