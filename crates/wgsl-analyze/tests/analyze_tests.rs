use wgsl_analyze::{analyze_purity, mark_live};
use wgsl_common::MinifyOptions;
use wgsl_parser::ast::{Decl, Expr, Purity, Stmt};

fn parse_resolve_and_analyze(source: &str, options: &MinifyOptions) -> wgsl_parser::ast::Module {
    let mut output = wgsl_parser::parse(source);
    assert!(output.errors.iter().all(|d| !d.is_error()));
    wgsl_resolve::resolve(&mut output.module, source, options);
    analyze_purity(&mut output.module);
    output.module
}

fn let_call_purity(body: &[Stmt]) -> Purity {
    let Stmt::Decl { decl, .. } = &body[0] else { panic!("expected a local declaration statement") };
    let Decl::Let { value: Expr::Call { purity, .. }, .. } = decl.as_ref() else {
        panic!("expected a let bound to a call expression")
    };
    *purity
}

#[test]
fn call_to_pure_builtin_is_removable_if_unused() {
    let module = parse_resolve_and_analyze("fn f() { let x = abs(-1.0); }\n", &MinifyOptions::default());
    let Decl::Function { body, .. } = &module.decls[0] else { panic!("expected function") };
    assert!(let_call_purity(body).contains(Purity::CAN_BE_REMOVED_IF_UNUSED));
}

#[test]
fn call_to_user_function_is_never_removable_if_unused() {
    let module = parse_resolve_and_analyze(
        "fn helper() -> f32 { return 1.0; }\nfn f() { let x = helper(); }\n",
        &MinifyOptions::default(),
    );
    let Decl::Function { body, .. } = &module.decls[1] else { panic!("expected function") };
    assert!(!let_call_purity(body).contains(Purity::CAN_BE_REMOVED_IF_UNUSED));
}

#[test]
fn tree_shaking_off_marks_every_symbol_live() {
    let mut module = parse_resolve_and_analyze("fn unused() -> f32 { return 1.0; }\n", &MinifyOptions::identity());
    let mut options = MinifyOptions::identity();
    options.tree_shaking = false;
    mark_live(&mut module, &options);
    assert!(module.symbols.iter().all(|(_, sym)| sym.is_live()));
}

#[test]
fn tree_shaking_on_drops_unreferenced_declarations_when_a_root_exists() {
    let mut module = parse_resolve_and_analyze(
        "fn unused() -> f32 { return 1.0; }\n@fragment fn main() -> @location(0) vec4<f32> { return vec4<f32>(0.0, 0.0, 0.0, 1.0); }\n",
        &MinifyOptions::default(),
    );
    mark_live(&mut module, &MinifyOptions::default());

    let Decl::Function { symbol: unused_symbol, .. } = &module.decls[0] else { panic!("expected function") };
    let unused_sym = module.symbols.get(*unused_symbol).unwrap();
    assert!(!unused_sym.is_live());

    let Decl::Function { symbol: main_symbol, .. } = &module.decls[1] else { panic!("expected function") };
    let main_sym = module.symbols.get(*main_symbol).unwrap();
    assert!(main_sym.is_live());
}
