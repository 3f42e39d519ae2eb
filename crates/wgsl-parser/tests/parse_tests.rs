use wgsl_parser::ast::{Decl, Type};
use wgsl_parser::symbol::SymbolKind;

#[test]
fn parses_struct_and_function_decls() {
    let output = wgsl_parser::parse("struct Point { x: f32, y: f32 }\nfn main() {}\n");
    assert!(output.errors.iter().all(|d| !d.is_error()));
    assert_eq!(output.module.decls.len(), 2);
    assert!(matches!(output.module.decls[0], Decl::Struct { .. }));
    assert!(matches!(output.module.decls[1], Decl::Function { .. }));
}

#[test]
fn every_declaration_registers_a_symbol() {
    let output = wgsl_parser::parse("const a = 1;\nfn f() {}\n");
    assert!(output.errors.iter().all(|d| !d.is_error()));
    assert_eq!(output.module.symbols.len(), 2);
}

#[test]
fn entry_point_function_is_flagged_and_not_renameable() {
    let output = wgsl_parser::parse("@fragment fn main() -> @location(0) vec4<f32> { return vec4<f32>(0.0, 0.0, 0.0, 1.0); }\n");
    assert!(output.errors.iter().all(|d| !d.is_error()));
    let Decl::Function { symbol, .. } = &output.module.decls[0] else {
        panic!("expected a function decl");
    };
    let sym = output.module.symbols.get(*symbol).unwrap();
    assert_eq!(sym.kind, SymbolKind::Function);
    assert!(sym.flags.contains(wgsl_parser::SymbolFlags::IS_ENTRY_POINT));
    assert!(!sym.is_renameable());
}

#[test]
fn uniform_var_is_flagged_external_binding() {
    let output = wgsl_parser::parse("@group(0) @binding(0) var<uniform> u: f32;\n");
    assert!(output.errors.iter().all(|d| !d.is_error()));
    let Decl::Var { symbol, .. } = &output.module.decls[0] else {
        panic!("expected a var decl");
    };
    let sym = output.module.symbols.get(*symbol).unwrap();
    assert!(sym.flags.contains(wgsl_parser::SymbolFlags::IS_EXTERNAL_BINDING));
}

#[test]
fn vector_type_parses_element_and_size() {
    let output = wgsl_parser::parse("const v: vec3<f32> = vec3<f32>(1.0, 2.0, 3.0);\n");
    assert!(output.errors.iter().all(|d| !d.is_error()));
    let Decl::Const { type_: Some(ty), .. } = &output.module.decls[0] else {
        panic!("expected a typed const decl");
    };
    match ty {
        Type::Vector { size, .. } => assert_eq!(*size, 3),
        other => panic!("expected a vector type, got {other:?}"),
    }
}

#[test]
fn unterminated_function_body_is_a_fatal_error() {
    let output = wgsl_parser::parse("fn broken( {\n");
    assert!(output.errors.iter().any(|d| d.is_error()));
}
