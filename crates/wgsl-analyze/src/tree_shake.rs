//! Tree-shaking: marks every symbol reachable from a root `IS_LIVE`.
//!
//! Roots are entry points, API-facing declarations (overrides), external
//! bindings, and anything the caller pinned by name via `keep_names`. A
//! `const_assert` has no symbol of its own but is always emitted, so
//! whatever it references is reachable too.

use rustc_hash::{FxHashMap, FxHashSet};
use wgsl_common::MinifyOptions;
use wgsl_parser::ast::{Attribute, Callee, Decl, Expr, Module, Stmt, Type};
use wgsl_parser::reference::Ref;
use wgsl_parser::symbol::SymbolFlags;

/// Computes the live set and stamps `IS_LIVE` onto every reachable symbol.
///
/// When `options.tree_shaking` is off, every symbol is marked live. When it
/// is on but no root exists (no entry point, no API-facing declaration, no
/// external binding, nothing pinned by `keep_names`), every symbol is also
/// marked live: a module with no identifiable root is almost certainly a
/// library fragment whose consumers live outside this source, so shaking it
/// down to nothing would be wrong.
pub fn mark_live(module: &mut Module, options: &MinifyOptions) {
    let span = tracing::debug_span!("mark_live");
    let _enter = span.enter();

    let symbol_count = module.symbols.len();

    if !options.tree_shaking {
        for (_, sym) in module.symbols.iter_mut() {
            sym.flags |= SymbolFlags::IS_LIVE;
        }
        tracing::debug!(symbol_count, tree_shaking = false, "every symbol marked live");
        return;
    }

    let mut owner_of: FxHashMap<Ref, usize> = FxHashMap::default();
    let mut refs_of_decl: Vec<Vec<Ref>> = Vec::with_capacity(module.decls.len());
    let mut forced_refs: Vec<Ref> = Vec::new();

    for (i, decl) in module.decls.iter().enumerate() {
        let mut refs = Vec::new();
        collect_decl_refs(decl, &mut refs);
        if let Some(sym) = decl.symbol() {
            owner_of.insert(sym, i);
        } else if matches!(decl, Decl::ConstAssert { .. }) {
            forced_refs.extend(refs.iter().copied());
        }
        refs_of_decl.push(refs);
    }

    let keep_names: FxHashSet<&str> = options.keep_names.iter().map(String::as_str).collect();
    let mut roots: Vec<Ref> = Vec::new();
    for (r, sym) in module.symbols.iter() {
        let is_root = sym.flags.intersects(
            SymbolFlags::IS_ENTRY_POINT | SymbolFlags::IS_API_FACING | SymbolFlags::IS_EXTERNAL_BINDING,
        ) || keep_names.contains(sym.name.as_str());
        if is_root {
            roots.push(r);
        }
    }

    if roots.is_empty() {
        tracing::debug!(symbol_count, "no roots found, treating every declaration as live");
        for (_, sym) in module.symbols.iter_mut() {
            sym.flags |= SymbolFlags::IS_LIVE;
        }
        return;
    }

    let mut live = fixedbitset::FixedBitSet::with_capacity(symbol_count.max(1));
    let mut worklist: Vec<Ref> = Vec::new();
    for r in roots.iter().chain(forced_refs.iter()) {
        if r.is_valid() && !live.contains(r.index() as usize) {
            live.insert(r.index() as usize);
            worklist.push(*r);
        }
    }

    while let Some(r) = worklist.pop() {
        let Some(&decl_idx) = owner_of.get(&r) else { continue };
        for target in &refs_of_decl[decl_idx] {
            if target.is_valid() && !live.contains(target.index() as usize) {
                live.insert(target.index() as usize);
                worklist.push(*target);
            }
        }
    }

    let mut live_count = 0;
    for (r, sym) in module.symbols.iter_mut() {
        if live.contains(r.index() as usize) {
            sym.flags |= SymbolFlags::IS_LIVE;
            live_count += 1;
        }
    }
    tracing::debug!(symbol_count, live_count, root_count = roots.len(), "mark_live complete");
}

fn collect_decl_refs(decl: &Decl, out: &mut Vec<Ref>) {
    match decl {
        Decl::Const { type_, value, attributes, .. } => {
            if let Some(t) = type_ {
                collect_type_refs(t, out);
            }
            collect_expr_refs(value, out);
            collect_attr_refs(attributes, out);
        }
        Decl::Let { type_, value, .. } => {
            if let Some(t) = type_ {
                collect_type_refs(t, out);
            }
            collect_expr_refs(value, out);
        }
        Decl::Override { type_, value, attributes, .. } => {
            if let Some(t) = type_ {
                collect_type_refs(t, out);
            }
            if let Some(v) = value {
                collect_expr_refs(v, out);
            }
            collect_attr_refs(attributes, out);
        }
        Decl::Var { type_, value, attributes, .. } => {
            if let Some(t) = type_ {
                collect_type_refs(t, out);
            }
            if let Some(v) = value {
                collect_expr_refs(v, out);
            }
            collect_attr_refs(attributes, out);
        }
        Decl::Function { attributes, params, return_type, return_attributes, body, .. } => {
            collect_attr_refs(attributes, out);
            for param in params {
                collect_type_refs(&param.type_, out);
                collect_attr_refs(&param.attributes, out);
            }
            if let Some(rt) = return_type {
                collect_type_refs(rt, out);
            }
            collect_attr_refs(return_attributes, out);
            for stmt in body {
                collect_stmt_refs(stmt, out);
            }
        }
        Decl::Struct { members, .. } => {
            for member in members {
                collect_type_refs(&member.type_, out);
                collect_attr_refs(&member.attributes, out);
            }
        }
        Decl::Alias { type_, .. } => collect_type_refs(type_, out),
        Decl::ConstAssert { condition, .. } => collect_expr_refs(condition, out),
    }
}

fn collect_attr_refs(attrs: &[Attribute], out: &mut Vec<Ref>) {
    for attr in attrs {
        for arg in &attr.args {
            collect_expr_refs(arg, out);
        }
    }
}

fn collect_stmt_refs(stmt: &Stmt, out: &mut Vec<Ref>) {
    match stmt {
        Stmt::Compound { body, .. } => {
            for s in body {
                collect_stmt_refs(s, out);
            }
        }
        Stmt::Return { value: Some(v), .. } => collect_expr_refs(v, out),
        Stmt::Return { value: None, .. } => {}
        Stmt::If { condition, then_branch, else_branch, .. } => {
            collect_expr_refs(condition, out);
            collect_stmt_refs(then_branch, out);
            if let Some(e) = else_branch {
                collect_stmt_refs(e, out);
            }
        }
        Stmt::Switch { selector, cases, .. } => {
            collect_expr_refs(selector, out);
            for case in cases {
                for sel in &case.selectors {
                    collect_expr_refs(sel, out);
                }
                for s in &case.body {
                    collect_stmt_refs(s, out);
                }
            }
        }
        Stmt::For { init, condition, update, body, .. } => {
            if let Some(i) = init {
                collect_stmt_refs(i, out);
            }
            if let Some(c) = condition {
                collect_expr_refs(c, out);
            }
            if let Some(u) = update {
                collect_stmt_refs(u, out);
            }
            for s in body {
                collect_stmt_refs(s, out);
            }
        }
        Stmt::While { condition, body, .. } => {
            collect_expr_refs(condition, out);
            for s in body {
                collect_stmt_refs(s, out);
            }
        }
        Stmt::Loop { body, continuing, .. } => {
            for s in body {
                collect_stmt_refs(s, out);
            }
            if let Some(cont) = continuing {
                for s in cont {
                    collect_stmt_refs(s, out);
                }
            }
        }
        Stmt::BreakIf { condition, .. } => collect_expr_refs(condition, out),
        Stmt::Break { .. } | Stmt::Continue { .. } | Stmt::Discard { .. } => {}
        Stmt::Assignment { target, value, .. } => {
            collect_expr_refs(target, out);
            collect_expr_refs(value, out);
        }
        Stmt::IncDec { target, .. } => collect_expr_refs(target, out),
        Stmt::ExprStmt { call, .. } => collect_expr_refs(call, out),
        Stmt::Decl { decl, .. } => collect_decl_refs(decl, out),
    }
}

fn collect_type_refs(ty: &Type, out: &mut Vec<Ref>) {
    match ty {
        Type::Scalar { .. } | Type::Sampler { .. } => {}
        Type::Ident { ref_, .. } => out.push(*ref_),
        Type::Vector { element, .. } | Type::Matrix { element, .. } | Type::Atomic { element, .. } => {
            collect_type_refs(element, out);
        }
        Type::Array { element, size, .. } => {
            collect_type_refs(element, out);
            if let Some(size_expr) = size {
                collect_expr_refs(size_expr, out);
            }
        }
        Type::Pointer { element, .. } => collect_type_refs(element, out),
        Type::Texture { sampled_type, .. } => {
            if let Some(st) = sampled_type {
                collect_type_refs(st, out);
            }
        }
    }
}

fn collect_expr_refs(expr: &Expr, out: &mut Vec<Ref>) {
    match expr {
        Expr::Ident { ref_, .. } => out.push(*ref_),
        Expr::Literal { .. } => {}
        Expr::Binary { lhs, rhs, .. } => {
            collect_expr_refs(lhs, out);
            collect_expr_refs(rhs, out);
        }
        Expr::Unary { operand, .. } => collect_expr_refs(operand, out),
        Expr::Call { callee, args, .. } => {
            match callee {
                Callee::Constructor { type_ } => collect_type_refs(type_, out),
                Callee::Function { ref_, .. } => out.push(*ref_),
            }
            for arg in args {
                collect_expr_refs(arg, out);
            }
        }
        Expr::Index { base, index, .. } => {
            collect_expr_refs(base, out);
            collect_expr_refs(index, out);
        }
        Expr::Member { base, .. } => collect_expr_refs(base, out),
        Expr::Paren { inner, .. } => collect_expr_refs(inner, out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgsl_parser::ast::Decl;
    use wgsl_parser::parse;
    use wgsl_resolve::resolve;

    fn shaken(src: &str, options: &MinifyOptions) -> Module {
        let mut out = parse(src);
        assert!(out.errors.is_empty(), "{:?}", out.errors);
        resolve(&mut out.module, src, options);
        mark_live(&mut out.module, options);
        out.module
    }

    fn decl_is_live(module: &Module, name: &str) -> bool {
        module
            .decls
            .iter()
            .find(|d| d.name() == Some(name))
            .and_then(|d| d.symbol())
            .and_then(|r| module.symbols.get(r))
            .is_some_and(|s| s.is_live())
    }

    const SRC: &str = "fn unused() -> f32 { return 1.0; } \
                        @fragment fn main() -> @location(0) vec4f { return vec4f(1.0, 0.0, 0.0, 1.0); }";

    #[test]
    fn unused_function_is_dead_when_tree_shaking_is_on() {
        let module = shaken(SRC, &MinifyOptions::default());
        assert!(!decl_is_live(&module, "unused"));
        assert!(decl_is_live(&module, "main"));
    }

    #[test]
    fn unused_function_is_kept_when_tree_shaking_is_off() {
        let mut options = MinifyOptions::default();
        options.tree_shaking = false;
        let module = shaken(SRC, &options);
        assert!(decl_is_live(&module, "unused"));
    }

    #[test]
    fn keep_names_pins_an_otherwise_dead_declaration() {
        let mut options = MinifyOptions::default();
        options.keep_names = vec!["unused".to_string()];
        let module = shaken(SRC, &options);
        assert!(decl_is_live(&module, "unused"));
    }

    #[test]
    fn live_function_keeps_its_callee_alive_transitively() {
        let src = "fn inner() -> f32 { return 2.0; } \
                   fn outer() -> f32 { return inner(); } \
                   @fragment fn main() -> @location(0) vec4f { let v = outer(); return vec4f(v, v, v, 1.0); }";
        let module = shaken(src, &MinifyOptions::default());
        assert!(decl_is_live(&module, "inner"));
        assert!(decl_is_live(&module, "outer"));
    }

    #[test]
    fn const_assert_keeps_its_operands_alive() {
        let src = "const LIMIT = 4; const_assert(LIMIT > 0);";
        let module = shaken(src, &MinifyOptions::default());
        assert!(decl_is_live(&module, "LIMIT"));
    }

    #[test]
    fn module_with_no_roots_keeps_everything() {
        let src = "fn helper() -> f32 { return 1.0; }";
        let module = shaken(src, &MinifyOptions::default());
        assert!(decl_is_live(&module, "helper"));
    }
}
