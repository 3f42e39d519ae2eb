//! Purity refinement: recomputes every expression's [`Purity`] bitset now
//! that symbols are resolved, refining the conservative bits the parser
//! assigned (every call to an identifier was impure; every read was pure
//! but never flagged constant).

use wgsl_common::reserved::is_pure_builtin_function;
use wgsl_parser::ast::{Callee, Decl, Expr, Module, Purity, Stmt, Type};
use wgsl_parser::symbol::{SymbolKind, SymbolTable};

/// Walks every declaration's types and expressions, recomputing purity
/// bottom-up now that identifier and call-callee `Ref`s are resolved.
pub fn analyze_purity(module: &mut Module) {
    let span = tracing::debug_span!("analyze_purity");
    let _enter = span.enter();

    let symbols = &module.symbols;
    let mut decls = std::mem::take(&mut module.decls);
    for decl in &mut decls {
        analyze_decl(decl, symbols);
    }
    module.decls = decls;

    tracing::debug!("analyze_purity complete");
}

fn analyze_decl(decl: &mut Decl, symbols: &SymbolTable) {
    match decl {
        Decl::Const { type_, value, .. } | Decl::Let { type_, value, .. } => {
            if let Some(t) = type_ {
                analyze_type(t, symbols);
            }
            analyze_expr(value, symbols);
        }
        Decl::Override { type_, value, .. } => {
            if let Some(t) = type_ {
                analyze_type(t, symbols);
            }
            if let Some(v) = value {
                analyze_expr(v, symbols);
            }
        }
        Decl::Var { type_, value, .. } => {
            if let Some(t) = type_ {
                analyze_type(t, symbols);
            }
            if let Some(v) = value {
                analyze_expr(v, symbols);
            }
        }
        Decl::Function { params, return_type, body, .. } => {
            for param in params {
                analyze_type(&mut param.type_, symbols);
            }
            if let Some(rt) = return_type {
                analyze_type(rt, symbols);
            }
            for stmt in body {
                analyze_stmt(stmt, symbols);
            }
        }
        Decl::Struct { members, .. } => {
            for member in members {
                analyze_type(&mut member.type_, symbols);
            }
        }
        Decl::Alias { type_, .. } => analyze_type(type_, symbols),
        Decl::ConstAssert { condition, .. } => {
            analyze_expr(condition, symbols);
        }
    }
}

fn analyze_stmt(stmt: &mut Stmt, symbols: &SymbolTable) {
    match stmt {
        Stmt::Compound { body, .. } => {
            for s in body {
                analyze_stmt(s, symbols);
            }
        }
        Stmt::Return { value: Some(v), .. } => analyze_expr(v, symbols),
        Stmt::Return { value: None, .. } => {}
        Stmt::If { condition, then_branch, else_branch, .. } => {
            analyze_expr(condition, symbols);
            analyze_stmt(then_branch, symbols);
            if let Some(e) = else_branch {
                analyze_stmt(e, symbols);
            }
        }
        Stmt::Switch { selector, cases, .. } => {
            analyze_expr(selector, symbols);
            for case in cases {
                for sel in &mut case.selectors {
                    analyze_expr(sel, symbols);
                }
                for s in &mut case.body {
                    analyze_stmt(s, symbols);
                }
            }
        }
        Stmt::For { init, condition, update, body, .. } => {
            if let Some(i) = init {
                analyze_stmt(i, symbols);
            }
            if let Some(c) = condition {
                analyze_expr(c, symbols);
            }
            if let Some(u) = update {
                analyze_stmt(u, symbols);
            }
            for s in body {
                analyze_stmt(s, symbols);
            }
        }
        Stmt::While { condition, body, .. } => {
            analyze_expr(condition, symbols);
            for s in body {
                analyze_stmt(s, symbols);
            }
        }
        Stmt::Loop { body, continuing, .. } => {
            for s in body {
                analyze_stmt(s, symbols);
            }
            if let Some(cont) = continuing {
                for s in cont {
                    analyze_stmt(s, symbols);
                }
            }
        }
        Stmt::BreakIf { condition, .. } => analyze_expr(condition, symbols),
        Stmt::Break { .. } | Stmt::Continue { .. } | Stmt::Discard { .. } => {}
        Stmt::Assignment { target, value, .. } => {
            analyze_expr(target, symbols);
            analyze_expr(value, symbols);
        }
        Stmt::IncDec { target, .. } => analyze_expr(target, symbols),
        Stmt::ExprStmt { call, .. } => analyze_expr(call, symbols),
        Stmt::Decl { decl, .. } => analyze_decl(decl, symbols),
    }
}

fn analyze_type(ty: &mut Type, symbols: &SymbolTable) {
    match ty {
        Type::Scalar { .. } | Type::Sampler { .. } | Type::Ident { .. } => {}
        Type::Vector { element, .. } | Type::Matrix { element, .. } | Type::Atomic { element, .. } => {
            analyze_type(element, symbols);
        }
        Type::Array { element, size, .. } => {
            analyze_type(element, symbols);
            if let Some(size_expr) = size {
                analyze_expr(size_expr, symbols);
            }
        }
        Type::Pointer { element, .. } => analyze_type(element, symbols),
        Type::Texture { sampled_type, .. } => {
            if let Some(st) = sampled_type {
                analyze_type(st, symbols);
            }
        }
    }
}

fn analyze_expr(expr: &mut Expr, symbols: &SymbolTable) -> Purity {
    match expr {
        Expr::Ident { ref_, purity, .. } => {
            let mut p = Purity::CAN_BE_REMOVED_IF_UNUSED;
            if ref_.is_valid() {
                if let Some(sym) = symbols.get(*ref_) {
                    if sym.kind == SymbolKind::Const {
                        p |= Purity::IS_CONSTANT;
                    }
                }
            }
            *purity = p;
            p
        }
        Expr::Literal { .. } => Purity::CAN_BE_REMOVED_IF_UNUSED | Purity::IS_CONSTANT,
        Expr::Binary { lhs, rhs, purity, .. } => {
            let lp = analyze_expr(lhs, symbols);
            let rp = analyze_expr(rhs, symbols);
            let p = pure_if(lp.contains(Purity::CAN_BE_REMOVED_IF_UNUSED) && rp.contains(Purity::CAN_BE_REMOVED_IF_UNUSED));
            *purity = p;
            p
        }
        Expr::Unary { operand, purity, .. } => {
            let op_p = analyze_expr(operand, symbols);
            let p = pure_if(op_p.contains(Purity::CAN_BE_REMOVED_IF_UNUSED));
            *purity = p;
            p
        }
        Expr::Call { callee, args, purity, .. } => {
            let mut args_pure = true;
            for arg in args.iter_mut() {
                if !analyze_expr(arg, symbols).contains(Purity::CAN_BE_REMOVED_IF_UNUSED) {
                    args_pure = false;
                }
            }
            let callee_pure = match callee {
                // A constructor call is pure unless it names a user struct
                // or alias (Type::Ident) — every built-in scalar, vector,
                // matrix, and array constructor is in the pure-builtin set.
                Callee::Constructor { type_ } => {
                    analyze_type(type_, symbols);
                    !matches!(type_.as_ref(), Type::Ident { .. })
                }
                // A resolved Ref means the callee names a user function,
                // never a builtin, regardless of spelling.
                Callee::Function { name, ref_ } => !ref_.is_valid() && is_pure_builtin_function(name),
            };
            let p = if callee_pure && args_pure {
                Purity::CAN_BE_REMOVED_IF_UNUSED | Purity::FROM_PURE_FUNCTION
            } else {
                Purity::empty()
            };
            *purity = p;
            p
        }
        Expr::Index { base, index, purity, .. } => {
            let bp = analyze_expr(base, symbols);
            let ip = analyze_expr(index, symbols);
            let p = pure_if(bp.contains(Purity::CAN_BE_REMOVED_IF_UNUSED) && ip.contains(Purity::CAN_BE_REMOVED_IF_UNUSED));
            *purity = p;
            p
        }
        Expr::Member { base, purity, .. } => {
            let bp = analyze_expr(base, symbols);
            let p = pure_if(bp.contains(Purity::CAN_BE_REMOVED_IF_UNUSED));
            *purity = p;
            p
        }
        Expr::Paren { inner, .. } => analyze_expr(inner, symbols),
    }
}

fn pure_if(cond: bool) -> Purity {
    if cond {
        Purity::CAN_BE_REMOVED_IF_UNUSED
    } else {
        Purity::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgsl_parser::ast::Decl;
    use wgsl_parser::parse;
    use wgsl_resolve::resolve;
    use wgsl_common::MinifyOptions;

    fn analyzed(src: &str) -> Module {
        let mut out = parse(src);
        assert!(out.errors.is_empty(), "{:?}", out.errors);
        resolve(&mut out.module, src, &MinifyOptions::default());
        analyze_purity(&mut out.module);
        out.module
    }

    #[test]
    fn literal_arithmetic_is_pure_and_constant() {
        let module = analyzed("const z = 1 + 2 * 3;");
        let Decl::Const { value, .. } = &module.decls[0] else { panic!() };
        assert!(value.is_pure());
    }

    #[test]
    fn call_to_user_function_stays_impure_even_when_resolved() {
        let module = analyzed("fn helper() -> f32 { return 1.0; } const x = helper();");
        let Decl::Const { value, .. } = &module.decls[1] else { panic!() };
        assert!(!value.is_pure());
    }

    #[test]
    fn call_to_pure_builtin_with_pure_args_is_pure() {
        let module = analyzed("const x = dot(vec2f(1.0, 0.0), vec2f(0.0, 1.0));");
        let Decl::Const { value, .. } = &module.decls[0] else { panic!() };
        assert!(value.is_pure());
    }

    #[test]
    fn struct_constructor_call_is_impure() {
        let module = analyzed("struct S { x: f32 } const s = S(1.0);");
        let Decl::Const { value, .. } = &module.decls[1] else { panic!() };
        assert!(!value.is_pure());
    }

    #[test]
    fn const_read_is_flagged_constant() {
        let module = analyzed("const k = 1.0; const j = k;");
        let Decl::Const { value, .. } = &module.decls[1] else { panic!() };
        assert!(value.purity().contains(Purity::IS_CONSTANT));
    }
}
