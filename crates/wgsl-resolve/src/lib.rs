//! Use-pass resolver: walks every expression and type in a parsed [`Module`]
//! and fills in the [`Ref`] of every identifier/type-name occurrence that
//! the parser left invalid. Declaration-pass bookkeeping (interning symbols,
//! registering scope bindings) already happened during parsing — see
//! `wgsl-parser`'s declaration methods — so this crate only performs the
//! scope-chain walk half of the two-pass resolver.

use wgsl_common::position::LineMap;
use wgsl_common::{Diagnostic, MinifyOptions, Span};
use wgsl_parser::ast::{Attribute, Callee, Decl, Expr, Module, Stmt, Type};
use wgsl_parser::scope::{ScopeId, ScopeTree};
use wgsl_parser::symbol::SymbolFlags;
use wgsl_parser::reference::Ref;

struct Resolver<'a> {
    tree: &'a ScopeTree,
    line_map: LineMap,
    source: &'a str,
}

/// Resolves every identifier and type-name occurrence in `module` against
/// its scope tree, then applies the external-binding and
/// `preserve_uniform_struct_types` policies from `options`.
pub fn resolve(module: &mut Module, source: &str, options: &MinifyOptions) -> Vec<Diagnostic> {
    let span = tracing::debug_span!("resolve");
    let _enter = span.enter();

    let resolver = Resolver { tree: &module.scopes, line_map: LineMap::build(source), source };
    let mut decls = std::mem::take(&mut module.decls);
    for decl in &mut decls {
        resolver.resolve_decl(decl);
    }
    module.decls = decls;

    apply_external_binding_policy(module, options);

    tracing::debug!(symbol_count = module.symbols.len(), "resolve complete");
    Vec::new()
}

fn apply_external_binding_policy(module: &mut Module, options: &MinifyOptions) {
    let mangle = options.mangle_external_bindings;
    let preserve_uniform_structs = options.preserve_uniform_struct_types;
    let mut struct_refs_to_pin = Vec::new();

    for decl in &module.decls {
        let Decl::Var { symbol, type_, .. } = decl else { continue };
        let Some(sym) = module.symbols.get(*symbol) else { continue };
        if !sym.flags.contains(SymbolFlags::IS_EXTERNAL_BINDING) {
            continue;
        }
        if preserve_uniform_structs {
            if let Some(Type::Ident { ref_, .. }) = type_ {
                if ref_.is_valid() {
                    struct_refs_to_pin.push(*ref_);
                }
            }
        }
        if !mangle {
            struct_refs_to_pin.push(*symbol);
        }
    }

    for r in struct_refs_to_pin {
        if let Some(sym) = module.symbols.get_mut(r) {
            sym.flags |= SymbolFlags::MUST_NOT_BE_RENAMED;
        }
    }
}

impl<'a> Resolver<'a> {
    fn resolve_name(&self, scope: ScopeId, name: &str, use_pos: u32) -> Option<Ref> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if let Some(binding) = self.tree.get(id).lookup(name) {
                if id == ScopeId::ROOT || binding.declared_at < use_pos {
                    return Some(binding.symbol);
                }
            }
            current = self.tree.parent_of(id);
        }
        None
    }

    /// An identifier that doesn't resolve is not necessarily an error: it
    /// may name a built-in function, built-in type, or other spelling this
    /// pipeline never interns as a Symbol. Lacking a complete built-in name
    /// table beyond the pure-function set, resolution misses are logged at
    /// trace level rather than surfaced as diagnostics; later passes already
    /// treat an invalid Ref conservatively (as potentially impure).
    fn note_unresolved(&self, name: &str, span: Span) {
        let pos = self.line_map.offset_to_position(span.start, self.source);
        tracing::trace!(name, line = pos.line, column = pos.column, "identifier did not resolve to a local symbol");
    }

    fn resolve_decl(&self, decl: &mut Decl) {
        match decl {
            Decl::Const { type_, value, .. } => {
                if let Some(t) = type_ {
                    self.resolve_type(t, ScopeId::ROOT);
                }
                self.resolve_expr(value, ScopeId::ROOT);
            }
            Decl::Override { attributes, type_, value, .. } => {
                self.resolve_attributes(attributes, ScopeId::ROOT);
                if let Some(t) = type_ {
                    self.resolve_type(t, ScopeId::ROOT);
                }
                if let Some(v) = value {
                    self.resolve_expr(v, ScopeId::ROOT);
                }
            }
            Decl::Var { attributes, type_, value, .. } => {
                self.resolve_attributes(attributes, ScopeId::ROOT);
                if let Some(t) = type_ {
                    self.resolve_type(t, ScopeId::ROOT);
                }
                if let Some(v) = value {
                    self.resolve_expr(v, ScopeId::ROOT);
                }
            }
            Decl::Let { type_, value, .. } => {
                if let Some(t) = type_ {
                    self.resolve_type(t, ScopeId::ROOT);
                }
                self.resolve_expr(value, ScopeId::ROOT);
            }
            Decl::Function { attributes, params, return_type, return_attributes, body, scope, .. } => {
                self.resolve_attributes(attributes, ScopeId::ROOT);
                for param in params {
                    self.resolve_attributes(&mut param.attributes, ScopeId::ROOT);
                    self.resolve_type(&mut param.type_, *scope);
                }
                if let Some(rt) = return_type {
                    self.resolve_type(rt, *scope);
                }
                self.resolve_attributes(return_attributes, ScopeId::ROOT);
                for stmt in body {
                    self.resolve_stmt(stmt, *scope);
                }
            }
            Decl::Struct { members, .. } => {
                for member in members {
                    self.resolve_attributes(&mut member.attributes, ScopeId::ROOT);
                    self.resolve_type(&mut member.type_, ScopeId::ROOT);
                }
            }
            Decl::Alias { type_, .. } => self.resolve_type(type_, ScopeId::ROOT),
            Decl::ConstAssert { condition, .. } => self.resolve_expr(condition, ScopeId::ROOT),
        }
    }

    fn resolve_attributes(&self, attrs: &mut [Attribute], scope: ScopeId) {
        for attr in attrs {
            for arg in &mut attr.args {
                self.resolve_expr(arg, scope);
            }
        }
    }

    fn resolve_stmt(&self, stmt: &mut Stmt, scope: ScopeId) {
        match stmt {
            Stmt::Compound { body, scope: inner, .. } => {
                for s in body {
                    self.resolve_stmt(s, *inner);
                }
            }
            Stmt::Return { value, .. } => {
                if let Some(v) = value {
                    self.resolve_expr(v, scope);
                }
            }
            Stmt::If { condition, then_branch, else_branch, .. } => {
                self.resolve_expr(condition, scope);
                self.resolve_stmt(then_branch, scope);
                if let Some(e) = else_branch {
                    self.resolve_stmt(e, scope);
                }
            }
            Stmt::Switch { selector, cases, .. } => {
                self.resolve_expr(selector, scope);
                for case in cases {
                    for sel in &mut case.selectors {
                        self.resolve_expr(sel, scope);
                    }
                    for s in &mut case.body {
                        self.resolve_stmt(s, case.scope);
                    }
                }
            }
            Stmt::For { scope: for_scope, init, condition, update, body, body_scope, .. } => {
                if let Some(i) = init {
                    self.resolve_stmt(i, *for_scope);
                }
                if let Some(c) = condition {
                    self.resolve_expr(c, *for_scope);
                }
                if let Some(u) = update {
                    self.resolve_stmt(u, *for_scope);
                }
                for s in body {
                    self.resolve_stmt(s, *body_scope);
                }
            }
            Stmt::While { condition, body, scope: inner, .. } => {
                self.resolve_expr(condition, scope);
                for s in body {
                    self.resolve_stmt(s, *inner);
                }
            }
            Stmt::Loop { body, body_scope, continuing, continuing_scope, .. } => {
                for s in body {
                    self.resolve_stmt(s, *body_scope);
                }
                if let Some(cont) = continuing {
                    let cont_scope = continuing_scope.expect("continuing body always has a scope");
                    for s in cont {
                        self.resolve_stmt(s, cont_scope);
                    }
                }
            }
            Stmt::BreakIf { condition, .. } => self.resolve_expr(condition, scope),
            Stmt::Break { .. } | Stmt::Continue { .. } | Stmt::Discard { .. } => {}
            Stmt::Assignment { target, value, .. } => {
                self.resolve_expr(target, scope);
                self.resolve_expr(value, scope);
            }
            Stmt::IncDec { target, .. } => self.resolve_expr(target, scope),
            Stmt::ExprStmt { call, .. } => self.resolve_expr(call, scope),
            Stmt::Decl { decl, .. } => self.resolve_local_decl(decl, scope),
        }
    }

    /// Local const/let/var statements live in the scope they were declared
    /// into (the same scope their own name is bound in), so their type and
    /// initializer resolve against that scope, not a fresh one.
    fn resolve_local_decl(&self, decl: &mut Decl, scope: ScopeId) {
        match decl {
            Decl::Const { type_, value, .. } | Decl::Let { type_, value, .. } => {
                if let Some(t) = type_ {
                    self.resolve_type(t, scope);
                }
                self.resolve_expr(value, scope);
            }
            Decl::Var { type_, value, .. } => {
                if let Some(t) = type_ {
                    self.resolve_type(t, scope);
                }
                if let Some(v) = value {
                    self.resolve_expr(v, scope);
                }
            }
            _ => unreachable!("local decl statements are only const/let/var"),
        }
    }

    fn resolve_type(&self, ty: &mut Type, scope: ScopeId) {
        match ty {
            Type::Scalar { .. } | Type::Sampler { .. } => {}
            Type::Vector { element, .. } | Type::Matrix { element, .. } | Type::Atomic { element, .. } => {
                self.resolve_type(element, scope);
            }
            Type::Array { element, size, .. } => {
                self.resolve_type(element, scope);
                if let Some(size_expr) = size {
                    self.resolve_expr(size_expr, scope);
                }
            }
            Type::Pointer { element, .. } => self.resolve_type(element, scope),
            Type::Texture { sampled_type, .. } => {
                if let Some(st) = sampled_type {
                    self.resolve_type(st, scope);
                }
            }
            Type::Ident { name, ref_, span } => {
                if !ref_.is_valid() {
                    match self.resolve_name(scope, name, span.start) {
                        Some(r) => *ref_ = r,
                        None => self.note_unresolved(name, *span),
                    }
                }
            }
        }
    }

    fn resolve_expr(&self, expr: &mut Expr, scope: ScopeId) {
        match expr {
            Expr::Ident { name, ref_, span, .. } => {
                if !ref_.is_valid() {
                    match self.resolve_name(scope, name, span.start) {
                        Some(r) => *ref_ = r,
                        None => self.note_unresolved(name, *span),
                    }
                }
            }
            Expr::Literal { .. } => {}
            Expr::Binary { lhs, rhs, .. } => {
                self.resolve_expr(lhs, scope);
                self.resolve_expr(rhs, scope);
            }
            Expr::Unary { operand, .. } => self.resolve_expr(operand, scope),
            Expr::Call { callee, args, span, .. } => {
                match callee {
                    Callee::Function { name, ref_ } => {
                        if !ref_.is_valid() {
                            match self.resolve_name(scope, name, span.start) {
                                Some(r) => *ref_ = r,
                                None => self.note_unresolved(name, *span),
                            }
                        }
                    }
                    Callee::Constructor { type_ } => self.resolve_type(type_, scope),
                }
                for arg in args {
                    self.resolve_expr(arg, scope);
                }
            }
            Expr::Index { base, index, .. } => {
                self.resolve_expr(base, scope);
                self.resolve_expr(index, scope);
            }
            Expr::Member { base, .. } => self.resolve_expr(base, scope),
            Expr::Paren { inner, .. } => self.resolve_expr(inner, scope),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgsl_parser::parse;

    fn resolved(src: &str) -> Module {
        let mut out = parse(src);
        assert!(out.errors.is_empty(), "{:?}", out.errors);
        resolve(&mut out.module, src, &MinifyOptions::default());
        out.module
    }

    #[test]
    fn module_scope_forward_reference_resolves() {
        let module = resolved("fn getValue() -> f32 { return k; } const k: f32 = 1.0;");
        let Decl::Function { body, .. } = &module.decls[0] else { panic!() };
        let Stmt::Return { value: Some(Expr::Ident { ref_, .. }), .. } = &body[0] else { panic!() };
        assert!(ref_.is_valid());
    }

    #[test]
    fn shadowing_respects_text_order() {
        let module = resolved(
            "fn helper() -> f32 { return 1.0; } fn test() -> f32 { let r = helper(); let helper = r * 2.0; return helper; }",
        );
        let Decl::Function { symbol: helper_fn_symbol, .. } = &module.decls[0] else { panic!() };
        let Decl::Function { body, .. } = &module.decls[1] else { panic!() };
        let Stmt::Decl { decl, .. } = &body[0] else { panic!() };
        let Decl::Let { value: Expr::Call { callee: Callee::Function { ref_, .. }, .. }, .. } = decl.as_ref() else {
            panic!()
        };
        assert_eq!(ref_, helper_fn_symbol);
    }

    #[test]
    fn member_access_name_is_never_resolved_against_scope() {
        let module = resolved("struct S { x: f32 } fn f(s: S) -> f32 { return s.x; }");
        let Decl::Function { body, .. } = &module.decls[1] else { panic!() };
        let Stmt::Return { value: Some(Expr::Member { name, .. }), .. } = &body[0] else { panic!() };
        assert_eq!(name, "x");
    }

    #[test]
    fn preserve_policy_marks_external_binding_not_renamed() {
        let mut out = parse("@group(0) @binding(0) var<uniform> u: f32;");
        resolve(&mut out.module, "", &MinifyOptions { mangle_external_bindings: false, ..MinifyOptions::default() });
        let Decl::Var { symbol, .. } = &out.module.decls[0] else { panic!() };
        let sym = out.module.symbols.get(*symbol).unwrap();
        assert!(sym.flags.contains(SymbolFlags::MUST_NOT_BE_RENAMED));
    }

    #[test]
    fn mangle_policy_leaves_external_binding_renameable() {
        let mut out = parse("@group(0) @binding(0) var<uniform> u: f32;");
        resolve(&mut out.module, "", &MinifyOptions { mangle_external_bindings: true, ..MinifyOptions::default() });
        let Decl::Var { symbol, .. } = &out.module.decls[0] else { panic!() };
        let sym = out.module.symbols.get(*symbol).unwrap();
        assert!(!sym.flags.contains(SymbolFlags::MUST_NOT_BE_RENAMED));
    }

    #[test]
    fn preserve_uniform_struct_types_pins_the_struct_symbol() {
        let mut out = parse("struct MyUniforms { time: f32 } @group(0) @binding(0) var<uniform> u: MyUniforms;");
        resolve(
            &mut out.module,
            "",
            &MinifyOptions { mangle_external_bindings: false, preserve_uniform_struct_types: true, ..MinifyOptions::default() },
        );
        let Decl::Struct { symbol, .. } = &out.module.decls[0] else { panic!() };
        let sym = out.module.symbols.get(*symbol).unwrap();
        assert!(sym.flags.contains(SymbolFlags::MUST_NOT_BE_RENAMED));
    }
}
