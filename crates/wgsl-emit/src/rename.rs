//! The Renamer contract and its two implementations: a no-op renamer that
//! preserves every original spelling, and a minifying renamer that assigns
//! short deterministic names to every renameable symbol with at least one
//! use.

use rustc_hash::{FxHashMap, FxHashSet};
use wgsl_common::reserved::base_reserved_names;
use wgsl_common::MinifyOptions;
use wgsl_parser::ast::{Attribute, Callee, Decl, Expr, Module, Stmt, Type};
use wgsl_parser::reference::Ref;
use wgsl_parser::symbol::SymbolTable;

const HEAD_ALPHABET: &[char; 52] = &[
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w',
    'x', 'y', 'z', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T',
    'U', 'V', 'W', 'X', 'Y', 'Z',
];

const TAIL_ALPHABET: &[char; 62] = &[
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w',
    'x', 'y', 'z', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T',
    'U', 'V', 'W', 'X', 'Y', 'Z', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
];

/// Given a Ref, returns the name the printer should emit for it.
pub trait Renamer {
    fn name_for(&self, symbols: &SymbolTable, r: Ref) -> String;
}

/// Used when `minify_identifiers` is off: every symbol keeps its original
/// spelling.
pub struct NoopRenamer;

impl Renamer for NoopRenamer {
    fn name_for(&self, symbols: &SymbolTable, r: Ref) -> String {
        symbols.get(r).map(|s| s.name.clone()).unwrap_or_default()
    }
}

/// Assigns short names to every renameable, used symbol via the four-phase
/// algorithm: reserved-set computation, usage accumulation, slot
/// allocation, and base-52/62 name generation.
pub struct MinifyingRenamer {
    assigned: FxHashMap<Ref, String>,
}

impl Renamer for MinifyingRenamer {
    fn name_for(&self, symbols: &SymbolTable, r: Ref) -> String {
        if let Some(name) = self.assigned.get(&r) {
            return name.clone();
        }
        symbols.get(r).map(|s| s.name.clone()).unwrap_or_default()
    }
}

/// Builds a [`MinifyingRenamer`] for `module`. Walks the AST to accumulate
/// per-symbol use counts (recorded on the symbols themselves, matching the
/// thread-safe-accumulator shape the orchestrator's concurrency model
/// describes), then allocates slots and assigns names.
pub fn build_minifying_renamer(module: &mut Module, options: &MinifyOptions) -> MinifyingRenamer {
    let span = tracing::debug_span!("rename");
    let _enter = span.enter();

    let keep_names: FxHashSet<&str> = options.keep_names.iter().map(String::as_str).collect();
    let mut reserved: FxHashSet<String> = base_reserved_names().iter().map(|s| (*s).to_string()).collect();
    reserved.extend(options.keep_names.iter().cloned());

    accumulate_uses(module);

    let mut candidates: Vec<(Ref, u32, u32)> = Vec::new();
    let mut unrenamed_names: FxHashSet<String> = FxHashSet::default();
    for (order, (r, sym)) in module.symbols.iter().enumerate() {
        if !sym.is_renameable() || keep_names.contains(sym.name.as_str()) {
            unrenamed_names.insert(sym.name.clone());
            continue;
        }
        if sym.use_count > 0 {
            candidates.push((r, sym.use_count, order as u32));
        } else {
            // Renameable but never referenced: still kept at its original
            // spelling (no candidate slot is ever assigned to it), so that
            // spelling must also be reserved against collision.
            unrenamed_names.insert(sym.name.clone());
        }
    }
    // Descending use count, stable secondary key of declaration order.
    candidates.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    let mut assigned: FxHashMap<Ref, String> = FxHashMap::default();
    let mut taken: FxHashSet<String> = unrenamed_names;
    let mut slot: u32 = 0;
    for (r, _, _) in candidates {
        loop {
            let candidate = generate_name(slot);
            slot += 1;
            if reserved.contains(&candidate) || taken.contains(&candidate) {
                continue;
            }
            taken.insert(candidate.clone());
            assigned.insert(r, candidate);
            break;
        }
    }

    tracing::debug!(renamed_count = assigned.len(), "rename complete");
    MinifyingRenamer { assigned }
}

/// Base-52/62 bijective numbering: `a, b, ..., z, A, ..., Z, aa, ba, ca,
/// ..., za, Aa, ..., Za, ab, bb, ...`. The head digit (least significant)
/// comes from the 52-symbol letter alphabet; every further digit comes from
/// the 62-symbol letter-and-digit alphabet.
fn generate_name(mut n: u32) -> String {
    let mut out = String::new();
    out.push(HEAD_ALPHABET[(n % 52) as usize]);
    n /= 52;
    while n > 0 {
        n -= 1;
        out.push(TAIL_ALPHABET[(n % 62) as usize]);
        n /= 62;
    }
    out
}

/// Reorders the head and tail alphabets so characters appearing more often
/// in `source` sort first, which improves post-compression ratios. Pure
/// and side-effect-free; callers opt in by feeding the result into a
/// custom name generator. Not wired into [`build_minifying_renamer`]
/// because `MinifyOptions` has no field to gate it (the specification
/// marks this transform optional, never required for correctness).
#[must_use]
pub fn frequency_shuffled_alphabets(source: &str) -> (Vec<char>, Vec<char>) {
    let mut counts: FxHashMap<char, u32> = FxHashMap::default();
    for ch in source.chars() {
        if ch.is_ascii_alphanumeric() {
            *counts.entry(ch).or_insert(0) += 1;
        }
    }
    let mut head: Vec<char> = HEAD_ALPHABET.to_vec();
    let mut tail: Vec<char> = TAIL_ALPHABET.to_vec();
    let order_key = |c: &char| std::cmp::Reverse(counts.get(c).copied().unwrap_or(0));
    head.sort_by_key(order_key);
    tail.sort_by_key(order_key);
    (head, tail)
}

fn accumulate_uses(module: &mut Module) {
    let mut refs = Vec::new();
    for decl in &module.decls {
        collect_decl_refs(decl, &mut refs);
    }
    for r in refs {
        module.symbols.record_use(r);
    }
}

fn collect_decl_refs(decl: &Decl, out: &mut Vec<Ref>) {
    match decl {
        Decl::Const { type_, value, .. } => {
            if let Some(t) = type_ {
                collect_type_refs(t, out);
            }
            collect_expr_refs(value, out);
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
    use wgsl_parser::parse;
    use wgsl_resolve::resolve;

    fn built(src: &str, options: &MinifyOptions) -> (Module, MinifyingRenamer) {
        let mut out = parse(src);
        assert!(out.errors.is_empty(), "{:?}", out.errors);
        resolve(&mut out.module, src, options);
        let renamer = build_minifying_renamer(&mut out.module, options);
        (out.module, renamer)
    }

    fn symbol_ref(module: &Module, name: &str) -> Ref {
        module.decls.iter().find(|d| d.name() == Some(name)).and_then(|d| d.symbol()).unwrap()
    }

    #[test]
    fn generate_name_follows_the_documented_sequence() {
        assert_eq!(generate_name(0), "a");
        assert_eq!(generate_name(25), "z");
        assert_eq!(generate_name(26), "A");
        assert_eq!(generate_name(51), "Z");
        assert_eq!(generate_name(52), "aa");
        assert_eq!(generate_name(53), "ba");
        assert_eq!(generate_name(103), "Za");
        assert_eq!(generate_name(104), "ab");
    }

    #[test]
    fn most_used_symbol_gets_the_shortest_name() {
        let src = "fn helper() -> f32 { return 1.0; } \
                   @fragment fn main() -> @location(0) vec4f { \
                       let a = helper() + helper() + helper(); \
                       let b = helper(); \
                       return vec4f(a, b, 0.0, 1.0); \
                   }";
        let (module, renamer) = built(src, &MinifyOptions::default());
        let helper = symbol_ref(&module, "helper");
        assert_eq!(renamer.name_for(&module.symbols, helper), "a");
    }

    #[test]
    fn entry_point_keeps_its_original_name() {
        let src = "@fragment fn main() -> @location(0) vec4f { return vec4f(0.0, 0.0, 0.0, 1.0); }";
        let (module, renamer) = built(src, &MinifyOptions::default());
        let main_ref = symbol_ref(&module, "main");
        assert_eq!(renamer.name_for(&module.symbols, main_ref), "main");
    }

    #[test]
    fn reserved_keyword_spelling_is_never_assigned() {
        // With no other identifiers competing for short names, slot 0
        // ("a") would ordinarily go to the first candidate; verify a
        // used symbol never receives a name in the reserved set at all.
        let src = "fn helper() -> f32 { return 1.0; } \
                   @fragment fn main() -> @location(0) vec4f { return vec4f(helper(), 0.0, 0.0, 1.0); }";
        let (module, renamer) = built(src, &MinifyOptions::default());
        let helper = symbol_ref(&module, "helper");
        let name = renamer.name_for(&module.symbols, helper);
        assert!(!base_reserved_names().contains(name.as_str()));
    }

    #[test]
    fn noop_renamer_preserves_original_spelling() {
        let src = "fn helper() -> f32 { return 1.0; }";
        let mut out = parse(src);
        resolve(&mut out.module, src, &MinifyOptions::default());
        let r = symbol_ref(&out.module, "helper");
        assert_eq!(NoopRenamer.name_for(&out.module.symbols, r), "helper");
    }

    #[test]
    fn frequency_shuffle_puts_the_most_common_character_first() {
        let (head, _) = frequency_shuffled_alphabets("zzzzz a b c");
        assert_eq!(head[0], 'z');
    }
}
