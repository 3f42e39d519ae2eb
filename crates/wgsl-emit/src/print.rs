//! The Printer: walks a resolved, analyzed [`Module`] and a [`Renamer`] and
//! produces source text, in either pretty or minified whitespace mode.
//!
//! Minified mode is governed by a single "needs space before next token"
//! flag, set after a keyword/identifier token and cleared after
//! punctuation — the only mechanism that keeps adjacent identifier-like
//! tokens from gluing together. Two spots the flag alone would miss (the
//! space after an attribute and the space between `return` and its
//! operand) are forced explicitly.

use wgsl_common::position::LineMap;
use wgsl_common::MinifyOptions;
use wgsl_parser::ast::{
    AccessMode, AddressSpace, AssignOp, Attribute, BinaryOp, Callee, Decl, Directive, Expr, ExprLiteralKind, IncDecOp,
    Module, ScalarKind, Stmt, TextureKind, Type, UnaryOp,
};
use wgsl_parser::reference::Ref;

use crate::rename::Renamer;

/// A single renamed-identifier mapping record, per the source-map contract:
/// `{output line, output column, original name, original line, original
/// column}`. Encoding these into the standard VLQ source-map format is
/// outside this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMapping {
    pub output_line: u32,
    pub output_column: u32,
    pub original_name: String,
    pub original_line: u32,
    pub original_column: u32,
}

#[derive(Debug, Clone)]
pub struct PrintOutput {
    pub code: String,
    pub mappings: Vec<SourceMapping>,
}

/// Prints `module` with `renamer`, per the whitespace policy in `options`.
/// `source` is the original text, needed only to resolve symbol spans to
/// line/column positions for source-map records.
#[must_use]
pub fn print(module: &Module, renamer: &dyn Renamer, source: &str, options: &MinifyOptions) -> PrintOutput {
    let span = tracing::debug_span!("print");
    let _enter = span.enter();

    let mut printer = Printer {
        module,
        renamer,
        source,
        options,
        line_map: LineMap::build(source),
        minified: options.minify_whitespace,
        collect_map: options.source_map,
        out: String::new(),
        needs_space: false,
        indent: 0,
        cur_line: 1,
        cur_col: 1,
        mappings: Vec::new(),
    };
    printer.print_module();

    tracing::debug!(bytes = printer.out.len(), mappings = printer.mappings.len(), "print complete");
    PrintOutput { code: printer.out, mappings: printer.mappings }
}

struct Printer<'a> {
    module: &'a Module,
    renamer: &'a dyn Renamer,
    source: &'a str,
    options: &'a MinifyOptions,
    line_map: LineMap,
    minified: bool,
    collect_map: bool,
    out: String,
    needs_space: bool,
    indent: u32,
    cur_line: u32,
    cur_col: u32,
    mappings: Vec<SourceMapping>,
}

impl<'a> Printer<'a> {
    fn raw(&mut self, s: &str) {
        for ch in s.chars() {
            if ch == '\n' {
                self.cur_line += 1;
                self.cur_col = 1;
            } else {
                self.cur_col += 1;
            }
        }
        self.out.push_str(s);
    }

    /// Emits a keyword, identifier, number, or other alphanumeric-class
    /// token. In minified mode, inserts a single space first if the
    /// previous token left one pending.
    fn token(&mut self, s: &str, is_word: bool) {
        if self.minified && is_word && self.needs_space {
            self.raw(" ");
        }
        self.raw(s);
        if self.minified {
            self.needs_space = is_word;
        }
    }

    /// Forces exactly one space, used for the two spots the spec calls out
    /// explicitly: after a full attribute, and between `return` and its
    /// operand.
    fn mandatory_space(&mut self) {
        self.raw(" ");
        self.needs_space = false;
    }

    fn newline_indent(&mut self) {
        if self.minified {
            return;
        }
        self.raw("\n");
        for _ in 0..self.indent {
            self.raw("    ");
        }
    }

    fn emit_symbol_name(&mut self, r: Ref) {
        let name = self.renamer.name_for(&self.module.symbols, r);
        if self.minified && self.needs_space {
            self.raw(" ");
        }
        let out_line = self.cur_line;
        let out_col = self.cur_col;
        self.raw(&name);
        if self.minified {
            self.needs_space = true;
        }
        if !self.collect_map {
            return;
        }
        let Some(sym) = self.module.symbols.get(r) else { return };
        if name == sym.name {
            return;
        }
        let orig_pos = self.line_map.offset_to_position(sym.span.start, self.source);
        self.mappings.push(SourceMapping {
            output_line: out_line,
            output_column: out_col,
            original_name: sym.name.clone(),
            original_line: orig_pos.line,
            original_column: orig_pos.column,
        });
    }

    fn print_module(&mut self) {
        let mut any = false;
        for d in &self.module.directives {
            if any {
                self.newline_indent();
            }
            self.print_directive(d);
            any = true;
        }
        for decl in &self.module.decls {
            if let Some(r) = decl.symbol() {
                if let Some(sym) = self.module.symbols.get(r) {
                    if !sym.is_live() {
                        continue;
                    }
                }
            }
            if any && !self.minified {
                self.raw("\n\n");
            }
            self.print_decl(decl);
            any = true;
        }
        if !self.minified && any {
            self.raw("\n");
        }
    }

    fn print_directive(&mut self, d: &Directive) {
        match d {
            Directive::Enable { names, .. } => {
                self.token("enable", true);
                self.print_name_list(names);
                self.token(";", false);
            }
            Directive::Requires { names, .. } => {
                self.token("requires", true);
                self.print_name_list(names);
                self.token(";", false);
            }
            Directive::Diagnostic { severity, rule, .. } => {
                self.token("diagnostic", true);
                self.token("(", false);
                self.token(severity, true);
                self.token(",", false);
                if !self.minified {
                    self.raw(" ");
                }
                self.token(rule, true);
                self.token(")", false);
                self.token(";", false);
            }
        }
    }

    fn print_name_list(&mut self, names: &[String]) {
        for (i, n) in names.iter().enumerate() {
            if i > 0 {
                self.token(",", false);
                if !self.minified {
                    self.raw(" ");
                }
            }
            self.token(n, true);
        }
    }

    fn print_attributes(&mut self, attrs: &[Attribute]) {
        for attr in attrs {
            self.token("@", false);
            self.token(&attr.name, true);
            if !attr.args.is_empty() {
                self.token("(", false);
                for (i, a) in attr.args.iter().enumerate() {
                    if i > 0 {
                        self.token(",", false);
                        if !self.minified {
                            self.raw(" ");
                        }
                    }
                    self.print_expr(a);
                }
                self.token(")", false);
            }
            self.mandatory_space();
        }
    }

    fn print_decl(&mut self, decl: &Decl) {
        self.print_decl_content(decl);
        if decl_has_terminator(decl) {
            self.token(";", false);
        }
    }

    fn print_decl_content(&mut self, decl: &Decl) {
        match decl {
            Decl::Const { symbol, type_, value, .. } => {
                self.token("const", true);
                self.emit_symbol_name(*symbol);
                self.print_optional_type_annotation(type_.as_ref());
                self.print_assign_rhs(value);
            }
            Decl::Let { symbol, type_, value, .. } => {
                self.token("let", true);
                self.emit_symbol_name(*symbol);
                self.print_optional_type_annotation(type_.as_ref());
                self.print_assign_rhs(value);
            }
            Decl::Override { symbol, attributes, type_, value, .. } => {
                self.print_attributes(attributes);
                self.token("override", true);
                self.emit_symbol_name(*symbol);
                self.print_optional_type_annotation(type_.as_ref());
                if let Some(v) = value {
                    self.print_assign_rhs(v);
                }
            }
            Decl::Var { symbol, attributes, address_space, access_mode, type_, value, .. } => {
                self.print_attributes(attributes);
                self.token("var", true);
                if let Some(asp) = address_space {
                    self.token("<", false);
                    self.token(address_space_name(*asp), true);
                    if let Some(am) = access_mode {
                        self.token(",", false);
                        if !self.minified {
                            self.raw(" ");
                        }
                        self.token(access_mode_name(*am), true);
                    }
                    self.token(">", false);
                }
                self.emit_symbol_name(*symbol);
                self.print_optional_type_annotation(type_.as_ref());
                if let Some(v) = value {
                    self.print_assign_rhs(v);
                }
            }
            Decl::Function { symbol, attributes, params, return_type, return_attributes, body, .. } => {
                self.print_attributes(attributes);
                self.token("fn", true);
                self.emit_symbol_name(*symbol);
                self.token("(", false);
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        self.token(",", false);
                        if !self.minified {
                            self.raw(" ");
                        }
                    }
                    self.print_attributes(&p.attributes);
                    self.emit_symbol_name(p.symbol);
                    self.token(":", false);
                    if !self.minified {
                        self.raw(" ");
                    }
                    self.print_type(&p.type_);
                }
                self.token(")", false);
                if let Some(rt) = return_type {
                    self.token("->", false);
                    if !self.minified {
                        self.raw(" ");
                    }
                    self.print_attributes(return_attributes);
                    self.print_type(rt);
                }
                if !self.minified {
                    self.raw(" ");
                }
                self.print_block(body);
            }
            Decl::Struct { symbol, members, .. } => {
                self.token("struct", true);
                self.emit_symbol_name(*symbol);
                if !self.minified {
                    self.raw(" ");
                }
                self.token("{", false);
                self.indent += 1;
                for m in members {
                    self.newline_indent();
                    self.print_attributes(&m.attributes);
                    self.token(&m.name, true);
                    self.token(":", false);
                    if !self.minified {
                        self.raw(" ");
                    }
                    self.print_type(&m.type_);
                    self.token(",", false);
                }
                self.indent -= 1;
                self.newline_indent();
                self.token("}", false);
            }
            Decl::Alias { symbol, type_, .. } => {
                self.token("alias", true);
                self.emit_symbol_name(*symbol);
                if !self.minified {
                    self.raw(" ");
                }
                self.token("=", false);
                if !self.minified {
                    self.raw(" ");
                }
                self.print_type(type_);
            }
            Decl::ConstAssert { condition, .. } => {
                self.token("const_assert", true);
                self.mandatory_space();
                self.print_expr(condition);
            }
        }
    }

    fn print_optional_type_annotation(&mut self, type_: Option<&Type>) {
        if let Some(t) = type_ {
            self.token(":", false);
            if !self.minified {
                self.raw(" ");
            }
            self.print_type(t);
        }
    }

    fn print_assign_rhs(&mut self, value: &Expr) {
        if !self.minified {
            self.raw(" ");
        }
        self.token("=", false);
        if !self.minified {
            self.raw(" ");
        }
        self.print_expr(value);
    }

    fn print_block(&mut self, body: &[Stmt]) {
        self.token("{", false);
        self.indent += 1;
        for s in body {
            self.newline_indent();
            self.print_stmt(s);
        }
        self.indent -= 1;
        self.newline_indent();
        self.token("}", false);
    }

    fn print_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Compound { body, .. } => self.print_block(body),
            Stmt::Decl { decl, .. } => self.print_decl(decl),
            Stmt::If { .. } => self.print_if(stmt),
            Stmt::Switch { .. } => self.print_switch(stmt),
            Stmt::For { .. } => self.print_for(stmt),
            Stmt::While { .. } => self.print_while(stmt),
            Stmt::Loop { .. } => self.print_loop(stmt),
            _ => {
                self.print_simple_stmt_core(stmt);
                self.token(";", false);
            }
        }
    }

    /// Content of a semicolon-terminated simple statement, without the
    /// terminator — shared between ordinary block statements (which append
    /// `;` themselves) and a for-loop header's init/update clauses (which
    /// never get one).
    fn print_simple_stmt_core(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Return { value, .. } => {
                self.token("return", true);
                if let Some(v) = value {
                    self.mandatory_space();
                    self.print_expr(v);
                }
            }
            Stmt::Assignment { op, target, value, .. } => {
                self.print_expr(target);
                if !self.minified {
                    self.raw(" ");
                }
                self.token(assign_op_str(*op), false);
                if !self.minified {
                    self.raw(" ");
                }
                self.print_expr(value);
            }
            Stmt::IncDec { op, target, .. } => {
                self.print_expr(target);
                self.token(incdec_op_str(*op), false);
            }
            Stmt::ExprStmt { call, .. } => self.print_expr(call),
            Stmt::Break { .. } => self.token("break", true),
            Stmt::Continue { .. } => self.token("continue", true),
            Stmt::Discard { .. } => self.token("discard", true),
            Stmt::BreakIf { condition, .. } => {
                self.token("break", true);
                self.token("if", true);
                if !self.minified {
                    self.raw(" ");
                }
                self.print_expr(condition);
            }
            Stmt::Decl { decl, .. } => self.print_decl_content(decl),
            _ => unreachable!("not a simple statement"),
        }
    }

    fn print_if(&mut self, stmt: &Stmt) {
        let Stmt::If { condition, then_branch, else_branch, .. } = stmt else { unreachable!() };
        self.token("if", true);
        if !self.minified {
            self.raw(" ");
        }
        self.print_expr(condition);
        if !self.minified {
            self.raw(" ");
        }
        self.print_stmt(then_branch);
        if let Some(e) = else_branch {
            if !self.minified {
                self.raw(" ");
            }
            // Two words in a row always force a space via the needs-space
            // flag, which is exactly how "else if" never fuses into
            // "elseif" in minified mode.
            self.token("else", true);
            if !self.minified {
                self.raw(" ");
            }
            self.print_stmt(e);
        }
    }

    fn print_switch(&mut self, stmt: &Stmt) {
        let Stmt::Switch { selector, cases, .. } = stmt else { unreachable!() };
        self.token("switch", true);
        if !self.minified {
            self.raw(" ");
        }
        self.print_expr(selector);
        if !self.minified {
            self.raw(" ");
        }
        self.token("{", false);
        self.indent += 1;
        for case in cases {
            self.newline_indent();
            if case.is_default {
                self.token("default", true);
            } else {
                self.token("case", true);
                if !self.minified {
                    self.raw(" ");
                }
                for (i, sel) in case.selectors.iter().enumerate() {
                    if i > 0 {
                        self.token(",", false);
                        if !self.minified {
                            self.raw(" ");
                        }
                    }
                    self.print_expr(sel);
                }
            }
            self.token(":", false);
            if !self.minified {
                self.raw(" ");
            }
            self.print_block(&case.body);
        }
        self.indent -= 1;
        self.newline_indent();
        self.token("}", false);
    }

    fn print_for(&mut self, stmt: &Stmt) {
        let Stmt::For { init, condition, update, body, .. } = stmt else { unreachable!() };
        self.token("for", true);
        if !self.minified {
            self.raw(" ");
        }
        self.token("(", false);
        if let Some(i) = init {
            self.print_simple_stmt_core(i);
        }
        self.token(";", false);
        if !self.minified {
            self.raw(" ");
        }
        if let Some(c) = condition {
            self.print_expr(c);
        }
        self.token(";", false);
        if !self.minified {
            self.raw(" ");
        }
        if let Some(u) = update {
            self.print_simple_stmt_core(u);
        }
        self.token(")", false);
        if !self.minified {
            self.raw(" ");
        }
        self.print_block(body);
    }

    fn print_while(&mut self, stmt: &Stmt) {
        let Stmt::While { condition, body, .. } = stmt else { unreachable!() };
        self.token("while", true);
        if !self.minified {
            self.raw(" ");
        }
        self.print_expr(condition);
        if !self.minified {
            self.raw(" ");
        }
        self.print_block(body);
    }

    fn print_loop(&mut self, stmt: &Stmt) {
        let Stmt::Loop { body, continuing, .. } = stmt else { unreachable!() };
        self.token("loop", true);
        if !self.minified {
            self.raw(" ");
        }
        self.print_block(body);
        if let Some(cont) = continuing {
            if !self.minified {
                self.raw(" ");
            }
            self.token("continuing", true);
            if !self.minified {
                self.raw(" ");
            }
            self.print_block(cont);
        }
    }

    fn print_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident { name, ref_, .. } => {
                if ref_.is_valid() {
                    self.emit_symbol_name(*ref_);
                } else {
                    self.token(name, true);
                }
            }
            Expr::Literal { kind, raw, .. } => {
                if self.options.minify_syntax && *kind == ExprLiteralKind::Float {
                    let tidied = minify_float_literal(raw);
                    self.token(&tidied, true);
                } else {
                    self.token(raw, true);
                }
            }
            Expr::Binary { op, lhs, rhs, .. } => {
                self.print_expr(lhs);
                if !self.minified {
                    self.raw(" ");
                }
                self.token(binary_op_str(*op), false);
                if !self.minified {
                    self.raw(" ");
                }
                self.print_expr(rhs);
            }
            Expr::Unary { op, operand, .. } => {
                self.token(unary_op_str(*op), false);
                self.print_expr(operand);
            }
            Expr::Call { callee, args, .. } => {
                match callee {
                    Callee::Function { name, ref_ } => {
                        if ref_.is_valid() {
                            self.emit_symbol_name(*ref_);
                        } else {
                            self.token(name, true);
                        }
                    }
                    Callee::Constructor { type_ } => self.print_type(type_),
                }
                self.token("(", false);
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        self.token(",", false);
                        if !self.minified {
                            self.raw(" ");
                        }
                    }
                    self.print_expr(a);
                }
                self.token(")", false);
            }
            Expr::Index { base, index, .. } => {
                self.print_expr(base);
                self.token("[", false);
                self.print_expr(index);
                self.token("]", false);
            }
            Expr::Member { base, name, .. } => {
                self.print_expr(base);
                self.token(".", false);
                self.token(name, true);
            }
            Expr::Paren { inner, .. } => {
                self.token("(", false);
                self.print_expr(inner);
                self.token(")", false);
            }
        }
    }

    fn print_type(&mut self, ty: &Type) {
        match ty {
            Type::Scalar { kind, .. } => self.token(scalar_kind_name(*kind), true),
            Type::Vector { size, element, shorthand, .. } => {
                if let Some(sh) = shorthand {
                    self.token(sh, true);
                } else {
                    self.token(&format!("vec{size}"), true);
                    self.token("<", false);
                    self.print_type(element);
                    self.token(">", false);
                }
            }
            Type::Matrix { cols, rows, element, shorthand, .. } => {
                if let Some(sh) = shorthand {
                    self.token(sh, true);
                } else {
                    self.token(&format!("mat{cols}x{rows}"), true);
                    self.token("<", false);
                    self.print_type(element);
                    self.token(">", false);
                }
            }
            Type::Array { element, size, .. } => {
                self.token("array", true);
                self.token("<", false);
                self.print_type(element);
                if let Some(size_expr) = size {
                    self.token(",", false);
                    if !self.minified {
                        self.raw(" ");
                    }
                    self.print_expr(size_expr);
                }
                self.token(">", false);
            }
            Type::Pointer { address_space, element, access_mode, .. } => {
                self.token("ptr", true);
                self.token("<", false);
                self.token(address_space_name(*address_space), true);
                self.token(",", false);
                if !self.minified {
                    self.raw(" ");
                }
                self.print_type(element);
                if let Some(am) = access_mode {
                    self.token(",", false);
                    if !self.minified {
                        self.raw(" ");
                    }
                    self.token(access_mode_name(*am), true);
                }
                self.token(">", false);
            }
            Type::Atomic { element, .. } => {
                self.token("atomic", true);
                self.token("<", false);
                self.print_type(element);
                self.token(">", false);
            }
            Type::Sampler { comparison, .. } => {
                self.token(if *comparison { "sampler_comparison" } else { "sampler" }, true);
            }
            Type::Texture { kind, dimension, sampled_type, texel_format, access_mode, .. } => {
                self.token(&texture_type_name(*kind, dimension), true);
                if let Some(st) = sampled_type {
                    self.token("<", false);
                    self.print_type(st);
                    self.token(">", false);
                } else if *kind == TextureKind::Storage {
                    self.token("<", false);
                    if let Some(fmt) = texel_format {
                        self.token(fmt, true);
                    }
                    if let Some(am) = access_mode {
                        self.token(",", false);
                        if !self.minified {
                            self.raw(" ");
                        }
                        self.token(access_mode_name(*am), true);
                    }
                    self.token(">", false);
                }
            }
            Type::Ident { name, ref_, .. } => {
                if ref_.is_valid() {
                    self.emit_symbol_name(*ref_);
                } else {
                    self.token(name, true);
                }
            }
        }
    }
}

fn decl_has_terminator(decl: &Decl) -> bool {
    matches!(
        decl,
        Decl::Const { .. } | Decl::Override { .. } | Decl::Var { .. } | Decl::Let { .. } | Decl::Alias { .. } | Decl::ConstAssert { .. }
    )
}

fn scalar_kind_name(kind: ScalarKind) -> &'static str {
    match kind {
        ScalarKind::Bool => "bool",
        ScalarKind::I32 => "i32",
        ScalarKind::U32 => "u32",
        ScalarKind::F32 => "f32",
        ScalarKind::F16 => "f16",
    }
}

fn address_space_name(a: AddressSpace) -> &'static str {
    match a {
        AddressSpace::Function => "function",
        AddressSpace::Private => "private",
        AddressSpace::Workgroup => "workgroup",
        AddressSpace::Uniform => "uniform",
        AddressSpace::Storage => "storage",
        AddressSpace::Handle => "handle",
    }
}

fn access_mode_name(a: AccessMode) -> &'static str {
    match a {
        AccessMode::Read => "read",
        AccessMode::Write => "write",
        AccessMode::ReadWrite => "read_write",
    }
}

/// Inverts the lexer/parser's texture-name-to-`(kind, dimension)` table
/// (`wgsl_parser::parser::types::texture_kind`, not exported) so the
/// printer can reconstruct the original builtin spelling.
fn texture_type_name(kind: TextureKind, dimension: &str) -> String {
    match kind {
        TextureKind::Sampled => format!("texture_{dimension}"),
        TextureKind::Multisampled => format!("texture_multisampled_{dimension}"),
        TextureKind::Depth => format!("texture_depth_{dimension}"),
        TextureKind::DepthMultisampled => format!("texture_depth_multisampled_{dimension}"),
        TextureKind::Storage => format!("texture_storage_{dimension}"),
        TextureKind::External => "texture_external".to_string(),
    }
}

fn binary_op_str(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::Mod => "%",
        BinaryOp::And => "&",
        BinaryOp::Or => "|",
        BinaryOp::Xor => "^",
        BinaryOp::ShiftLeft => "<<",
        BinaryOp::ShiftRight => ">>",
        BinaryOp::LogicalAnd => "&&",
        BinaryOp::LogicalOr => "||",
        BinaryOp::Eq => "==",
        BinaryOp::NotEq => "!=",
        BinaryOp::Lt => "<",
        BinaryOp::Gt => ">",
        BinaryOp::LtEq => "<=",
        BinaryOp::GtEq => ">=",
    }
}

fn unary_op_str(op: UnaryOp) -> &'static str {
    match op {
        UnaryOp::Neg => "-",
        UnaryOp::Not => "!",
        UnaryOp::BitNot => "~",
        UnaryOp::AddressOf => "&",
        UnaryOp::Deref => "*",
    }
}

fn assign_op_str(op: AssignOp) -> &'static str {
    match op {
        AssignOp::Assign => "=",
        AssignOp::Add => "+=",
        AssignOp::Sub => "-=",
        AssignOp::Mul => "*=",
        AssignOp::Div => "/=",
        AssignOp::Mod => "%=",
        AssignOp::And => "&=",
        AssignOp::Or => "|=",
        AssignOp::Xor => "^=",
        AssignOp::ShiftLeft => "<<=",
        AssignOp::ShiftRight => ">>=",
    }
}

fn incdec_op_str(op: IncDecOp) -> &'static str {
    match op {
        IncDecOp::Increment => "++",
        IncDecOp::Decrement => "--",
    }
}

/// `minify_syntax`'s literal tidying: `1.0` -> `1.`, `0.5` -> `.5`. Applies
/// only to the numeric body, preserving an `f`/`h` suffix. Deliberately
/// conservative — it never chains the two trims into a degenerate result
/// like turning `0.0` into a bare `.`.
fn minify_float_literal(raw: &str) -> String {
    let (body, suffix) = if let Some(b) = raw.strip_suffix('f') {
        (b, "f")
    } else if let Some(b) = raw.strip_suffix('h') {
        (b, "h")
    } else {
        (raw, "")
    };

    let mut s = body.to_string();
    if s.ends_with(".0") && s.len() > 2 {
        s.truncate(s.len() - 1);
    }
    if s.starts_with("0.") && s.len() > 2 {
        s.remove(0);
    }
    format!("{s}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rename::{build_minifying_renamer, NoopRenamer};
    use wgsl_analyze::{analyze_purity, mark_live};
    use wgsl_parser::parse;
    use wgsl_resolve::resolve;

    fn printed(src: &str, options: &MinifyOptions) -> String {
        let mut out = parse(src);
        assert!(out.errors.is_empty(), "{:?}", out.errors);
        resolve(&mut out.module, src, options);
        analyze_purity(&mut out.module);
        mark_live(&mut out.module, options);
        if options.minify_identifiers {
            let renamer = build_minifying_renamer(&mut out.module, options);
            print(&out.module, &renamer, src, options).code
        } else {
            print(&out.module, &NoopRenamer, src, options).code
        }
    }

    #[test]
    fn noop_renamer_pretty_print_round_trips_identifiers() {
        let code = printed("fn helper() -> f32 { return 1.0; }", &MinifyOptions::identity());
        assert!(code.contains("fn helper"));
        assert!(code.contains("return 1.0"));
    }

    #[test]
    fn minified_binary_expression_has_no_surrounding_spaces() {
        // x and y are each used once (inside z's initializer) and declared
        // before z, so the renamer assigns them "a" and "b" in declaration
        // order; z itself is never used anywhere and keeps its original
        // spelling.
        let code = printed("const x = 1; const y = 2; const z = x + y;", &MinifyOptions::default());
        assert!(code.contains("a+b"), "{code}");
    }

    #[test]
    fn minified_preserves_external_binding_spelling_verbatim() {
        let src = "@group(0) @binding(0) var<uniform> u: f32; fn getValue() -> f32 { return u * 2.0; }";
        let code = printed(src, &MinifyOptions::default());
        assert!(code.contains("var<uniform>u"), "{code}");
        assert!(!code.contains("let "));
    }

    #[test]
    fn else_if_chain_has_single_space_never_fused() {
        let src = "fn pick(n: i32) -> i32 { \
                       if n == 0 { return 0; } else if n == 1 { return 1; } else { return 2; } \
                   }";
        let code = printed(src, &MinifyOptions::default());
        assert!(code.contains("else if"));
        assert!(!code.contains("elseif"));
    }

    #[test]
    fn preserve_uniform_struct_types_keeps_struct_name_literal() {
        let src = "struct MyUniforms { time: f32 } @group(0) @binding(0) var<uniform> u: MyUniforms;";
        let mut options = MinifyOptions::default();
        options.preserve_uniform_struct_types = true;
        let code = printed(src, &options);
        assert!(code.contains("MyUniforms"), "{code}");
    }

    #[test]
    fn tree_shaking_drops_unused_helper_but_keeps_entry_point() {
        let src = "fn unused() -> f32 { return 1.0; } \
                   fn used() -> f32 { return 2.0; } \
                   @fragment fn main() -> @location(0) vec4f { return vec4f(used(), 0.0, 0.0, 1.0); }";
        let code = printed(src, &MinifyOptions::default());
        assert!(!code.contains("unused"), "{code}");

        let mut no_shake = MinifyOptions::default();
        no_shake.tree_shaking = false;
        let code_kept = printed(src, &no_shake);
        // `unused` is never called, so even with tree-shaking off it has a
        // use count of zero and is never assigned a short name — it keeps
        // its original spelling, making its survival easy to assert on.
        assert!(code_kept.contains("unused"), "{code_kept}");
    }

    #[test]
    fn minify_syntax_tidies_float_literals() {
        assert_eq!(minify_float_literal("1.0"), "1.");
        assert_eq!(minify_float_literal("0.5"), ".5");
        assert_eq!(minify_float_literal("0.5f"), ".5f");
        assert_eq!(minify_float_literal("10.0"), "10.");
        assert_eq!(minify_float_literal("0.0"), "0.");
    }

    #[test]
    fn minify_syntax_option_shortens_emitted_literal() {
        let mut options = MinifyOptions::default();
        options.minify_syntax = true;
        options.minify_whitespace = false;
        options.minify_identifiers = false;
        let code = printed("const x = 1.0;", &options);
        assert!(code.contains("1."), "{code}");
        assert!(!code.contains("1.0"), "{code}");
    }

    #[test]
    fn pretty_mode_indents_with_four_spaces() {
        let code = printed("fn helper() -> f32 { return 1.0; }", &MinifyOptions::identity());
        assert!(code.contains("\n    return"), "{code}");
    }
}
