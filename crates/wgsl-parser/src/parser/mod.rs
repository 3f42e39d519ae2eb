//! Recursive-descent parser: token stream -> AST + symbol table + scope tree.

mod decl;
mod expr;
mod stmt;
mod template;
mod types;

use wgsl_common::position::{LineMap, Position};
use wgsl_common::{Diagnostic, Span};
use wgsl_lexer::{LexOutput, Lexer, Token, TokenKind};

use crate::ast::{Decl, Directive, Module};
use crate::scope::ScopeId;

pub struct ParseOutput {
    pub module: Module,
    pub errors: Vec<Diagnostic>,
}

/// Parses a complete WGSL source string, per the contract in the module-level
/// operation this crate implements: directives first, then declarations,
/// recording a diagnostic and resynchronizing on every recoverable error so
/// a single call surfaces every parse error in one pass.
#[must_use]
pub fn parse(source: &str) -> ParseOutput {
    let span = tracing::debug_span!("parse");
    let _enter = span.enter();
    let LexOutput { tokens, errors: lex_errors } = Lexer::new(source).tokenize();
    let mut parser = Parser::new(source, tokens);
    parser.errors.extend(lex_errors);
    parser.parse_module();
    tracing::debug!(
        decl_count = parser.module.decls.len(),
        error_count = parser.errors.len(),
        "parse complete"
    );
    ParseOutput { module: parser.module, errors: parser.errors }
}

pub(crate) struct Parser<'a> {
    pub(crate) source: &'a str,
    pub(crate) tokens: Vec<Token>,
    pub(crate) idx: usize,
    pub(crate) module: Module,
    pub(crate) scope_stack: Vec<ScopeId>,
    pub(crate) errors: Vec<Diagnostic>,
    line_map: LineMap,
    pub(crate) pending_close: u32,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str, tokens: Vec<Token>) -> Self {
        let root = ScopeId::ROOT;
        Parser {
            source,
            tokens,
            idx: 0,
            module: Module::new(),
            scope_stack: vec![root],
            errors: Vec::new(),
            line_map: LineMap::build(source),
            pending_close: 0,
        }
    }

    // -- token cursor helpers --------------------------------------------

    pub(crate) fn current(&self) -> &Token {
        &self.tokens[self.idx.min(self.tokens.len() - 1)]
    }

    pub(crate) fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    pub(crate) fn current_text(&self) -> &'a str {
        self.current().text(self.source)
    }

    pub(crate) fn current_span(&self) -> Span {
        self.current().span
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.current_kind() == TokenKind::Eof
    }

    pub(crate) fn save(&self) -> usize {
        self.idx
    }

    pub(crate) fn restore(&mut self, mark: usize) {
        self.idx = mark;
    }

    pub(crate) fn bump(&mut self) -> Token {
        let tok = *self.current();
        if !self.at_eof() {
            self.idx += 1;
        }
        tok
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// True when the current token is the contextual or reserved keyword
    /// spelled `word` (keywords and `true`/`false` lex as `Keyword`/`Literal`
    /// respectively; contextual names like `enable` lex as plain `Ident`).
    pub(crate) fn at_word(&self, word: &str) -> bool {
        matches!(self.current_kind(), TokenKind::Ident | TokenKind::Keyword) && self.current_text() == word
    }

    pub(crate) fn eat_word(&mut self, word: &str) -> bool {
        if self.at_word(word) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind, what: &str) -> Option<Token> {
        if self.at(kind) {
            Some(self.bump())
        } else {
            self.error_here(format!("expected {what}, found {:?}", self.current_kind()));
            None
        }
    }

    pub(crate) fn expect_ident(&mut self, what: &str) -> Option<(String, Span)> {
        if self.at(TokenKind::Ident) {
            let tok = self.bump();
            Some((tok.text(self.source).to_string(), tok.span))
        } else {
            self.error_here(format!("expected {what}"));
            None
        }
    }

    pub(crate) fn position_at(&self, offset: u32) -> Position {
        self.line_map.offset_to_position(offset, self.source)
    }

    pub(crate) fn error_here(&mut self, message: impl Into<String>) {
        let span = self.current_span();
        let pos = self.position_at(span.start);
        self.errors.push(Diagnostic::error(message, pos).with_span(span));
    }

    /// Recover from a syntax error by advancing to the next synchronization
    /// point: a semicolon at the current nesting, or the matching closing
    /// brace, whichever comes first. Stops scanning at EOF without
    /// consuming it, so callers can tell a fatal (no-progress) error apart
    /// from a recovered one.
    pub(crate) fn synchronize(&mut self) {
        let mut depth = 0i32;
        while !self.at_eof() {
            match self.current_kind() {
                TokenKind::Semicolon if depth == 0 => {
                    self.bump();
                    return;
                }
                TokenKind::LBrace => {
                    depth += 1;
                    self.bump();
                }
                TokenKind::RBrace => {
                    if depth == 0 {
                        self.bump();
                        return;
                    }
                    depth -= 1;
                    self.bump();
                }
                _ => {
                    self.bump();
                }
            }
        }
    }

    pub(crate) fn current_scope(&self) -> ScopeId {
        *self.scope_stack.last().expect("scope stack is never empty")
    }

    pub(crate) fn push_scope(&mut self) -> ScopeId {
        let parent = self.current_scope();
        let child = self.module.scopes.push_child(parent);
        self.scope_stack.push(child);
        child
    }

    pub(crate) fn push_scope_child_of(&mut self, parent: ScopeId) -> ScopeId {
        let child = self.module.scopes.push_child(parent);
        self.scope_stack.push(child);
        child
    }

    pub(crate) fn pop_scope(&mut self) {
        self.scope_stack.pop();
    }

    // -- module-level parsing --------------------------------------------

    fn parse_module(&mut self) {
        while !self.at_eof() && self.is_directive_start() {
            self.parse_directive();
        }
        while !self.at_eof() {
            let before = self.idx;
            self.parse_global_decl();
            if self.idx == before {
                // No progress was made; avoid looping forever on a token
                // neither a directive nor a declaration start can consume.
                self.error_here("expected a declaration");
                self.bump();
            }
        }
    }

    fn is_directive_start(&self) -> bool {
        self.at_word("enable") || self.at_word("requires") || self.at_word("diagnostic")
    }

    fn parse_directive(&mut self) {
        let start = self.current_span().start;
        if self.eat_word("enable") {
            let names = self.parse_name_list();
            self.expect(TokenKind::Semicolon, "';'");
            let end = self.tokens[self.idx.saturating_sub(1)].span.end;
            self.module.directives.push(Directive::Enable { names, span: Span::new(start, end) });
        } else if self.eat_word("requires") {
            let names = self.parse_name_list();
            self.expect(TokenKind::Semicolon, "';'");
            let end = self.tokens[self.idx.saturating_sub(1)].span.end;
            self.module.directives.push(Directive::Requires { names, span: Span::new(start, end) });
        } else if self.eat_word("diagnostic") {
            self.expect(TokenKind::LParen, "'('");
            let severity = self.expect_ident("a severity control name").map(|(n, _)| n).unwrap_or_default();
            self.expect(TokenKind::Comma, "','");
            let mut rule = self.expect_ident("a diagnostic rule name").map(|(n, _)| n).unwrap_or_default();
            if self.eat(TokenKind::Dot) {
                if let Some((suffix, _)) = self.expect_ident("a diagnostic rule suffix") {
                    rule.push('.');
                    rule.push_str(&suffix);
                }
            }
            self.expect(TokenKind::RParen, "')'");
            self.expect(TokenKind::Semicolon, "';'");
            let end = self.tokens[self.idx.saturating_sub(1)].span.end;
            self.module.directives.push(Directive::Diagnostic { severity, rule, span: Span::new(start, end) });
        } else {
            self.error_here("expected a directive");
            self.synchronize();
        }
    }

    fn parse_name_list(&mut self) -> Vec<String> {
        let mut names = Vec::new();
        if let Some((name, _)) = self.expect_ident("an identifier") {
            names.push(name);
        }
        while self.eat(TokenKind::Comma) {
            if let Some((name, _)) = self.expect_ident("an identifier") {
                names.push(name);
            }
        }
        names
    }

    fn parse_global_decl(&mut self) {
        if self.is_directive_start() {
            self.error_here("directives must precede all declarations");
            self.parse_directive();
            return;
        }
        if self.eat(TokenKind::Semicolon) {
            // Empty top-level semicolons are accepted and ignored.
            return;
        }
        let attrs = self.parse_attributes();
        // Every decl kind except function and struct (whose bodies are
        // brace-delimited) is terminated by a semicolon.
        let needs_semicolon = !self.at_word("fn") && !self.at_word("struct");
        let decl = match self.current_text() {
            _ if self.at_word("const") => self.parse_const(),
            _ if self.at_word("override") => self.parse_override(attrs),
            _ if self.at_word("var") => self.parse_var(attrs),
            _ if self.at_word("let") => self.parse_let(),
            _ if self.at_word("fn") => self.parse_function(attrs),
            _ if self.at_word("struct") => self.parse_struct(),
            _ if self.at_word("alias") => self.parse_alias(),
            _ if self.at_word("const_assert") => self.parse_const_assert(),
            _ => {
                self.error_here("expected a declaration (const, override, var, let, fn, struct, alias, const_assert)");
                None
            }
        };
        match decl {
            Some(d) => {
                if needs_semicolon {
                    self.expect(TokenKind::Semicolon, "';'");
                }
                self.module.decls.push(d);
            }
            None => self.synchronize(),
        }
    }

    pub(crate) fn parse_attributes(&mut self) -> Vec<crate::ast::Attribute> {
        let mut attrs = Vec::new();
        while self.at(TokenKind::At) {
            let start = self.current_span().start;
            self.bump();
            let Some((name, _)) = self.expect_ident("an attribute name") else {
                break;
            };
            let mut args = Vec::new();
            if self.eat(TokenKind::LParen) {
                if !self.at(TokenKind::RParen) {
                    args.push(self.parse_expr());
                    while self.eat(TokenKind::Comma) {
                        if self.at(TokenKind::RParen) {
                            break;
                        }
                        args.push(self.parse_expr());
                    }
                }
                self.expect(TokenKind::RParen, "')'");
            }
            let end = self.tokens[self.idx.saturating_sub(1)].span.end;
            attrs.push(crate::ast::Attribute { name, args, span: Span::new(start, end) });
        }
        attrs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_must_precede_declarations() {
        let out = parse("const x = 1; enable f16;");
        assert!(!out.errors.is_empty());
    }

    #[test]
    fn parses_enable_directive() {
        let out = parse("enable f16;\nconst x = 1;");
        assert_eq!(out.module.directives.len(), 1);
        assert_eq!(out.module.decls.len(), 1);
        assert!(out.errors.is_empty());
    }

    #[test]
    fn recovers_after_a_syntax_error_and_keeps_parsing() {
        let out = parse("const x = ; const y = 2;");
        assert!(!out.errors.is_empty());
        assert!(out.module.decls.iter().any(|d| d.name() == Some("y")));
    }
}
