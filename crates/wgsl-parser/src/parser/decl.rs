//! Declaration parsing: symbols are created at their declaration point and
//! registered into the enclosing scope's name map, exactly as the parser's
//! contract specifies — there is no separate "declaration pass" crate-side;
//! `wgsl-resolve` only performs the use-pass walk over what this module
//! already built.

use wgsl_common::Span;
use wgsl_lexer::TokenKind;

use crate::ast::{Attribute, Decl, Param, Stmt, StructMember};
use crate::parser::Parser;
use crate::reference::Ref;
use crate::symbol::{Symbol, SymbolFlags, SymbolKind};

impl<'a> Parser<'a> {
    fn declare_symbol(&mut self, name: String, span: Span, kind: SymbolKind, flags: SymbolFlags) -> Ref {
        let mut symbol = Symbol::new(name.clone(), span, kind);
        symbol.flags = flags;
        let r = self.module.symbols.insert(symbol);
        let scope = self.current_scope();
        self.module.scopes.get_mut(scope).declare(name, r, span.start);
        r
    }

    fn attrs_has(attrs: &[Attribute], name: &str) -> bool {
        attrs.iter().any(|a| a.is(name))
    }

    pub(crate) fn parse_const(&mut self) -> Option<Decl> {
        let start = self.current_span().start;
        self.bump(); // const
        let (name, name_span) = self.expect_ident("a name")?;
        let type_ = if self.eat(TokenKind::Colon) { Some(self.parse_type()) } else { None };
        self.expect(TokenKind::Eq, "'='");
        let value = self.parse_expr();
        let symbol = self.declare_symbol(name.clone(), name_span, SymbolKind::Const, SymbolFlags::empty());
        Some(Decl::Const { name, symbol, type_, value, span: Span::new(start, self.prev_end()) })
    }

    pub(crate) fn parse_override(&mut self, attributes: Vec<Attribute>) -> Option<Decl> {
        let start = self.current_span().start;
        self.bump(); // override
        let (name, name_span) = self.expect_ident("a name")?;
        let type_ = if self.eat(TokenKind::Colon) { Some(self.parse_type()) } else { None };
        let value = if self.eat(TokenKind::Eq) { Some(self.parse_expr()) } else { None };
        // Overrides are never removable per the purity rules, so they are
        // always treated as a root the same way an external binding is.
        let symbol = self.declare_symbol(name.clone(), name_span, SymbolKind::Override, SymbolFlags::IS_API_FACING);
        Some(Decl::Override { name, symbol, attributes, type_, value, span: Span::new(start, self.prev_end()) })
    }

    pub(crate) fn parse_var(&mut self, attributes: Vec<Attribute>) -> Option<Decl> {
        let start = self.current_span().start;
        self.bump(); // var
        let mut address_space = None;
        let mut access_mode = None;
        if self.eat(TokenKind::Lt) {
            address_space = self.parse_address_space();
            if self.eat(TokenKind::Comma) {
                access_mode = self.parse_access_mode();
            }
            if !self.eat(TokenKind::Gt) {
                self.eat(TokenKind::ShiftRight);
            }
        }
        let (name, name_span) = self.expect_ident("a name")?;
        let type_ = if self.eat(TokenKind::Colon) { Some(self.parse_type()) } else { None };
        let value = if self.eat(TokenKind::Eq) { Some(self.parse_expr()) } else { None };

        let is_module_scope = self.scope_stack.len() == 1;
        let is_external = is_module_scope
            && matches!(address_space, Some(crate::ast::AddressSpace::Uniform) | Some(crate::ast::AddressSpace::Storage));
        let mut flags = SymbolFlags::empty();
        if is_external {
            // Whether this stays MUST_NOT_BE_RENAMED depends on the caller's
            // external-binding policy, which isn't known at parse time;
            // wgsl-resolve applies it once options are in hand.
            flags |= SymbolFlags::IS_EXTERNAL_BINDING;
        }
        let symbol = self.declare_symbol(name.clone(), name_span, SymbolKind::Var, flags);
        Some(Decl::Var { name, symbol, attributes, address_space, access_mode, type_, value, span: Span::new(start, self.prev_end()) })
    }

    pub(crate) fn parse_let(&mut self) -> Option<Decl> {
        let start = self.current_span().start;
        self.bump(); // let
        let (name, name_span) = self.expect_ident("a name")?;
        let type_ = if self.eat(TokenKind::Colon) { Some(self.parse_type()) } else { None };
        self.expect(TokenKind::Eq, "'='");
        let value = self.parse_expr();
        let symbol = self.declare_symbol(name.clone(), name_span, SymbolKind::Let, SymbolFlags::empty());
        Some(Decl::Let { name, symbol, type_, value, span: Span::new(start, self.prev_end()) })
    }

    pub(crate) fn parse_function(&mut self, attributes: Vec<Attribute>) -> Option<Decl> {
        let start = self.current_span().start;
        self.bump(); // fn
        let (name, name_span) = self.expect_ident("a function name")?;

        let is_entry_point = Self::attrs_has(&attributes, "vertex")
            || Self::attrs_has(&attributes, "fragment")
            || Self::attrs_has(&attributes, "compute");
        let mut flags = SymbolFlags::empty();
        if is_entry_point {
            flags |= SymbolFlags::IS_ENTRY_POINT | SymbolFlags::MUST_NOT_BE_RENAMED;
        }
        let symbol = self.declare_symbol(name.clone(), name_span, SymbolKind::Function, flags);

        let scope = self.push_scope();
        self.expect(TokenKind::LParen, "'('");
        let mut params = Vec::new();
        if !self.at(TokenKind::RParen) {
            params.push(self.parse_param());
            while self.eat(TokenKind::Comma) {
                if self.at(TokenKind::RParen) {
                    break;
                }
                params.push(self.parse_param());
            }
        }
        self.expect(TokenKind::RParen, "')'");

        let mut return_attributes = Vec::new();
        let mut return_type = None;
        if self.eat(TokenKind::Arrow) {
            return_attributes = self.parse_attributes();
            return_type = Some(self.parse_type());
        }

        let body = self.parse_function_body_in_current_scope();
        self.pop_scope();

        Some(Decl::Function {
            name,
            symbol,
            attributes,
            params,
            return_type,
            return_attributes,
            body,
            scope,
            span: Span::new(start, self.prev_end()),
        })
    }

    /// The function-body compound statement shares the parameter scope
    /// rather than nesting a fresh one, per the scope-tree rule that a
    /// function body's own braces do not introduce a second scope layer
    /// beyond the parameter scope.
    fn parse_function_body_in_current_scope(&mut self) -> Vec<Stmt> {
        self.expect(TokenKind::LBrace, "'{'");
        let mut body = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.at_eof() {
            let before = self.idx;
            body.push(self.parse_stmt());
            if self.idx == before {
                self.error_here("expected a statement");
                self.bump();
            }
        }
        self.expect(TokenKind::RBrace, "'}'");
        body
    }

    fn parse_param(&mut self) -> Param {
        let attributes = self.parse_attributes();
        let start = self.current_span().start;
        let (name, name_span) = self.expect_ident("a parameter name").unwrap_or_default();
        self.expect(TokenKind::Colon, "':'");
        let type_ = self.parse_type();
        let symbol = self.declare_symbol(name.clone(), name_span, SymbolKind::Parameter, SymbolFlags::empty());
        Param { name, symbol, type_, attributes, span: Span::new(start, self.prev_end()) }
    }

    pub(crate) fn parse_struct(&mut self) -> Option<Decl> {
        let start = self.current_span().start;
        self.bump(); // struct
        let (name, name_span) = self.expect_ident("a struct name")?;
        let symbol = self.declare_symbol(name.clone(), name_span, SymbolKind::Struct, SymbolFlags::empty());
        self.expect(TokenKind::LBrace, "'{'");
        let mut members = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.at_eof() {
            members.push(self.parse_struct_member());
            self.eat(TokenKind::Comma);
        }
        self.expect(TokenKind::RBrace, "'}'");
        Some(Decl::Struct { name, symbol, members, span: Span::new(start, self.prev_end()) })
    }

    fn parse_struct_member(&mut self) -> StructMember {
        let attributes = self.parse_attributes();
        let start = self.current_span().start;
        let (name, _) = self.expect_ident("a member name").unwrap_or_default();
        self.expect(TokenKind::Colon, "':'");
        let type_ = self.parse_type();
        StructMember { name, type_, attributes, span: Span::new(start, self.prev_end()) }
    }

    pub(crate) fn parse_alias(&mut self) -> Option<Decl> {
        let start = self.current_span().start;
        self.bump(); // alias
        let (name, name_span) = self.expect_ident("an alias name")?;
        self.expect(TokenKind::Eq, "'='");
        let type_ = self.parse_type();
        let symbol = self.declare_symbol(name.clone(), name_span, SymbolKind::Alias, SymbolFlags::empty());
        Some(Decl::Alias { name, symbol, type_, span: Span::new(start, self.prev_end()) })
    }

    pub(crate) fn parse_const_assert(&mut self) -> Option<Decl> {
        let start = self.current_span().start;
        self.bump(); // const_assert
        let condition = self.parse_expr();
        Some(Decl::ConstAssert { condition, span: Span::new(start, self.prev_end()) })
    }
}
