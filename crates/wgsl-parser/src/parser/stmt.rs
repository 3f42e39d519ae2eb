//! Statement parsing.

use wgsl_common::Span;
use wgsl_lexer::TokenKind;

use crate::ast::{AssignOp, Decl, IncDecOp, Stmt, SwitchCase};
use crate::parser::Parser;

impl<'a> Parser<'a> {
    pub(crate) fn parse_compound(&mut self) -> (Vec<Stmt>, crate::scope::ScopeId) {
        let scope = self.push_scope();
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
        self.pop_scope();
        (body, scope)
    }

    pub(crate) fn parse_stmt(&mut self) -> Stmt {
        let start = self.current_span().start;
        if self.at(TokenKind::LBrace) {
            let (body, scope) = self.parse_compound();
            return Stmt::Compound { body, scope, span: Span::new(start, self.prev_end()) };
        }
        if self.at_word("return") {
            self.bump();
            let value = if self.at(TokenKind::Semicolon) { None } else { Some(self.parse_expr()) };
            self.expect(TokenKind::Semicolon, "';'");
            return Stmt::Return { value, span: Span::new(start, self.prev_end()) };
        }
        if self.at_word("if") {
            return self.parse_if();
        }
        if self.at_word("switch") {
            return self.parse_switch();
        }
        if self.at_word("for") {
            return self.parse_for();
        }
        if self.at_word("while") {
            return self.parse_while();
        }
        if self.at_word("loop") {
            return self.parse_loop();
        }
        if self.eat_word("break") {
            if self.eat_word("if") {
                let condition = self.parse_expr();
                self.expect(TokenKind::Semicolon, "';'");
                return Stmt::BreakIf { condition, span: Span::new(start, self.prev_end()) };
            }
            self.expect(TokenKind::Semicolon, "';'");
            return Stmt::Break { span: Span::new(start, self.prev_end()) };
        }
        if self.eat_word("continue") {
            self.expect(TokenKind::Semicolon, "';'");
            return Stmt::Continue { span: Span::new(start, self.prev_end()) };
        }
        if self.eat_word("discard") {
            self.expect(TokenKind::Semicolon, "';'");
            return Stmt::Discard { span: Span::new(start, self.prev_end()) };
        }
        if self.at_word("const") || self.at_word("let") || self.at_word("var") {
            let decl = self.parse_local_decl();
            self.expect(TokenKind::Semicolon, "';'");
            return Stmt::Decl { decl: Box::new(decl), span: Span::new(start, self.prev_end()) };
        }
        self.parse_expr_or_assignment_stmt(start)
    }

    fn parse_local_decl(&mut self) -> Decl {
        if self.at_word("const") {
            self.parse_const().unwrap_or_else(|| self.dummy_const())
        } else if self.at_word("let") {
            self.parse_let().unwrap_or_else(|| self.dummy_const())
        } else {
            self.parse_var(Vec::new()).unwrap_or_else(|| self.dummy_const())
        }
    }

    fn dummy_const(&mut self) -> Decl {
        let span = self.current_span();
        Decl::Const {
            name: String::new(),
            symbol: crate::reference::Ref::INVALID,
            type_: None,
            value: crate::ast::Expr::Literal { kind: crate::ast::ExprLiteralKind::Int, raw: "0".into(), span },
            span,
        }
    }

    fn parse_if(&mut self) -> Stmt {
        let start = self.current_span().start;
        self.bump(); // if
        let condition = self.parse_expr();
        let (then_body, then_scope) = self.parse_compound();
        let then_branch = Box::new(Stmt::Compound {
            body: then_body,
            scope: then_scope,
            span: Span::new(start, self.prev_end()),
        });
        let else_branch = if self.eat_word("else") {
            if self.at_word("if") {
                Some(Box::new(self.parse_if()))
            } else {
                let (body, scope) = self.parse_compound();
                Some(Box::new(Stmt::Compound { body, scope, span: Span::new(start, self.prev_end()) }))
            }
        } else {
            None
        };
        Stmt::If { condition, then_branch, else_branch, span: Span::new(start, self.prev_end()) }
    }

    fn parse_switch(&mut self) -> Stmt {
        let start = self.current_span().start;
        self.bump(); // switch
        let selector = self.parse_expr();
        self.expect(TokenKind::LBrace, "'{'");
        let mut cases = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.at_eof() {
            cases.push(self.parse_switch_case());
        }
        self.expect(TokenKind::RBrace, "'}'");
        Stmt::Switch { selector, cases, span: Span::new(start, self.prev_end()) }
    }

    fn parse_switch_case(&mut self) -> SwitchCase {
        let start = self.current_span().start;
        let mut selectors = Vec::new();
        let is_default = if self.eat_word("default") {
            true
        } else {
            self.eat_word("case");
            selectors.push(self.parse_expr());
            while self.eat(TokenKind::Comma) {
                if self.at_word("default") {
                    self.bump();
                } else {
                    selectors.push(self.parse_expr());
                }
            }
            false
        };
        self.eat(TokenKind::Colon);
        let (body, scope) = self.parse_compound();
        SwitchCase { selectors, is_default, body, scope, span: Span::new(start, self.prev_end()) }
    }

    fn parse_for(&mut self) -> Stmt {
        let start = self.current_span().start;
        self.bump(); // for
        let scope = self.push_scope();
        self.expect(TokenKind::LParen, "'('");
        let init = if self.at(TokenKind::Semicolon) {
            None
        } else {
            Some(Box::new(self.parse_for_clause_stmt()))
        };
        self.expect(TokenKind::Semicolon, "';'");
        let condition = if self.at(TokenKind::Semicolon) { None } else { Some(self.parse_expr()) };
        self.expect(TokenKind::Semicolon, "';'");
        let update = if self.at(TokenKind::RParen) {
            None
        } else {
            Some(Box::new(self.parse_for_clause_stmt()))
        };
        self.expect(TokenKind::RParen, "')'");
        let (body, body_scope) = self.parse_compound();
        self.pop_scope();
        Stmt::For { scope, init, condition, update, body, body_scope, span: Span::new(start, self.prev_end()) }
    }

    /// A for-loop init/update clause: a local decl or an assignment/call
    /// statement, without the trailing semicolon that `parse_stmt` would
    /// otherwise consume.
    fn parse_for_clause_stmt(&mut self) -> Stmt {
        let start = self.current_span().start;
        if self.at_word("const") || self.at_word("let") || self.at_word("var") {
            let decl = self.parse_local_decl();
            return Stmt::Decl { decl: Box::new(decl), span: Span::new(start, self.prev_end()) };
        }
        self.parse_assignment_or_call(start)
    }

    fn parse_while(&mut self) -> Stmt {
        let start = self.current_span().start;
        self.bump(); // while
        let condition = self.parse_expr();
        let (body, scope) = self.parse_compound();
        Stmt::While { condition, body, scope, span: Span::new(start, self.prev_end()) }
    }

    fn parse_loop(&mut self) -> Stmt {
        let start = self.current_span().start;
        self.bump(); // loop
        let body_scope = self.push_scope();
        self.expect(TokenKind::LBrace, "'{'");
        let mut body = Vec::new();
        let mut continuing = None;
        let mut continuing_scope = None;
        while !self.at(TokenKind::RBrace) && !self.at_eof() {
            if self.at_word("continuing") {
                self.bump();
                let cont_scope = self.push_scope_child_of(body_scope);
                self.expect(TokenKind::LBrace, "'{'");
                let mut stmts = Vec::new();
                while !self.at(TokenKind::RBrace) && !self.at_eof() {
                    stmts.push(self.parse_stmt());
                }
                self.expect(TokenKind::RBrace, "'}'");
                self.pop_scope();
                continuing = Some(stmts);
                continuing_scope = Some(cont_scope);
                break;
            }
            body.push(self.parse_stmt());
        }
        self.expect(TokenKind::RBrace, "'}'");
        self.pop_scope();
        Stmt::Loop { body, body_scope, continuing, continuing_scope, span: Span::new(start, self.prev_end()) }
    }

    fn parse_expr_or_assignment_stmt(&mut self, start: u32) -> Stmt {
        let stmt = self.parse_assignment_or_call(start);
        self.expect(TokenKind::Semicolon, "';'");
        stmt
    }

    fn parse_assignment_or_call(&mut self, start: u32) -> Stmt {
        let target = self.parse_expr();
        let op = match self.current_kind() {
            TokenKind::Eq => Some(AssignOp::Assign),
            TokenKind::PlusEq => Some(AssignOp::Add),
            TokenKind::MinusEq => Some(AssignOp::Sub),
            TokenKind::StarEq => Some(AssignOp::Mul),
            TokenKind::SlashEq => Some(AssignOp::Div),
            TokenKind::PercentEq => Some(AssignOp::Mod),
            TokenKind::AmpEq => Some(AssignOp::And),
            TokenKind::PipeEq => Some(AssignOp::Or),
            TokenKind::CaretEq => Some(AssignOp::Xor),
            TokenKind::ShiftLeftEq => Some(AssignOp::ShiftLeft),
            TokenKind::ShiftRightEq => Some(AssignOp::ShiftRight),
            _ => None,
        };
        if let Some(op) = op {
            self.bump();
            let value = self.parse_expr();
            return Stmt::Assignment { op, target, value, span: Span::new(start, self.prev_end()) };
        }
        if self.at(TokenKind::PlusPlus) || self.at(TokenKind::MinusMinus) {
            let op = if self.at(TokenKind::PlusPlus) { IncDecOp::Increment } else { IncDecOp::Decrement };
            self.bump();
            return Stmt::IncDec { op, target, span: Span::new(start, self.prev_end()) };
        }
        Stmt::ExprStmt { call: target, span: Span::new(start, self.prev_end()) }
    }
}
