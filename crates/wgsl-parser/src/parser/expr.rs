//! Expression parsing: a standard precedence ladder from `||` down to unary,
//! plus the call-vs-type-constructor disambiguation in `§4.2`.

use wgsl_common::Span;
use wgsl_lexer::TokenKind;

use crate::ast::{BinaryOp, Callee, Expr, LiteralKind, Purity, ScalarKind, Type, UnaryOp};
use crate::parser::template::find_matching_angle;
use crate::parser::types::{matrix_dims_from_shorthand, scalar_suffix_kind, vector_size_from_shorthand};
use crate::parser::Parser;
use crate::reference::Ref;
use wgsl_lexer::LiteralKind as TokLiteralKind;

impl<'a> Parser<'a> {
    pub(crate) fn parse_expr(&mut self) -> Expr {
        self.parse_logic_or()
    }

    fn parse_logic_or(&mut self) -> Expr {
        let mut lhs = self.parse_logic_and();
        while self.eat(TokenKind::PipePipe) {
            let rhs = self.parse_logic_and();
            lhs = self.make_binary(BinaryOp::LogicalOr, lhs, rhs);
        }
        lhs
    }

    fn parse_logic_and(&mut self) -> Expr {
        let mut lhs = self.parse_bit_or();
        while self.eat(TokenKind::AmpAmp) {
            let rhs = self.parse_bit_or();
            lhs = self.make_binary(BinaryOp::LogicalAnd, lhs, rhs);
        }
        lhs
    }

    fn parse_bit_or(&mut self) -> Expr {
        let mut lhs = self.parse_bit_xor();
        while self.at(TokenKind::Pipe) {
            self.bump();
            let rhs = self.parse_bit_xor();
            lhs = self.make_binary(BinaryOp::Or, lhs, rhs);
        }
        lhs
    }

    fn parse_bit_xor(&mut self) -> Expr {
        let mut lhs = self.parse_bit_and();
        while self.eat(TokenKind::Caret) {
            let rhs = self.parse_bit_and();
            lhs = self.make_binary(BinaryOp::Xor, lhs, rhs);
        }
        lhs
    }

    fn parse_bit_and(&mut self) -> Expr {
        let mut lhs = self.parse_equality();
        while self.at(TokenKind::Amp) {
            self.bump();
            let rhs = self.parse_equality();
            lhs = self.make_binary(BinaryOp::And, lhs, rhs);
        }
        lhs
    }

    fn parse_equality(&mut self) -> Expr {
        let mut lhs = self.parse_relational();
        loop {
            let op = if self.eat(TokenKind::EqEq) {
                BinaryOp::Eq
            } else if self.eat(TokenKind::BangEq) {
                BinaryOp::NotEq
            } else {
                break;
            };
            let rhs = self.parse_relational();
            lhs = self.make_binary(op, lhs, rhs);
        }
        lhs
    }

    fn parse_relational(&mut self) -> Expr {
        let mut lhs = self.parse_shift();
        loop {
            let op = if self.eat(TokenKind::Lt) {
                BinaryOp::Lt
            } else if self.eat(TokenKind::Gt) {
                BinaryOp::Gt
            } else if self.eat(TokenKind::LtEq) {
                BinaryOp::LtEq
            } else if self.eat(TokenKind::GtEq) {
                BinaryOp::GtEq
            } else {
                break;
            };
            let rhs = self.parse_shift();
            lhs = self.make_binary(op, lhs, rhs);
        }
        lhs
    }

    fn parse_shift(&mut self) -> Expr {
        let mut lhs = self.parse_additive();
        loop {
            let op = if self.eat(TokenKind::ShiftLeft) {
                BinaryOp::ShiftLeft
            } else if self.eat(TokenKind::ShiftRight) {
                BinaryOp::ShiftRight
            } else {
                break;
            };
            let rhs = self.parse_additive();
            lhs = self.make_binary(op, lhs, rhs);
        }
        lhs
    }

    fn parse_additive(&mut self) -> Expr {
        let mut lhs = self.parse_multiplicative();
        loop {
            let op = if self.eat(TokenKind::Plus) {
                BinaryOp::Add
            } else if self.eat(TokenKind::Minus) {
                BinaryOp::Sub
            } else {
                break;
            };
            let rhs = self.parse_multiplicative();
            lhs = self.make_binary(op, lhs, rhs);
        }
        lhs
    }

    fn parse_multiplicative(&mut self) -> Expr {
        let mut lhs = self.parse_unary();
        loop {
            let op = if self.eat(TokenKind::Star) {
                BinaryOp::Mul
            } else if self.eat(TokenKind::Slash) {
                BinaryOp::Div
            } else if self.eat(TokenKind::Percent) {
                BinaryOp::Mod
            } else {
                break;
            };
            let rhs = self.parse_unary();
            lhs = self.make_binary(op, lhs, rhs);
        }
        lhs
    }

    fn make_binary(&self, op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
        let span = lhs.span().merge(rhs.span());
        let purity = if lhs.is_pure() && rhs.is_pure() {
            Purity::CAN_BE_REMOVED_IF_UNUSED
        } else {
            Purity::empty()
        };
        Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs), purity, span }
    }

    fn parse_unary(&mut self) -> Expr {
        let start = self.current_span().start;
        let op = match self.current_kind() {
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Tilde => Some(UnaryOp::BitNot),
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Amp => Some(UnaryOp::AddressOf),
            TokenKind::Star => Some(UnaryOp::Deref),
            _ => None,
        };
        let Some(op) = op else {
            return self.parse_postfix();
        };
        self.bump();
        let operand = self.parse_unary();
        let purity = if operand.is_pure() { Purity::CAN_BE_REMOVED_IF_UNUSED } else { Purity::empty() };
        Expr::Unary { op, operand: Box::new(operand), purity, span: Span::new(start, self.prev_end()) }
    }

    fn parse_postfix(&mut self) -> Expr {
        let mut expr = self.parse_primary();
        let start = expr.span().start;
        loop {
            if self.eat(TokenKind::Dot) {
                let Some((name, _)) = self.expect_ident("a member name") else { break };
                let purity = if expr.is_pure() { Purity::CAN_BE_REMOVED_IF_UNUSED } else { Purity::empty() };
                expr = Expr::Member { base: Box::new(expr), name, purity, span: Span::new(start, self.prev_end()) };
            } else if self.eat(TokenKind::LBracket) {
                let index = self.parse_expr();
                self.expect(TokenKind::RBracket, "']'");
                let purity = if expr.is_pure() && index.is_pure() {
                    Purity::CAN_BE_REMOVED_IF_UNUSED
                } else {
                    Purity::empty()
                };
                expr = Expr::Index { base: Box::new(expr), index: Box::new(index), purity, span: Span::new(start, self.prev_end()) };
            } else {
                break;
            }
        }
        expr
    }

    fn parse_primary(&mut self) -> Expr {
        let start = self.current_span();
        match self.current_kind() {
            TokenKind::Literal(tok_kind) => {
                let tok = self.bump();
                let raw = tok.text(self.source).to_string();
                let kind = match tok_kind {
                    TokLiteralKind::Int => LiteralKind::Int,
                    TokLiteralKind::Float => LiteralKind::Float,
                    TokLiteralKind::Bool => LiteralKind::Bool,
                };
                Expr::Literal { kind, raw, span: tok.span }
            }
            TokenKind::LParen => {
                self.bump();
                let inner = self.parse_expr();
                self.expect(TokenKind::RParen, "')'");
                Expr::Paren { inner: Box::new(inner), span: Span::new(start.start, self.prev_end()) }
            }
            TokenKind::Ident => {
                let tok = self.bump();
                let name = tok.text(self.source).to_string();
                self.parse_ident_primary(name, tok.span)
            }
            _ => {
                self.error_here("expected an expression");
                Expr::Ident { name: String::new(), ref_: Ref::INVALID, purity: Purity::empty(), span: start }
            }
        }
    }

    /// Disambiguates a bare identifier from a function call and a
    /// type-constructor call (including the templated spelling, e.g.
    /// `vec2<f32>(1.0, 2.0)` or `bitcast<f32>(x)`), per the parser's
    /// call-vs-constructor contract.
    fn parse_ident_primary(&mut self, name: String, name_span: Span) -> Expr {
        if self.at(TokenKind::Lt) {
            if let Some(close_idx) = find_matching_angle(&self.tokens, self.idx) {
                if matches!(self.tokens.get(close_idx + 1).map(|t| t.kind), Some(TokenKind::LParen)) {
                    self.idx -= 1; // rewind onto the name token for parse_type
                    let type_ = self.parse_type();
                    self.expect(TokenKind::LParen, "'('");
                    let args = self.parse_arg_list();
                    self.expect(TokenKind::RParen, "')'");
                    let span = Span::new(name_span.start, self.prev_end());
                    return Expr::Call { callee: Callee::Constructor { type_: Box::new(type_) }, args, purity: Purity::empty(), span };
                }
            }
        }

        if self.eat(TokenKind::LParen) {
            let args = self.parse_arg_list();
            self.expect(TokenKind::RParen, "')'");
            let span = Span::new(name_span.start, self.prev_end());
            if let Some(type_) = shorthand_constructor_type(&name, name_span) {
                return Expr::Call { callee: Callee::Constructor { type_: Box::new(type_) }, args, purity: Purity::empty(), span };
            }
            // A call to a user-defined function (or a not-yet-resolved
            // struct constructor) is conservatively impure until the
            // resolver and purity analyzer have run.
            return Expr::Call {
                callee: Callee::Function { name, ref_: Ref::INVALID },
                args,
                purity: Purity::empty(),
                span,
            };
        }

        Expr::Ident { name, ref_: Ref::INVALID, purity: Purity::empty(), span: name_span }
    }

    fn parse_arg_list(&mut self) -> Vec<Expr> {
        let mut args = Vec::new();
        if self.at(TokenKind::RParen) {
            return args;
        }
        args.push(self.parse_expr());
        while self.eat(TokenKind::Comma) {
            if self.at(TokenKind::RParen) {
                break;
            }
            args.push(self.parse_expr());
        }
        args
    }
}

fn shorthand_constructor_type(name: &str, span: Span) -> Option<Type> {
    if let Some(kind) = match name {
        "bool" => Some(ScalarKind::Bool),
        "i32" => Some(ScalarKind::I32),
        "u32" => Some(ScalarKind::U32),
        "f32" => Some(ScalarKind::F32),
        "f16" => Some(ScalarKind::F16),
        _ => None,
    } {
        return Some(Type::Scalar { kind, span });
    }
    if let Some(size) = vector_size_from_shorthand(name) {
        let elem_kind = scalar_suffix_kind(name).unwrap_or(ScalarKind::F32);
        return Some(Type::Vector {
            size,
            element: Box::new(Type::Scalar { kind: elem_kind, span }),
            shorthand: Some(name.to_string()),
            span,
        });
    }
    if let Some((cols, rows)) = matrix_dims_from_shorthand(name) {
        let elem_kind = scalar_suffix_kind(name).unwrap_or(ScalarKind::F32);
        return Some(Type::Matrix {
            cols,
            rows,
            element: Box::new(Type::Scalar { kind: elem_kind, span }),
            shorthand: Some(name.to_string()),
            span,
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use crate::ast::{BinaryOp, Callee, Expr};
    use crate::parser::parse;

    fn expr_of_const(src: &str) -> Expr {
        let out = parse(src);
        assert!(out.errors.is_empty(), "{:?}", out.errors);
        match out.module.decls.into_iter().next().unwrap() {
            crate::ast::Decl::Const { value, .. } => value,
            other => panic!("expected const, got {other:?}"),
        }
    }

    #[test]
    fn binds_additive_looser_than_multiplicative() {
        let e = expr_of_const("const x = 1 + 2 * 3;");
        let Expr::Binary { op: BinaryOp::Add, rhs, .. } = e else { panic!("expected add at top") };
        assert!(matches!(*rhs, Expr::Binary { op: BinaryOp::Mul, .. }));
    }

    #[test]
    fn disambiguates_relational_less_than() {
        let e = expr_of_const("const x = a < b;");
        assert!(matches!(e, Expr::Binary { op: BinaryOp::Lt, .. }));
    }

    #[test]
    fn disambiguates_templated_constructor_call() {
        let e = expr_of_const("const x = vec2<f32>(1.0, 2.0);");
        assert!(matches!(e, Expr::Call { callee: Callee::Constructor { .. }, .. }));
    }

    #[test]
    fn shorthand_constructor_is_recognized_without_template() {
        let e = expr_of_const("const x = vec3f(1.0, 2.0, 3.0);");
        assert!(matches!(e, Expr::Call { callee: Callee::Constructor { .. }, .. }));
    }

    #[test]
    fn plain_call_to_user_function_is_conservatively_impure() {
        let e = expr_of_const("const x = helper(1.0);");
        let Expr::Call { callee: Callee::Function { name, .. }, purity, .. } = e else {
            panic!("expected function call")
        };
        assert_eq!(name, "helper");
        assert!(!purity.contains(crate::ast::Purity::CAN_BE_REMOVED_IF_UNUSED));
    }
}
