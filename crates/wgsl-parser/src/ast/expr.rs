//! Expression AST nodes.

use bitflags::bitflags;
use wgsl_common::Span;

use crate::ast::types::Type;
use crate::reference::Ref;

bitflags! {
    /// Purity facts the analyzer attaches to every expression node.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Purity: u8 {
        const CAN_BE_REMOVED_IF_UNUSED      = 1 << 0;
        const IS_CONSTANT                   = 1 << 1;
        const FROM_PURE_FUNCTION            = 1 << 2;
        const CALL_CAN_BE_UNWRAPPED_IF_UNUSED = 1 << 3;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Int,
    Float,
    Bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    And,
    Or,
    Xor,
    ShiftLeft,
    ShiftRight,
    LogicalAnd,
    LogicalOr,
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
    BitNot,
    AddressOf,
    Deref,
}

/// Either a plain function call or a type-constructor invocation, per the
/// parser's call-vs-constructor disambiguation rule.
#[derive(Debug, Clone)]
pub enum Callee {
    Function { name: String, ref_: Ref },
    Constructor { type_: Box<Type> },
}

#[derive(Debug, Clone)]
pub enum Expr {
    Ident {
        name: String,
        ref_: Ref,
        purity: Purity,
        span: Span,
    },
    Literal {
        kind: LiteralKind,
        raw: String,
        span: Span,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        purity: Purity,
        span: Span,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        purity: Purity,
        span: Span,
    },
    Call {
        callee: Callee,
        args: Vec<Expr>,
        purity: Purity,
        span: Span,
    },
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
        purity: Purity,
        span: Span,
    },
    Member {
        base: Box<Expr>,
        /// Post-dot identifiers are never resolved against scopes; they are
        /// stored as a literal field name.
        name: String,
        purity: Purity,
        span: Span,
    },
    Paren {
        inner: Box<Expr>,
        span: Span,
    },
}

impl Expr {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Expr::Ident { span, .. }
            | Expr::Literal { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Unary { span, .. }
            | Expr::Call { span, .. }
            | Expr::Index { span, .. }
            | Expr::Member { span, .. }
            | Expr::Paren { span, .. } => *span,
        }
    }

    #[must_use]
    pub fn purity(&self) -> Purity {
        match self {
            Expr::Ident { purity, .. }
            | Expr::Binary { purity, .. }
            | Expr::Unary { purity, .. }
            | Expr::Call { purity, .. }
            | Expr::Index { purity, .. }
            | Expr::Member { purity, .. } => *purity,
            Expr::Literal { .. } => Purity::CAN_BE_REMOVED_IF_UNUSED | Purity::IS_CONSTANT,
            Expr::Paren { inner, .. } => inner.purity(),
        }
    }

    #[must_use]
    pub fn is_pure(&self) -> bool {
        self.purity().contains(Purity::CAN_BE_REMOVED_IF_UNUSED)
    }
}
