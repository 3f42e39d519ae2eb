//! Declaration AST nodes.

use wgsl_common::Span;

use crate::ast::expr::Expr;
use crate::ast::types::Type;
use crate::reference::Ref;

#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: String,
    pub args: Vec<Expr>,
    pub span: Span,
}

impl Attribute {
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub symbol: Ref,
    pub type_: Type,
    pub attributes: Vec<Attribute>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct StructMember {
    pub name: String,
    pub type_: Type,
    pub attributes: Vec<Attribute>,
    pub span: Span,
}

use crate::ast::stmt::Stmt;

#[derive(Debug, Clone)]
pub enum Decl {
    Const {
        name: String,
        symbol: Ref,
        type_: Option<Type>,
        value: Expr,
        span: Span,
    },
    Override {
        name: String,
        symbol: Ref,
        attributes: Vec<Attribute>,
        type_: Option<Type>,
        value: Option<Expr>,
        span: Span,
    },
    Var {
        name: String,
        symbol: Ref,
        attributes: Vec<Attribute>,
        address_space: Option<crate::ast::types::AddressSpace>,
        access_mode: Option<crate::ast::types::AccessMode>,
        type_: Option<Type>,
        value: Option<Expr>,
        span: Span,
    },
    Let {
        name: String,
        symbol: Ref,
        type_: Option<Type>,
        value: Expr,
        span: Span,
    },
    Function {
        name: String,
        symbol: Ref,
        attributes: Vec<Attribute>,
        params: Vec<Param>,
        return_type: Option<Type>,
        return_attributes: Vec<Attribute>,
        body: Vec<Stmt>,
        scope: crate::scope::ScopeId,
        span: Span,
    },
    Struct {
        name: String,
        symbol: Ref,
        members: Vec<StructMember>,
        span: Span,
    },
    Alias {
        name: String,
        symbol: Ref,
        type_: Type,
        span: Span,
    },
    ConstAssert { condition: Expr, span: Span },
}

impl Decl {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Decl::Const { span, .. }
            | Decl::Override { span, .. }
            | Decl::Var { span, .. }
            | Decl::Let { span, .. }
            | Decl::Function { span, .. }
            | Decl::Struct { span, .. }
            | Decl::Alias { span, .. }
            | Decl::ConstAssert { span, .. } => *span,
        }
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Decl::Const { name, .. }
            | Decl::Override { name, .. }
            | Decl::Var { name, .. }
            | Decl::Let { name, .. }
            | Decl::Function { name, .. }
            | Decl::Struct { name, .. }
            | Decl::Alias { name, .. } => Some(name),
            Decl::ConstAssert { .. } => None,
        }
    }

    #[must_use]
    pub fn symbol(&self) -> Option<Ref> {
        match self {
            Decl::Const { symbol, .. }
            | Decl::Override { symbol, .. }
            | Decl::Var { symbol, .. }
            | Decl::Let { symbol, .. }
            | Decl::Function { symbol, .. }
            | Decl::Struct { symbol, .. }
            | Decl::Alias { symbol, .. } => Some(*symbol),
            Decl::ConstAssert { .. } => None,
        }
    }

    /// Declaration removability, independent of liveness: whether this
    /// *kind* of declaration is ever eligible for removal when unused.
    /// Actual removal also requires the tree-shaker to have found the
    /// declaration's symbol dead; see `wgsl-analyze`.
    #[must_use]
    pub fn is_removable_if_unused(&self) -> bool {
        match self {
            Decl::Const { .. } | Decl::Let { .. } | Decl::Alias { .. } | Decl::Struct { .. } | Decl::Function { .. } => true,
            Decl::Var { value, .. } => value.as_ref().is_none_or(Expr::is_pure),
            Decl::Override { .. } | Decl::ConstAssert { .. } => false,
        }
    }
}
