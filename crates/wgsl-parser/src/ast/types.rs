//! Type AST nodes.

use wgsl_common::Span;

use crate::ast::expr::Expr;
use crate::reference::Ref;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Bool,
    I32,
    U32,
    F32,
    F16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureKind {
    Sampled,
    Multisampled,
    Storage,
    Depth,
    DepthMultisampled,
    External,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
    ReadWrite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressSpace {
    Function,
    Private,
    Workgroup,
    Uniform,
    Storage,
    Handle,
}

#[derive(Debug, Clone)]
pub enum Type {
    Scalar { kind: ScalarKind, span: Span },
    Vector {
        size: u8,
        element: Box<Type>,
        /// e.g. "vec3f" when the source used the shorthand spelling.
        shorthand: Option<String>,
        span: Span,
    },
    Matrix {
        cols: u8,
        rows: u8,
        element: Box<Type>,
        shorthand: Option<String>,
        span: Span,
    },
    Array {
        element: Box<Type>,
        /// A const expression, or `None` for a runtime-sized array.
        size: Option<Box<Expr>>,
        span: Span,
    },
    Pointer {
        address_space: AddressSpace,
        element: Box<Type>,
        access_mode: Option<AccessMode>,
        span: Span,
    },
    Atomic { element: Box<Type>, span: Span },
    Sampler { comparison: bool, span: Span },
    Texture {
        kind: TextureKind,
        dimension: String,
        sampled_type: Option<Box<Type>>,
        texel_format: Option<String>,
        access_mode: Option<AccessMode>,
        span: Span,
    },
    /// A named type reference: a user struct or alias, resolved by `Ref`.
    Ident { name: String, ref_: Ref, span: Span },
}

impl Type {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Type::Scalar { span, .. }
            | Type::Vector { span, .. }
            | Type::Matrix { span, .. }
            | Type::Array { span, .. }
            | Type::Pointer { span, .. }
            | Type::Atomic { span, .. }
            | Type::Sampler { span, .. }
            | Type::Texture { span, .. }
            | Type::Ident { span, .. } => *span,
        }
    }
}
