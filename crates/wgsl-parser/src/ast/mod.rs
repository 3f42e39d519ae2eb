//! Discriminated-union AST: every category (Expr, Stmt, Decl, Type,
//! Directive) is a tagged sum with a fixed variant set.

pub mod decl;
pub mod directive;
pub mod expr;
pub mod module;
pub mod stmt;
pub mod types;

pub use decl::{Attribute, Decl, Param, StructMember};
pub use directive::Directive;
pub use expr::{BinaryOp, Callee, Expr, LiteralKind as ExprLiteralKind, Purity, UnaryOp};
pub use module::Module;
pub use stmt::{AssignOp, IncDecOp, Stmt, SwitchCase};
pub use types::{AccessMode, AddressSpace, ScalarKind, TextureKind, Type};
