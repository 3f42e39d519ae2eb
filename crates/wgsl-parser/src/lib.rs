//! Recursive-descent WGSL parser: produces an AST together with the flat
//! symbol table and scope tree symbols are registered into at their
//! declaration point.

pub mod ast;
pub mod parser;
pub mod reference;
pub mod scope;
pub mod symbol;

pub use parser::{parse, ParseOutput};
pub use reference::Ref;
pub use scope::{Binding, Scope, ScopeId, ScopeTree};
pub use symbol::{Symbol, SymbolFlags, SymbolKind, SymbolTable};
