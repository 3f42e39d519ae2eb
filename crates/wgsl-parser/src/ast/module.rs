//! The top-level owner of every AST node, symbol, and scope in a run.

use crate::ast::decl::Decl;
use crate::ast::directive::Directive;
use crate::scope::ScopeTree;
use crate::symbol::SymbolTable;

/// Exclusively owns the AST, the symbol table, and the scope tree. `Ref`s
/// and `ScopeId`s are non-owning indices into this structure; nothing else
/// in the pipeline holds AST nodes directly.
pub struct Module {
    pub directives: Vec<Directive>,
    pub decls: Vec<Decl>,
    pub symbols: SymbolTable,
    pub scopes: ScopeTree,
}

impl Module {
    #[must_use]
    pub fn new() -> Self {
        Module {
            directives: Vec::new(),
            decls: Vec::new(),
            symbols: SymbolTable::new(),
            scopes: ScopeTree::new(),
        }
    }
}

impl Default for Module {
    fn default() -> Self {
        Self::new()
    }
}
