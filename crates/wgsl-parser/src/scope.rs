//! Scope tree: a parent-pointer tree rooted at module scope.
//!
//! A fresh scope is pushed for each compound statement, each function body
//! (parameters populate it before statements are processed), each `for`
//! loop header, each `switch` case body, and each `loop { .. continuing {
//! .. } }` pair — the continuing block is a child of the loop body's scope
//! so it can see the loop body's bindings.

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::reference::Ref;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

impl ScopeId {
    pub const ROOT: ScopeId = ScopeId(0);

    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Where in the scope's name map a binding lives, and at what source offset
/// it was declared — the offset is what lets the resolver enforce
/// text-order shadowing inside function bodies.
#[derive(Debug, Clone, Copy)]
pub struct Binding {
    pub symbol: Ref,
    pub declared_at: u32,
}

pub struct Scope {
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    /// `IndexMap` keeps declaration order as the stable secondary sort key
    /// the renamer's slot-allocation step needs, while still giving O(1)
    /// name lookup.
    names: IndexMap<String, Binding, FxBuildHasher>,
}

impl Scope {
    fn new(parent: Option<ScopeId>) -> Self {
        Scope { parent, children: Vec::new(), names: IndexMap::with_hasher(FxBuildHasher) }
    }

    pub fn declare(&mut self, name: impl Into<String>, symbol: Ref, declared_at: u32) {
        self.names.insert(name.into(), Binding { symbol, declared_at });
    }

    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Binding> {
        self.names.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Binding)> {
        self.names.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Owns every [`Scope`] in a module as a flat, indexable arena.
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl ScopeTree {
    #[must_use]
    pub fn new() -> Self {
        ScopeTree { scopes: vec![Scope::new(None)] }
    }

    #[must_use]
    pub fn root(&self) -> ScopeId {
        ScopeId::ROOT
    }

    pub fn push_child(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(Some(parent)));
        self.scopes[parent.index()].children.push(id);
        id
    }

    #[must_use]
    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub fn get_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.index()]
    }

    #[must_use]
    pub fn parent_of(&self, id: ScopeId) -> Option<ScopeId> {
        self.scopes[id.index()].parent
    }

    /// Walk from `start` up to and including module scope, returning the
    /// first binding found for `name`. Implements the scope-chain lookup
    /// the resolver's use pass relies on; callers enforce the text-order
    /// shadow rule themselves by checking `declared_at` against the use
    /// position before accepting a match from the innermost scope.
    #[must_use]
    pub fn resolve(&self, start: ScopeId, name: &str) -> Option<(ScopeId, Binding)> {
        let mut current = Some(start);
        while let Some(id) = current {
            if let Some(binding) = self.get(id).lookup(name) {
                return Some((id, binding));
            }
            current = self.parent_of(id);
        }
        None
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_finds_binding_in_enclosing_scope() {
        let mut tree = ScopeTree::new();
        tree.get_mut(tree.root()).declare("f", Ref::local(0), 0);
        let child = tree.push_child(tree.root());
        let (found_in, binding) = tree.resolve(child, "f").unwrap();
        assert_eq!(found_in, tree.root());
        assert_eq!(binding.symbol, Ref::local(0));
    }

    #[test]
    fn inner_declaration_shadows_outer_by_name() {
        let mut tree = ScopeTree::new();
        tree.get_mut(tree.root()).declare("x", Ref::local(0), 0);
        let child = tree.push_child(tree.root());
        tree.get_mut(child).declare("x", Ref::local(1), 10);
        let (found_in, binding) = tree.resolve(child, "x").unwrap();
        assert_eq!(found_in, child);
        assert_eq!(binding.symbol, Ref::local(1));
    }

    #[test]
    fn resolve_returns_none_when_nowhere_found() {
        let tree = ScopeTree::new();
        assert!(tree.resolve(tree.root(), "missing").is_none());
    }

    #[test]
    fn continuing_block_is_child_of_loop_body_scope() {
        let mut tree = ScopeTree::new();
        let loop_body = tree.push_child(tree.root());
        let continuing = tree.push_child(loop_body);
        assert_eq!(tree.parent_of(continuing), Some(loop_body));
    }
}
