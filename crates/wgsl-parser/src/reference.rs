//! `Ref` — a non-owning weak index into a module's flat symbol array.
//!
//! Mirrors the arena-and-index convention the teacher project uses for its
//! `SymbolId`/`NodeIndex` types: cheap, `Copy`, and validity is checked
//! against a sentinel rather than through a lifetime.

/// Index into [`crate::symbol::SymbolTable`]. A pair of (source index, inner
/// index) as the specification requires, even though this pipeline only
/// ever populates source index 0 (one module in, one module out); the pair
/// shape is kept so a future multi-module caller has somewhere to put a
/// second source without changing every call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ref {
    source: u32,
    index: u32,
}

impl Ref {
    pub const INVALID: Ref = Ref { source: u32::MAX, index: u32::MAX };

    #[must_use]
    pub const fn new(source: u32, index: u32) -> Self {
        Ref { source, index }
    }

    #[must_use]
    pub const fn local(index: u32) -> Self {
        Ref { source: 0, index }
    }

    #[must_use]
    pub const fn is_valid(&self) -> bool {
        !(self.source == u32::MAX && self.index == u32::MAX)
    }

    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }

    #[must_use]
    pub const fn source(&self) -> u32 {
        self.source
    }
}

impl Default for Ref {
    fn default() -> Self {
        Ref::INVALID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_ref_is_never_valid() {
        assert!(!Ref::INVALID.is_valid());
        assert!(!Ref::default().is_valid());
    }

    #[test]
    fn local_ref_is_valid_and_addresses_source_zero() {
        let r = Ref::local(3);
        assert!(r.is_valid());
        assert_eq!(r.source(), 0);
        assert_eq!(r.index(), 3);
    }
}
