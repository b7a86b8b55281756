//! Undirected edge keys.

use std::fmt;

use super::index::VertexId;

/// An undirected edge, stored lower vertex first.
///
/// Both the twin search in the builder and the face adjacency used by the
/// unfolding are bucketed by this key, so a→b and b→a land in the same slot.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct EdgeKey {
    lo: VertexId,
    hi: VertexId,
}

impl EdgeKey {
    /// Canonicalize the edge between `a` and `b`.
    #[inline]
    pub fn new(a: VertexId, b: VertexId) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }

    /// Build a key from raw vertex indices.
    #[inline]
    pub fn from_indices(a: usize, b: usize) -> Self {
        Self::new(VertexId::new(a), VertexId::new(b))
    }

    /// The lower-indexed endpoint.
    #[inline]
    pub fn lo(self) -> VertexId {
        self.lo
    }

    /// The higher-indexed endpoint.
    #[inline]
    pub fn hi(self) -> VertexId {
        self.hi
    }

    /// Both endpoints, lower first.
    #[inline]
    pub fn vertices(self) -> (VertexId, VertexId) {
        (self.lo, self.hi)
    }
}

impl fmt::Debug for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E({}, {})", self.lo.index(), self.hi.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order() {
        let a = EdgeKey::from_indices(5, 2);
        let b = EdgeKey::from_indices(2, 5);
        assert_eq!(a, b);
        assert_eq!(a.lo().index(), 2);
        assert_eq!(a.hi().index(), 5);
    }

    #[test]
    fn test_debug_format() {
        assert_eq!(format!("{:?}", EdgeKey::from_indices(3, 1)), "E(1, 3)");
    }
}
