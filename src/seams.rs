//! Seam edge registry.
//!
//! Seams are undirected vertex pairs a caller marks as cut lines. They are
//! recorded and queryable, but the flattening pipeline does not split pieces
//! along them yet; a single connected piece is always unfolded.

use std::collections::HashSet;

use crate::mesh::{EdgeKey, VertexId};

/// A set of undirected seam edges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeamSet {
    edges: HashSet<EdgeKey>,
}

impl SeamSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the edge between `v1` and `v2`.
    ///
    /// Returns `false` if the edge was already marked (in either direction).
    /// Indices are not checked against any mesh.
    pub fn add(&mut self, v1: VertexId, v2: VertexId) -> bool {
        self.edges.insert(EdgeKey::new(v1, v2))
    }

    /// Whether the edge between `v1` and `v2` is marked.
    pub fn contains(&self, v1: VertexId, v2: VertexId) -> bool {
        self.edges.contains(&EdgeKey::new(v1, v2))
    }

    /// Unmark an edge. Returns whether it was present.
    pub fn remove(&mut self, v1: VertexId, v2: VertexId) -> bool {
        self.edges.remove(&EdgeKey::new(v1, v2))
    }

    /// Remove every seam.
    pub fn clear(&mut self) {
        self.edges.clear();
    }

    /// Number of distinct seam edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether no seam is marked.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// The seams in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = EdgeKey> {
        let mut sorted: Vec<EdgeKey> = self.edges.iter().copied().collect();
        sorted.sort_unstable();
        sorted.into_iter()
    }
}

impl Extend<(VertexId, VertexId)> for SeamSet {
    fn extend<I: IntoIterator<Item = (VertexId, VertexId)>>(&mut self, iter: I) {
        for (a, b) in iter {
            self.add(a, b);
        }
    }
}
