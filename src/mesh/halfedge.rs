//! Half-edge mesh data structure.
//!
//! Every face corner owns one directed half-edge: half-edge `3f + i` runs from
//! corner `i` to corner `i + 1` of face `f`. Half-edges refer to each other by
//! index into a single array, so the cyclic `next`/`prev`/`twin` relations need
//! no shared ownership.
//!
//! # Boundary Handling
//!
//! Unlike a closed half-edge structure, no extra half-edges are created along the
//! border. A half-edge whose `twin` is invalid lies on the mesh boundary, and the
//! boundary classifier flags it together with both of its endpoints.

use nalgebra::Point3;

use super::index::{FaceId, HalfEdgeId, VertexId};

/// A directed half-edge owned by one triangle.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge {
    /// The vertex this half-edge points to.
    pub target: VertexId,

    /// The face this half-edge belongs to.
    pub face: FaceId,

    /// The next half-edge around the same face.
    pub next: HalfEdgeId,

    /// The previous half-edge around the same face.
    pub prev: HalfEdgeId,

    /// The opposite half-edge, or invalid on the boundary.
    pub twin: HalfEdgeId,

    /// Set by the boundary classifier when `twin` is invalid.
    pub is_boundary: bool,

    /// Reserved for seam cutting; never set by the current pipeline.
    pub is_seam: bool,
}

impl HalfEdge {
    /// Create a new unlinked half-edge.
    pub fn new() -> Self {
        Self {
            target: VertexId::invalid(),
            face: FaceId::invalid(),
            next: HalfEdgeId::invalid(),
            prev: HalfEdgeId::invalid(),
            twin: HalfEdgeId::invalid(),
            is_boundary: false,
            is_seam: false,
        }
    }

    /// Whether an opposite half-edge was found for this one.
    #[inline]
    pub fn has_twin(&self) -> bool {
        self.twin.is_valid()
    }
}

impl Default for HalfEdge {
    fn default() -> Self {
        Self::new()
    }
}

/// A triangle mesh with half-edge connectivity.
///
/// Built once by [`build_from_triangles`](super::build_from_triangles); afterwards
/// only the boundary flags are ever rewritten.
#[derive(Debug, Clone, Default)]
pub struct HalfEdgeMesh {
    /// Vertex positions.
    pub(crate) positions: Vec<Point3<f64>>,

    /// Triangles as ordered vertex triples.
    pub(crate) faces: Vec<[VertexId; 3]>,

    /// Three half-edges per face, in face order.
    pub(crate) halfedges: Vec<HalfEdge>,

    /// First outgoing half-edge found for each vertex (invalid if unreferenced).
    pub(crate) vertex_halfedge: Vec<HalfEdgeId>,

    /// Boundary flag per vertex.
    pub(crate) boundary_vertices: Vec<bool>,
}

impl HalfEdgeMesh {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Get the number of half-edges (always three per face).
    #[inline]
    pub fn num_halfedges(&self) -> usize {
        self.halfedges.len()
    }

    /// Whether the mesh has nothing to flatten.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.faces.is_empty()
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId) -> &Point3<f64> {
        &self.positions[v.index()]
    }

    /// All vertex positions.
    #[inline]
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    /// Get the three vertices of a face, in winding order.
    #[inline]
    pub fn face_vertices(&self, f: FaceId) -> [VertexId; 3] {
        self.faces[f.index()]
    }

    /// Get a half-edge by ID.
    #[inline]
    pub fn halfedge(&self, id: HalfEdgeId) -> &HalfEdge {
        &self.halfedges[id.index()]
    }

    /// Get a mutable half-edge by ID.
    #[inline]
    pub(crate) fn halfedge_mut(&mut self, id: HalfEdgeId) -> &mut HalfEdge {
        &mut self.halfedges[id.index()]
    }

    // ==================== Topology Queries ====================

    /// Get the twin (opposite) half-edge; invalid on the boundary.
    #[inline]
    pub fn twin(&self, he: HalfEdgeId) -> HalfEdgeId {
        self.halfedge(he).twin
    }

    /// Get the next half-edge around the face.
    #[inline]
    pub fn next(&self, he: HalfEdgeId) -> HalfEdgeId {
        self.halfedge(he).next
    }

    /// Get the previous half-edge around the face.
    #[inline]
    pub fn prev(&self, he: HalfEdgeId) -> HalfEdgeId {
        self.halfedge(he).prev
    }

    /// Get the vertex a half-edge points to.
    #[inline]
    pub fn target(&self, he: HalfEdgeId) -> VertexId {
        self.halfedge(he).target
    }

    /// Get the vertex a half-edge leaves from.
    #[inline]
    pub fn origin(&self, he: HalfEdgeId) -> VertexId {
        self.target(self.prev(he))
    }

    /// Get the face of a half-edge.
    #[inline]
    pub fn face_of(&self, he: HalfEdgeId) -> FaceId {
        self.halfedge(he).face
    }

    /// The three half-edges of a face.
    #[inline]
    pub fn face_halfedges(&self, f: FaceId) -> [HalfEdgeId; 3] {
        let base = 3 * f.index();
        [
            HalfEdgeId::new(base),
            HalfEdgeId::new(base + 1),
            HalfEdgeId::new(base + 2),
        ]
    }

    /// One outgoing half-edge of `v`, used as a traversal seed.
    #[inline]
    pub fn vertex_halfedge(&self, v: VertexId) -> HalfEdgeId {
        self.vertex_halfedge[v.index()]
    }

    /// Check if a half-edge is on the boundary.
    #[inline]
    pub fn is_boundary_halfedge(&self, he: HalfEdgeId) -> bool {
        self.halfedge(he).is_boundary
    }

    /// Check if a vertex is on the boundary.
    #[inline]
    pub fn is_boundary_vertex(&self, v: VertexId) -> bool {
        self.boundary_vertices[v.index()]
    }

    /// Number of vertices flagged as boundary.
    pub fn num_boundary_vertices(&self) -> usize {
        self.boundary_vertices.iter().filter(|&&b| b).count()
    }

    /// Iterate over the half-edges flagged as boundary.
    pub fn boundary_halfedges(&self) -> impl Iterator<Item = HalfEdgeId> + '_ {
        self.halfedges
            .iter()
            .enumerate()
            .filter(|(_, he)| he.is_boundary)
            .map(|(i, _)| HalfEdgeId::new(i))
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.positions.len()).map(VertexId::new)
    }

    /// Iterate over all face IDs.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        (0..self.faces.len()).map(FaceId::new)
    }

    /// Iterate over all half-edge IDs.
    pub fn halfedge_ids(&self) -> impl Iterator<Item = HalfEdgeId> + '_ {
        (0..self.halfedges.len()).map(HalfEdgeId::new)
    }

    // ==================== Geometry ====================

    /// True 3D distance between two vertices.
    #[inline]
    pub fn edge_length(&self, a: VertexId, b: VertexId) -> f64 {
        (self.position(b) - self.position(a)).norm()
    }

    /// Compute the area of a face.
    pub fn face_area(&self, f: FaceId) -> f64 {
        let [a, b, c] = self.face_vertices(f);
        let e1 = self.position(b) - self.position(a);
        let e2 = self.position(c) - self.position(a);
        0.5 * e1.cross(&e2).norm()
    }

    /// Compute the total surface area of the mesh.
    pub fn surface_area(&self) -> f64 {
        self.face_ids().map(|f| self.face_area(f)).sum()
    }

    // ==================== Validation ====================

    /// Check that the connectivity is consistent.
    ///
    /// Every face must form a `next`/`prev` 3-cycle, and every twin must point
    /// back and run in the opposite direction.
    pub fn is_valid(&self) -> bool {
        if self.halfedges.len() != 3 * self.faces.len() {
            return false;
        }

        for (i, he) in self.halfedges.iter().enumerate() {
            let id = HalfEdgeId::new(i);

            if self.prev(he.next) != id || self.next(he.prev) != id {
                return false;
            }
            if self.next(self.next(he.next)) != he.next {
                return false;
            }
            if he.face.index() != i / 3 {
                return false;
            }

            if he.twin.is_valid() {
                let twin = self.halfedge(he.twin);
                if twin.twin != id {
                    return false;
                }
                if self.target(he.twin) != self.origin(id) || self.origin(he.twin) != he.target {
                    return false;
                }
            }
        }

        for (v, &he) in self.vertex_halfedge.iter().enumerate() {
            if he.is_valid() && self.origin(he).index() != v {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_halfedge() {
        let he = HalfEdge::new();
        assert!(!he.has_twin());
        assert!(!he.is_boundary);
        assert!(!he.is_seam);
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = HalfEdgeMesh::new();
        assert_eq!(mesh.num_vertices(), 0);
        assert_eq!(mesh.num_halfedges(), 0);
        assert_eq!(mesh.num_faces(), 0);
        assert!(mesh.is_empty());
        assert!(mesh.is_valid());
    }
}
