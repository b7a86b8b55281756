//! Breadth-first planar unfolding.
//!
//! The first face of a piece is laid down rigidly from its true edge lengths.
//! Every other face is reached across an edge whose endpoints are already in
//! the plane, and its remaining corner is placed with the law of cosines so that
//! the two new edges keep their 3D lengths. Each placed face is checked for
//! positive signed area in its own winding, which keeps the whole piece
//! consistently oriented.

use std::collections::{HashMap, VecDeque};

use nalgebra::Point2;

use crate::mesh::{EdgeKey, FaceId, HalfEdgeMesh, VertexId};

use super::geometry::{law_of_cosines, orient2d, perp, sin_from_cos, unit_or_zero, EDGE_EPSILON};
use super::uv::UVMap;

/// Counters describing how a piece was unfolded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnfoldStats {
    /// Distinct vertices referenced by the piece.
    pub piece_vertices: usize,
    /// Vertices positioned by the seed or by law-of-cosines placement.
    pub placed: usize,
    /// Placements postponed because the shared edge had near-zero length.
    pub deferred: usize,
    /// Vertices never reached and parked at the origin.
    pub fallback: usize,
    /// Faces the traversal resolved (seed included).
    pub visited_faces: usize,
}

/// What happened when the traversal reached a face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution {
    /// The missing corner was placed.
    Placed,
    /// All three corners were already in the plane.
    Closed,
    /// The shared edge is too short to orient the new corner.
    Deferred,
    /// Fewer than two corners are known.
    Blocked,
}

struct Unfolder<'a> {
    mesh: &'a HalfEdgeMesh,
    uvs: UVMap,
    placed: Vec<bool>,
}

impl<'a> Unfolder<'a> {
    fn new(mesh: &'a HalfEdgeMesh) -> Self {
        Self {
            mesh,
            uvs: UVMap::zeros(mesh.num_vertices()),
            placed: vec![false; mesh.num_vertices()],
        }
    }

    fn place(&mut self, v: VertexId, uv: Point2<f64>) {
        self.uvs.set(v, uv);
        self.placed[v.index()] = true;
    }

    fn is_placed(&self, v: VertexId) -> bool {
        self.placed[v.index()]
    }

    /// Lay the seed face down with corner 0 at the origin and corner 1 on +x.
    fn place_seed(&mut self, f: FaceId) {
        let [v0, v1, v2] = self.mesh.face_vertices(f);
        let e01 = self.mesh.edge_length(v0, v1);
        let e02 = self.mesh.edge_length(v0, v2);
        let e12 = self.mesh.edge_length(v1, v2);

        let cos = law_of_cosines(e01, e02, e12);
        let sin = sin_from_cos(cos);

        self.place(v0, Point2::origin());
        self.place(v1, Point2::new(e01, 0.0));
        self.place(v2, Point2::new(e02 * cos, e02 * sin));
    }

    fn resolve(&mut self, f: FaceId) -> Resolution {
        let tri = self.mesh.face_vertices(f);
        let mut unplaced = (0..3).filter(|&k| !self.is_placed(tri[k]));

        let k = match (unplaced.next(), unplaced.next()) {
            (None, _) => return Resolution::Closed,
            (Some(k), None) => k,
            (Some(_), Some(_)) => return Resolution::Blocked,
        };

        // The known corners in the face's own cyclic order after the new one,
        // so (s1, s2, new) winds the same way as the face.
        let new = tri[k];
        let s1 = tri[(k + 1) % 3];
        let s2 = tri[(k + 2) % 3];

        let len12 = self.mesh.edge_length(s1, s2);
        if len12 < EDGE_EPSILON {
            return Resolution::Deferred;
        }
        let len1n = self.mesh.edge_length(s1, new);
        let len2n = self.mesh.edge_length(s2, new);

        let cos = law_of_cosines(len12, len1n, len2n);
        let sin = sin_from_cos(cos);

        let p1 = self.uvs.get(s1);
        let p2 = self.uvs.get(s2);
        let dir = unit_or_zero(&(p2 - p1));
        let along = dir * (len1n * cos);
        let offset = perp(&dir) * (len1n * sin);

        // The left-normal offset already gives positive orientation; the
        // mirror only catches rounding when sin is near zero.
        let mut candidate = p1 + along + offset;
        if orient2d(&p1, &p2, &candidate) < 0.0 {
            candidate = p1 + along - offset;
        }

        self.place(new, candidate);
        Resolution::Placed
    }
}

/// Unfold a set of faces into the plane.
///
/// Returns one coordinate per mesh vertex; vertices outside `faces` stay at the
/// origin, as do vertices of the piece the traversal never reaches.
///
/// # Example
///
/// ```
/// use uvflat::algo::parameterize::unfold_piece;
/// use uvflat::mesh::{build_from_triangles, FaceId, VertexId};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(0.0, 0.0, 2.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let mesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
/// let (uvs, stats) = unfold_piece(&mesh, &[FaceId::new(0)]);
///
/// assert_eq!(stats.placed, 3);
/// assert!((uvs.get(VertexId::new(1)).x - 2.0).abs() < 1e-12);
/// ```
pub fn unfold_piece(mesh: &HalfEdgeMesh, faces: &[FaceId]) -> (UVMap, UnfoldStats) {
    let mut unfolder = Unfolder::new(mesh);
    let mut stats = UnfoldStats::default();

    let Some(&seed) = faces.first() else {
        return (unfolder.uvs, stats);
    };

    // Faces of this piece incident to each undirected edge
    let mut adjacency: HashMap<EdgeKey, Vec<FaceId>> = HashMap::with_capacity(faces.len() * 2);
    for &f in faces {
        let tri = mesh.face_vertices(f);
        for i in 0..3 {
            adjacency
                .entry(EdgeKey::new(tri[i], tri[(i + 1) % 3]))
                .or_default()
                .push(f);
        }
    }

    let mut visited = vec![false; mesh.num_faces()];
    let mut queue = VecDeque::new();

    unfolder.place_seed(seed);
    visited[seed.index()] = true;
    queue.push_back(seed);
    stats.visited_faces = 1;

    while let Some(current) = queue.pop_front() {
        let tri = mesh.face_vertices(current);

        for i in 0..3 {
            let key = EdgeKey::new(tri[i], tri[(i + 1) % 3]);
            let Some(neighbors) = adjacency.get(&key) else {
                continue;
            };

            for &nf in neighbors {
                if visited[nf.index()] {
                    continue;
                }

                match unfolder.resolve(nf) {
                    Resolution::Placed | Resolution::Closed => {
                        visited[nf.index()] = true;
                        queue.push_back(nf);
                        stats.visited_faces += 1;
                    }
                    Resolution::Deferred => stats.deferred += 1,
                    Resolution::Blocked => {}
                }
            }
        }
    }

    let mut seen = vec![false; mesh.num_vertices()];
    for &f in faces {
        for v in mesh.face_vertices(f) {
            if std::mem::replace(&mut seen[v.index()], true) {
                continue;
            }
            stats.piece_vertices += 1;

            if unfolder.is_placed(v) {
                stats.placed += 1;
            } else {
                unfolder.place(v, Point2::origin());
                stats.fallback += 1;
            }
        }
    }

    if stats.fallback > 0 {
        log::warn!(
            "{} of {} vertices unreachable from the seed face, placed at the origin",
            stats.fallback,
            stats.piece_vertices
        );
    }
    log::debug!(
        "unfolded {} faces: {} vertices placed, {} deferred placements",
        stats.visited_faces,
        stats.placed,
        stats.deferred
    );

    (unfolder.uvs, stats)
}

#[cfg(test)]
mod tests {
    use nalgebra::Point3;

    use super::*;
    use crate::mesh::build_from_triangles;

    fn all_faces(mesh: &HalfEdgeMesh) -> Vec<FaceId> {
        mesh.face_ids().collect()
    }

    fn uv_distance(uvs: &UVMap, a: usize, b: usize) -> f64 {
        (uvs.get(VertexId::new(a)) - uvs.get(VertexId::new(b))).norm()
    }

    fn assert_isometric(mesh: &HalfEdgeMesh, uvs: &UVMap) {
        for f in mesh.face_ids() {
            let tri = mesh.face_vertices(f);
            for i in 0..3 {
                let (a, b) = (tri[i], tri[(i + 1) % 3]);
                let expected = mesh.edge_length(a, b);
                let actual = (uvs.get(a) - uvs.get(b)).norm();
                assert!(
                    (expected - actual).abs() < 1e-9,
                    "edge {:?}-{:?}: {} vs {}",
                    a,
                    b,
                    expected,
                    actual
                );
            }
        }
    }

    fn grid_mesh(n: usize) -> HalfEdgeMesh {
        let mut vertices = Vec::new();
        let mut faces = Vec::new();
        for j in 0..=n {
            for i in 0..=n {
                vertices.push(Point3::new(i as f64, j as f64, 0.0));
            }
        }
        for j in 0..n {
            for i in 0..n {
                let v00 = j * (n + 1) + i;
                let v10 = v00 + 1;
                let v01 = v00 + (n + 1);
                let v11 = v01 + 1;
                faces.push([v00, v10, v11]);
                faces.push([v00, v11, v01]);
            }
        }
        build_from_triangles(&vertices, &faces).unwrap()
    }

    #[test]
    fn test_equilateral_triangle_exact() {
        let h = 3f64.sqrt() / 2.0;
        // Tilted out of the xy-plane to make sure only lengths matter
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(h * 0.6, 0.5, h * 0.8),
        ];
        let mesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
        let (uvs, stats) = unfold_piece(&mesh, &all_faces(&mesh));

        assert_eq!(stats.placed, 3);
        assert_eq!(stats.fallback, 0);
        for (a, b) in [(0, 1), (0, 2), (1, 2)] {
            assert!((uv_distance(&uvs, a, b) - 1.0).abs() < 1e-9);
        }

        assert_eq!(uvs.get(VertexId::new(0)), Point2::origin());
        assert!((uvs.get(VertexId::new(1)).y).abs() < 1e-12);
        assert!(uvs.signed_area(mesh.face_vertices(FaceId::new(0))) > 0.0);
    }

    #[test]
    fn test_folded_hinge_unfolds_flat() {
        // Two triangles folded 90 degrees along the shared edge 0-1
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(1.0, 0.0, -1.5),
        ];
        let faces = vec![[0, 1, 2], [1, 0, 3]];
        let mesh = build_from_triangles(&vertices, &faces).unwrap();
        let (uvs, stats) = unfold_piece(&mesh, &all_faces(&mesh));

        assert_eq!(stats.visited_faces, 2);
        assert_isometric(&mesh, &uvs);

        // The second face opens on the other side of the hinge
        for f in mesh.face_ids() {
            assert!(uvs.signed_area(mesh.face_vertices(f)) > 0.0);
        }
        assert!(uvs.get(VertexId::new(2)).y > 0.0);
        assert!(uvs.get(VertexId::new(3)).y < 0.0);
    }

    #[test]
    fn test_new_vertex_in_middle_corner() {
        // Neighbor face lists the new vertex between the two shared ones
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2], [1, 3, 2]];
        let mesh = build_from_triangles(&vertices, &faces).unwrap();

        let (uvs, _) = unfold_piece(&mesh, &all_faces(&mesh));
        assert_isometric(&mesh, &uvs);
        for f in mesh.face_ids() {
            assert!(uvs.signed_area(mesh.face_vertices(f)) > 0.0);
        }
        let p3 = uvs.get(VertexId::new(3));
        assert!((p3.x - 1.0).abs() < 1e-9 && (p3.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_planar_grid_is_isometric_and_consistent() {
        let mesh = grid_mesh(4);
        let (uvs, stats) = unfold_piece(&mesh, &all_faces(&mesh));

        assert_eq!(stats.piece_vertices, 25);
        assert_eq!(stats.placed, 25);
        assert_eq!(stats.visited_faces, 32);
        assert_isometric(&mesh, &uvs);
        for f in mesh.face_ids() {
            assert!(uvs.signed_area(mesh.face_vertices(f)) > 0.0);
        }
    }

    #[test]
    fn test_cylinder_strip_develops() {
        // Half of an open cylinder: developable, so lengths survive exactly
        let segments = 6;
        let mut vertices = Vec::new();
        for i in 0..=segments {
            let t = std::f64::consts::PI * i as f64 / segments as f64;
            vertices.push(Point3::new(t.cos(), t.sin(), 0.0));
            vertices.push(Point3::new(t.cos(), t.sin(), 1.0));
        }
        let mut faces = Vec::new();
        for i in 0..segments {
            let (a, b, c, d) = (2 * i, 2 * i + 2, 2 * i + 3, 2 * i + 1);
            faces.push([a, b, c]);
            faces.push([a, c, d]);
        }
        let mesh = build_from_triangles(&vertices, &faces).unwrap();
        let (uvs, stats) = unfold_piece(&mesh, &all_faces(&mesh));

        assert_eq!(stats.fallback, 0);
        assert_isometric(&mesh, &uvs);
        for f in mesh.face_ids() {
            assert!(uvs.signed_area(mesh.face_vertices(f)) > 0.0);
        }
    }

    #[test]
    fn test_disconnected_component_falls_back_to_origin() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(5.0, 5.0, 0.0),
            Point3::new(6.0, 5.0, 0.0),
            Point3::new(5.0, 6.0, 0.0),
        ];
        let faces = vec![[0, 1, 2], [3, 4, 5]];
        let mesh = build_from_triangles(&vertices, &faces).unwrap();
        let (uvs, stats) = unfold_piece(&mesh, &all_faces(&mesh));

        assert_eq!(stats.placed, 3);
        assert_eq!(stats.fallback, 3);
        for v in 3..6 {
            assert_eq!(uvs.get(VertexId::new(v)), Point2::origin());
        }
        assert!(uvs.is_finite());
    }

    #[test]
    fn test_zero_length_edge_is_deferred() {
        // Vertices 1 and 2 coincide, so face [2, 1, 3] has nothing to hinge on
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2], [2, 1, 3]];
        let mesh = build_from_triangles(&vertices, &faces).unwrap();
        let (uvs, stats) = unfold_piece(&mesh, &all_faces(&mesh));

        assert!(stats.deferred > 0);
        assert_eq!(stats.fallback, 1);
        assert!(uvs.is_finite());
    }

    #[test]
    fn test_subset_leaves_other_vertices_alone() {
        let mesh = grid_mesh(2);
        let piece = vec![FaceId::new(0), FaceId::new(1)];
        let (uvs, stats) = unfold_piece(&mesh, &piece);

        assert_eq!(stats.piece_vertices, 4);
        assert_eq!(stats.visited_faces, 2);
        assert_eq!(uvs.len(), mesh.num_vertices());
        assert_eq!(uvs.get(VertexId::new(8)), Point2::origin());
    }

    #[test]
    fn test_empty_piece() {
        let mesh = grid_mesh(1);
        let (uvs, stats) = unfold_piece(&mesh, &[]);
        assert_eq!(uvs.len(), 4);
        assert_eq!(stats, UnfoldStats::default());
    }
}
