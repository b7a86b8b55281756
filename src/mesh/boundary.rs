//! Boundary classification.
//!
//! A half-edge without a twin lies on the border of the surface. Both of its
//! endpoints are boundary vertices.

use super::halfedge::HalfEdgeMesh;

/// Flag boundary half-edges and boundary vertices.
///
/// Flags are reset first, so running this twice gives the same result.
/// Returns the number of boundary half-edges.
pub fn classify_boundary(mesh: &mut HalfEdgeMesh) -> usize {
    mesh.boundary_vertices.iter_mut().for_each(|b| *b = false);

    let mut count = 0;
    for i in 0..mesh.halfedges.len() {
        let he = mesh.halfedges[i];
        let is_boundary = !he.has_twin();
        mesh.halfedges[i].is_boundary = is_boundary;

        if is_boundary {
            count += 1;
            let origin = mesh.halfedges[he.prev.index()].target;
            mesh.boundary_vertices[origin.index()] = true;
            mesh.boundary_vertices[he.target.index()] = true;
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use nalgebra::Point3;

    use super::*;
    use crate::mesh::{build_from_triangles, HalfEdgeId, VertexId};

    fn fan_disk() -> HalfEdgeMesh {
        // Center vertex + 6 rim vertices
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 0.866, 0.0),
            Point3::new(-0.5, 0.866, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(-0.5, -0.866, 0.0),
            Point3::new(0.5, -0.866, 0.0),
        ];
        let faces = vec![
            [0, 1, 2],
            [0, 2, 3],
            [0, 3, 4],
            [0, 4, 5],
            [0, 5, 6],
            [0, 6, 1],
        ];
        build_from_triangles(&vertices, &faces).unwrap()
    }

    #[test]
    fn test_disk_boundary() {
        let mesh = fan_disk();

        assert!(!mesh.is_boundary_vertex(VertexId::new(0)));
        for v in 1..7 {
            assert!(mesh.is_boundary_vertex(VertexId::new(v)));
        }
        assert_eq!(mesh.num_boundary_vertices(), 6);
        assert_eq!(mesh.boundary_halfedges().count(), 6);

        // Rim half-edges are the ones opposite the center
        for he in mesh.boundary_halfedges() {
            assert_ne!(mesh.origin(he).index(), 0);
            assert_ne!(mesh.target(he).index(), 0);
        }
    }

    #[test]
    fn test_closed_mesh_has_no_boundary() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
        let mesh = build_from_triangles(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_boundary_vertices(), 0);
        assert_eq!(mesh.boundary_halfedges().count(), 0);
    }

    #[test]
    fn test_reclassify_is_stable() {
        let mut mesh = fan_disk();
        let first = classify_boundary(&mut mesh);
        let second = classify_boundary(&mut mesh);

        assert_eq!(first, 6);
        assert_eq!(first, second);
        // Face 0 is [0, 1, 2]: spoke 0->1 is interior, rim 1->2 is not
        assert!(!mesh.is_boundary_halfedge(HalfEdgeId::new(0)));
        assert!(mesh.is_boundary_halfedge(HalfEdgeId::new(1)));
    }
}
