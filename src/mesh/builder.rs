//! Mesh construction utilities.
//!
//! Builds a [`HalfEdgeMesh`] from a triangle soup, either as typed points and
//! index triples or as the flat `[x, y, z, ...]` / `[a, b, c, ...]` buffers a
//! caller typically hands over.

use std::collections::HashMap;

use nalgebra::Point3;

use super::boundary::classify_boundary;
use super::edge::EdgeKey;
use super::halfedge::{HalfEdge, HalfEdgeMesh};
use super::index::{FaceId, HalfEdgeId, VertexId};
use crate::error::{FlattenError, Result};

/// Build a half-edge mesh from vertices and triangle faces.
///
/// Empty input is accepted and produces an empty mesh; emptiness is only an
/// error once someone tries to flatten it.
///
/// # Arguments
/// * `vertices` - List of vertex positions
/// * `faces` - List of triangle faces, each as [v0, v1, v2] indices
///
/// # Example
/// ```
/// use uvflat::mesh::build_from_triangles;
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let faces = vec![[0, 1, 2]];
///
/// let mesh = build_from_triangles(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_halfedges(), 3);
/// ```
pub fn build_from_triangles(
    vertices: &[Point3<f64>],
    faces: &[[usize; 3]],
) -> Result<HalfEdgeMesh> {
    for (fi, face) in faces.iter().enumerate() {
        for &vi in face {
            if vi >= vertices.len() {
                return Err(FlattenError::InvalidVertexIndex { face: fi, vertex: vi });
            }
        }
    }

    let mut mesh = HalfEdgeMesh {
        positions: vertices.to_vec(),
        faces: Vec::with_capacity(faces.len()),
        halfedges: Vec::with_capacity(faces.len() * 3),
        vertex_halfedge: vec![HalfEdgeId::invalid(); vertices.len()],
        boundary_vertices: vec![false; vertices.len()],
    };

    // First pass: three half-edges per face, linked into a cycle
    for (fi, face) in faces.iter().enumerate() {
        let face_id = FaceId::new(fi);
        let corners = (*face).map(VertexId::new);
        let base = mesh.halfedges.len();

        for i in 0..3 {
            let id = HalfEdgeId::new(base + i);
            mesh.halfedges.push(HalfEdge {
                target: corners[(i + 1) % 3],
                face: face_id,
                next: HalfEdgeId::new(base + (i + 1) % 3),
                prev: HalfEdgeId::new(base + (i + 2) % 3),
                ..HalfEdge::new()
            });

            let origin = corners[i].index();
            if !mesh.vertex_halfedge[origin].is_valid() {
                mesh.vertex_halfedge[origin] = id;
            }
        }

        mesh.faces.push(corners);
    }

    // Second pass: pair twins
    let non_manifold = link_twins(&mut mesh);
    if non_manifold > 0 {
        log::warn!(
            "{} edge(s) shared by more than two faces; extra half-edges left unpaired",
            non_manifold
        );
    }

    let boundary = classify_boundary(&mut mesh);
    log::debug!(
        "built half-edge mesh: {} vertices, {} faces, {} half-edges ({} on boundary)",
        mesh.num_vertices(),
        mesh.num_faces(),
        mesh.num_halfedges(),
        boundary
    );

    Ok(mesh)
}

/// Build a half-edge mesh from flat buffers.
///
/// `vertices` holds `x, y, z` triples and `faces` holds vertex index triples.
/// Both are copied.
pub fn from_flat_buffers(vertices: &[f64], faces: &[u32]) -> Result<HalfEdgeMesh> {
    if vertices.len() % 3 != 0 {
        return Err(FlattenError::MalformedBuffer {
            name: "vertex",
            len: vertices.len(),
            stride: 3,
        });
    }
    if faces.len() % 3 != 0 {
        return Err(FlattenError::MalformedBuffer {
            name: "face",
            len: faces.len(),
            stride: 3,
        });
    }

    let points: Vec<Point3<f64>> = vertices
        .chunks_exact(3)
        .map(|c| Point3::new(c[0], c[1], c[2]))
        .collect();
    let triangles: Vec<[usize; 3]> = faces
        .chunks_exact(3)
        .map(|c| [c[0] as usize, c[1] as usize, c[2] as usize])
        .collect();

    build_from_triangles(&points, &triangles)
}

/// Pair every half-edge a→b with an unpaired half-edge b→a.
///
/// Half-edges are bucketed by undirected edge so the search stays linear in the
/// number of edges. Buckets are visited in half-edge order, which keeps the
/// pairing deterministic. Returns the number of edges with more than two
/// incident half-edges.
fn link_twins(mesh: &mut HalfEdgeMesh) -> usize {
    let mut buckets: HashMap<EdgeKey, Vec<HalfEdgeId>> = HashMap::with_capacity(mesh.num_halfedges());
    for he in mesh.halfedge_ids() {
        let key = EdgeKey::new(mesh.origin(he), mesh.target(he));
        buckets.entry(key).or_default().push(he);
    }

    for i in 0..mesh.num_halfedges() {
        let he = HalfEdgeId::new(i);
        if mesh.twin(he).is_valid() {
            continue;
        }

        let (a, b) = (mesh.origin(he), mesh.target(he));
        let Some(bucket) = buckets.get(&EdgeKey::new(a, b)) else {
            continue;
        };

        let partner = bucket.iter().copied().find(|&other| {
            other != he
                && !mesh.twin(other).is_valid()
                && mesh.origin(other) == b
                && mesh.target(other) == a
        });

        if let Some(other) = partner {
            mesh.halfedge_mut(he).twin = other;
            mesh.halfedge_mut(other).twin = he;
        }
    }

    buckets.values().filter(|hes| hes.len() > 2).count()
}

/// Convert a half-edge mesh back to a face-vertex representation.
///
/// Returns (vertices, faces) tuple.
pub fn to_face_vertex(mesh: &HalfEdgeMesh) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let faces = mesh
        .faces
        .iter()
        .map(|f| [f[0].index(), f[1].index(), f[2].index()])
        .collect();

    (mesh.positions.clone(), faces)
}
