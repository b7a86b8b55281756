//! Fitting a flattened piece into the unit square.

use nalgebra::{Point2, Vector2};

use crate::mesh::{FaceId, HalfEdgeMesh, VertexId};

use super::geometry::NORMALIZE_EPSILON;
use super::uv::{bounds_of, UVMap};

/// Distinct vertices referenced by `faces`, in ascending order.
pub fn piece_vertices(mesh: &HalfEdgeMesh, faces: &[FaceId]) -> Vec<VertexId> {
    let mut seen = vec![false; mesh.num_vertices()];
    for &f in faces {
        for v in mesh.face_vertices(f) {
            seen[v.index()] = true;
        }
    }
    seen.iter()
        .enumerate()
        .filter(|(_, &s)| s)
        .map(|(i, _)| VertexId::new(i))
        .collect()
}

/// Bounding box of the UVs of the piece's vertices, or `None` for an empty piece.
pub fn piece_bounds(
    uvs: &UVMap,
    mesh: &HalfEdgeMesh,
    faces: &[FaceId],
) -> Option<(Point2<f64>, Point2<f64>)> {
    bounds_of(piece_vertices(mesh, faces).into_iter().map(|v| uvs.get(v)))
}

/// Scale the piece uniformly so its larger side is 1 and translate its
/// minimum corner to the origin.
///
/// Aspect ratio is kept and vertices outside the piece are never moved.
/// Returns `false` and leaves `uvs` untouched when the piece is empty or both
/// extents are at most `1e-10`.
pub fn normalize_piece(uvs: &mut UVMap, mesh: &HalfEdgeMesh, faces: &[FaceId]) -> bool {
    let vertices = piece_vertices(mesh, faces);
    let Some((min, max)) = bounds_of(vertices.iter().map(|&v| uvs.get(v))) else {
        return false;
    };

    let extent = (max.x - min.x).max(max.y - min.y);
    if extent <= NORMALIZE_EPSILON {
        log::warn!(
            "piece of {} vertices has degenerate UV extent {:e}; skipping normalization",
            vertices.len(),
            extent
        );
        return false;
    }

    let scale = 1.0 / extent;
    let offset = Vector2::new(min.x, min.y);
    for v in vertices {
        let uv = uvs.get_mut(v);
        *uv = Point2::from((uv.coords - offset) * scale);
    }

    true
}
