//! Quality measures for a flattened piece.

use crate::mesh::{FaceId, HalfEdgeMesh};

use super::geometry::EDGE_EPSILON;
use super::uv::UVMap;

/// How faithfully a piece's UVs reproduce its surface.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DistortionStats {
    /// Faces whose UV triangle winds clockwise.
    pub flipped_faces: usize,
    /// Faces whose UV area is (numerically) zero.
    pub degenerate_faces: usize,
    /// Total 3D area of the faces.
    pub surface_area: f64,
    /// Total unsigned UV area of the faces.
    pub uv_area: f64,
    /// Mean of `uv_area / surface_area` over faces with non-zero 3D area,
    /// after scaling UV area so the two totals match. 1.0 means every face
    /// kept its share of the surface.
    pub mean_area_ratio: f64,
}

impl DistortionStats {
    /// Whether no face is flipped or collapsed.
    pub fn is_injective_locally(&self) -> bool {
        self.flipped_faces == 0 && self.degenerate_faces == 0
    }
}

/// Measure the flattening of `faces`.
pub fn distortion_stats(mesh: &HalfEdgeMesh, uvs: &UVMap, faces: &[FaceId]) -> DistortionStats {
    let mut stats = DistortionStats::default();
    let mut areas = Vec::with_capacity(faces.len());

    for &f in faces {
        let surface = mesh.face_area(f);
        let signed = uvs.signed_area(mesh.face_vertices(f));

        if signed.abs() <= EDGE_EPSILON * EDGE_EPSILON {
            stats.degenerate_faces += 1;
        } else if signed < 0.0 {
            stats.flipped_faces += 1;
        }

        stats.surface_area += surface;
        stats.uv_area += signed.abs();
        areas.push((surface, signed.abs()));
    }

    if stats.uv_area > 0.0 && stats.surface_area > 0.0 {
        let scale = stats.surface_area / stats.uv_area;
        let ratios: Vec<f64> = areas
            .iter()
            .filter(|(surface, _)| *surface > 0.0)
            .map(|(surface, uv)| uv * scale / surface)
            .collect();
        if !ratios.is_empty() {
            stats.mean_area_ratio = ratios.iter().sum::<f64>() / ratios.len() as f64;
        }
    }

    stats
}
