//! Planar UV parameterization.
//!
//! A piece of a triangle mesh is flattened in three stages:
//!
//! - [`unfold_piece`]: breadth-first unfolding that keeps every edge of the
//!   faces it places at its true 3D length
//! - [`optimize_conformal`]: Laplacian relaxation in UV space that spreads the
//!   distortion accumulated by the greedy unfolding
//! - [`normalize_piece`]: uniform fit into the unit square
//!
//! [`flatten_piece`] runs all three. Nothing here fails: degenerate input is
//! absorbed and reported through [`UnfoldStats`] and the `log` facade.
//!
//! # Example
//!
//! ```
//! use uvflat::algo::parameterize::{flatten_piece, FlattenOptions};
//! use uvflat::mesh::{build_from_triangles, FaceId};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let mesh = build_from_triangles(&vertices, &[[0, 1, 2], [0, 2, 3]]).unwrap();
//! let faces: Vec<FaceId> = mesh.face_ids().collect();
//!
//! let piece = flatten_piece(&mesh, &faces, &FlattenOptions::default());
//! let (min, max) = piece.uvs.bounding_box().unwrap();
//! assert!(min.x >= 0.0 && min.y >= 0.0);
//! assert!((max.x - min.x).max(max.y - min.y) <= 1.0 + 1e-9);
//! ```

mod conformal;
mod distortion;
mod geometry;
mod normalize;
mod unfold;
mod uv;

pub use conformal::{one_ring, optimize_conformal, ConformalOptions};
pub use distortion::{distortion_stats, DistortionStats};
pub use geometry::{cross2, law_of_cosines, orient2d, EDGE_EPSILON, NORMALIZE_EPSILON};
pub use normalize::{normalize_piece, piece_bounds, piece_vertices};
pub use unfold::{unfold_piece, UnfoldStats};
pub use uv::UVMap;

use crate::error::Result;
use crate::mesh::{FaceId, HalfEdgeMesh};

/// Options for the whole flattening pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct FlattenOptions {
    /// Parameters of the smoothing pass.
    pub smoothing: ConformalOptions,

    /// Fit the result into the unit square (default: true).
    pub normalize: bool,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self {
            smoothing: ConformalOptions::default(),
            normalize: true,
        }
    }
}

impl FlattenOptions {
    /// Replace the smoothing parameters.
    pub fn with_smoothing(mut self, smoothing: ConformalOptions) -> Self {
        self.smoothing = smoothing;
        self
    }

    /// Set the number of smoothing rounds.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.smoothing.iterations = iterations;
        self
    }

    /// Set whether to normalize the result.
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Check every parameter.
    pub fn validate(&self) -> Result<()> {
        self.smoothing.validate()
    }
}

/// The flattened coordinates of one piece.
#[derive(Debug, Clone)]
pub struct FlattenedPiece {
    /// One UV per mesh vertex.
    pub uvs: UVMap,

    /// What the unfolding stage had to do.
    pub stats: UnfoldStats,

    /// Whether normalization was applied.
    pub normalized: bool,
}

/// Unfold, smooth and normalize the given faces.
pub fn flatten_piece(
    mesh: &HalfEdgeMesh,
    faces: &[FaceId],
    options: &FlattenOptions,
) -> FlattenedPiece {
    let (mut uvs, stats) = unfold_piece(mesh, faces);

    optimize_conformal(&mut uvs, mesh, faces, &options.smoothing);

    let normalized = options.normalize && normalize_piece(&mut uvs, mesh, faces);

    FlattenedPiece {
        uvs,
        stats,
        normalized,
    }
}
