//! # uvflat
//!
//! Planar UV flattening of triangle meshes.
//!
//! uvflat builds a half-edge topology over a triangle soup, unfolds it into the
//! plane face by face while keeping true edge lengths, relaxes the result with a
//! conformal-style smoothing pass and fits it into the unit square.
//!
//! ## Features
//!
//! - **Half-edge topology**: index-based arena with type-safe ids and boundary flags
//! - **Length-preserving unfolding**: breadth-first law-of-cosines placement
//! - **Conformal smoothing**: Jacobi Laplacian relaxation, optionally parallel
//! - **Sessions**: a caller-owned [`Flattener`] taking flat buffers in and out
//! - **File formats**: OBJ, PLY and STL input, OBJ output with texture coordinates
//!
//! ## Quick Start
//!
//! ```
//! use uvflat::prelude::*;
//!
//! // A unit square split along its diagonal
//! let vertices = [
//!     0.0, 0.0, 0.0, //
//!     1.0, 0.0, 0.0, //
//!     1.0, 1.0, 0.0, //
//!     0.0, 1.0, 0.0,
//! ];
//! let faces = [0, 1, 2, 0, 2, 3];
//!
//! let mut flattener = Flattener::new();
//! flattener.set_mesh(&vertices, &faces).unwrap();
//! flattener.flatten().unwrap();
//!
//! for (i, uv) in flattener.uv_coords().chunks(2).enumerate() {
//!     println!("vertex {}: u={:.3}, v={:.3}", i, uv[0], uv[1]);
//! }
//! ```
//!
//! ## Working on Pieces
//!
//! The pipeline stages are usable on their own, over any subset of faces:
//!
//! ```
//! use uvflat::prelude::*;
//! use uvflat::algo::parameterize::{distortion_stats, flatten_piece};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//! let faces = vec![[0, 1, 3], [1, 2, 3]];
//!
//! let mesh = build_from_triangles(&vertices, &faces).unwrap();
//! let piece: Vec<FaceId> = mesh.face_ids().collect();
//!
//! let options = FlattenOptions::default().with_iterations(0);
//! let flat = flatten_piece(&mesh, &piece, &options);
//! let stats = distortion_stats(&mesh, &flat.uvs, &piece);
//! assert_eq!(stats.flipped_faces, 0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;
pub mod seams;
pub mod session;

pub use session::Flattener;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use uvflat::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::parameterize::{ConformalOptions, FlattenOptions, UVMap};
    pub use crate::error::{FlattenError, Result};
    pub use crate::mesh::{
        build_from_triangles, from_flat_buffers, EdgeKey, FaceId, HalfEdgeId, HalfEdgeMesh,
        VertexId,
    };
    pub use crate::seams::SeamSet;
    pub use crate::session::Flattener;
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use nalgebra::Point3;

    #[test]
    fn test_closed_tetrahedron_flattens() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];

        let faces = vec![
            [0, 2, 1], // bottom
            [0, 1, 3], // front
            [1, 2, 3], // right
            [2, 0, 3], // left
        ];

        let mut flattener = Flattener::new();
        flattener.set_mesh_from_points(&vertices, &faces).unwrap();

        let mesh = flattener.mesh().unwrap();
        assert!(mesh.is_valid());
        assert_eq!(mesh.num_boundary_vertices(), 0);

        // A closed surface cannot lie flat, but every vertex still gets a finite UV
        flattener.flatten().unwrap();
        assert_eq!(flattener.uv_count(), 4);
        assert!(flattener.uv_map().unwrap().is_finite());
        assert_eq!(flattener.last_stats().unwrap().fallback, 0);
    }
}
