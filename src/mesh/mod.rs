//! Core mesh data structures.
//!
//! This module provides the half-edge mesh representation used by the
//! flattening pipeline.
//!
//! # Overview
//!
//! [`HalfEdgeMesh`] stores positions, triangles, one directed half-edge per
//! triangle corner and a per-vertex boundary flag. Elements refer to each other
//! through the index types [`VertexId`], [`HalfEdgeId`] and [`FaceId`]; the
//! invalid index marks a missing twin.
//!
//! # Construction
//!
//! ```
//! use uvflat::mesh::{build_from_triangles, VertexId};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2]];
//!
//! let mesh = build_from_triangles(&vertices, &faces).unwrap();
//! assert!(mesh.is_boundary_vertex(VertexId::new(0)));
//! ```

mod boundary;
mod builder;
mod edge;
mod halfedge;
mod index;

pub use boundary::classify_boundary;
pub use builder::{build_from_triangles, from_flat_buffers, to_face_vertex};
pub use edge::EdgeKey;
pub use halfedge::{HalfEdge, HalfEdgeMesh};
pub use index::{FaceId, HalfEdgeId, VertexId};
