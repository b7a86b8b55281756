//! Error types for uvflat.
//!
//! Only a handful of conditions are reported as errors. Numerical degeneracies met
//! while flattening (near-zero edges, unreachable vertices, collapsed bounding boxes)
//! are absorbed by the algorithms and never show up here.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`FlattenError`].
pub type Result<T> = std::result::Result<T, FlattenError>;

/// Errors that can occur while loading or flattening a mesh.
#[derive(Error, Debug)]
pub enum FlattenError {
    /// The mesh has no vertices or no faces.
    #[error("empty mesh ({vertices} vertices, {faces} faces)")]
    EmptyMesh {
        /// Number of vertices loaded.
        vertices: usize,
        /// Number of faces loaded.
        faces: usize,
    },

    /// A flat input buffer does not hold a whole number of records.
    #[error("{name} buffer has length {len}, which is not a multiple of {stride}")]
    MalformedBuffer {
        /// Which buffer was malformed.
        name: &'static str,
        /// The buffer length.
        len: usize,
        /// Expected record size.
        stride: usize,
    },

    /// A face references a vertex index outside the vertex buffer.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading a mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving a mesh to file.
    #[error("failed to save mesh to {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },
}

impl FlattenError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        FlattenError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Build a load error for `path`.
    pub(crate) fn load<P: Into<PathBuf>, M: ToString>(path: P, message: M) -> Self {
        FlattenError::LoadError {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_mesh_message() {
        let err = FlattenError::EmptyMesh { vertices: 0, faces: 0 };
        assert_eq!(err.to_string(), "empty mesh (0 vertices, 0 faces)");
    }

    #[test]
    fn test_invalid_param() {
        let err = FlattenError::invalid_param("blend", 1.5, "must be in [0, 1]");
        assert_eq!(
            err.to_string(),
            "invalid parameter: blend = 1.5 (must be in [0, 1])"
        );
    }
}
