//! Mesh file I/O.
//!
//! Loading produces a plain [`TriangleSoup`] (positions plus index triples),
//! which is what [`Flattener::set_mesh_from_points`](crate::Flattener::set_mesh_from_points)
//! and [`build_from_triangles`] take. Polygons are fan-triangulated on load.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save with UVs | Notes |
//! |--------|-----------|------|---------------|-------|
//! | Wavefront OBJ | `.obj` | ✓ | ✓ | `vt` records, `f v/vt` faces |
//! | PLY | `.ply` | ✓ | ✓ | ASCII output with `s`/`t` vertex properties |
//! | STL | `.stl` | ✓ | ✗ | Binary and ASCII; no texture coordinates |
//!
//! # Usage
//!
//! ```no_run
//! use uvflat::io::{load_triangles, save_with_uvs};
//! use uvflat::Flattener;
//!
//! let soup = load_triangles("model.obj").unwrap();
//!
//! let mut flattener = Flattener::new();
//! flattener.set_mesh_from_points(&soup.positions, &soup.faces).unwrap();
//! flattener.flatten().unwrap();
//!
//! let mesh = flattener.mesh().unwrap();
//! let uvs = flattener.uv_map().unwrap();
//! save_with_uvs(mesh, uvs, "flat.obj").unwrap();
//! ```

pub mod obj;
pub mod ply;
pub mod stl;

use std::path::Path;

use nalgebra::Point3;

use crate::algo::parameterize::UVMap;
use crate::error::{FlattenError, Result};
use crate::mesh::{build_from_triangles, HalfEdgeMesh};

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Wavefront OBJ format.
    Obj,
    /// STL (stereolithography) format.
    Stl,
    /// PLY (Stanford polygon) format.
    Ply,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "obj" => Some(Format::Obj),
            "stl" => Some(Format::Stl),
            "ply" => Some(Format::Ply),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }

    fn detect(path: &Path) -> Result<Format> {
        Format::from_path(path).ok_or_else(|| FlattenError::UnsupportedFormat {
            extension: path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("(none)")
                .to_string(),
        })
    }
}

/// Vertex positions and triangles as read from a file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleSoup {
    /// Vertex positions.
    pub positions: Vec<Point3<f64>>,
    /// Triangles as vertex index triples.
    pub faces: Vec<[usize; 3]>,
}

impl TriangleSoup {
    /// Add a polygon, fan-triangulating it around its first corner.
    ///
    /// Polygons with fewer than three corners are dropped.
    pub fn push_polygon(&mut self, corners: &[usize]) {
        if corners.len() < 3 {
            return;
        }
        for i in 1..corners.len() - 1 {
            self.faces.push([corners[0], corners[i], corners[i + 1]]);
        }
    }

    /// Build the half-edge topology.
    pub fn to_mesh(&self) -> Result<HalfEdgeMesh> {
        build_from_triangles(&self.positions, &self.faces)
    }
}

/// Load a triangle soup from a file with automatic format detection.
///
/// The format is determined by the file extension.
pub fn load_triangles<P: AsRef<Path>>(path: P) -> Result<TriangleSoup> {
    let path = path.as_ref();
    let soup = match Format::detect(path)? {
        Format::Obj => obj::load(path)?,
        Format::Stl => stl::load(path)?,
        Format::Ply => ply::load(path)?,
    };

    log::debug!(
        "read {}: {} vertices, {} triangles",
        path.display(),
        soup.positions.len(),
        soup.faces.len()
    );
    Ok(soup)
}

/// Load a file straight into a half-edge mesh.
pub fn load<P: AsRef<Path>>(path: P) -> Result<HalfEdgeMesh> {
    load_triangles(path)?.to_mesh()
}

/// Save a mesh with texture coordinates, choosing the format by extension.
///
/// STL has no place for texture coordinates and is rejected.
pub fn save_with_uvs<P: AsRef<Path>>(mesh: &HalfEdgeMesh, uvs: &UVMap, path: P) -> Result<()> {
    let path = path.as_ref();
    if uvs.len() != mesh.num_vertices() {
        return Err(FlattenError::SaveError {
            path: path.to_path_buf(),
            message: format!(
                "{} texture coordinates for {} vertices",
                uvs.len(),
                mesh.num_vertices()
            ),
        });
    }

    match Format::detect(path)? {
        Format::Obj => obj::save_with_uvs(mesh, uvs, path),
        Format::Ply => ply::save_with_uvs(mesh, uvs, path),
        Format::Stl => Err(FlattenError::SaveError {
            path: path.to_path_buf(),
            message: "STL cannot store texture coordinates".to_string(),
        }),
    }
}
