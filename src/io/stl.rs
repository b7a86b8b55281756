//! STL (stereolithography) format support.
//!
//! STL stores every triangle with its own corners. `stl_io` merges corners with
//! identical coordinates, which is what gives the flattener a connected mesh.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use nalgebra::Point3;

use super::TriangleSoup;
use crate::error::{FlattenError, Result};

/// Load a triangle soup from an STL file.
///
/// Automatically detects binary vs ASCII format. Triangles that collapse onto
/// a repeated corner after welding are dropped.
///
/// # Example
///
/// ```no_run
/// use uvflat::io::stl;
///
/// let soup = stl::load("model.stl").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<TriangleSoup> {
    let path = path.as_ref();
    let file = File::open(path)?;
    read(&mut BufReader::new(file)).map_err(|message| FlattenError::load(path, message))
}

/// Read STL data from any seekable reader.
pub fn read<R: Read + Seek>(reader: &mut R) -> std::result::Result<TriangleSoup, String> {
    let stl = stl_io::read_stl(reader).map_err(|e| e.to_string())?;

    let positions: Vec<Point3<f64>> = stl
        .vertices
        .iter()
        .map(|v| Point3::new(v[0] as f64, v[1] as f64, v[2] as f64))
        .collect();

    let mut faces = Vec::with_capacity(stl.faces.len());
    let mut dropped = 0;
    for tri in &stl.faces {
        let [i0, i1, i2] = tri.vertices;
        if i0 != i1 && i1 != i2 && i0 != i2 {
            faces.push([i0, i1, i2]);
        } else {
            dropped += 1;
        }
    }

    if dropped > 0 {
        log::warn!("dropped {} STL triangles with repeated corners", dropped);
    }
    if faces.is_empty() {
        return Err("STL file contains no valid triangles".to_string());
    }

    Ok(TriangleSoup { positions, faces })
}
