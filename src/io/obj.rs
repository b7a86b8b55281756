//! Wavefront OBJ format support.
//!
//! Only geometry is read: `v` and `f` records. Texture coordinates, normals,
//! groups and materials in the input are ignored, since flattening produces its
//! own texture coordinates.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;

use super::TriangleSoup;
use crate::algo::parameterize::UVMap;
use crate::error::{FlattenError, Result};
use crate::mesh::{to_face_vertex, HalfEdgeMesh};

/// Load a triangle soup from an OBJ file.
///
/// # Example
///
/// ```no_run
/// use uvflat::io::obj;
///
/// let soup = obj::load("model.obj").unwrap();
/// println!("{} triangles", soup.faces.len());
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<TriangleSoup> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let soup = parse(BufReader::new(file)).map_err(|message| FlattenError::load(path, message))?;

    if soup.faces.is_empty() {
        return Err(FlattenError::load(path, "OBJ file contains no faces"));
    }
    Ok(soup)
}

/// Parse OBJ text.
///
/// Face corners may be written `v`, `v/vt`, `v//vn` or `v/vt/vn`; negative
/// indices count back from the last vertex read so far. Errors carry the
/// 1-based line number.
pub fn parse<R: BufRead>(reader: R) -> std::result::Result<TriangleSoup, String> {
    let mut soup = TriangleSoup::default();
    let mut corners = Vec::new();

    for (n, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| e.to_string())?;
        let lineno = n + 1;
        let mut tokens = line.split_whitespace();

        match tokens.next() {
            Some("v") => {
                let mut coord = || -> std::result::Result<f64, String> {
                    let token = tokens
                        .next()
                        .ok_or_else(|| format!("line {}: vertex needs three coordinates", lineno))?;
                    token
                        .parse()
                        .map_err(|_| format!("line {}: bad coordinate '{}'", lineno, token))
                };
                let (x, y, z) = (coord()?, coord()?, coord()?);
                soup.positions.push(Point3::new(x, y, z));
            }
            Some("f") => {
                corners.clear();
                for token in tokens {
                    corners.push(resolve_index(token, soup.positions.len(), lineno)?);
                }
                if corners.len() < 3 {
                    return Err(format!(
                        "line {}: face needs at least three corners, got {}",
                        lineno,
                        corners.len()
                    ));
                }
                soup.push_polygon(&corners);
            }
            _ => {}
        }
    }

    Ok(soup)
}

/// Turn one face corner into a 0-based vertex index.
fn resolve_index(token: &str, num_vertices: usize, lineno: usize) -> std::result::Result<usize, String> {
    let vertex = token.split('/').next().unwrap_or(token);
    let raw: i64 = vertex
        .parse()
        .map_err(|_| format!("line {}: bad face index '{}'", lineno, token))?;

    let resolved = match raw {
        0 => None,
        r if r > 0 => Some(r as usize - 1),
        r => num_vertices.checked_sub(r.unsigned_abs() as usize),
    };

    resolved
        .filter(|&i| i < num_vertices)
        .ok_or_else(|| format!("line {}: face index {} out of range", lineno, raw))
}

/// Save a mesh and one texture coordinate per vertex to an OBJ file.
pub fn save_with_uvs<P: AsRef<Path>>(mesh: &HalfEdgeMesh, uvs: &UVMap, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    write_with_uvs(mesh, uvs, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write OBJ text with `vt` records; vertex `i` uses texture coordinate `i`.
pub fn write_with_uvs<W: Write>(mesh: &HalfEdgeMesh, uvs: &UVMap, writer: &mut W) -> Result<()> {
    let (vertices, faces) = to_face_vertex(mesh);

    writeln!(writer, "# Generated by uvflat")?;
    writeln!(writer, "# {} vertices, {} faces", vertices.len(), faces.len())?;

    for v in &vertices {
        writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
    }
    for (_, uv) in uvs.iter() {
        writeln!(writer, "vt {} {}", uv.x, uv.y)?;
    }
    for f in &faces {
        let (a, b, c) = (f[0] + 1, f[1] + 1, f[2] + 1);
        writeln!(writer, "f {}/{} {}/{} {}/{}", a, a, b, b, c, c)?;
    }

    Ok(())
}
