//! PLY (Stanford polygon) format support.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use nalgebra::Point3;
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};

use super::TriangleSoup;
use crate::algo::parameterize::UVMap;
use crate::error::{FlattenError, Result};
use crate::mesh::{to_face_vertex, HalfEdgeMesh};

/// Load a triangle soup from a PLY file.
///
/// # Example
///
/// ```no_run
/// use uvflat::io::ply;
///
/// let soup = ply::load("model.ply").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<TriangleSoup> {
    let path = path.as_ref();
    let file = File::open(path)?;
    read(&mut BufReader::new(file)).map_err(|message| FlattenError::load(path, message))
}

/// Read PLY data (ASCII or binary) from any reader.
pub fn read<R: Read>(reader: &mut R) -> std::result::Result<TriangleSoup, String> {
    let parser = Parser::<DefaultElement>::new();
    let ply = parser.read_ply(reader).map_err(|e| e.to_string())?;

    let vertex_element = ply
        .payload
        .get("vertex")
        .ok_or("PLY file has no vertex element")?;

    let mut soup = TriangleSoup::default();
    soup.positions.reserve(vertex_element.len());
    for vertex in vertex_element {
        let coord = |name: &str| {
            get_float_property(vertex, name).ok_or_else(|| format!("vertex missing {} coordinate", name))
        };
        soup.positions.push(Point3::new(coord("x")?, coord("y")?, coord("z")?));
    }

    let face_element = ply.payload.get("face").ok_or("PLY file has no face element")?;

    for face in face_element {
        let indices = get_list_property(face, "vertex_indices")
            .or_else(|| get_list_property(face, "vertex_index"))
            .ok_or("face missing vertex_indices property")?;
        soup.push_polygon(&indices);
    }

    if soup.faces.is_empty() {
        return Err("PLY file contains no faces".to_string());
    }

    Ok(soup)
}

fn get_float_property(element: &DefaultElement, name: &str) -> Option<f64> {
    match element.get(name)? {
        Property::Float(v) => Some(*v as f64),
        Property::Double(v) => Some(*v),
        Property::Int(v) => Some(*v as f64),
        Property::UInt(v) => Some(*v as f64),
        Property::Short(v) => Some(*v as f64),
        Property::UShort(v) => Some(*v as f64),
        Property::Char(v) => Some(*v as f64),
        Property::UChar(v) => Some(*v as f64),
        _ => None,
    }
}

fn get_list_property(element: &DefaultElement, name: &str) -> Option<Vec<usize>> {
    match element.get(name)? {
        Property::ListInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        _ => None,
    }
}

/// Save a mesh to an ASCII PLY file with per-vertex `s`/`t` texture coordinates.
pub fn save_with_uvs<P: AsRef<Path>>(mesh: &HalfEdgeMesh, uvs: &UVMap, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    write_with_uvs(mesh, uvs, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write ASCII PLY text with per-vertex texture coordinates.
pub fn write_with_uvs<W: Write>(mesh: &HalfEdgeMesh, uvs: &UVMap, writer: &mut W) -> Result<()> {
    let (vertices, faces) = to_face_vertex(mesh);

    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "comment Generated by uvflat")?;
    writeln!(writer, "element vertex {}", vertices.len())?;
    writeln!(writer, "property double x")?;
    writeln!(writer, "property double y")?;
    writeln!(writer, "property double z")?;
    writeln!(writer, "property double s")?;
    writeln!(writer, "property double t")?;
    writeln!(writer, "element face {}", faces.len())?;
    writeln!(writer, "property list uchar int vertex_indices")?;
    writeln!(writer, "end_header")?;

    for (v, (_, uv)) in vertices.iter().zip(uvs.iter()) {
        writeln!(writer, "{} {} {} {} {}", v.x, v.y, v.z, uv.x, uv.y)?;
    }
    for f in &faces {
        writeln!(writer, "3 {} {} {}", f[0], f[1], f[2])?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use nalgebra::Point2;

    use super::*;

    const QUAD: &str = "\
ply
format ascii 1.0
element vertex 4
property float x
property float y
property float z
element face 1
property list uchar int vertex_indices
end_header
0 0 0
1 0 0
1 1 0
0 1 0
4 0 1 2 3
";

    #[test]
    fn test_read_ascii_quad() {
        let soup = read(&mut QUAD.as_bytes()).unwrap();
        assert_eq!(soup.positions.len(), 4);
        assert_eq!(soup.positions[2], Point3::new(1.0, 1.0, 0.0));
        assert_eq!(soup.faces, vec![[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn test_write_reads_back() {
        let soup = read(&mut QUAD.as_bytes()).unwrap();
        let mesh = soup.to_mesh().unwrap();
        let uvs = UVMap::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ]);

        let mut out = Vec::new();
        write_with_uvs(&mesh, &uvs, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("property double s"));
        assert!(text.contains("1 1 0 1 1"));

        let back = read(&mut text.as_bytes()).unwrap();
        assert_eq!(back.positions, soup.positions);
        assert_eq!(back.faces, soup.faces);
    }
}
