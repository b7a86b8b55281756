//! Flatten a synthetic bent sheet and write it as an OBJ with texture coordinates.
//!
//! Usage: cargo run --example flatten_grid -- [OUTPUT] [N]

use std::path::PathBuf;

use nalgebra::Point3;
use uvflat::algo::parameterize::distortion_stats;
use uvflat::io;
use uvflat::prelude::*;

/// An `n` x `n` sheet rolled a quarter turn around the y axis.
fn bent_sheet(n: usize) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let radius = 2.0;
    let mut vertices = Vec::new();
    let mut faces = Vec::new();

    for j in 0..=n {
        for i in 0..=n {
            let theta = std::f64::consts::FRAC_PI_2 * i as f64 / n as f64;
            let y = 3.0 * j as f64 / n as f64;
            vertices.push(Point3::new(radius * theta.cos(), y, radius * theta.sin()));
        }
    }
    for j in 0..n {
        for i in 0..n {
            let v00 = j * (n + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + (n + 1);
            let v11 = v01 + 1;
            faces.push([v00, v10, v11]);
            faces.push([v00, v11, v01]);
        }
    }

    (vertices, faces)
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let output = PathBuf::from(args.next().unwrap_or_else(|| "bent_sheet.obj".to_string()));
    let n: usize = match args.next() {
        Some(s) => s.parse()?,
        None => 24,
    };

    let (vertices, faces) = bent_sheet(n);
    println!("Sheet: {} vertices, {} faces", vertices.len(), faces.len());

    let mut flattener = Flattener::new();
    flattener.set_mesh_from_points(&vertices, &faces)?;
    flattener.flatten()?;

    let (Some(mesh), Some(uvs)) = (flattener.mesh(), flattener.uv_map()) else {
        return Err("no result".into());
    };

    let piece: Vec<FaceId> = mesh.face_ids().collect();
    let stats = distortion_stats(mesh, uvs, &piece);
    println!(
        "Flipped: {}, degenerate: {}, mean area ratio: {:.4}",
        stats.flipped_faces, stats.degenerate_faces, stats.mean_area_ratio
    );

    io::save_with_uvs(mesh, uvs, &output)?;
    println!("Wrote {}", output.display());
    Ok(())
}
