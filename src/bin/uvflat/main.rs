//! uvflat CLI - flatten triangle meshes into UV space.
//!
//! Usage: uvflat <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `uvflat --help` for available commands.

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};

use uvflat::algo::parameterize::{distortion_stats, ConformalOptions, FlattenOptions};
use uvflat::io;
use uvflat::mesh::FaceId;
use uvflat::Flattener;

#[derive(Parser)]
#[command(name = "uvflat")]
#[command(author, version, about = "Planar UV flattening of triangle meshes", long_about = None)]
struct Cli {
    /// Log debug output (overrides the default filter; RUST_LOG still wins)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh information
    Info {
        /// Input mesh file
        input: PathBuf,
    },

    /// Flatten a mesh and write it with texture coordinates
    Flatten {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file (.obj or .ply)
        output: PathBuf,

        /// Number of smoothing iterations
        #[arg(short, long, default_value = "20")]
        iterations: usize,

        /// Smoothing blend factor (0.0 to 1.0)
        #[arg(short, long, default_value = "0.5")]
        blend: f64,

        /// Keep raw unfolded coordinates instead of fitting the unit square
        #[arg(long)]
        no_normalize: bool,

        /// Smooth with multiple threads
        #[arg(long)]
        parallel: bool,

        /// Seam edge as two vertex indices, e.g. `--seam 3,7` (repeatable)
        #[arg(long = "seam", value_name = "V1,V2", value_parser = parse_seam)]
        seams: Vec<(usize, usize)>,
    },
}

fn parse_seam(s: &str) -> Result<(usize, usize), String> {
    let (a, b) = s
        .split_once(',')
        .ok_or_else(|| format!("expected V1,V2 but got '{}'", s))?;
    let parse = |t: &str| {
        t.trim()
            .parse::<usize>()
            .map_err(|e| format!("bad vertex index '{}': {}", t, e))
    };
    Ok((parse(a)?, parse(b)?))
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { input } => {
            cmd_info(&input)?;
        }

        Commands::Flatten {
            input,
            output,
            iterations,
            blend,
            no_normalize,
            parallel,
            seams,
        } => {
            let options = FlattenOptions {
                smoothing: ConformalOptions::default()
                    .with_iterations(iterations)
                    .with_blend(blend)
                    .with_parallel(parallel),
                normalize: !no_normalize,
            };
            cmd_flatten(&input, &output, options, &seams)?;
        }
    }

    Ok(())
}

fn cmd_info(input: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = io::load(input)?;

    println!("File: {}", input.display());
    println!("Vertices: {}", mesh.num_vertices());
    println!("Faces: {}", mesh.num_faces());
    println!("Half-edges: {}", mesh.num_halfedges());

    let mut min_area = f64::MAX;
    let mut max_area = 0.0_f64;
    for fid in mesh.face_ids() {
        let area = mesh.face_area(fid);
        min_area = min_area.min(area);
        max_area = max_area.max(area);
    }

    println!("Surface area: {:.6}", mesh.surface_area());
    if mesh.num_faces() > 0 {
        println!("Face area range: [{:.6}, {:.6}]", min_area, max_area);
    }

    let boundary_edges = mesh.boundary_halfedges().count();
    if boundary_edges == 0 {
        println!("Topology: Closed (no boundary)");
    } else {
        println!(
            "Topology: Open ({} boundary edges, {} boundary vertices)",
            boundary_edges,
            mesh.num_boundary_vertices()
        );
    }

    let isolated = mesh
        .vertex_ids()
        .filter(|&v| !mesh.vertex_halfedge(v).is_valid())
        .count();
    if isolated > 0 {
        println!("Unreferenced vertices: {}", isolated);
    }

    Ok(())
}

fn cmd_flatten(
    input: &PathBuf,
    output: &PathBuf,
    options: FlattenOptions,
    seams: &[(usize, usize)],
) -> Result<(), Box<dyn std::error::Error>> {
    let soup = io::load_triangles(input)?;
    println!("Loaded: {} vertices, {} faces", soup.positions.len(), soup.faces.len());

    let mut flattener = Flattener::with_options(options)?;
    flattener.set_mesh_from_points(&soup.positions, &soup.faces)?;
    for &(a, b) in seams {
        flattener.add_seam_edge(a, b);
    }
    if !seams.is_empty() {
        println!("Recorded {} seam edges (not used for cutting)", flattener.seams().len());
    }

    let mode = if flattener.options().smoothing.parallel { "parallel" } else { "sequential" };
    println!(
        "Flattening ({} smoothing iterations, blend={}, {})...",
        flattener.options().smoothing.iterations,
        flattener.options().smoothing.blend,
        mode
    );

    let start = Instant::now();
    flattener.flatten()?;
    let elapsed = start.elapsed();

    let (Some(mesh), Some(uvs)) = (flattener.mesh(), flattener.uv_map()) else {
        return Err("flatten produced no result".into());
    };

    if let Some(stats) = flattener.last_stats() {
        println!(
            "Unfolded: {} of {} vertices placed, {} deferred, {} at origin",
            stats.placed, stats.piece_vertices, stats.deferred, stats.fallback
        );
    }

    let faces: Vec<FaceId> = mesh.face_ids().collect();
    let distortion = distortion_stats(mesh, uvs, &faces);
    println!(
        "Distortion: {} flipped, {} degenerate, mean area ratio {:.4}",
        distortion.flipped_faces, distortion.degenerate_faces, distortion.mean_area_ratio
    );

    io::save_with_uvs(mesh, uvs, output)?;
    println!("Saved: {} ({:.2?})", output.display(), elapsed);

    Ok(())
}
