//! Conformal smoothing of an unfolded piece.
//!
//! A Laplacian relaxation in UV space: each round pulls every vertex towards
//! the mean of its one-ring neighbours. This evens out the angle and area
//! distortion the greedy unfolding accumulates, without solving a linear
//! system. It is a heuristic; true discrete-conformal energy is not minimized.
//!
//! Every round reads only the previous round's coordinates (Jacobi update), so
//! the result does not depend on vertex order and the parallel and sequential
//! paths agree exactly.

use nalgebra::{Point2, Vector2};
use rayon::prelude::*;

use crate::error::{FlattenError, Result};
use crate::mesh::{FaceId, HalfEdgeMesh, VertexId};

use super::uv::UVMap;

/// Options for the conformal smoothing pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ConformalOptions {
    /// Number of relaxation rounds.
    pub iterations: usize,

    /// Weight of the neighbour mean, in [0, 1]. 0 keeps the old position.
    pub blend: f64,

    /// Vertices with fewer neighbours than this are left where they are.
    pub min_neighbors: usize,

    /// Whether to use parallel execution (default: false).
    pub parallel: bool,
}

impl Default for ConformalOptions {
    fn default() -> Self {
        Self {
            iterations: 20,
            blend: 0.5,
            min_neighbors: 2,
            parallel: false,
        }
    }
}

impl ConformalOptions {
    /// Set the number of relaxation rounds.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the blend factor.
    pub fn with_blend(mut self, blend: f64) -> Self {
        self.blend = blend;
        self
    }

    /// Set the minimum neighbour count for a vertex to move.
    pub fn with_min_neighbors(mut self, min_neighbors: usize) -> Self {
        self.min_neighbors = min_neighbors;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Check that the options describe a usable relaxation.
    pub fn validate(&self) -> Result<()> {
        if !self.blend.is_finite() || !(0.0..=1.0).contains(&self.blend) {
            return Err(FlattenError::invalid_param(
                "blend",
                self.blend,
                "must be a finite value in [0, 1]",
            ));
        }
        Ok(())
    }
}

/// Deduplicated, sorted neighbours of every vertex, restricted to `faces`.
///
/// Vertices outside the faces get an empty list.
pub fn one_ring(mesh: &HalfEdgeMesh, faces: &[FaceId]) -> Vec<Vec<VertexId>> {
    let mut rings: Vec<Vec<VertexId>> = vec![Vec::new(); mesh.num_vertices()];

    for &f in faces {
        let tri = mesh.face_vertices(f);
        for i in 0..3 {
            let ring = &mut rings[tri[i].index()];
            ring.push(tri[(i + 1) % 3]);
            ring.push(tri[(i + 2) % 3]);
        }
    }

    for (v, ring) in rings.iter_mut().enumerate() {
        ring.sort_unstable();
        ring.dedup();
        // A face with a repeated corner would list the vertex as its own neighbour
        ring.retain(|n| n.index() != v);
    }

    rings
}

/// Relax `uvs` in place over the vertices of `faces`.
///
/// # Algorithm
///
/// For each round, every vertex with at least `min_neighbors` neighbours moves to
/// `(1 - blend) * old + blend * mean(neighbours)`, where both `old` and the
/// neighbour positions come from the previous round's snapshot.
///
/// # Example
///
/// ```
/// use uvflat::algo::parameterize::{optimize_conformal, ConformalOptions, UVMap};
/// use uvflat::mesh::{build_from_triangles, FaceId, VertexId};
/// use nalgebra::{Point2, Point3};
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let mesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
/// let mut uvs = UVMap::new(vec![
///     Point2::new(0.0, 0.0),
///     Point2::new(1.0, 0.0),
///     Point2::new(0.0, 1.0),
/// ]);
///
/// let options = ConformalOptions::default().with_iterations(1);
/// optimize_conformal(&mut uvs, &mesh, &[FaceId::new(0)], &options);
/// assert!((uvs.get(VertexId::new(0)).x - 0.25).abs() < 1e-12);
/// ```
pub fn optimize_conformal(
    uvs: &mut UVMap,
    mesh: &HalfEdgeMesh,
    faces: &[FaceId],
    options: &ConformalOptions,
) {
    if options.iterations == 0 || faces.is_empty() {
        return;
    }

    let rings = one_ring(mesh, faces);
    let movable = rings
        .iter()
        .filter(|ring| !ring.is_empty() && ring.len() >= options.min_neighbors)
        .count();

    let mut current: Vec<Point2<f64>> = uvs.as_slice().to_vec();

    for _ in 0..options.iterations {
        let snapshot = &current;
        let step = |(i, ring): (usize, &Vec<VertexId>)| {
            relax_vertex(snapshot, i, ring, options)
        };

        let next: Vec<Point2<f64>> = if options.parallel {
            rings.par_iter().enumerate().map(step).collect()
        } else {
            rings.iter().enumerate().map(step).collect()
        };

        current = next;
    }

    *uvs = UVMap::new(current);

    log::debug!(
        "conformal smoothing: {} rounds over {} movable vertices (blend {})",
        options.iterations,
        movable,
        options.blend
    );
}

fn relax_vertex(
    snapshot: &[Point2<f64>],
    i: usize,
    ring: &[VertexId],
    options: &ConformalOptions,
) -> Point2<f64> {
    let old = snapshot[i];
    if ring.is_empty() || ring.len() < options.min_neighbors {
        return old;
    }

    let sum = ring
        .iter()
        .fold(Vector2::zeros(), |acc, n| acc + snapshot[n.index()].coords);
    let mean = sum / ring.len() as f64;

    Point2::from(old.coords * (1.0 - options.blend) + mean * options.blend)
}
