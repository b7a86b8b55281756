//! The caller-owned flattening session.
//!
//! A [`Flattener`] holds one loaded mesh, its seam set and the result of the
//! last flatten. Loading a mesh replaces all of it. A session is plain owned
//! data: it is `Send` but not meant to be shared, and every call runs to
//! completion before returning.
//!
//! # Example
//!
//! ```
//! use uvflat::Flattener;
//!
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
//! assert_eq!(flattener.uv_count(), 4);
//! assert_eq!(flattener.uv_coords().len(), 8);
//! ```

use nalgebra::Point3;

use crate::algo::parameterize::{flatten_piece, FlattenOptions, UVMap, UnfoldStats};
use crate::error::{FlattenError, Result};
use crate::mesh::{build_from_triangles, from_flat_buffers, FaceId, HalfEdgeMesh, VertexId};
use crate::seams::SeamSet;

/// A flattening session.
#[derive(Debug, Clone, Default)]
pub struct Flattener {
    options: FlattenOptions,
    mesh: Option<HalfEdgeMesh>,
    seams: SeamSet,
    uv_map: Option<UVMap>,
    uv_coords: Vec<f64>,
    stats: Option<UnfoldStats>,
    last_error: Option<String>,
}

impl Flattener {
    /// Create a session with default options and no mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session with the given options.
    pub fn with_options(options: FlattenOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options,
            ..Self::default()
        })
    }

    /// The options used by [`flatten`](Self::flatten).
    pub fn options(&self) -> &FlattenOptions {
        &self.options
    }

    /// Replace the options. The current result is kept until the next flatten.
    pub fn set_options(&mut self, options: FlattenOptions) -> Result<()> {
        options.validate()?;
        self.options = options;
        Ok(())
    }

    /// Load a mesh from flat buffers: `[x0, y0, z0, x1, ...]` and
    /// `[a0, b0, c0, a1, ...]`.
    ///
    /// Both buffers are copied. On success all previous state (topology, seams,
    /// result, error) is discarded. On failure the session is left without a
    /// mesh and the error message is stored.
    pub fn set_mesh(&mut self, vertices: &[f64], faces: &[u32]) -> Result<()> {
        let built = from_flat_buffers(vertices, faces);
        self.install(built)
    }

    /// Load a mesh from typed points and index triples.
    pub fn set_mesh_from_points(
        &mut self,
        vertices: &[Point3<f64>],
        faces: &[[usize; 3]],
    ) -> Result<()> {
        let built = build_from_triangles(vertices, faces);
        self.install(built)
    }

    fn install(&mut self, built: Result<HalfEdgeMesh>) -> Result<()> {
        self.reset();

        match built {
            Ok(mesh) => {
                log::debug!(
                    "loaded mesh: {} vertices, {} faces, {} boundary vertices",
                    mesh.num_vertices(),
                    mesh.num_faces(),
                    mesh.num_boundary_vertices()
                );
                self.mesh = Some(mesh);
                Ok(())
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    fn reset(&mut self) {
        self.mesh = None;
        self.seams.clear();
        self.clear_result();
        self.last_error = None;
    }

    fn clear_result(&mut self) {
        self.uv_map = None;
        self.uv_coords.clear();
        self.stats = None;
    }

    /// Mark the edge between two vertices as a seam.
    ///
    /// Returns `false` if it was already marked, or if an index cannot be a
    /// vertex id at all (`u32::MAX` and above). Indices are otherwise not
    /// checked against the mesh. Seams are recorded but do not yet affect
    /// flattening.
    pub fn add_seam_edge(&mut self, v1: usize, v2: usize) -> bool {
        let (Some(a), Some(b)) = (VertexId::try_new(v1), VertexId::try_new(v2)) else {
            log::warn!("ignoring seam ({}, {}): index out of range", v1, v2);
            return false;
        };
        self.seams.add(a, b)
    }

    /// Remove every seam.
    pub fn clear_seams(&mut self) {
        self.seams.clear();
    }

    /// The recorded seams.
    pub fn seams(&self) -> &SeamSet {
        &self.seams
    }

    /// Flatten the loaded mesh.
    ///
    /// Fails with [`FlattenError::EmptyMesh`] when no mesh is loaded or it has no
    /// vertices or no faces; the message is kept in
    /// [`last_error`](Self::last_error) and the result is cleared. Every other
    /// degeneracy is absorbed, so a non-empty mesh always flattens.
    pub fn flatten(&mut self) -> Result<()> {
        self.clear_result();

        let mesh = match &self.mesh {
            Some(mesh) if !mesh.is_empty() => mesh,
            other => {
                let (vertices, faces) = other
                    .as_ref()
                    .map_or((0, 0), |m| (m.num_vertices(), m.num_faces()));
                let err = FlattenError::EmptyMesh { vertices, faces };
                log::warn!("flatten rejected: {}", err);
                self.last_error = Some(err.to_string());
                return Err(err);
            }
        };

        if !self.seams.is_empty() {
            log::debug!("{} seam edges recorded; flattening as one piece", self.seams.len());
        }

        let faces: Vec<FaceId> = mesh.face_ids().collect();
        let piece = flatten_piece(mesh, &faces, &self.options);

        log::info!(
            "flattened {} faces into {} UVs ({} fallback vertices)",
            faces.len(),
            piece.uvs.len(),
            piece.stats.fallback
        );

        self.uv_coords = piece.uvs.to_flat();
        self.uv_map = Some(piece.uvs);
        self.stats = Some(piece.stats);
        self.last_error = None;
        Ok(())
    }

    /// The last result as `[u0, v0, u1, v1, ...]`, one pair per input vertex.
    /// Empty before the first successful flatten.
    pub fn uv_coords(&self) -> &[f64] {
        &self.uv_coords
    }

    /// Number of UV pairs in [`uv_coords`](Self::uv_coords).
    pub fn uv_count(&self) -> usize {
        self.uv_coords.len() / 2
    }

    /// The last result as a [`UVMap`].
    pub fn uv_map(&self) -> Option<&UVMap> {
        self.uv_map.as_ref()
    }

    /// Message of the last failed load or flatten.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The loaded mesh.
    pub fn mesh(&self) -> Option<&HalfEdgeMesh> {
        self.mesh.as_ref()
    }

    /// Unfolding counters of the last successful flatten.
    pub fn last_stats(&self) -> Option<&UnfoldStats> {
        self.stats.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::parameterize::{distortion_stats, ConformalOptions};

    fn equilateral() -> (Vec<f64>, Vec<u32>) {
        let h = 3.0_f64.sqrt() / 2.0;
        (
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.5, h, 0.0],
            vec![0, 1, 2],
        )
    }

    fn grid(n: usize) -> (Vec<f64>, Vec<u32>) {
        let mut vertices = Vec::new();
        let mut faces = Vec::new();
        for j in 0..=n {
            for i in 0..=n {
                let x = i as f64 / n as f64;
                let y = j as f64 / n as f64;
                vertices.extend([x * 2.0, y, 0.3 * (x * 3.0).sin()]);
            }
        }
        let n = n as u32;
        for j in 0..n {
            for i in 0..n {
                let v00 = j * (n + 1) + i;
                let v10 = v00 + 1;
                let v01 = v00 + (n + 1);
                let v11 = v01 + 1;
                faces.extend([v00, v10, v11, v00, v11, v01]);
            }
        }
        (vertices, faces)
    }

    fn uv(flattener: &Flattener, i: usize) -> (f64, f64) {
        let c = flattener.uv_coords();
        (c[2 * i], c[2 * i + 1])
    }

    fn dist(a: (f64, f64), b: (f64, f64)) -> f64 {
        ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
    }

    #[test]
    fn test_flatten_without_mesh() {
        let mut flattener = Flattener::new();
        let err = flattener.flatten().unwrap_err();
        assert!(matches!(err, FlattenError::EmptyMesh { vertices: 0, faces: 0 }));
        assert!(!flattener.last_error().unwrap().is_empty());
        assert_eq!(flattener.uv_count(), 0);
    }

    #[test]
    fn test_empty_mesh_rejected() {
        let mut flattener = Flattener::new();

        flattener.set_mesh(&[], &[]).unwrap();
        assert!(flattener.flatten().is_err());
        assert_eq!(flattener.uv_count(), 0);

        // Vertices but no faces
        flattener.set_mesh(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0], &[]).unwrap();
        let err = flattener.flatten().unwrap_err();
        assert!(matches!(err, FlattenError::EmptyMesh { vertices: 2, faces: 0 }));
        assert!(flattener.last_error().is_some_and(|m| !m.is_empty()));
        assert_eq!(flattener.uv_count(), 0);
    }

    #[test]
    fn test_failed_flatten_clears_previous_result() {
        let (vertices, faces) = equilateral();
        let mut flattener = Flattener::new();
        flattener.set_mesh(&vertices, &faces).unwrap();
        flattener.flatten().unwrap();
        assert_eq!(flattener.uv_count(), 3);

        flattener.set_mesh(&vertices, &[]).unwrap();
        assert!(flattener.flatten().is_err());
        assert_eq!(flattener.uv_count(), 0);
        assert!(flattener.uv_map().is_none());
    }

    #[test]
    fn test_triangle_exactness() {
        let (vertices, faces) = equilateral();
        let options = FlattenOptions::default()
            .with_iterations(0)
            .with_normalize(false);
        let mut flattener = Flattener::with_options(options).unwrap();
        flattener.set_mesh(&vertices, &faces).unwrap();
        flattener.flatten().unwrap();

        let (a, b, c) = (uv(&flattener, 0), uv(&flattener, 1), uv(&flattener, 2));
        assert!((dist(a, b) - 1.0).abs() < 1e-9);
        assert!((dist(b, c) - 1.0).abs() < 1e-9);
        assert!((dist(c, a) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalized_triangle_keeps_shape() {
        let (vertices, faces) = equilateral();
        let options = FlattenOptions::default().with_iterations(0);
        let mut flattener = Flattener::with_options(options).unwrap();
        flattener.set_mesh(&vertices, &faces).unwrap();
        flattener.flatten().unwrap();

        // Width 1 and height sqrt(3)/2, so the fit leaves the side lengths at 1
        let (a, b, c) = (uv(&flattener, 0), uv(&flattener, 1), uv(&flattener, 2));
        assert!((dist(a, b) - 1.0).abs() < 1e-9);
        assert!((dist(b, c) - 1.0).abs() < 1e-9);
        assert!((dist(c, a) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_uv_count_matches_vertices() {
        // Two disjoint triangles plus an unreferenced vertex
        let vertices = vec![
            0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, //
            5.0, 5.0, 0.0, 6.0, 5.0, 0.0, 5.0, 6.0, 0.0, //
            9.0, 9.0, 9.0,
        ];
        let faces = vec![0, 1, 2, 3, 4, 5];

        let mut flattener = Flattener::new();
        flattener.set_mesh(&vertices, &faces).unwrap();
        flattener.flatten().unwrap();

        assert_eq!(flattener.uv_count(), 7);
        assert_eq!(flattener.last_stats().unwrap().fallback, 3);
        assert!(flattener.uv_map().unwrap().is_finite());
    }

    #[test]
    fn test_bounding_box_normalized() {
        let (vertices, faces) = grid(6);
        let mut flattener = Flattener::new();
        flattener.set_mesh(&vertices, &faces).unwrap();
        flattener.flatten().unwrap();

        let coords = flattener.uv_coords();
        let us: Vec<f64> = coords.iter().step_by(2).copied().collect();
        let vs: Vec<f64> = coords.iter().skip(1).step_by(2).copied().collect();
        let span = |xs: &[f64]| {
            let min = xs.iter().copied().fold(f64::INFINITY, f64::min);
            let max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            (min, max - min)
        };
        let (min_u, width) = span(&us);
        let (min_v, height) = span(&vs);

        assert!(min_u >= -1e-12 && min_v >= -1e-12);
        assert!((width.max(height) - 1.0).abs() < 1e-9);
    }

    /// Winding is checked on the unfolded layout, with smoothing disabled.
    #[test]
    fn test_winding_consistent_before_smoothing() {
        let (vertices, faces) = grid(5);
        let options = FlattenOptions::default().with_iterations(0);
        let mut flattener = Flattener::with_options(options).unwrap();
        flattener.set_mesh(&vertices, &faces).unwrap();
        flattener.flatten().unwrap();

        let mesh = flattener.mesh().unwrap();
        let uvs = flattener.uv_map().unwrap();
        for f in mesh.face_ids() {
            assert!(uvs.signed_area(mesh.face_vertices(f)) > 0.0);
        }
    }

    #[test]
    fn test_default_smoothing_flips_thin_strip() {
        // 20 unit cells, 0.1 tall. Unfolding is flip-free; relaxing with free
        // boundary vertices folds the strip over itself.
        let n = 20;
        let mut vertices = Vec::new();
        for j in 0..2 {
            for i in 0..=n {
                vertices.extend([i as f64, j as f64 * 0.1, 0.0]);
            }
        }
        let mut faces = Vec::new();
        for i in 0..n as u32 {
            let (v00, v10) = (i, i + 1);
            let (v01, v11) = (i + n as u32 + 1, i + n as u32 + 2);
            faces.extend([v00, v10, v11, v00, v11, v01]);
        }

        let mut unfolded =
            Flattener::with_options(FlattenOptions::default().with_iterations(0)).unwrap();
        unfolded.set_mesh(&vertices, &faces).unwrap();
        unfolded.flatten().unwrap();

        let mut smoothed = Flattener::new();
        smoothed.set_mesh(&vertices, &faces).unwrap();
        smoothed.flatten().unwrap();

        let mesh = smoothed.mesh().unwrap();
        let piece: Vec<FaceId> = mesh.face_ids().collect();
        let before = distortion_stats(mesh, unfolded.uv_map().unwrap(), &piece);
        let after = distortion_stats(mesh, smoothed.uv_map().unwrap(), &piece);

        assert_eq!(before.flipped_faces, 0);
        assert_eq!(after.flipped_faces, 18);
        assert_eq!(after.degenerate_faces, 0);
        assert!(smoothed.uv_map().unwrap().is_finite());
    }

    #[test]
    fn test_huge_seam_index_is_rejected() {
        let (vertices, faces) = equilateral();
        let mut flattener = Flattener::new();
        flattener.set_mesh(&vertices, &faces).unwrap();

        assert!(!flattener.add_seam_edge(usize::MAX, 0));
        assert!(!flattener.add_seam_edge(0, u32::MAX as usize));
        assert!(flattener.seams().is_empty());

        // Out-of-mesh but representable indices are still recorded
        assert!(flattener.add_seam_edge(1, 1000));
        assert_eq!(flattener.seams().len(), 1);
    }

    #[test]
    fn test_idempotent_reload() {
        let (vertices, faces) = grid(4);
        let mut flattener = Flattener::new();

        flattener.set_mesh(&vertices, &faces).unwrap();
        flattener.flatten().unwrap();
        let first = flattener.uv_coords().to_vec();

        flattener.set_mesh(&vertices, &faces).unwrap();
        flattener.flatten().unwrap();
        assert_eq!(flattener.uv_coords(), first.as_slice());
    }

    #[test]
    fn test_seams_recorded_and_cleared_on_load() {
        let (vertices, faces) = grid(2);
        let mut flattener = Flattener::new();
        flattener.set_mesh(&vertices, &faces).unwrap();

        assert!(flattener.add_seam_edge(0, 1));
        assert!(!flattener.add_seam_edge(1, 0));
        assert_eq!(flattener.seams().len(), 1);

        // Seams do not change the result
        flattener.flatten().unwrap();
        let with_seam = flattener.uv_coords().to_vec();
        flattener.clear_seams();
        flattener.flatten().unwrap();
        assert_eq!(flattener.uv_coords(), with_seam.as_slice());

        flattener.add_seam_edge(2, 3);
        flattener.set_mesh(&vertices, &faces).unwrap();
        assert!(flattener.seams().is_empty());
    }

    #[test]
    fn test_malformed_buffers() {
        let mut flattener = Flattener::new();

        let err = flattener.set_mesh(&[0.0, 1.0], &[]).unwrap_err();
        assert!(matches!(err, FlattenError::MalformedBuffer { name: "vertex", .. }));
        assert!(flattener.mesh().is_none());
        assert!(flattener.last_error().is_some());

        let (vertices, _) = equilateral();
        let err = flattener.set_mesh(&vertices, &[0, 1, 7]).unwrap_err();
        assert!(matches!(err, FlattenError::InvalidVertexIndex { face: 0, vertex: 7 }));
    }

    #[test]
    fn test_parallel_option_matches() {
        let (vertices, faces) = grid(5);

        let mut sequential = Flattener::new();
        sequential.set_mesh(&vertices, &faces).unwrap();
        sequential.flatten().unwrap();

        let smoothing = ConformalOptions::default().with_parallel(true);
        let mut parallel =
            Flattener::with_options(FlattenOptions::default().with_smoothing(smoothing)).unwrap();
        parallel.set_mesh(&vertices, &faces).unwrap();
        parallel.flatten().unwrap();

        assert_eq!(sequential.uv_coords(), parallel.uv_coords());
    }

    #[test]
    fn test_invalid_options_rejected() {
        let bad = FlattenOptions::default()
            .with_smoothing(ConformalOptions::default().with_blend(2.0));
        assert!(Flattener::with_options(bad.clone()).is_err());

        let mut flattener = Flattener::new();
        assert!(flattener.set_options(bad).is_err());
        assert_eq!(flattener.options(), &FlattenOptions::default());
    }
}
