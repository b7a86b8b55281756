//! UV coordinate storage.
//!
//! This module provides the [`UVMap`] type for storing 2D parameterization
//! coordinates for mesh vertices.

use nalgebra::Point2;

use crate::mesh::VertexId;

use super::geometry::orient2d;

/// UV coordinates for mesh vertices.
///
/// One coordinate per vertex, indexed like the vertex array of the mesh it was
/// computed for. Vertices that no face references keep the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct UVMap {
    coords: Vec<Point2<f64>>,
}

impl UVMap {
    /// Create a new UV map with the given coordinates.
    pub fn new(coords: Vec<Point2<f64>>) -> Self {
        Self { coords }
    }

    /// Create a UV map filled with zeros.
    pub fn zeros(n: usize) -> Self {
        Self {
            coords: vec![Point2::origin(); n],
        }
    }

    /// Get the UV coordinates for a vertex.
    #[inline]
    pub fn get(&self, v: VertexId) -> Point2<f64> {
        self.coords[v.index()]
    }

    /// Get a mutable reference to UV coordinates for a vertex.
    #[inline]
    pub fn get_mut(&mut self, v: VertexId) -> &mut Point2<f64> {
        &mut self.coords[v.index()]
    }

    /// Set the UV coordinates for a vertex.
    #[inline]
    pub fn set(&mut self, v: VertexId, uv: Point2<f64>) {
        self.coords[v.index()] = uv;
    }

    /// Get the number of UV coordinates.
    #[inline]
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Iterate over all UV coordinates with their vertex IDs.
    pub fn iter(&self) -> impl Iterator<Item = (VertexId, Point2<f64>)> + '_ {
        self.coords
            .iter()
            .enumerate()
            .map(|(i, &uv)| (VertexId::new(i), uv))
    }

    /// Get the raw coordinates slice.
    pub fn as_slice(&self) -> &[Point2<f64>] {
        &self.coords
    }

    /// Interleave into `[u0, v0, u1, v1, ...]`.
    pub fn to_flat(&self) -> Vec<f64> {
        self.coords.iter().flat_map(|uv| [uv.x, uv.y]).collect()
    }

    /// Whether every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.coords.iter().all(|uv| uv.x.is_finite() && uv.y.is_finite())
    }

    /// Compute the bounding box of the UV coordinates.
    ///
    /// Returns `None` if the UV map is empty.
    pub fn bounding_box(&self) -> Option<(Point2<f64>, Point2<f64>)> {
        bounds_of(self.coords.iter().copied())
    }

    /// Signed area of a triangle in UV space (positive when counter-clockwise).
    pub fn signed_area(&self, tri: [VertexId; 3]) -> f64 {
        0.5 * orient2d(&self.get(tri[0]), &self.get(tri[1]), &self.get(tri[2]))
    }
}

/// Axis-aligned bounds of a set of points.
pub(crate) fn bounds_of<It>(points: It) -> Option<(Point2<f64>, Point2<f64>)>
where
    It: IntoIterator<Item = Point2<f64>>,
{
    let mut points = points.into_iter();
    let first = points.next()?;

    let (mut min, mut max) = (first, first);
    for uv in points {
        min.x = min.x.min(uv.x);
        min.y = min.y.min(uv.y);
        max.x = max.x.max(uv.x);
        max.y = max.y.max(uv.y);
    }

    Some((min, max))
}
