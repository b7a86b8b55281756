//! Index types for mesh elements.
//!
//! Vertices, half-edges and faces live in flat arrays and refer to each other by
//! position. The wrappers here keep those positions from being mixed up and
//! reserve `u32::MAX` as the "none" sentinel, which is how a boundary half-edge
//! says it has no twin.

use std::fmt::{self, Debug};

const INVALID: u32 = u32::MAX;

/// A type-safe vertex index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VertexId(u32);

/// A type-safe half-edge index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct HalfEdgeId(u32);

/// A type-safe face index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct FaceId(u32);

macro_rules! impl_index_type {
    ($name:ident, $display:literal) => {
        impl $name {
            /// Create a new index from a raw value.
            ///
            /// # Panics
            /// Panics in debug builds if the value collides with the sentinel.
            #[inline]
            pub fn new(index: usize) -> Self {
                debug_assert!(index < INVALID as usize, "index {} too large", index);
                Self(index as u32)
            }

            /// Create an index, or `None` if the value does not fit below the sentinel.
            #[inline]
            pub fn try_new(index: usize) -> Option<Self> {
                u32::try_from(index)
                    .ok()
                    .filter(|&raw| raw != INVALID)
                    .map(Self)
            }

            /// The "none" sentinel.
            #[inline]
            pub const fn invalid() -> Self {
                Self(INVALID)
            }

            /// Get the raw index value.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Check if this is a real (non-sentinel) index.
            #[inline]
            pub fn is_valid(self) -> bool {
                self.0 != INVALID
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", $display, self.0)
                } else {
                    write!(f, "{}(NONE)", $display)
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::invalid()
            }
        }

        impl From<usize> for $name {
            fn from(v: usize) -> Self {
                Self::new(v)
            }
        }
    };
}

impl_index_type!(VertexId, "V");
impl_index_type!(HalfEdgeId, "HE");
impl_index_type!(FaceId, "F");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_id() {
        let v = VertexId::new(42);
        assert_eq!(v.index(), 42);
        assert!(v.is_valid());
        assert!(!VertexId::invalid().is_valid());
    }

    #[test]
    fn test_try_new_rejects_sentinel_and_overflow() {
        assert_eq!(VertexId::try_new(5), Some(VertexId::new(5)));
        assert_eq!(VertexId::try_new(u32::MAX as usize), None);
        assert_eq!(FaceId::try_new(usize::MAX), None);
    }

    #[test]
    fn test_default_is_sentinel() {
        assert_eq!(HalfEdgeId::default(), HalfEdgeId::invalid());
        assert!(!FaceId::default().is_valid());
    }

    #[test]
    fn test_debug_format() {
        assert_eq!(format!("{:?}", VertexId::new(7)), "V(7)");
        assert_eq!(format!("{:?}", HalfEdgeId::invalid()), "HE(NONE)");
    }
}
