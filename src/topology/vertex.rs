use std::cmp::Ordering;

use crate::collections::UsageTracker;
use crate::math::Point3;

use super::edge::EdgeId;

slotmap::new_key_type! {
    /// Unique identifier for a vertex in a navigation surface.
    pub struct VertexId;
}

/// Distance of a point from the world origin, totally ordered.
///
/// Sort key of the vertex index: two points within `r` of each other have
/// magnitudes within `r` of each other.
#[derive(Debug, Clone, Copy)]
pub struct Magnitude(pub f64);

impl Magnitude {
    /// The magnitude of `point`.
    #[must_use]
    pub fn of(point: &Point3) -> Self {
        Self(point.coords.norm())
    }
}

impl PartialEq for Magnitude {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Magnitude {}

impl PartialOrd for Magnitude {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Magnitude {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Data associated with a welded vertex.
#[derive(Debug, Clone)]
pub struct VertexData {
    /// The 3D position of the vertex.
    pub point: Point3,
    /// Cached magnitude of `point`.
    pub magnitude: Magnitude,
    /// Edges ending at this vertex.
    pub edges: UsageTracker<EdgeId>,
}

impl VertexData {
    /// Creates a new, unused vertex at the given point.
    #[must_use]
    pub fn new(point: Point3) -> Self {
        Self {
            point,
            magnitude: Magnitude::of(&point),
            edges: UsageTracker::with_capacity(6),
        }
    }
}
