use crate::collections::UsageTracker;

use super::face::FaceId;
use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for an edge in a navigation surface.
    pub struct EdgeId;
}

/// Data associated with an undirected edge between two welded vertices.
///
/// Well-formed surfaces have one or two faces per edge; overlapping or
/// degenerate registrations may add more.
#[derive(Debug, Clone)]
pub struct EdgeData {
    /// First end of the edge.
    pub a: VertexId,
    /// Second end of the edge.
    pub b: VertexId,
    /// Faces bounded by this edge.
    pub faces: UsageTracker<FaceId>,
}

impl EdgeData {
    /// Creates a new, unused edge.
    #[must_use]
    pub fn new(a: VertexId, b: VertexId) -> Self {
        Self {
            a,
            b,
            faces: UsageTracker::with_capacity(2),
        }
    }

    /// Returns `true` if the edge joins `x` and `y`, in either order.
    #[must_use]
    pub fn joins(&self, x: VertexId, y: VertexId) -> bool {
        (self.a == x && self.b == y) || (self.a == y && self.b == x)
    }

    /// Returns `true` if `vertex` is one of the ends.
    #[must_use]
    pub fn touches(&self, vertex: VertexId) -> bool {
        self.a == vertex || self.b == vertex
    }
}
