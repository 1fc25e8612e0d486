use std::hash::{Hash, Hasher};

use crate::geometry::{Plane, Ray};
use crate::math::Point3;

use super::edge::EdgeId;
use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for a face in a navigation surface.
    pub struct FaceId;
}

/// Identity of a [`FaceHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(pub u64);

/// Token returned when a face is registered; the only way to unregister it.
///
/// Equality and hashing use the id alone.
#[derive(Debug, Clone, Copy)]
pub struct FaceHandle {
    id: HandleId,
    layer: usize,
    weight: f64,
    area_mask: u32,
}

impl FaceHandle {
    /// Creates a handle. `weight` is the path cost multiplier of the face and
    /// `area_mask` has the bit of the face's area set.
    #[must_use]
    pub fn new(id: HandleId, layer: usize, weight: f64, area_mask: u32) -> Self {
        Self {
            id,
            layer,
            weight,
            area_mask,
        }
    }

    #[must_use]
    pub fn id(&self) -> HandleId {
        self.id
    }

    /// Index of the layer the face belongs to.
    #[must_use]
    pub fn layer(&self) -> usize {
        self.layer
    }

    #[must_use]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    #[must_use]
    pub fn area_mask(&self) -> u32 {
        self.area_mask
    }
}

impl PartialEq for FaceHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FaceHandle {}

impl Hash for FaceHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Data associated with a triangular face.
///
/// Slot `i` of `edges` runs from corner `i` to corner `(i + 1) % 3`, so the
/// edges are `ab`, `bc` and `ca`.
#[derive(Debug, Clone)]
pub struct FaceData {
    /// The three bounding edges.
    pub edges: [EdgeId; 3],
    /// The welded corner vertices.
    pub vertices: [VertexId; 3],
    /// Positions of the corner vertices.
    pub corners: [Point3; 3],
    /// The plane through the corners, following their winding.
    pub plane: Plane,
    /// The handle the face was registered with.
    pub handle: FaceHandle,
}

impl FaceData {
    /// Creates a face from its resolved corners.
    #[must_use]
    pub fn new(
        edges: [EdgeId; 3],
        vertices: [VertexId; 3],
        corners: [Point3; 3],
        handle: FaceHandle,
    ) -> Self {
        let [a, b, c] = &corners;
        Self {
            edges,
            vertices,
            corners,
            plane: Plane::from_points(a, b, c),
            handle,
        }
    }

    /// Centroid of the triangle.
    #[must_use]
    pub fn center(&self) -> Point3 {
        let [a, b, c] = &self.corners;
        Point3::from((a.coords + b.coords + c.coords) / 3.0)
    }

    #[must_use]
    pub fn weight(&self) -> f64 {
        self.handle.weight()
    }

    #[must_use]
    pub fn area_mask(&self) -> u32 {
        self.handle.area_mask()
    }

    /// Returns `true` if the face's area is one of the areas in `mask`.
    #[must_use]
    pub fn matches_mask(&self, mask: u32) -> bool {
        self.handle.area_mask() & mask != 0
    }

    /// Returns `true` if `point`, assumed to lie on the face's plane, is
    /// inside the triangle. A positive `offset` tolerates points slightly
    /// outside the edges.
    ///
    /// Every point counts as inside a degenerate face.
    #[must_use]
    pub fn contains_point(&self, point: &Point3, offset: f64) -> bool {
        let normal = self.plane.normal();
        (0..3).all(|i| {
            let from = &self.corners[i];
            let to = &self.corners[(i + 1) % 3];
            let side = (to - from).cross(&(point - from));
            normal.dot(&side) >= -offset
        })
    }

    /// Distance along `ray` to the point where it hits the triangle, if it
    /// does so in front of its origin.
    #[must_use]
    pub fn raycast(&self, ray: &Ray) -> Option<f64> {
        self.plane
            .raycast(ray)
            .filter(|&t| self.contains_point(&ray.point_at(t), 0.0))
    }

    /// The first edge this face shares with `other`.
    #[must_use]
    pub fn shared_edge(&self, other: &FaceData) -> Option<EdgeId> {
        self.edges
            .iter()
            .copied()
            .find(|edge| other.edges.contains(edge))
    }
}

/// Orders three mutually connected edges as `ab`, `bc`, `ca` and resolves
/// the corner vertices `a`, `b`, `c`.
///
/// Each entry is an edge with its two ends in storage order. Edges are
/// undirected, so the second and third entries may be swapped and each may
/// be stored end-first.
#[must_use]
pub(crate) fn resolve_corners(
    edges: [(EdgeId, VertexId, VertexId); 3],
) -> ([EdgeId; 3], [VertexId; 3]) {
    let [ab, mut bc, mut ca] = edges;
    let (a, b) = (ab.1, ab.2);
    if bc.1 != b && bc.2 != b {
        std::mem::swap(&mut bc, &mut ca);
    }
    let c = if bc.1 == b { bc.2 } else { bc.1 };
    ([ab.0, bc.0, ca.0], [a, b, c])
}
