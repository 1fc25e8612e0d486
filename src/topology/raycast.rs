use std::collections::HashSet;

use crate::geometry::Ray;
use crate::math::{Point3, EPSILON};

use super::{FaceId, Magnitude, Surface};

/// Where a ray hit a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    pub face: FaceId,
    pub position: Point3,
    /// Distance from the ray origin to `position`.
    pub distance: f64,
}

impl Surface {
    /// Casts `ray` against the faces near its origin and returns the closest
    /// hit on a face whose area is in `area_mask`.
    ///
    /// The ray starts slightly behind its origin, so faces within the
    /// connection radius behind it are still hit. Only faces with a vertex
    /// whose magnitude is within `radius` plus the layer's reach of the
    /// origin's magnitude are tested; `radius` bounds how far along the ray
    /// a hit may be found.
    #[must_use]
    pub fn raycast_all_in_radius(
        &self,
        ray: &Ray,
        radius: f64,
        area_mask: u32,
    ) -> Option<SurfaceHit> {
        let offset = self.connection_radius + EPSILON;
        let ray = ray.backed_off(offset);
        let band = radius + self.max_edge_length + 2.0 * offset;

        let mut best: Option<(FaceId, f64)> = None;
        for face_id in self.faces_in_band(ray.origin(), band, area_mask) {
            let Some(face) = self.faces.get(face_id) else {
                continue;
            };
            if let Some(distance) = face.raycast(&ray) {
                if best.is_none_or(|(_, closest)| distance < closest) {
                    best = Some((face_id, distance));
                }
            }
        }

        best.map(|(face, distance)| SurfaceHit {
            face,
            position: ray.point_at(distance),
            distance: distance - offset,
        })
    }

    /// The face directly below `position`, or the one it lies on.
    #[must_use]
    pub fn find_face_under(&self, position: &Point3, area_mask: u32) -> Option<FaceId> {
        self.raycast_all_in_radius(&Ray::down(*position), 0.0, area_mask)
            .map(|hit| hit.face)
    }

    /// Faces in `area_mask` incident to a vertex whose magnitude lies within
    /// `band` of the magnitude of `origin`, in discovery order.
    fn faces_in_band(&self, origin: &Point3, band: f64, area_mask: u32) -> Vec<FaceId> {
        let magnitude = Magnitude::of(origin).0;
        let mut seen = HashSet::new();
        let mut found = Vec::new();
        self.vertex_index.visit_range(
            &Magnitude(magnitude - band),
            &Magnitude(magnitude + band),
            |_, &vertex| {
                let Some(vertex) = self.vertices.get(vertex) else {
                    return;
                };
                for edge in vertex.edges.users() {
                    let Some(edge) = self.edges.get(edge) else {
                        continue;
                    };
                    for face in edge.faces.users() {
                        let in_mask = self
                            .faces
                            .get(face)
                            .is_some_and(|f| f.matches_mask(area_mask));
                        if in_mask && seen.insert(face) {
                            found.push(face);
                        }
                    }
                }
            },
        );
        found
    }
}
