use crate::error::SurfaceError;
use crate::geometry::Ray;
use crate::math::{move_towards, Point3};
use crate::topology::{FaceData, FaceId, Surface};

/// Projects `end` vertically onto the plane of `face`, the last face of a
/// corridor. Returns `end` unchanged if the face is vertical.
#[must_use]
pub fn ensure_goal(end: &Point3, face: &FaceData) -> Point3 {
    let ray = Ray::down(*end);
    face.plane
        .ray_distance(&ray)
        .map_or(*end, |distance| ray.point_at(distance))
}

/// Builds the channel of a corridor: `start`, both ends of every portal
/// between consecutive faces, then `goal`.
///
/// Portals are shrunk by `radius` at both ends. A portal narrower than the
/// agent's diameter collapses to its midpoint.
///
/// # Errors
///
/// Returns [`SurfaceError::EntityNotFound`] if consecutive faces do not
/// share an edge.
pub fn build_channel(
    surface: &Surface,
    corridor: &[FaceId],
    start: Point3,
    goal: Point3,
    radius: f64,
) -> Result<Vec<Point3>, SurfaceError> {
    let diameter = radius + radius;
    let mut channel = Vec::with_capacity(2 * corridor.len().max(1));
    channel.push(start);
    for pair in corridor.windows(2) {
        let portal = surface
            .shared_edge(pair[0], pair[1])
            .ok_or(SurfaceError::EntityNotFound("shared edge"))?;
        let edge = surface.edge(portal)?;
        let a = surface.vertex(edge.a)?.point;
        let b = surface.vertex(edge.b)?.point;
        if (b - a).norm() < diameter {
            let center = nalgebra::center(&a, &b);
            channel.extend([center, center]);
        } else {
            channel.extend([move_towards(&a, &b, radius), move_towards(&b, &a, radius)]);
        }
    }
    channel.push(goal);
    Ok(channel)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::pathfinding::fixtures::fan;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn goal_is_dropped_onto_the_face_plane() {
        let (surface, [.., c]) = fan();
        let face = surface.face(c).unwrap();
        assert_relative_eq!(
            ensure_goal(&p(-1.0, 2.5, 1.0), face),
            p(-1.0, 0.0, 1.0),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            ensure_goal(&p(-1.0, -0.5, 1.0), face),
            p(-1.0, 0.0, 1.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn channel_has_two_points_per_portal() {
        let (surface, faces) = fan();
        let start = p(1.732, 0.0, 1.0);
        let goal = p(-1.732, 0.0, 1.0);
        let channel = build_channel(&surface, &faces, start, goal, 0.0).unwrap();
        assert_eq!(channel.len(), 6);
        assert_eq!(channel[0], start);
        assert_eq!(channel[5], goal);
        // Both portals start at the fan's center.
        assert!(channel[1..3].contains(&p(0.0, 0.0, 0.0)));
        assert!(channel[3..5].contains(&p(0.0, 0.0, 0.0)));
    }

    #[test]
    fn portals_shrink_by_radius() {
        let (surface, faces) = fan();
        let channel = build_channel(&surface, &faces, p(1.7, 0.0, 1.0), p(-1.7, 0.0, 1.0), 0.5)
            .unwrap();
        for portal in channel[1..5].chunks(2) {
            assert_relative_eq!((portal[1] - portal[0]).norm(), 3.0, epsilon = 1e-9);
            assert_relative_eq!(portal[0].coords.norm().min(portal[1].coords.norm()), 0.5, epsilon = 1e-9);
        }
    }

    #[test]
    fn narrow_portals_collapse_to_midpoint() {
        let (surface, faces) = fan();
        let channel = build_channel(&surface, &faces, p(1.7, 0.0, 1.0), p(-1.7, 0.0, 1.0), 2.5)
            .unwrap();
        assert_eq!(channel[1], channel[2]);
        assert_relative_eq!(channel[1].coords.norm(), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn disconnected_corridor_is_an_error() {
        let (surface, [a, _, c]) = fan();
        let result = build_channel(&surface, &[a, c], p(1.7, 0.0, 1.0), p(-1.7, 0.0, 1.0), 0.0);
        assert!(matches!(result, Err(SurfaceError::EntityNotFound(_))));
    }
}
