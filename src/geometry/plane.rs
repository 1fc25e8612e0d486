use crate::math::{Point3, Vector3, TOLERANCE};

use super::Ray;

/// An infinite plane in 3D space, stored as a unit normal and the signed
/// distance of the plane from the origin along that normal.
///
/// A plane built from a degenerate (zero-area) triangle has a zero normal
/// and is never hit by rays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    normal: Vector3,
    distance: f64,
}

impl Plane {
    /// Creates the plane through three points.
    ///
    /// The normal follows the winding `a -> b -> c`.
    #[must_use]
    pub fn from_points(a: &Point3, b: &Point3, c: &Point3) -> Self {
        let normal = (b - a).cross(&(c - a));
        let len = normal.norm();
        let normal = if len < TOLERANCE {
            Vector3::zeros()
        } else {
            normal / len
        };
        Self {
            normal,
            distance: -normal.dot(&a.coords),
        }
    }

    /// Returns the unit normal of the plane (zero for a degenerate plane).
    #[must_use]
    pub fn normal(&self) -> &Vector3 {
        &self.normal
    }

    /// Returns `true` if the plane was built from collinear points.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.normal.norm_squared() < TOLERANCE
    }

    /// Signed distance from `point` to the plane.
    #[must_use]
    pub fn signed_distance(&self, point: &Point3) -> f64 {
        self.normal.dot(&point.coords) + self.distance
    }

    /// Signed distance along `ray` at which it meets the plane.
    ///
    /// Negative when the plane is behind the ray origin. Returns `None` when
    /// the ray is parallel to the plane.
    #[must_use]
    pub fn ray_distance(&self, ray: &Ray) -> Option<f64> {
        let denom = ray.direction().dot(&self.normal);
        if denom.abs() < TOLERANCE {
            return None;
        }
        Some(-self.signed_distance(ray.origin()) / denom)
    }

    /// Distance along `ray` at which it meets the plane in front of its origin.
    #[must_use]
    pub fn raycast(&self, ray: &Ray) -> Option<f64> {
        self.ray_distance(ray).filter(|&t| t > 0.0)
    }
}
