use crate::error::{GeometryError, Result};
use crate::math::{up, Point3, Vector3, TOLERANCE};

/// A half-line with a unit direction.
///
/// The parametric form is: `P(t) = origin + t * direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    origin: Point3,
    direction: Vector3,
}

impl Ray {
    /// Creates a new ray, normalizing the direction.
    ///
    /// # Errors
    ///
    /// Returns an error if the direction vector is zero-length.
    pub fn new(origin: Point3, direction: Vector3) -> Result<Self> {
        let len = direction.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self {
            origin,
            direction: direction / len,
        })
    }

    /// A ray pointing straight down from `origin`.
    #[must_use]
    pub fn down(origin: Point3) -> Self {
        Self {
            origin,
            direction: -up(),
        }
    }

    /// Returns the origin point of the ray.
    #[must_use]
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Returns the unit direction vector of the ray.
    #[must_use]
    pub fn direction(&self) -> &Vector3 {
        &self.direction
    }

    /// Returns the point at distance `t` along the ray.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point3 {
        self.origin + self.direction * t
    }

    /// Returns the same ray with its origin moved `distance` backwards.
    #[must_use]
    pub fn backed_off(&self, distance: f64) -> Self {
        Self {
            origin: self.point_at(-distance),
            direction: self.direction,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn direction_is_normalized() {
        let ray = Ray::new(Point3::origin(), Vector3::new(0.0, 0.0, 5.0)).unwrap();
        assert!((ray.direction().norm() - 1.0).abs() < TOLERANCE);
        assert!((ray.point_at(2.0) - Point3::new(0.0, 0.0, 2.0)).norm() < TOLERANCE);
    }

    #[test]
    fn zero_direction_is_rejected() {
        assert!(Ray::new(Point3::origin(), Vector3::zeros()).is_err());
    }

    #[test]
    fn backed_off_moves_origin_against_direction() {
        let ray = Ray::down(Point3::new(1.0, 3.0, 1.0)).backed_off(0.5);
        assert!((ray.origin() - Point3::new(1.0, 3.5, 1.0)).norm() < TOLERANCE);
    }
}
