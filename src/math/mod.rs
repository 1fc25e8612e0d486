pub mod intersect_2d;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Offset added to welding and raycast radii to absorb rounding error.
pub const EPSILON: f64 = 1e-5;

/// The world up direction. Elevation is the `y` component.
#[must_use]
pub fn up() -> Vector3 {
    Vector3::y()
}

/// Drops the elevation component, keeping `(x, z)`.
#[must_use]
pub fn flatten(point: &Point3) -> Point2 {
    Point2::new(point.x, point.z)
}

/// Moves `from` towards `to` by at most `max_distance`, never overshooting.
#[must_use]
pub fn move_towards(from: &Point3, to: &Point3, max_distance: f64) -> Point3 {
    let delta = to - from;
    let distance = delta.norm();
    if distance <= max_distance || distance < TOLERANCE {
        return *to;
    }
    from + delta * (max_distance / distance)
}
