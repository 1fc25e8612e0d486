use super::{Point2, Vector2, TOLERANCE};

/// 2D cross product: `(a.x * b.y - a.y * b.x)`.
///
/// Positive when `b` is counter-clockwise from `a`.
#[inline]
#[must_use]
pub fn cross_2d(a: &Vector2, b: &Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Parametric 2D line-line intersection.
///
/// Given lines `p1 + t * d1` and `p2 + u * d2`, returns `(t, u)` if not parallel.
#[must_use]
pub fn line_line_intersect_2d(
    p1: &Point2,
    d1: &Vector2,
    p2: &Point2,
    d2: &Vector2,
) -> Option<(f64, f64)> {
    let cross = cross_2d(d1, d2);
    if cross.abs() < TOLERANCE {
        return None;
    }
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    let t = (dx * d2.y - dy * d2.x) / cross;
    let u = (dx * d1.y - dy * d1.x) / cross;
    Some((t, u))
}

/// Where the line through `a0`, `a1` crosses the line through `b0`, `b1`,
/// as a parameter along `b0 -> b1`.
///
/// Returns `None` for parallel or degenerate lines.
#[must_use]
pub fn crossing_ratio_2d(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> Option<f64> {
    let da = a1 - a0;
    let db = b1 - b0;
    if da.norm_squared() < TOLERANCE || db.norm_squared() < TOLERANCE {
        return None;
    }
    line_line_intersect_2d(a0, &da, b0, &db).map(|(_, u)| u)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn cross_sign_is_counter_clockwise_positive() {
        assert!(cross_2d(&Vector2::x(), &Vector2::y()) > 0.0);
        assert!(cross_2d(&Vector2::y(), &Vector2::x()) < 0.0);
        assert!(cross_2d(&Vector2::x(), &(Vector2::x() * 3.0)).abs() < TOLERANCE);
    }

    #[test]
    fn perpendicular_lines_intersect() {
        let (t, u) = line_line_intersect_2d(
            &p(0.0, 0.0),
            &Vector2::new(2.0, 0.0),
            &p(1.0, -1.0),
            &Vector2::new(0.0, 2.0),
        )
        .unwrap();
        assert!((t - 0.5).abs() < TOLERANCE);
        assert!((u - 0.5).abs() < TOLERANCE);
    }

    #[test]
    fn parallel_lines_do_not_intersect() {
        assert!(line_line_intersect_2d(
            &p(0.0, 0.0),
            &Vector2::new(1.0, 1.0),
            &p(0.0, 1.0),
            &Vector2::new(2.0, 2.0),
        )
        .is_none());
    }

    #[test]
    fn crossing_ratio_along_second_segment() {
        let ratio = crossing_ratio_2d(&p(0.0, 0.0), &p(4.0, 4.0), &p(0.0, 3.0), &p(4.0, 3.0));
        assert!((ratio.unwrap() - 0.75).abs() < TOLERANCE);
    }

    #[test]
    fn crossing_ratio_rejects_zero_length_portal() {
        assert!(crossing_ratio_2d(&p(0.0, 0.0), &p(1.0, 1.0), &p(2.0, 2.0), &p(2.0, 2.0)).is_none());
    }
}
