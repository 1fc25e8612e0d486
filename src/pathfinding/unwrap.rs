use crate::math::intersect_2d::cross_2d;
use crate::math::{flatten, Point2, Point3};

/// Projects a channel onto the ground plane and orders every portal so that
/// odd channel indices are on the left of the walking direction and even
/// indices on the right.
///
/// A channel is `[start, portal 0 left, portal 0 right, ..., goal]`. The
/// unwrapper remembers which portals it swapped so that indices into the
/// standardized channel can be mapped back to the original 3D points.
#[derive(Debug, Default)]
pub struct ChannelUnwrapper {
    wrapped: Vec<Point3>,
    unwrapped: Vec<Point2>,
    swapped: Vec<bool>,
}

impl ChannelUnwrapper {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `channel`, replacing any previous one.
    ///
    /// Each portal is oriented as seen from a pivot: the start point for the
    /// first portal, and the midpoint of the previous portal afterwards.
    pub fn standardize(&mut self, channel: &[Point3]) {
        self.wrapped.clear();
        self.wrapped.extend_from_slice(channel);
        self.unwrapped.clear();
        self.unwrapped.extend(channel.iter().map(flatten));
        self.swapped.clear();

        let Some(&start) = self.unwrapped.first() else {
            return;
        };
        let mut pivot = start;
        for portal in 0..portal_count(channel.len()) {
            let (left, right) = (1 + 2 * portal, 2 + 2 * portal);
            let swap = cross_2d(
                &(self.unwrapped[left] - pivot),
                &(self.unwrapped[right] - pivot),
            ) > 0.0;
            if swap {
                self.unwrapped.swap(left, right);
            }
            self.swapped.push(swap);
            pivot = nalgebra::center(&self.unwrapped[left], &self.unwrapped[right]);
        }
    }

    /// The standardized 2D channel.
    #[must_use]
    pub fn channel(&self) -> &[Point2] {
        &self.unwrapped
    }

    #[must_use]
    pub fn portal_count(&self) -> usize {
        self.swapped.len()
    }

    /// Whether the points of `portal` were swapped.
    #[must_use]
    pub fn is_swapped(&self, portal: usize) -> bool {
        self.swapped.get(portal).copied().unwrap_or(false)
    }

    /// The original 3D point behind index `index` of the standardized
    /// channel.
    #[must_use]
    pub fn wrap_point(&self, index: usize) -> Option<Point3> {
        let last = self.wrapped.len().checked_sub(1)?;
        if index == 0 || index >= last {
            return self.wrapped.get(index.min(last)).copied();
        }
        let portal = (index - 1) / 2;
        let original = match (self.is_swapped(portal), index % 2 == 1) {
            (false, _) => index,
            (true, true) => index + 1,
            (true, false) => index - 1,
        };
        self.wrapped.get(original).copied()
    }

    /// Builds a 3D path with one point per portal. `ratios[i]` places the
    /// point of portal `i` between its standardized left (0) and right (1)
    /// ends.
    #[must_use]
    pub fn wrap_exact(&self, ratios: &[f64]) -> Vec<Point3> {
        let (Some(&start), Some(&goal)) = (self.wrapped.first(), self.wrapped.last()) else {
            return Vec::new();
        };
        let mut path = Vec::with_capacity(ratios.len() + 2);
        path.push(start);
        for (portal, &ratio) in ratios.iter().enumerate().take(self.portal_count()) {
            let (mut left, mut right) = (
                self.wrapped[1 + 2 * portal],
                self.wrapped[2 + 2 * portal],
            );
            if self.is_swapped(portal) {
                std::mem::swap(&mut left, &mut right);
            }
            path.push(left + (right - left) * ratio);
        }
        path.push(goal);
        path
    }
}

/// Number of portals in a channel of `len` points.
pub(crate) fn portal_count(len: usize) -> usize {
    len.saturating_sub(2) / 2
}
