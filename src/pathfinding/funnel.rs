// Funnel ("string pulling") over a standardized channel.
//
// The funnel is an apex plus two wedges, chains of channel indices bounding
// the visible region on the left (odd indices) and the right (even indices).
// Channel points are consumed in order:
//
// - a point inside the funnel replaces the wedge of its own side;
// - a point outside its own side extends its own wedge;
// - a point beyond the opposite wedge commits that wedge's visible prefix to
//   the tail and restarts from its last committed point as the new apex.
//
// The tail is the resulting path as indices into the channel.

use crate::math::intersect_2d::{cross_2d, crossing_ratio_2d};
use crate::math::{Point2, Point3};

use super::unwrap::{portal_count, ChannelUnwrapper};

/// Computes shortest paths through channels.
///
/// Reusable: buffers are kept between calls.
#[derive(Debug, Default)]
pub struct Funnel {
    unwrapper: ChannelUnwrapper,
    state: FunnelState,
}

impl Funnel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The shortest path through `channel`, bending only at portal ends.
    ///
    /// `channel` is `[start, portal 0, portal 0, ..., goal]`. Channels
    /// without portals are returned unchanged.
    pub fn optimized_path(&mut self, channel: &[Point3]) -> Vec<Point3> {
        if portal_count(channel.len()) == 0 {
            return channel.to_vec();
        }
        self.run(channel);
        let unwrapper = &self.unwrapper;
        self.state
            .tail
            .iter()
            .filter_map(|&index| unwrapper.wrap_point(index))
            .collect()
    }

    /// The same path as [`Funnel::optimized_path`], with one point where
    /// it crosses every portal.
    pub fn exact_path(&mut self, channel: &[Point3]) -> Vec<Point3> {
        if portal_count(channel.len()) == 0 {
            return channel.to_vec();
        }
        self.run(channel);
        let ratios = self.state.exact_ratios(self.unwrapper.channel());
        self.unwrapper.wrap_exact(&ratios)
    }

    /// Indices of the last computed path into the standardized channel.
    #[cfg(test)]
    fn tail(&self) -> &[usize] {
        &self.state.tail
    }

    fn run(&mut self, channel: &[Point3]) {
        self.unwrapper.standardize(channel);
        self.state.run(self.unwrapper.channel());
    }
}

#[derive(Debug, Default)]
struct FunnelState {
    tail: Vec<usize>,
    left: Vec<usize>,
    right: Vec<usize>,
    apex: usize,
    progress: usize,
}

impl FunnelState {
    fn run(&mut self, channel: &[Point2]) {
        let len = channel.len();
        self.tail.clear();
        self.tail.push(0);
        self.reset_at_tail_end();

        while self.progress < len {
            let apex = channel[self.apex];
            let point = channel[self.progress];
            if on_left(apex, point, channel[self.left[0]]) {
                if self.progress_on_left() {
                    extend_wedge(&mut self.left, self.progress, |from| {
                        on_left(apex, point, channel[from])
                    });
                    self.progress += 1;
                } else {
                    self.commit_wedge(channel, Side::Left);
                }
            } else if on_right(apex, point, channel[self.right[0]]) {
                if self.progress_on_left() {
                    self.commit_wedge(channel, Side::Right);
                } else {
                    extend_wedge(&mut self.right, self.progress, |from| {
                        on_right(apex, point, channel[from])
                    });
                    self.progress += 1;
                }
            } else {
                let wedge = if self.progress_on_left() {
                    &mut self.left
                } else {
                    &mut self.right
                };
                wedge.clear();
                wedge.push(self.progress);
                self.progress += 1;
            }
        }
        self.final_step(len - 1);
    }

    /// Restarts the funnel at the last tail point, with the wedges on the
    /// next portal and progress on the one after.
    fn reset_at_tail_end(&mut self) {
        let apex = self.tail.last().copied().unwrap_or(0);
        self.apex = apex;
        let offset = apex % 2;
        self.left.clear();
        self.left.push(apex + 1 + offset);
        self.right.clear();
        self.right.push(apex + 2 + offset);
        self.progress = apex + 3 + offset;
    }

    fn progress_on_left(&self) -> bool {
        self.progress % 2 == 1
    }

    /// The progress point crossed the wedge on `side`: commits the part of
    /// that wedge it does not see past and restarts the funnel there.
    fn commit_wedge(&mut self, channel: &[Point2], side: Side) {
        let apex = channel[self.apex];
        let point = channel[self.progress];
        let wedge = match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        };
        let mut committed = vec![wedge[0]];
        for &index in &wedge[1..] {
            let beyond = match side {
                Side::Left => on_left(apex, point, channel[index]),
                Side::Right => on_right(apex, point, channel[index]),
            };
            if !beyond {
                break;
            }
            committed.push(index);
        }
        self.tail.extend(committed);
        self.reset_at_tail_end();
    }

    fn final_step(&mut self, goal: usize) {
        if self.left.last() == Some(&goal) {
            self.tail.extend_from_slice(&self.left);
        } else if self.right.last() == Some(&goal) {
            self.tail.extend_from_slice(&self.right);
        } else {
            self.tail.push(goal);
        }
    }

    /// Where the tail crosses each portal, as a ratio from the portal's
    /// left end (0) to its right end (1).
    fn exact_ratios(&self, channel: &[Point2]) -> Vec<f64> {
        let portals = portal_count(channel.len());
        let mut ratios = Vec::with_capacity(portals);
        let mut step = 1;
        for portal in 0..portals {
            let (Some(&from), Some(&to)) = (self.tail.get(step - 1), self.tail.get(step)) else {
                ratios.push(0.5);
                continue;
            };
            if portal < portal_of(to) {
                let left = &channel[1 + 2 * portal];
                let right = &channel[2 + 2 * portal];
                let ratio = crossing_ratio_2d(&channel[from], &channel[to], left, right)
                    .map_or(0.5, |ratio| ratio.clamp(0.0, 1.0));
                ratios.push(ratio);
            } else {
                ratios.push(if to % 2 == 1 { 0.0 } else { 1.0 });
                step += 1;
            }
        }
        ratios
    }
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Left,
    Right,
}

/// Whether `point` is left of the direction from `apex` to `from`.
fn on_left(apex: Point2, point: Point2, from: Point2) -> bool {
    cross_2d(&(from - apex), &(point - apex)) > 0.0
}

/// Whether `point` is right of the direction from `apex` to `from`.
fn on_right(apex: Point2, point: Point2, from: Point2) -> bool {
    cross_2d(&(from - apex), &(point - apex)) < 0.0
}

/// Appends `progress` to `wedge` after the leading points it is beyond.
fn extend_wedge(wedge: &mut Vec<usize>, progress: usize, mut beyond: impl FnMut(usize) -> bool) {
    let mut keep = 1;
    while keep < wedge.len() && beyond(wedge[keep]) {
        keep += 1;
    }
    wedge.truncate(keep);
    wedge.push(progress);
}

/// Portal of channel index `index`; the goal maps past the last portal.
fn portal_of(index: usize) -> usize {
    index.saturating_sub(1) / 2
}
