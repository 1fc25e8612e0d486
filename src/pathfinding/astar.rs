// A* over the faces of a navigation surface.
//
// Nodes are faces, edges are shared face edges, and the cost of a step is
// the distance between face centers. A face weight above 1 adds half of the
// extra cost to g and half to h, so heavier areas are avoided without
// breaking the ordering of the open set.
//
// The open set is an `OrderedSet` keyed by (f, h) with `total_cmp`; a node
// whose cost improves is removed and re-added, never mutated in place.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::collections::OrderedSet;
use crate::topology::{FaceId, Surface};

use super::PathRequest;

/// Open set key: total estimated cost, then remaining estimate.
#[derive(Debug, Clone, Copy)]
struct SearchKey {
    f: f64,
    h: f64,
}

impl PartialEq for SearchKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SearchKey {}

impl PartialOrd for SearchKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SearchKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f
            .total_cmp(&other.f)
            .then_with(|| self.h.total_cmp(&other.h))
    }
}

/// Best known way to reach a face.
#[derive(Debug, Clone, Copy)]
struct SearchNode {
    parent: Option<FaceId>,
    g: f64,
    h: f64,
}

impl SearchNode {
    fn key(&self) -> SearchKey {
        SearchKey {
            f: self.g + self.h,
            h: self.h,
        }
    }
}

/// Finds the corridor of faces from the start of `request` to its end.
///
/// The start face is the request's known start face while the surface still
/// contains it, otherwise the face under the start point. Returns `None` if
/// either end is not over a face in the request's areas or the goal is
/// unreachable.
#[must_use]
pub fn find_face_path(surface: &Surface, request: &PathRequest) -> Option<Vec<FaceId>> {
    let start = request
        .start_face
        .filter(|&face| surface.contains_face(face))
        .or_else(|| surface.find_face_under(&request.start, request.area_mask))?;
    let goal = surface.find_face_under(&request.end, request.area_mask)?;
    if start == goal {
        return Some(vec![start]);
    }

    let goal_center = surface.face(goal).ok()?.center();
    let mut open: OrderedSet<SearchKey, FaceId> = OrderedSet::new();
    let mut nodes: HashMap<FaceId, SearchNode> = HashMap::new();
    let mut closed: HashSet<FaceId> = HashSet::new();

    let origin = SearchNode {
        parent: None,
        g: 0.0,
        h: 0.0,
    };
    open.add(origin.key(), start);
    nodes.insert(start, origin);

    while let Some((_, current)) = open.pop_minimum() {
        if current == goal {
            return Some(retrace(&nodes, goal));
        }
        closed.insert(current);

        let Ok(face) = surface.face(current) else {
            continue;
        };
        let center = face.center();
        let g = nodes.get(&current).map_or(0.0, |node| node.g);

        for neighbour in surface.neighbours(current).into_iter().flatten() {
            if closed.contains(&neighbour) {
                continue;
            }
            let Ok(next) = surface.face(neighbour) else {
                continue;
            };
            if !next.matches_mask(request.area_mask) {
                continue;
            }

            let next_center = next.center();
            let distance = (next_center - center).norm();
            let bonus = (next.weight() * distance - distance) / 2.0;
            let candidate = SearchNode {
                parent: Some(current),
                g: g + distance + bonus,
                h: (goal_center - next_center).norm() + bonus,
            };

            match nodes.get_mut(&neighbour) {
                None => {
                    open.add(candidate.key(), neighbour);
                    nodes.insert(neighbour, candidate);
                }
                Some(known) if candidate.g < known.g => {
                    open.remove(&known.key(), &neighbour);
                    *known = candidate;
                    open.add(candidate.key(), neighbour);
                }
                Some(_) => {}
            }
        }
    }
    None
}

fn retrace(nodes: &HashMap<FaceId, SearchNode>, goal: FaceId) -> Vec<FaceId> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(parent) = nodes.get(&current).and_then(|node| node.parent) {
        path.push(parent);
        current = parent;
    }
    path.reverse();
    path
}
