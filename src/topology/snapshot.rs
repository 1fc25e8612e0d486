use std::collections::{BTreeMap, HashSet};

use crate::math::Point3;

use super::{EdgeId, Surface};

/// Read-only copy of a surface's shape, for drawing or inspecting it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceSnapshot {
    pub vertex_count: usize,
    pub edge_count: usize,
    pub face_count: usize,
    /// Faces whose corners are collinear or welded together.
    pub degenerate_face_count: usize,
    /// End points of every edge.
    pub edges: Vec<[Point3; 2]>,
    /// End points of the edges of each area's faces, keyed by area index.
    /// An edge between two areas is listed under both.
    pub edges_by_area: BTreeMap<usize, Vec<[Point3; 2]>>,
    /// Face centers keyed by area index.
    pub centers_by_area: BTreeMap<usize, Vec<Point3>>,
}

impl SurfaceSnapshot {
    /// Captures the current state of `surface`.
    #[must_use]
    pub fn capture(surface: &Surface) -> Self {
        let edges = surface
            .edges()
            .filter_map(|(id, _)| segment(surface, id))
            .collect();

        let mut degenerate_face_count = 0;
        let mut edges_by_area: BTreeMap<usize, Vec<[Point3; 2]>> = BTreeMap::new();
        let mut centers_by_area: BTreeMap<usize, Vec<Point3>> = BTreeMap::new();
        let mut listed: HashSet<(usize, EdgeId)> = HashSet::new();
        for (_, face) in surface.faces() {
            if face.plane.is_degenerate() {
                degenerate_face_count += 1;
            }
            let area = area_index(face.area_mask());
            for edge in face.edges {
                if !listed.insert((area, edge)) {
                    continue;
                }
                if let Some(ends) = segment(surface, edge) {
                    edges_by_area.entry(area).or_default().push(ends);
                }
            }
            centers_by_area.entry(area).or_default().push(face.center());
        }

        Self {
            vertex_count: surface.vertex_count(),
            edge_count: surface.edge_count(),
            face_count: surface.face_count(),
            degenerate_face_count,
            edges,
            edges_by_area,
            centers_by_area,
        }
    }
}

fn segment(surface: &Surface, id: EdgeId) -> Option<[Point3; 2]> {
    let edge = surface.edge(id).ok()?;
    let a = surface.vertex(edge.a).ok()?;
    let b = surface.vertex(edge.b).ok()?;
    Some([a.point, b.point])
}

/// Index of the lowest area bit in `mask`; an empty mask maps to area 0.
fn area_index(mask: u32) -> usize {
    if mask == 0 {
        0
    } else {
        mask.trailing_zeros() as usize
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::settings::LayerSettings;
    use crate::topology::{FaceHandle, HandleId};

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn area_index_is_lowest_bit() {
        assert_eq!(area_index(1), 0);
        assert_eq!(area_index(1 << 5), 5);
        assert_eq!(area_index(0), 0);
    }

    #[test]
    fn capture_counts_and_groups() {
        let mut surface = Surface::new(&LayerSettings::default());
        surface
            .register_face(
                p(0.0, 0.0, 0.0),
                p(0.0, 0.0, 1.0),
                p(1.0, 0.0, 0.0),
                FaceHandle::new(HandleId(1), 0, 1.0, 1),
            )
            .unwrap();
        surface
            .register_face(
                p(1.0, 0.0, 0.0),
                p(0.0, 0.0, 1.0),
                p(1.0, 0.0, 1.0),
                FaceHandle::new(HandleId(2), 0, 1.0, 1 << 3),
            )
            .unwrap();

        let snapshot = SurfaceSnapshot::capture(&surface);
        assert_eq!(snapshot.vertex_count, 4);
        assert_eq!(snapshot.edge_count, 5);
        assert_eq!(snapshot.face_count, 2);
        assert_eq!(snapshot.edges.len(), 5);
        assert_eq!(snapshot.centers_by_area[&0].len(), 1);
        assert_eq!(snapshot.centers_by_area[&3].len(), 1);
        assert_eq!(snapshot.degenerate_face_count, 0);
    }

    #[test]
    fn edges_are_grouped_by_area() {
        let mut surface = Surface::new(&LayerSettings::default());
        let squares = [(0.0, 1), (1.0, 1), (2.0, 1 << 3)];
        let mut id = 0;
        for (x, mask) in squares {
            for [a, b, c] in [
                [p(x, 0.0, 0.0), p(x, 0.0, 1.0), p(x + 1.0, 0.0, 0.0)],
                [p(x + 1.0, 0.0, 0.0), p(x, 0.0, 1.0), p(x + 1.0, 0.0, 1.0)],
            ] {
                id += 1;
                surface
                    .register_face(a, b, c, FaceHandle::new(HandleId(id), 0, 1.0, mask))
                    .unwrap();
            }
        }

        let snapshot = SurfaceSnapshot::capture(&surface);
        assert_eq!(snapshot.edges.len(), 13);
        // Area 0: two squares sharing the edge at x = 1.
        assert_eq!(snapshot.edges_by_area[&0].len(), 9);
        // Area 3: one square, including the edge at x = 2 it shares with area 0.
        assert_eq!(snapshot.edges_by_area[&3].len(), 5);
        let border = [p(2.0, 0.0, 0.0), p(2.0, 0.0, 1.0)];
        let on_border = |ends: &[Point3; 2]| {
            ends.contains(&border[0]) && ends.contains(&border[1])
        };
        assert!(snapshot.edges_by_area[&0].iter().any(on_border));
        assert!(snapshot.edges_by_area[&3].iter().any(on_border));
    }

    #[test]
    fn degenerate_faces_are_counted() {
        let mut surface = Surface::new(&LayerSettings::default());
        surface
            .register_face(
                p(0.0, 0.0, 0.0),
                p(0.0, 0.0, 1.0),
                p(1.0, 0.0, 0.0),
                FaceHandle::new(HandleId(1), 0, 1.0, 1),
            )
            .unwrap();
        surface
            .register_face(
                p(3.0, 0.0, 0.0),
                p(4.0, 0.0, 0.0),
                p(5.0, 0.0, 0.0),
                FaceHandle::new(HandleId(2), 0, 1.0, 1),
            )
            .unwrap();
        let snapshot = SurfaceSnapshot::capture(&surface);
        assert_eq!(snapshot.face_count, 2);
        assert_eq!(snapshot.degenerate_face_count, 1);
    }
}
