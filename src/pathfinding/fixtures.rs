//! Test surfaces shared by the pathfinding tests.

#![allow(clippy::unwrap_used)]

use crate::math::Point3;
use crate::settings::LayerSettings;
use crate::topology::{FaceHandle, FaceId, HandleId, Surface};

fn p(x: f64, y: f64, z: f64) -> Point3 {
    Point3::new(x, y, z)
}

/// Half of a hexagonal fan of radius 4 around the origin on the floor:
/// faces A (0° to 60°), B (60° to 120°) and C (120° to 180°).
pub(crate) fn fan() -> (Surface, [FaceId; 3]) {
    let h = 2.0 * 3.0_f64.sqrt();
    let origin = p(0.0, 0.0, 0.0);
    let rim = [p(4.0, 0.0, 0.0), p(2.0, 0.0, h), p(-2.0, 0.0, h), p(-4.0, 0.0, 0.0)];
    let mut surface = Surface::new(&LayerSettings::default());
    let faces = std::array::from_fn(|i| {
        surface
            .register_face(
                origin,
                rim[i],
                rim[i + 1],
                FaceHandle::new(HandleId(i as u64 + 1), 0, 1.0, 1),
            )
            .unwrap()
    });
    (surface, faces)
}

/// Unit square cells on the floor, each split into two triangles along the
/// diagonal from `(x + 1, z)` to `(x, z + 1)`. `area` gives the area mask and
/// weight of each cell.
pub(crate) fn cells(
    cells: &[(u32, u32)],
    area: impl Fn(u32, u32) -> (u32, f64),
) -> Surface {
    let mut surface = Surface::new(&LayerSettings::default());
    let mut next_id = 0;
    for &(i, j) in cells {
        let (x, z) = (f64::from(i), f64::from(j));
        let (mask, weight) = area(i, j);
        let triangles = [
            [p(x, 0.0, z), p(x, 0.0, z + 1.0), p(x + 1.0, 0.0, z)],
            [p(x + 1.0, 0.0, z), p(x, 0.0, z + 1.0), p(x + 1.0, 0.0, z + 1.0)],
        ];
        for [a, b, c] in triangles {
            next_id += 1;
            surface
                .register_face(a, b, c, FaceHandle::new(HandleId(next_id), 0, weight, mask))
                .unwrap();
        }
    }
    surface
}

/// A `width` by `depth` grid of cells.
pub(crate) fn grid(width: u32, depth: u32, area: impl Fn(u32, u32) -> (u32, f64)) -> Surface {
    let all: Vec<(u32, u32)> = (0..width)
        .flat_map(|i| (0..depth).map(move |j| (i, j)))
        .collect();
    cells(&all, area)
}

/// An L-shaped corridor: three cells along x, then two more cells up along
/// z from the last one. The inner corner is at `(2, 0, 1)`.
pub(crate) fn l_corridor() -> Surface {
    cells(&[(0, 0), (1, 0), (2, 0), (2, 1), (2, 2)], |_, _| (1, 1.0))
}
