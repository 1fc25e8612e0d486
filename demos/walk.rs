//! Builds a small walled room on the background worker and walks an agent
//! around the wall.
//!
//! ```text
//! cargo run --example walk
//! RUST_LOG=navsurf=debug cargo run --example walk
//! ```

use std::thread;
use std::time::Duration;

use navsurf::math::Point3;
use navsurf::pathfinding::{PathRequest, PathType, RequestorKey};
use navsurf::settings::{AreaSettings, NavigationSettings, ALL_AREAS};
use navsurf::{NavigationEvent, NavigationSystem};

const WALL: usize = 1;
const FLOOR: usize = 0;

fn main() -> navsurf::Result<()> {
    // Default: WARN for everything, INFO for navsurf.
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("navsurf=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let settings = NavigationSettings::default()
        .with_area(WALL, AreaSettings::new("wall", 1.0))
        .with_debug_snapshots(true);
    let mut system = NavigationSystem::initialize(settings);

    // A 6x6 floor with a wall along x = 3 that leaves a gap at the far end.
    for x in 0..6 {
        for z in 0..6 {
            let area = if x == 3 && z < 5 { WALL } else { FLOOR };
            let (x, z) = (f64::from(x), f64::from(z));
            let corner = |dx: f64, dz: f64| Point3::new(x + dx, 0.0, z + dz);
            system.register_face(corner(0.0, 0.0), corner(0.0, 1.0), corner(1.0, 0.0), area, 0)?;
            system.register_face(corner(1.0, 0.0), corner(0.0, 1.0), corner(1.0, 1.0), area, 0)?;
        }
    }

    let floor_only = ALL_AREAS & !(1u32 << WALL);
    let start = Point3::new(0.5, 0.0, 0.5);
    let end = Point3::new(5.5, 0.0, 0.5);
    for (key, path_type) in [(1, PathType::Optimized), (2, PathType::Exact)] {
        let request = PathRequest::new(0, floor_only, 0.25, start, end, path_type);
        system.submit_path_request(RequestorKey(key), request)?;
    }

    let mut finished = false;
    while !finished {
        system.tick()?;
        for event in system.drain_events() {
            println!("event: {event:?}");
            finished |= event == NavigationEvent::PathfindingFinished;
        }
        thread::sleep(Duration::from_millis(1));
    }

    if let Some(snapshot) = system.debug_snapshot(0) {
        println!(
            "layer 0: {} vertices, {} edges, {} faces",
            snapshot.vertex_count, snapshot.edge_count, snapshot.face_count
        );
    }

    let mut results = system.drain_path_results();
    results.sort_by_key(|(key, _)| *key);
    for (key, request) in results {
        let faces = request.face_path().map_or(0, <[_]>::len);
        println!("requestor {}: {:?} through {faces} faces", key.0, request.path_type);
        for point in request.path().unwrap_or_default() {
            println!("  ({:.2}, {:.2}, {:.2})", point.x, point.y, point.z);
        }
    }

    for event in system.shutdown() {
        println!("event: {event:?}");
    }
    Ok(())
}
