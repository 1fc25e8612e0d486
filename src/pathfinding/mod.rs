mod astar;
mod channel;
#[cfg(test)]
pub(crate) mod fixtures;
mod funnel;
mod request;
mod unwrap;

pub use astar::find_face_path;
pub use channel::{build_channel, ensure_goal};
pub use funnel::Funnel;
pub use request::{PathRequest, PathStatus, PathType, RequestorKey};
pub use unwrap::ChannelUnwrapper;

use crate::error::SurfaceError;
use crate::topology::Surface;

/// Computes the result of `request` on `surface` and marks it finished.
///
/// A request whose ends are not connected finishes without results. A
/// single-face corridor yields the straight path from the start to the
/// projected goal.
///
/// # Errors
///
/// Returns an error if the surface is inconsistent.
pub fn solve(
    request: &mut PathRequest,
    surface: &Surface,
    funnel: &mut Funnel,
) -> Result<(), SurfaceError> {
    let Some(corridor) = find_face_path(surface, request) else {
        request.finish(None, None);
        return Ok(());
    };
    if request.path_type == PathType::FaceOnly {
        request.finish(Some(corridor), None);
        return Ok(());
    }

    let Some(&last) = corridor.last() else {
        request.finish(None, None);
        return Ok(());
    };
    let goal = ensure_goal(&request.end, surface.face(last)?);
    let path = if corridor.len() == 1 {
        vec![request.start, goal]
    } else {
        let channel = build_channel(surface, &corridor, request.start, goal, request.radius)?;
        match request.path_type {
            PathType::Exact => funnel.exact_path(&channel),
            PathType::Optimized | PathType::FaceOnly => funnel.optimized_path(&channel),
        }
    };
    request.finish(Some(corridor), Some(path));
    Ok(())
}
