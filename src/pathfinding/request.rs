use crate::math::Point3;
use crate::topology::FaceId;

/// Identifies who submitted a path request. A newer request from the same
/// requestor supersedes an older one that has not been processed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestorKey(pub u64);

/// How much of a path to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathType {
    /// Only the corridor of faces.
    FaceOnly,
    /// The corridor and the shortest path through it, bending only at
    /// portal corners.
    #[default]
    Optimized,
    /// Like [`PathType::Optimized`], with one point on every portal.
    Exact,
}

/// Lifecycle of a [`PathRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathStatus {
    #[default]
    Pending,
    /// Superseded by a newer request from the same requestor.
    Skipped,
    /// Processed; the result fields are final.
    Finished,
}

/// A pathfinding query and, once finished, its result.
///
/// A finished request without a path has `None` result fields.
#[derive(Debug, Clone, PartialEq)]
pub struct PathRequest {
    /// Index of the layer to search.
    pub layer: usize,
    /// Areas the agent may walk through.
    pub area_mask: u32,
    /// Agent radius; portals are shrunk by it.
    pub radius: f64,
    pub start: Point3,
    pub end: Point3,
    /// Face the agent is known to stand on. Used only while it still exists.
    pub start_face: Option<FaceId>,
    pub path_type: PathType,
    status: PathStatus,
    face_path: Option<Vec<FaceId>>,
    path: Option<Vec<Point3>>,
}

impl PathRequest {
    /// Creates a pending request.
    #[must_use]
    pub fn new(
        layer: usize,
        area_mask: u32,
        radius: f64,
        start: Point3,
        end: Point3,
        path_type: PathType,
    ) -> Self {
        Self {
            layer,
            area_mask,
            radius,
            start,
            end,
            start_face: None,
            path_type,
            status: PathStatus::Pending,
            face_path: None,
            path: None,
        }
    }

    /// Sets the face the agent is known to stand on, skipping the start face
    /// lookup.
    #[must_use]
    pub fn with_start_face(mut self, face: FaceId) -> Self {
        self.start_face = Some(face);
        self
    }

    #[must_use]
    pub fn status(&self) -> PathStatus {
        self.status
    }

    /// The corridor of faces from the start face to the goal face.
    #[must_use]
    pub fn face_path(&self) -> Option<&[FaceId]> {
        self.face_path.as_deref()
    }

    /// The path points from the start to the goal.
    #[must_use]
    pub fn path(&self) -> Option<&[Point3]> {
        self.path.as_deref()
    }

    pub(crate) fn skip(&mut self) {
        self.status = PathStatus::Skipped;
    }

    pub(crate) fn finish(&mut self, face_path: Option<Vec<FaceId>>, path: Option<Vec<Point3>>) {
        self.face_path = face_path;
        self.path = path;
        self.status = PathStatus::Finished;
    }
}
