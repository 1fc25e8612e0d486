use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::error::{Result, SurfaceError, SystemError};
use crate::pathfinding::{solve, Funnel, PathRequest, RequestorKey};
use crate::topology::Surface;

use super::SurfaceCommand;

/// The navigation layers, shared between the host and the worker.
pub type SharedLayers = Arc<RwLock<Vec<Surface>>>;

/// Work for the background worker.
#[derive(Debug)]
pub enum Job {
    Building(BuildingJob),
    Pathfinding(PathfindingJob),
}

/// Result of a finished [`Job`], handed back on join.
#[derive(Debug)]
pub enum JobOutcome {
    /// `applied` commands were applied, in order.
    Built { applied: usize, cancelled: bool },
    /// Requests processed before the job ended, all marked finished.
    Pathfound {
        finished: Vec<(RequestorKey, PathRequest)>,
        cancelled: bool,
    },
}

impl Job {
    /// Short name of the job kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Building(_) => "building",
            Self::Pathfinding(_) => "pathfinding",
        }
    }

    /// Runs the job to completion, or until `cancel` is set. Cancellation
    /// is checked between commands and between requests.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::LockPoisoned`] if the layers lock is poisoned,
    /// or the first error of a command or request; the rest of the batch is
    /// skipped.
    pub fn execute(self, cancel: &AtomicBool) -> Result<JobOutcome> {
        match self {
            Self::Building(job) => job.execute(cancel),
            Self::Pathfinding(job) => job.execute(cancel),
        }
    }
}

/// Applies queued surface edits under the layers' write lock.
#[derive(Debug)]
pub struct BuildingJob {
    layers: SharedLayers,
    commands: Vec<SurfaceCommand>,
}

impl BuildingJob {
    #[must_use]
    pub fn new(layers: SharedLayers, commands: Vec<SurfaceCommand>) -> Self {
        Self { layers, commands }
    }

    fn execute(self, cancel: &AtomicBool) -> Result<JobOutcome> {
        let mut layers = self
            .layers
            .write()
            .map_err(|_| SurfaceError::LockPoisoned)?;
        let mut applied = 0;
        for command in self.commands {
            if cancel.load(Ordering::Acquire) {
                return Ok(JobOutcome::Built {
                    applied,
                    cancelled: true,
                });
            }
            command.apply(&mut layers)?;
            applied += 1;
        }
        Ok(JobOutcome::Built {
            applied,
            cancelled: false,
        })
    }
}

/// Computes queued path requests under the layers' read lock.
#[derive(Debug)]
pub struct PathfindingJob {
    layers: SharedLayers,
    requests: HashMap<RequestorKey, PathRequest>,
}

impl PathfindingJob {
    #[must_use]
    pub fn new(layers: SharedLayers, requests: HashMap<RequestorKey, PathRequest>) -> Self {
        Self { layers, requests }
    }

    fn execute(self, cancel: &AtomicBool) -> Result<JobOutcome> {
        let layers = self
            .layers
            .read()
            .map_err(|_| SurfaceError::LockPoisoned)?;
        let mut funnel = Funnel::new();
        let mut finished = Vec::with_capacity(self.requests.len());
        for (key, mut request) in self.requests {
            if cancel.load(Ordering::Acquire) {
                return Ok(JobOutcome::Pathfound {
                    finished,
                    cancelled: true,
                });
            }
            let surface = layers
                .get(request.layer)
                .ok_or(SystemError::InvalidLayer(request.layer))?;
            solve(&mut request, surface, &mut funnel)?;
            finished.push((key, request));
        }
        Ok(JobOutcome::Pathfound {
            finished,
            cancelled: false,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::NavError;
    use crate::math::Point3;
    use crate::pathfinding::{PathStatus, PathType};
    use crate::settings::LayerSettings;
    use crate::topology::{FaceHandle, HandleId};

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn shared_layers() -> SharedLayers {
        Arc::new(RwLock::new(vec![Surface::new(&LayerSettings::default())]))
    }

    fn square_commands() -> Vec<SurfaceCommand> {
        vec![
            SurfaceCommand::Register {
                a: p(0.0, 0.0, 0.0),
                b: p(0.0, 0.0, 1.0),
                c: p(1.0, 0.0, 0.0),
                handle: FaceHandle::new(HandleId(1), 0, 1.0, 1),
            },
            SurfaceCommand::Register {
                a: p(1.0, 0.0, 0.0),
                b: p(0.0, 0.0, 1.0),
                c: p(1.0, 0.0, 1.0),
                handle: FaceHandle::new(HandleId(2), 0, 1.0, 1),
            },
        ]
    }

    #[test]
    fn building_applies_commands_in_order() {
        let layers = shared_layers();
        let mut commands = square_commands();
        commands.push(SurfaceCommand::Unregister {
            handle: FaceHandle::new(HandleId(1), 0, 1.0, 1),
        });
        let outcome = Job::Building(BuildingJob::new(Arc::clone(&layers), commands))
            .execute(&AtomicBool::new(false))
            .unwrap();
        assert!(matches!(
            outcome,
            JobOutcome::Built {
                applied: 3,
                cancelled: false
            }
        ));
        assert_eq!(layers.read().unwrap()[0].face_count(), 1);
    }

    #[test]
    fn cancelled_building_applies_nothing() {
        let layers = shared_layers();
        let outcome = Job::Building(BuildingJob::new(Arc::clone(&layers), square_commands()))
            .execute(&AtomicBool::new(true))
            .unwrap();
        assert!(matches!(
            outcome,
            JobOutcome::Built {
                applied: 0,
                cancelled: true
            }
        ));
        assert_eq!(layers.read().unwrap()[0].face_count(), 0);
    }

    #[test]
    fn pathfinding_finishes_every_request() {
        let layers = shared_layers();
        Job::Building(BuildingJob::new(Arc::clone(&layers), square_commands()))
            .execute(&AtomicBool::new(false))
            .unwrap();

        let mut requests = HashMap::new();
        for key in 0..3 {
            requests.insert(
                RequestorKey(key),
                PathRequest::new(
                    0,
                    u32::MAX,
                    0.0,
                    p(0.2, 0.0, 0.2),
                    p(0.8, 0.0, 0.8),
                    PathType::Optimized,
                ),
            );
        }
        let outcome = Job::Pathfinding(PathfindingJob::new(layers, requests))
            .execute(&AtomicBool::new(false))
            .unwrap();
        let JobOutcome::Pathfound { finished, cancelled } = outcome else {
            panic!("expected a pathfinding outcome");
        };
        assert!(!cancelled);
        assert_eq!(finished.len(), 3);
        for (_, request) in &finished {
            assert_eq!(request.status(), PathStatus::Finished);
            assert_eq!(request.face_path().map(<[_]>::len), Some(2));
        }
    }

    #[test]
    fn poisoned_layers_are_reported() {
        let layers = shared_layers();
        let poisoner = Arc::clone(&layers);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.write().unwrap();
            panic!("poison the layers");
        })
        .join();

        let err = Job::Building(BuildingJob::new(layers, Vec::new()))
            .execute(&AtomicBool::new(false))
            .unwrap_err();
        assert!(matches!(err, NavError::Surface(SurfaceError::LockPoisoned)));
    }
}
