//! The host-facing navigation context.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::background::{
    BackgroundScheduler, BuildingJob, Job, JobOutcome, PathfindingJob, SchedulerState,
    SharedLayers, SurfaceCommand,
};
use crate::error::{Result, SurfaceError, SystemError};
use crate::geometry::Ray;
use crate::math::Point3;
use crate::pathfinding::{PathRequest, RequestorKey};
use crate::settings::NavigationSettings;
use crate::topology::{FaceHandle, FaceId, HandleId, Surface, SurfaceHit, SurfaceSnapshot};

/// Lifecycle notifications, queued until the host drains them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationEvent {
    SystemInitialized,
    SystemDeinitialized,
    /// A building job finished; the surface can be queried again.
    SurfaceAvailable,
    /// A building job started; queries return nothing until it finishes.
    SurfaceUnavailable,
    /// A pathfinding job finished; its results can be taken.
    PathfindingFinished,
}

/// Owns the navigation layers and schedules every edit and search on the
/// background worker.
///
/// Face edits and path requests are queued and take effect on later calls
/// to [`NavigationSystem::tick`], which the host calls once per frame.
#[derive(Debug)]
pub struct NavigationSystem {
    settings: NavigationSettings,
    layers: SharedLayers,
    scheduler: BackgroundScheduler,
    commands: Vec<SurfaceCommand>,
    requests: HashMap<RequestorKey, PathRequest>,
    results: HashMap<RequestorKey, PathRequest>,
    events: Vec<NavigationEvent>,
    snapshots: Vec<SurfaceSnapshot>,
    surface_available: bool,
    building: bool,
    next_handle: u64,
}

impl NavigationSystem {
    /// Creates an empty surface per configured layer.
    #[must_use]
    pub fn initialize(settings: NavigationSettings) -> Self {
        let layers: Vec<Surface> = settings.layers().iter().map(Surface::new).collect();
        tracing::info!(layers = layers.len(), "navigation system initialized");
        Self {
            settings,
            layers: Arc::new(RwLock::new(layers)),
            scheduler: BackgroundScheduler::new(),
            commands: Vec::new(),
            requests: HashMap::new(),
            results: HashMap::new(),
            events: vec![NavigationEvent::SystemInitialized],
            snapshots: Vec::new(),
            surface_available: false,
            building: false,
            next_handle: 0,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &NavigationSettings {
        &self.settings
    }

    /// Queues the triangle `a`, `b`, `c` for registration and returns the
    /// handle that will unregister it.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::InvalidArea`] or [`SystemError::InvalidLayer`]
    /// for out-of-range indices.
    pub fn register_face(
        &mut self,
        a: Point3,
        b: Point3,
        c: Point3,
        area_index: usize,
        layer_index: usize,
    ) -> Result<FaceHandle> {
        let area = self
            .settings
            .area(area_index)
            .ok_or(SystemError::InvalidArea(area_index))?;
        if layer_index >= self.settings.layer_count() {
            return Err(SystemError::InvalidLayer(layer_index).into());
        }

        self.next_handle += 1;
        let handle = FaceHandle::new(
            HandleId(self.next_handle),
            layer_index,
            area.weight(),
            1u32 << area_index,
        );
        self.commands
            .push(SurfaceCommand::Register { a, b, c, handle });
        Ok(handle)
    }

    /// Queues the removal of the face registered under `handle`.
    pub fn unregister_face(&mut self, handle: FaceHandle) {
        self.commands.push(SurfaceCommand::Unregister { handle });
    }

    /// Queues `request` for `key`. A request from the same key that has not
    /// been picked up yet is returned, marked skipped.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::InvalidLayer`] if the request's layer does not
    /// exist.
    pub fn submit_path_request(
        &mut self,
        key: RequestorKey,
        request: PathRequest,
    ) -> Result<Option<PathRequest>> {
        if request.layer >= self.settings.layer_count() {
            return Err(SystemError::InvalidLayer(request.layer).into());
        }
        Ok(self.requests.insert(key, request).map(|mut superseded| {
            superseded.skip();
            superseded
        }))
    }

    /// Takes the finished request of `key`, if any.
    pub fn take_path_result(&mut self, key: RequestorKey) -> Option<PathRequest> {
        self.results.remove(&key)
    }

    /// Takes every finished request.
    pub fn drain_path_results(&mut self) -> Vec<(RequestorKey, PathRequest)> {
        self.results.drain().collect()
    }

    /// Joins a finished job, then starts the next one if the worker is idle.
    /// Queued face edits take priority over path requests.
    ///
    /// # Errors
    ///
    /// Returns the error of a failed job, or a scheduler error if the worker
    /// cannot be started or joined. The failed batch is dropped.
    pub fn tick(&mut self) -> Result<()> {
        if self.scheduler.state() == SchedulerState::WaitingForJoin {
            let joined = self.scheduler.join();
            if std::mem::take(&mut self.building) {
                self.set_surface_available(true);
            }
            self.on_join(joined?)?;
        }
        if self.scheduler.state() != SchedulerState::ReadyToStart {
            return Ok(());
        }

        if !self.commands.is_empty() {
            let commands = std::mem::take(&mut self.commands);
            tracing::debug!(commands = commands.len(), "scheduling surface edits");
            self.scheduler.start_job(Job::Building(BuildingJob::new(
                Arc::clone(&self.layers),
                commands,
            )))?;
            self.building = true;
            self.set_surface_available(false);
        } else if !self.requests.is_empty() {
            let requests = std::mem::take(&mut self.requests);
            tracing::debug!(requests = requests.len(), "scheduling path requests");
            self.scheduler
                .start_job(Job::Pathfinding(PathfindingJob::new(
                    Arc::clone(&self.layers),
                    requests,
                )))?;
        }
        Ok(())
    }

    fn on_join(&mut self, outcome: JobOutcome) -> Result<()> {
        match outcome {
            JobOutcome::Built { applied, cancelled } => {
                tracing::debug!(applied, cancelled, "surface edits applied");
                if self.settings.capture_debug_snapshots() {
                    let layers = self
                        .layers
                        .read()
                        .map_err(|_| SurfaceError::LockPoisoned)?;
                    self.snapshots = layers.iter().map(SurfaceSnapshot::capture).collect();
                }
            }
            JobOutcome::Pathfound {
                finished,
                cancelled,
            } => {
                tracing::debug!(finished = finished.len(), cancelled, "path requests finished");
                self.results.extend(finished);
                self.events.push(NavigationEvent::PathfindingFinished);
            }
        }
        Ok(())
    }

    fn set_surface_available(&mut self, available: bool) {
        if self.surface_available == available {
            return;
        }
        self.surface_available = available;
        self.events.push(if available {
            NavigationEvent::SurfaceAvailable
        } else {
            NavigationEvent::SurfaceUnavailable
        });
    }

    /// Whether `face` is a live face of `layer`. Always `false` while the
    /// surface is unavailable.
    #[must_use]
    pub fn contains_face(&self, layer: usize, face: FaceId) -> bool {
        self.query(layer, |surface| Some(surface.contains_face(face)))
            .unwrap_or(false)
    }

    /// Closest hit of `ray` on a face of `layer` whose area is in
    /// `area_mask`, no farther than the layer's raycast length. Always
    /// `None` while the surface is unavailable.
    #[must_use]
    pub fn raycast(&self, ray: &Ray, layer: usize, area_mask: u32) -> Option<SurfaceHit> {
        let limit = self.settings.layer(layer)?.raycast_length();
        self.query(layer, |surface| {
            surface.raycast_all_in_radius(ray, limit, area_mask)
        })
        .filter(|hit| hit.distance <= limit)
    }

    fn query<T>(&self, layer: usize, query: impl FnOnce(&Surface) -> Option<T>) -> Option<T> {
        if !self.surface_available {
            tracing::warn!(layer, "navigation surface queried while unavailable");
            return None;
        }
        let Ok(layers) = self.layers.read() else {
            tracing::error!("navigation layers lock poisoned");
            return None;
        };
        layers.get(layer).and_then(query)
    }

    /// Takes the queued lifecycle events, oldest first.
    pub fn drain_events(&mut self) -> Vec<NavigationEvent> {
        std::mem::take(&mut self.events)
    }

    #[must_use]
    pub fn scheduler_state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    /// Whether surface queries are answered. Set after the first building
    /// job finishes and cleared while one runs.
    #[must_use]
    pub fn is_surface_available(&self) -> bool {
        self.surface_available
    }

    /// Whether face edits or path requests are waiting to be scheduled.
    #[must_use]
    pub fn has_pending_work(&self) -> bool {
        !self.commands.is_empty() || !self.requests.is_empty()
    }

    /// The snapshot of `layer` captured after the last building job, if
    /// snapshots are enabled in the settings.
    #[must_use]
    pub fn debug_snapshot(&self, layer: usize) -> Option<&SurfaceSnapshot> {
        self.snapshots.get(layer)
    }

    /// Aborts the job in flight and returns the remaining events, ending
    /// with [`NavigationEvent::SystemDeinitialized`].
    pub fn shutdown(mut self) -> Vec<NavigationEvent> {
        self.scheduler.abort();
        self.events.push(NavigationEvent::SystemDeinitialized);
        tracing::info!("navigation system shut down");
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::thread;
    use std::time::{Duration, Instant};

    use super::*;
    use crate::error::NavError;
    use crate::pathfinding::{PathStatus, PathType};
    use crate::settings::{AreaSettings, LayerSettings, ALL_AREAS, AREA_COUNT};
    use tracing_subscriber::EnvFilter;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn system(settings: NavigationSettings) -> NavigationSystem {
        init_tracing();
        NavigationSystem::initialize(settings)
    }

    /// Ticks until the worker is idle and nothing is queued.
    fn settle(system: &mut NavigationSystem) {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            system.tick().unwrap();
            if system.scheduler_state() == SchedulerState::ReadyToStart
                && !system.has_pending_work()
            {
                return;
            }
            assert!(Instant::now() < deadline, "navigation system did not settle");
            thread::sleep(Duration::from_millis(1));
        }
    }

    /// Three faces around the origin; only the middle one joins the outer two.
    fn register_fan(system: &mut NavigationSystem) -> [FaceHandle; 3] {
        let sqrt3 = 3f64.sqrt();
        let center = p(0.0, 0.0, 0.0);
        let rim = [
            p(4.0, 0.0, 0.0),
            p(2.0, 0.0, 2.0 * sqrt3),
            p(-2.0, 0.0, 2.0 * sqrt3),
            p(-4.0, 0.0, 0.0),
        ];
        std::array::from_fn(|i| {
            system
                .register_face(center, rim[i], rim[i + 1], 0, 0)
                .unwrap()
        })
    }

    // ── lifecycle ──

    #[test]
    fn initialize_and_shutdown_events() {
        let mut system = system(NavigationSettings::default());
        assert_eq!(system.drain_events(), [NavigationEvent::SystemInitialized]);
        assert!(!system.is_surface_available());
        assert_eq!(system.scheduler_state(), SchedulerState::ReadyToStart);
        assert_eq!(
            system.shutdown(),
            [NavigationEvent::SystemDeinitialized]
        );
    }

    #[test]
    fn building_toggles_availability() {
        let mut system = system(NavigationSettings::default());
        register_fan(&mut system);
        system.drain_events();

        system.tick().unwrap();
        assert!(!system.is_surface_available());
        settle(&mut system);
        assert!(system.is_surface_available());
        assert_eq!(
            system.drain_events(),
            [
                NavigationEvent::SurfaceUnavailable,
                NavigationEvent::SurfaceAvailable
            ]
        );
    }

    #[test]
    fn shutdown_with_job_in_flight() {
        let mut system = system(NavigationSettings::default());
        register_fan(&mut system);
        system.tick().unwrap();
        let events = system.shutdown();
        assert_eq!(events.last(), Some(&NavigationEvent::SystemDeinitialized));
    }

    // ── registration ──

    #[test]
    fn out_of_range_indices_are_rejected() {
        let mut system = system(NavigationSettings::default());
        let (a, b, c) = (p(0.0, 0.0, 0.0), p(0.0, 0.0, 1.0), p(1.0, 0.0, 0.0));
        assert!(matches!(
            system.register_face(a, b, c, AREA_COUNT, 0),
            Err(NavError::System(SystemError::InvalidArea(32)))
        ));
        assert!(matches!(
            system.register_face(a, b, c, 0, 1),
            Err(NavError::System(SystemError::InvalidLayer(1)))
        ));
        assert!(!system.has_pending_work());
    }

    #[test]
    fn handles_carry_area_and_layer() {
        let settings = NavigationSettings::new(vec![LayerSettings::default(); 2])
            .unwrap()
            .with_area(3, AreaSettings::new("mud", 2.5));
        let mut system = system(settings);
        let first = system
            .register_face(p(0.0, 0.0, 0.0), p(0.0, 0.0, 1.0), p(1.0, 0.0, 0.0), 3, 1)
            .unwrap();
        let second = system
            .register_face(p(0.0, 0.0, 0.0), p(0.0, 0.0, 1.0), p(1.0, 0.0, 0.0), 0, 0)
            .unwrap();
        assert_ne!(first.id(), second.id());
        assert_eq!(first.layer(), 1);
        assert_eq!(first.area_mask(), 0b1000);
        assert!((first.weight() - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn unregistered_faces_disappear() {
        let mut system = system(NavigationSettings::default());
        let [first, ..] = register_fan(&mut system);
        settle(&mut system);

        let hit = system
            .raycast(&Ray::down(p(2.0, 0.5, 1.0)), 0, ALL_AREAS)
            .unwrap();
        assert!(system.contains_face(0, hit.face));

        system.unregister_face(first);
        settle(&mut system);
        assert!(!system.contains_face(0, hit.face));
        assert!(system
            .raycast(&Ray::down(p(2.0, 0.5, 1.0)), 0, ALL_AREAS)
            .is_none());
    }

    // ── queries ──

    #[test]
    fn queries_are_empty_while_unavailable() {
        let mut system = system(NavigationSettings::default());
        register_fan(&mut system);
        assert!(system
            .raycast(&Ray::down(p(2.0, 0.5, 1.0)), 0, ALL_AREAS)
            .is_none());
        system.tick().unwrap();
        assert!(system
            .raycast(&Ray::down(p(2.0, 0.5, 1.0)), 0, ALL_AREAS)
            .is_none());
    }

    #[test]
    fn raycast_respects_layer_length() {
        let mut system = system(NavigationSettings::default());
        register_fan(&mut system);
        settle(&mut system);

        let near = system
            .raycast(&Ray::down(p(2.0, 1.5, 1.0)), 0, ALL_AREAS)
            .unwrap();
        assert!((near.distance - 1.5).abs() < 1e-9);
        assert!(system
            .raycast(&Ray::down(p(2.0, 3.0, 1.0)), 0, ALL_AREAS)
            .is_none());
        assert!(system
            .raycast(&Ray::down(p(2.0, 1.5, 1.0)), 4, ALL_AREAS)
            .is_none());
    }

    #[test]
    fn debug_snapshots_follow_building() {
        let mut system = system(NavigationSettings::default().with_debug_snapshots(true));
        assert!(system.debug_snapshot(0).is_none());
        register_fan(&mut system);
        settle(&mut system);

        let snapshot = system.debug_snapshot(0).unwrap();
        assert_eq!(snapshot.face_count, 3);
        assert_eq!(snapshot.vertex_count, 5);
        assert_eq!(snapshot.edge_count, 7);
    }

    // ── path requests ──

    #[test]
    fn fan_request_end_to_end() {
        let mut system = system(NavigationSettings::default());
        register_fan(&mut system);
        let start = p(1.732, 0.0, 1.0);
        let end = p(-1.732, 0.0, 1.0);
        system
            .submit_path_request(
                RequestorKey(7),
                PathRequest::new(0, ALL_AREAS, 0.0, start, end, PathType::Optimized),
            )
            .unwrap();
        settle(&mut system);

        let events = system.drain_events();
        let built = events
            .iter()
            .position(|e| *e == NavigationEvent::SurfaceAvailable)
            .unwrap();
        let found = events
            .iter()
            .position(|e| *e == NavigationEvent::PathfindingFinished)
            .unwrap();
        assert!(built < found);

        let request = system.take_path_result(RequestorKey(7)).unwrap();
        assert_eq!(request.status(), PathStatus::Finished);
        assert_eq!(request.face_path().map(<[_]>::len), Some(3));
        assert_eq!(request.path().unwrap(), &[start, end]);
        assert!(system.take_path_result(RequestorKey(7)).is_none());
    }

    #[test]
    fn newer_request_supersedes_older() {
        let mut system = system(NavigationSettings::default());
        let request = |x| {
            PathRequest::new(
                0,
                ALL_AREAS,
                0.0,
                p(x, 0.0, 1.0),
                p(-1.7, 0.0, 1.0),
                PathType::FaceOnly,
            )
        };
        assert!(system
            .submit_path_request(RequestorKey(1), request(1.7))
            .unwrap()
            .is_none());
        let skipped = system
            .submit_path_request(RequestorKey(1), request(1.8))
            .unwrap()
            .unwrap();
        assert_eq!(skipped.status(), PathStatus::Skipped);
        assert!((skipped.start.x - 1.7).abs() < f64::EPSILON);

        system
            .submit_path_request(RequestorKey(2), request(1.6))
            .unwrap();
        settle(&mut system);
        let mut results = system.drain_path_results();
        results.sort_by_key(|(key, _)| *key);
        assert_eq!(results.len(), 2);
        assert!((results[0].1.start.x - 1.8).abs() < f64::EPSILON);
        // Nothing was registered, so nothing is reachable.
        assert!(results.iter().all(|(_, r)| r.face_path().is_none()));
    }

    #[test]
    fn request_on_missing_layer_is_rejected() {
        let mut system = system(NavigationSettings::default());
        let request = PathRequest::new(
            2,
            ALL_AREAS,
            0.0,
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            PathType::Exact,
        );
        assert!(matches!(
            system.submit_path_request(RequestorKey(1), request),
            Err(NavError::System(SystemError::InvalidLayer(2)))
        ));
    }
}
