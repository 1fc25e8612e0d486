//! Off-thread surface building and pathfinding.
//!
//! Surface edits and path requests are batched into [`Job`]s and run one at
//! a time by the [`BackgroundScheduler`].

mod command;
mod job;
mod scheduler;

pub use command::SurfaceCommand;
pub use job::{BuildingJob, Job, JobOutcome, PathfindingJob, SharedLayers};
pub use scheduler::{BackgroundScheduler, SchedulerState};
