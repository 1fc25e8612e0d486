use thiserror::Error;

/// Top-level error type for the navigation engine.
#[derive(Debug, Error)]
pub enum NavError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    System(#[from] SystemError),
}

/// Errors related to geometric primitives.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to the topology store of a navigation layer.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("entity not found: {0}")]
    EntityNotFound(&'static str),

    #[error("attempt to remove a user that is not tracked")]
    UnknownUser,

    #[error("navigation layers lock poisoned by a panicked job")]
    LockPoisoned,
}

/// Errors related to the background scheduler.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("only one background job can be active; join or abort it first")]
    Busy,

    #[error("no job to join")]
    NothingToJoin,

    #[error("job cannot be joined because it is not finished")]
    NotFinished,

    #[error("background worker panicked")]
    WorkerPanicked,

    #[error("failed to spawn background worker: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Errors related to navigation settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("{setting} = {value} is below the minimum of {min}")]
    BelowMinimum {
        setting: &'static str,
        value: f64,
        min: f64,
    },

    #[error("layer count {0} is out of range [1, {max}]", max = crate::settings::MAX_LAYERS)]
    LayerCount(usize),
}

/// Caller misuse of the navigation system API.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error("area index {0} is out of bounds")]
    InvalidArea(usize),

    #[error("layer index {0} is out of bounds")]
    InvalidLayer(usize),
}

/// Convenience type alias for results using [`NavError`].
pub type Result<T> = std::result::Result<T, NavError>;
