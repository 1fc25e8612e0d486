pub mod background;
pub mod collections;
pub mod error;
pub mod geometry;
pub mod math;
pub mod pathfinding;
pub mod settings;
pub mod system;
pub mod topology;

pub use error::{NavError, Result};
pub use system::{NavigationEvent, NavigationSystem};
