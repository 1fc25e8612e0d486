pub mod ordered_set;
pub mod usage;

pub use ordered_set::OrderedSet;
pub use usage::{Usage, UsageTracker};
