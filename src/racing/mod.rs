//! Race coordination: course model, lifecycle state machine, live
//! standings, the join trigger, and course dressing.

pub mod course;
pub mod manager;
pub mod obstacles;
pub mod standings;
pub mod trigger;

// Re-export commonly used types
pub use course::{Checkpoint, Course, VerticalBounds};
pub use manager::{RaceManager, RaceState};
pub use trigger::JoinTrigger;
