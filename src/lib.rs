//! Raceloop - Multiplayer Checkpoint-Race Coordination Engine
//!
//! An embeddable coordination core for checkpoint races: it tracks an
//! arbitrary number of participants through an ordered checkpoint course,
//! drives the race lifecycle (lobby, countdown, active, finish, reset),
//! broadcasts live standings and minimap telemetry, and keeps a best-time
//! leaderboard across races.
//!
//! The engine does no rendering, physics, or networking of its own. The
//! embedding game loop supplies collaborators behind the traits in
//! [`world`] and drives the engine cooperatively from a single scheduler:
//!
//! - call [`RaceManager::tick`] every frame to run the deferred countdown
//!   and finish timelines plus the periodic standings/minimap emission,
//! - call [`RaceManager::check_checkpoints`] at the position-sampling rate,
//! - route spatial-sensor entries through [`JoinTrigger::on_enter`] and
//!   call [`JoinTrigger::tick`] alongside the manager.

pub mod clock;
pub mod geometry;
pub mod racing;
pub mod scores;
pub mod settings;
pub mod world;

// Re-export commonly used types
pub use clock::{Clock, SystemClock};
pub use racing::course::{Checkpoint, Course, VerticalBounds};
pub use racing::manager::{RaceManager, RaceState};
pub use racing::trigger::JoinTrigger;
pub use scores::ledger::ScoreLedger;
pub use settings::RaceSettings;
pub use world::events::ClientEvent;
