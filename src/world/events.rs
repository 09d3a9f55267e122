//! Client-facing event payloads.
//!
//! Serialized with a `type` tag and camelCase fields, matching what the
//! client UI layer consumes.

use glam::DVec3;
use serde::Serialize;

use crate::scores::ledger::ScoreEntry;

/// Structured event pushed to a player's client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ClientEvent {
    /// Countdown has begun for a race the player is in.
    GameStart,
    /// Live standings update; `None` clears the standings display.
    RaceStandings { standings: Option<Vec<StandingEntry>> },
    /// Personalized minimap frame.
    MinimapUpdate {
        players: Vec<MinimapPlayer>,
        checkpoints: Vec<MinimapCheckpoint>,
    },
    /// Race over, with the receiving player's own result.
    GameEnd {
        score_time: u64,
        last_top_score_time: Option<u64>,
        is_winner: bool,
    },
    /// Best-time leaderboard changed.
    Leaderboard { scores: Vec<ScoreEntry> },
}

/// One row of the live standings list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingEntry {
    pub name: String,
    pub elapsed_ms: u64,
    pub progress_pct: f64,
}

/// A racer marker on the minimap.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MinimapPlayer {
    pub position: DVec3,
    pub is_current_player: bool,
}

/// A checkpoint marker on the minimap, flagged once the receiving player
/// has passed it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MinimapCheckpoint {
    pub x: f64,
    pub z: f64,
    pub completed: bool,
}
