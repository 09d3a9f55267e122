//! Live standings and minimap frame computation.
//!
//! Pure functions over progress snapshots so the ordering rules can be
//! tested without a running race.

use glam::DVec3;

use crate::racing::course::Course;
use crate::world::events::{MinimapCheckpoint, MinimapPlayer, StandingEntry};

/// A racer's progress at one instant, as fed to the standings sort.
#[derive(Debug, Clone)]
pub struct RacerProgress {
    pub name: String,
    pub elapsed_ms: u64,
    pub checkpoints_passed: usize,
}

/// Rank racers by course progress (descending), ties broken by elapsed
/// time (ascending).
pub fn compute_standings(racers: &[RacerProgress], total_checkpoints: usize) -> Vec<StandingEntry> {
    let mut standings: Vec<StandingEntry> = racers
        .iter()
        .map(|racer| StandingEntry {
            name: racer.name.clone(),
            elapsed_ms: racer.elapsed_ms,
            progress_pct: racer.checkpoints_passed as f64 / total_checkpoints as f64 * 100.0,
        })
        .collect();

    standings.sort_by(|a, b| {
        b.progress_pct
            .partial_cmp(&a.progress_pct)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.elapsed_ms.cmp(&b.elapsed_ms))
    });

    standings
}

/// Minimap frame personalized for the racer at `viewer_index`: their own
/// marker is flagged, and checkpoint completion reflects their progress.
pub fn compute_minimap_frame(
    positions: &[DVec3],
    viewer_index: usize,
    viewer_checkpoints_passed: usize,
    course: &Course,
) -> (Vec<MinimapPlayer>, Vec<MinimapCheckpoint>) {
    let players = positions
        .iter()
        .enumerate()
        .map(|(index, position)| MinimapPlayer {
            position: *position,
            is_current_player: index == viewer_index,
        })
        .collect();

    let checkpoints = course
        .checkpoints()
        .iter()
        .enumerate()
        .map(|(index, cp)| MinimapCheckpoint {
            x: cp.position.x,
            z: cp.position.z,
            completed: index < viewer_checkpoints_passed,
        })
        .collect();

    (players, checkpoints)
}
