//! Race timing and layout configuration.
//!
//! All lifecycle delays, emission intervals, and course-dressing knobs live
//! here so an embedding server can tune them from a TOML file without
//! touching the engine.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable race parameters. Defaults match the reference course setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceSettings {
    /// Lobby window between the first join and the race start (ms).
    pub lobby_countdown_ms: u64,
    /// Delay from race start until racers are teleported to the grid and
    /// frozen (ms).
    pub freeze_delay_ms: u64,
    /// Delay from race start until racers are released and timing begins
    /// (ms). Must exceed `freeze_delay_ms`.
    pub start_delay_ms: u64,
    /// Standings broadcast interval while a race is active (ms).
    pub standings_interval_ms: u64,
    /// Minimap broadcast interval while a race is active (ms).
    pub minimap_interval_ms: u64,
    /// Delay between the finish and the per-racer result delivery (ms).
    pub results_delay_ms: u64,
    /// Delay between the finish and the registry reset (ms). Must exceed
    /// `results_delay_ms`.
    pub reset_delay_ms: u64,
    /// Lateral spacing between grid slots at the start line (world units).
    pub grid_spacing: f64,
    /// Number of entries in the broadcast leaderboard.
    pub leaderboard_size: usize,
    /// Cosmetic obstacles spawned per checkpoint segment.
    pub obstacles_per_segment: usize,
    /// Whether the periodic minimap emission runs at all.
    pub minimap_enabled: bool,
}

impl Default for RaceSettings {
    fn default() -> Self {
        Self {
            lobby_countdown_ms: 5_000,
            freeze_delay_ms: 500,
            start_delay_ms: 3_500,
            standings_interval_ms: 1_000,
            minimap_interval_ms: 100,
            results_delay_ms: 100,
            reset_delay_ms: 200,
            grid_spacing: 2.0,
            leaderboard_size: 10,
            obstacles_per_segment: 2,
            minimap_enabled: true,
        }
    }
}

impl RaceSettings {
    /// Load settings from a TOML file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let raw = std::fs::read_to_string(path)?;
        let settings: Self = toml::from_str(&raw)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check internal ordering constraints of the timeline.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.start_delay_ms <= self.freeze_delay_ms {
            return Err(SettingsError::InvalidTimeline(
                "start_delay_ms must exceed freeze_delay_ms",
            ));
        }
        if self.reset_delay_ms <= self.results_delay_ms {
            return Err(SettingsError::InvalidTimeline(
                "reset_delay_ms must exceed results_delay_ms",
            ));
        }
        Ok(())
    }
}

/// Settings errors.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid race timeline: {0}")]
    InvalidTimeline(&'static str),
}
