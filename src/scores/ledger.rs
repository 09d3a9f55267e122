//! Score ledger and derived leaderboard.
//!
//! Records each player's best finish time across the life of the process
//! and maintains the ascending top-N view, broadcasting it only when the
//! visible entries actually change.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::world::events::ClientEvent;
use crate::world::Notifier;

/// One leaderboard row as shown to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreEntry {
    pub name: String,
    /// Best finish time in milliseconds.
    pub score: u64,
}

#[derive(Debug, Clone)]
struct PlayerBest {
    name: String,
    best_ms: u64,
}

/// Per-player best times and the derived top-N leaderboard.
///
/// One ledger is shared across all sequential races of a manager; entries
/// survive race resets.
pub struct ScoreLedger {
    notifier: Arc<dyn Notifier>,
    bests: HashMap<Uuid, PlayerBest>,
    top_scores: Vec<ScoreEntry>,
    limit: usize,
}

impl ScoreLedger {
    /// Create an empty ledger broadcasting through `notifier`, keeping the
    /// best `limit` entries visible.
    pub fn new(notifier: Arc<dyn Notifier>, limit: usize) -> Self {
        Self {
            notifier,
            bests: HashMap::new(),
            top_scores: Vec::new(),
            limit,
        }
    }

    /// Record a finish time. Accepted only on strict improvement over the
    /// player's existing best; returns whether the time was recorded.
    pub fn submit(&mut self, player: Uuid, name: &str, time_ms: u64) -> bool {
        let improved = match self.bests.get(&player) {
            Some(best) => time_ms < best.best_ms,
            None => true,
        };
        if !improved {
            tracing::debug!("Ledger: {} did not improve on their best", name);
            return false;
        }

        tracing::info!("Ledger: new best for {}: {}ms", name, time_ms);
        self.bests.insert(
            player,
            PlayerBest {
                name: name.to_string(),
                best_ms: time_ms,
            },
        );
        self.recalculate();
        true
    }

    /// The player's best time, if they have ever finished.
    pub fn player_best(&self, player: Uuid) -> Option<u64> {
        self.bests.get(&player).map(|best| best.best_ms)
    }

    /// Current leaderboard view, ascending by time.
    pub fn top_scores(&self) -> &[ScoreEntry] {
        &self.top_scores
    }

    fn recalculate(&mut self) {
        let mut entries: Vec<&PlayerBest> = self.bests.values().collect();
        // Name is the tie-break so recomputation is deterministic
        entries.sort_by(|a, b| a.best_ms.cmp(&b.best_ms).then_with(|| a.name.cmp(&b.name)));

        let top: Vec<ScoreEntry> = entries
            .into_iter()
            .take(self.limit)
            .map(|best| ScoreEntry {
                name: best.name.clone(),
                score: best.best_ms,
            })
            .collect();

        // Only rebroadcast when the visible top-N actually changed
        if top != self.top_scores {
            self.top_scores = top;
            self.notifier.broadcast_client_event(ClientEvent::Leaderboard {
                scores: self.top_scores.clone(),
            });
        }
    }
}
