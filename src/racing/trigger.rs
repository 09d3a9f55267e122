//! Spatial join trigger.
//!
//! Wraps a world-side sensor zone: player entry events are routed here and
//! turned into race enrollment plus a one-shot lobby countdown. The trigger
//! owns only its timer; all race state lives in the manager.

use std::sync::Arc;
use uuid::Uuid;

use crate::clock::Clock;
use crate::racing::manager::RaceManager;
use crate::world::{Movable, Notifier};

/// Turns sensor-entry events into race joins and arms the lobby countdown.
pub struct JoinTrigger {
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
    lobby_delay_ms: u64,
    /// Due time of the armed one-shot lobby timer, if any.
    deadline_ms: Option<u64>,
}

impl JoinTrigger {
    /// Create a trigger that starts the race `lobby_delay_ms` after the
    /// first entry.
    pub fn new(clock: Arc<dyn Clock>, notifier: Arc<dyn Notifier>, lobby_delay_ms: u64) -> Self {
        Self {
            clock,
            notifier,
            lobby_delay_ms,
            deadline_ms: None,
        }
    }

    /// Handle a player entering the trigger zone.
    ///
    /// Rejected with a direct message while a race is underway; otherwise
    /// the player is enrolled, and the first entry arms the lobby timer
    /// with a broadcast while later entries only get a personal notice.
    pub fn on_enter(&mut self, manager: &mut RaceManager, id: Uuid, name: &str, movable: Arc<dyn Movable>) {
        if manager.race_underway() {
            self.notifier.send_to_player(
                id,
                "A race is currently in progress. Please wait for it to finish.",
            );
            return;
        }

        manager.join_race(id, name, movable);

        if self.deadline_ms.is_none() {
            let seconds = self.lobby_delay_ms / 1_000;
            self.notifier
                .broadcast(&format!("Race starting in {seconds} seconds! Join now!"));
            self.deadline_ms = Some(self.clock.now_ms() + self.lobby_delay_ms);
            manager.arm_countdown();
            tracing::info!("Lobby timer armed for {}ms", self.lobby_delay_ms);
        } else {
            self.notifier
                .send_to_player(id, "You joined! Race starting soon...");
        }
    }

    /// Fire the lobby timer when due. The race only starts if someone is
    /// still registered; an empty lobby just disarms the timer.
    pub fn tick(&mut self, manager: &mut RaceManager) {
        let Some(deadline) = self.deadline_ms else {
            return;
        };
        if self.clock.now_ms() < deadline {
            return;
        }
        self.deadline_ms = None;
        if manager.racer_count() > 0 {
            manager.start_race();
        } else {
            tracing::debug!("Lobby timer elapsed with nobody registered");
        }
    }

    /// Whether the lobby timer is currently armed.
    pub fn is_armed(&self) -> bool {
        self.deadline_ms.is_some()
    }
}
