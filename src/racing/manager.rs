//! Race lifecycle state machine.
//!
//! Owns the checkpoint course and the participant registry for the race it
//! is running, advances participant progress from position samples, and
//! drives the countdown and finish timelines as deferred actions against
//! the injected clock. All mutation happens from the embedding loop's
//! single cooperative scheduler, so precondition violations degrade to
//! logged no-ops instead of errors.

use glam::{DQuat, DVec3};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::clock::Clock;
use crate::racing::course::Course;
use crate::racing::obstacles::ObstacleField;
use crate::racing::standings::{self, RacerProgress};
use crate::scores::ledger::ScoreLedger;
use crate::settings::RaceSettings;
use crate::world::events::ClientEvent;
use crate::world::{Movable, Notifier, SpawnPointProvider, WorldSpawner};

/// Race lifecycle state. One race at a time occupies the non-idle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaceState {
    /// No race pending; joins accepted.
    Idle,
    /// Lobby timer armed by the join trigger; joins still accepted.
    CountdownArmed,
    /// Countdown timeline running; grid freeze pending or in effect.
    CountingDown,
    /// Racers released, checkpoints being adjudicated.
    Active,
    /// Winner decided; results and reset pending.
    Finishing,
}

impl RaceState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RaceState::Idle => "idle",
            RaceState::CountdownArmed => "countdown_armed",
            RaceState::CountingDown => "counting_down",
            RaceState::Active => "active",
            RaceState::Finishing => "finishing",
        }
    }
}

/// A registered race participant.
struct Racer {
    id: Uuid,
    name: String,
    movable: Arc<dyn Movable>,
    checkpoints_passed: usize,
    start_time_ms: Option<u64>,
    last_known_position: DVec3,
}

/// A racer's captured end-of-race result, carried by the deferred
/// delivery action.
#[derive(Debug, Clone)]
struct RaceOutcome {
    racer: Uuid,
    elapsed_ms: u64,
    best_ms: Option<u64>,
    is_winner: bool,
}

/// A deferred lifecycle action and its due time.
struct PendingAction {
    due_ms: u64,
    action: DeferredAction,
}

enum DeferredAction {
    /// Tell every racer's client the countdown has begun.
    CountdownBegin,
    /// Teleport racers to their grid slots, freeze them, dress the course.
    PlaceAndLock { slots: Vec<DVec3> },
    /// Unfreeze, stamp start times, go `Active`.
    ReleaseAndStart,
    /// Deliver per-racer results and move everyone to a neutral spawn.
    DeliverResults { outcomes: Vec<RaceOutcome> },
    /// Drop the registry and return to `Idle`.
    ClearRegistry,
}

/// Coordinates a single race at a time over a fixed course.
pub struct RaceManager {
    course: Course,
    settings: RaceSettings,
    state: RaceState,
    /// Join order; doubles as the same-tick finish tie-break order.
    racers: Vec<Racer>,
    pending: Vec<PendingAction>,
    standings_last_emit_ms: u64,
    minimap_last_emit_ms: u64,
    obstacles: ObstacleField,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
    spawn_points: Arc<dyn SpawnPointProvider>,
    ledger: Arc<Mutex<ScoreLedger>>,
}

impl RaceManager {
    /// Create a manager for `course` wired to its collaborators.
    pub fn new(
        course: Course,
        settings: RaceSettings,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
        spawner: Arc<dyn WorldSpawner>,
        spawn_points: Arc<dyn SpawnPointProvider>,
        ledger: Arc<Mutex<ScoreLedger>>,
    ) -> Self {
        let obstacles = ObstacleField::new(spawner, settings.obstacles_per_segment);
        Self {
            course,
            settings,
            state: RaceState::Idle,
            racers: Vec::new(),
            pending: Vec::new(),
            standings_last_emit_ms: 0,
            minimap_last_emit_ms: 0,
            obstacles,
            clock,
            notifier,
            spawn_points,
            ledger,
        }
    }

    /// Enroll a player in the pending race. Dropped silently outside the
    /// lobby states or when the player is already registered; duplicate
    /// joins and late joins are expected in live play, not errors.
    pub fn join_race(&mut self, id: Uuid, name: &str, movable: Arc<dyn Movable>) {
        if !matches!(self.state, RaceState::Idle | RaceState::CountdownArmed) {
            tracing::debug!("Join dropped for {}: race is {}", name, self.state.as_str());
            return;
        }
        if self.racers.iter().any(|racer| racer.id == id) {
            tracing::debug!("Join dropped for {}: already registered", name);
            return;
        }

        let last_known_position = movable.position();
        self.racers.push(Racer {
            id,
            name: name.to_string(),
            movable,
            checkpoints_passed: 0,
            start_time_ms: None,
            last_known_position,
        });

        self.notifier.send_to_player(id, "You joined the race!");
        let count = self.racers.len();
        let plural = if count == 1 { "" } else { "s" };
        self.notifier
            .broadcast(&format!("{count} player{plural} waiting to race"));
        tracing::info!("{} joined the race ({} waiting)", name, count);
    }

    /// Mark the lobby timer as armed. No-op outside `Idle`.
    pub fn arm_countdown(&mut self) {
        if self.state == RaceState::Idle {
            self.state = RaceState::CountdownArmed;
            tracing::info!("Lobby countdown armed");
        }
    }

    /// Begin the start countdown. Requires at least one registered racer
    /// and a race not already underway.
    pub fn start_race(&mut self) {
        if self.racers.is_empty() {
            tracing::debug!("Start dropped: no racers registered");
            return;
        }
        if !matches!(self.state, RaceState::Idle | RaceState::CountdownArmed) {
            tracing::debug!("Start dropped: race is {}", self.state.as_str());
            return;
        }

        self.state = RaceState::CountingDown;

        // Grid slots spread laterally around the first checkpoint so
        // racers do not overlap when frozen
        let base = self.course.start_position();
        let spread = (self.racers.len() / 2) as isize;
        let slots: Vec<DVec3> = (0..self.racers.len())
            .map(|index| {
                let offset = (index as isize - spread) as f64 * self.settings.grid_spacing;
                DVec3::new(base.x + offset, base.y, base.z)
            })
            .collect();

        let now = self.clock.now_ms();
        self.schedule(now, DeferredAction::CountdownBegin);
        self.schedule(
            now + self.settings.freeze_delay_ms,
            DeferredAction::PlaceAndLock { slots },
        );
        self.schedule(now + self.settings.start_delay_ms, DeferredAction::ReleaseAndStart);

        tracing::info!("Race countdown started with {} racer(s)", self.racers.len());
    }

    /// Advance participant progress from current positions. Acts only
    /// while `Active`. Each invocation advances a racer by at most one
    /// checkpoint; a racer completing the sequence finishes the race, and
    /// same-tick ties go to the racer earliest in join order.
    pub fn check_checkpoints(&mut self) {
        if self.state != RaceState::Active {
            return;
        }

        let total = self.course.len();
        let mut disqualified: Vec<Uuid> = Vec::new();
        let mut finishers: Vec<Uuid> = Vec::new();

        for racer in &mut self.racers {
            let position = racer.movable.position();
            racer.last_known_position = position;

            if self.course.out_of_bounds(position) {
                disqualified.push(racer.id);
                continue;
            }

            if self.course.captures(racer.checkpoints_passed, position) {
                racer.checkpoints_passed += 1;
                if racer.checkpoints_passed == total {
                    finishers.push(racer.id);
                }
            }
        }

        for id in disqualified {
            self.disqualify(id);
        }
        // Only the first call leaves `Active`; later finishers this tick
        // hit the idempotency guard
        for id in finishers {
            self.finish_race(id);
        }
    }

    /// Adjudicate the finish. Idempotent: only the transition out of
    /// `Active` takes effect, so a second finisher in the same tick (or a
    /// stray repeated call) is dropped.
    pub fn finish_race(&mut self, winner: Uuid) {
        if self.state != RaceState::Active {
            tracing::debug!("Finish dropped: race is {}", self.state.as_str());
            return;
        }
        let now = self.clock.now_ms();
        let Some(winner_racer) = self.racers.iter().find(|racer| racer.id == winner) else {
            tracing::debug!("Finish dropped: winner no longer registered");
            return;
        };
        let winner_name = winner_racer.name.clone();
        let winner_elapsed = now.saturating_sub(winner_racer.start_time_ms.unwrap_or(now));

        self.state = RaceState::Finishing;

        self.ledger
            .lock()
            .expect("score ledger lock")
            .submit(winner, &winner_name, winner_elapsed);

        // Single "standings cleared" push; the periodic emission stops on
        // its own now that the race has left `Active`
        for racer in &self.racers {
            self.notifier
                .push_client_event(racer.id, ClientEvent::RaceStandings { standings: None });
        }

        let outcomes: Vec<RaceOutcome> = {
            let ledger = self.ledger.lock().expect("score ledger lock");
            self.racers
                .iter()
                .map(|racer| RaceOutcome {
                    racer: racer.id,
                    elapsed_ms: now.saturating_sub(racer.start_time_ms.unwrap_or(now)),
                    best_ms: ledger.player_best(racer.id),
                    is_winner: racer.id == winner,
                })
                .collect()
        };

        self.obstacles.despawn_all();

        self.schedule(
            now + self.settings.results_delay_ms,
            DeferredAction::DeliverResults { outcomes },
        );
        self.schedule(now + self.settings.reset_delay_ms, DeferredAction::ClearRegistry);

        tracing::info!("Race finished: {} wins in {}ms", winner_name, winner_elapsed);
    }

    /// Run due deferred actions and the periodic emissions. Call once per
    /// scheduler tick.
    pub fn tick(&mut self) {
        let now = self.clock.now_ms();
        while self
            .pending
            .first()
            .map_or(false, |pending| pending.due_ms <= now)
        {
            let pending = self.pending.remove(0);
            self.apply(pending.action, now);
        }
        self.emit_periodic(now);
    }

    /// Number of currently registered racers.
    pub fn racer_count(&self) -> usize {
        self.racers.len()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RaceState {
        self.state
    }

    /// Whether a race is underway, from countdown through reset. Entry
    /// attempts are rejected by the join trigger while this holds.
    pub fn race_underway(&self) -> bool {
        matches!(
            self.state,
            RaceState::CountingDown | RaceState::Active | RaceState::Finishing
        )
    }

    /// Checkpoints passed by a registered racer.
    pub fn checkpoints_passed(&self, player: Uuid) -> Option<usize> {
        self.racers
            .iter()
            .find(|racer| racer.id == player)
            .map(|racer| racer.checkpoints_passed)
    }

    /// Where a registered racer was last sampled by `check_checkpoints`.
    pub fn last_known_position(&self, player: Uuid) -> Option<DVec3> {
        self.racers
            .iter()
            .find(|racer| racer.id == player)
            .map(|racer| racer.last_known_position)
    }

    fn schedule(&mut self, due_ms: u64, action: DeferredAction) {
        self.pending.push(PendingAction { due_ms, action });
        // Stable: equal due times keep their insertion order
        self.pending.sort_by_key(|pending| pending.due_ms);
    }

    fn apply(&mut self, action: DeferredAction, now: u64) {
        match action {
            DeferredAction::CountdownBegin => {
                for racer in &self.racers {
                    self.notifier.push_client_event(racer.id, ClientEvent::GameStart);
                }
            }
            DeferredAction::PlaceAndLock { slots } => {
                for (racer, slot) in self.racers.iter().zip(slots) {
                    racer.movable.reset_angular_velocity();
                    racer.movable.reset_linear_velocity();
                    racer.movable.set_position(slot);
                    // Frozen so nobody drifts or falls during the countdown
                    racer.movable.set_axis_lock(true, true, true);
                }
                self.obstacles.spawn_for(&self.course);
            }
            DeferredAction::ReleaseAndStart => {
                for racer in &mut self.racers {
                    racer.movable.set_axis_lock(false, false, false);
                    racer.start_time_ms = Some(now);
                }
                self.state = RaceState::Active;
                self.standings_last_emit_ms = now;
                self.minimap_last_emit_ms = now;
                tracing::info!("Race active with {} racer(s)", self.racers.len());
            }
            DeferredAction::DeliverResults { outcomes } => {
                for outcome in outcomes {
                    self.notifier.push_client_event(
                        outcome.racer,
                        ClientEvent::GameEnd {
                            score_time: outcome.elapsed_ms,
                            last_top_score_time: outcome.best_ms,
                            is_winner: outcome.is_winner,
                        },
                    );
                    // Racer may have disconnected during the delay
                    if let Some(racer) = self.racers.iter().find(|racer| racer.id == outcome.racer)
                    {
                        racer.movable.reset_angular_velocity();
                        racer.movable.reset_linear_velocity();
                        racer.movable.set_rotation(DQuat::IDENTITY);
                        racer
                            .movable
                            .set_position(self.spawn_points.random_spawn_coordinate());
                    }
                }
            }
            DeferredAction::ClearRegistry => {
                self.racers.clear();
                self.state = RaceState::Idle;
                tracing::info!("Race reset, registry cleared");
            }
        }
    }

    fn emit_periodic(&mut self, now: u64) {
        // Checked on every firing: leaving `Active` stops both emitters
        // without an external cancel
        if self.state != RaceState::Active {
            return;
        }

        if now.saturating_sub(self.standings_last_emit_ms) >= self.settings.standings_interval_ms {
            self.standings_last_emit_ms = now;
            self.emit_standings(now);
        }

        if self.settings.minimap_enabled
            && now.saturating_sub(self.minimap_last_emit_ms) >= self.settings.minimap_interval_ms
        {
            self.minimap_last_emit_ms = now;
            self.emit_minimap();
        }
    }

    fn emit_standings(&self, now: u64) {
        let progress: Vec<RacerProgress> = self
            .racers
            .iter()
            .map(|racer| RacerProgress {
                name: racer.name.clone(),
                elapsed_ms: now.saturating_sub(racer.start_time_ms.unwrap_or(now)),
                checkpoints_passed: racer.checkpoints_passed,
            })
            .collect();
        let standings = standings::compute_standings(&progress, self.course.len());

        for racer in &self.racers {
            self.notifier.push_client_event(
                racer.id,
                ClientEvent::RaceStandings {
                    standings: Some(standings.clone()),
                },
            );
        }
    }

    fn emit_minimap(&self) {
        let positions: Vec<DVec3> = self
            .racers
            .iter()
            .map(|racer| racer.movable.position())
            .collect();

        for (viewer_index, viewer) in self.racers.iter().enumerate() {
            let (players, checkpoints) = standings::compute_minimap_frame(
                &positions,
                viewer_index,
                viewer.checkpoints_passed,
                &self.course,
            );
            self.notifier.push_client_event(
                viewer.id,
                ClientEvent::MinimapUpdate {
                    players,
                    checkpoints,
                },
            );
        }
    }

    fn disqualify(&mut self, id: Uuid) {
        let Some(index) = self.racers.iter().position(|racer| racer.id == id) else {
            return;
        };
        let racer = self.racers.remove(index);
        self.notifier
            .send_to_player(racer.id, "You left the course and are out of this race.");
        tracing::warn!("{} disqualified: out of bounds", racer.name);

        // A race nobody is left in cannot finish; wind it down
        if self.racers.is_empty() && self.state == RaceState::Active {
            self.obstacles.despawn_all();
            self.pending.clear();
            self.state = RaceState::Idle;
            tracing::info!("Race abandoned: no racers remain");
        }
    }
}
