//! Mock world collaborators for integration tests.
//!
//! Everything here is deterministic: a manually advanced clock, movables
//! whose positions the test places directly, and a notifier that records
//! every send for later assertions.

#![allow(dead_code)]

use glam::{DQuat, DVec3};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use raceloop::world::events::ClientEvent;
use raceloop::world::{DecorationHandle, Movable, Notifier, SpawnPointProvider, WorldSpawner};
use raceloop::Clock;

/// Test clock advanced by hand.
pub struct ManualClock {
    now_ms: AtomicU64,
}

impl ManualClock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            now_ms: AtomicU64::new(0),
        })
    }

    pub fn advance(&self, delta_ms: u64) {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

/// Movable handle whose position tests set directly.
pub struct MockMovable {
    position: Mutex<DVec3>,
    pub axis_locks: Mutex<(bool, bool, bool)>,
    pub rotation: Mutex<DQuat>,
}

impl MockMovable {
    pub fn at(position: DVec3) -> Arc<Self> {
        Arc::new(Self {
            position: Mutex::new(position),
            axis_locks: Mutex::new((false, false, false)),
            rotation: Mutex::new(DQuat::IDENTITY),
        })
    }

    /// Place the body somewhere, as the physics engine would.
    pub fn place(&self, position: DVec3) {
        *self.position.lock().unwrap() = position;
    }

    pub fn is_locked(&self) -> bool {
        *self.axis_locks.lock().unwrap() == (true, true, true)
    }
}

impl Movable for MockMovable {
    fn position(&self) -> DVec3 {
        *self.position.lock().unwrap()
    }

    fn set_position(&self, position: DVec3) {
        *self.position.lock().unwrap() = position;
    }

    fn reset_linear_velocity(&self) {}

    fn reset_angular_velocity(&self) {}

    fn set_rotation(&self, rotation: DQuat) {
        *self.rotation.lock().unwrap() = rotation;
    }

    fn set_axis_lock(&self, x: bool, y: bool, z: bool) {
        *self.axis_locks.lock().unwrap() = (x, y, z);
    }
}

/// Notifier that records every outbound message and event.
#[derive(Default)]
pub struct RecordingNotifier {
    pub player_messages: Mutex<Vec<(Uuid, String)>>,
    pub broadcasts: Mutex<Vec<String>>,
    pub player_events: Mutex<Vec<(Uuid, ClientEvent)>>,
    pub broadcast_events: Mutex<Vec<ClientEvent>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Events pushed to one player's client, in send order.
    pub fn events_for(&self, player: Uuid) -> Vec<ClientEvent> {
        self.player_events
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| *id == player)
            .map(|(_, event)| event.clone())
            .collect()
    }

    /// Chat messages sent directly to one player.
    pub fn messages_for(&self, player: Uuid) -> Vec<String> {
        self.player_messages
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| *id == player)
            .map(|(_, message)| message.clone())
            .collect()
    }

    /// The player's `game-end` payloads as (scoreTime, lastTopScoreTime,
    /// isWinner) tuples.
    pub fn game_ends_for(&self, player: Uuid) -> Vec<(u64, Option<u64>, bool)> {
        self.events_for(player)
            .into_iter()
            .filter_map(|event| match event {
                ClientEvent::GameEnd {
                    score_time,
                    last_top_score_time,
                    is_winner,
                } => Some((score_time, last_top_score_time, is_winner)),
                _ => None,
            })
            .collect()
    }

    /// Number of cleared-standings pushes a player received.
    pub fn cleared_standings_count(&self, player: Uuid) -> usize {
        self.events_for(player)
            .into_iter()
            .filter(|event| matches!(event, ClientEvent::RaceStandings { standings: None }))
            .count()
    }

    /// All broadcast leaderboard events.
    pub fn leaderboard_broadcasts(&self) -> Vec<ClientEvent> {
        self.broadcast_events
            .lock()
            .unwrap()
            .iter()
            .filter(|event| matches!(event, ClientEvent::Leaderboard { .. }))
            .cloned()
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn send_to_player(&self, player: Uuid, message: &str) {
        self.player_messages
            .lock()
            .unwrap()
            .push((player, message.to_string()));
    }

    fn broadcast(&self, message: &str) {
        self.broadcasts.lock().unwrap().push(message.to_string());
    }

    fn push_client_event(&self, player: Uuid, event: ClientEvent) {
        self.player_events.lock().unwrap().push((player, event));
    }

    fn broadcast_client_event(&self, event: ClientEvent) {
        self.broadcast_events.lock().unwrap().push(event);
    }
}

/// Spawner tracking live decoration handles.
#[derive(Default)]
pub struct TrackingSpawner {
    next_handle: AtomicU64,
    pub live: Mutex<Vec<DecorationHandle>>,
}

impl TrackingSpawner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn live_count(&self) -> usize {
        self.live.lock().unwrap().len()
    }
}

impl WorldSpawner for TrackingSpawner {
    fn spawn_decoration(&self, _position: DVec3) -> DecorationHandle {
        let handle = DecorationHandle(self.next_handle.fetch_add(1, Ordering::SeqCst));
        self.live.lock().unwrap().push(handle);
        handle
    }

    fn despawn_decoration(&self, handle: DecorationHandle) {
        self.live.lock().unwrap().retain(|h| *h != handle);
    }
}

/// Spawn point provider returning one fixed coordinate.
pub struct FixedSpawnPoint(pub DVec3);

impl SpawnPointProvider for FixedSpawnPoint {
    fn random_spawn_coordinate(&self) -> DVec3 {
        self.0
    }
}
