//! Collaborator interfaces to the embedding game world.
//!
//! The engine never touches rendering, physics, or transport directly;
//! everything it needs from the outside world goes through these traits.
//! Sends are fire-and-forget: a failing collaborator must not block a race
//! state transition, so none of these methods return errors.

pub mod events;

use glam::{DQuat, DVec3};
use uuid::Uuid;

use events::ClientEvent;

/// A participant's controllable body in the world.
///
/// Implementations are expected to be engine-side handles with interior
/// mutability, hence `&self` on the mutating calls.
pub trait Movable: Send + Sync {
    /// Current world position.
    fn position(&self) -> DVec3;
    /// Teleport to a position.
    fn set_position(&self, position: DVec3);
    /// Zero the linear velocity.
    fn reset_linear_velocity(&self);
    /// Zero the angular velocity.
    fn reset_angular_velocity(&self);
    /// Set the world rotation.
    fn set_rotation(&self, rotation: DQuat);
    /// Lock or unlock translation per axis (`true` = locked).
    fn set_axis_lock(&self, x: bool, y: bool, z: bool);
}

/// Outbound messaging to players and their clients.
pub trait Notifier: Send + Sync {
    /// Chat message to a single player.
    fn send_to_player(&self, player: Uuid, message: &str);
    /// Chat message to everyone.
    fn broadcast(&self, message: &str);
    /// Structured event to a single player's client UI.
    fn push_client_event(&self, player: Uuid, event: ClientEvent);
    /// Structured event to every connected client.
    fn broadcast_client_event(&self, event: ClientEvent);
}

/// Opaque handle to a spawned course decoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecorationHandle(pub u64);

/// Spawns and removes transient cosmetic entities.
pub trait WorldSpawner: Send + Sync {
    /// Spawn a decoration at a position.
    fn spawn_decoration(&self, position: DVec3) -> DecorationHandle;
    /// Remove a previously spawned decoration.
    fn despawn_decoration(&self, handle: DecorationHandle);
}

/// Provides neutral spawn points outside the course.
pub trait SpawnPointProvider: Send + Sync {
    /// A spawn coordinate for repositioning a player after a race.
    fn random_spawn_coordinate(&self) -> DVec3;
}
