//! Transient cosmetic obstacles scattered between checkpoints.
//!
//! Spawned once per race when the grid freezes and removed at the finish.
//! Purely decorative: nothing here feeds back into race adjudication.

use glam::DVec3;
use rand::Rng;
use std::sync::Arc;

use crate::racing::course::Course;
use crate::world::{DecorationHandle, WorldSpawner};

/// Lateral jitter applied around the segment line (world units).
const PLACEMENT_JITTER: f64 = 4.0;

/// Height obstacles are dropped in at.
const PLACEMENT_HEIGHT: f64 = 2.0;

/// The set of decorations dressing the current race's course.
pub struct ObstacleField {
    spawner: Arc<dyn WorldSpawner>,
    handles: Vec<DecorationHandle>,
    per_segment: usize,
}

impl ObstacleField {
    /// Create an empty field spawning through `spawner`.
    pub fn new(spawner: Arc<dyn WorldSpawner>, per_segment: usize) -> Self {
        Self {
            spawner,
            handles: Vec::new(),
            per_segment,
        }
    }

    /// Dress the course: a fixed number of obstacles per consecutive
    /// checkpoint pair, at random points along each segment. Any previous
    /// batch is removed first.
    pub fn spawn_for(&mut self, course: &Course) {
        self.despawn_all();

        let checkpoints = course.checkpoints();
        let mut rng = rand::thread_rng();

        for pair in checkpoints.windows(2) {
            for _ in 0..self.per_segment {
                let position = random_segment_position(pair[0].position, pair[1].position, &mut rng);
                self.handles.push(self.spawner.spawn_decoration(position));
            }
        }

        tracing::debug!("Spawned {} course obstacles", self.handles.len());
    }

    /// Remove every spawned obstacle. Safe to call repeatedly.
    pub fn despawn_all(&mut self) {
        for handle in self.handles.drain(..) {
            self.spawner.despawn_decoration(handle);
        }
    }

    /// Number of currently spawned obstacles.
    pub fn count(&self) -> usize {
        self.handles.len()
    }
}

fn random_segment_position(from: DVec3, to: DVec3, rng: &mut impl Rng) -> DVec3 {
    let t: f64 = rng.gen();
    DVec3::new(
        from.x + (to.x - from.x) * t + (rng.gen::<f64>() - 0.5) * PLACEMENT_JITTER,
        PLACEMENT_HEIGHT,
        from.z + (to.z - from.z) * t + (rng.gen::<f64>() - 0.5) * PLACEMENT_JITTER,
    )
}
