//! Course topology: the ordered checkpoint sequence and optional bounds.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::geometry;

/// A course waypoint with a capture radius.
///
/// Checkpoints are passed strictly in sequence order (the position in the
/// course's checkpoint list). The `order` field is descriptive metadata for
/// map tooling and plays no part in sequencing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub position: DVec3,
    pub radius: f64,
    pub order: u32,
}

/// Vertical out-of-bounds rule. When configured on a course, racers whose
/// `y` leaves `[min_y, max_y]` are disqualified.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VerticalBounds {
    pub min_y: f64,
    pub max_y: f64,
}

/// An immutable, validated checkpoint sequence.
#[derive(Debug, Clone)]
pub struct Course {
    checkpoints: Vec<Checkpoint>,
    vertical_bounds: Option<VerticalBounds>,
}

impl Course {
    /// Build a course from an ordered checkpoint list.
    pub fn new(checkpoints: Vec<Checkpoint>) -> Result<Self, CourseError> {
        if checkpoints.is_empty() {
            return Err(CourseError::EmptyCourse);
        }
        for (index, checkpoint) in checkpoints.iter().enumerate() {
            if !(checkpoint.radius.is_finite() && checkpoint.radius > 0.0) {
                return Err(CourseError::InvalidRadius {
                    index,
                    radius: checkpoint.radius,
                });
            }
        }
        Ok(Self {
            checkpoints,
            vertical_bounds: None,
        })
    }

    /// Enable the disqualify-on-out-of-bounds rule.
    pub fn with_vertical_bounds(mut self, bounds: VerticalBounds) -> Self {
        self.vertical_bounds = Some(bounds);
        self
    }

    /// Checkpoint at a sequence index.
    pub fn checkpoint(&self, index: usize) -> Option<&Checkpoint> {
        self.checkpoints.get(index)
    }

    /// All checkpoints in sequence order.
    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    /// Number of checkpoints a racer must pass to finish.
    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    /// A course is never empty; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    /// Position of the first checkpoint, the base of the starting grid.
    pub fn start_position(&self) -> DVec3 {
        self.checkpoints[0].position
    }

    /// Whether `position` captures the checkpoint at `index`.
    pub fn captures(&self, index: usize, position: DVec3) -> bool {
        match self.checkpoint(index) {
            Some(cp) => geometry::within_radius(position, cp.position, cp.radius),
            None => false,
        }
    }

    /// Whether `position` violates the configured vertical bounds. Always
    /// `false` when no bounds rule is set.
    pub fn out_of_bounds(&self, position: DVec3) -> bool {
        match self.vertical_bounds {
            Some(bounds) => position.y < bounds.min_y || position.y > bounds.max_y,
            None => false,
        }
    }
}

/// Course construction errors.
#[derive(Debug, thiserror::Error)]
pub enum CourseError {
    #[error("A course needs at least one checkpoint")]
    EmptyCourse,

    #[error("Checkpoint {index} has invalid radius {radius}")]
    InvalidRadius { index: usize, radius: f64 },
}
