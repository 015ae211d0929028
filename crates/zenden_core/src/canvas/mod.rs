//! Canvas arithmetic for placing and transforming garden items.
//!
//! # Responsibility
//! - Keep drag/resize/rotate math out of the client so it can be tested.
//! - Maintain stacking order when items are raised, lowered or placed.
//!
//! # Invariants
//! - Positions stay inside `CanvasBounds` after any move.
//! - Scale stays inside `[MIN_SCALE, MAX_SCALE]` after any resize.
//! - Rotation is normalized to `[0, 360)` after any rotate.

mod stacking;
mod transform;

pub use stacking::{bring_to_front, place, remove, send_to_back};
pub use transform::{
    drag, move_to, normalize_degrees, resize, rotate, rotation_toward, MAX_SCALE, MIN_SCALE,
};

use crate::model::garden::Position;

/// Drawable area in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasBounds {
    pub width: f64,
    pub height: f64,
}

impl CanvasBounds {
    /// Negative or non-finite sizes collapse to zero.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: sanitize_extent(width),
            height: sanitize_extent(height),
        }
    }

    /// Clamps a point into the drawable area.
    pub fn clamp(&self, position: Position) -> Position {
        Position {
            x: clamp_axis(position.x, self.width),
            y: clamp_axis(position.y, self.height),
        }
    }
}

fn sanitize_extent(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn clamp_axis(value: f64, extent: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, extent)
}
