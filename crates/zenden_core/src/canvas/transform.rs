//! Drag, resize and rotate math.

use super::CanvasBounds;
use crate::model::garden::{GardenItem, Position};

/// Smallest scale a resize can reach.
pub const MIN_SCALE: f64 = 0.25;
/// Largest scale a resize can reach.
pub const MAX_SCALE: f64 = 3.0;

/// Moves an item by a pointer delta, keeping it on the canvas.
pub fn drag(item: &mut GardenItem, dx: f64, dy: f64, bounds: &CanvasBounds) {
    let dx = if dx.is_finite() { dx } else { 0.0 };
    let dy = if dy.is_finite() { dy } else { 0.0 };
    let target = Position::new(item.position.x + dx, item.position.y + dy);
    item.position = bounds.clamp(target);
}

/// Moves an item to an absolute point, keeping it on the canvas.
pub fn move_to(item: &mut GardenItem, position: Position, bounds: &CanvasBounds) {
    item.position = bounds.clamp(position);
}

/// Multiplies the item scale by `factor` and returns the resulting scale.
///
/// Non-finite or non-positive factors leave the item unchanged.
pub fn resize(item: &mut GardenItem, factor: f64) -> f64 {
    if !factor.is_finite() || factor <= 0.0 {
        return item.scale;
    }
    item.scale = (item.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
    item.scale
}

/// Adds `degrees` to the item rotation and returns the normalized result.
pub fn rotate(item: &mut GardenItem, degrees: f64) -> f64 {
    if degrees.is_finite() {
        item.rotation = normalize_degrees(item.rotation + degrees);
    }
    item.rotation
}

/// Angle from `center` to `pointer`, with 0 pointing up and clockwise positive.
///
/// Returns `None` when the pointer sits on the centre.
pub fn rotation_toward(center: Position, pointer: Position) -> Option<f64> {
    let dx = pointer.x - center.x;
    let dy = pointer.y - center.y;
    if dx == 0.0 && dy == 0.0 {
        return None;
    }
    // Screen y grows downward, so "up" is -dy.
    Some(normalize_degrees(dx.atan2(-dy).to_degrees()))
}

/// Wraps any finite angle into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}
