//! Stacking order and item placement.

use super::CanvasBounds;
use crate::model::garden::{GardenItem, ItemKind, Position};

/// Raises the item above every other item. Returns `false` when absent.
pub fn bring_to_front(items: &mut [GardenItem], id: &str) -> bool {
    let top = max_z(items, Some(id));
    set_z(items, id, top.map_or(0, |z| z.saturating_add(1)))
}

/// Lowers the item below every other item. Returns `false` when absent.
pub fn send_to_back(items: &mut [GardenItem], id: &str) -> bool {
    let bottom = items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.id != id)
        .map(|(index, item)| stacking_key(item, index))
        .min();
    set_z(items, id, bottom.map_or(0, |z| z.saturating_sub(1)))
}

/// Creates a new item at a clamped point on top of the stack.
pub fn place(
    items: &mut Vec<GardenItem>,
    kind: ItemKind,
    name: impl Into<String>,
    image: impl Into<String>,
    at: Position,
    bounds: &CanvasBounds,
) -> GardenItem {
    let mut item = GardenItem::new(kind, name, image, bounds.clamp(at));
    item.z_index = Some(max_z(items, None).map_or(0, |z| z.saturating_add(1)));
    items.push(item.clone());
    item
}

/// Removes and returns the item with `id`.
pub fn remove(items: &mut Vec<GardenItem>, id: &str) -> Option<GardenItem> {
    let index = items.iter().position(|item| item.id == id)?;
    Some(items.remove(index))
}

fn set_z(items: &mut [GardenItem], id: &str, z: i32) -> bool {
    match items.iter_mut().find(|item| item.id == id) {
        Some(item) => {
            item.z_index = Some(z);
            true
        }
        None => false,
    }
}

fn max_z(items: &[GardenItem], except: Option<&str>) -> Option<i32> {
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| Some(item.id.as_str()) != except)
        .map(|(index, item)| stacking_key(item, index))
        .max()
}

// Unset z-index stacks by list position, matching Garden::sorted_for_render.
fn stacking_key(item: &GardenItem, index: usize) -> i32 {
    item.z_index
        .unwrap_or_else(|| i32::try_from(index).unwrap_or(i32::MAX))
}
