//! Garden domain model.
//!
//! # Responsibility
//! - Define the canonical garden record shared by the canvas, the local
//!   library and the share store.
//! - Keep wire names compatible with the browser client (camelCase).
//!
//! # Invariants
//! - `items` is required on decode; every other field has a default.
//! - Item order in `items` is the placement order; `z_index` overrides it for
//!   stacking when present.
//! - `validate()` is the only gate before persistence.

use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Upper bound on placed items in one garden.
pub const MAX_GARDEN_ITEMS: usize = 500;

/// Canvas coordinates in pixels, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Decorative element category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Rock,
    Plant,
    Water,
    Decoration,
}

/// One placed decorative element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GardenItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    /// Serialized as `type` to match the client schema.
    #[serde(rename = "type")]
    pub kind: ItemKind,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Image path or URL resolved by the client.
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,
    pub position: Position,
    /// Degrees, clockwise.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
}

fn default_scale() -> f64 {
    1.0
}

/// Reads an explicit `null` the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl GardenItem {
    /// Creates an unrotated, unscaled item with a generated id.
    pub fn new(
        kind: ItemKind,
        name: impl Into<String>,
        image: impl Into<String>,
        position: Position,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            name: name.into(),
            image: image.into(),
            position,
            rotation: 0.0,
            scale: 1.0,
            z_index: None,
        }
    }

    /// Validates numeric fields of a single item.
    pub fn validate(&self) -> Result<(), GardenValidationError> {
        let item_id = || self.id.clone();
        for (field, value) in [
            ("position.x", self.position.x),
            ("position.y", self.position.y),
            ("rotation", self.rotation),
            ("scale", self.scale),
        ] {
            if !value.is_finite() {
                return Err(GardenValidationError::NonFinite {
                    item_id: item_id(),
                    field,
                });
            }
        }
        if self.scale <= 0.0 {
            return Err(GardenValidationError::NonPositiveScale {
                item_id: item_id(),
                scale: self.scale,
            });
        }
        Ok(())
    }
}

/// Time-of-day lighting preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Dawn,
    #[default]
    Day,
    Dusk,
    Night,
}

/// Looping ambient soundtrack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmbientSound {
    Rain,
    Stream,
    Wind,
    Birds,
    Chimes,
}

/// Atmosphere and sound settings applied to the whole garden.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AtmosphereSettings {
    pub time_of_day: TimeOfDay,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ambient_sound: Option<AmbientSound>,
    /// Linear gain in `[0, 1]`.
    pub volume: f64,
    pub sound_enabled: bool,
}

impl Default for AtmosphereSettings {
    fn default() -> Self {
        Self {
            time_of_day: TimeOfDay::Day,
            ambient_sound: None,
            volume: 0.5,
            sound_enabled: false,
        }
    }
}

/// A named arrangement of placed items plus display settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Garden {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Unix epoch milliseconds.
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: i64,
    pub items: Vec<GardenItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<AtmosphereSettings>,
}

impl Garden {
    /// Creates an empty garden with a generated id stamped with the current time.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            created_at: now_epoch_ms(),
            items: Vec::new(),
            settings: None,
        }
    }

    /// Fills a missing id and creation time. Existing values are kept.
    pub fn ensure_identity(&mut self) {
        if self.id.trim().is_empty() {
            self.id = Uuid::new_v4().to_string();
        }
        if self.created_at <= 0 {
            self.created_at = now_epoch_ms();
        }
    }

    /// Checks item count, item id uniqueness, item numbers and settings.
    pub fn validate(&self) -> Result<(), GardenValidationError> {
        if self.items.len() > MAX_GARDEN_ITEMS {
            return Err(GardenValidationError::TooManyItems {
                count: self.items.len(),
                max: MAX_GARDEN_ITEMS,
            });
        }

        let mut seen = std::collections::HashSet::with_capacity(self.items.len());
        for (index, item) in self.items.iter().enumerate() {
            if item.id.trim().is_empty() {
                return Err(GardenValidationError::EmptyItemId { index });
            }
            if !seen.insert(item.id.as_str()) {
                return Err(GardenValidationError::DuplicateItemId(item.id.clone()));
            }
            item.validate()?;
        }

        if let Some(settings) = &self.settings {
            if !(0.0..=1.0).contains(&settings.volume) {
                return Err(GardenValidationError::VolumeOutOfRange(settings.volume));
            }
        }
        Ok(())
    }

    /// Items in paint order, bottom first.
    ///
    /// Items without `z_index` stack by their list position. The sort is
    /// stable, so ties keep placement order.
    pub fn sorted_for_render(&self) -> Vec<&GardenItem> {
        let mut ordered: Vec<(i64, &GardenItem)> = self
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| (effective_z(item, index), item))
            .collect();
        ordered.sort_by_key(|(z, _)| *z);
        ordered.into_iter().map(|(_, item)| item).collect()
    }
}

fn effective_z(item: &GardenItem, index: usize) -> i64 {
    item.z_index
        .map_or_else(|| i64::try_from(index).unwrap_or(i64::MAX), i64::from)
}

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}

/// Validation failure for garden records.
#[derive(Debug, Clone, PartialEq)]
pub enum GardenValidationError {
    EmptyItemId { index: usize },
    DuplicateItemId(String),
    NonFinite { item_id: String, field: &'static str },
    NonPositiveScale { item_id: String, scale: f64 },
    TooManyItems { count: usize, max: usize },
    VolumeOutOfRange(f64),
}

impl Display for GardenValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyItemId { index } => write!(f, "item at index {index} has an empty id"),
            Self::DuplicateItemId(id) => write!(f, "duplicate item id `{id}`"),
            Self::NonFinite { item_id, field } => {
                write!(f, "item `{item_id}` has a non-finite {field}")
            }
            Self::NonPositiveScale { item_id, scale } => {
                write!(f, "item `{item_id}` has non-positive scale {scale}")
            }
            Self::TooManyItems { count, max } => {
                write!(f, "garden has {count} items; at most {max} are allowed")
            }
            Self::VolumeOutOfRange(volume) => {
                write!(f, "volume {volume} is outside [0, 1]")
            }
        }
    }
}

impl Error for GardenValidationError {}
