//! Typed boundary for generated item descriptors
//!
//! The chat collaborator hands the game free-form JSON. It is parsed into a
//! typed descriptor here, strictly, before anything can reach the weapon
//! catalog; malformed payloads are rejected at this boundary and the
//! simulation never sees them.

use serde::Deserialize;
use thiserror::Error;

/// Reasons a generated descriptor is refused
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("descriptor is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("item '{0}' has no usable fire rate")]
    MissingFireRate(String),
}

/// Stat block attached to a generated item. Individual stats are optional;
/// which ones matter depends on what consumes the descriptor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ItemStats {
    pub damage: Option<f32>,
    /// The generator emits both spellings
    #[serde(alias = "fireRate")]
    pub firerate: Option<f32>,
    pub speed: Option<f32>,
    pub durability: Option<f32>,
}

/// Fields shared by every descriptor kind
#[derive(Debug, Clone, Deserialize)]
pub struct ItemPayload {
    pub name: String,
    #[serde(default)]
    pub price: Option<f32>,
    #[serde(default)]
    pub stats: ItemStats,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "imageDescription")]
    pub image_description: Option<String>,
    /// Opaque artwork blob (base64), display-only
    #[serde(default)]
    pub image: Option<String>,
}

/// A parsed generated-item descriptor
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ItemDescriptor {
    Weapon(ItemPayload),
    Item(ItemPayload),
    Obstacle(ItemPayload),
}

impl ItemDescriptor {
    pub fn payload(&self) -> &ItemPayload {
        match self {
            ItemDescriptor::Weapon(p) | ItemDescriptor::Item(p) | ItemDescriptor::Obstacle(p) => p,
        }
    }

    pub fn name(&self) -> &str {
        &self.payload().name
    }
}

/// Parse a raw generator response. Anything that does not match the
/// descriptor shape is an error, not a half-filled item.
pub fn parse_item(json: &str) -> Result<ItemDescriptor, ItemError> {
    Ok(serde_json::from_str(json)?)
}
