//! Weapon catalog
//!
//! An ordered, append-only armory. The player holds an index into it and
//! entries are unique by name. Four standard-issue guns seed the catalog;
//! the item-ingestion bridge appends generated weapons behind them.

use crate::consts::*;
use crate::items::ItemDescriptor;

/// A named weapon definition. The equipped entry supplies the bullet profile
/// applied to newly fired bullets.
#[derive(Debug, Clone, PartialEq)]
pub struct WeaponDef {
    pub name: String,
    pub bullet_size: f32,
    pub bullet_speed: f32,
    pub damage: f32,
    pub cooldown_ms: u32,
    pub color: [f32; 4],
    /// Perpendicular offset step between pellets, for scatter weapons
    pub spread: Option<f32>,
    pub cost: u32,
}

impl WeaponDef {
    /// Cooldown converted to simulation ticks
    pub fn cooldown_ticks(&self) -> u64 {
        crate::ticks_from_ms(self.cooldown_ms)
    }

    /// Pellet fan for one trigger pull. The shotgun is the one scatter gun;
    /// everything else fires a single straight bullet.
    pub fn pellet_offsets(&self) -> &'static [f32] {
        if self.name == "Shotgun" {
            &[-1.0, 0.0, 1.0]
        } else {
            &[0.0]
        }
    }
}

/// The ordered weapon catalog
#[derive(Debug, Clone)]
pub struct Arsenal {
    weapons: Vec<WeaponDef>,
}

impl Arsenal {
    /// Catalog seeded with the four built-in guns
    pub fn standard_issue() -> Self {
        Self {
            weapons: vec![
                WeaponDef {
                    name: "Pistol".into(),
                    bullet_size: 5.0,
                    bullet_speed: 7.0,
                    damage: 10.0,
                    cooldown_ms: 500,
                    color: [1.0, 0.843, 0.0, 1.0],
                    spread: None,
                    cost: 0,
                },
                WeaponDef {
                    name: "Shotgun".into(),
                    bullet_size: 4.0,
                    bullet_speed: 9.0,
                    damage: 15.0,
                    cooldown_ms: 800,
                    color: [1.0, 0.271, 0.0, 1.0],
                    spread: Some(SHOTGUN_SPREAD),
                    cost: 500,
                },
                WeaponDef {
                    name: "Machine Gun".into(),
                    bullet_size: 3.0,
                    bullet_speed: 10.0,
                    damage: 5.0,
                    cooldown_ms: 150,
                    color: [0.0, 1.0, 0.0, 1.0],
                    spread: None,
                    cost: 750,
                },
                WeaponDef {
                    name: "Sniper".into(),
                    bullet_size: 6.0,
                    bullet_speed: 15.0,
                    damage: 40.0,
                    cooldown_ms: 1000,
                    color: [0.118, 0.565, 1.0, 1.0],
                    spread: None,
                    cost: 1000,
                },
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.weapons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty()
    }

    /// The catalog is never empty, so lookups clamp rather than fail
    pub fn get(&self, index: usize) -> &WeaponDef {
        &self.weapons[index.min(self.weapons.len() - 1)]
    }

    pub fn is_valid(&self, index: usize) -> bool {
        index < self.weapons.len()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.weapons.iter().position(|w| w.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WeaponDef> {
        self.weapons.iter()
    }

    /// Append a weapon built from a generated descriptor.
    ///
    /// Requires a positive fire rate; returns `None` otherwise. A name
    /// collision keeps the existing entry untouched and returns its index,
    /// so repeated ingestion never grows the catalog.
    pub fn ingest(&mut self, item: &ItemDescriptor) -> Option<usize> {
        let payload = item.payload();
        let Some(firerate) = payload.stats.firerate.filter(|f| *f > 0.0) else {
            log::debug!("ignoring generated item '{}' without a fire rate", payload.name);
            return None;
        };

        if let Some(existing) = self.position(&payload.name) {
            log::debug!("catalog already stocks '{}'", payload.name);
            return Some(existing);
        }

        let def = WeaponDef {
            name: payload.name.clone(),
            bullet_size: 5.0,
            bullet_speed: payload.stats.speed.filter(|s| *s > 0.0).unwrap_or(7.0),
            damage: payload.stats.damage.unwrap_or(DEFAULT_ITEM_DAMAGE),
            cooldown_ms: (1000.0 / firerate).round() as u32,
            color: color_from_name(&payload.name),
            spread: None,
            cost: payload.price.map(|p| p.max(0.0).round() as u32).unwrap_or(0),
        };
        log::info!(
            "stocked '{}' (damage {}, cooldown {}ms, cost {})",
            def.name,
            def.damage,
            def.cooldown_ms,
            def.cost
        );
        self.weapons.push(def);
        Some(self.weapons.len() - 1)
    }
}

/// Deterministic color for a generated weapon, derived from its name
fn color_from_name(name: &str) -> [f32; 4] {
    let hash = name
        .bytes()
        .fold(0u32, |h, b| h.wrapping_mul(2654435761).wrapping_add(b as u32));
    let r = 0.25 + ((hash % 1000) as f32 / 1000.0) * 0.75;
    let g = 0.25 + (((hash >> 10) % 1000) as f32 / 1000.0) * 0.75;
    let b = 0.25 + (((hash >> 20) % 1000) as f32 / 1000.0) * 0.75;
    [r, g, b, 1.0]
}
