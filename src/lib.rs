//! Horde Blitz - a top-down arena shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, combat, spawning, progression)
//! - `items`: Typed boundary for generated item descriptors
//! - `renderer`: Scene builder + Canvas2D presentation bridge
//! - `settings`: Player preferences persisted to LocalStorage

pub mod items;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (60 Hz, one tick per animation frame at speed)
    pub const TICK_HZ: u64 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_HZ as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Arena dimensions (logical canvas size, set once at session start)
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 30.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const MAX_HEALTH: f32 = 100.0;
    /// Money granted on a fresh session and restored on game-over reset
    pub const START_MONEY: u32 = 100;

    /// Enemy defaults - visual size vs the smaller collision hitbox
    pub const ENEMY_SIZE: f32 = 25.0;
    pub const ENEMY_HITBOX_SIZE: f32 = 15.0;
    pub const ENEMY_SPEED: f32 = 2.0;
    pub const ENEMY_BASE_HEALTH: f32 = 50.0;
    pub const ENEMY_HEALTH_PER_LEVEL: f32 = 10.0;

    /// Contact damage and the window before it can land again
    pub const COLLISION_DAMAGE: f32 = 10.0;
    pub const INVINCIBILITY_MS: u32 = 1000;
    /// Damage feedback flash duration
    pub const FLASH_MS: u32 = 200;
    /// Knockback applied along the enemy->player angle on contact
    pub const KNOCKBACK_FORCE: f32 = 20.0;

    /// Health trickles back once the player has avoided hits long enough
    pub const HEALTH_REGEN_RATE: f32 = 0.05;
    pub const HEALTH_REGEN_DELAY_MS: u32 = 3000;

    /// Money drop defaults
    pub const MONEY_SIZE: f32 = 15.0;
    /// Interior margin for ambient money spawns
    pub const MONEY_SPAWN_MARGIN: f32 = 50.0;

    /// Spawn cadences
    pub const SPAWN_INTERVAL_MS: u32 = 2000;
    pub const MONEY_SPAWN_INTERVAL_MS: u32 = 3000;

    /// Live-enemy population cap, raised each completed level
    pub const BASE_MAX_ENEMIES: u32 = 8;
    pub const MAX_ENEMIES_STEP: u32 = 2;

    /// Countdown lengths
    pub const PREGAME_COUNTDOWN_MS: u32 = 3000;
    pub const LEVEL_BREAK_MS: u32 = 5000;

    /// Perpendicular offset step between shotgun pellets
    pub const SHOTGUN_SPREAD: f32 = 0.2;
    /// Damage assumed for generated weapons that omit a damage stat
    pub const DEFAULT_ITEM_DAMAGE: f32 = 10.0;
}

/// Convert a millisecond duration to whole simulation ticks
#[inline]
pub fn ticks_from_ms(ms: u32) -> u64 {
    (ms as u64 * consts::TICK_HZ) / 1000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_from_ms() {
        assert_eq!(ticks_from_ms(1000), 60);
        assert_eq!(ticks_from_ms(500), 30);
        assert_eq!(ticks_from_ms(250), 15);
        assert_eq!(ticks_from_ms(0), 0);
    }
}
