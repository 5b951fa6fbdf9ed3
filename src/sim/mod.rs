//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Tick-counted deadlines instead of wall-clock timers
//! - No rendering or platform dependencies

pub mod arsenal;
pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use arsenal::{Arsenal, WeaponDef};
pub use collision::{circles_overlap, clamp_to_arena, in_arena, knockback};
pub use spawn::{Spawn, SpawnScheduler};
pub use state::{
    Bullet, BulletProfile, ControlState, Enemy, Facing, GamePhase, GameState, MoneyDrop, Player,
};
pub use tick::{TickInput, tick};
