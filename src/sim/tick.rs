//! Fixed timestep simulation tick
//!
//! The per-tick orchestrator. Step order is load-bearing: movement, firing,
//! bullet resolution, enemy pursuit/contact, regeneration, deaths, pickups,
//! then the game-over and level-clear transitions. Reordering any of these
//! changes observable behavior.

use rand::Rng;

use super::collision::{circles_overlap, knockback};
use super::spawn::Spawn;
use super::state::{ControlState, Enemy, GamePhase, GameState, MoneyDrop};
use crate::consts::*;
use crate::ticks_from_ms;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Movement/fire snapshot from the key bridge
    pub controls: ControlState,
    /// Pause toggle (one-shot)
    pub pause: bool,
    /// Explicit weapon switch request (catalog index, one-shot)
    pub equip: Option<usize>,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.pause {
        match state.phase {
            GamePhase::Playing => state.phase = GamePhase::Paused,
            GamePhase::Paused => state.phase = GamePhase::Playing,
            _ => {}
        }
    }

    state.time_ticks += 1;
    let now = state.time_ticks;

    // Drain spawn deadlines first so this tick is the only writer of the
    // entity collections. Suppressed attempts still consume their slot.
    let suppressed = state.phase != GamePhase::Playing;
    let spawns = state.spawner.poll(
        now,
        suppressed,
        state.enemies.len() as u32,
        state.max_enemies,
        &mut state.rng,
    );
    for spawn in spawns {
        match spawn {
            Spawn::Enemy(pos) => {
                state.enemies.push(Enemy::new(pos, state.level));
                state.level_spawns += 1;
            }
            Spawn::Money { pos, amount } => state.drops.push(MoneyDrop { pos, amount }),
        }
    }

    if state.phase == GamePhase::Paused {
        return;
    }

    if let Some(index) = input.equip {
        if !state.equip(index) {
            log::debug!("equip request for unknown weapon slot {index}");
        }
    }

    match state.phase {
        GamePhase::Countdown | GamePhase::LevelBreak => {
            // Repositioning is allowed while the countdown runs; weapons and
            // spawners stay cold
            state.player.advance(&input.controls);
            state.countdown_ticks = state.countdown_ticks.saturating_sub(1);
            if state.countdown_ticks == 0 {
                if state.phase == GamePhase::LevelBreak {
                    state.level += 1;
                    state.max_enemies += MAX_ENEMIES_STEP;
                } else {
                    state.level = 1;
                }
                state.level_spawns = 0;
                state.phase = GamePhase::Playing;
                log::info!("level {} (enemy cap {})", state.level, state.max_enemies);
            }
        }
        GamePhase::Playing => playing_tick(state, input, now),
        GamePhase::Paused => {}
    }
}

fn playing_tick(state: &mut GameState, input: &TickInput, now: u64) {
    let weapon = state.equipped_weapon().clone();

    state.player.advance(&input.controls);
    state.player.shoot(input.controls.shoot, &weapon, now);
    state.player.update_bullets(&mut state.enemies);

    // Enemies pursue and deal contact damage; reverse index order keeps
    // removal safe mid-iteration
    let invincibility = ticks_from_ms(INVINCIBILITY_MS);
    for i in (0..state.enemies.len()).rev() {
        let target = state.player.pos;
        state.enemies[i].move_towards(target);

        let enemy_pos = state.enemies[i].pos;
        let combined = PLAYER_SIZE / 2.0 + state.enemies[i].hitbox_size / 2.0;
        if circles_overlap(enemy_pos, state.player.pos, combined) {
            let vulnerable = state
                .player
                .last_damage_tick
                .is_none_or(|t| now.saturating_sub(t) > invincibility);
            if vulnerable {
                state.player.health -= COLLISION_DAMAGE;
                state.player.last_damage_tick = Some(now);
                state.player.last_hit_tick = Some(now);
                state.player.flash_until_tick = now + ticks_from_ms(FLASH_MS);
                state.player.pos = knockback(state.player.pos, enemy_pos, KNOCKBACK_FORCE);
            }
        }

        if state.enemies[i].health <= 0.0 {
            let bounty = state.rng.random_range(20..50);
            state.drops.push(MoneyDrop {
                pos: state.enemies[i].pos,
                amount: bounty,
            });
            state.enemies.remove(i);
        }
    }

    // Regeneration runs every tick; it does not depend on the enemy count
    let regen_ready = state
        .player
        .last_hit_tick
        .is_none_or(|t| now.saturating_sub(t) > ticks_from_ms(HEALTH_REGEN_DELAY_MS));
    if regen_ready && state.player.health < MAX_HEALTH {
        state.player.health = (state.player.health + HEALTH_REGEN_RATE).min(MAX_HEALTH);
    }

    // Money pickup, newest first so removal indices stay valid
    for i in (0..state.drops.len()).rev() {
        let combined = PLAYER_SIZE / 2.0 + MONEY_SIZE / 2.0;
        if circles_overlap(state.drops[i].pos, state.player.pos, combined) {
            state.player.money += state.drops[i].amount;
            state.drops.remove(i);
        }
    }

    // Game-over is a hard reset back to the pre-game countdown, not a screen
    if state.player.health <= 0.0 {
        state.reset_run(now);
        return;
    }

    // Level-clear: the arena must actually have been contested this level
    if state.enemies.is_empty() && state.level_spawns > 0 {
        state.phase = GamePhase::LevelBreak;
        state.countdown_ticks = ticks_from_ms(LEVEL_BREAK_MS);
        log::info!("level {} cleared", state.level);
    }
}
