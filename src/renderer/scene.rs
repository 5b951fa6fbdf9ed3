//! Scene building for 2D primitives
//!
//! Pure translation from game state to draw commands, in paint order. Kept
//! free of platform types so the full frame composition is unit-testable.

use glam::Vec2;

use crate::Settings;
use crate::consts::*;
use crate::sim::{GamePhase, GameState};

/// A primitive the presentation surface knows how to draw
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Circle {
        center: Vec2,
        radius: f32,
        color: [f32; 4],
    },
    Rect {
        pos: Vec2,
        size: Vec2,
        color: [f32; 4],
    },
    Label {
        pos: Vec2,
        text: String,
        color: [f32; 4],
        size_px: f32,
        centered: bool,
    },
}

const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
const ENEMY_RED: [f32; 4] = [1.0, 0.267, 0.267, 1.0];
const GOLD: [f32; 4] = [1.0, 0.843, 0.0, 1.0];

/// Compose the frame for the current state, background to foreground
pub fn build_scene(state: &GameState, settings: &Settings) -> Vec<DrawCmd> {
    let mut cmds = Vec::new();
    let now = state.time_ticks;
    let player = &state.player;

    // Player disc, flashing red while damage feedback is active
    let body_color = if settings.damage_flash && player.is_flashing(now) {
        RED
    } else {
        player.color
    };
    cmds.push(DrawCmd::Circle {
        center: player.pos,
        radius: PLAYER_SIZE / 2.0,
        color: body_color,
    });

    // Facing indicator dot near the rim
    let offset = PLAYER_SIZE / 2.0 - 5.0;
    let indicator = player.pos + player.facing.unit() * offset;
    cmds.push(DrawCmd::Circle {
        center: indicator,
        radius: 5.0,
        color: WHITE,
    });

    // Bullets carry their fire-time profile color
    for bullet in &player.bullets {
        cmds.push(DrawCmd::Circle {
            center: bullet.pos,
            radius: bullet.profile.size,
            color: bullet.profile.color,
        });
    }

    // Equipped gun name under the player
    cmds.push(DrawCmd::Label {
        pos: player.pos + Vec2::new(0.0, 40.0),
        text: state.equipped_weapon().name.clone(),
        color: player.color,
        size_px: 12.0,
        centered: true,
    });

    // Enemies with their health bars
    for enemy in &state.enemies {
        cmds.push(DrawCmd::Circle {
            center: enemy.pos,
            radius: enemy.size / 2.0,
            color: ENEMY_RED,
        });
        let bar_origin = enemy.pos + Vec2::new(-20.0, -30.0);
        cmds.push(DrawCmd::Rect {
            pos: bar_origin,
            size: Vec2::new(40.0, 4.0),
            color: WHITE,
        });
        let fill = (enemy.health / enemy.max_health).clamp(0.0, 1.0) * 40.0;
        cmds.push(DrawCmd::Rect {
            pos: bar_origin,
            size: Vec2::new(fill, 4.0),
            color: RED,
        });
    }

    // Money drops with their amount
    for drop in &state.drops {
        cmds.push(DrawCmd::Circle {
            center: drop.pos,
            radius: MONEY_SIZE / 2.0,
            color: GOLD,
        });
        cmds.push(DrawCmd::Label {
            pos: drop.pos + Vec2::new(0.0, 4.0),
            text: format!("${}", drop.amount),
            color: BLACK,
            size_px: 12.0,
            centered: true,
        });
    }

    if let Some(text) = overlay_text(state) {
        cmds.push(DrawCmd::Label {
            pos: Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT / 2.0 - 60.0),
            text,
            color: WHITE,
            size_px: 32.0,
            centered: true,
        });
    }

    cmds
}

/// Phase banner shown mid-screen, if any
fn overlay_text(state: &GameState) -> Option<String> {
    let seconds = state.countdown_ticks.div_ceil(TICK_HZ);
    match state.phase {
        GamePhase::Countdown => Some(format!("Get ready... {seconds}")),
        GamePhase::LevelBreak => Some(format!(
            "Level {} cleared - next wave in {seconds}",
            state.level
        )),
        GamePhase::Paused => Some("Paused".to_string()),
        GamePhase::Playing => None,
    }
}

/// CSS color string for a normalized RGBA quad
pub fn css_color(color: [f32; 4]) -> String {
    let [r, g, b, a] = color;
    format!(
        "rgba({},{},{},{})",
        (r.clamp(0.0, 1.0) * 255.0).round() as u8,
        (g.clamp(0.0, 1.0) * 255.0).round() as u8,
        (b.clamp(0.0, 1.0) * 255.0).round() as u8,
        a.clamp(0.0, 1.0)
    )
}
