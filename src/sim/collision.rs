//! Collision and knockback math for circular bodies
//!
//! Everything that collides in the arena is a circle: the player disc, enemy
//! hitboxes (smaller than their visual size), bullets and money drops. All
//! checks are plain distance-vs-combined-radius tests; rectangles only exist
//! for bounds clamping.

use glam::Vec2;

use crate::consts::*;

/// Check whether two circles overlap given their combined radius
#[inline]
pub fn circles_overlap(a: Vec2, b: Vec2, combined_radius: f32) -> bool {
    a.distance(b) < combined_radius
}

/// Whether a point lies inside the arena rectangle (bullet culling test)
#[inline]
pub fn in_arena(pos: Vec2) -> bool {
    pos.x >= 0.0 && pos.x <= ARENA_WIDTH && pos.y >= 0.0 && pos.y <= ARENA_HEIGHT
}

/// Clamp a position so a body of the given diameter stays fully inside the arena
pub fn clamp_to_arena(pos: Vec2, size: f32) -> Vec2 {
    let half = size / 2.0;
    Vec2::new(
        pos.x.clamp(half, ARENA_WIDTH - half),
        pos.y.clamp(half, ARENA_HEIGHT - half),
    )
}

/// Player position after an enemy contact shoves it away.
///
/// The push runs along the enemy->player angle; the result is clamped so the
/// knockback can never force the player out of bounds.
pub fn knockback(player: Vec2, enemy: Vec2, force: f32) -> Vec2 {
    let away = (player - enemy).normalize_or_zero();
    clamp_to_arena(player + away * force, PLAYER_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circles_overlap() {
        let a = Vec2::new(100.0, 100.0);
        let b = Vec2::new(120.0, 100.0);
        assert!(circles_overlap(a, b, 22.5));
        assert!(!circles_overlap(a, b, 15.0));
        // Exactly touching counts as a miss (strict inequality)
        assert!(!circles_overlap(a, b, 20.0));
    }

    #[test]
    fn test_in_arena() {
        assert!(in_arena(Vec2::new(400.0, 300.0)));
        assert!(in_arena(Vec2::ZERO));
        assert!(in_arena(Vec2::new(ARENA_WIDTH, ARENA_HEIGHT)));
        assert!(!in_arena(Vec2::new(-0.1, 300.0)));
        assert!(!in_arena(Vec2::new(400.0, ARENA_HEIGHT + 0.1)));
    }

    #[test]
    fn test_clamp_to_arena() {
        let half = PLAYER_SIZE / 2.0;
        let clamped = clamp_to_arena(Vec2::new(-50.0, 1000.0), PLAYER_SIZE);
        assert_eq!(clamped, Vec2::new(half, ARENA_HEIGHT - half));

        // In-bounds positions pass through untouched
        let pos = Vec2::new(400.0, 300.0);
        assert_eq!(clamp_to_arena(pos, PLAYER_SIZE), pos);
    }

    #[test]
    fn test_knockback_direction() {
        let player = Vec2::new(400.0, 300.0);
        let enemy = Vec2::new(390.0, 300.0);
        let pushed = knockback(player, enemy, KNOCKBACK_FORCE);
        // Enemy is to the left, so the player is pushed right
        assert_eq!(pushed, Vec2::new(420.0, 300.0));
    }

    #[test]
    fn test_knockback_clamped_at_wall() {
        let half = PLAYER_SIZE / 2.0;
        let player = Vec2::new(ARENA_WIDTH - half, 300.0);
        let enemy = Vec2::new(ARENA_WIDTH - half - 10.0, 300.0);
        let pushed = knockback(player, enemy, KNOCKBACK_FORCE);
        assert_eq!(pushed.x, ARENA_WIDTH - half);
    }

    #[test]
    fn test_knockback_degenerate_overlap() {
        // Enemy exactly on top of the player: no direction, no movement
        let pos = Vec2::new(400.0, 300.0);
        assert_eq!(knockback(pos, pos, KNOCKBACK_FORCE), pos);
    }
}
