//! Spawn scheduling
//!
//! The original design ran enemy and money spawns off free-running interval
//! timers that mutated the entity collections from their own callbacks. Here
//! both cadences are tick-counted deadlines owned by the session and drained
//! at the start of each tick, so the simulation loop stays the sole writer of
//! shared state and runs are reproducible from the seed.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::ticks_from_ms;

/// A spawn the scheduler wants applied this tick
#[derive(Debug, Clone, PartialEq)]
pub enum Spawn {
    Enemy(Vec2),
    Money { pos: Vec2, amount: u32 },
}

/// Fixed-cadence spawn timers, decoupled from the frame rate
#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    next_enemy_tick: u64,
    next_money_tick: u64,
}

impl SpawnScheduler {
    pub fn new(now: u64) -> Self {
        Self {
            next_enemy_tick: now + ticks_from_ms(SPAWN_INTERVAL_MS),
            next_money_tick: now + ticks_from_ms(MONEY_SPAWN_INTERVAL_MS),
        }
    }

    /// Restart both cadences (used by the game-over reset)
    pub fn reset(&mut self, now: u64) {
        *self = Self::new(now);
    }

    /// Drain every deadline that is due at `now`.
    ///
    /// A suppressed attempt (pause, active countdown, or for enemies a full
    /// population) still consumes its slot - it is a no-op, not a deferral,
    /// so unpausing never releases a burst of queued spawns.
    pub fn poll(
        &mut self,
        now: u64,
        suppressed: bool,
        live_enemies: u32,
        max_enemies: u32,
        rng: &mut Pcg32,
    ) -> Vec<Spawn> {
        let mut spawns = Vec::new();
        let mut pending_enemies = 0;

        while now >= self.next_enemy_tick {
            self.next_enemy_tick += ticks_from_ms(SPAWN_INTERVAL_MS);
            if !suppressed && live_enemies + pending_enemies < max_enemies {
                spawns.push(Spawn::Enemy(edge_position(rng)));
                pending_enemies += 1;
            }
        }

        while now >= self.next_money_tick {
            self.next_money_tick += ticks_from_ms(MONEY_SPAWN_INTERVAL_MS);
            if !suppressed {
                spawns.push(Spawn::Money {
                    pos: interior_position(rng),
                    amount: rng.random_range(10..60),
                });
            }
        }

        spawns
    }
}

/// Uniform point along one of the four arena edges, edge chosen uniformly
fn edge_position(rng: &mut Pcg32) -> Vec2 {
    let half = ENEMY_SIZE / 2.0;
    match rng.random_range(0..4u8) {
        0 => Vec2::new(rng.random_range(half..=ARENA_WIDTH - half), 0.0),
        1 => Vec2::new(ARENA_WIDTH, rng.random_range(half..=ARENA_HEIGHT - half)),
        2 => Vec2::new(rng.random_range(half..=ARENA_WIDTH - half), ARENA_HEIGHT),
        _ => Vec2::new(0.0, rng.random_range(half..=ARENA_HEIGHT - half)),
    }
}

/// Uniform interior point with a margin from every edge
fn interior_position(rng: &mut Pcg32) -> Vec2 {
    Vec2::new(
        rng.random_range(MONEY_SPAWN_MARGIN..=ARENA_WIDTH - MONEY_SPAWN_MARGIN),
        rng.random_range(MONEY_SPAWN_MARGIN..=ARENA_HEIGHT - MONEY_SPAWN_MARGIN),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(1234)
    }

    #[test]
    fn test_first_deadlines() {
        let mut scheduler = SpawnScheduler::new(0);
        let mut rng = rng();

        // Nothing due before the first interval elapses
        assert!(scheduler.poll(119, false, 0, 8, &mut rng).is_empty());

        let spawns = scheduler.poll(120, false, 0, 8, &mut rng);
        assert_eq!(spawns.len(), 1);
        assert!(matches!(spawns[0], Spawn::Enemy(_)));
    }

    #[test]
    fn test_suppressed_attempt_consumes_deadline() {
        let mut scheduler = SpawnScheduler::new(0);
        let mut rng = rng();

        assert!(scheduler.poll(120, true, 0, 8, &mut rng).is_empty());
        // The slot is gone; the next attempt is a full interval later
        assert!(scheduler.poll(121, false, 0, 8, &mut rng).is_empty());
        assert_eq!(scheduler.poll(240, false, 0, 8, &mut rng).len(), 2); // enemy + money
    }

    #[test]
    fn test_enemy_cap_suppresses_enemy_spawns_only() {
        let mut scheduler = SpawnScheduler::new(0);
        let mut rng = rng();

        // Population at cap: the 120-tick enemy slot is consumed empty
        assert!(scheduler.poll(120, false, 8, 8, &mut rng).is_empty());

        // Money is not subject to the enemy cap
        let spawns = scheduler.poll(180, false, 8, 8, &mut rng);
        assert_eq!(spawns.len(), 1);
        assert!(matches!(spawns[0], Spawn::Money { .. }));
    }

    #[test]
    fn test_enemy_positions_hug_an_edge() {
        let mut scheduler = SpawnScheduler::new(0);
        let mut rng = rng();
        for round in 1..=50u64 {
            for spawn in scheduler.poll(round * 120, false, 0, 100, &mut rng) {
                if let Spawn::Enemy(pos) = spawn {
                    let on_edge = pos.x == 0.0
                        || pos.x == ARENA_WIDTH
                        || pos.y == 0.0
                        || pos.y == ARENA_HEIGHT;
                    assert!(on_edge, "enemy spawned off-edge at {pos:?}");
                }
            }
        }
    }

    #[test]
    fn test_money_amount_and_margin() {
        let mut scheduler = SpawnScheduler::new(0);
        let mut rng = rng();
        for round in 1..=50u64 {
            for spawn in scheduler.poll(round * 180, false, 100, 0, &mut rng) {
                if let Spawn::Money { pos, amount } = spawn {
                    assert!((10..=59).contains(&amount));
                    assert!(pos.x >= MONEY_SPAWN_MARGIN && pos.x <= ARENA_WIDTH - MONEY_SPAWN_MARGIN);
                    assert!(pos.y >= MONEY_SPAWN_MARGIN && pos.y <= ARENA_HEIGHT - MONEY_SPAWN_MARGIN);
                }
            }
        }
    }

    #[test]
    fn test_same_seed_same_spawns() {
        let mut a = SpawnScheduler::new(0);
        let mut b = SpawnScheduler::new(0);
        let mut rng_a = rng();
        let mut rng_b = rng();
        for round in 1..=20u64 {
            assert_eq!(
                a.poll(round * 60, false, 0, 100, &mut rng_a),
                b.poll(round * 60, false, 0, 100, &mut rng_b)
            );
        }
    }
}
