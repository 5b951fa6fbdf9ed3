//! Game session state and entity model
//!
//! One `GameState` owns everything a run needs: the player, the transient
//! enemy/drop collections, the weapon catalog, the spawn scheduler and the
//! RNG. Nothing lives in globals; every component that needs the session gets
//! handed a reference.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::arsenal::{Arsenal, WeaponDef};
use super::collision::{circles_overlap, in_arena};
use super::spawn::SpawnScheduler;
use crate::consts::*;
use crate::items::{ItemDescriptor, ItemError};
use crate::ticks_from_ms;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Pre-game countdown before the first level starts
    Countdown,
    /// Active gameplay
    Playing,
    /// Game is paused; spawn deadlines keep draining as no-ops
    Paused,
    /// Between-level rest, spawners suppressed
    LevelBreak,
}

/// Boolean control snapshot delivered by the input bridge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub shoot: bool,
}

/// The four directions the player can face; bullets inherit this
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Up,
    Down,
    Left,
    Right,
}

impl Facing {
    /// Unit vector in screen coordinates (+y is down)
    pub fn unit(self) -> Vec2 {
        match self {
            Facing::Up => Vec2::new(0.0, -1.0),
            Facing::Down => Vec2::new(0.0, 1.0),
            Facing::Left => Vec2::new(-1.0, 0.0),
            Facing::Right => Vec2::new(1.0, 0.0),
        }
    }
}

/// The stats a bullet flies with, frozen at fire time.
///
/// Switching guns never retroactively changes bullets already in the air.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BulletProfile {
    pub size: f32,
    pub speed: f32,
    pub damage: f32,
    pub color: [f32; 4],
}

impl BulletProfile {
    pub fn of(weapon: &WeaponDef) -> Self {
        Self {
            size: weapon.bullet_size,
            speed: weapon.bullet_speed,
            damage: weapon.damage,
            color: weapon.color,
        }
    }
}

/// A live bullet owned by the firing player
#[derive(Debug, Clone)]
pub struct Bullet {
    pub pos: Vec2,
    /// Direction vector; shotgun pellets are deliberately not unit length
    pub dir: Vec2,
    pub profile: BulletProfile,
}

/// A pursuing enemy
#[derive(Debug, Clone)]
pub struct Enemy {
    pub pos: Vec2,
    pub health: f32,
    /// Visual diameter
    pub size: f32,
    /// Collision diameter, smaller than the visual one
    pub hitbox_size: f32,
    /// Facing angle toward the player, presentation only
    pub angle: f32,
    /// Health it spawned with, for the health bar
    pub max_health: f32,
}

impl Enemy {
    /// Spawn an enemy with a health pool scaled to the current level
    pub fn new(pos: Vec2, level: u32) -> Self {
        let health = ENEMY_BASE_HEALTH + level.saturating_sub(1) as f32 * ENEMY_HEALTH_PER_LEVEL;
        Self {
            pos,
            health,
            size: ENEMY_SIZE,
            hitbox_size: ENEMY_HITBOX_SIZE,
            angle: 0.0,
            max_health: health,
        }
    }

    /// Straight-line pursuit at fixed speed, no pathfinding
    pub fn move_towards(&mut self, target: Vec2) {
        self.angle = (target.y - self.pos.y).atan2(target.x - self.pos.x);
        self.pos += Vec2::new(self.angle.cos(), self.angle.sin()) * ENEMY_SPEED;
    }
}

/// Collectible cash on the floor
#[derive(Debug, Clone)]
pub struct MoneyDrop {
    pub pos: Vec2,
    pub amount: u32,
}

/// The player avatar and everything it owns
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    /// Presentation color
    pub color: [f32; 4],
    pub health: f32,
    pub money: u32,
    /// Index into the arsenal
    pub equipped: usize,
    pub bullets: Vec<Bullet>,
    pub facing: Facing,
    pub last_shot_tick: Option<u64>,
    /// Gate for the invincibility window
    pub last_damage_tick: Option<u64>,
    /// Gate for health regeneration
    pub last_hit_tick: Option<u64>,
    /// Damage feedback flashes until this tick
    pub flash_until_tick: u64,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            color: [0.298, 0.686, 0.314, 1.0],
            health: MAX_HEALTH,
            money: START_MONEY,
            equipped: 0,
            bullets: Vec::new(),
            facing: Facing::Down,
            last_shot_tick: None,
            last_damage_tick: None,
            last_hit_tick: None,
            flash_until_tick: 0,
        }
    }

    /// Whether the damage flash is showing at the given tick
    pub fn is_flashing(&self, now: u64) -> bool {
        now < self.flash_until_tick
    }

    /// Apply one tick of movement.
    ///
    /// Directions are evaluated in the fixed order up, down, left, right; a
    /// flag moves the player only if the result stays in bounds, and facing
    /// follows the last direction that actually moved. Holding two keys moves
    /// diagonally with facing biased to the later check.
    pub fn advance(&mut self, controls: &ControlState) {
        let half = PLAYER_SIZE / 2.0;
        if controls.up && self.pos.y - PLAYER_SPEED >= half {
            self.pos.y -= PLAYER_SPEED;
            self.facing = Facing::Up;
        }
        if controls.down && self.pos.y + PLAYER_SPEED <= ARENA_HEIGHT - half {
            self.pos.y += PLAYER_SPEED;
            self.facing = Facing::Down;
        }
        if controls.left && self.pos.x - PLAYER_SPEED >= half {
            self.pos.x -= PLAYER_SPEED;
            self.facing = Facing::Left;
        }
        if controls.right && self.pos.x + PLAYER_SPEED <= ARENA_WIDTH - half {
            self.pos.x += PLAYER_SPEED;
            self.facing = Facing::Right;
        }
    }

    /// Fire the equipped weapon if the trigger is held and the cooldown has
    /// elapsed. A weapon named "Shotgun" fans three pellets; everything else
    /// fires one bullet along the facing direction.
    pub fn shoot(&mut self, shooting: bool, weapon: &WeaponDef, now: u64) {
        if !shooting {
            return;
        }
        if let Some(last) = self.last_shot_tick {
            if now.saturating_sub(last) <= weapon.cooldown_ticks() {
                return;
            }
        }

        let dir = self.facing.unit();
        let profile = BulletProfile::of(weapon);
        let spread = weapon.spread.unwrap_or(0.0);
        for offset in weapon.pellet_offsets() {
            let fan = offset * spread;
            // Spread bleeds into the perpendicular axis
            let pellet_dir = Vec2::new(dir.x + dir.y * fan, dir.y + dir.x * fan);
            self.bullets.push(Bullet {
                pos: self.pos,
                dir: pellet_dir,
                profile,
            });
        }
        self.last_shot_tick = Some(now);
    }

    /// Advance all bullets one step, culling those that leave the arena and
    /// spending each surviving bullet on the first enemy it overlaps
    /// (insertion order). At most one enemy takes damage per bullet.
    pub fn update_bullets(&mut self, enemies: &mut [Enemy]) {
        self.bullets.retain_mut(|bullet| {
            bullet.pos += bullet.dir * bullet.profile.speed;
            if !in_arena(bullet.pos) {
                return false;
            }
            for enemy in enemies.iter_mut() {
                // A kill this tick absorbs no further bullets
                if enemy.health <= 0.0 {
                    continue;
                }
                let reach = enemy.hitbox_size / 2.0 + bullet.profile.size;
                if circles_overlap(bullet.pos, enemy.pos, reach) {
                    enemy.health -= bullet.profile.damage;
                    return false;
                }
            }
            true
        });
    }

    /// Health as a 0-100 percentage for the status display
    pub fn health_percent(&self) -> f32 {
        (self.health / MAX_HEALTH * 100.0).clamp(0.0, 100.0)
    }

    /// Restore run-start condition after a game over. Position and facing
    /// persist; everything earned or suffered resets.
    pub(crate) fn reset(&mut self) {
        self.health = MAX_HEALTH;
        self.money = START_MONEY;
        self.equipped = 0;
        self.bullets.clear();
        self.last_shot_tick = None;
        self.last_damage_tick = None;
        self.last_hit_tick = None;
        self.flash_until_tick = 0;
    }
}

/// Complete game session (deterministic given seed + input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Ticks remaining in the active countdown phase
    pub countdown_ticks: u64,
    /// 0 before the first start, then 1-based
    pub level: u32,
    /// Live-enemy population cap for the current level
    pub max_enemies: u32,
    /// Enemies spawned since the level started; guards the clear check
    pub level_spawns: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub drops: Vec<MoneyDrop>,
    pub arsenal: Arsenal,
    pub spawner: SpawnScheduler,
}

impl GameState {
    /// Create a new session with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Countdown,
            countdown_ticks: ticks_from_ms(PREGAME_COUNTDOWN_MS),
            level: 0,
            max_enemies: BASE_MAX_ENEMIES,
            level_spawns: 0,
            time_ticks: 0,
            player: Player::new(Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT / 2.0)),
            enemies: Vec::new(),
            drops: Vec::new(),
            arsenal: Arsenal::standard_issue(),
            spawner: SpawnScheduler::new(0),
        }
    }

    /// The weapon currently supplying the bullet profile
    pub fn equipped_weapon(&self) -> &WeaponDef {
        self.arsenal.get(self.player.equipped)
    }

    /// Health percentage for the status display (write-only observation)
    pub fn health_percent(&self) -> f32 {
        self.player.health_percent()
    }

    pub fn money(&self) -> u32 {
        self.player.money
    }

    /// Explicit weapon switch; out-of-range indices are refused
    pub fn equip(&mut self, index: usize) -> bool {
        if self.arsenal.is_valid(index) {
            self.player.equipped = index;
            true
        } else {
            false
        }
    }

    /// Feed a parsed item descriptor to the catalog. Descriptors without a
    /// usable fire rate are refused; the simulation keeps running either way.
    pub fn ingest_item(&mut self, item: &ItemDescriptor) -> Result<usize, ItemError> {
        self.arsenal
            .ingest(item)
            .ok_or_else(|| ItemError::MissingFireRate(item.name().to_string()))
    }

    /// Hard reset after the player's health reaches zero: back to the
    /// pre-game countdown with starting money, the pistol, and an empty arena.
    pub(crate) fn reset_run(&mut self, now: u64) {
        log::info!(
            "game over at level {} with ${}; resetting",
            self.level,
            self.player.money
        );
        self.player.reset();
        self.enemies.clear();
        self.drops.clear();
        self.level = 0;
        self.level_spawns = 0;
        self.max_enemies = BASE_MAX_ENEMIES;
        self.phase = GamePhase::Countdown;
        self.countdown_ticks = ticks_from_ms(PREGAME_COUNTDOWN_MS);
        self.spawner.reset(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn center() -> Vec2 {
        Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT / 2.0)
    }

    #[test]
    fn test_facing_units() {
        assert_eq!(Facing::Up.unit(), Vec2::new(0.0, -1.0));
        assert_eq!(Facing::Down.unit(), Vec2::new(0.0, 1.0));
        assert_eq!(Facing::Left.unit(), Vec2::new(-1.0, 0.0));
        assert_eq!(Facing::Right.unit(), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_advance_moves_and_faces() {
        let mut player = Player::new(center());
        let controls = ControlState {
            up: true,
            ..Default::default()
        };
        player.advance(&controls);
        assert_eq!(player.pos, center() + Vec2::new(0.0, -PLAYER_SPEED));
        assert_eq!(player.facing, Facing::Up);
    }

    #[test]
    fn test_advance_diagonal_facing_bias() {
        // Up and right both held: moves diagonally, but facing is whichever
        // direction check ran last in the fixed evaluation order
        let mut player = Player::new(center());
        let controls = ControlState {
            up: true,
            right: true,
            ..Default::default()
        };
        player.advance(&controls);
        assert_eq!(
            player.pos,
            center() + Vec2::new(PLAYER_SPEED, -PLAYER_SPEED)
        );
        assert_eq!(player.facing, Facing::Right);
    }

    #[test]
    fn test_advance_blocked_at_wall() {
        let half = PLAYER_SIZE / 2.0;
        let mut player = Player::new(Vec2::new(half, 300.0));
        let controls = ControlState {
            left: true,
            ..Default::default()
        };
        player.advance(&controls);
        assert_eq!(player.pos.x, half);
        // A blocked direction does not steal facing
        assert_eq!(player.facing, Facing::Down);
    }

    #[test]
    fn test_shoot_respects_cooldown() {
        let arsenal = Arsenal::standard_issue();
        let pistol = arsenal.get(0);
        let mut player = Player::new(center());
        player.facing = Facing::Right;

        player.shoot(true, pistol, 100);
        assert_eq!(player.bullets.len(), 1);

        // 400ms later (24 ticks): still inside the 500ms cooldown
        player.shoot(true, pistol, 124);
        assert_eq!(player.bullets.len(), 1);

        // 600ms after the first shot: fires again
        player.shoot(true, pistol, 136);
        assert_eq!(player.bullets.len(), 2);
    }

    #[test]
    fn test_shoot_requires_trigger() {
        let arsenal = Arsenal::standard_issue();
        let mut player = Player::new(center());
        player.shoot(false, arsenal.get(0), 100);
        assert!(player.bullets.is_empty());
        assert!(player.last_shot_tick.is_none());
    }

    #[test]
    fn test_shotgun_fans_three_pellets() {
        let arsenal = Arsenal::standard_issue();
        let mut player = Player::new(center());
        player.facing = Facing::Right;
        player.shoot(true, arsenal.get(1), 100);
        assert_eq!(player.bullets.len(), 3);

        let dys: Vec<f32> = player.bullets.iter().map(|b| b.dir.y).collect();
        assert_eq!(dys, vec![-SHOTGUN_SPREAD, 0.0, SHOTGUN_SPREAD]);
        // All pellets share the forward component
        assert!(player.bullets.iter().all(|b| b.dir.x == 1.0));
    }

    #[test]
    fn test_bullet_profile_frozen_at_fire_time() {
        let arsenal = Arsenal::standard_issue();
        let mut player = Player::new(center());
        player.shoot(true, arsenal.get(3), 100);
        // Equipping a different gun later must not touch the live bullet
        player.equipped = 0;
        assert_eq!(player.bullets[0].profile.damage, 40.0);
    }

    #[test]
    fn test_update_bullets_culls_out_of_bounds() {
        let arsenal = Arsenal::standard_issue();
        let mut player = Player::new(Vec2::new(ARENA_WIDTH - 10.0, 300.0));
        player.facing = Facing::Right;
        player.shoot(true, arsenal.get(0), 100);

        let mut enemies = Vec::new();
        // Speed 7: two steps carry the bullet past the right edge
        player.update_bullets(&mut enemies);
        assert_eq!(player.bullets.len(), 1);
        player.update_bullets(&mut enemies);
        assert!(player.bullets.is_empty());
    }

    #[test]
    fn test_update_bullets_hits_first_enemy_only() {
        let arsenal = Arsenal::standard_issue();
        let mut player = Player::new(center());
        player.facing = Facing::Right;
        player.shoot(true, arsenal.get(0), 100);

        // Two overlapping enemies right in front; insertion order decides
        let spot = center() + Vec2::new(7.0, 0.0);
        let mut enemies = vec![Enemy::new(spot, 1), Enemy::new(spot, 1)];
        player.update_bullets(&mut enemies);

        assert!(player.bullets.is_empty());
        assert_eq!(enemies[0].health, ENEMY_BASE_HEALTH - 10.0);
        assert_eq!(enemies[1].health, ENEMY_BASE_HEALTH);
    }

    #[test]
    fn test_update_bullets_skips_dead_enemies() {
        let arsenal = Arsenal::standard_issue();
        let mut player = Player::new(center());
        player.facing = Facing::Right;
        player.shoot(true, arsenal.get(0), 100);

        let spot = center() + Vec2::new(7.0, 0.0);
        let mut enemies = vec![Enemy::new(spot, 1), Enemy::new(spot, 1)];
        enemies[0].health = 0.0;
        player.update_bullets(&mut enemies);

        assert_eq!(enemies[0].health, 0.0);
        assert_eq!(enemies[1].health, ENEMY_BASE_HEALTH - 10.0);
    }

    #[test]
    fn test_five_pistol_bullets_fell_an_enemy() {
        let arsenal = Arsenal::standard_issue();
        let mut player = Player::new(center());
        player.facing = Facing::Right;
        let mut enemies = vec![Enemy::new(center() + Vec2::new(7.0, 0.0), 1)];

        // Point-blank shots spaced past the 500ms cooldown; each bullet is
        // consumed on its hit and shaves exactly one damage quantum
        for shot in 1..=5u64 {
            player.shoot(true, arsenal.get(0), shot * 40);
            player.update_bullets(&mut enemies);
            assert!(player.bullets.is_empty());
            assert_eq!(enemies[0].health, ENEMY_BASE_HEALTH - shot as f32 * 10.0);
        }
        assert!(enemies[0].health <= 0.0);
    }

    #[test]
    fn test_enemy_health_scales_with_level() {
        assert_eq!(Enemy::new(Vec2::ZERO, 1).health, ENEMY_BASE_HEALTH);
        assert_eq!(
            Enemy::new(Vec2::ZERO, 3).health,
            ENEMY_BASE_HEALTH + 2.0 * ENEMY_HEALTH_PER_LEVEL
        );
        // Level 0 (pre-game edge case) clamps to the base pool
        assert_eq!(Enemy::new(Vec2::ZERO, 0).health, ENEMY_BASE_HEALTH);
    }

    #[test]
    fn test_enemy_pursuit() {
        let mut enemy = Enemy::new(Vec2::new(0.0, 0.0), 1);
        enemy.move_towards(Vec2::new(100.0, 0.0));
        assert!((enemy.pos.x - ENEMY_SPEED).abs() < 1e-5);
        assert!(enemy.pos.y.abs() < 1e-5);
    }

    #[test]
    fn test_health_percent_clamps() {
        let mut player = Player::new(center());
        assert_eq!(player.health_percent(), 100.0);
        player.health = -5.0;
        assert_eq!(player.health_percent(), 0.0);
        player.health = 42.0;
        assert_eq!(player.health_percent(), 42.0);
    }

    #[test]
    fn test_equip_validates_index() {
        let mut state = GameState::new(7);
        assert!(state.equip(3));
        assert_eq!(state.player.equipped, 3);
        assert!(!state.equip(99));
        assert_eq!(state.player.equipped, 3);
    }

    #[test]
    fn test_ingest_item_surfaces_missing_fire_rate() {
        let mut state = GameState::new(7);
        let item = crate::items::parse_item(
            r#"{"type":"item","name":"Medkit","price":120,"stats":{"durability":5}}"#,
        )
        .unwrap();
        assert!(matches!(
            state.ingest_item(&item),
            Err(ItemError::MissingFireRate(_))
        ));
        assert_eq!(state.arsenal.len(), 4);
    }

    #[test]
    fn test_reset_run_restores_start_condition() {
        let mut state = GameState::new(7);
        state.phase = GamePhase::Playing;
        state.level = 4;
        state.max_enemies = BASE_MAX_ENEMIES + 6;
        state.player.money = 9000;
        state.player.health = 0.0;
        state.player.equipped = 2;
        state.enemies.push(Enemy::new(Vec2::ZERO, 4));
        state.drops.push(MoneyDrop {
            pos: Vec2::ZERO,
            amount: 30,
        });

        state.reset_run(1000);

        assert_eq!(state.phase, GamePhase::Countdown);
        assert_eq!(state.level, 0);
        assert_eq!(state.max_enemies, BASE_MAX_ENEMIES);
        assert_eq!(state.player.health, MAX_HEALTH);
        assert_eq!(state.player.money, START_MONEY);
        assert_eq!(state.player.equipped, 0);
        assert!(state.enemies.is_empty());
        assert!(state.drops.is_empty());
    }
}
