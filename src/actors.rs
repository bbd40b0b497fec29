//! Per-entity behaviour: movement, cooldowns, power-up timers and the skull
//! bullet patterns.
//!
//! Every function mutates exactly the entity it is handed.  Randomness is
//! injected so callers control determinism.

use std::f32::consts::TAU;

use rand::Rng;

use crate::constants::*;
use crate::entities::{
    Bounds, Bullet, BulletOwner, Companion, Enemy, EnemyKind, Explosion, Player, PowerUpKind,
};
use crate::input::Movement;

// ── Player ───────────────────────────────────────────────────────────────────

/// Outcome of a hit on the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    /// The shield soaked the hit and is now spent.
    Absorbed,
    /// One life was lost.
    Damaged,
}

/// Move, clamp, and run down the cooldown and power-up timers.
pub fn update_player(player: &mut Player, dt_ms: f32, movement: Movement, bounds: Bounds) {
    if player.shoot_cooldown_ms > 0.0 {
        player.shoot_cooldown_ms = (player.shoot_cooldown_ms - dt_ms).max(0.0);
    }

    if movement.up {
        player.y -= player.speed;
    }
    if movement.down {
        player.y += player.speed;
    }
    if movement.left {
        player.x -= player.speed;
    }
    if movement.right {
        player.x += player.speed;
    }

    // `max` after `min` keeps a ship wider than the viewport pinned at 0.
    player.x = player.x.min(bounds.width - player.width).max(0.0);
    player.y = player.y.min(bounds.height - player.height).max(0.0);

    let p = &mut player.power_ups;
    for timer in [&mut p.big_bullets, &mut p.shield, &mut p.rapid_fire, &mut p.companion] {
        if timer.active {
            timer.remaining_ms -= dt_ms;
            if timer.remaining_ms <= 0.0 {
                timer.remaining_ms = 0.0;
                timer.active = false;
            }
        }
    }
}

/// Fire one bullet straight up, or nothing while the cooldown runs.
pub fn player_shoot(player: &mut Player) -> Option<Bullet> {
    if player.shoot_cooldown_ms > 0.0 {
        return None;
    }
    player.shoot_cooldown_ms = if player.power_ups.rapid_fire.active {
        PLAYER_SHOOT_DELAY_MS / 2.0
    } else {
        PLAYER_SHOOT_DELAY_MS
    };

    let size = if player.power_ups.big_bullets.active {
        PLAYER_BULLET_SIZE * 2.0
    } else {
        PLAYER_BULLET_SIZE
    };
    Some(Bullet::new(
        player.x + player.width / 2.0 - size / 2.0,
        player.y,
        0.0,
        -PLAYER_BULLET_SPEED,
        size,
        size * 2.0,
        BulletOwner::Player,
    ))
}

/// Spend one bomb.  The area effect is the controller's job.
pub fn use_bomb(player: &mut Player) -> bool {
    if player.bombs == 0 {
        return false;
    }
    player.bombs -= 1;
    true
}

pub fn damage_player(player: &mut Player) -> DamageOutcome {
    if player.power_ups.shield.active {
        player.power_ups.shield.active = false;
        player.power_ups.shield.remaining_ms = 0.0;
        return DamageOutcome::Absorbed;
    }
    player.lives = player.lives.saturating_sub(1);
    DamageOutcome::Damaged
}

/// Apply a challenge reward.  Timed kinds are (re)started at full duration.
pub fn grant_power_up(player: &mut Player, kind: PowerUpKind, duration_ms: f32) {
    match player.power_ups.slot_mut(kind) {
        Some(timer) => {
            timer.active = true;
            timer.remaining_ms = duration_ms;
        }
        None => player.bombs = (player.bombs + 1).min(PLAYER_MAX_BOMBS),
    }
}

// ── Companion ────────────────────────────────────────────────────────────────

/// Run down the cooldown and fire when ready.  Position is always derived
/// from `player`, so there is nothing else to simulate.
pub fn update_companion(companion: &mut Companion, player: &Player, dt_ms: f32) -> Option<Bullet> {
    if companion.shoot_cooldown_ms > 0.0 {
        companion.shoot_cooldown_ms -= dt_ms;
    }
    if companion.shoot_cooldown_ms > 0.0 {
        return None;
    }
    companion.shoot_cooldown_ms = COMPANION_SHOOT_DELAY_MS;

    let rect = companion.rect(player);
    Some(Bullet::new(
        rect.x + rect.width / 2.0 - PLAYER_BULLET_SIZE / 2.0,
        rect.y,
        0.0,
        -COMPANION_BULLET_SPEED,
        PLAYER_BULLET_SIZE,
        PLAYER_BULLET_SIZE * 2.0,
        BulletOwner::Player,
    ))
}

// ── Enemies ──────────────────────────────────────────────────────────────────

pub fn spawn_meteor(x: f32, y: f32, rng: &mut impl Rng) -> Enemy {
    let speed = rng.gen_range(METEOR_MIN_SPEED..METEOR_MAX_SPEED);
    let rotation_speed = rng.gen_range(-METEOR_SPIN..METEOR_SPIN);
    Enemy::meteor(x, y, speed, rotation_speed)
}

/// Drift, spin or sway, and deactivate below the bottom edge.
pub fn update_enemy(enemy: &mut Enemy, dt_ms: f32, bounds: Bounds) {
    enemy.y += enemy.speed;
    if enemy.y > bounds.height {
        enemy.active = false;
    }
    enemy.since_last_shot_ms += dt_ms;

    match &mut enemy.kind {
        EnemyKind::Meteor { rotation, rotation_speed } => {
            *rotation += *rotation_speed;
        }
        EnemyKind::Skull { anchor_x, time_s } => {
            *time_s += dt_ms * 0.001;
            let x = *anchor_x + (*time_s * SKULL_SWAY_FREQUENCY).sin() * SKULL_SWAY_AMPLITUDE;
            enemy.x = x.min(bounds.width - enemy.width).max(0.0);
        }
    }
}

/// Returns `true` when this hit destroyed the enemy.
pub fn damage_enemy(enemy: &mut Enemy, amount: i32) -> bool {
    enemy.health -= amount;
    if enemy.health <= 0 {
        enemy.active = false;
        return true;
    }
    false
}

/// The four skull volleys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BulletPattern {
    /// One shot along the vector to the target.
    Aimed,
    /// Three shots at -0.3, 0 and +0.3 rad around the aim vector.
    Fan,
    /// Eight evenly spaced shots, rotated by the skull's age.
    Ring,
    /// A 5×3 wall drifting straight down.
    Grid,
}

impl BulletPattern {
    pub const ALL: [BulletPattern; 4] = [
        BulletPattern::Aimed,
        BulletPattern::Fan,
        BulletPattern::Ring,
        BulletPattern::Grid,
    ];
}

/// Fire if the enemy's interval has elapsed.  Meteors never fire.
pub fn enemy_shoot(enemy: &mut Enemy, target: (f32, f32), rng: &mut impl Rng) -> Vec<Bullet> {
    if !enemy.is_skull() || enemy.since_last_shot_ms < enemy.shoot_delay_ms {
        return Vec::new();
    }
    enemy.since_last_shot_ms = 0.0;
    let pattern = BulletPattern::ALL[rng.gen_range(0..BulletPattern::ALL.len())];
    fire_pattern(enemy, pattern, target)
}

/// Build one volley from the skull's muzzle (bottom centre).
pub fn fire_pattern(enemy: &Enemy, pattern: BulletPattern, target: (f32, f32)) -> Vec<Bullet> {
    let cx = enemy.x + enemy.width / 2.0;
    let cy = enemy.y + enemy.height;
    let half = ENEMY_BULLET_SIZE / 2.0;
    let shot = |angle: f32, speed: f32| {
        Bullet::new(
            cx - half,
            cy,
            angle.cos() * speed,
            angle.sin() * speed,
            ENEMY_BULLET_SIZE,
            ENEMY_BULLET_SIZE,
            BulletOwner::Enemy,
        )
    };

    let (dx, dy) = (target.0 - cx, target.1 - cy);
    // A target sitting exactly on the muzzle has no direction; shoot down.
    let aim = if dx == 0.0 && dy == 0.0 { TAU / 4.0 } else { dy.atan2(dx) };

    match pattern {
        BulletPattern::Aimed => vec![shot(aim, AIMED_BULLET_SPEED)],
        BulletPattern::Fan => (-1..=1)
            .map(|i| shot(aim + i as f32 * FAN_SPREAD_RAD, AIMED_BULLET_SPEED))
            .collect(),
        BulletPattern::Ring => {
            let age = match enemy.kind {
                EnemyKind::Skull { time_s, .. } => time_s,
                EnemyKind::Meteor { .. } => 0.0,
            };
            (0..RING_BULLET_COUNT)
                .map(|i| shot(i as f32 / RING_BULLET_COUNT as f32 * TAU + age, RING_BULLET_SPEED))
                .collect()
        }
        BulletPattern::Grid => {
            let mut wall = Vec::with_capacity(GRID_ROWS * GRID_COLUMNS);
            for row in 0..GRID_ROWS {
                for col in 0..GRID_COLUMNS {
                    wall.push(Bullet::new(
                        cx - GRID_LEFT_OFFSET + col as f32 * GRID_SPACING_X,
                        cy + row as f32 * GRID_SPACING_Y,
                        0.0,
                        GRID_BULLET_SPEED,
                        GRID_BULLET_SIZE,
                        GRID_BULLET_SIZE,
                        BulletOwner::Enemy,
                    ));
                }
            }
            wall
        }
    }
}

// ── Bullets & explosions ─────────────────────────────────────────────────────

/// Move and deactivate once fully outside the playfield.
pub fn update_bullet(bullet: &mut Bullet, bounds: Bounds) {
    bullet.x += bullet.vx;
    bullet.y += bullet.vy;

    if bullet.y < -bullet.height
        || bullet.y > bounds.height + bullet.height
        || bullet.x < -bullet.width
        || bullet.x > bounds.width + bullet.width
    {
        bullet.active = false;
    }
}

pub fn update_explosion(explosion: &mut Explosion, dt_ms: f32) {
    explosion.frame_timer_ms += dt_ms;
    if explosion.frame_timer_ms >= EXPLOSION_FRAME_MS {
        explosion.frame_timer_ms = 0.0;
        explosion.frame += 1;
        if explosion.frame >= EXPLOSION_FRAMES {
            explosion.finished = true;
        }
    }
}
