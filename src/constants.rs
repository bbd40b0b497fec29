//! Fixed sizes, speeds and delays.
//!
//! Positions and sizes are playfield units, speeds are units per tick and
//! every delay or duration is in milliseconds of simulated time.

// ── Player ───────────────────────────────────────────────────────────────────

pub const PLAYER_WIDTH: f32 = 32.0;
pub const PLAYER_HEIGHT: f32 = 32.0;
pub const PLAYER_SPEED: f32 = 5.0;
pub const PLAYER_MAX_LIVES: u32 = 5;
pub const PLAYER_MAX_BOMBS: u32 = 3;
pub const PLAYER_SHOOT_DELAY_MS: f32 = 100.0;
/// Distance of the spawn point above the bottom edge.
pub const PLAYER_SPAWN_BOTTOM_GAP: f32 = 80.0;

pub const PLAYER_BULLET_SIZE: f32 = 8.0;
pub const PLAYER_BULLET_SPEED: f32 = 8.0;

// ── Companion ────────────────────────────────────────────────────────────────

pub const COMPANION_SIZE: f32 = 20.0;
pub const COMPANION_SHOOT_DELAY_MS: f32 = 200.0;
pub const COMPANION_BULLET_SPEED: f32 = 6.0;
pub const COMPANION_OFFSETS: [(f32, f32); 2] = [(-35.0, 10.0), (35.0, 10.0)];

// ── Enemies ──────────────────────────────────────────────────────────────────

pub const METEOR_SIZE: f32 = 24.0;
pub const METEOR_HEALTH: i32 = 1;
pub const METEOR_SCORE: u32 = 10;
pub const METEOR_MIN_SPEED: f32 = 1.0;
pub const METEOR_MAX_SPEED: f32 = 3.0;
/// Rotation speed is drawn from `[-METEOR_SPIN, METEOR_SPIN)` radians per tick.
pub const METEOR_SPIN: f32 = 0.1;

pub const SKULL_SIZE: f32 = 32.0;
pub const SKULL_HEALTH: i32 = 3;
pub const SKULL_SCORE: u32 = 50;
pub const SKULL_SPEED: f32 = 0.5;
pub const SKULL_SHOOT_DELAY_MS: f32 = 2000.0;
pub const SKULL_SWAY_AMPLITUDE: f32 = 50.0;
pub const SKULL_SWAY_FREQUENCY: f32 = 2.0;
pub const DEFAULT_ENEMY_SHOOT_DELAY_MS: f32 = 1000.0;

// ── Enemy bullet patterns ────────────────────────────────────────────────────

pub const ENEMY_BULLET_SIZE: f32 = 8.0;
pub const AIMED_BULLET_SPEED: f32 = 3.0;
pub const FAN_SPREAD_RAD: f32 = 0.3;
pub const RING_BULLET_COUNT: usize = 8;
pub const RING_BULLET_SPEED: f32 = 2.0;
pub const GRID_COLUMNS: usize = 5;
pub const GRID_ROWS: usize = 3;
pub const GRID_BULLET_SIZE: f32 = 6.0;
pub const GRID_BULLET_SPEED: f32 = 1.5;
pub const GRID_SPACING_X: f32 = 20.0;
pub const GRID_SPACING_Y: f32 = 15.0;
pub const GRID_LEFT_OFFSET: f32 = 40.0;

// ── Explosions ───────────────────────────────────────────────────────────────

pub const EXPLOSION_BASE_SIZE: f32 = 32.0;
pub const EXPLOSION_FRAME_MS: f32 = 100.0;
pub const EXPLOSION_FRAMES: u32 = 4;

// ── Spawner, challenge and effect timers (defaults for `Tuning`) ─────────────

pub const METEOR_SPAWN_DELAY_MS: f32 = 1500.0;
pub const METEOR_SPAWN_FLOOR_MS: f32 = 500.0;
pub const METEOR_SPAWN_STEP_MS: f32 = 10.0;
pub const SKULL_SPAWN_DELAY_MS: f32 = 8000.0;
pub const SKULL_SCORE_GATE: u32 = 100;

pub const CHALLENGE_INTERVAL_MS: f32 = 15000.0;
pub const CHALLENGE_TIME_LIMIT_MS: f32 = 5000.0;
pub const CHALLENGE_MIN_LEN: usize = 3;
pub const CHALLENGE_MAX_LEN: usize = 5;
pub const POWER_UP_DURATION_MS: f32 = 10000.0;
pub const CHALLENGE_FEEDBACK_MS: f32 = 2000.0;

pub const BOMB_FLASH_MS: f32 = 500.0;
pub const BOMB_SKULL_DAMAGE: i32 = 2;

pub const MAX_FRAME_MS: f32 = 250.0;

// ── Background ───────────────────────────────────────────────────────────────

pub const BACKGROUND_SPEED: f32 = 1.0;
