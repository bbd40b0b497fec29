//! All game entity types: pure data, no behaviour.
//!
//! Per-tick behaviour lives in `actors`; this module only describes shapes,
//! constructors and the small geometric helpers the other modules share.

use crate::constants::*;

// ── Geometry ─────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in playfield units (top-left origin).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Strict overlap: rectangles that only share an edge do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Current viewport size, supplied by the host every tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

// ── Projectiles ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BulletOwner {
    Player,
    Enemy,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub width: f32,
    pub height: f32,
    pub owner: BulletOwner,
    pub active: bool,
}

impl Bullet {
    pub fn new(
        x: f32,
        y: f32,
        vx: f32,
        vy: f32,
        width: f32,
        height: f32,
        owner: BulletOwner,
    ) -> Self {
        Self { x, y, vx, vy, width, height, owner, active: true }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

// ── Explosions ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExplosionSize {
    Small,
    Normal,
    Large,
}

impl ExplosionSize {
    pub fn scale(self) -> f32 {
        match self {
            ExplosionSize::Small => 0.5,
            ExplosionSize::Normal => 1.0,
            ExplosionSize::Large => 1.5,
        }
    }
}

/// A purely visual four-frame blast, centred on `(cx, cy)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Explosion {
    pub cx: f32,
    pub cy: f32,
    pub size: ExplosionSize,
    pub frame: u32,
    pub frame_timer_ms: f32,
    pub finished: bool,
}

impl Explosion {
    pub fn new(cx: f32, cy: f32, size: ExplosionSize) -> Self {
        Self { cx, cy, size, frame: 0, frame_timer_ms: 0.0, finished: false }
    }

    /// Edge length of the blast square.
    pub fn extent(&self) -> f32 {
        EXPLOSION_BASE_SIZE * self.size.scale()
    }
}

// ── Power-ups ────────────────────────────────────────────────────────────────

/// Everything a successful reaction challenge can grant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerUpKind {
    BigBullets,
    Shield,
    /// Instant +1 bomb, capped at the maximum; never timed.
    ExtraBomb,
    RapidFire,
    Companion,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::BigBullets,
        PowerUpKind::Shield,
        PowerUpKind::ExtraBomb,
        PowerUpKind::RapidFire,
        PowerUpKind::Companion,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PowerUpKind::BigBullets => "Big Bullets",
            PowerUpKind::Shield => "Shield",
            PowerUpKind::ExtraBomb => "Extra Bomb",
            PowerUpKind::RapidFire => "Rapid Fire",
            PowerUpKind::Companion => "Companion",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PowerUpTimer {
    pub active: bool,
    pub remaining_ms: f32,
}

/// One slot per timed power-up; extra bombs go straight to `Player::bombs`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PowerUps {
    pub big_bullets: PowerUpTimer,
    pub shield: PowerUpTimer,
    pub rapid_fire: PowerUpTimer,
    pub companion: PowerUpTimer,
}

impl PowerUps {
    /// Timed slot for `kind`, or `None` for the instantaneous extra bomb.
    pub fn slot(&self, kind: PowerUpKind) -> Option<&PowerUpTimer> {
        match kind {
            PowerUpKind::BigBullets => Some(&self.big_bullets),
            PowerUpKind::Shield => Some(&self.shield),
            PowerUpKind::RapidFire => Some(&self.rapid_fire),
            PowerUpKind::Companion => Some(&self.companion),
            PowerUpKind::ExtraBomb => None,
        }
    }

    pub fn slot_mut(&mut self, kind: PowerUpKind) -> Option<&mut PowerUpTimer> {
        match kind {
            PowerUpKind::BigBullets => Some(&mut self.big_bullets),
            PowerUpKind::Shield => Some(&mut self.shield),
            PowerUpKind::RapidFire => Some(&mut self.rapid_fire),
            PowerUpKind::Companion => Some(&mut self.companion),
            PowerUpKind::ExtraBomb => None,
        }
    }

    /// Active timed power-ups in HUD order.
    pub fn active(&self) -> impl Iterator<Item = (PowerUpKind, &PowerUpTimer)> {
        [
            (PowerUpKind::BigBullets, &self.big_bullets),
            (PowerUpKind::Shield, &self.shield),
            (PowerUpKind::RapidFire, &self.rapid_fire),
            (PowerUpKind::Companion, &self.companion),
        ]
        .into_iter()
        .filter(|(_, t)| t.active)
    }
}

// ── Player & companion ───────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub lives: u32,
    pub bombs: u32,
    pub shoot_cooldown_ms: f32,
    pub power_ups: PowerUps,
}

impl Player {
    /// A fresh ship at full lives and bombs.
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            speed: PLAYER_SPEED,
            lives: PLAYER_MAX_LIVES,
            bombs: PLAYER_MAX_BOMBS,
            shoot_cooldown_ms: 0.0,
            power_ups: PowerUps::default(),
        }
    }

    /// Spawn position for a playfield of the given size.
    pub fn spawn(bounds: Bounds) -> Self {
        Self::new(
            bounds.width / 2.0 - PLAYER_WIDTH / 2.0,
            bounds.height - PLAYER_SPAWN_BOTTOM_GAP,
        )
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn center(&self) -> (f32, f32) {
        self.rect().center()
    }
}

/// Wingman that follows the single player slot at a fixed offset.
///
/// Holds no reference to the player: its position is recomputed from
/// whichever player the controller passes in.
#[derive(Clone, Debug, PartialEq)]
pub struct Companion {
    pub offset_x: f32,
    pub offset_y: f32,
    pub shoot_cooldown_ms: f32,
}

impl Companion {
    pub fn new(offset_x: f32, offset_y: f32) -> Self {
        Self { offset_x, offset_y, shoot_cooldown_ms: 0.0 }
    }

    pub fn rect(&self, player: &Player) -> Rect {
        Rect::new(
            player.x + self.offset_x,
            player.y + self.offset_y,
            COMPANION_SIZE,
            COMPANION_SIZE,
        )
    }
}

// ── Enemies ──────────────────────────────────────────────────────────────────

/// Variant-specific state; the shared record is `Enemy`.
#[derive(Clone, Debug, PartialEq)]
pub enum EnemyKind {
    Meteor {
        rotation: f32,
        rotation_speed: f32,
    },
    Skull {
        /// Horizontal centre line of the sway, fixed at spawn.
        anchor_x: f32,
        /// Seconds alive; drives the sway and the ring pattern.
        time_s: f32,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub health: i32,
    pub max_health: i32,
    pub speed: f32,
    pub score_value: u32,
    pub active: bool,
    pub since_last_shot_ms: f32,
    pub shoot_delay_ms: f32,
    pub kind: EnemyKind,
}

impl Enemy {
    pub fn meteor(x: f32, y: f32, speed: f32, rotation_speed: f32) -> Self {
        Self {
            x,
            y,
            width: METEOR_SIZE,
            height: METEOR_SIZE,
            health: METEOR_HEALTH,
            max_health: METEOR_HEALTH,
            speed,
            score_value: METEOR_SCORE,
            active: true,
            since_last_shot_ms: 0.0,
            shoot_delay_ms: DEFAULT_ENEMY_SHOOT_DELAY_MS,
            kind: EnemyKind::Meteor { rotation: 0.0, rotation_speed },
        }
    }

    pub fn skull(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            width: SKULL_SIZE,
            height: SKULL_SIZE,
            health: SKULL_HEALTH,
            max_health: SKULL_HEALTH,
            speed: SKULL_SPEED,
            score_value: SKULL_SCORE,
            active: true,
            since_last_shot_ms: 0.0,
            shoot_delay_ms: SKULL_SHOOT_DELAY_MS,
            kind: EnemyKind::Skull { anchor_x: x, time_s: 0.0 },
        }
    }

    pub fn is_meteor(&self) -> bool {
        matches!(self.kind, EnemyKind::Meteor { .. })
    }

    pub fn is_skull(&self) -> bool {
        matches!(self.kind, EnemyKind::Skull { .. })
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn center(&self) -> (f32, f32) {
        self.rect().center()
    }
}
