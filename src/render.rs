//! Rendering layer: a read-only pass over the game state.
//!
//! Draw calls go to an abstract immediate-mode [`Surface`]; sprites are
//! requested by [`SpriteKey`] and only blitted when the [`AssetProvider`]
//! says they are ready and not errored.  Otherwise every entity has a
//! deterministic procedural look, so a game with no assets at all is fully
//! playable.

use serde::Deserialize;

use crate::challenge::ReactionChallenge;
use crate::compute::{GameMode, GameState};
use crate::constants::EXPLOSION_FRAMES;
use crate::entities::{Bullet, BulletOwner, Enemy, EnemyKind, Explosion, Player, Rect};

// ── Drawing capabilities ─────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: (rgb >> 16) as u8,
            g: (rgb >> 8) as u8,
            b: rgb as u8,
            a: 1.0,
        }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub color: Color,
    pub size: f32,
    pub bold: bool,
    pub align: Align,
}

impl TextStyle {
    pub fn new(color: Color, size: f32) -> Self {
        Self { color, size, bold: false, align: Align::Left }
    }

    pub fn bold(self) -> Self {
        Self { bold: true, ..self }
    }

    pub fn align(self, align: Align) -> Self {
        Self { align, ..self }
    }
}

/// Immediate-mode 2D drawing target.
///
/// Transform and opacity calls apply to everything drawn until the matching
/// `restore`.  Text `y` is the baseline.
pub trait Surface {
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f32);
    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color);
    fn stroke_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color, line_width: f32);
    fn text(&mut self, text: &str, x: f32, y: f32, style: TextStyle);
    fn draw_image(&mut self, key: SpriteKey, dest: Rect);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f32, dy: f32);
    fn rotate(&mut self, radians: f32);
    fn scale(&mut self, factor: f32);
    fn set_alpha(&mut self, alpha: f32);
}

/// Best-effort view of asynchronously loaded sprites.  Never blocks.
pub trait AssetProvider {
    fn ready(&self, key: SpriteKey) -> bool;
    fn errored(&self, key: SpriteKey) -> bool;

    fn usable(&self, key: SpriteKey) -> bool {
        self.ready(key) && !self.errored(key)
    }
}

/// Provider with nothing loaded: everything renders procedurally.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoAssets;

impl AssetProvider for NoAssets {
    fn ready(&self, _key: SpriteKey) -> bool {
        false
    }

    fn errored(&self, _key: SpriteKey) -> bool {
        false
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpriteKey {
    PlayerShip,
    SkullEnemy,
    Meteor,
    PlayerBullet,
    EnemyBullet,
    Shield,
    #[serde(rename = "explosion_frame_1")]
    ExplosionFrame1,
    #[serde(rename = "explosion_frame_2")]
    ExplosionFrame2,
    #[serde(rename = "explosion_frame_3")]
    ExplosionFrame3,
    #[serde(rename = "explosion_frame_4")]
    ExplosionFrame4,
    SpaceBackground,
}

impl SpriteKey {
    pub const ALL: [SpriteKey; 11] = [
        SpriteKey::PlayerShip,
        SpriteKey::SkullEnemy,
        SpriteKey::Meteor,
        SpriteKey::PlayerBullet,
        SpriteKey::EnemyBullet,
        SpriteKey::Shield,
        SpriteKey::ExplosionFrame1,
        SpriteKey::ExplosionFrame2,
        SpriteKey::ExplosionFrame3,
        SpriteKey::ExplosionFrame4,
        SpriteKey::SpaceBackground,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SpriteKey::PlayerShip => "player_ship",
            SpriteKey::SkullEnemy => "skull_enemy",
            SpriteKey::Meteor => "meteor",
            SpriteKey::PlayerBullet => "player_bullet",
            SpriteKey::EnemyBullet => "enemy_bullet",
            SpriteKey::Shield => "shield",
            SpriteKey::ExplosionFrame1 => "explosion_frame_1",
            SpriteKey::ExplosionFrame2 => "explosion_frame_2",
            SpriteKey::ExplosionFrame3 => "explosion_frame_3",
            SpriteKey::ExplosionFrame4 => "explosion_frame_4",
            SpriteKey::SpaceBackground => "space_background",
        }
    }

    /// Location of the image relative to the asset root.
    pub fn path(self) -> String {
        let dir = match self {
            SpriteKey::Shield
            | SpriteKey::ExplosionFrame1
            | SpriteKey::ExplosionFrame2
            | SpriteKey::ExplosionFrame3
            | SpriteKey::ExplosionFrame4 => "effects",
            SpriteKey::SpaceBackground => "backgrounds",
            _ => "sprites",
        };
        format!("assets/{dir}/{}.png", self.name())
    }

    /// Animation frame `index` (clamped to the last frame).
    pub fn explosion_frame(index: u32) -> Self {
        match index {
            0 => SpriteKey::ExplosionFrame1,
            1 => SpriteKey::ExplosionFrame2,
            2 => SpriteKey::ExplosionFrame3,
            _ => SpriteKey::ExplosionFrame4,
        }
    }
}

// ── Palette ──────────────────────────────────────────────────────────────────

const C_CLEAR: Color = Color::hex(0x000011);
const C_STAR: Color = Color::hex(0xffffff);
const C_STAR_BIG: Color = Color::hex(0xaaaaff);
const C_SHIP: Color = Color::hex(0x00aaff);
const C_ENGINE: Color = Color::hex(0xffff00);
const C_SHIELD: Color = Color::hex(0x00ffff);
const C_COMPANION: Color = Color::hex(0x00ff88);
const C_COMPANION_ENGINE: Color = Color::hex(0x88ff00);
const C_METEOR: Color = Color::hex(0x666666);
const C_METEOR_DETAIL: Color = Color::hex(0x444444);
const C_SKULL: Color = Color::hex(0xcc3333);
const C_SKULL_EYES: Color = Color::hex(0xff0000);
const C_SKULL_MOUTH: Color = Color::hex(0x000000);
const C_HEALTH_BACK: Color = Color::hex(0xff0000);
const C_HEALTH_FRONT: Color = Color::hex(0x00ff00);
const C_BULLET: Color = Color::hex(0xffff00);
const C_BIG_BULLET_HALO: Color = Color::hex(0x44ddff);
const C_ENEMY_BULLET: Color = Color::hex(0xff4444);
const C_WHITE: Color = Color::hex(0xffffff);
const C_BLAST_OUTER: Color = Color::hex(0xff6600);
const C_BLAST_INNER: Color = Color::hex(0xffff00);
const C_HEART: Color = Color::hex(0xff0044);
const C_BOMB: Color = Color::hex(0xffaa00);
const C_POWER_UP: Color = Color::hex(0x00ff88);
const C_TITLE: Color = Color::hex(0x00ff41);
const C_GREY: Color = Color::hex(0xaaaaaa);
const C_DIM: Color = Color::hex(0x666666);
const C_TIP: Color = Color::hex(0xffdd44);
const C_CHALLENGE: Color = Color::hex(0xffff00);
const C_SUCCESS: Color = Color::hex(0x00ff00);
const C_FAILURE: Color = Color::hex(0xff4444);

// ── Public entry point ───────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<S: Surface, A: AssetProvider>(state: &GameState, surface: &mut S, assets: &A) {
    let (w, h) = (state.bounds.width, state.bounds.height);
    surface.fill_rect(Rect::new(0.0, 0.0, w, h), C_CLEAR);
    draw_background(state, surface, assets);

    match state.mode {
        GameMode::Menu => draw_menu(state, surface),
        GameMode::Playing => draw_playing(state, surface, assets),
        GameMode::Paused => {
            draw_playing(state, surface, assets);
            draw_paused(state, surface);
        }
        GameMode::Challenge => {
            draw_playing(state, surface, assets);
            if let Some(challenge) = &state.challenge {
                draw_challenge(state, challenge, surface);
            }
        }
        GameMode::GameOver => draw_game_over(state, surface),
    }

    if state.bomb_flash_ms > 0.0 && state.tuning.bomb_flash_ms > 0.0 {
        let alpha = (state.bomb_flash_ms / state.tuning.bomb_flash_ms).min(1.0);
        surface.fill_rect(Rect::new(0.0, 0.0, w, h), C_WHITE.with_alpha(alpha));
    }
}

/// Blit `key` into `dest` when usable, otherwise run the procedural fallback.
fn sprite_or<S: Surface, A: AssetProvider>(
    surface: &mut S,
    assets: &A,
    key: SpriteKey,
    dest: Rect,
    fallback: impl FnOnce(&mut S),
) {
    if assets.usable(key) {
        surface.draw_image(key, dest);
    } else {
        fallback(surface);
    }
}

// ── Background ───────────────────────────────────────────────────────────────

fn draw_background<S: Surface, A: AssetProvider>(state: &GameState, surface: &mut S, assets: &A) {
    let (w, h) = (state.bounds.width, state.bounds.height);
    let offset = state.background_offset;

    if assets.usable(SpriteKey::SpaceBackground) {
        surface.draw_image(SpriteKey::SpaceBackground, Rect::new(0.0, offset - h, w, h));
        surface.draw_image(SpriteKey::SpaceBackground, Rect::new(0.0, offset, w, h));
        return;
    }
    if w <= 0.0 || h <= 0.0 {
        return;
    }

    for i in 0..100 {
        let i = i as f32;
        let x = (i * 67.0 + offset * 0.5) % w;
        let y = (i * 43.0 + offset) % h;
        let size = i % 3.0 + 1.0;
        surface.fill_rect(Rect::new(x, y, size, size), C_STAR);
    }
    for i in 0..20 {
        let i = i as f32;
        let x = (i * 97.0 + offset * 0.3) % w;
        let y = (i * 73.0 + offset * 1.5) % h;
        surface.fill_rect(Rect::new(x, y, 2.0, 2.0), C_STAR_BIG);
    }
}

// ── Playfield ────────────────────────────────────────────────────────────────

fn draw_playing<S: Surface, A: AssetProvider>(state: &GameState, surface: &mut S, assets: &A) {
    if let Some(player) = &state.player {
        draw_player(player, surface, assets);
        for companion in &state.companions {
            let r = companion.rect(player);
            surface.fill_rect(r, C_COMPANION);
            surface.fill_rect(Rect::new(r.x + 4.0, r.bottom(), 3.0, 6.0), C_COMPANION_ENGINE);
            surface.fill_rect(Rect::new(r.x + 13.0, r.bottom(), 3.0, 6.0), C_COMPANION_ENGINE);
        }
    }
    for enemy in &state.enemies {
        draw_enemy(enemy, surface, assets);
    }
    for bullet in state.bullets.iter().chain(&state.enemy_bullets) {
        draw_bullet(bullet, surface, assets);
    }
    for explosion in &state.explosions {
        draw_explosion(explosion, surface, assets);
    }

    draw_hud(state, surface);

    if let Some(feedback) = state.feedback.as_ref().filter(|f| f.is_visible()) {
        let color = if feedback.success { C_SUCCESS } else { C_FAILURE };
        surface.text(
            &feedback.message(),
            state.bounds.width / 2.0,
            150.0,
            TextStyle::new(color, 24.0).bold().align(Align::Center),
        );
    }
}

fn draw_player<S: Surface, A: AssetProvider>(player: &Player, surface: &mut S, assets: &A) {
    let r = player.rect();
    sprite_or(surface, assets, SpriteKey::PlayerShip, r, |s| {
        s.fill_rect(r, C_SHIP);
        s.fill_rect(Rect::new(r.x + 8.0, r.bottom(), 4.0, 8.0), C_ENGINE);
        s.fill_rect(Rect::new(r.x + 20.0, r.bottom(), 4.0, 8.0), C_ENGINE);
    });

    if player.power_ups.shield.active {
        let size = player.width + 16.0;
        let halo = Rect::new(player.x - 8.0, player.y - 8.0, size, size);
        sprite_or(surface, assets, SpriteKey::Shield, halo, |s| {
            let (cx, cy) = r.center();
            s.stroke_circle(cx, cy, player.width / 2.0 + 5.0, C_SHIELD, 2.0);
        });
    }
}

fn draw_enemy<S: Surface, A: AssetProvider>(enemy: &Enemy, surface: &mut S, assets: &A) {
    let r = enemy.rect();
    match enemy.kind {
        EnemyKind::Meteor { rotation, .. } => {
            let (cx, cy) = r.center();
            let local = Rect::new(-r.width / 2.0, -r.height / 2.0, r.width, r.height);
            surface.save();
            surface.translate(cx, cy);
            surface.rotate(rotation);
            sprite_or(surface, assets, SpriteKey::Meteor, local, |s| {
                s.fill_rect(local, C_METEOR);
                s.fill_rect(Rect::new(local.x + 4.0, local.y + 4.0, 8.0, 8.0), C_METEOR_DETAIL);
                s.fill_rect(Rect::new(local.x + 12.0, local.y + 8.0, 6.0, 6.0), C_METEOR_DETAIL);
            });
            surface.restore();
        }
        EnemyKind::Skull { .. } => {
            sprite_or(surface, assets, SpriteKey::SkullEnemy, r, |s| {
                s.fill_rect(r, C_SKULL);
                s.fill_rect(Rect::new(r.x + 8.0, r.y + 8.0, 6.0, 6.0), C_SKULL_EYES);
                s.fill_rect(Rect::new(r.x + 18.0, r.y + 8.0, 6.0, 6.0), C_SKULL_EYES);
                s.fill_rect(Rect::new(r.x + 12.0, r.y + 20.0, 8.0, 4.0), C_SKULL_MOUTH);
            });
            if enemy.health < enemy.max_health && enemy.max_health > 0 {
                let ratio = enemy.health.max(0) as f32 / enemy.max_health as f32;
                surface.fill_rect(Rect::new(r.x, r.y - 8.0, r.width, 4.0), C_HEALTH_BACK);
                surface.fill_rect(Rect::new(r.x, r.y - 8.0, r.width * ratio, 4.0), C_HEALTH_FRONT);
            }
        }
    }
}

fn draw_bullet<S: Surface, A: AssetProvider>(bullet: &Bullet, surface: &mut S, assets: &A) {
    let r = bullet.rect();
    match bullet.owner {
        // Big bullets are always drawn procedurally as energy bolts.
        BulletOwner::Player if r.width >= 16.0 => {
            surface.fill_rect(r, C_SHIP);
            surface.fill_rect(
                Rect::new(r.x + 3.0, r.y + 2.0, r.width - 6.0, r.height - 4.0),
                C_WHITE,
            );
            surface.stroke_rect(
                Rect::new(r.x - 1.0, r.y - 1.0, r.width + 2.0, r.height + 2.0),
                C_BIG_BULLET_HALO,
                2.0,
            );
        }
        BulletOwner::Player => sprite_or(surface, assets, SpriteKey::PlayerBullet, r, |s| {
            s.fill_rect(r, C_BULLET);
            s.fill_rect(
                Rect::new(r.x + r.width / 4.0, r.y + r.height / 4.0, r.width / 2.0, r.height / 2.0),
                C_WHITE,
            );
        }),
        BulletOwner::Enemy => sprite_or(surface, assets, SpriteKey::EnemyBullet, r, |s| {
            s.fill_rect(r, C_ENEMY_BULLET);
        }),
    }
}

fn draw_explosion<S: Surface, A: AssetProvider>(
    explosion: &Explosion,
    surface: &mut S,
    assets: &A,
) {
    if explosion.finished || explosion.frame >= EXPLOSION_FRAMES {
        return;
    }
    let key = SpriteKey::explosion_frame(explosion.frame);
    let scale = explosion.size.scale();

    if assets.usable(key) {
        surface.save();
        surface.translate(explosion.cx, explosion.cy);
        surface.scale(scale);
        surface.draw_image(key, Rect::new(-16.0, -16.0, 32.0, 32.0));
        surface.restore();
        return;
    }

    let progress = explosion.frame as f32 / EXPLOSION_FRAMES as f32;
    let radius = explosion.extent() / 2.0 * (1.0 + progress);
    surface.save();
    surface.set_alpha(1.0 - progress);
    surface.fill_circle(explosion.cx, explosion.cy, radius, C_BLAST_OUTER);
    surface.fill_circle(explosion.cx, explosion.cy, radius * 0.6, C_BLAST_INNER);
    surface.fill_circle(explosion.cx, explosion.cy, radius * 0.3, C_WHITE);
    surface.restore();
}

// ── HUD ──────────────────────────────────────────────────────────────────────

fn draw_hud<S: Surface>(state: &GameState, surface: &mut S) {
    let Some(player) = &state.player else { return };
    let label = TextStyle::new(C_WHITE, 20.0);

    surface.text(&format!("Score: {}", state.score), 20.0, 30.0, label);

    surface.text("Lives:", 20.0, 60.0, label);
    for i in 0..player.lives {
        surface.text("♥", 100.0 + i as f32 * 25.0, 60.0, TextStyle::new(C_HEART, 20.0));
    }

    surface.text("Bombs:", 20.0, 90.0, label);
    for i in 0..player.bombs {
        surface.text("●", 100.0 + i as f32 * 25.0, 90.0, TextStyle::new(C_BOMB, 20.0));
    }

    let mut y = 120.0;
    for (kind, timer) in player.power_ups.active() {
        let seconds = (timer.remaining_ms / 1000.0).ceil();
        surface.text(
            &format!("{}: {seconds}s", kind.label()),
            20.0,
            y,
            TextStyle::new(C_POWER_UP, 16.0),
        );
        y += 20.0;
    }
}

// ── Screens & overlays ───────────────────────────────────────────────────────

fn draw_menu<S: Surface>(state: &GameState, surface: &mut S) {
    let (w, h) = (state.bounds.width, state.bounds.height);
    let cx = w / 2.0;

    surface.text(
        "PIXEL EXPEDITION",
        cx,
        h / 2.0 - 100.0,
        TextStyle::new(C_TITLE, 48.0).bold().align(Align::Center),
    );
    surface.text(
        "an arcade shoot-'em-up",
        cx,
        h / 2.0 - 70.0,
        TextStyle::new(C_GREY, 18.0).align(Align::Center),
    );

    let controls = [
        "Controls:",
        "WASD / arrows - move",
        "Space - shoot",
        "Shift / B - bomb",
        "Arrows - reaction challenge",
        "Esc - pause",
    ];
    let mut y = h / 2.0 - 20.0;
    for (i, line) in controls.iter().enumerate() {
        surface.text(line, cx - 120.0, y, TextStyle::new(C_WHITE, 20.0));
        y += if i == 0 { 30.0 } else { 25.0 };
    }

    let tips = [
        "Meteors are worth 10 points, skulls 50",
        "Skulls appear once you reach 100 points",
        "A reaction challenge starts every 15 seconds",
        "Clear it with the arrow keys for a power-up!",
    ];
    y += 15.0;
    for line in tips {
        surface.text(line, cx, y, TextStyle::new(C_TIP, 16.0).align(Align::Center));
        y += 20.0;
    }

    surface.text(
        "Press any key to start",
        cx,
        h - 80.0,
        TextStyle::new(C_WHITE, 24.0).bold().align(Align::Center),
    );
}

fn draw_game_over<S: Surface>(state: &GameState, surface: &mut S) {
    let (cx, cy) = (state.bounds.width / 2.0, state.bounds.height / 2.0);
    surface.text(
        "GAME OVER",
        cx,
        cy - 50.0,
        TextStyle::new(C_FAILURE, 48.0).bold().align(Align::Center),
    );
    let body = TextStyle::new(C_WHITE, 24.0).align(Align::Center);
    surface.text(&format!("Final score: {}", state.score), cx, cy, body);
    surface.text("Press any key to continue", cx, cy + 40.0, body);
}

fn draw_paused<S: Surface>(state: &GameState, surface: &mut S) {
    let (w, h) = (state.bounds.width, state.bounds.height);
    surface.fill_rect(Rect::new(0.0, 0.0, w, h), Color::hex(0x000000).with_alpha(0.7));
    surface.text(
        "PAUSED",
        w / 2.0,
        h / 2.0 - 20.0,
        TextStyle::new(C_WHITE, 48.0).bold().align(Align::Center),
    );
    surface.text(
        "Press ESC to resume",
        w / 2.0,
        h / 2.0 + 30.0,
        TextStyle::new(C_WHITE, 24.0).align(Align::Center),
    );
}

/// Bottom bar: title, countdown, the arrow sequence and progress.
fn draw_challenge<S: Surface>(state: &GameState, challenge: &ReactionChallenge, surface: &mut S) {
    let w = state.bounds.width;
    let bar_height = 120.0;
    let top = state.bounds.height - bar_height;

    surface.fill_rect(Rect::new(0.0, top, w, bar_height), Color::hex(0x000000).with_alpha(0.85));
    surface.fill_rect(Rect::new(0.0, top, w, 3.0), C_CHALLENGE);

    surface.text("REACTION CHALLENGE", 20.0, top + 25.0, TextStyle::new(C_CHALLENGE, 20.0).bold());
    let seconds = challenge.seconds_left();
    let timer_color = if seconds <= 2 { C_FAILURE } else { C_WHITE };
    surface.text(
        &format!("Time: {seconds}s"),
        w - 20.0,
        top + 25.0,
        TextStyle::new(timer_color, 18.0).align(Align::Right),
    );

    let arrow_size = 32.0;
    let spacing = 40.0;
    let count = challenge.sequence.len() as f32;
    let total = count * spacing - (spacing - arrow_size);
    let start_x = (w - total) / 2.0;
    let arrow_y = top + 65.0;
    let pulse = (state.clock_ms * 0.01).sin() * 0.3 + 0.7;

    for (i, direction) in challenge.sequence.iter().enumerate() {
        let x = start_x + i as f32 * spacing;
        surface.fill_rect(
            Rect::new(x - 2.0, arrow_y - arrow_size + 5.0, arrow_size + 4.0, arrow_size + 4.0),
            C_WHITE.with_alpha(0.1),
        );
        let color = if i < challenge.index {
            C_SUCCESS
        } else if i == challenge.index {
            C_CHALLENGE.with_alpha(pulse)
        } else {
            C_DIM
        };
        surface.text(
            direction.arrow(),
            x + arrow_size / 2.0,
            arrow_y,
            TextStyle::new(color, arrow_size).align(Align::Center),
        );
    }

    surface.text(
        &format!("{}/{}", challenge.index, challenge.sequence.len()),
        w / 2.0,
        top + 105.0,
        TextStyle::new(C_GREY, 14.0).align(Align::Center),
    );
}
