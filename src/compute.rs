//! Game controller: owns every entity collection and timer, routes input,
//! and advances the simulation one tick at a time.
//!
//! The host calls [`key_down`] / [`key_up`] as key events arrive and
//! [`tick`] once per frame with the elapsed time and current viewport.  All
//! randomness comes through the injected `rng`, so a seeded RNG replays a
//! game exactly.

use log::{debug, info};
use rand::Rng;

use crate::actors::{
    damage_enemy, enemy_shoot, grant_power_up, player_shoot, update_bullet, update_companion,
    update_enemy, update_explosion, update_player, use_bomb,
};
use crate::challenge::{
    roll_power_up, ChallengeFeedback, ChallengeProgress, Direction, ReactionChallenge,
};
use crate::collision::{self, CombatReport};
use crate::config::Tuning;
use crate::constants::{BACKGROUND_SPEED, BOMB_SKULL_DAMAGE, COMPANION_OFFSETS};
use crate::entities::{
    Bounds, Bullet, Companion, Enemy, EnemyKind, Explosion, ExplosionSize, Player,
};
use crate::input::{InputState, Key};
use crate::spawner::Spawner;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameMode {
    Menu,
    Playing,
    Paused,
    /// Reaction challenge overlaid on a still-running simulation.
    Challenge,
    GameOver,
}

/// The entire simulation context, threaded explicitly through every update.
#[derive(Clone, Debug)]
pub struct GameState {
    pub mode: GameMode,
    pub score: u32,
    pub bounds: Bounds,
    /// The single player slot; `None` until the first game starts.
    pub player: Option<Player>,
    /// Zero or two wingmen, present exactly while the companion power-up runs.
    pub companions: Vec<Companion>,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub enemy_bullets: Vec<Bullet>,
    pub explosions: Vec<Explosion>,
    pub spawner: Spawner,
    /// Time left until the next reaction challenge.
    pub challenge_timer_ms: f32,
    /// Present exactly while `mode` is `Challenge`.
    pub challenge: Option<ReactionChallenge>,
    pub feedback: Option<ChallengeFeedback>,
    pub bomb_flash_ms: f32,
    pub background_offset: f32,
    /// Total simulated time, used for pulsing overlays.
    pub clock_ms: f32,
    pub input: InputState,
    pub tuning: Tuning,
}

// ── Constructors & mode transitions ──────────────────────────────────────────

/// A fresh controller sitting on the title menu.
pub fn init_state(bounds: Bounds, tuning: Tuning) -> GameState {
    GameState {
        mode: GameMode::Menu,
        score: 0,
        bounds,
        player: None,
        companions: Vec::new(),
        bullets: Vec::new(),
        enemies: Vec::new(),
        enemy_bullets: Vec::new(),
        explosions: Vec::new(),
        spawner: Spawner::new(&tuning),
        challenge_timer_ms: tuning.challenge_interval_ms,
        challenge: None,
        feedback: None,
        bomb_flash_ms: 0.0,
        background_offset: 0.0,
        clock_ms: 0.0,
        input: InputState::default(),
        tuning,
    }
}

/// Menu → Playing: new ship, empty field, every timer rewound.
pub fn start_game(state: &mut GameState) {
    state.mode = GameMode::Playing;
    state.score = 0;
    state.player = Some(Player::spawn(state.bounds));
    state.companions.clear();
    state.bullets.clear();
    state.enemies.clear();
    state.enemy_bullets.clear();
    state.explosions.clear();
    state.spawner = Spawner::new(&state.tuning);
    state.challenge_timer_ms = state.tuning.challenge_interval_ms;
    state.challenge = None;
    state.feedback = None;
    state.bomb_flash_ms = 0.0;
    state.input.clear();
    info!("game started ({}x{})", state.bounds.width, state.bounds.height);
}

pub fn return_to_menu(state: &mut GameState) {
    state.mode = GameMode::Menu;
    state.input.clear();
    info!("back to menu");
}

/// Terminal state; abandons the challenge and any held input.
pub fn game_over(state: &mut GameState) {
    state.mode = GameMode::GameOver;
    state.challenge = None;
    state.input.clear();
    info!("game over, final score {}", state.score);
}

// ── Input routing ────────────────────────────────────────────────────────────

pub fn key_down(state: &mut GameState, key: Key, rng: &mut impl Rng) {
    // Arrows belong to the challenge while it runs and never reach movement.
    if state.mode == GameMode::Challenge {
        if let Some(direction) = key.challenge_direction() {
            handle_challenge_input(state, direction, rng);
            return;
        }
    }

    match state.mode {
        GameMode::Menu => {
            start_game(state);
            return;
        }
        GameMode::GameOver => {
            return_to_menu(state);
            return;
        }
        _ => {}
    }

    state.input.press(key);

    if key == Key::Escape {
        match state.mode {
            GameMode::Playing => state.mode = GameMode::Paused,
            GameMode::Paused => state.mode = GameMode::Playing,
            _ => {}
        }
    }
}

pub fn key_up(state: &mut GameState, key: Key) {
    if state.mode == GameMode::Challenge && key.challenge_direction().is_some() {
        return;
    }
    state.input.release(key);
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the whole game by one frame of `dt_ms` milliseconds.
pub fn tick(state: &mut GameState, dt_ms: f32, bounds: Bounds, rng: &mut impl Rng) {
    let dt = dt_ms.clamp(0.0, state.tuning.max_frame_ms);
    state.bounds = bounds;
    state.clock_ms += dt;

    if state.bomb_flash_ms > 0.0 {
        state.bomb_flash_ms = (state.bomb_flash_ms - dt).max(0.0);
    }
    if let Some(feedback) = state.feedback.as_mut() {
        feedback.remaining_ms -= dt;
        if !feedback.is_visible() {
            state.feedback = None;
        }
    }

    match state.mode {
        GameMode::Menu | GameMode::GameOver => scroll_background(state),
        GameMode::Paused => {}
        GameMode::Playing => {
            scroll_background(state);
            state.challenge_timer_ms -= dt;
            if state.challenge_timer_ms <= 0.0 {
                start_challenge(state, rng);
            }
            simulate(state, dt, rng);
        }
        GameMode::Challenge => {
            scroll_background(state);
            simulate(state, dt, rng);
            if state.mode == GameMode::Challenge {
                let expired = state
                    .challenge
                    .as_mut()
                    .map_or(true, |challenge| challenge.advance(dt));
                if expired {
                    end_challenge(state, false, rng);
                }
            }
        }
    }

    state.input.end_tick();
}

fn scroll_background(state: &mut GameState) {
    state.background_offset += BACKGROUND_SPEED;
    if state.background_offset >= state.bounds.height {
        state.background_offset = 0.0;
    }
}

/// Everything that keeps running in both `Playing` and `Challenge`.
fn simulate(state: &mut GameState, dt: f32, rng: &mut impl Rng) {
    for explosion in &mut state.explosions {
        update_explosion(explosion, dt);
    }

    let movement = state.input.movement();
    let fire = state.input.was_pressed(Key::Space);
    let bomb = state.input.was_pressed(Key::Shift);
    let bounds = state.bounds;

    let Some(player) = state.player.as_mut() else { return };
    update_player(player, dt, movement, bounds);
    if fire {
        if let Some(bullet) = player_shoot(player) {
            state.bullets.push(bullet);
        }
    }
    if bomb && use_bomb(player) {
        detonate_bomb(state);
    }

    for bullet in &mut state.bullets {
        update_bullet(bullet, bounds);
    }

    let spawned = state.spawner.update(dt, state.score, bounds, &state.tuning, rng);
    state.enemies.extend(spawned);

    let target = state.player.as_ref().map_or((0.0, 0.0), Player::center);
    for enemy in state.enemies.iter_mut().filter(|e| e.active) {
        update_enemy(enemy, dt, bounds);
        let volley = enemy_shoot(enemy, target, rng);
        state.enemy_bullets.extend(volley);
    }

    for bullet in &mut state.enemy_bullets {
        update_bullet(bullet, bounds);
    }

    manage_companions(state);
    if let Some(player) = state.player.as_ref() {
        for companion in &mut state.companions {
            if let Some(bullet) = update_companion(companion, player, dt) {
                state.bullets.push(bullet);
            }
        }
    }

    let report = collision::resolve(state);
    if report != CombatReport::default() {
        debug!("combat: {report:?}");
    }

    if state.player.as_ref().is_some_and(|p| p.lives == 0) {
        game_over(state);
    }
}

/// Keep the wingmen in step with the companion power-up.
pub fn manage_companions(state: &mut GameState) {
    let active = state
        .player
        .as_ref()
        .is_some_and(|p| p.power_ups.companion.active);
    if !active {
        state.companions.clear();
    } else if state.companions.is_empty() {
        state.companions = COMPANION_OFFSETS
            .iter()
            .map(|&(dx, dy)| Companion::new(dx, dy))
            .collect();
    }
}

// ── Bomb ─────────────────────────────────────────────────────────────────────

/// Area effect of a bomb the player already paid for: wipe enemy fire,
/// destroy every meteor and deal heavy damage to every skull.
pub fn detonate_bomb(state: &mut GameState) {
    state.enemy_bullets.clear();

    let mut gained = 0;
    for enemy in state.enemies.iter_mut().filter(|e| e.active) {
        let (cx, cy) = enemy.center();
        match enemy.kind {
            EnemyKind::Meteor { .. } => {
                enemy.active = false;
                gained += enemy.score_value;
                state.explosions.push(Explosion::new(cx, cy, ExplosionSize::Normal));
            }
            EnemyKind::Skull { .. } => {
                if damage_enemy(enemy, BOMB_SKULL_DAMAGE) {
                    gained += enemy.score_value;
                    state.explosions.push(Explosion::new(cx, cy, ExplosionSize::Large));
                } else {
                    state.explosions.push(Explosion::new(cx, cy, ExplosionSize::Small));
                }
            }
        }
    }
    state.enemies.retain(|e| e.active);
    state.score += gained;
    state.bomb_flash_ms = state.tuning.bomb_flash_ms;
    debug!("bomb detonated, +{gained} points");
}

// ── Reaction challenge ───────────────────────────────────────────────────────

/// Playing → Challenge with a freshly rolled sequence.
pub fn start_challenge(state: &mut GameState, rng: &mut impl Rng) {
    let challenge = ReactionChallenge::generate(rng, state.tuning.challenge_time_limit_ms);
    begin_challenge(state, challenge.sequence);
}

/// Playing → Challenge with a given sequence.
pub fn begin_challenge(state: &mut GameState, sequence: Vec<Direction>) {
    info!("reaction challenge: {sequence:?}");
    state.challenge = Some(ReactionChallenge::new(
        sequence,
        state.tuning.challenge_time_limit_ms,
    ));
    state.mode = GameMode::Challenge;
}

pub fn handle_challenge_input(state: &mut GameState, direction: Direction, rng: &mut impl Rng) {
    let Some(challenge) = state.challenge.as_mut() else { return };
    match challenge.press(direction) {
        ChallengeProgress::Advanced => {}
        ChallengeProgress::Completed => end_challenge(state, true, rng),
        ChallengeProgress::Failed => end_challenge(state, false, rng),
    }
}

/// Challenge → Playing, granting one random power-up on success.
pub fn end_challenge(state: &mut GameState, success: bool, rng: &mut impl Rng) {
    state.challenge = None;
    state.mode = GameMode::Playing;
    state.challenge_timer_ms = state.tuning.challenge_interval_ms;

    let granted = match (success, state.player.as_mut()) {
        (true, Some(player)) => {
            let kind = roll_power_up(rng);
            grant_power_up(player, kind, state.tuning.power_up_duration_ms);
            Some(kind)
        }
        _ => None,
    };

    match granted {
        Some(kind) => info!("challenge complete, granted {kind:?}"),
        None => info!("challenge failed"),
    }
    state.feedback = Some(ChallengeFeedback {
        success,
        granted,
        remaining_ms: state.tuning.challenge_feedback_ms,
    });
}
