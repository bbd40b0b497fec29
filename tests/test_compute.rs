use approx::assert_relative_eq;
use pixel_expedition::actors::grant_power_up;
use pixel_expedition::compute::*;
use pixel_expedition::config::Tuning;
use pixel_expedition::entities::*;
use pixel_expedition::input::Key;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn bounds() -> Bounds {
    Bounds::new(800.0, 600.0)
}

fn playing_state() -> GameState {
    let mut s = init_state(bounds(), Tuning::default());
    start_game(&mut s);
    s
}

fn player(s: &GameState) -> &Player {
    s.player.as_ref().expect("game in progress")
}

// ── init_state & mode transitions ─────────────────────────────────────────────

#[test]
fn init_state_sits_on_menu() {
    let s = init_state(bounds(), Tuning::default());
    assert_eq!(s.mode, GameMode::Menu);
    assert!(s.player.is_none());
    assert!(s.enemies.is_empty());
    assert_eq!(s.score, 0);
    assert_eq!(s.challenge_timer_ms, 15_000.0);
}

#[test]
fn any_key_starts_game_from_menu() {
    let mut rng = seeded_rng();
    let mut s = init_state(bounds(), Tuning::default());
    key_down(&mut s, Key::Other, &mut rng);

    assert_eq!(s.mode, GameMode::Playing);
    let p = player(&s);
    assert_eq!((p.x, p.y), (384.0, 520.0));
    assert_eq!((p.lives, p.bombs), (5, 3));
    // The dismissing key is not held afterwards
    assert!(!s.input.is_held(Key::Other));
}

#[test]
fn escape_toggles_pause() {
    let mut rng = seeded_rng();
    let mut s = playing_state();
    key_down(&mut s, Key::Escape, &mut rng);
    assert_eq!(s.mode, GameMode::Paused);
    key_up(&mut s, Key::Escape);
    key_down(&mut s, Key::Escape, &mut rng);
    assert_eq!(s.mode, GameMode::Playing);
}

#[test]
fn paused_game_is_frozen() {
    let mut rng = seeded_rng();
    let mut s = playing_state();
    s.enemies.push(Enemy::meteor(100.0, 100.0, 2.0, 0.0));
    key_down(&mut s, Key::Escape, &mut rng);
    key_down(&mut s, Key::D, &mut rng);

    let before = (player(&s).x, s.enemies[0].y, s.challenge_timer_ms, s.background_offset);
    for _ in 0..10 {
        tick(&mut s, 100.0, bounds(), &mut rng);
    }
    let after = (player(&s).x, s.enemies[0].y, s.challenge_timer_ms, s.background_offset);
    assert_eq!(before, after);
}

#[test]
fn game_over_any_key_returns_to_menu() {
    let mut rng = seeded_rng();
    let mut s = playing_state();
    game_over(&mut s);
    assert_eq!(s.mode, GameMode::GameOver);
    key_down(&mut s, Key::Space, &mut rng);
    assert_eq!(s.mode, GameMode::Menu);
    key_down(&mut s, Key::Space, &mut rng);
    assert_eq!(s.mode, GameMode::Playing);
    assert_eq!(s.score, 0);
}

#[test]
fn losing_last_life_ends_game() {
    let mut rng = seeded_rng();
    let mut s = playing_state();
    s.score = 40;
    s.player.as_mut().unwrap().lives = 1;
    let (px, py) = (player(&s).x, player(&s).y);
    s.enemies.push(Enemy::meteor(px, py, 1.0, 0.0));

    tick(&mut s, 16.0, bounds(), &mut rng);
    assert_eq!(s.mode, GameMode::GameOver);
    assert_eq!(player(&s).lives, 0);
    assert_eq!(s.score, 40);
}

#[test]
fn restart_resets_everything() {
    let mut rng = seeded_rng();
    let mut s = playing_state();
    for _ in 0..40 {
        tick(&mut s, 250.0, bounds(), &mut rng);
    }
    s.score = 999;
    game_over(&mut s);
    return_to_menu(&mut s);
    start_game(&mut s);

    assert_eq!(s.score, 0);
    assert!(s.enemies.is_empty() && s.bullets.is_empty() && s.explosions.is_empty());
    assert_eq!(s.spawner.meteor_delay_ms, 1_500.0);
    assert_eq!(s.challenge_timer_ms, 15_000.0);
}

// ── tick ──────────────────────────────────────────────────────────────────────

#[test]
fn long_frames_are_clamped() {
    let mut rng = seeded_rng();
    let mut s = playing_state();
    tick(&mut s, 10_000.0, bounds(), &mut rng);
    assert_relative_eq!(s.clock_ms, 250.0);
    assert_relative_eq!(s.challenge_timer_ms, 14_750.0);
}

#[test]
fn negative_delta_is_ignored() {
    let mut rng = seeded_rng();
    let mut s = playing_state();
    tick(&mut s, -50.0, bounds(), &mut rng);
    assert_eq!(s.clock_ms, 0.0);
    assert_eq!(s.challenge_timer_ms, 15_000.0);
}

#[test]
fn held_key_moves_every_tick() {
    let mut rng = seeded_rng();
    let mut s = playing_state();
    key_down(&mut s, Key::D, &mut rng);
    tick(&mut s, 16.0, bounds(), &mut rng);
    tick(&mut s, 16.0, bounds(), &mut rng);
    assert_eq!(player(&s).x, 394.0);

    key_up(&mut s, Key::D);
    tick(&mut s, 16.0, bounds(), &mut rng);
    assert_eq!(player(&s).x, 394.0);
}

#[test]
fn player_stays_in_bounds_under_random_input() {
    let mut rng = seeded_rng();
    let mut keys_rng = StdRng::seed_from_u64(7);
    let keys = [Key::W, Key::A, Key::S, Key::D, Key::ArrowUp, Key::ArrowLeft, Key::Space];
    let mut s = playing_state();

    for _ in 0..2_000 {
        let key = keys[keys_rng.gen_range(0..keys.len())];
        if keys_rng.gen_bool(0.5) {
            key_down(&mut s, key, &mut rng);
        } else {
            key_up(&mut s, key);
        }
        tick(&mut s, 16.0, bounds(), &mut rng);

        if matches!(s.mode, GameMode::Playing | GameMode::Challenge) {
            let p = player(&s);
            assert!((0.0..=768.0).contains(&p.x), "x out of bounds: {}", p.x);
            assert!((0.0..=568.0).contains(&p.y), "y out of bounds: {}", p.y);
        }
    }
}

#[test]
fn space_press_fires_once() {
    let mut rng = seeded_rng();
    let mut s = playing_state();
    key_down(&mut s, Key::Space, &mut rng);
    tick(&mut s, 16.0, bounds(), &mut rng);
    assert_eq!(s.bullets.len(), 1);
    // Held, but no new press: no new shot
    tick(&mut s, 200.0, bounds(), &mut rng);
    assert_eq!(s.bullets.len(), 1);
}

#[test]
fn background_scrolls_and_wraps() {
    let mut rng = seeded_rng();
    let mut s = init_state(Bounds::new(800.0, 3.0), Tuning::default());
    tick(&mut s, 16.0, Bounds::new(800.0, 3.0), &mut rng);
    assert_eq!(s.background_offset, 1.0);
    tick(&mut s, 16.0, Bounds::new(800.0, 3.0), &mut rng);
    tick(&mut s, 16.0, Bounds::new(800.0, 3.0), &mut rng);
    assert_eq!(s.background_offset, 0.0);
}

#[test]
fn tick_adopts_new_viewport() {
    let mut rng = seeded_rng();
    let mut s = playing_state();
    tick(&mut s, 16.0, Bounds::new(200.0, 100.0), &mut rng);
    assert_eq!(s.bounds, Bounds::new(200.0, 100.0));
    let p = player(&s);
    assert!(p.x + p.width <= 200.0 && p.y + p.height <= 100.0);
}

#[test]
fn challenge_starts_after_interval() {
    let mut rng = seeded_rng();
    let mut s = playing_state();
    for _ in 0..59 {
        tick(&mut s, 250.0, bounds(), &mut rng);
    }
    assert_eq!(s.mode, GameMode::Playing);
    tick(&mut s, 250.0, bounds(), &mut rng);
    assert_eq!(s.mode, GameMode::Challenge);
    let c = s.challenge.as_ref().unwrap();
    assert!((3..=5).contains(&c.sequence.len()));
}

#[test]
fn seeded_runs_are_identical() {
    let run = || {
        let mut rng = seeded_rng();
        let mut s = playing_state();
        for i in 0..200 {
            if i % 10 == 0 {
                key_down(&mut s, Key::Space, &mut rng);
            }
            tick(&mut s, 50.0, bounds(), &mut rng);
        }
        (s.score, s.enemies.len(), s.bullets.len(), s.enemy_bullets.len())
    };
    assert_eq!(run(), run());
}

// ── bomb ──────────────────────────────────────────────────────────────────────

#[test]
fn bomb_clears_meteors_and_wounds_skulls() {
    let mut rng = seeded_rng();
    let mut s = playing_state();
    s.enemies.push(Enemy::meteor(100.0, 100.0, 1.0, 0.0));
    s.enemies.push(Enemy::meteor(300.0, 100.0, 1.0, 0.0));
    s.enemies.push(Enemy::skull(500.0, 100.0));
    s.enemy_bullets.push(Bullet::new(10.0, 10.0, 0.0, 3.0, 8.0, 8.0, BulletOwner::Enemy));

    key_down(&mut s, Key::Shift, &mut rng);
    tick(&mut s, 16.0, bounds(), &mut rng);

    assert_eq!(player(&s).bombs, 2);
    assert_eq!(s.score, 20);
    assert_eq!(s.enemies.len(), 1);
    assert!(s.enemies[0].is_skull());
    assert_eq!(s.enemies[0].health, 1);
    assert!(s.enemy_bullets.is_empty());
    assert!(s.bomb_flash_ms > 0.0);
}

#[test]
fn bomb_kills_wounded_skull() {
    let mut s = playing_state();
    let mut skull = Enemy::skull(500.0, 100.0);
    skull.health = 2;
    s.enemies.push(skull);

    detonate_bomb(&mut s);
    assert!(s.enemies.is_empty());
    assert_eq!(s.score, 50);
    assert!(s.explosions.iter().any(|e| e.size == ExplosionSize::Large));
}

#[test]
fn no_bombs_no_blast() {
    let mut rng = seeded_rng();
    let mut s = playing_state();
    s.player.as_mut().unwrap().bombs = 0;
    s.enemies.push(Enemy::meteor(100.0, 100.0, 1.0, 0.0));

    key_down(&mut s, Key::Shift, &mut rng);
    tick(&mut s, 16.0, bounds(), &mut rng);
    assert_eq!(s.enemies.len(), 1);
    assert_eq!(s.bomb_flash_ms, 0.0);
}

#[test]
fn bomb_flash_fades() {
    let mut rng = seeded_rng();
    let mut s = playing_state();
    detonate_bomb(&mut s);
    assert_eq!(s.bomb_flash_ms, 500.0);
    tick(&mut s, 250.0, bounds(), &mut rng);
    tick(&mut s, 250.0, bounds(), &mut rng);
    assert_eq!(s.bomb_flash_ms, 0.0);
}

// ── companions ────────────────────────────────────────────────────────────────

#[test]
fn companions_follow_power_up() {
    let mut rng = seeded_rng();
    let mut s = playing_state();
    grant_power_up(s.player.as_mut().unwrap(), PowerUpKind::Companion, 500.0);

    tick(&mut s, 16.0, bounds(), &mut rng);
    assert_eq!(s.companions.len(), 2);
    // Both wingmen fire on their first tick
    assert_eq!(s.bullets.len(), 2);

    for _ in 0..2 {
        tick(&mut s, 250.0, bounds(), &mut rng);
    }
    assert!(!player(&s).power_ups.companion.active);
    assert!(s.companions.is_empty());
}

#[test]
fn explosions_expire_during_play() {
    let mut rng = seeded_rng();
    let mut s = playing_state();
    s.explosions.push(Explosion::new(100.0, 100.0, ExplosionSize::Normal));
    for _ in 0..3 {
        tick(&mut s, 100.0, bounds(), &mut rng);
    }
    assert_eq!(s.explosions.len(), 1);
    assert_eq!(s.explosions[0].frame, 3);
    tick(&mut s, 100.0, bounds(), &mut rng);
    assert!(s.explosions.is_empty());
}
