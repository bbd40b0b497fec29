use pixel_expedition::actors::grant_power_up;
use pixel_expedition::collision::*;
use pixel_expedition::compute::*;
use pixel_expedition::config::Tuning;
use pixel_expedition::entities::*;

fn playing_state() -> GameState {
    let mut s = init_state(Bounds::new(800.0, 600.0), Tuning::default());
    start_game(&mut s);
    s
}

fn player_bullet(x: f32, y: f32) -> Bullet {
    Bullet::new(x, y, 0.0, -8.0, 8.0, 16.0, BulletOwner::Player)
}

// ── bullets vs enemies ────────────────────────────────────────────────────────

#[test]
fn bullet_destroys_meteor_and_scores() {
    let mut s = playing_state();
    s.enemies.push(Enemy::meteor(100.0, 100.0, 1.0, 0.0));
    s.bullets.push(player_bullet(105.0, 105.0));

    let report = resolve(&mut s);
    assert_eq!(report.enemies_destroyed, 1);
    assert_eq!(s.score, 10);
    assert!(s.enemies.is_empty());
    assert!(s.bullets.is_empty());
    // Hit spark plus the meteor's own blast
    let sizes: Vec<_> = s.explosions.iter().map(|e| e.size).collect();
    assert_eq!(sizes, vec![ExplosionSize::Small, ExplosionSize::Normal]);
}

#[test]
fn bullet_hits_only_one_enemy() {
    let mut s = playing_state();
    s.enemies.push(Enemy::meteor(100.0, 100.0, 1.0, 0.0));
    s.enemies.push(Enemy::meteor(102.0, 102.0, 1.0, 0.0));
    s.bullets.push(player_bullet(105.0, 105.0));

    let report = resolve(&mut s);
    assert_eq!(report.enemies_hit, 1);
    assert_eq!(s.enemies.len(), 1);
    assert_eq!(s.score, 10);
}

#[test]
fn bullet_hits_newest_overlapping_enemy() {
    let mut s = playing_state();
    s.enemies.push(Enemy::meteor(100.0, 100.0, 1.0, 0.0));
    s.enemies.push(Enemy::meteor(104.0, 104.0, 1.0, 0.0));
    s.bullets.push(player_bullet(106.0, 106.0));

    resolve(&mut s);
    let survivors: Vec<f32> = s.enemies.iter().map(|e| e.x).collect();
    assert_eq!(survivors, vec![100.0]);
}

#[test]
fn skull_survives_until_third_hit() {
    let mut s = playing_state();
    s.enemies.push(Enemy::skull(100.0, 100.0));
    for _ in 0..2 {
        s.bullets.push(player_bullet(110.0, 110.0));
        resolve(&mut s);
    }
    assert_eq!(s.enemies.len(), 1);
    assert_eq!(s.enemies[0].health, 1);
    assert_eq!(s.score, 0);

    s.bullets.push(player_bullet(110.0, 110.0));
    resolve(&mut s);
    assert!(s.enemies.is_empty());
    assert_eq!(s.score, 50);
    assert!(s.explosions.iter().any(|e| e.size == ExplosionSize::Large));
}

#[test]
fn two_bullets_on_one_meteor_score_once() {
    let mut s = playing_state();
    s.enemies.push(Enemy::meteor(100.0, 100.0, 1.0, 0.0));
    s.bullets.push(player_bullet(105.0, 105.0));
    s.bullets.push(player_bullet(106.0, 106.0));

    resolve(&mut s);
    assert_eq!(s.score, 10);
    // The second bullet found nothing alive and flies on
    assert_eq!(s.bullets.len(), 1);
}

#[test]
fn inactive_bullets_are_ignored() {
    let mut s = playing_state();
    s.enemies.push(Enemy::meteor(100.0, 100.0, 1.0, 0.0));
    let mut spent = player_bullet(105.0, 105.0);
    spent.active = false;
    s.bullets.push(spent);

    resolve(&mut s);
    assert_eq!(s.enemies.len(), 1);
    assert!(s.bullets.is_empty());
}

// ── enemies vs player ─────────────────────────────────────────────────────────

#[test]
fn meteor_contact_costs_a_life_and_shatters() {
    let mut s = playing_state();
    let (px, py) = {
        let p = s.player.as_ref().unwrap();
        (p.x, p.y)
    };
    s.enemies.push(Enemy::meteor(px, py, 1.0, 0.0));

    let report = resolve(&mut s);
    assert_eq!(report.player_hits, 1);
    assert_eq!(s.player.as_ref().unwrap().lives, 4);
    assert!(s.enemies.is_empty());
    assert_eq!(s.score, 0);
}

#[test]
fn skull_contact_keeps_skull_alive() {
    let mut s = playing_state();
    let (px, py) = {
        let p = s.player.as_ref().unwrap();
        (p.x, p.y)
    };
    s.enemies.push(Enemy::skull(px, py));

    resolve(&mut s);
    assert_eq!(s.player.as_ref().unwrap().lives, 4);
    assert_eq!(s.enemies.len(), 1);
}

#[test]
fn shield_absorbs_then_next_hit_costs_life() {
    let mut s = playing_state();
    grant_power_up(s.player.as_mut().unwrap(), PowerUpKind::Shield, 10_000.0);
    let (cx, cy) = s.player.as_ref().unwrap().center();

    s.enemy_bullets.push(Bullet::new(cx, cy, 0.0, 3.0, 8.0, 8.0, BulletOwner::Enemy));
    let report = resolve(&mut s);
    assert_eq!(report.shield_absorbs, 1);
    assert_eq!(s.player.as_ref().unwrap().lives, 5);
    assert!(!s.player.as_ref().unwrap().power_ups.shield.active);
    assert!(s.enemy_bullets.is_empty());

    s.enemy_bullets.push(Bullet::new(cx, cy, 0.0, 3.0, 8.0, 8.0, BulletOwner::Enemy));
    let report = resolve(&mut s);
    assert_eq!(report.player_hits, 1);
    assert_eq!(s.player.as_ref().unwrap().lives, 4);
}

#[test]
fn enemy_bullet_far_away_misses() {
    let mut s = playing_state();
    s.enemy_bullets.push(Bullet::new(0.0, 0.0, 0.0, 3.0, 8.0, 8.0, BulletOwner::Enemy));
    let report = resolve(&mut s);
    assert_eq!(report, CombatReport::default());
    assert_eq!(s.enemy_bullets.len(), 1);
}

// ── compaction ────────────────────────────────────────────────────────────────

#[test]
fn compact_drops_inactive_and_finished() {
    let mut s = playing_state();
    let mut dead = Enemy::meteor(0.0, 0.0, 1.0, 0.0);
    dead.active = false;
    s.enemies.push(dead);
    s.enemies.push(Enemy::meteor(50.0, 0.0, 1.0, 0.0));
    let mut done = Explosion::new(0.0, 0.0, ExplosionSize::Small);
    done.finished = true;
    s.explosions.push(done);
    s.explosions.push(Explosion::new(0.0, 0.0, ExplosionSize::Small));

    compact(&mut s);
    assert_eq!(s.enemies.len(), 1);
    assert_eq!(s.explosions.len(), 1);
}
