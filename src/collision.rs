//! Combat resolution, run once per simulated frame after every actor moved.
//!
//! Hits only flip `active` flags; nothing is removed until the final
//! compaction at the end of [`resolve`].

use crate::actors::{damage_enemy, damage_player, DamageOutcome};
use crate::compute::GameState;
use crate::entities::{Explosion, ExplosionSize};

/// What one resolution pass did, for logging and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CombatReport {
    pub enemies_hit: u32,
    pub enemies_destroyed: u32,
    pub score_gained: u32,
    pub player_hits: u32,
    pub shield_absorbs: u32,
}

pub fn resolve(state: &mut GameState) -> CombatReport {
    let mut report = CombatReport::default();

    bullets_vs_enemies(state, &mut report);
    enemies_vs_player(state, &mut report);
    enemy_bullets_vs_player(state, &mut report);

    state.score += report.score_gained;
    compact(state);
    report
}

/// Drop every inactive entity.  The only place entities leave a collection.
pub fn compact(state: &mut GameState) {
    state.bullets.retain(|b| b.active);
    state.enemies.retain(|e| e.active);
    state.enemy_bullets.retain(|b| b.active);
    state.explosions.retain(|e| !e.finished);
}

// ── 1. Player bullets ↔ enemies ──────────────────────────────────────────────

fn bullets_vs_enemies(state: &mut GameState, report: &mut CombatReport) {
    for bullet in state.bullets.iter_mut().filter(|b| b.active) {
        let hit = state
            .enemies
            .iter_mut()
            .rev()
            .filter(|e| e.active)
            .find(|e| e.rect().overlaps(&bullet.rect()));
        // One enemy per bullet, newest first.
        let Some(enemy) = hit else { continue };

        bullet.active = false;
        report.enemies_hit += 1;
        let (cx, cy) = enemy.center();
        state.explosions.push(Explosion::new(cx, cy, ExplosionSize::Small));

        if damage_enemy(enemy, 1) {
            report.enemies_destroyed += 1;
            report.score_gained += enemy.score_value;
            let size = if enemy.is_skull() { ExplosionSize::Large } else { ExplosionSize::Normal };
            state.explosions.push(Explosion::new(cx, cy, size));
        }
    }
}

// ── 2. Enemies ↔ player ──────────────────────────────────────────────────────

fn enemies_vs_player(state: &mut GameState, report: &mut CombatReport) {
    let Some(player) = state.player.as_mut() else { return };

    for enemy in state.enemies.iter_mut().filter(|e| e.active) {
        if !enemy.rect().overlaps(&player.rect()) {
            continue;
        }
        match damage_player(player) {
            DamageOutcome::Damaged => {
                report.player_hits += 1;
                let (px, py) = player.center();
                state.explosions.push(Explosion::new(px, py, ExplosionSize::Normal));
            }
            DamageOutcome::Absorbed => report.shield_absorbs += 1,
        }

        // Meteors shatter on contact; skulls keep grinding.
        if enemy.is_meteor() {
            enemy.active = false;
            let (cx, cy) = enemy.center();
            state.explosions.push(Explosion::new(cx, cy, ExplosionSize::Normal));
        }
    }
}

// ── 3. Enemy bullets ↔ player ────────────────────────────────────────────────

fn enemy_bullets_vs_player(state: &mut GameState, report: &mut CombatReport) {
    let Some(player) = state.player.as_mut() else { return };

    for bullet in state.enemy_bullets.iter_mut().filter(|b| b.active) {
        if !bullet.rect().overlaps(&player.rect()) {
            continue;
        }
        bullet.active = false;
        match damage_player(player) {
            DamageOutcome::Damaged => {
                report.player_hits += 1;
                let (px, py) = player.center();
                state.explosions.push(Explosion::new(px, py, ExplosionSize::Small));
            }
            DamageOutcome::Absorbed => report.shield_absorbs += 1,
        }
    }
}
