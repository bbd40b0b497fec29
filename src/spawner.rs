//! Enemy spawning: two independent accumulators with a meteor difficulty ramp.

use log::debug;
use rand::Rng;

use crate::actors::spawn_meteor;
use crate::config::Tuning;
use crate::constants::{METEOR_SIZE, SKULL_SIZE};
use crate::entities::{Bounds, Enemy};

#[derive(Clone, Debug, PartialEq)]
pub struct Spawner {
    pub meteor_timer_ms: f32,
    /// Current meteor interval; only ever shrinks, never below the floor.
    pub meteor_delay_ms: f32,
    pub skull_timer_ms: f32,
}

impl Spawner {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            meteor_timer_ms: 0.0,
            meteor_delay_ms: tuning.meteor_spawn_delay_ms,
            skull_timer_ms: 0.0,
        }
    }

    /// Advance both timers and return whatever fired this tick.
    ///
    /// Skulls also wait for `score` to reach the gate; their timer keeps
    /// accumulating in the meantime and does not ramp.
    pub fn update(
        &mut self,
        dt_ms: f32,
        score: u32,
        bounds: Bounds,
        tuning: &Tuning,
        rng: &mut impl Rng,
    ) -> Vec<Enemy> {
        let mut spawned = Vec::new();

        self.meteor_timer_ms += dt_ms;
        if self.meteor_timer_ms >= self.meteor_delay_ms {
            self.meteor_timer_ms = 0.0;
            let x = random_x(bounds.width - METEOR_SIZE, rng);
            spawned.push(spawn_meteor(x, -METEOR_SIZE, rng));
            self.meteor_delay_ms = (self.meteor_delay_ms - tuning.meteor_spawn_step_ms)
                .max(tuning.meteor_spawn_floor_ms);
            debug!("meteor spawned at x={x:.0}, next in {:.0}ms", self.meteor_delay_ms);
        }

        self.skull_timer_ms += dt_ms;
        if self.skull_timer_ms >= tuning.skull_spawn_delay_ms && score >= tuning.skull_score_gate {
            self.skull_timer_ms = 0.0;
            let x = random_x(bounds.width - SKULL_SIZE, rng);
            spawned.push(Enemy::skull(x, -SKULL_SIZE));
            debug!("skull spawned at x={x:.0}");
        }

        spawned
    }
}

/// Uniform in `[0, max)`, or 0 when the viewport is narrower than the enemy.
fn random_x(max: f32, rng: &mut impl Rng) -> f32 {
    if max > 0.0 {
        rng.gen_range(0.0..max)
    } else {
        0.0
    }
}
