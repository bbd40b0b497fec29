use pixel_expedition::config::Tuning;
use pixel_expedition::entities::*;
use pixel_expedition::spawner::Spawner;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn bounds() -> Bounds {
    Bounds::new(800.0, 600.0)
}

#[test]
fn first_meteor_after_initial_delay() {
    let tuning = Tuning::default();
    let mut spawner = Spawner::new(&tuning);
    let mut rng = seeded_rng();

    assert!(spawner.update(1_499.0, 0, bounds(), &tuning, &mut rng).is_empty());
    let spawned = spawner.update(1.0, 0, bounds(), &tuning, &mut rng);
    assert_eq!(spawned.len(), 1);

    let m = &spawned[0];
    assert!(m.is_meteor());
    assert_eq!(m.y, -24.0);
    assert!((0.0..776.0).contains(&m.x));
    assert_eq!(spawner.meteor_timer_ms, 0.0);
    assert_eq!(spawner.meteor_delay_ms, 1_490.0);
}

#[test]
fn meteor_delay_ramps_down_to_floor() {
    let tuning = Tuning::default();
    let mut spawner = Spawner::new(&tuning);
    let mut rng = seeded_rng();
    let mut previous = spawner.meteor_delay_ms;

    for _ in 0..200 {
        let delay = spawner.meteor_delay_ms;
        spawner.update(delay, 0, bounds(), &tuning, &mut rng);
        assert!(spawner.meteor_delay_ms <= previous);
        assert!(spawner.meteor_delay_ms >= 500.0);
        previous = spawner.meteor_delay_ms;
    }
    assert_eq!(spawner.meteor_delay_ms, 500.0);
}

#[test]
fn skulls_gated_by_score() {
    let tuning = Tuning::default();
    let mut spawner = Spawner::new(&tuning);
    let mut rng = seeded_rng();

    let spawned = spawner.update(8_000.0, 99, bounds(), &tuning, &mut rng);
    assert!(spawned.iter().all(|e| e.is_meteor()));
    // The timer kept running while gated
    assert_eq!(spawner.skull_timer_ms, 8_000.0);

    let spawned = spawner.update(16.0, 100, bounds(), &tuning, &mut rng);
    let skulls: Vec<_> = spawned.iter().filter(|e| e.is_skull()).collect();
    assert_eq!(skulls.len(), 1);
    assert_eq!(skulls[0].y, -32.0);
    assert!((0.0..768.0).contains(&skulls[0].x));
    assert_eq!(spawner.skull_timer_ms, 0.0);
}

#[test]
fn skull_interval_does_not_ramp() {
    let tuning = Tuning::default();
    let mut spawner = Spawner::new(&tuning);
    let mut rng = seeded_rng();

    for _ in 0..3 {
        let spawned = spawner.update(8_000.0, 500, bounds(), &tuning, &mut rng);
        assert_eq!(spawned.iter().filter(|e| e.is_skull()).count(), 1);
    }
}

#[test]
fn narrow_viewport_spawns_at_left_edge() {
    let tuning = Tuning::default();
    let mut spawner = Spawner::new(&tuning);
    let mut rng = seeded_rng();

    let spawned = spawner.update(1_500.0, 0, Bounds::new(10.0, 600.0), &tuning, &mut rng);
    assert_eq!(spawned[0].x, 0.0);
}

#[test]
fn custom_tuning_is_respected() {
    let tuning = Tuning {
        meteor_spawn_delay_ms: 100.0,
        meteor_spawn_floor_ms: 90.0,
        meteor_spawn_step_ms: 50.0,
        ..Tuning::default()
    };
    let mut spawner = Spawner::new(&tuning);
    let mut rng = seeded_rng();

    assert_eq!(spawner.update(100.0, 0, bounds(), &tuning, &mut rng).len(), 1);
    assert_eq!(spawner.meteor_delay_ms, 90.0);
}
