use std::io::Write;
use std::path::Path;

use pixel_expedition::config::*;
use pixel_expedition::render::SpriteKey;

#[test]
fn defaults_match_game_constants() {
    let c = GameConfig::default();
    assert_eq!(c.gameplay.meteor_spawn_delay_ms, 1_500.0);
    assert_eq!(c.gameplay.meteor_spawn_floor_ms, 500.0);
    assert_eq!(c.gameplay.skull_score_gate, 100);
    assert_eq!(c.gameplay.challenge_interval_ms, 15_000.0);
    assert_eq!(c.gameplay.max_frame_ms, 250.0);
    assert_eq!(c.display.frame_ms, 16);
    assert_eq!(c.log.level, "info");
    assert!(c.assets.missing.is_empty() && c.assets.broken.is_empty());
}

#[test]
fn empty_file_is_all_defaults() {
    let c = GameConfig::from_toml_str("", Path::new("empty.toml")).unwrap();
    assert_eq!(c.gameplay, Tuning::default());
    assert_eq!(c.display, DisplayConfig::default());
}

#[test]
fn partial_file_overrides_only_given_keys() {
    let text = r#"
        [gameplay]
        skull_score_gate = 0
        challenge_interval_ms = 5000.0

        [display]
        cell_height = 12.0

        [assets]
        broken = ["player_ship", "explosion_frame_2"]
    "#;
    let c = GameConfig::from_toml_str(text, Path::new("partial.toml")).unwrap();
    assert_eq!(c.gameplay.skull_score_gate, 0);
    assert_eq!(c.gameplay.challenge_interval_ms, 5_000.0);
    assert_eq!(c.gameplay.meteor_spawn_delay_ms, 1_500.0);
    assert_eq!(c.display.cell_height, 12.0);
    assert_eq!(c.display.cell_width, 8.0);
    assert_eq!(c.assets.broken, vec![SpriteKey::PlayerShip, SpriteKey::ExplosionFrame2]);
}

#[test]
fn unknown_sprite_is_a_parse_error() {
    let err = GameConfig::from_toml_str("[assets]\nmissing = [\"ufo\"]", Path::new("bad.toml"))
        .unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("bad.toml"));
}

#[test]
fn wrong_type_is_a_parse_error() {
    let toml = "[gameplay]\nskull_score_gate = \"lots\"";
    let err = GameConfig::from_toml_str(toml, Path::new("x.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn load_reads_file_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[log]\nlevel = \"debug\"\nfile = \"game.log\"").unwrap();

    let c = GameConfig::load(file.path()).unwrap();
    assert_eq!(c.log.level, "debug");
    assert_eq!(c.log.file, Path::new("game.log"));
}

#[test]
fn load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = GameConfig::load(&dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn load_or_default_tolerates_absence() {
    let dir = tempfile::tempdir().unwrap();
    let c = GameConfig::load_or_default(Some(&dir.path().join("nope.toml"))).unwrap();
    assert_eq!(c.gameplay, Tuning::default());
    assert_eq!(GameConfig::load_or_default(None).unwrap().display.frame_ms, 16);
}

#[test]
fn load_or_default_still_reports_bad_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "[gameplay\n").unwrap();
    assert!(GameConfig::load_or_default(Some(&path)).is_err());
}
