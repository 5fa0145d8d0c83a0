use std::path::{Path, PathBuf};
use std::time::Duration;

use star_fighter::config::{GameConfig, DEFAULT_TICK_RATE};
use star_fighter::error::ConfigError;

use pretty_assertions::assert_eq;
use tempfile::tempdir;

#[test]
fn missing_file_gives_defaults() {
    let dir = tempdir().expect("tempdir");
    let cfg = GameConfig::load_from(&dir.path().join("absent.toml")).expect("defaults");
    assert_eq!(cfg, GameConfig::default());
    assert_eq!(cfg.tick_rate_hz, DEFAULT_TICK_RATE);
    assert_eq!(cfg.starting_lives, 3);
    assert_eq!(cfg.log_file, None);
    assert!(!cfg.bell);
}

#[test]
fn partial_file_keeps_other_defaults() {
    let cfg = GameConfig::parse("starting_lives = 5\nbell = true\n", Path::new("t.toml"))
        .expect("parse");
    assert_eq!(cfg.starting_lives, 5);
    assert!(cfg.bell);
    assert_eq!(cfg.tick_rate_hz, DEFAULT_TICK_RATE);
    assert_eq!(cfg.high_score_path, GameConfig::default().high_score_path);
}

#[test]
fn paths_are_read_from_file() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("star_fighter.toml");
    std::fs::write(
        &path,
        "high_score_path = \"/tmp/scores\"\nlog_file = \"game.log\"\ntick_rate_hz = 30\n",
    )
    .expect("write");
    let cfg = GameConfig::load_from(&path).expect("load");
    assert_eq!(cfg.high_score_path, PathBuf::from("/tmp/scores"));
    assert_eq!(cfg.log_file, Some(PathBuf::from("game.log")));
    assert_eq!(cfg.tick_rate_hz, 30);
}

#[test]
fn malformed_file_is_parse_error() {
    let err = GameConfig::parse("starting_lives = \"many\"", Path::new("bad.toml"))
        .expect_err("should fail");
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("bad.toml"));
}

#[test]
fn frame_duration_from_tick_rate() {
    let cfg = GameConfig::default();
    assert_eq!(cfg.frame_duration(), Duration::from_micros(16_666));

    let zero = GameConfig {
        tick_rate_hz: 0,
        ..GameConfig::default()
    };
    assert_eq!(zero.frame_duration(), Duration::from_secs(1));
}
