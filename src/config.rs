/// Runtime settings read from a TOML file.
///
/// Every key is optional; anything missing keeps its default, and a missing
/// file is the same as an empty one.  The file is `$STAR_FIGHTER_CONFIG` if
/// set, otherwise `star_fighter.toml` in the working directory.
///
/// ```toml
/// tick_rate_hz = 60
/// starting_lives = 3
/// high_score_path = "/home/me/.star_fighter_scores"
/// log_file = "star_fighter.log"
/// bell = true
/// ```
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::compute::DEFAULT_LIVES;
use crate::error::ConfigError;

pub const CONFIG_ENV: &str = "STAR_FIGHTER_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "star_fighter.toml";
pub const DEFAULT_TICK_RATE: u32 = 60;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub tick_rate_hz: u32,
    pub starting_lives: u32,
    pub high_score_path: PathBuf,
    /// Tracing output goes here; no file means no logging.
    pub log_file: Option<PathBuf>,
    /// Ring the terminal bell for loud cues.
    pub bell: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: DEFAULT_TICK_RATE,
            starting_lives: DEFAULT_LIVES,
            high_score_path: default_high_score_path(),
            log_file: None,
            bell: false,
        }
    }
}

fn default_high_score_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".star_fighter_scores")
}

impl GameConfig {
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `path`; a file that does not exist yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(text) => Self::parse(&text, path),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load_from(&path)
    }

    /// Wall-clock length of one tick.
    pub fn frame_duration(&self) -> Duration {
        Duration::from_micros(1_000_000 / u64::from(self.tick_rate_hz.max(1)))
    }
}
