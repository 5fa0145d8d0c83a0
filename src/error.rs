/// Error types for the fallible edges of the game: configuration and the
/// high-score file.  The simulation itself cannot fail.
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Failure to read or parse the configuration file.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "cannot read config {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "invalid config {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

/// One malformed line in the high-score file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreLineError {
    /// No `,` between initials and score.
    MissingComma,
    /// Initials were not exactly three ASCII letters.
    BadInitials(String),
    BadScore(String),
}

impl fmt::Display for ScoreLineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreLineError::MissingComma => write!(f, "expected `III,score`"),
            ScoreLineError::BadInitials(s) => write!(f, "bad initials {s:?}"),
            ScoreLineError::BadScore(s) => write!(f, "bad score {s:?}"),
        }
    }
}

impl std::error::Error for ScoreLineError {}
