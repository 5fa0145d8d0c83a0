/// Persisted top-five table.  One `III,score` line per entry, best first.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::error::ScoreLineError;

pub const MAX_ENTRIES: usize = 5;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreEntry {
    pub initials: String,
    pub score: u32,
}

impl FromStr for ScoreEntry {
    type Err = ScoreLineError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (initials, score) = line
            .trim()
            .split_once(',')
            .ok_or(ScoreLineError::MissingComma)?;
        let initials = initials.trim();
        if initials.len() != 3 || !initials.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ScoreLineError::BadInitials(initials.to_string()));
        }
        let score = score
            .trim()
            .parse::<u32>()
            .map_err(|_| ScoreLineError::BadScore(score.trim().to_string()))?;
        Ok(ScoreEntry {
            initials: initials.to_ascii_uppercase(),
            score,
        })
    }
}

impl fmt::Display for ScoreEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.initials, self.score)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HighScoreTable {
    entries: Vec<ScoreEntry>,
}

impl HighScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn best(&self) -> u32 {
        self.entries.first().map_or(0, |e| e.score)
    }

    /// Parse file contents, skipping lines that do not read as an entry.
    pub fn parse(text: &str) -> Self {
        let mut entries: Vec<ScoreEntry> = text
            .lines()
            .filter(|l| !l.trim().is_empty())
            .filter_map(|l| match l.parse::<ScoreEntry>() {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!(line = l, error = %e, "skipping high-score line");
                    None
                }
            })
            .collect();
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(MAX_ENTRIES);
        Self { entries }
    }

    pub fn to_text(&self) -> String {
        self.entries.iter().map(|e| format!("{e}\n")).collect()
    }

    /// A score earns a place when the table has room or it beats an entry.
    pub fn qualifies(&self, score: u32) -> bool {
        self.entries.len() < MAX_ENTRIES || self.entries.iter().any(|e| score > e.score)
    }

    /// Insert a qualifying score below any equal scores.  Returns the rank
    /// (0 is best) or `None` if it did not make the table or the initials are
    /// not three letters.
    pub fn insert(&mut self, initials: &str, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let entry: ScoreEntry = format!("{initials},{score}").parse().ok()?;
        let rank = self
            .entries
            .iter()
            .position(|e| e.score < score)
            .unwrap_or(self.entries.len());
        self.entries.insert(rank, entry);
        self.entries.truncate(MAX_ENTRIES);
        Some(rank)
    }
}

/// Read the table; a missing or unreadable file is an empty table.
pub fn load(path: &Path) -> HighScoreTable {
    match fs::read_to_string(path) {
        Ok(text) => HighScoreTable::parse(&text),
        Err(e) if e.kind() == io::ErrorKind::NotFound => HighScoreTable::new(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read high scores");
            HighScoreTable::new()
        }
    }
}

/// Write the table through a sibling temp file so a crash never leaves a
/// half-written list.
pub fn save(path: &Path, table: &HighScoreTable) -> io::Result<()> {
    let tmp = path.with_extension("tmp");
    {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(table.to_text().as_bytes())?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)
}
