/// Cue playback.  There is no mixer in a terminal; loud cues ring the bell
/// when it is enabled and every cue is traced.

use std::io::Write;

use crossterm::{style::Print, QueueableCommand};
use star_fighter::entities::Cue;
use tracing::trace;

pub struct Audio {
    bell: bool,
}

impl Audio {
    pub fn new(bell: bool) -> Self {
        Self { bell }
    }

    /// Play this tick's cues.  At most one bell per tick.
    pub fn play<W: Write>(&self, out: &mut W, cues: &[Cue]) -> std::io::Result<()> {
        for cue in cues {
            trace!(?cue, "cue");
        }
        if self.bell && cues.iter().any(|c| is_loud(*c)) {
            out.queue(Print('\x07'))?;
        }
        Ok(())
    }
}

fn is_loud(cue: Cue) -> bool {
    matches!(
        cue,
        Cue::BombExplosion
            | Cue::PlayerExplosion
            | Cue::BossExplosion
            | Cue::LevelComplete
            | Cue::GameOver
    )
}
