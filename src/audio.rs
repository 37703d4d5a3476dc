//! Pass/collision cues
//!
//! Every sink is fire-and-forget: it must return quickly, and its errors are
//! logged by the caller and never stop the simulation.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

use thiserror::Error;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Obstacle cleared
    Pass,
    /// Obstacle resolved with a collision
    Collision,
}

impl SoundEffect {
    pub fn for_outcome(passed: bool) -> Self {
        if passed {
            SoundEffect::Pass
        } else {
            SoundEffect::Collision
        }
    }
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("could not play cue: {0}")]
    Io(#[from] io::Error),
}

pub trait NotificationSink {
    fn notify(&mut self, effect: SoundEffect) -> Result<(), NotifyError>;
}

/// Plays nothing
#[derive(Debug, Default)]
pub struct Silent;

impl NotificationSink for Silent {
    fn notify(&mut self, _effect: SoundEffect) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Terminal cues on stderr: one bell for a pass, a triple bell for a collision
#[derive(Debug, Default)]
pub struct TerminalBell;

impl TerminalBell {
    pub fn cue(effect: SoundEffect) -> &'static [u8] {
        match effect {
            SoundEffect::Pass => b"\x07",
            SoundEffect::Collision => b"\x07\x07\x07",
        }
    }
}

impl NotificationSink for TerminalBell {
    fn notify(&mut self, effect: SoundEffect) -> Result<(), NotifyError> {
        let mut stderr = io::stderr().lock();
        stderr.write_all(Self::cue(effect))?;
        stderr.flush()?;
        Ok(())
    }
}

/// Plays a wav clip through an external player without waiting for it
#[derive(Debug)]
pub struct ClipPlayer {
    program: String,
    pass_clip: PathBuf,
    collision_clip: PathBuf,
    playing: Vec<Child>,
}

impl ClipPlayer {
    pub fn new(
        program: impl Into<String>,
        pass_clip: impl Into<PathBuf>,
        collision_clip: impl Into<PathBuf>,
    ) -> Self {
        Self {
            program: program.into(),
            pass_clip: pass_clip.into(),
            collision_clip: collision_clip.into(),
            playing: Vec::new(),
        }
    }

    /// Players still running
    pub fn playing(&self) -> usize {
        self.playing.len()
    }

    /// Drop handles of players that have exited
    fn reap(&mut self) {
        self.playing.retain_mut(|child| matches!(child.try_wait(), Ok(None)));
    }
}

impl NotificationSink for ClipPlayer {
    fn notify(&mut self, effect: SoundEffect) -> Result<(), NotifyError> {
        self.reap();
        let clip = match effect {
            SoundEffect::Pass => &self.pass_clip,
            SoundEffect::Collision => &self.collision_clip,
        };
        let child = Command::new(&self.program)
            .arg(clip)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        self.playing.push(child);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_for_outcome() {
        assert_eq!(SoundEffect::for_outcome(true), SoundEffect::Pass);
        assert_eq!(SoundEffect::for_outcome(false), SoundEffect::Collision);
    }

    #[test]
    fn test_bell_cues_differ_by_outcome() {
        let pass = TerminalBell::cue(SoundEffect::Pass);
        let collision = TerminalBell::cue(SoundEffect::Collision);
        assert!(!pass.is_empty());
        assert_ne!(pass, collision);
        assert!(collision.iter().all(|&b| b == 0x07));
    }

    #[test]
    fn test_silent_and_bell_succeed() {
        assert!(Silent.notify(SoundEffect::Collision).is_ok());
        assert!(TerminalBell.notify(SoundEffect::Pass).is_ok());
    }

    #[test]
    fn test_missing_player_reports_error() {
        let mut player = ClipPlayer::new(
            "exit-finder-no-such-player",
            "sounds/correct.wav",
            "sounds/wrong.wav",
        );
        assert!(matches!(
            player.notify(SoundEffect::Pass),
            Err(NotifyError::Io(_))
        ));
        assert_eq!(player.playing(), 0);
    }
}
