//! Preferences that do not affect gameplay
//!
//! Read from a JSON file in the working directory when one exists. Field
//! geometry and speeds are constants and cannot be set here.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::audio::{ClipPlayer, NotificationSink, Silent, TerminalBell};
use crate::predictor::DEFAULT_MODEL_PATH;

/// How pass/collision cues are played
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SoundBackend {
    Off,
    #[default]
    Bell,
    /// External player invoked as `program <clip>`
    Player {
        program: String,
        pass_clip: PathBuf,
        collision_clip: PathBuf,
    },
}

impl SoundBackend {
    pub fn build(&self) -> Box<dyn NotificationSink> {
        match self {
            SoundBackend::Off => Box::new(Silent),
            SoundBackend::Bell => Box::new(TerminalBell),
            SoundBackend::Player {
                program,
                pass_clip,
                collision_clip,
            } => Box::new(ClipPlayer::new(
                program.clone(),
                pass_clip.clone(),
                collision_clip.clone(),
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sound: SoundBackend,
    /// Where predictor parameters are loaded from and saved to
    pub model_path: PathBuf,
    /// Save the predictor every N resolved obstacles (0 = only on exit)
    pub autosave_every: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound: SoundBackend::Bell,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            autosave_every: 100,
        }
    }
}

impl Settings {
    /// Settings file looked up in the working directory
    pub const FILE_NAME: &'static str = "exit_finder_settings.json";

    pub fn load() -> Self {
        Self::load_from(Self::FILE_NAME)
    }

    /// Load settings from `path`, falling back to defaults
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring malformed {}: {e}", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }
}
