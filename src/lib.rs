//! Exit Finder - a box that steers itself through falling gaps
//!
//! Core modules:
//! - `sim`: Simulation (obstacles, collisions, decisions, outcome tracking)
//! - `predictor`: Feed-forward predictor contract and the bundled network
//! - `render`: Render surface abstraction and the state projector
//! - `audio`: Pass/collision notification sinks
//! - `settings`: Non-gameplay preferences (sound, model path, autosave)

pub mod audio;
pub mod error;
pub mod predictor;
pub mod render;
pub mod settings;
pub mod sim;

pub use error::{SimError, SimResult};
pub use settings::{Settings, SoundBackend};

/// Simulation constants
pub mod consts {
    /// Field dimensions
    pub const CANVAS_WIDTH: f32 = 600.0;
    pub const CANVAS_HEIGHT: f32 = 500.0;

    /// Target tick rate
    pub const FPS: u32 = 60;
    /// Global speed multiplier applied to every movement delta
    pub const GAME_SPEED: f32 = 1.75;

    /// Agent (box) defaults
    pub const BOX_LENGTH: f32 = 40.0;
    pub const BOX_SPEED: f32 = 2.75 * GAME_SPEED;
    /// Agent center sits at this fraction of the field height
    pub const AGENT_Y_FRACTION: f32 = 0.9;
    /// Inward step used instead of the prediction at the field edges
    pub const EDGE_NUDGE: f32 = 0.1;

    /// Obstacle defaults
    pub const OPENING_WIDTH: f32 = 100.0;
    pub const BARRIER_THICKNESS: f32 = 5.0;
    pub const OBSTACLE_SPEED: f32 = 1.0 * GAME_SPEED;
    /// Field height per concurrently visible obstacle (3 on a 500 high field)
    pub const OBSTACLE_SPACING: f32 = 166.0;
    /// How far below the agent's bottom edge an obstacle must be to count as passed
    pub const PASS_MARGIN: f32 = 10.0;
    /// Upper bound on concurrently visible obstacles
    pub const MAX_VISIBLE_OBSTACLES: usize = 64;

    /// Rolling outcome window length
    pub const OUTCOME_WINDOW: usize = 100;
}
