//! Simulation module
//!
//! All control logic lives here, operating on plain numeric state:
//! - Obstacles fall at a fixed speed and are retired once past the agent
//! - Collisions are recorded when detected and resolved at the next pass
//! - The agent's motion comes from the predictor, clipped and kept in the field
//! - Only the runner touches surfaces, sounds, clocks and the filesystem

pub mod collision;
pub mod controller;
pub mod geometry;
pub mod pacer;
pub mod runner;
pub mod state;
pub mod stream;
pub mod tick;
pub mod tracker;

pub use collision::{collides_left, collides_right, collides_with};
pub use controller::{DecisionController, Motion, clip_unit};
pub use geometry::{Aabb, Obstacle, ObstacleId, create_obstacle};
pub use pacer::FramePacer;
pub use runner::Simulation;
pub use state::{Agent, FieldConfig, SimEvent, SimState};
pub use stream::ObstacleStream;
pub use tick::tick;
pub use tracker::OutcomeTracker;
