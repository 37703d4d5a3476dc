//! Errors that reach the simulation loop boundary.
//!
//! Render and notification failures have their own types and are logged
//! where they happen; only these kinds end a run.

use thiserror::Error;

use crate::predictor::PredictorError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(
        "obstacle opening [{left}, {right}] does not fit a {gap} wide gap inside a {width} wide field"
    )]
    GeometryInconsistency {
        left: f32,
        right: f32,
        gap: f32,
        width: f32,
    },

    #[error(
        "obstacle spacing {spacing} cannot lay out a {height} high field (at most {max} obstacles)"
    )]
    ObstacleSpacing { spacing: f32, height: f32, max: usize },

    #[error("predictor failed: {0}")]
    Predictor(#[from] PredictorError),
}

pub type SimResult<T> = Result<T, SimError>;
