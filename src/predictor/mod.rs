//! Predictor contract
//!
//! The simulation treats the predictor as an opaque function from a fixed
//! size input vector to a fixed size output vector, plus a save hook that is
//! invoked whenever a run ends.

pub mod net;

use std::io;

use thiserror::Error;

pub use net::{Activation, FeedForwardNet, NetConfig, DEFAULT_MODEL_PATH};

#[derive(Debug, Error)]
pub enum PredictorError {
    #[error("predictor I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("predictor parameters are malformed: {0}")]
    Format(#[from] serde_json::Error),

    #[error("expected {expected} inputs, got {got}")]
    InputShape { expected: usize, got: usize },

    #[error("predictor produced no output")]
    EmptyOutput,

    #[error("predictor produced a non-finite output ({0})")]
    NonFinite(f32),

    #[error("inconsistent network layout: {0}")]
    Layout(String),
}

pub trait Predictor {
    /// Single feed-forward pass
    fn predict(&self, inputs: &[f32]) -> Result<Vec<f32>, PredictorError>;

    /// Persist the current parameters to the predictor's own location
    fn save(&self) -> Result<(), PredictorError>;
}

impl<P: Predictor + ?Sized> Predictor for Box<P> {
    fn predict(&self, inputs: &[f32]) -> Result<Vec<f32>, PredictorError> {
        (**self).predict(inputs)
    }

    fn save(&self) -> Result<(), PredictorError> {
        (**self).save()
    }
}
