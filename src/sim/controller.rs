//! Turns predictor output into a bounded horizontal motion step

use serde::{Deserialize, Serialize};

use super::state::{Agent, FieldConfig};
use crate::predictor::{Predictor, PredictorError};

/// Clip to `[-1, 1]`; values inside the range pass through unchanged
#[inline]
pub fn clip_unit(value: f32) -> f32 {
    if value > 1.0 {
        1.0
    } else if value < -1.0 {
        -1.0
    } else {
        value
    }
}

/// One decision, from raw prediction to applied displacement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    /// Raw predictor output
    pub predicted: f32,
    /// Prediction clipped to `[-1, 1]`
    pub clamped: f32,
    /// Step actually applied (the clamped value or the edge nudge)
    pub step: f32,
    /// Horizontal displacement in field units
    pub dx: f32,
    /// Whether the edge policy overrode the prediction
    pub nudged: bool,
}

#[derive(Debug, Clone)]
pub struct DecisionController {
    field_width: f32,
    /// Field units per unit step, already scaled by the game speed
    unit_dx: f32,
    nudge: f32,
}

impl DecisionController {
    pub fn new(config: &FieldConfig) -> Self {
        Self {
            field_width: config.width,
            unit_dx: config.agent_step(),
            nudge: config.edge_nudge,
        }
    }

    /// Query the predictor and clip its first output
    ///
    /// Inputs are the opening center and the agent center, both divided by
    /// the field width.
    pub fn predict<P: Predictor + ?Sized>(
        &self,
        predictor: &P,
        opening_center_x: f32,
        agent_center_x: f32,
    ) -> Result<(f32, f32), PredictorError> {
        let inputs = [
            opening_center_x / self.field_width,
            agent_center_x / self.field_width,
        ];
        let outputs = predictor.predict(&inputs)?;
        let predicted = *outputs.first().ok_or(PredictorError::EmptyOutput)?;
        if !predicted.is_finite() {
            return Err(PredictorError::NonFinite(predicted));
        }
        Ok((predicted, clip_unit(predicted)))
    }

    /// Replace a step that would push the agent past either field edge with
    /// an inward nudge
    pub fn bound(&self, agent: &Agent, step: f32) -> (f32, bool) {
        let next_x = agent.center.x + step * self.unit_dx;
        if next_x + agent.half_length() > self.field_width {
            (-self.nudge, true)
        } else if next_x - agent.half_length() < 0.0 {
            (self.nudge, true)
        } else {
            (step, false)
        }
    }

    /// Full decision for the current sensed state
    pub fn decide<P: Predictor + ?Sized>(
        &self,
        predictor: &P,
        opening_center_x: f32,
        agent: &Agent,
    ) -> Result<Motion, PredictorError> {
        let (predicted, clamped) = self.predict(predictor, opening_center_x, agent.center.x)?;
        let (step, nudged) = self.bound(agent, clamped);
        Ok(Motion {
            predicted,
            clamped,
            step,
            dx: step * self.unit_dx,
            nudged,
        })
    }
}
