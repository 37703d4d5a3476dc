//! One simulation tick
//!
//! Phases run in a fixed order:
//!
//! ```text
//! ADVANCE_OBSTACLES -> CHECK_PASS -> (retire, record, spawn) -> CHECK_COLLISION -> DECIDE -> APPLY_MOTION
//! ```
//!
//! Pacing (the sleep to the frame boundary) belongs to the runner.

use super::collision::collides_with;
use super::controller::{DecisionController, Motion};
use super::state::{SimEvent, SimState};
use crate::error::{SimError, SimResult};
use crate::predictor::Predictor;

/// Advance the simulation by one tick and return the motion that was applied
pub fn tick<P: Predictor + ?Sized>(state: &mut SimState, predictor: &P) -> SimResult<Motion> {
    state.time_ticks += 1;

    state.obstacles.tick();

    if state.obstacles.check_incoming_passed(state.agent.bottom()) {
        resolve_incoming(state)?;
    }

    let (incoming_id, opening_center, hit) = {
        let Some(incoming) = state.obstacles.incoming() else {
            return Err(missing_incoming(state));
        };
        let hit = collides_with(
            &state.agent.bounds(),
            incoming,
            state.config.barrier_thickness,
            state.config.width,
        );
        (incoming.id, incoming.opening_center(), hit)
    };

    if hit && !state.pending_collision {
        state.pending_collision = true;
        state.events.push(SimEvent::CollisionDetected { id: incoming_id });
    }

    let controller = DecisionController::new(&state.config);
    let motion = controller.decide(predictor, opening_center, &state.agent)?;
    state.agent.center.x += motion.dx;

    Ok(motion)
}

/// Retire the incoming obstacle, fold the pending collision into the
/// outcome window and bring in a replacement
fn resolve_incoming(state: &mut SimState) -> SimResult<()> {
    let Some(retired) = state.obstacles.retire_incoming() else {
        return Ok(());
    };

    let passed = !state.pending_collision;
    if !passed {
        state.tracker.on_collision();
    }
    state.tracker.record(passed);
    state.pending_collision = false;
    state.events.push(SimEvent::ObstacleRetired {
        id: retired.id,
        passed,
    });

    let id = state.obstacles.spawn_new()?;
    state.events.push(SimEvent::ObstacleSpawned { id });
    Ok(())
}

/// The stream is refilled on every retirement, so running dry means the
/// field itself is degenerate
fn missing_incoming(state: &SimState) -> SimError {
    SimError::GeometryInconsistency {
        left: 0.0,
        right: 0.0,
        gap: state.config.opening_width,
        width: state.config.width,
    }
}
