//! Mirrors simulation state onto a render surface
//!
//! Each sync diffs the state against the handles created so far: new
//! obstacles get two barrier lines, retired ones have theirs deleted and
//! everything else is moved by the change since the previous sync. Surface
//! failures are logged and skipped; the next sync retries.

use std::collections::BTreeMap;

use glam::Vec2;

use super::{RenderError, RenderSurface, ShapeHandle};
use crate::sim::geometry::{Obstacle, ObstacleId};
use crate::sim::state::SimState;

#[derive(Debug, Clone, Copy)]
struct Barriers {
    left: ShapeHandle,
    right: ShapeHandle,
    last_y: f32,
}

#[derive(Debug, Default)]
pub struct SceneProjector {
    agent: Option<(ShapeHandle, f32)>,
    barriers: BTreeMap<ObstacleId, Barriers>,
}

impl SceneProjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of obstacles currently drawn
    pub fn drawn_obstacles(&self) -> usize {
        self.barriers.len()
    }

    pub fn agent_handle(&self) -> Option<ShapeHandle> {
        self.agent.map(|(handle, _)| handle)
    }

    pub fn sync<S: RenderSurface + ?Sized>(&mut self, state: &SimState, surface: &mut S) {
        self.sync_agent(state, surface);

        let retired: Vec<ObstacleId> = self
            .barriers
            .keys()
            .copied()
            .filter(|id| !state.obstacles.iter().any(|o| o.id == *id))
            .collect();
        for id in retired {
            if let Some(barriers) = self.barriers.remove(&id) {
                warn_on_err(surface.delete(barriers.left));
                warn_on_err(surface.delete(barriers.right));
            }
        }

        let thickness = state.config.barrier_thickness;
        let width = state.config.width;
        for obstacle in state.obstacles.iter() {
            match self.barriers.get_mut(&obstacle.id) {
                Some(barriers) => {
                    let dy = obstacle.vertical_offset - barriers.last_y;
                    if dy != 0.0 {
                        warn_on_err(surface.move_shape(barriers.left, 0.0, dy));
                        warn_on_err(surface.move_shape(barriers.right, 0.0, dy));
                        barriers.last_y = obstacle.vertical_offset;
                    }
                }
                None => {
                    if let Some(barriers) = draw_obstacle(obstacle, thickness, width, surface) {
                        self.barriers.insert(obstacle.id, barriers);
                    }
                }
            }
        }
    }

    fn sync_agent<S: RenderSurface + ?Sized>(&mut self, state: &SimState, surface: &mut S) {
        let x = state.agent.center.x;
        match self.agent {
            Some((handle, last_x)) => {
                let dx = x - last_x;
                if dx != 0.0 && warn_on_err(surface.move_shape(handle, dx, 0.0)).is_some() {
                    self.agent = Some((handle, x));
                }
            }
            None => {
                self.agent = warn_on_err(surface.create_rect(state.agent.bounds()))
                    .map(|handle| (handle, x));
            }
        }
    }
}

fn draw_obstacle<S: RenderSurface + ?Sized>(
    obstacle: &Obstacle,
    thickness: f32,
    width: f32,
    surface: &mut S,
) -> Option<Barriers> {
    let y = obstacle.vertical_offset;
    let left = warn_on_err(surface.create_line(
        Vec2::new(0.0, y),
        Vec2::new(obstacle.opening_left, y),
        thickness,
    ))?;
    let right = match warn_on_err(surface.create_line(
        Vec2::new(obstacle.opening_right, y),
        Vec2::new(width, y),
        thickness,
    )) {
        Some(handle) => handle,
        None => {
            warn_on_err(surface.delete(left));
            return None;
        }
    };
    Some(Barriers {
        left,
        right,
        last_y: y,
    })
}

fn warn_on_err<T>(result: Result<T, RenderError>) -> Option<T> {
    result
        .map_err(|e| log::warn!("Render error: {e}"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::{Predictor, PredictorError};
    use crate::render::HeadlessSurface;
    use crate::sim::geometry::Aabb;
    use crate::sim::tick;

    struct Right;

    impl Predictor for Right {
        fn predict(&self, _inputs: &[f32]) -> Result<Vec<f32>, PredictorError> {
            Ok(vec![0.5])
        }

        fn save(&self) -> Result<(), PredictorError> {
            Ok(())
        }
    }

    /// Accepts nothing
    struct Unplugged;

    impl RenderSurface for Unplugged {
        fn create_rect(&mut self, _bounds: Aabb) -> Result<ShapeHandle, RenderError> {
            Err(RenderError::Unavailable("unplugged".to_string()))
        }

        fn create_line(
            &mut self,
            _from: Vec2,
            _to: Vec2,
            _thickness: f32,
        ) -> Result<ShapeHandle, RenderError> {
            Err(RenderError::Unavailable("unplugged".to_string()))
        }

        fn move_shape(
            &mut self,
            handle: ShapeHandle,
            _dx: f32,
            _dy: f32,
        ) -> Result<(), RenderError> {
            Err(RenderError::UnknownHandle(handle))
        }

        fn bbox(&self, handle: ShapeHandle) -> Result<Aabb, RenderError> {
            Err(RenderError::UnknownHandle(handle))
        }

        fn delete(&mut self, handle: ShapeHandle) -> Result<(), RenderError> {
            Err(RenderError::UnknownHandle(handle))
        }
    }

    #[test]
    fn test_projection_matches_state() {
        let mut state = SimState::new(21).unwrap();
        let mut surface = HeadlessSurface::new();
        let mut projector = SceneProjector::new();

        projector.sync(&state, &mut surface);
        assert_eq!(surface.len(), 1 + 2 * 3);

        for _ in 0..200 {
            tick(&mut state, &Right).unwrap();
            projector.sync(&state, &mut surface);
        }
        // At least one obstacle was retired and replaced by now
        assert!(state.tracker.seen_count() >= 1);
        assert_eq!(projector.drawn_obstacles(), state.obstacles.len());
        assert_eq!(surface.len(), 1 + 2 * state.obstacles.len());

        let agent = surface.bbox(projector.agent_handle().unwrap()).unwrap();
        let expected = state.agent.bounds();
        assert!((agent.min.x - expected.min.x).abs() < 1e-2);
        assert!((agent.max.y - expected.max.y).abs() < 1e-4);

        let thickness = state.config.barrier_thickness;
        for obstacle in state.obstacles.iter() {
            let barriers = projector.barriers[&obstacle.id];
            let drawn = surface.bbox(barriers.left).unwrap();
            let expected = obstacle.left_barrier(thickness);
            assert!((drawn.min.y - expected.min.y).abs() < 1e-2);
            assert_eq!(drawn.max.x, expected.max.x);
        }
    }

    #[test]
    fn test_broken_surface_is_not_fatal() {
        let mut state = SimState::new(4).unwrap();
        let mut projector = SceneProjector::new();
        let mut surface = Unplugged;
        for _ in 0..10 {
            tick(&mut state, &Right).unwrap();
            projector.sync(&state, &mut surface);
        }
        assert_eq!(projector.drawn_obstacles(), 0);
        assert!(projector.agent_handle().is_none());
    }
}
