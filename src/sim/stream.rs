//! Ordered set of on-screen obstacles
//!
//! The front of the queue is always the incoming obstacle: the next one the
//! agent has to clear. Retiring it promotes the next obstacle in line.

use std::collections::VecDeque;

use rand_pcg::Pcg32;

use super::geometry::{Obstacle, ObstacleId, create_obstacle};
use super::state::FieldConfig;
use crate::error::SimResult;

#[derive(Debug)]
pub struct ObstacleStream {
    obstacles: VecDeque<Obstacle>,
    config: FieldConfig,
    rng: Pcg32,
    next_id: ObstacleId,
}

impl ObstacleStream {
    /// Fill the field with obstacles staggered evenly above its top edge
    pub fn staggered(config: &FieldConfig, rng: Pcg32) -> SimResult<Self> {
        config.validate()?;
        let count = config.visible_obstacles();
        let mut stream = Self {
            obstacles: VecDeque::with_capacity(count + 1),
            config: config.clone(),
            rng,
            next_id: 1,
        };
        let spacing = config.height / count as f32;
        for i in 0..count {
            stream.push(-spacing * i as f32)?;
        }
        Ok(stream)
    }

    /// Advance every active obstacle by one tick
    pub fn tick(&mut self) {
        let step = self.config.obstacle_step();
        for obstacle in &mut self.obstacles {
            obstacle.advance(step);
        }
    }

    /// The obstacle the agent must clear next
    pub fn incoming(&self) -> Option<&Obstacle> {
        self.obstacles.front()
    }

    /// Whether the incoming obstacle has fallen `pass_margin` below `agent_bottom_y`
    pub fn check_incoming_passed(&self, agent_bottom_y: f32) -> bool {
        self.incoming()
            .is_some_and(|o| o.vertical_offset > agent_bottom_y + self.config.pass_margin)
    }

    /// Remove the incoming obstacle and promote the next one
    pub fn retire_incoming(&mut self) -> Option<Obstacle> {
        let mut retired = self.obstacles.pop_front()?;
        retired.active = false;
        Some(retired)
    }

    /// Append a new obstacle at the top of the field
    pub fn spawn_new(&mut self) -> SimResult<ObstacleId> {
        self.push(0.0)
    }

    fn push(&mut self, vertical_offset: f32) -> SimResult<ObstacleId> {
        let id = self.next_id;
        let obstacle = create_obstacle(id, vertical_offset, &self.config, &mut self.rng)?;
        self.next_id += 1;
        self.obstacles.push_back(obstacle);
        Ok(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Make a hand-placed obstacle the incoming one
    #[cfg(test)]
    pub(crate) fn push_front_for_test(&mut self, obstacle: Obstacle) {
        self.obstacles.push_front(obstacle);
    }
}
