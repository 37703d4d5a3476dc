//! Rolling pass/collide window and lifetime counters

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeTracker {
    /// 1 = passed cleanly, 0 = collided; oldest on the left
    window: VecDeque<u8>,
    collision_count: u64,
    seen_count: u64,
}

impl OutcomeTracker {
    /// Window primed with `size` collisions, so a fresh run reports 100% error
    pub fn new(size: usize) -> Self {
        Self {
            window: std::iter::repeat_n(0, size.max(1)).collect(),
            collision_count: 0,
            seen_count: 0,
        }
    }

    /// Drop the oldest outcome and append this one
    pub fn record(&mut self, passed: bool) {
        self.window.pop_front();
        self.window.push_back(u8::from(passed));
        self.seen_count += 1;
    }

    /// Percentage of collisions in the window, in `[0, 100]`
    pub fn error_rate(&self) -> f32 {
        let passed: u32 = self.window.iter().map(|&v| u32::from(v)).sum();
        let mean = passed as f32 / self.window.len() as f32;
        (1.0 - mean) * 100.0
    }

    pub fn on_collision(&mut self) {
        self.collision_count += 1;
    }

    pub fn collision_count(&self) -> u64 {
        self.collision_count
    }

    pub fn seen_count(&self) -> u64 {
        self.seen_count
    }

    pub fn window(&self) -> &VecDeque<u8> {
        &self.window
    }
}
