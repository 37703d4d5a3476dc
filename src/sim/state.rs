//! Simulation context and core types
//!
//! All mutable simulation state lives in [`SimState`], which is handed to
//! every operation explicitly. Nothing here touches a render surface.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::{Aabb, ObstacleId};
use super::stream::ObstacleStream;
use super::tracker::OutcomeTracker;
use crate::consts::*;
use crate::error::{SimError, SimResult};

/// Field and motion parameters, fixed for the lifetime of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    pub width: f32,
    pub height: f32,
    pub fps: u32,
    /// Multiplier applied to every movement delta
    pub game_speed: f32,
    pub box_length: f32,
    pub box_speed: f32,
    pub agent_y_fraction: f32,
    pub edge_nudge: f32,
    pub opening_width: f32,
    pub barrier_thickness: f32,
    pub obstacle_speed: f32,
    pub obstacle_spacing: f32,
    pub pass_margin: f32,
    pub outcome_window: usize,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            fps: FPS,
            game_speed: GAME_SPEED,
            box_length: BOX_LENGTH,
            box_speed: BOX_SPEED,
            agent_y_fraction: AGENT_Y_FRACTION,
            edge_nudge: EDGE_NUDGE,
            opening_width: OPENING_WIDTH,
            barrier_thickness: BARRIER_THICKNESS,
            obstacle_speed: OBSTACLE_SPEED,
            obstacle_spacing: OBSTACLE_SPACING,
            pass_margin: PASS_MARGIN,
            outcome_window: OUTCOME_WINDOW,
        }
    }
}

impl FieldConfig {
    /// Reject layouts the obstacle stream cannot be built from
    pub fn validate(&self) -> SimResult<()> {
        let count = self.height / self.obstacle_spacing;
        if self.obstacle_spacing > 0.0
            && count.is_finite()
            && count <= MAX_VISIBLE_OBSTACLES as f32
        {
            Ok(())
        } else {
            Err(SimError::ObstacleSpacing {
                spacing: self.obstacle_spacing,
                height: self.height,
                max: MAX_VISIBLE_OBSTACLES,
            })
        }
    }

    /// Number of obstacles kept on screen at once
    pub fn visible_obstacles(&self) -> usize {
        ((self.height / self.obstacle_spacing) as usize).max(1)
    }

    /// Vertical distance an obstacle falls per tick
    #[inline]
    pub fn obstacle_step(&self) -> f32 {
        self.obstacle_speed * self.game_speed
    }

    /// Horizontal distance covered per tick by a unit motion step
    #[inline]
    pub fn agent_step(&self) -> f32 {
        self.box_speed * self.game_speed
    }

    /// Agent center height
    #[inline]
    pub fn agent_y(&self) -> f32 {
        self.height * self.agent_y_fraction
    }
}

/// The controlled box
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    /// Center position; only `x` ever changes
    pub center: Vec2,
    pub length: f32,
}

impl Agent {
    /// Agent centered horizontally at its fixed height
    pub fn new(config: &FieldConfig) -> Self {
        Self {
            center: Vec2::new(config.width / 2.0, config.agent_y()),
            length: config.box_length,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::square(self.center, self.length)
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.center.y + self.length / 2.0
    }

    #[inline]
    pub fn half_length(&self) -> f32 {
        self.length / 2.0
    }
}

/// Things that happened during a tick, drained by the runner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    /// A new obstacle entered the field
    ObstacleSpawned { id: ObstacleId },
    /// First overlap between the agent and the incoming obstacle
    CollisionDetected { id: ObstacleId },
    /// The incoming obstacle fell past the agent and was retired
    ObstacleRetired { id: ObstacleId, passed: bool },
}

/// Complete simulation context
#[derive(Debug)]
pub struct SimState {
    pub config: FieldConfig,
    pub agent: Agent,
    pub obstacles: ObstacleStream,
    pub tracker: OutcomeTracker,
    /// Set by the collision check, consumed (and reset) at the next pass.
    /// Lags the collision by at least one tick by construction.
    pub pending_collision: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events emitted since the last drain
    pub events: Vec<SimEvent>,
}

impl SimState {
    /// Create a state with the default field and a seeded obstacle stream
    pub fn new(seed: u64) -> SimResult<Self> {
        Self::with_config(FieldConfig::default(), seed)
    }

    pub fn with_config(config: FieldConfig, seed: u64) -> SimResult<Self> {
        let rng = Pcg32::seed_from_u64(seed);
        let obstacles = ObstacleStream::staggered(&config, rng)?;
        let events = obstacles
            .iter()
            .map(|o| SimEvent::ObstacleSpawned { id: o.id })
            .collect();
        Ok(Self {
            agent: Agent::new(&config),
            tracker: OutcomeTracker::new(config.outcome_window),
            obstacles,
            pending_collision: false,
            time_ticks: 0,
            events,
            config,
        })
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }
}
