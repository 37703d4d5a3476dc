//! Plain numeric geometry for the agent and the obstacles
//!
//! An obstacle is two horizontal barriers at the same height, with a fixed
//! width opening between them:
//!
//! ```text
//! 0 ======== opening_left          opening_right ======== width
//! ```
//!
//! Bounds live here as numbers; the render surface only ever mirrors them.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::FieldConfig;
use crate::error::{SimError, SimResult};

/// Axis-aligned bounding box in field coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            min: Vec2::new(x0, y0),
            max: Vec2::new(x1, y1),
        }
    }

    /// Square box of side `length` centered on `center`
    pub fn square(center: Vec2, length: f32) -> Self {
        let half = Vec2::splat(length / 2.0);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    /// Same box moved by `delta`
    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }
}

/// Stable obstacle identity, allocated by the stream
pub type ObstacleId = u32;

/// A gap between two barriers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: ObstacleId,
    /// Right end of the left barrier
    pub opening_left: f32,
    /// Left end of the right barrier (`opening_left + gap`)
    pub opening_right: f32,
    /// Height of the barrier centerline, grows as the obstacle falls
    pub vertical_offset: f32,
    /// Cleared once the obstacle is retired
    pub active: bool,
}

impl Obstacle {
    /// Build an obstacle, rejecting openings that do not fit the field
    pub fn new(
        id: ObstacleId,
        opening_left: f32,
        vertical_offset: f32,
        config: &FieldConfig,
    ) -> SimResult<Self> {
        let obstacle = Self {
            id,
            opening_left,
            opening_right: opening_left + config.opening_width,
            vertical_offset,
            active: true,
        };
        obstacle.validate(config)?;
        Ok(obstacle)
    }

    /// Check the opening width and placement invariant
    pub fn validate(&self, config: &FieldConfig) -> SimResult<()> {
        let width = self.opening_right - self.opening_left;
        let fits = self.opening_left >= 0.0
            && self.opening_right <= config.width
            && (width - config.opening_width).abs() <= f32::EPSILON * config.width;
        if fits {
            Ok(())
        } else {
            Err(SimError::GeometryInconsistency {
                left: self.opening_left,
                right: self.opening_right,
                gap: config.opening_width,
                width: config.width,
            })
        }
    }

    /// Move the obstacle down by `distance`
    #[inline]
    pub fn advance(&mut self, distance: f32) {
        self.vertical_offset += distance;
    }

    /// Horizontal center of the opening
    #[inline]
    pub fn opening_center(&self) -> f32 {
        (self.opening_left + self.opening_right) / 2.0
    }

    /// Bounds of the barrier running from the left wall to the opening
    pub fn left_barrier(&self, thickness: f32) -> Aabb {
        let half = thickness / 2.0;
        Aabb::new(
            0.0,
            self.vertical_offset - half,
            self.opening_left,
            self.vertical_offset + half,
        )
    }

    /// Bounds of the barrier running from the opening to the right wall
    pub fn right_barrier(&self, thickness: f32, field_width: f32) -> Aabb {
        let half = thickness / 2.0;
        Aabb::new(
            self.opening_right,
            self.vertical_offset - half,
            field_width,
            self.vertical_offset + half,
        )
    }
}

/// Create an obstacle with a uniformly random opening at `vertical_offset`
///
/// The left edge is a whole unit in `[gap, width - gap)`, so the opening always
/// leaves at least a gap's worth of barrier on the left.
pub fn create_obstacle<R: Rng>(
    id: ObstacleId,
    vertical_offset: f32,
    config: &FieldConfig,
    rng: &mut R,
) -> SimResult<Obstacle> {
    let low = config.opening_width;
    let high = config.width - config.opening_width;
    if high <= low {
        return Err(SimError::GeometryInconsistency {
            left: low,
            right: low + config.opening_width,
            gap: config.opening_width,
            width: config.width,
        });
    }
    let opening_left = rng.random_range(low..high).floor();
    Obstacle::new(id, opening_left, vertical_offset, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_barrier_bounds() {
        let config = FieldConfig::default();
        let obstacle = Obstacle::new(1, 250.0, 302.5, &config).unwrap();

        let left = obstacle.left_barrier(5.0);
        assert_eq!(left, Aabb::new(0.0, 300.0, 250.0, 305.0));

        let right = obstacle.right_barrier(5.0, config.width);
        assert_eq!(right, Aabb::new(350.0, 300.0, 600.0, 305.0));
        assert_eq!(obstacle.opening_center(), 300.0);
    }

    #[test]
    fn test_advance_is_additive() {
        let config = FieldConfig::default();
        let mut obstacle = Obstacle::new(1, 200.0, 0.0, &config).unwrap();
        obstacle.advance(3.0625);
        obstacle.advance(3.0625);
        assert!((obstacle.vertical_offset - 6.125).abs() < 1e-6);
        assert_eq!(obstacle.opening_left, 200.0);
    }

    #[test]
    fn test_rejects_opening_outside_field() {
        let config = FieldConfig::default();
        assert!(matches!(
            Obstacle::new(1, 550.0, 0.0, &config),
            Err(SimError::GeometryInconsistency { .. })
        ));
        assert!(Obstacle::new(1, -1.0, 0.0, &config).is_err());
    }

    #[test]
    fn test_too_narrow_field_fails_fast() {
        let config = FieldConfig {
            width: 150.0,
            ..FieldConfig::default()
        };
        let mut rng = Pcg32::seed_from_u64(3);
        assert!(create_obstacle(1, 0.0, &config, &mut rng).is_err());
    }

    #[test]
    fn test_aabb_square() {
        let b = Aabb::square(Vec2::new(300.0, 450.0), 40.0);
        assert_eq!(b, Aabb::new(280.0, 430.0, 320.0, 470.0));
        assert_eq!(b.width(), 40.0);
        assert_eq!(b.center(), Vec2::new(300.0, 450.0));
    }

    proptest! {
        #[test]
        fn generated_openings_fit(seed in any::<u64>()) {
            let config = FieldConfig::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            for id in 0..32 {
                let o = create_obstacle(id, 0.0, &config, &mut rng).unwrap();
                prop_assert_eq!(o.opening_right - o.opening_left, config.opening_width);
                prop_assert!(o.opening_left >= config.opening_width);
                prop_assert!(o.opening_right <= config.width);
            }
        }
    }
}
