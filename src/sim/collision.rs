//! Collision detection between the agent and barrier lines
//!
//! Barriers are thick lines, not filled rectangles. A barrier only counts as
//! hit when the agent reaches past its inner (opening-side) edge by more than
//! the line thickness, and the barrier centerline lies strictly inside the
//! agent's vertical span.
//!
//! Both sides use the same open-interval convention: an exact edge touch is
//! never a collision.

use super::geometry::{Aabb, Obstacle};

/// Agent overlaps the left barrier (wall side at `min.x`, opening side at `max.x`)
pub fn collides_left(agent: &Aabb, barrier: &Aabb, thickness: f32) -> bool {
    let lo = barrier.min.x;
    let hi = barrier.max.x - thickness;
    overlaps_span(agent, lo, hi) && crosses_centerline(agent, barrier, thickness)
}

/// Agent overlaps the right barrier (opening side at `min.x`, wall side at `max.x`)
pub fn collides_right(agent: &Aabb, barrier: &Aabb, thickness: f32) -> bool {
    let lo = barrier.min.x + thickness;
    let hi = barrier.max.x;
    overlaps_span(agent, lo, hi) && crosses_centerline(agent, barrier, thickness)
}

/// Agent overlaps either barrier of the obstacle
pub fn collides_with(agent: &Aabb, obstacle: &Obstacle, thickness: f32, field_width: f32) -> bool {
    collides_left(agent, &obstacle.left_barrier(thickness), thickness)
        || collides_right(
            agent,
            &obstacle.right_barrier(thickness, field_width),
            thickness,
        )
}

#[inline]
fn overlaps_span(agent: &Aabb, lo: f32, hi: f32) -> bool {
    lo < hi && agent.min.x < hi && agent.max.x > lo
}

#[inline]
fn crosses_centerline(agent: &Aabb, barrier: &Aabb, thickness: f32) -> bool {
    let line_y = barrier.min.y + thickness / 2.0;
    line_y > agent.min.y && line_y < agent.max.y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::FieldConfig;

    const T: f32 = 5.0;

    fn agent() -> Aabb {
        Aabb::new(280.0, 440.0, 320.0, 480.0)
    }

    #[test]
    fn test_left_barrier_short_of_agent() {
        // No horizontal overlap (and the line is far above)
        let barrier = Aabb::new(0.0, 300.0, 250.0, 305.0);
        assert!(!collides_left(&agent(), &barrier, T));
    }

    #[test]
    fn test_left_barrier_under_agent() {
        let barrier = Aabb::new(0.0, 440.0, 320.0, 445.0);
        assert!(collides_left(&agent(), &barrier, T));
    }

    #[test]
    fn test_left_inner_edge_touch_is_not_a_hit() {
        // Shrunk inner edge lands exactly on the agent's left edge
        let barrier = Aabb::new(0.0, 455.0, 285.0, 460.0);
        assert!(!collides_left(&agent(), &barrier, T));
        let barrier = Aabb::new(0.0, 455.0, 285.5, 460.0);
        assert!(collides_left(&agent(), &barrier, T));
    }

    #[test]
    fn test_right_barrier_edges() {
        // Inner edge shrunk to 320: exact touch of the agent's right edge
        let barrier = Aabb::new(315.0, 455.0, 600.0, 460.0);
        assert!(!collides_right(&agent(), &barrier, T));
        let barrier = Aabb::new(314.0, 455.0, 600.0, 460.0);
        assert!(collides_right(&agent(), &barrier, T));
    }

    #[test]
    fn test_right_barrier_fully_under_agent() {
        // Agent sits entirely inside the barrier's span
        let barrier = Aabb::new(100.0, 455.0, 600.0, 460.0);
        assert!(collides_right(&agent(), &barrier, T));
    }

    #[test]
    fn test_vertical_containment_is_strict() {
        // Centerline exactly on the agent's top edge
        let barrier = Aabb::new(0.0, 437.5, 600.0, 442.5);
        assert!(!collides_left(&agent(), &barrier, T));
        // Centerline exactly on the agent's bottom edge
        let barrier = Aabb::new(0.0, 477.5, 600.0, 482.5);
        assert!(!collides_left(&agent(), &barrier, T));
        // Just inside
        let barrier = Aabb::new(0.0, 477.0, 600.0, 482.0);
        assert!(collides_left(&agent(), &barrier, T));
    }

    #[test]
    fn test_agent_inside_opening_clears_obstacle() {
        let config = FieldConfig::default();
        // Opening 250..350, agent 280..320 at the barrier height
        let obstacle = Obstacle::new(1, 250.0, 460.0, &config).unwrap();
        assert!(!collides_with(&agent(), &obstacle, T, config.width));

        let obstacle = Obstacle::new(2, 300.0, 460.0, &config).unwrap();
        assert!(collides_with(&agent(), &obstacle, T, config.width));

        let obstacle = Obstacle::new(3, 200.0, 460.0, &config).unwrap();
        assert!(collides_with(&agent(), &obstacle, T, config.width));
    }
}
