//! Render surface abstraction
//!
//! The simulation never reads anything back from a surface. [`SceneProjector`]
//! mirrors the numeric state onto whatever surface is plugged in.

pub mod headless;
pub mod projector;

use thiserror::Error;

use crate::sim::geometry::Aabb;

pub use headless::HeadlessSurface;
pub use projector::SceneProjector;

/// Opaque handle to a drawn shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeHandle(pub u64);

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unknown shape handle {0:?}")]
    UnknownHandle(ShapeHandle),

    #[error("render surface unavailable: {0}")]
    Unavailable(String),
}

/// Drawing operations over rectangles (the agent) and thick lines (barriers)
pub trait RenderSurface {
    fn create_rect(&mut self, bounds: Aabb) -> Result<ShapeHandle, RenderError>;

    fn create_line(
        &mut self,
        from: glam::Vec2,
        to: glam::Vec2,
        thickness: f32,
    ) -> Result<ShapeHandle, RenderError>;

    fn move_shape(&mut self, handle: ShapeHandle, dx: f32, dy: f32) -> Result<(), RenderError>;

    fn bbox(&self, handle: ShapeHandle) -> Result<Aabb, RenderError>;

    fn delete(&mut self, handle: ShapeHandle) -> Result<(), RenderError>;
}
