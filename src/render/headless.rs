//! In-memory surface that keeps shapes in a map

use std::collections::BTreeMap;

use glam::Vec2;

use super::{RenderError, RenderSurface, ShapeHandle};
use crate::sim::geometry::Aabb;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeKind {
    Rect,
    Line { thickness: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shape {
    pub kind: ShapeKind,
    pub bounds: Aabb,
}

#[derive(Debug, Default)]
pub struct HeadlessSurface {
    shapes: BTreeMap<ShapeHandle, Shape>,
    next_handle: u64,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shape(&self, handle: ShapeHandle) -> Option<&Shape> {
        self.shapes.get(&handle)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = &Shape> {
        self.shapes
            .values()
            .filter(|s| matches!(s.kind, ShapeKind::Line { .. }))
    }

    fn insert(&mut self, shape: Shape) -> ShapeHandle {
        self.next_handle += 1;
        let handle = ShapeHandle(self.next_handle);
        self.shapes.insert(handle, shape);
        handle
    }
}

impl RenderSurface for HeadlessSurface {
    fn create_rect(&mut self, bounds: Aabb) -> Result<ShapeHandle, RenderError> {
        Ok(self.insert(Shape {
            kind: ShapeKind::Rect,
            bounds,
        }))
    }

    fn create_line(
        &mut self,
        from: Vec2,
        to: Vec2,
        thickness: f32,
    ) -> Result<ShapeHandle, RenderError> {
        // Only horizontal and vertical lines are ever drawn
        let half = thickness / 2.0;
        let min = from.min(to);
        let max = from.max(to);
        let bounds = if (to.y - from.y).abs() <= (to.x - from.x).abs() {
            Aabb::new(min.x, min.y - half, max.x, max.y + half)
        } else {
            Aabb::new(min.x - half, min.y, max.x + half, max.y)
        };
        Ok(self.insert(Shape {
            kind: ShapeKind::Line { thickness },
            bounds,
        }))
    }

    fn move_shape(&mut self, handle: ShapeHandle, dx: f32, dy: f32) -> Result<(), RenderError> {
        let shape = self
            .shapes
            .get_mut(&handle)
            .ok_or(RenderError::UnknownHandle(handle))?;
        shape.bounds = shape.bounds.translated(Vec2::new(dx, dy));
        Ok(())
    }

    fn bbox(&self, handle: ShapeHandle) -> Result<Aabb, RenderError> {
        self.shapes
            .get(&handle)
            .map(|s| s.bounds)
            .ok_or(RenderError::UnknownHandle(handle))
    }

    fn delete(&mut self, handle: ShapeHandle) -> Result<(), RenderError> {
        self.shapes
            .remove(&handle)
            .map(|_| ())
            .ok_or(RenderError::UnknownHandle(handle))
    }
}
