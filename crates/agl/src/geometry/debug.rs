//! Cached debug outlines
//!
//! A debug primitive keeps the vertex buffer of its last shape and only
//! tessellates again when the shape actually changes, which keeps per-frame
//! overlays such as selection rectangles cheap.

use crate::foundation::color::Color;
use crate::foundation::math::{Mat4, Vec2};
use crate::geometry::Draw2D;
use crate::render::api::{RenderBackend, ShaderHandle, ShaderUniform};
use crate::render::vertex::VertexBuffer;
use crate::render::RenderResult;

/// Outline width of debug primitives
const DEBUG_LINE_WIDTH: f32 = 1.5;

/// Vertex buffer shared by the debug outlines
#[derive(Debug, Default)]
pub struct DebugPrimitive {
    buffer: Option<VertexBuffer>,
}

impl DebugPrimitive {
    /// Current buffer, `None` until a shape has been set
    pub fn buffer(&self) -> Option<&VertexBuffer> {
        self.buffer.as_ref()
    }

    /// Draw the outline with `shader`, binding the transform and color first
    pub fn draw(
        &self,
        backend: &mut dyn RenderBackend,
        shader: ShaderHandle,
        model_view_projection: &Mat4,
        color: Color,
    ) -> RenderResult<()> {
        let Some(buffer) = &self.buffer else {
            return Ok(());
        };
        backend.bind_shader(shader)?;
        backend.bind_matrix(ShaderUniform::Transform, model_view_projection)?;
        backend.bind_color(ShaderUniform::DiffuseColor, color)?;
        backend.draw(buffer)
    }

    /// Release the buffer
    pub fn release(&mut self, backend: &mut dyn RenderBackend) -> RenderResult<()> {
        match self.buffer.take() {
            Some(buffer) => backend.destroy_vertex_buffer(&buffer),
            None => Ok(()),
        }
    }

    fn rebuild(&mut self, backend: &mut dyn RenderBackend, draw: &Draw2D) -> RenderResult<()> {
        self.release(backend)?;
        self.buffer = draw.create_buffer(backend)?;
        Ok(())
    }
}

/// Anti-aliased rectangle outline
#[derive(Debug, Default)]
pub struct DebugRect {
    primitive: DebugPrimitive,
    origin: Vec2,
    size: Vec2,
}

impl DebugRect {
    /// Set the rectangle, rebuilding the outline only if it changed
    ///
    /// Returns `true` when the buffer was rebuilt.
    pub fn set_rect(&mut self, backend: &mut dyn RenderBackend, origin: Vec2, size: Vec2) -> RenderResult<bool> {
        if self.primitive.buffer.is_some() && self.origin == origin && self.size == size {
            return Ok(false);
        }
        self.origin = origin;
        self.size = size;

        let mut draw = Draw2D::new();
        draw.rect_aa(origin, size, DEBUG_LINE_WIDTH);
        self.primitive.rebuild(backend, &draw)?;
        Ok(true)
    }

    /// Current rectangle as `(origin, size)`
    pub fn rect(&self) -> (Vec2, Vec2) {
        (self.origin, self.size)
    }

    /// Underlying primitive, used for drawing
    pub fn primitive(&self) -> &DebugPrimitive {
        &self.primitive
    }

    /// Mutable primitive, used for releasing the buffer
    pub fn primitive_mut(&mut self) -> &mut DebugPrimitive {
        &mut self.primitive
    }
}

/// Anti-aliased circle outline
#[derive(Debug)]
pub struct DebugCircle {
    primitive: DebugPrimitive,
    center: Vec2,
    radius: f32,
}

impl Default for DebugCircle {
    fn default() -> Self {
        Self {
            primitive: DebugPrimitive::default(),
            center: Vec2::zeros(),
            radius: 1.0,
        }
    }
}

impl DebugCircle {
    /// Set the circle, rebuilding the outline only if it changed
    ///
    /// Returns `true` when the buffer was rebuilt.
    pub fn set_circle(&mut self, backend: &mut dyn RenderBackend, center: Vec2, radius: f32) -> RenderResult<bool> {
        #[allow(clippy::float_cmp)]
        let unchanged = self.center == center && self.radius == radius;
        if self.primitive.buffer.is_some() && unchanged {
            return Ok(false);
        }
        self.center = center;
        self.radius = radius;

        let mut draw = Draw2D::new();
        draw.circle_aa(center, radius, DEBUG_LINE_WIDTH);
        self.primitive.rebuild(backend, &draw)?;
        Ok(true)
    }

    /// Circle center
    pub fn center(&self) -> Vec2 {
        self.center
    }

    /// Circle radius
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Underlying primitive, used for drawing
    pub fn primitive(&self) -> &DebugPrimitive {
        &self.primitive
    }

    /// Mutable primitive, used for releasing the buffer
    pub fn primitive_mut(&mut self) -> &mut DebugPrimitive {
        &mut self.primitive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backends::{HeadlessBackend, RenderCommand};

    #[test]
    fn test_rect_rebuilds_only_on_change() {
        let mut backend = HeadlessBackend::new(100, 100);
        let mut rect = DebugRect::default();

        assert!(rect.set_rect(&mut backend, Vec2::new(1.0, 1.0), Vec2::new(10.0, 5.0)).unwrap());
        assert!(!rect.set_rect(&mut backend, Vec2::new(1.0, 1.0), Vec2::new(10.0, 5.0)).unwrap());
        assert!(rect.set_rect(&mut backend, Vec2::new(2.0, 1.0), Vec2::new(10.0, 5.0)).unwrap());

        // the old buffer was released, only the current one remains
        assert_eq!(backend.buffer_count(), 1);
        assert_eq!(rect.primitive().buffer().unwrap().vertex_count(), 32);
    }

    #[test]
    fn test_circle_rebuilds_only_on_change() {
        let mut backend = HeadlessBackend::new(100, 100);
        let mut circle = DebugCircle::default();
        assert!(circle.primitive().buffer().is_none());

        assert!(circle.set_circle(&mut backend, Vec2::zeros(), 1.0).unwrap());
        assert!(!circle.set_circle(&mut backend, Vec2::zeros(), 1.0).unwrap());
        assert!(circle.set_circle(&mut backend, Vec2::zeros(), 12.0).unwrap());
        assert_eq!(circle.primitive().buffer().unwrap().vertex_count(), 14 * 8);

        circle.primitive_mut().release(&mut backend).unwrap();
        assert_eq!(backend.buffer_count(), 0);
    }

    #[test]
    fn test_draw_binds_then_draws() {
        let mut backend = HeadlessBackend::new(100, 100);
        let shader = backend.load_shader("debuglines").unwrap();
        let mut rect = DebugRect::default();
        rect.set_rect(&mut backend, Vec2::zeros(), Vec2::new(4.0, 4.0)).unwrap();

        rect.primitive()
            .draw(&mut backend, shader, &Mat4::identity(), Color::RED)
            .unwrap();

        let id = rect.primitive().buffer().unwrap().id();
        assert_eq!(
            backend.commands(),
            &[
                RenderCommand::BindShader(shader),
                RenderCommand::BindMatrix(ShaderUniform::Transform, Mat4::identity()),
                RenderCommand::BindColor(ShaderUniform::DiffuseColor, Color::RED),
                RenderCommand::Draw(id),
            ]
        );
    }
}
