//! # Debug Geometry Builders
//!
//! Procedural generators that append vertices and triangle indices for
//! lines, rectangles, circles, boxes, prisms, spheres and cylinders. Building
//! happens entirely on the CPU; [`GeometryBuilder::create_buffer`] uploads the
//! result through a [`RenderBackend`] in one shot.
//!
//! - [`Draw2D`]: screen-space shapes with an alpha-faded AA border
//! - [`Draw3D`]: vertex-colored world-space shapes, lines drawn as thin prisms
//! - [`DebugRect`] / [`DebugCircle`]: cached AA outlines rebuilt only on change

pub mod debug;
pub mod draw2d;
pub mod draw3d;

pub use debug::{DebugCircle, DebugPrimitive, DebugRect};

use crate::render::api::RenderBackend;
use crate::render::vertex::{Vertex, Vertex2Alpha, Vertex3Color, VertexBuffer};
use crate::render::RenderResult;

/// Builder of 2D anti-aliased geometry
pub type Draw2D = GeometryBuilder<Vertex2Alpha>;

/// Builder of vertex-colored 3D geometry
pub type Draw3D = GeometryBuilder<Vertex3Color>;

/// Accumulates vertices and triangle indices
///
/// Every shape operation appends; nothing is ever rewritten. Indices refer to
/// positions in `vertices`, three per triangle.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryBuilder<V> {
    /// Generated vertices
    pub vertices: Vec<V>,
    /// Generated triangle indices
    pub indices: Vec<u32>,
}

impl<V> Default for GeometryBuilder<V> {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }
}

impl<V: Vertex> GeometryBuilder<V> {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// True if nothing has been generated yet
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of triangles generated so far
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Drop all generated geometry, keeping allocations
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    /// Reserve room for `new_vertices` more vertices and `new_triangles` more triangles
    ///
    /// Index room is over-reserved at six per triangle, matching the quad-heavy
    /// output of most shapes.
    pub fn reserve(&mut self, new_vertices: usize, new_triangles: usize) {
        self.vertices.reserve(new_vertices);
        self.indices.reserve(new_triangles * 6);
    }

    /// Append another builder's geometry, rebasing its indices past our vertices
    pub fn append(&mut self, other: &Self) {
        let offset = self.base_index();
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|i| i + offset));
    }

    /// Upload the geometry as an indexed vertex buffer
    ///
    /// Returns `Ok(None)` when the builder is empty.
    pub fn create_buffer(&self, backend: &mut dyn RenderBackend) -> RenderResult<Option<VertexBuffer>> {
        if self.is_empty() {
            return Ok(None);
        }
        log::debug!(
            "Uploading {:?} geometry: {} vertices, {} triangles",
            V::FORMAT,
            self.vertices.len(),
            self.triangle_count()
        );
        backend
            .create_vertex_buffer(V::FORMAT, bytemuck::cast_slice(&self.vertices), &self.indices)
            .map(Some)
    }

    /// Index the next pushed vertex will get
    pub(crate) fn base_index(&self) -> u32 {
        self.vertices.len() as u32
    }

    /// Push one triangle relative to `base`
    pub(crate) fn push_triangle(&mut self, base: u32, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[base + a, base + b, base + c]);
    }

    /// Push the two triangles `(a, b, c)` and `(a, c, d)` of a quad relative to `base`
    pub(crate) fn push_quad(&mut self, base: u32, a: u32, b: u32, c: u32, d: u32) {
        self.push_triangle(base, a, b, c);
        self.push_triangle(base, a, c, d);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::color::Color;
    use crate::foundation::math::Vec3;
    use crate::render::backends::HeadlessBackend;

    #[test]
    fn test_append_rebases_indices() {
        let mut a = Draw3D::new();
        a.cube(Vec3::zeros(), 1.0, Color::RED);
        let mut b = Draw3D::new();
        b.prism(Vec3::new(5.0, 0.0, 0.0), 1.0, Color::GREEN);

        let mut merged = a.clone();
        merged.append(&b);

        assert_eq!(merged.vertices.len(), a.vertices.len() + b.vertices.len());
        assert_eq!(&merged.indices[..a.indices.len()], &a.indices[..]);

        // every appended triangle references the same positions as in `b`
        let offset = a.vertices.len() as u32;
        for (merged_index, &b_index) in merged.indices[a.indices.len()..].iter().zip(&b.indices) {
            assert_eq!(*merged_index, b_index + offset);
            assert_eq!(
                merged.vertices[*merged_index as usize],
                b.vertices[b_index as usize]
            );
        }
    }

    #[test]
    fn test_empty_builder_creates_no_buffer() {
        let mut backend = HeadlessBackend::new(16, 16);
        let draw = Draw2D::new();
        assert!(draw.create_buffer(&mut backend).unwrap().is_none());
        assert_eq!(backend.buffer_count(), 0);
    }

    #[test]
    fn test_create_buffer_uploads_everything() {
        let mut backend = HeadlessBackend::new(16, 16);
        let mut draw = Draw3D::new();
        draw.sphere(Vec3::zeros(), 1.0, Color::WHITE);

        let buffer = draw.create_buffer(&mut backend).unwrap().unwrap();
        assert_eq!(buffer.vertex_count(), draw.vertices.len());
        assert_eq!(buffer.index_count(), draw.indices.len());
        assert_eq!(backend.buffer(&buffer).unwrap().indices, draw.indices);
    }

    #[test]
    fn test_clear_resets() {
        let mut draw = Draw3D::new();
        draw.reserve_lines(4);
        draw.line(Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0), 0.1, Color::WHITE);
        draw.clear();
        assert!(draw.is_empty());
        assert!(draw.indices.is_empty());
    }
}
