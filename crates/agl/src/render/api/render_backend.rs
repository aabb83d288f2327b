//! Backend abstraction trait for the rendering system
//!
//! The scene graph treats the GPU as a black box exposing bind and draw
//! operations. Everything it needs from a graphics API goes through
//! [`RenderBackend`].

use crate::foundation::color::{Color, Color3};
use crate::foundation::math::Mat4;
use crate::render::vertex::{VertexBuffer, VertexFormat};
use crate::render::RenderResult;

/// Handle to a compiled shader program stored in the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderHandle(pub u64);

/// Handle to a texture stored in the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Uniform slots understood by the default shaders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderUniform {
    /// `mat4 u_Transform`, the model-view-projection matrix
    Transform,
    /// `sampler2D u_DiffuseTex`
    DiffuseTex,
    /// `vec4 u_DiffuseColor`
    DiffuseColor,
}

impl ShaderUniform {
    /// Uniform name as declared in shader source
    pub const fn name(self) -> &'static str {
        match self {
            Self::Transform => "u_Transform",
            Self::DiffuseTex => "u_DiffuseTex",
            Self::DiffuseColor => "u_DiffuseColor",
        }
    }
}

/// Main rendering backend trait
///
/// Abstracts over the render target (an on-screen GL context, an off-screen
/// recorder) and provides the handful of operations the scene render pass
/// issues. All calls happen on the thread that owns the backend.
pub trait RenderBackend {
    /// Current viewport size in pixels (width, height)
    fn viewport(&self) -> (u32, u32);

    /// Clear color and depth for a new frame
    fn clear(&mut self, color: Color3) -> RenderResult<()>;

    /// Present the finished frame
    fn swap_buffers(&mut self) -> RenderResult<()>;

    /// Load a named shader program
    fn load_shader(&mut self, name: &str) -> RenderResult<ShaderHandle>;

    /// Make `shader` the active program for subsequent binds and draws
    fn bind_shader(&mut self, shader: ShaderHandle) -> RenderResult<()>;

    /// Upload a matrix uniform to the active program
    fn bind_matrix(&mut self, uniform: ShaderUniform, matrix: &Mat4) -> RenderResult<()>;

    /// Upload a color uniform to the active program
    fn bind_color(&mut self, uniform: ShaderUniform, color: Color) -> RenderResult<()>;

    /// Bind a texture to a sampler uniform of the active program
    fn bind_texture(&mut self, uniform: ShaderUniform, texture: TextureHandle) -> RenderResult<()>;

    /// Create an indexed vertex buffer from raw vertex bytes laid out as `format`
    fn create_vertex_buffer(
        &mut self,
        format: VertexFormat,
        vertices: &[u8],
        indices: &[u32],
    ) -> RenderResult<VertexBuffer>;

    /// Release a vertex buffer
    fn destroy_vertex_buffer(&mut self, buffer: &VertexBuffer) -> RenderResult<()>;

    /// Draw an indexed vertex buffer with the currently bound state
    fn draw(&mut self, buffer: &VertexBuffer) -> RenderResult<()>;

    /// Downcast to concrete backend type for inspection
    fn as_any(&self) -> &dyn std::any::Any;

    /// Downcast to mutable concrete backend type for inspection
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}
