//! Per-frame render state

use crate::render::api::RenderBackend;
use crate::render::shader::ShaderRegistry;

/// Everything a node needs to issue draw calls during one render pass
///
/// Borrowed from the [`RenderContext`](crate::render::RenderContext) for the
/// duration of a single frame.
pub struct RenderFrame<'a> {
    /// Backend receiving binds and draws
    pub backend: &'a mut dyn RenderBackend,
    /// Default shaders used when a material has none
    pub shaders: &'a ShaderRegistry,
}

impl<'a> RenderFrame<'a> {
    /// Create a frame over a backend and its shader registry
    pub fn new(backend: &'a mut dyn RenderBackend, shaders: &'a ShaderRegistry) -> Self {
        Self { backend, shaders }
    }
}
