//! Headless render backend
//!
//! An off-screen [`RenderBackend`] that keeps uploaded buffers in memory and
//! records every bind, draw, clear and swap as a [`RenderCommand`]. Tools and
//! tests use it to run full scene frames without a GPU, and can make chosen
//! calls fail to exercise error handling.

use std::any::Any;
use std::collections::HashSet;

use crate::foundation::collections::{BufferId, BufferMap};
use crate::foundation::color::{Color, Color3};
use crate::foundation::math::Mat4;
use crate::render::api::{RenderBackend, ShaderHandle, ShaderUniform, TextureHandle};
use crate::render::vertex::{VertexBuffer, VertexFormat};
use crate::render::{RenderError, RenderResult};

/// A command issued to the headless backend
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Frame clear
    Clear(Color3),
    /// Frame present
    SwapBuffers,
    /// Active program change
    BindShader(ShaderHandle),
    /// Matrix uniform upload
    BindMatrix(ShaderUniform, Mat4),
    /// Color uniform upload
    BindColor(ShaderUniform, Color),
    /// Texture bind
    BindTexture(ShaderUniform, TextureHandle),
    /// Indexed draw
    Draw(BufferId),
}

/// Backend entry points that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendCall {
    /// [`RenderBackend::clear`]
    Clear,
    /// [`RenderBackend::swap_buffers`]
    SwapBuffers,
    /// [`RenderBackend::load_shader`]
    LoadShader,
    /// [`RenderBackend::bind_shader`]
    BindShader,
    /// [`RenderBackend::bind_matrix`]
    BindMatrix,
    /// [`RenderBackend::bind_color`]
    BindColor,
    /// [`RenderBackend::bind_texture`]
    BindTexture,
    /// [`RenderBackend::create_vertex_buffer`]
    CreateVertexBuffer,
    /// [`RenderBackend::draw`]
    Draw,
}

/// Buffer contents kept by the headless backend
#[derive(Debug, Clone)]
pub struct StoredBuffer {
    /// Vertex layout
    pub format: VertexFormat,
    /// Raw vertex bytes
    pub vertices: Vec<u8>,
    /// Triangle indices
    pub indices: Vec<u32>,
}

/// Off-screen backend recording all issued commands
#[derive(Debug)]
pub struct HeadlessBackend {
    width: u32,
    height: u32,
    shaders: Vec<String>,
    buffers: BufferMap<StoredBuffer>,
    commands: Vec<RenderCommand>,
    failing: HashSet<BackendCall>,
    frames_presented: u64,
}

impl HeadlessBackend {
    /// Create a backend with the given viewport size
    pub fn new(width: u32, height: u32) -> Self {
        log::info!("Creating headless backend {}x{}", width, height);
        Self {
            width,
            height,
            shaders: Vec::new(),
            buffers: BufferMap::with_key(),
            commands: Vec::new(),
            failing: HashSet::new(),
            frames_presented: 0,
        }
    }

    /// Resize the viewport
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Make every subsequent `call` return an error
    pub fn fail_on(&mut self, call: BackendCall) {
        self.failing.insert(call);
    }

    /// Stop failing `call`
    pub fn recover(&mut self, call: BackendCall) {
        self.failing.remove(&call);
    }

    /// Commands recorded so far
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Drain the recorded commands
    pub fn take_commands(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Buffers drawn so far, in draw order
    pub fn draws(&self) -> Vec<BufferId> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                RenderCommand::Draw(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    /// Name a shader handle was loaded with
    pub fn shader_name(&self, shader: ShaderHandle) -> Option<&str> {
        let index = usize::try_from(shader.0).ok()?.checked_sub(1)?;
        self.shaders.get(index).map(String::as_str)
    }

    /// Contents of a live buffer
    pub fn buffer(&self, buffer: &VertexBuffer) -> Option<&StoredBuffer> {
        self.buffers.get(buffer.id())
    }

    /// Number of live buffers
    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    /// Number of completed frames
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    fn check(&self, call: BackendCall) -> RenderResult<()> {
        if self.failing.contains(&call) {
            return Err(RenderError::BackendError(format!("{:?} failed", call)));
        }
        Ok(())
    }

    fn record(&mut self, call: BackendCall, command: RenderCommand) -> RenderResult<()> {
        self.check(call)?;
        log::trace!("{:?}", command);
        self.commands.push(command);
        Ok(())
    }
}

impl RenderBackend for HeadlessBackend {
    fn viewport(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Color3) -> RenderResult<()> {
        self.record(BackendCall::Clear, RenderCommand::Clear(color))
    }

    fn swap_buffers(&mut self) -> RenderResult<()> {
        self.record(BackendCall::SwapBuffers, RenderCommand::SwapBuffers)?;
        self.frames_presented += 1;
        Ok(())
    }

    fn load_shader(&mut self, name: &str) -> RenderResult<ShaderHandle> {
        self.check(BackendCall::LoadShader)?;
        self.shaders.push(name.to_string());
        log::debug!("Loaded shader '{}'", name);
        Ok(ShaderHandle(self.shaders.len() as u64))
    }

    fn bind_shader(&mut self, shader: ShaderHandle) -> RenderResult<()> {
        if self.shader_name(shader).is_none() {
            return Err(RenderError::RenderingFailed(format!("unknown shader {:?}", shader)));
        }
        self.record(BackendCall::BindShader, RenderCommand::BindShader(shader))
    }

    fn bind_matrix(&mut self, uniform: ShaderUniform, matrix: &Mat4) -> RenderResult<()> {
        self.record(BackendCall::BindMatrix, RenderCommand::BindMatrix(uniform, *matrix))
    }

    fn bind_color(&mut self, uniform: ShaderUniform, color: Color) -> RenderResult<()> {
        self.record(BackendCall::BindColor, RenderCommand::BindColor(uniform, color))
    }

    fn bind_texture(&mut self, uniform: ShaderUniform, texture: TextureHandle) -> RenderResult<()> {
        self.record(BackendCall::BindTexture, RenderCommand::BindTexture(uniform, texture))
    }

    fn create_vertex_buffer(
        &mut self,
        format: VertexFormat,
        vertices: &[u8],
        indices: &[u32],
    ) -> RenderResult<VertexBuffer> {
        self.check(BackendCall::CreateVertexBuffer)?;
        if vertices.len() % format.stride() != 0 {
            return Err(RenderError::ResourceCreationFailed(format!(
                "{} vertex bytes is not a multiple of the {:?} stride",
                vertices.len(),
                format
            )));
        }

        let vertex_count = vertices.len() / format.stride();
        if let Some(bad) = indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(RenderError::ResourceCreationFailed(format!(
                "index {} out of range for {} vertices",
                bad, vertex_count
            )));
        }

        let id = self.buffers.insert(StoredBuffer {
            format,
            vertices: vertices.to_vec(),
            indices: indices.to_vec(),
        });
        log::debug!("Created {:?} buffer with {} vertices, {} indices", format, vertex_count, indices.len());
        Ok(VertexBuffer::new(id, format, vertex_count, indices.len()))
    }

    fn destroy_vertex_buffer(&mut self, buffer: &VertexBuffer) -> RenderResult<()> {
        self.buffers
            .remove(buffer.id())
            .map(|_| ())
            .ok_or_else(|| RenderError::ResourceCreationFailed("buffer already destroyed".to_string()))
    }

    fn draw(&mut self, buffer: &VertexBuffer) -> RenderResult<()> {
        if !self.buffers.contains_key(buffer.id()) {
            return Err(RenderError::RenderingFailed("draw of a destroyed buffer".to_string()));
        }
        self.record(BackendCall::Draw, RenderCommand::Draw(buffer.id()))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
