//! # Rendering System
//!
//! The rendering abstraction layer consumed by the scene graph and the
//! geometry builders. GPU resources (shaders, textures, vertex buffers) are
//! opaque handles owned by a [`RenderBackend`]; the scene only binds and
//! draws them.
//!
//! ## Architecture
//!
//! - **API**: The [`RenderBackend`] trait, resource handles and the per-frame
//!   [`RenderFrame`] passed down the scene traversal
//! - **Backends**: [`HeadlessBackend`], an off-screen backend that records
//!   every issued command
//! - **Resources**: Vertex formats, materials, texture references and the
//!   default [`ShaderRegistry`]
//! - **Context**: [`RenderContext`], which owns the backend, the shader
//!   registry, the frame timer and the scene root

pub mod api;
pub mod backends;
pub mod bitmap;
pub mod context;
pub mod material;
pub mod shader;
pub mod vertex;

pub use api::{RenderBackend, RenderFrame, ShaderHandle, ShaderUniform, TextureHandle};
pub use backends::{BackendCall, HeadlessBackend, RenderCommand};
pub use bitmap::{align_row_to_4, padded_image_size};
pub use context::RenderContext;
pub use material::{Material, TextureRef};
pub use shader::{DefaultShader, ShaderRegistry};
pub use vertex::{
    Vertex, Vertex2Alpha, Vertex3, Vertex3Color, Vertex3UV, VertexAttributes, VertexBuffer,
    VertexFormat,
};

use thiserror::Error;

/// Rendering system errors
///
/// Comprehensive error types for all rendering operations, covering context
/// setup, per-frame binds and draws, and resource management.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Renderer initialization failed during setup
    ///
    /// Occurs when the render context cannot be created, typically because
    /// the configuration is invalid or a default shader failed to load. The
    /// context is unusable after this error.
    #[error("Renderer initialization failed: {0}")]
    InitializationFailed(String),

    /// A rendering operation failed during execution
    ///
    /// Reported by binds and draw calls. The scene render pass logs these and
    /// keeps going.
    #[error("Rendering failed: {0}")]
    RenderingFailed(String),

    /// Resource creation or management failed
    #[error("Resource creation failed: {0}")]
    ResourceCreationFailed(String),

    /// Backend-specific error occurred
    #[error("Backend error: {0}")]
    BackendError(String),
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;
