//! Public rendering API
//!
//! This module contains the backend trait every render target implements,
//! the opaque resource handles it hands out, and the per-frame state passed
//! down the scene traversal.

pub mod frame;
pub mod render_backend;

// Re-export commonly used types
pub use frame::RenderFrame;
pub use render_backend::{RenderBackend, ShaderHandle, ShaderUniform, TextureHandle};
