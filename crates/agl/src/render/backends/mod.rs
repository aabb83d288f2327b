//! Render backend implementations
//!
//! Contains concrete [`RenderBackend`](crate::render::RenderBackend)
//! implementations. On-screen GL contexts live outside this crate; the
//! headless backend renders nowhere and records what it was asked to do.

pub mod headless;

pub use headless::{BackendCall, HeadlessBackend, RenderCommand};
