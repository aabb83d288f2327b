//! # Core Module
//!
//! Shared configuration types used by the render context, the scene and the
//! demo application.
//!
//! ## Organization
//!
//! - **Config**: Unified configuration for the context, scene and logging

pub mod config;

// Re-export commonly used config types
pub use config::{AglConfig, CameraConfig, ContextConfig, LoggingConfig, SceneConfig};
