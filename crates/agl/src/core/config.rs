//! # Unified Configuration
//!
//! All configuration structures for the toolkit: the render context, the scene
//! and its default camera, and logging. Every structure has sensible defaults,
//! builder-style setters and can be loaded from TOML or RON through [`Config`].

use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError};
use crate::foundation::color::Color3;
use crate::foundation::math::Vec3;

/// # Render Context Configuration
///
/// Size and title of the render target.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Width of the window or off-screen target in pixels
    pub width: u32,
    /// Height of the window or off-screen target in pixels
    pub height: u32,
    /// Window title
    pub title: String,
}

impl ContextConfig {
    /// Create a context configuration for the given target size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Set window title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidValue {
                field: "context.width/height",
                reason: format!("target size must be non-zero, got {}x{}", self.width, self.height),
            });
        }
        Ok(())
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "AGL".to_string(),
        }
    }
}

/// # Camera Configuration
///
/// Placement and projection of the default scene camera. The default camera
/// looks into the screen from Z=25; Y is up and Z points out of the screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Local camera position relative to the camera arm
    pub position: Vec3,
    /// Local camera rotation, XYZ Euler degrees
    pub rotation: Vec3,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
}

impl CameraConfig {
    /// Set camera position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Set vertical field of view
    pub fn with_fov(mut self, fov_degrees: f32) -> Self {
        self.fov_degrees = fov_degrees;
        self
    }

    /// Set depth range
    pub fn with_depth_range(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(ConfigError::InvalidValue {
                field: "scene.camera.fov_degrees",
                reason: format!("must be within (0, 180), got {}", self.fov_degrees),
            });
        }
        if !(self.near > 0.0 && self.far > self.near) {
            return Err(ConfigError::InvalidValue {
                field: "scene.camera.near/far",
                reason: format!("expected 0 < near < far, got {} / {}", self.near, self.far),
            });
        }
        Ok(())
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 25.0),
            rotation: Vec3::zeros(),
            fov_degrees: 60.0,
            near: 0.001,
            far: 10000.0,
        }
    }
}

/// # Scene Configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Color the frame is cleared to before drawing
    pub background_color: Color3,
    /// Default camera rig
    pub camera: CameraConfig,
}

impl SceneConfig {
    /// Set background color
    pub fn with_background(mut self, color: Color3) -> Self {
        self.background_color = color;
        self
    }

    /// Set default camera configuration
    pub fn with_camera(mut self, camera: CameraConfig) -> Self {
        self.camera = camera;
        self
    }
}

/// # Logging Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `env_logger` filter, overridden by `RUST_LOG`
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// # Complete Toolkit Configuration
///
/// Top-level configuration that encompasses all subsystems.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AglConfig {
    /// Render target configuration
    pub context: ContextConfig,
    /// Scene configuration
    pub scene: SceneConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AglConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.context.validate()?;
        self.scene.camera.validate()?;
        Ok(())
    }
}

impl Config for AglConfig {}
