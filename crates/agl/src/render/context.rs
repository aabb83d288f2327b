//! # Render Context
//!
//! Entry point of the toolkit. A context owns the render backend, the
//! default shaders loaded through it, the frame timer and at most one scene.
//!
//! ```rust,no_run
//! use agl::prelude::*;
//!
//! let mut context = RenderContext::headless(AglConfig::default())?;
//! context.create_scene_root("main");
//! context.update_and_render();
//! # Ok::<(), RenderError>(())
//! ```

use crate::core::config::AglConfig;
use crate::foundation::math::{Ray, Vec2};
use crate::foundation::time::Timer;
use crate::render::api::RenderBackend;
use crate::render::backends::HeadlessBackend;
use crate::render::shader::ShaderRegistry;
use crate::render::vertex::{Vertex, VertexBuffer};
use crate::render::{RenderError, RenderResult};
use crate::scene::SceneRoot;

/// Backend, default shaders, timer and scene of one rendering surface
pub struct RenderContext {
    backend: Box<dyn RenderBackend>,
    shaders: ShaderRegistry,
    timer: Timer,
    scene: Option<SceneRoot>,
    config: AglConfig,
}

impl std::fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("viewport", &self.backend.viewport())
            .field("shaders", &self.shaders)
            .field("scene", &self.scene)
            .finish_non_exhaustive()
    }
}

impl RenderContext {
    /// Create a context on top of `backend`
    ///
    /// Validates `config` and loads the default shaders. Either failing is an
    /// [`RenderError::InitializationFailed`].
    pub fn new(config: AglConfig, mut backend: Box<dyn RenderBackend>) -> RenderResult<Self> {
        config.validate().map_err(|e| {
            log::error!("Invalid configuration: {}", e);
            RenderError::InitializationFailed(format!("invalid configuration: {}", e))
        })?;

        let shaders = ShaderRegistry::load(backend.as_mut())?;
        let (width, height) = backend.viewport();
        log::info!("Created render context '{}' ({}x{})", config.context.title, width, height);

        Ok(Self {
            backend,
            shaders,
            timer: Timer::new(),
            scene: None,
            config,
        })
    }

    /// Create a context rendering off-screen at the configured size
    pub fn headless(config: AglConfig) -> RenderResult<Self> {
        let backend = HeadlessBackend::new(config.context.width, config.context.height);
        Self::new(config, Box::new(backend))
    }

    /// Create the scene of this context, replacing any previous one
    pub fn create_scene_root(&mut self, name: impl Into<String>) -> &mut SceneRoot {
        if self.scene.is_some() {
            log::info!("Replacing existing scene");
        }
        self.scene.insert(SceneRoot::new(name, &self.config.scene))
    }

    /// Scene, if one was created
    pub fn scene_root(&self) -> Option<&SceneRoot> {
        self.scene.as_ref()
    }

    /// Mutable scene, if one was created
    pub fn scene_root_mut(&mut self) -> Option<&mut SceneRoot> {
        self.scene.as_mut()
    }

    /// Advance the timer, then update and render the scene
    ///
    /// Returns the frame's delta time in seconds.
    pub fn update_and_render(&mut self) -> f32 {
        let dt = self.timer.tick();
        self.step(dt);
        dt
    }

    /// Update the scene by `dt` seconds and render one frame
    ///
    /// Does nothing without a scene.
    pub fn step(&mut self, dt: f32) {
        let Some(scene) = self.scene.as_mut() else {
            log::trace!("No scene to render");
            return;
        };
        scene.update(dt);
        scene.render(self.backend.as_mut(), &self.shaders);
    }

    /// Viewport size in pixels
    pub fn viewport(&self) -> (u32, u32) {
        self.backend.viewport()
    }

    /// World-space ray through a screen pixel of the scene's default camera
    pub fn unproject(&self, x: f32, y: f32) -> Option<Ray> {
        self.scene.as_ref()?.unproject(Vec2::new(x, y), self.viewport())
    }

    /// Upload vertices and triangle indices into a new buffer
    pub fn create_vertex_buffer<V: Vertex>(&mut self, vertices: &[V], indices: &[u32]) -> RenderResult<VertexBuffer> {
        self.backend
            .create_vertex_buffer(V::FORMAT, bytemuck::cast_slice(vertices), indices)
    }

    /// Render backend
    pub fn backend(&self) -> &dyn RenderBackend {
        self.backend.as_ref()
    }

    /// Mutable render backend
    pub fn backend_mut(&mut self) -> &mut dyn RenderBackend {
        self.backend.as_mut()
    }

    /// Default shaders
    pub fn shaders(&self) -> &ShaderRegistry {
        &self.shaders
    }

    /// Frame timer
    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Configuration the context was created with
    pub fn config(&self) -> &AglConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ContextConfig;
    use crate::render::backends::{BackendCall, RenderCommand};

    fn headless_backend(context: &RenderContext) -> &HeadlessBackend {
        context.backend().as_any().downcast_ref::<HeadlessBackend>().unwrap()
    }

    #[test]
    fn test_context_loads_default_shaders() {
        let context = RenderContext::headless(AglConfig::default()).unwrap();
        assert_eq!(context.viewport(), (800, 600));
        let backend = headless_backend(&context);
        for shader in crate::render::DefaultShader::ALL {
            assert_eq!(backend.shader_name(context.shaders().get(shader)), Some(shader.name()));
        }
    }

    #[test]
    fn test_invalid_config_fails_initialization() {
        let mut config = AglConfig::default();
        config.context = ContextConfig::new(0, 600);
        assert!(matches!(
            RenderContext::headless(config),
            Err(RenderError::InitializationFailed(_))
        ));
    }

    #[test]
    fn test_shader_load_failure_fails_initialization() {
        let mut backend = HeadlessBackend::new(64, 64);
        backend.fail_on(BackendCall::LoadShader);
        assert!(matches!(
            RenderContext::new(AglConfig::default(), Box::new(backend)),
            Err(RenderError::InitializationFailed(_))
        ));
    }

    #[test]
    fn test_step_without_scene_is_noop() {
        let mut context = RenderContext::headless(AglConfig::default()).unwrap();
        context.step(0.016);
        assert!(headless_backend(&context).commands().is_empty());
        assert!(context.unproject(400.0, 300.0).is_none());
    }

    #[test]
    fn test_update_and_render_presents_a_frame() {
        let mut context = RenderContext::headless(AglConfig::default()).unwrap();
        context.create_scene_root("main");
        let dt = context.update_and_render();
        assert!(dt >= 0.0);
        assert_eq!(context.timer().frame_count(), 1);

        let backend = headless_backend(&context);
        assert_eq!(backend.frames_presented(), 1);
        assert_eq!(backend.commands().first(), Some(&RenderCommand::Clear(context.config().scene.background_color)));
        assert_eq!(backend.commands().last(), Some(&RenderCommand::SwapBuffers));
        assert!(context.unproject(400.0, 300.0).is_some());
    }
}
