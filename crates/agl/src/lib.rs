//! # AGL
//!
//! A thin rendering toolkit: a scene graph of transform nodes with a default
//! camera, actors that draw meshes with materials, and generators for 2D and
//! 3D debug geometry.
//!
//! ## Features
//!
//! - **Scene graph**: arena-backed node tree with per-node controllers that
//!   may reshape the tree while it is traversed
//! - **Camera**: free or look-at view, perspective projection, unprojection
//!   of screen pixels into world rays
//! - **Default materials**: a shader is picked per actor from its texture and
//!   vertex layout when none is set
//! - **Debug geometry**: anti-aliased 2D lines, rectangles and circles; 3D
//!   lines, boxes, prisms, spheres and cylinders
//! - **Headless backend**: off-screen rendering for tools and tests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use agl::prelude::*;
//!
//! fn main() -> Result<(), RenderError> {
//!     let mut context = RenderContext::headless(AglConfig::default())?;
//!
//!     let mut cube = Draw3D::new();
//!     cube.cube(Vec3::zeros(), 2.0, Color::RED);
//!     let mesh = cube.create_buffer(context.backend_mut())?;
//!
//!     let scene = context.create_scene_root("main");
//!     let actor = scene.create_actor(scene.root(), "cube", mesh);
//!     if let Some(node) = scene.node_mut(actor) {
//!         node.set_controller(|scene: &mut SceneRoot, id: NodeId, dt: f32| {
//!             if let Some(node) = scene.node_mut(id) {
//!                 node.rotation.y += 90.0 * dt;
//!             }
//!         });
//!     }
//!
//!     context.update_and_render();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod core;
pub mod foundation;
pub mod geometry;
pub mod render;
pub mod scene;

/// Common imports for toolkit users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        core::config::{AglConfig, CameraConfig, ContextConfig, LoggingConfig, SceneConfig},
        foundation::{
            collections::NodeId,
            color::{Color, Color3},
            math::{Mat4, Mat4Ext, Ray, Vec2, Vec3},
            time::Timer,
        },
        geometry::{DebugCircle, DebugRect, Draw2D, Draw3D, GeometryBuilder},
        render::{
            HeadlessBackend, Material, RenderBackend, RenderContext, RenderError, RenderResult, TextureRef,
            VertexBuffer,
        },
        scene::{Actor, Camera, NodeController, NodeType, PlainNode, SceneNode, SceneRoot},
    };
}
