//! Scene graph
//!
//! A tree of transform nodes rooted in a [`SceneRoot`]. Every scene owns a
//! default camera below a `cameraArm` pivot; actors draw their mesh with the
//! camera's view-projection during [`SceneRoot::render`].
//!
//! ```text
//! root
//!  ├─ cameraArm
//!  │   └─ camera
//!  └─ actors and grouping nodes...
//! ```

mod actor;
mod camera;
mod node;
mod scene_root;

pub use actor::Actor;
pub use camera::Camera;
pub use node::{NodeController, NodeKind, NodeType, NodeVariant, PlainNode, SceneNode};
pub use scene_root::{SceneRoot, CAMERA_ARM_NAME, CAMERA_NAME};
