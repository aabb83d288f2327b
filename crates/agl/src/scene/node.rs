//! Scene nodes, node variants and per-node controllers

use bitflags::bitflags;

use crate::foundation::collections::NodeId;
use crate::foundation::math::{Mat4, Mat4Ext, Vec3};
use crate::scene::actor::Actor;
use crate::scene::camera::Camera;
use crate::scene::SceneRoot;

bitflags! {
    /// Capability tag of a node, plain nodes carry none
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NodeType: u8 {
        /// Node draws a mesh
        const ACTOR = 1 << 0;
        /// Node is the root of a scene
        const ROOT = 1 << 1;
        /// Node computes view and projection matrices
        const CAMERA = 1 << 2;
    }
}

/// Grouping node without behavior of its own, e.g. a pivot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlainNode;

/// Variant payload of a scene node
#[derive(Debug)]
pub enum NodeKind {
    /// Transform-only node
    Plain(PlainNode),
    /// Drawable node
    Actor(Actor),
    /// Camera node
    Camera(Camera),
    /// Scene root
    Root,
}

impl NodeKind {
    /// Capability tag of this variant
    pub fn node_type(&self) -> NodeType {
        match self {
            Self::Plain(_) => NodeType::empty(),
            Self::Actor(_) => NodeType::ACTOR,
            Self::Camera(_) => NodeType::CAMERA,
            Self::Root => NodeType::ROOT,
        }
    }
}

/// A concrete node variant that can be created as a child and cast back to
pub trait NodeVariant: Sized {
    /// Capability tag carried by nodes of this variant
    const TYPE: NodeType;

    /// Wrap the variant for storage in a node
    fn into_kind(self) -> NodeKind;

    /// Borrow the variant out of a node's payload
    fn from_kind(kind: &NodeKind) -> Option<&Self>;

    /// Mutably borrow the variant out of a node's payload
    fn from_kind_mut(kind: &mut NodeKind) -> Option<&mut Self>;
}

macro_rules! node_variant {
    ($ty:ident, $variant:ident, $tag:expr) => {
        impl NodeVariant for $ty {
            const TYPE: NodeType = $tag;

            fn into_kind(self) -> NodeKind {
                NodeKind::$variant(self)
            }

            fn from_kind(kind: &NodeKind) -> Option<&Self> {
                match kind {
                    NodeKind::$variant(v) => Some(v),
                    _ => None,
                }
            }

            fn from_kind_mut(kind: &mut NodeKind) -> Option<&mut Self> {
                match kind {
                    NodeKind::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

node_variant!(PlainNode, Plain, NodeType::empty());
node_variant!(Actor, Actor, NodeType::ACTOR);
node_variant!(Camera, Camera, NodeType::CAMERA);

/// Per-node behavior hooks run during traversal
///
/// The controller is detached from its node while it runs, so it receives
/// the whole scene mutably and may add, remove or reorder nodes, including
/// its own. Closures `FnMut(&mut SceneRoot, NodeId, f32)` are update-only
/// controllers.
pub trait NodeController {
    /// Called once per update pass before the node's children are updated
    fn update(&mut self, scene: &mut SceneRoot, node: NodeId, dt: f32);

    /// Called once per render pass with the node's world transform, before it draws
    fn render(&mut self, _scene: &mut SceneRoot, _node: NodeId, _world: &Mat4) {}
}

impl<F> NodeController for F
where
    F: FnMut(&mut SceneRoot, NodeId, f32),
{
    fn update(&mut self, scene: &mut SceneRoot, node: NodeId, dt: f32) {
        self(scene, node, dt);
    }
}

/// # Scene Node
///
/// A node of the scene tree: a name, a local transform, a variant payload and
/// an ordered list of owned children. Nodes are stored in the arena of their
/// [`SceneRoot`] and addressed by [`NodeId`].
pub struct SceneNode {
    name: String,
    /// Local position relative to the parent
    pub position: Vec3,
    /// Local per-axis scale
    pub scale: Vec3,
    /// Local rotation, XYZ Euler angles in degrees
    pub rotation: Vec3,
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) controller: Option<Box<dyn NodeController>>,
}

impl std::fmt::Debug for SceneNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneNode")
            .field("name", &self.name)
            .field("type", &self.node_type())
            .field("position", &self.position)
            .field("children", &self.children.len())
            .field("has_controller", &self.controller.is_some())
            .finish()
    }
}

impl SceneNode {
    pub(crate) fn new(name: impl Into<String>, kind: NodeKind, parent: Option<NodeId>) -> Self {
        Self {
            name: name.into(),
            position: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            rotation: Vec3::zeros(),
            kind,
            parent,
            children: Vec::new(),
            controller: None,
        }
    }

    /// Node name, not required to be unique
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the node
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Capability tag
    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    /// True if the node carries any of the capabilities in `ty`
    pub fn is(&self, ty: NodeType) -> bool {
        self.node_type().intersects(ty)
    }

    /// Variant payload
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Checked downcast to a concrete variant
    pub fn cast<T: NodeVariant>(&self) -> Option<&T> {
        T::from_kind(&self.kind)
    }

    /// Checked mutable downcast to a concrete variant
    pub fn cast_mut<T: NodeVariant>(&mut self) -> Option<&mut T> {
        T::from_kind_mut(&mut self.kind)
    }

    /// Parent node, `None` for the root
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in update and render order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Attach a controller, replacing any previous one
    pub fn set_controller(&mut self, controller: impl NodeController + 'static) {
        self.controller = Some(Box::new(controller));
    }

    /// Detach the controller
    pub fn clear_controller(&mut self) -> Option<Box<dyn NodeController>> {
        self.controller.take()
    }

    /// Set position
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Set rotation in degrees
    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
    }

    /// Set per-axis scale
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
    }

    /// `T(position) * R(rotation) * S(scale)`
    pub fn local_transform(&self) -> Mat4 {
        Mat4::affine_3d(&self.position, &self.scale, &self.rotation)
    }

    /// `parent_world * local_transform()`
    pub fn world_transform(&self, parent_world: &Mat4) -> Mat4 {
        parent_world * self.local_transform()
    }
}
