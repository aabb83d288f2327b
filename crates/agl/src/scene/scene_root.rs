//! # Scene Root
//!
//! The scene tree and its traversals. Nodes live in a generation-checked
//! arena; each node lists its children in insertion order, which is also the
//! update and render order.
//!
//! ## Traversal under mutation
//!
//! Controllers receive the whole scene mutably while they run, so a pass may
//! see children appended, removed or reordered underneath it. The child loops
//! re-read the parent's child list on every step and continue with the first
//! child not yet visited in this pass:
//!
//! - removing any children, the running one included, never skips a sibling
//! - a child appended during the pass is visited in the same pass
//! - a child is never visited twice in one pass, even if it moved
//!
//! Removing the parent itself ends the loop.

use crate::core::config::SceneConfig;
use crate::foundation::collections::{NodeId, NodeMap};
use crate::foundation::color::{Color, Color3};
use crate::foundation::math::{Mat4, Ray, Vec2};
use crate::render::api::{RenderBackend, RenderFrame};
use crate::render::material::{Material, TextureRef};
use crate::render::shader::ShaderRegistry;
use crate::render::vertex::VertexBuffer;
use crate::scene::actor::Actor;
use crate::scene::camera::Camera;
use crate::scene::node::{NodeController, NodeKind, NodeVariant, PlainNode, SceneNode};

/// Name of the pivot node above the default camera
pub const CAMERA_ARM_NAME: &str = "cameraArm";
/// Name of the default camera node
pub const CAMERA_NAME: &str = "camera";

/// Root of a scene: owns every node, the default camera and the clear color
pub struct SceneRoot {
    nodes: NodeMap<SceneNode>,
    root: NodeId,
    camera_arm: NodeId,
    camera: NodeId,
    /// Color the frame is cleared with
    pub background_color: Color3,
}

impl std::fmt::Debug for SceneRoot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneRoot")
            .field("name", &self.nodes[self.root].name())
            .field("nodes", &self.nodes.len())
            .field("background_color", &self.background_color)
            .finish()
    }
}

impl SceneRoot {
    /// Create a scene with a camera rig built from `config`
    ///
    /// The rig is a plain `cameraArm` pivot under the root with the default
    /// `camera` below it.
    pub fn new(name: impl Into<String>, config: &SceneConfig) -> Self {
        let mut nodes = NodeMap::with_key();
        let root = nodes.insert(SceneNode::new(name, NodeKind::Root, None));

        let mut scene = Self {
            nodes,
            root,
            camera_arm: root,
            camera: root,
            background_color: config.background_color,
        };

        scene.camera_arm = scene.create_node(root, CAMERA_ARM_NAME);
        scene.camera = scene.add_child(scene.camera_arm, CAMERA_NAME, Camera::from_config(&config.camera));
        if let Some(camera) = scene.nodes.get_mut(scene.camera) {
            camera.position = config.camera.position;
            camera.rotation = config.camera.rotation;
        }

        log::info!("Created scene '{}'", scene.nodes[root].name());
        scene
    }

    // ---- node creation ----

    /// Create a default-constructed node of variant `T` under `parent`
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a node of this scene.
    pub fn create_child<T: NodeVariant + Default>(&mut self, parent: NodeId, name: impl Into<String>) -> NodeId {
        self.add_child(parent, name, T::default())
    }

    /// Append `variant` as the last child of `parent`
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a node of this scene.
    pub fn add_child<T: NodeVariant>(&mut self, parent: NodeId, name: impl Into<String>, variant: T) -> NodeId {
        assert!(self.nodes.contains_key(parent), "unknown parent node {:?}", parent);

        let node = SceneNode::new(name, variant.into_kind(), Some(parent));
        log::trace!("Adding {:?} node '{}'", node.node_type(), node.name());
        let id = self.nodes.insert(node);
        self.nodes[parent].children.push(id);
        id
    }

    /// Create a plain grouping node
    pub fn create_node(&mut self, parent: NodeId, name: impl Into<String>) -> NodeId {
        self.create_child::<PlainNode>(parent, name)
    }

    /// Create an actor drawing `mesh` with the default material
    pub fn create_actor(&mut self, parent: NodeId, name: impl Into<String>, mesh: Option<VertexBuffer>) -> NodeId {
        self.add_child(parent, name, Actor::new(mesh))
    }

    /// Create an actor drawing `mesh` with a diffuse color
    pub fn create_actor_with_color(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        mesh: Option<VertexBuffer>,
        color: Color,
    ) -> NodeId {
        let actor = Actor::new(mesh).with_material(Material::default().with_color(color));
        self.add_child(parent, name, actor)
    }

    /// Create an actor drawing `mesh` with a diffuse texture
    pub fn create_actor_with_texture(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        mesh: Option<VertexBuffer>,
        texture: TextureRef,
    ) -> NodeId {
        let actor = Actor::new(mesh).with_material(Material::default().with_texture(texture));
        self.add_child(parent, name, actor)
    }

    /// Create an additional camera with default projection parameters
    pub fn create_camera(&mut self, parent: NodeId, name: impl Into<String>) -> NodeId {
        self.create_child::<Camera>(parent, name)
    }

    /// Remove a node and its whole subtree
    ///
    /// The root and the default camera rig cannot be removed. Returns `false`
    /// if nothing was removed.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        if id == self.root || id == self.camera_arm || id == self.camera {
            log::warn!("Refusing to remove a node of the scene rig");
            return false;
        }
        let Some(parent) = self.nodes.get(id).map(|n| n.parent) else {
            return false;
        };

        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(p)) {
            parent.children.retain(|&c| c != id);
        }

        let mut pending = vec![id];
        let mut removed = 0;
        while let Some(next) = pending.pop() {
            if let Some(node) = self.nodes.remove(next) {
                pending.extend(node.children);
                removed += 1;
            }
        }
        log::trace!("Removed {} nodes", removed);
        true
    }

    // ---- access ----

    /// True if `id` is a live node of this scene
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of live nodes, root and camera rig included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false, a scene holds at least its root and camera rig
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node by id
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    /// Mutable node by id
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id)
    }

    /// Root node
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Scene name, the name of the root node
    pub fn name(&self) -> &str {
        self.nodes[self.root].name()
    }

    /// Pivot node above the default camera
    pub fn camera_arm_id(&self) -> NodeId {
        self.camera_arm
    }

    /// Default camera node
    pub fn camera_id(&self) -> NodeId {
        self.camera
    }

    /// Default camera
    pub fn camera(&self) -> Option<&Camera> {
        self.nodes.get(self.camera).and_then(|n| n.cast::<Camera>())
    }

    /// Mutable default camera
    pub fn camera_mut(&mut self) -> Option<&mut Camera> {
        self.nodes.get_mut(self.camera).and_then(|n| n.cast_mut::<Camera>())
    }

    /// Actor payload of a node
    pub fn actor(&self, id: NodeId) -> Option<&Actor> {
        self.nodes.get(id).and_then(|n| n.cast::<Actor>())
    }

    /// Mutable actor payload of a node
    pub fn actor_mut(&mut self, id: NodeId) -> Option<&mut Actor> {
        self.nodes.get_mut(id).and_then(|n| n.cast_mut::<Actor>())
    }

    /// First actor named `name`, in pre-order
    pub fn find_actor(&self, name: &str) -> Option<NodeId> {
        let mut pending = vec![self.root];
        while let Some(id) = pending.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            if node.cast::<Actor>().is_some() && node.name() == name {
                return Some(id);
            }
            pending.extend(node.children.iter().rev().copied());
        }
        None
    }

    // ---- transforms ----

    /// Local transform of a node, identity for unknown ids
    pub fn local_transform(&self, id: NodeId) -> Mat4 {
        self.nodes.get(id).map_or_else(Mat4::identity, SceneNode::local_transform)
    }

    /// `parent_world * local_transform(id)`
    pub fn world_transform(&self, id: NodeId, parent_world: &Mat4) -> Mat4 {
        parent_world * self.local_transform(id)
    }

    /// Product of the local transforms of every ancestor, root side first
    ///
    /// Identity for the root and for unknown ids.
    pub fn parent_world_transform(&self, id: NodeId) -> Mat4 {
        let mut acc = Mat4::identity();
        let mut current = self.nodes.get(id).and_then(|n| n.parent);
        while let Some(ancestor) = current.and_then(|p| self.nodes.get(p)) {
            acc = ancestor.local_transform() * acc;
            current = ancestor.parent;
        }
        acc
    }

    /// World transform of a node computed from its ancestors
    pub fn node_world_transform(&self, id: NodeId) -> Mat4 {
        self.world_transform(id, &self.parent_world_transform(id))
    }

    // ---- camera ----

    /// Refresh the matrices of camera `id` for `viewport`
    ///
    /// Returns `false` if `id` is not a camera.
    pub fn update_camera(&mut self, id: NodeId, viewport: (u32, u32)) -> bool {
        let parent_world = self.parent_world_transform(id);
        let Some(node) = self.nodes.get_mut(id) else {
            return false;
        };
        let local = node.local_transform();
        let position = node.position;
        match node.cast_mut::<Camera>() {
            Some(camera) => {
                camera.update_view_projection(&local, &position, viewport, &parent_world);
                true
            }
            None => false,
        }
    }

    /// World-space ray through a screen pixel of the default camera
    pub fn unproject(&self, screen: Vec2, viewport: (u32, u32)) -> Option<Ray> {
        self.camera()?.unproject(screen, viewport)
    }

    // ---- traversal ----

    /// Run one update pass over the whole tree
    pub fn update(&mut self, dt: f32) {
        let root = self.root;
        self.update_node(root, dt);
    }

    fn update_node(&mut self, id: NodeId, dt: f32) {
        if let Some(mut controller) = self.nodes.get_mut(id).and_then(|n| n.controller.take()) {
            controller.update(self, id, dt);
            self.restore_controller(id, controller);
        }
        self.for_each_child(id, |scene, child| scene.update_node(child, dt));
    }

    /// Render one frame: camera refresh, clear, draw every node, present
    ///
    /// Failing clear or present calls are logged and the frame continues.
    pub fn render(&mut self, backend: &mut dyn RenderBackend, shaders: &ShaderRegistry) {
        let camera = self.camera;
        if !self.update_camera(camera, backend.viewport()) {
            log::warn!("Scene '{}' has no default camera", self.name());
        }
        let view_projection = self.camera().map_or_else(Mat4::identity, |c| *c.view_projection());

        if let Err(e) = backend.clear(self.background_color) {
            log::warn!("clear failed: {}", e);
        }

        let mut frame = RenderFrame::new(backend, shaders);
        let root = self.root;
        self.render_node(root, &Mat4::identity(), &view_projection, &mut frame);

        if let Err(e) = frame.backend.swap_buffers() {
            log::warn!("swap_buffers failed: {}", e);
        }
    }

    fn render_node(&mut self, id: NodeId, parent_world: &Mat4, view_projection: &Mat4, frame: &mut RenderFrame<'_>) {
        let world = self.world_transform(id, parent_world);

        if let Some(mut controller) = self.nodes.get_mut(id).and_then(|n| n.controller.take()) {
            controller.render(self, id, &world);
            self.restore_controller(id, controller);
        }

        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        log::trace!("Rendering '{}'", node.name());
        if let NodeKind::Actor(actor) = &mut node.kind {
            actor.draw(&world, view_projection, frame);
        }

        self.for_each_child(id, |scene, child| {
            scene.render_node(child, &world, view_projection, &mut *frame)
        });
    }

    fn restore_controller(&mut self, id: NodeId, controller: Box<dyn NodeController>) {
        // the controller may have removed its node or installed a replacement
        if let Some(node) = self.nodes.get_mut(id) {
            if node.controller.is_none() {
                node.controller = Some(controller);
            }
        }
    }

    fn for_each_child(&mut self, parent: NodeId, mut visit: impl FnMut(&mut Self, NodeId)) {
        let mut visited: Vec<NodeId> = Vec::new();
        loop {
            let next = self
                .nodes
                .get(parent)
                .and_then(|n| n.children.iter().copied().find(|c| !visited.contains(c)));
            let Some(child) = next else {
                break;
            };
            visited.push(child);
            visit(self, child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use approx::assert_relative_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn scene() -> SceneRoot {
        SceneRoot::new("test", &SceneConfig::default())
    }

    fn recorder(log: &Rc<RefCell<Vec<String>>>) -> impl FnMut(&mut SceneRoot, NodeId, f32) + 'static {
        let log = Rc::clone(log);
        move |scene: &mut SceneRoot, id: NodeId, _dt: f32| {
            if let Some(node) = scene.node(id) {
                log.borrow_mut().push(node.name().to_string());
            }
        }
    }

    #[test]
    fn test_camera_rig_is_created() {
        let scene = scene();
        let arm = scene.node(scene.camera_arm_id()).unwrap();
        assert_eq!(arm.name(), CAMERA_ARM_NAME);
        assert_eq!(arm.parent(), Some(scene.root()));

        let camera = scene.node(scene.camera_id()).unwrap();
        assert_eq!(camera.name(), CAMERA_NAME);
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 25.0));
        assert!(scene.camera().is_some());
        assert_eq!(scene.len(), 3);
    }

    #[test]
    #[should_panic(expected = "unknown parent node")]
    fn test_unknown_parent_panics() {
        let mut scene = scene();
        let node = scene.create_node(scene.root(), "gone");
        scene.remove_node(node);
        scene.create_node(node, "orphan");
    }

    #[test]
    fn test_world_matches_parent_world_at_depth() {
        let mut scene = scene();
        let mut parent = scene.root();
        let mut world = Mat4::identity();
        for depth in 0..5 {
            let id = scene.create_node(parent, format!("n{}", depth));
            let node = scene.node_mut(id).unwrap();
            node.set_position(Vec3::new(depth as f32, 1.0, -2.0));
            node.set_rotation(Vec3::new(10.0 * depth as f32, 20.0, 5.0));
            node.set_scale(Vec3::new(1.0, 0.5 + depth as f32, 2.0));

            world = scene.world_transform(id, &world);
            assert_relative_eq!(scene.parent_world_transform(id), scene.node_world_transform(parent), epsilon = 1e-4);
            assert_relative_eq!(scene.node_world_transform(id), world, epsilon = 1e-4);
            parent = id;
        }
    }

    #[test]
    fn test_remove_node_drops_subtree() {
        let mut scene = scene();
        let a = scene.create_node(scene.root(), "a");
        let b = scene.create_node(a, "b");
        let c = scene.create_actor(b, "c", None);

        assert!(scene.remove_node(a));
        assert!(!scene.contains(b));
        assert!(!scene.contains(c));
        assert!(!scene.remove_node(a));
        assert!(!scene.remove_node(scene.camera_id()));
        assert!(!scene.remove_node(scene.root()));
        assert_eq!(scene.node(scene.root()).unwrap().children(), &[scene.camera_arm_id()]);
    }

    #[test]
    fn test_find_actor_is_pre_order() {
        let mut scene = scene();
        let group = scene.create_node(scene.root(), "group");
        let deep = scene.create_actor(group, "target", None);
        scene.create_actor(scene.root(), "target", None);
        scene.create_node(scene.root(), "target");

        assert_eq!(scene.find_actor("target"), Some(deep));
        assert_eq!(scene.find_actor("missing"), None);
    }

    #[test]
    fn test_update_order_is_deterministic() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scene = scene();
        let a = scene.create_node(scene.root(), "a");
        let a1 = scene.create_node(a, "a1");
        let b = scene.create_node(scene.root(), "b");
        for id in [a, a1, b] {
            scene.node_mut(id).unwrap().set_controller(recorder(&log));
        }

        scene.update(0.1);
        scene.update(0.1);
        assert_eq!(*log.borrow(), ["a", "a1", "b", "a", "a1", "b"]);
    }

    #[test]
    fn test_update_tolerates_removal_and_append() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scene = scene();
        let root = scene.root();
        let a = scene.create_node(root, "a");
        let b = scene.create_node(root, "b");
        scene.node_mut(b).unwrap().set_controller(recorder(&log));

        let log_a = Rc::clone(&log);
        scene.node_mut(a).unwrap().set_controller(move |scene: &mut SceneRoot, id: NodeId, _dt: f32| {
            log_a.borrow_mut().push("a".to_string());
            // remove itself, then append a new sibling
            let root = scene.root();
            scene.remove_node(id);
            let c = scene.create_node(root, "c");
            let log_c = Rc::clone(&log_a);
            scene.node_mut(c).unwrap().set_controller(move |scene: &mut SceneRoot, id: NodeId, _dt: f32| {
                log_c.borrow_mut().push(scene.node(id).unwrap().name().to_string());
            });
        });

        scene.update(0.0);
        assert_eq!(*log.borrow(), ["a", "b", "c"]);
        assert!(!scene.contains(a));
    }

    #[test]
    fn test_update_survives_removing_self_and_earlier_sibling() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scene = scene();
        let root = scene.root();
        let a = scene.create_node(root, "a");
        let b = scene.create_node(root, "b");
        let c = scene.create_node(root, "c");
        scene.node_mut(c).unwrap().set_controller(recorder(&log));

        let log_b = Rc::clone(&log);
        scene.node_mut(b).unwrap().set_controller(move |scene: &mut SceneRoot, id: NodeId, _dt: f32| {
            log_b.borrow_mut().push("b".to_string());
            scene.remove_node(a);
            scene.remove_node(id);
        });

        scene.update(0.0);
        assert_eq!(*log.borrow(), ["b", "c"]);
        assert!(!scene.contains(a) && !scene.contains(b));
    }

    #[test]
    fn test_update_never_revisits_reordered_child() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scene = scene();
        let root = scene.root();
        let a = scene.create_node(root, "a");
        let b = scene.create_node(root, "b");
        scene.node_mut(a).unwrap().set_controller(recorder(&log));

        let log_b = Rc::clone(&log);
        scene.node_mut(b).unwrap().set_controller(move |scene: &mut SceneRoot, id: NodeId, _dt: f32| {
            log_b.borrow_mut().push("b".to_string());
            // move to the front on every update
            let root = scene.root();
            let children = &mut scene.node_mut(root).unwrap().children;
            children.retain(|&c| c != id);
            children.insert(0, id);
        });

        scene.update(0.0);
        assert_eq!(*log.borrow(), ["a", "b"]);
    }

    #[test]
    fn test_controller_survives_and_can_be_replaced() {
        let count = Rc::new(RefCell::new(0));
        let mut scene = scene();
        let a = scene.create_node(scene.root(), "a");
        let counter = Rc::clone(&count);
        scene.node_mut(a).unwrap().set_controller(move |scene: &mut SceneRoot, id: NodeId, _dt: f32| {
            *counter.borrow_mut() += 1;
            scene.node_mut(id).unwrap().position.x += 1.0;
        });

        scene.update(0.0);
        scene.update(0.0);
        assert_eq!(*count.borrow(), 2);
        assert_eq!(scene.node(a).unwrap().position.x, 2.0);

        // a replacement installed while running wins over the running controller
        let counter = Rc::clone(&count);
        scene.node_mut(a).unwrap().set_controller(move |scene: &mut SceneRoot, id: NodeId, _dt: f32| {
            let counter = Rc::clone(&counter);
            scene.node_mut(id).unwrap().set_controller(move |_: &mut SceneRoot, _: NodeId, _: f32| {
                *counter.borrow_mut() += 10;
            });
        });
        scene.update(0.0);
        scene.update(0.0);
        scene.update(0.0);
        assert_eq!(*count.borrow(), 22);
    }

    #[test]
    fn test_update_camera_rejects_non_camera() {
        let mut scene = scene();
        let plain = scene.create_node(scene.root(), "plain");
        assert!(!scene.update_camera(plain, (800, 600)));
        assert!(scene.update_camera(scene.camera_id(), (800, 600)));
    }

    #[test]
    fn test_camera_arm_orbits_camera() {
        let mut scene = scene();
        let arm = scene.camera_arm_id();
        scene.node_mut(arm).unwrap().set_rotation(Vec3::new(0.0, 90.0, 0.0));
        scene.update_camera(scene.camera_id(), (800, 600));

        let vp = *scene.camera().unwrap().view_projection();
        let local = scene.local_transform(scene.camera_id()).try_inverse().unwrap();
        let expected = scene.camera().unwrap().projection() * local * scene.local_transform(arm);
        assert_relative_eq!(vp, expected, epsilon = 1e-5);
    }

    #[test]
    fn test_render_applies_root_transform() {
        use crate::geometry::Draw3D;
        use crate::render::api::ShaderUniform;
        use crate::render::backends::{HeadlessBackend, RenderCommand};

        let mut backend = HeadlessBackend::new(800, 600);
        let shaders = ShaderRegistry::load(&mut backend).unwrap();
        let mut cube = Draw3D::new();
        cube.cube(Vec3::zeros(), 1.0, Color::RED);
        let mesh = cube.create_buffer(&mut backend).unwrap();

        let mut scene = scene();
        let root = scene.root();
        scene.node_mut(root).unwrap().set_position(Vec3::new(5.0, 0.0, 0.0));
        let actor = scene.create_actor(root, "cube", mesh);
        scene.render(&mut backend, &shaders);

        let world = scene.node_world_transform(actor);
        assert_eq!(world[(0, 3)], 5.0);
        let expected = scene.camera().unwrap().view_projection() * world;
        assert!(backend
            .commands()
            .contains(&RenderCommand::BindMatrix(ShaderUniform::Transform, expected)));
    }
}
