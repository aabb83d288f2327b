//! Basic scene demo
//!
//! Renders a small debug-geometry scene off-screen: a grey background, a
//! camera at (0, 10, 35) looking at (0, 15, 0) and a few spinning shapes.
//!
//! Usage: `basic_scene [config.toml|config.ron] [frames]`

use agl::foundation::logging;
use agl::prelude::*;
use thiserror::Error;

const DEFAULT_FRAMES: u32 = 3;
const FRAME_TIME: f32 = 1.0 / 60.0;

#[derive(Debug, Error)]
enum DemoError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("rendering: {0}")]
    Render(#[from] RenderError),

    #[error("invalid frame count '{0}'")]
    FrameCount(String),
}

/// Spins its node around Y at a fixed rate
struct Spinner {
    degrees_per_second: f32,
}

impl NodeController for Spinner {
    fn update(&mut self, scene: &mut SceneRoot, node: NodeId, dt: f32) {
        if let Some(node) = scene.node_mut(node) {
            node.rotation.y = (node.rotation.y + self.degrees_per_second * dt) % 360.0;
        }
    }
}

fn load_config(path: Option<&str>) -> Result<AglConfig, DemoError> {
    let config = match path {
        Some(path) => {
            log::info!("Loading configuration from {}", path);
            AglConfig::load_from_file(path)?
        }
        None => {
            let mut config = AglConfig::default();
            config.context = ContextConfig::new(800, 600).with_title("basic_scene");
            config.scene = config.scene.with_background(Color3::rgb(125, 125, 125));
            config
        }
    };
    Ok(config)
}

fn build_scene(context: &mut RenderContext) -> Result<(), DemoError> {
    let mut shapes = Draw3D::new();
    shapes.cube(Vec3::zeros(), 2.0, Color::rgb(200, 60, 60));
    shapes.hollow_cube(Vec3::zeros(), 2.5, 0.05, Color::WHITE);
    let cube = shapes.create_buffer(context.backend_mut())?;

    let mut ball = Draw3D::new();
    ball.sphere(Vec3::zeros(), 1.5, Color::rgb(60, 200, 90));
    ball.hollow_sphere(Vec3::zeros(), 1.6, Color::BLACK, 0.03);
    let sphere = ball.create_buffer(context.backend_mut())?;

    let mut column = Draw3D::new();
    column.cylinder(Vec3::zeros(), Vec3::new(0.0, 6.0, 0.0), 1.0, Color::rgb(60, 90, 200));
    let cylinder = column.create_buffer(context.backend_mut())?;

    let scene = context.create_scene_root("basic_scene");
    let camera = scene.camera_id();
    if let Some(node) = scene.node_mut(camera) {
        node.set_position(Vec3::new(0.0, 10.0, 35.0));
    }
    if let Some(camera) = scene.camera_mut() {
        camera.look_at_target(Vec3::new(0.0, 15.0, 0.0));
    }

    let root = scene.root();
    let turntable = scene.create_node(root, "turntable");
    if let Some(node) = scene.node_mut(turntable) {
        node.set_controller(Spinner { degrees_per_second: 45.0 });
    }

    let placements = [
        ("cube", cube, Vec3::new(-6.0, 0.0, 0.0)),
        ("sphere", sphere, Vec3::new(0.0, 8.0, 0.0)),
        ("cylinder", cylinder, Vec3::new(6.0, 0.0, 0.0)),
    ];
    for (name, mesh, position) in placements {
        let actor = scene.create_actor(turntable, name, mesh);
        if let Some(node) = scene.node_mut(actor) {
            node.set_position(position);
        }
    }

    log::info!("Scene '{}' has {} nodes", scene.name(), scene.len());
    Ok(())
}

fn run() -> Result<(), DemoError> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = load_config(args.first().map(String::as_str))?;
    let frames = match args.get(1) {
        Some(arg) => arg.parse::<u32>().map_err(|_| DemoError::FrameCount(arg.clone()))?,
        None => DEFAULT_FRAMES,
    };

    logging::init_with_filter(&config.logging.level);

    let mut context = RenderContext::headless(config)?;
    build_scene(&mut context)?;

    for _ in 0..frames {
        context.step(FRAME_TIME);
    }

    if let Some(backend) = context.backend().as_any().downcast_ref::<HeadlessBackend>() {
        log::info!(
            "Presented {} frames, {} draw calls",
            backend.frames_presented(),
            backend.draws().len()
        );
    }
    if let Some(ray) = context.unproject(400.0, 300.0) {
        log::info!("Center pixel ray: {:?} -> {:?}", ray.origin, ray.direction());
    }
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        logging::init();
        log::error!("basic_scene failed: {}", e);
        std::process::exit(1);
    }
}
