//! Drawable scene nodes

use crate::foundation::math::Mat4;
use crate::render::api::{RenderFrame, ShaderUniform};
use crate::render::material::Material;
use crate::render::vertex::VertexBuffer;
use crate::render::RenderResult;

/// # Actor
///
/// A node that draws a mesh with a material. The mesh and any shader or
/// texture in the material are weak references: the backend owns them and
/// the scene never frees them.
#[derive(Debug, Clone, Default)]
pub struct Actor {
    /// Mesh to draw, actors without one only transform their children
    pub mesh: Option<VertexBuffer>,
    /// Render state
    pub material: Material,
}

impl Actor {
    /// Create an actor drawing `mesh` with the default material
    pub fn new(mesh: Option<VertexBuffer>) -> Self {
        Self {
            mesh,
            material: Material::default(),
        }
    }

    /// Set the material
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// Issue the draw for this actor
    ///
    /// Resolves a default shader on first use, binds shader, transform,
    /// diffuse color and texture, then draws. A failing call is logged and
    /// the remaining calls are still issued.
    pub(crate) fn draw(&mut self, world: &Mat4, view_projection: &Mat4, frame: &mut RenderFrame<'_>) {
        let Some(mesh) = &self.mesh else {
            return;
        };

        let shader = frame.shaders.resolve(&self.material, mesh);
        if self.material.shader.replace(shader).is_none() {
            log::debug!("Resolved default shader {:?}", shader);
        }

        let model_view_projection = view_projection * world;
        let backend = &mut *frame.backend;

        warn_on_failure("bind_shader", backend.bind_shader(shader));
        warn_on_failure(
            "bind(u_Transform)",
            backend.bind_matrix(ShaderUniform::Transform, &model_view_projection),
        );
        warn_on_failure(
            "bind(u_DiffuseColor)",
            backend.bind_color(ShaderUniform::DiffuseColor, self.material.color),
        );
        // a texture that is still loading has nothing to bind yet
        if let Some(texture) = self.material.texture.and_then(|t| t.handle()) {
            warn_on_failure(
                "bind(u_DiffuseTex)",
                backend.bind_texture(ShaderUniform::DiffuseTex, texture),
            );
        }
        warn_on_failure("mesh.draw", backend.draw(mesh));
    }
}

fn warn_on_failure(what: &str, result: RenderResult<()>) {
    if let Err(e) = result {
        log::warn!("{} failed: {}", what, e);
    }
}
