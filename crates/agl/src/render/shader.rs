//! Default shader registry
//!
//! Actors without an explicit shader fall back to one of three built-in
//! programs. The registry is created once per [`RenderContext`](crate::render::RenderContext)
//! and handed to the render pass.

use crate::render::api::{RenderBackend, ShaderHandle};
use crate::render::material::Material;
use crate::render::vertex::{VertexAttributes, VertexBuffer};
use crate::render::{RenderError, RenderResult};

/// Built-in shader programs used for default material resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefaultShader {
    /// Flat diffuse color
    Color3d,
    /// Per-vertex color multiplied by diffuse color
    VertexColor3d,
    /// Diffuse texture multiplied by diffuse color
    Simple3d,
}

impl DefaultShader {
    /// All default shaders, in load order
    pub const ALL: [Self; 3] = [Self::Color3d, Self::VertexColor3d, Self::Simple3d];

    /// Program name passed to [`RenderBackend::load_shader`]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Color3d => "color3d",
            Self::VertexColor3d => "vertexcolor",
            Self::Simple3d => "simple3d",
        }
    }

    /// Pick the default shader for a mesh drawn with `material`
    ///
    /// Priority: textured, then vertex colored, then flat color.
    pub fn select(material: &Material, mesh: &VertexBuffer) -> Self {
        if material.texture.is_some() {
            Self::Simple3d
        } else if mesh.has_attrib(VertexAttributes::COLOR) {
            Self::VertexColor3d
        } else {
            Self::Color3d
        }
    }
}

/// Handles of the loaded default shaders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderRegistry {
    color3d: ShaderHandle,
    vertex_color3d: ShaderHandle,
    simple3d: ShaderHandle,
}

impl ShaderRegistry {
    /// Load every default shader through `backend`
    ///
    /// A context cannot render without its defaults, so any failure is
    /// reported as [`RenderError::InitializationFailed`].
    pub fn load(backend: &mut dyn RenderBackend) -> RenderResult<Self> {
        let mut load = |shader: DefaultShader| {
            backend.load_shader(shader.name()).map_err(|e| {
                log::error!("Failed to load default shader '{}': {}", shader.name(), e);
                RenderError::InitializationFailed(format!(
                    "default shader '{}' failed to load: {}",
                    shader.name(),
                    e
                ))
            })
        };

        let registry = Self {
            color3d: load(DefaultShader::Color3d)?,
            vertex_color3d: load(DefaultShader::VertexColor3d)?,
            simple3d: load(DefaultShader::Simple3d)?,
        };
        log::debug!("Loaded {} default shaders", DefaultShader::ALL.len());
        Ok(registry)
    }

    /// Build a registry from already loaded handles
    pub fn from_handles(color3d: ShaderHandle, vertex_color3d: ShaderHandle, simple3d: ShaderHandle) -> Self {
        Self {
            color3d,
            vertex_color3d,
            simple3d,
        }
    }

    /// Handle of a default shader
    pub fn get(&self, shader: DefaultShader) -> ShaderHandle {
        match shader {
            DefaultShader::Color3d => self.color3d,
            DefaultShader::VertexColor3d => self.vertex_color3d,
            DefaultShader::Simple3d => self.simple3d,
        }
    }

    /// Resolve the shader `material` should draw `mesh` with
    pub fn resolve(&self, material: &Material, mesh: &VertexBuffer) -> ShaderHandle {
        material
            .shader
            .unwrap_or_else(|| self.get(DefaultShader::select(material, mesh)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::collections::BufferId;
    use crate::render::material::TextureRef;
    use crate::render::vertex::VertexFormat;

    fn mesh(format: VertexFormat) -> VertexBuffer {
        VertexBuffer::new(BufferId::default(), format, 3, 3)
    }

    #[test]
    fn test_texture_takes_priority() {
        let material = Material::default().with_texture(TextureRef::pending(4, 4));
        assert_eq!(
            DefaultShader::select(&material, &mesh(VertexFormat::Vertex3Color)),
            DefaultShader::Simple3d
        );
    }

    #[test]
    fn test_vertex_color_then_flat_color() {
        let material = Material::default();
        assert_eq!(
            DefaultShader::select(&material, &mesh(VertexFormat::Vertex3Color)),
            DefaultShader::VertexColor3d
        );
        assert_eq!(
            DefaultShader::select(&material, &mesh(VertexFormat::Vertex3UV)),
            DefaultShader::Color3d
        );
    }

    #[test]
    fn test_explicit_shader_is_kept() {
        let registry = ShaderRegistry::from_handles(ShaderHandle(1), ShaderHandle(2), ShaderHandle(3));
        let material = Material::default().with_shader(ShaderHandle(42));
        assert_eq!(registry.resolve(&material, &mesh(VertexFormat::Vertex3)), ShaderHandle(42));
        assert_eq!(
            registry.resolve(&Material::default(), &mesh(VertexFormat::Vertex3Color)),
            ShaderHandle(2)
        );
    }
}
