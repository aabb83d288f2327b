//! Materials and texture references

use crate::foundation::color::Color;
use crate::render::api::{ShaderHandle, TextureHandle};

/// Weak reference to a texture that may still be streaming in
///
/// The size is known as soon as loading starts; the GPU handle only once the
/// upload has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextureRef {
    handle: Option<TextureHandle>,
    width: u32,
    height: u32,
}

impl TextureRef {
    /// A texture whose pixels are still being decoded or uploaded
    pub fn pending(width: u32, height: u32) -> Self {
        Self {
            handle: None,
            width,
            height,
        }
    }

    /// A texture that has been uploaded and can be bound
    pub fn loaded(handle: TextureHandle, width: u32, height: u32) -> Self {
        Self {
            handle: Some(handle),
            width,
            height,
        }
    }

    /// Mark a pending texture as uploaded
    pub fn finish_loading(&mut self, handle: TextureHandle) {
        self.handle = Some(handle);
    }

    /// True while the size is known but the GPU handle is not
    pub fn is_loading(&self) -> bool {
        self.handle.is_none() && self.width > 0
    }

    /// True if the texture can be bound for rendering, i.e. it has loaded
    pub fn is_bindable(&self) -> bool {
        self.handle.is_some()
    }

    /// GPU handle, if uploaded
    pub fn handle(&self) -> Option<TextureHandle> {
        self.handle
    }

    /// Texture width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Texture height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }
}

/// # Material
///
/// Render state of an actor: the shader and texture it binds (both weak
/// references owned by the backend) plus diffuse and outline colors.
///
/// A material without a shader gets one of the default shaders assigned on
/// first render, see [`DefaultShader::select`](crate::render::DefaultShader::select).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Shader program, resolved lazily when `None`
    pub shader: Option<ShaderHandle>,
    /// Diffuse texture
    pub texture: Option<TextureRef>,
    /// Diffuse color, bound to `u_DiffuseColor`
    pub color: Color,
    /// Outline or background color
    ///
    /// The default shaders have no outline slot, so the actor render pass
    /// never binds it. Custom shaders and overlays read it from here.
    pub border: Color,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            shader: None,
            texture: None,
            color: Color::WHITE,
            border: Color::ZERO,
        }
    }
}

impl Material {
    /// Set diffuse color
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Set diffuse texture
    pub fn with_texture(mut self, texture: TextureRef) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Set an explicit shader, bypassing default shader selection
    pub fn with_shader(mut self, shader: ShaderHandle) -> Self {
        self.shader = Some(shader);
        self
    }

    /// Set outline color
    pub fn with_border(mut self, border: Color) -> Self {
        self.border = border;
        self
    }

    /// True if the diffuse texture is still loading
    pub fn is_loading(&self) -> bool {
        self.texture.as_ref().is_some_and(TextureRef::is_loading)
    }

    /// True if the diffuse texture can be bound
    pub fn is_bindable(&self) -> bool {
        self.texture.as_ref().is_some_and(TextureRef::is_bindable)
    }
}
