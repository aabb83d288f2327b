//! Vertex layouts and vertex buffer handles
//!
//! Vertex structs are plain `#[repr(C)]` data so geometry builders can hand
//! their arrays to a backend as raw bytes.

use bitflags::bitflags;
use bytemuck::{Pod, Zeroable};

use crate::foundation::collections::BufferId;
use crate::foundation::color::Color;
use crate::foundation::math::Vec3;

bitflags! {
    /// Shader attribute slots a vertex layout provides
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct VertexAttributes: u8 {
        /// `a_Position`, XY or XYZ
        const POSITION = 1 << 0;
        /// `a_Normal`
        const NORMAL = 1 << 1;
        /// `a_Coord`, texture coordinate 0
        const COORD = 1 << 2;
        /// `a_Coord2`, texture coordinate 1
        const COORD2 = 1 << 3;
        /// `a_Vertex`, generic 4D vertex (position packed with alpha)
        const VERTEX = 1 << 4;
        /// `a_Color`, per-vertex RGBA
        const COLOR = 1 << 5;
    }
}

/// Known vertex layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexFormat {
    /// XY position with alpha, packed into `a_Vertex`
    Vertex2Alpha,
    /// XYZ position
    Vertex3,
    /// XYZ position and UV
    Vertex3UV,
    /// XYZ position and RGBA color
    Vertex3Color,
}

impl VertexFormat {
    /// Size of one vertex in bytes
    pub const fn stride(self) -> usize {
        match self {
            Self::Vertex2Alpha | Self::Vertex3 => 12,
            Self::Vertex3UV => 20,
            Self::Vertex3Color => 28,
        }
    }

    /// Attribute slots this layout feeds
    pub const fn attributes(self) -> VertexAttributes {
        match self {
            Self::Vertex2Alpha => VertexAttributes::VERTEX,
            Self::Vertex3 => VertexAttributes::POSITION,
            Self::Vertex3UV => VertexAttributes::POSITION.union(VertexAttributes::COORD),
            Self::Vertex3Color => VertexAttributes::POSITION.union(VertexAttributes::COLOR),
        }
    }
}

/// A vertex type with a fixed [`VertexFormat`]
pub trait Vertex: Pod {
    /// Layout descriptor for this vertex type
    const FORMAT: VertexFormat;
}

/// 2D vertex with alpha, used by the anti-aliased 2D builders
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Vertex2Alpha {
    /// Position X
    pub x: f32,
    /// Position Y
    pub y: f32,
    /// Coverage alpha, 1 for the opaque core and 0 for the fading edge
    pub a: f32,
}

impl Vertex2Alpha {
    /// Create a new vertex
    pub const fn new(x: f32, y: f32, a: f32) -> Self {
        Self { x, y, a }
    }
}

impl Vertex for Vertex2Alpha {
    const FORMAT: VertexFormat = VertexFormat::Vertex2Alpha;
}

/// Basic 3D vertex
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Vertex3 {
    /// Position X
    pub x: f32,
    /// Position Y
    pub y: f32,
    /// Position Z
    pub z: f32,
}

impl Vertex for Vertex3 {
    const FORMAT: VertexFormat = VertexFormat::Vertex3;
}

/// 3D vertex with texture coordinates
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Vertex3UV {
    /// Position X
    pub x: f32,
    /// Position Y
    pub y: f32,
    /// Position Z
    pub z: f32,
    /// Texture U
    pub u: f32,
    /// Texture V
    pub v: f32,
}

impl Vertex for Vertex3UV {
    const FORMAT: VertexFormat = VertexFormat::Vertex3UV;
}

/// Vertex-colored 3D vertex, used by the 3D debug builders
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Vertex3Color {
    /// Position X
    pub x: f32,
    /// Position Y
    pub y: f32,
    /// Position Z
    pub z: f32,
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    pub a: f32,
}

impl Vertex3Color {
    /// Create a vertex from a position and a color
    pub fn new(pos: Vec3, color: Color) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            z: pos.z,
            r: color.r,
            g: color.g,
            b: color.b,
            a: color.a,
        }
    }

    /// Vertex position
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Vertex color
    pub fn color(&self) -> Color {
        Color::new(self.r, self.g, self.b, self.a)
    }
}

impl Vertex for Vertex3Color {
    const FORMAT: VertexFormat = VertexFormat::Vertex3Color;
}

/// Handle to an indexed vertex buffer living in a backend
///
/// Copying the handle does not duplicate GPU memory; the owning backend is
/// the only one that frees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexBuffer {
    id: BufferId,
    format: VertexFormat,
    vertex_count: usize,
    index_count: usize,
}

impl VertexBuffer {
    /// Wrap a backend buffer id; called by backend implementations
    pub fn new(id: BufferId, format: VertexFormat, vertex_count: usize, index_count: usize) -> Self {
        Self {
            id,
            format,
            vertex_count,
            index_count,
        }
    }

    /// Backend buffer id
    pub fn id(&self) -> BufferId {
        self.id
    }

    /// Vertex layout
    pub fn format(&self) -> VertexFormat {
        self.format
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Number of indices
    pub fn index_count(&self) -> usize {
        self.index_count
    }

    /// Whether the layout provides the given attribute slot
    pub fn has_attrib(&self, attributes: VertexAttributes) -> bool {
        self.format.attributes().contains(attributes)
    }
}
