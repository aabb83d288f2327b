//! Straight-alpha colors used by materials, vertex data and frame clears

use serde::{Deserialize, Serialize};

/// RGBA color with components in `[0, 1]`
#[repr(C)]
#[derive(
    Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, bytemuck::Pod, bytemuck::Zeroable,
)]
pub struct Color {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    pub a: f32,
}

impl Color {
    /// Opaque white, the default diffuse color
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Opaque black
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Fully transparent black, the default outline color
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    /// Opaque red
    pub const RED: Self = Self::new(1.0, 0.0, 0.0, 1.0);
    /// Opaque green
    pub const GREEN: Self = Self::new(0.0, 1.0, 0.0, 1.0);
    /// Opaque blue
    pub const BLUE: Self = Self::new(0.0, 0.0, 1.0, 1.0);

    /// Create a color from normalized components
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from classic `0..=255` channels
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(f32::from(r) / 255.0, f32::from(g) / 255.0, f32::from(b) / 255.0, 1.0)
    }

    /// Components as an array, in uniform upload order
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<Color3> for Color {
    fn from(c: Color3) -> Self {
        Self::new(c.r, c.g, c.b, 1.0)
    }
}

/// Opaque RGB color, used for background clears
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color3 {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
}

impl Color3 {
    /// White, the default scene background
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
    /// Black
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);

    /// Create a color from normalized components
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create a color from classic `0..=255` channels
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(f32::from(r) / 255.0, f32::from(g) / 255.0, f32::from(b) / 255.0)
    }
}

impl Default for Color3 {
    fn default() -> Self {
        Self::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rgb_bytes_are_normalized() {
        let c = Color3::rgb(125, 125, 125);
        assert_relative_eq!(c.r, 125.0 / 255.0);
        assert_relative_eq!(Color::rgb(255, 0, 0).r, 1.0);
    }

    #[test]
    fn test_color3_promotes_to_opaque() {
        let c: Color = Color3::new(0.5, 0.25, 0.0).into();
        assert_eq!(c.to_array(), [0.5, 0.25, 0.0, 1.0]);
    }
}
