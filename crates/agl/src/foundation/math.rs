//! Math utilities and types
//!
//! Provides the vector and matrix types used by the scene graph and the
//! geometry builders. Rotations are expressed as XYZ Euler angles in degrees,
//! matching how node transforms are authored.

pub use nalgebra::{Matrix4, Unit, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Square root of two, used to keep AA edges uniform at right-angle corners
    pub const SQRT_2: f32 = std::f32::consts::SQRT_2;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// World up direction (Y is up, Z points out of the screen)
    pub const WORLD_UP: [f32; 3] = [0.0, 1.0, 0.0];
}

/// Math utility functions
pub mod utils {
    use super::{constants, Vec2, Vec3};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Normalizes `v`, returning zero for a zero-length vector instead of NaN
    pub fn normalize_or_zero2(v: Vec2) -> Vec2 {
        v.try_normalize(f32::EPSILON).unwrap_or_else(Vec2::zeros)
    }

    /// Normalizes `v`, returning zero for a zero-length vector instead of NaN
    pub fn normalize_or_zero3(v: Vec3) -> Vec3 {
        v.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::zeros)
    }

    /// Left-hand perpendicular of a 2D direction in screen (Y-down) coordinates
    ///
    /// In a Y-up frame this is the direction rotated clockwise by 90 degrees.
    pub fn left(v: Vec2) -> Vec2 {
        Vec2::new(v.y, -v.x)
    }
}

/// Extension trait for Mat4 with the transform constructors used by scene nodes
pub trait Mat4Ext {
    /// Affine transform `T * R * S` from a position, per-axis scale and XYZ Euler rotation in degrees
    fn affine_3d(position: &Vec3, scale: &Vec3, rotation_degrees: &Vec3) -> Mat4;

    /// Right-handed look-at view matrix
    fn look_at(eye: &Vec3, target: &Vec3, up: &Vec3) -> Mat4;

    /// OpenGL-style perspective projection, `fov_degrees` is the vertical field of view
    fn perspective(fov_degrees: f32, width: f32, height: f32, near: f32, far: f32) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn affine_3d(position: &Vec3, scale: &Vec3, rotation_degrees: &Vec3) -> Mat4 {
        let rotation = nalgebra::Rotation3::from_euler_angles(
            utils::deg_to_rad(rotation_degrees.x),
            utils::deg_to_rad(rotation_degrees.y),
            utils::deg_to_rad(rotation_degrees.z),
        );
        Mat4::new_translation(position)
            * rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(scale)
    }

    fn look_at(eye: &Vec3, target: &Vec3, up: &Vec3) -> Mat4 {
        Mat4::look_at_rh(&Point3::from(*eye), &Point3::from(*target), up)
    }

    fn perspective(fov_degrees: f32, width: f32, height: f32, near: f32, far: f32) -> Mat4 {
        // a collapsed window reports 0 height
        let aspect = width / height.max(1.0);
        Mat4::new_perspective(aspect, utils::deg_to_rad(fov_degrees), near, far)
    }
}

/// Applies `m` to a point and performs the perspective divide
///
/// Returns `None` when the homogeneous `w` is zero.
pub fn project_point(m: &Mat4, point: &Vec3) -> Option<Vec3> {
    let h = m * Vec4::new(point.x, point.y, point.z, 1.0);
    if h.w.abs() <= f32::EPSILON {
        return None;
    }
    Some(Vec3::new(h.x / h.w, h.y / h.w, h.z / h.w))
}

/// A ray between two world-space points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Ray origin
    pub origin: Vec3,
    /// Point the ray travels towards
    pub target: Vec3,
}

impl Ray {
    /// Create a new ray from two points
    pub fn new(origin: Vec3, target: Vec3) -> Self {
        Self { origin, target }
    }

    /// Normalized direction from origin towards target
    pub fn direction(&self) -> Vec3 {
        utils::normalize_or_zero3(self.target - self.origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_affine_identity() {
        let m = Mat4::affine_3d(&Vec3::zeros(), &Vec3::new(1.0, 1.0, 1.0), &Vec3::zeros());
        assert_relative_eq!(m, Mat4::identity());
    }

    #[test]
    fn test_affine_applies_scale_then_rotation_then_translation() {
        let m = Mat4::affine_3d(
            &Vec3::new(10.0, 0.0, 0.0),
            &Vec3::new(2.0, 2.0, 2.0),
            &Vec3::new(0.0, 0.0, 90.0),
        );
        let p = project_point(&m, &Vec3::new(1.0, 0.0, 0.0)).unwrap();
        // (1,0,0) scaled to (2,0,0), rotated 90deg about Z to (0,2,0), then moved by +10 on X
        assert_relative_eq!(p, Vec3::new(10.0, 2.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_left_rotates_clockwise_in_y_up_frame() {
        assert_relative_eq!(utils::left(Vec2::new(0.0, 1.0)), Vec2::new(1.0, 0.0));
        assert_relative_eq!(utils::left(Vec2::new(1.0, 0.0)), Vec2::new(0.0, -1.0));
    }

    #[test]
    fn test_perspective_handles_zero_height() {
        let m = Mat4::perspective(45.0, 800.0, 0.0, 0.001, 10000.0);
        assert!(m.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_ray_direction_is_normalized() {
        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, -5.0));
        assert_relative_eq!(ray.direction(), Vec3::new(0.0, 0.0, -1.0));
    }
}
