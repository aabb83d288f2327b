//! # Camera
//!
//! View and projection computation for camera nodes. The world uses Y up
//! with Z pointing out of the screen, so an unrotated camera looks down -Z.
//!
//! A camera works in one of two modes:
//!
//! - **Free**: the view is the inverse of the camera's own affine transform,
//!   so moving or rotating the node moves the eye
//! - **Look-at**: the view looks from the camera position towards a target
//!   point with world up as the up vector
//!
//! Either way the final view-projection also applies the world transform of
//! the camera's ancestors, which lets a pivot node above the camera orbit
//! the scene.

use crate::core::config::CameraConfig;
use crate::foundation::math::{constants, project_point, Mat4, Mat4Ext, Ray, Vec2, Vec3};

/// Camera node payload
#[derive(Debug, Clone)]
pub struct Camera {
    view: Mat4,
    projection: Mat4,
    view_projection: Mat4,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    target: Vec3,
    auto_look_at: bool,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl Camera {
    /// Create a camera with the given projection parameters
    pub fn new(fov_degrees: f32, near: f32, far: f32) -> Self {
        Self {
            view: Mat4::identity(),
            projection: Mat4::identity(),
            view_projection: Mat4::identity(),
            fov_degrees,
            near,
            far,
            target: Vec3::zeros(),
            auto_look_at: false,
        }
    }

    /// Create a camera from configuration
    pub fn from_config(config: &CameraConfig) -> Self {
        Self::new(config.fov_degrees, config.near, config.far)
    }

    /// Track `target` from now on
    pub fn look_at_target(&mut self, target: Vec3) {
        self.target = target;
        self.auto_look_at = true;
    }

    /// Return to free mode
    pub fn clear_look_at(&mut self) {
        self.target = Vec3::zeros();
        self.auto_look_at = false;
    }

    /// True in look-at mode
    pub fn is_looking_at_target(&self) -> bool {
        self.auto_look_at
    }

    /// Look-at target, zero in free mode
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// View matrix from the last update
    pub fn view(&self) -> &Mat4 {
        &self.view
    }

    /// Projection matrix from the last update
    pub fn projection(&self) -> &Mat4 {
        &self.projection
    }

    /// Combined view-projection matrix from the last update
    pub fn view_projection(&self) -> &Mat4 {
        &self.view_projection
    }

    /// Recompute view, projection and view-projection
    ///
    /// `local` and `position` are the camera node's local transform and
    /// position, `parent_world` the world transform of its parent.
    pub fn update_view_projection(
        &mut self,
        local: &Mat4,
        position: &Vec3,
        viewport: (u32, u32),
        parent_world: &Mat4,
    ) {
        let up = Vec3::from(constants::WORLD_UP);
        self.view = if self.auto_look_at {
            Mat4::look_at(position, &self.target, &up)
        } else {
            local.try_inverse().unwrap_or_else(|| {
                log::warn!("Camera transform is not invertible, using identity view");
                Mat4::identity()
            })
        };

        let (width, height) = viewport;
        self.projection = Mat4::perspective(self.fov_degrees, width as f32, height as f32, self.near, self.far);
        self.view_projection = self.projection * self.view * parent_world;
    }

    /// World-space ray through a screen pixel
    ///
    /// The pixel is mapped to normalized device coordinates and transformed
    /// by the inverse view-projection at the near (-1) and far (+1) depth.
    /// Returns `None` if the view-projection is singular or the viewport is empty.
    pub fn unproject(&self, screen: Vec2, viewport: (u32, u32)) -> Option<Ray> {
        let (width, height) = viewport;
        if width == 0 || height == 0 {
            return None;
        }
        let x = 2.0 * screen.x / width as f32 - 1.0;
        let y = 1.0 - 2.0 * screen.y / height as f32;

        let inverse = self.view_projection.try_inverse()?;
        let origin = project_point(&inverse, &Vec3::new(x, y, -1.0))?;
        let target = project_point(&inverse, &Vec3::new(x, y, 1.0))?;
        Some(Ray::new(origin, target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn camera_at(position: Vec3) -> (Camera, Mat4) {
        let local = Mat4::affine_3d(&position, &Vec3::new(1.0, 1.0, 1.0), &Vec3::zeros());
        let mut camera = Camera::default();
        camera.update_view_projection(&local, &position, (800, 600), &Mat4::identity());
        (camera, local)
    }

    #[test]
    fn test_free_camera_sees_origin_at_center() {
        let (camera, _) = camera_at(Vec3::new(0.0, 0.0, 25.0));
        let ndc = project_point(camera.view_projection(), &Vec3::zeros()).unwrap();
        assert_relative_eq!(ndc.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(ndc.y, 0.0, epsilon = 1e-5);
        assert!(ndc.z > -1.0 && ndc.z < 1.0);
    }

    #[test]
    fn test_look_at_mode_toggles() {
        let mut camera = Camera::default();
        camera.look_at_target(Vec3::new(0.0, 15.0, 0.0));
        assert!(camera.is_looking_at_target());
        camera.clear_look_at();
        assert!(!camera.is_looking_at_target());
        assert_eq!(camera.target(), Vec3::zeros());
    }

    #[test]
    fn test_look_at_centers_target() {
        let position = Vec3::new(0.0, 10.0, 35.0);
        let target = Vec3::new(0.0, 15.0, 0.0);
        let local = Mat4::affine_3d(&position, &Vec3::new(1.0, 1.0, 1.0), &Vec3::zeros());
        let mut camera = Camera::default();
        camera.look_at_target(target);
        camera.update_view_projection(&local, &position, (800, 600), &Mat4::identity());

        let ndc = project_point(camera.view_projection(), &target).unwrap();
        assert_relative_eq!(ndc.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(ndc.y, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_unproject_center_points_down_view_axis() {
        let (camera, _) = camera_at(Vec3::new(0.0, 0.0, 25.0));
        let ray = camera.unproject(Vec2::new(400.0, 300.0), (800, 600)).unwrap();
        assert_relative_eq!(ray.direction(), Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-3);
        assert_relative_eq!(ray.origin.z, 25.0 - camera.near, epsilon = 1e-2);
    }

    #[test]
    fn test_unproject_with_singular_matrix() {
        let camera = Camera::default();
        let mut singular = camera.clone();
        singular.view_projection = Mat4::zeros();
        assert!(singular.unproject(Vec2::new(1.0, 1.0), (800, 600)).is_none());
        assert!(camera.unproject(Vec2::new(1.0, 1.0), (0, 0)).is_none());
    }
}
