#![warn(missing_docs)]
//! Event camera used to project the gaze pointer into screen space.
//!
//! Right-handed, Y up. An unrotated camera looks down [`FORWARD`] (`-Z`).
//! Screen points are in pixels with the origin at the bottom-left corner.

use gazecast_core::Ray;
use glam::{Mat4, Quat, Vec2, Vec3, Vec4Swizzles};
use serde::{Deserialize, Serialize};

/// Canonical forward axis of an unrotated transform.
pub const FORWARD: Vec3 = Vec3::NEG_Z;

/// Rotation looking along `yaw` (around world Y) then `pitch` (around local X), in radians.
pub fn yaw_pitch_rotation(yaw: f32, pitch: f32) -> Quat {
    const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;
    Quat::from_rotation_y(yaw) * Quat::from_rotation_x(pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT))
}

/// Perspective camera attached to the head (or controller) pose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Camera position in world space.
    pub position: Vec3,
    /// Camera orientation in world space.
    pub rotation: Quat,
    /// Vertical field of view in radians.
    pub fov: f32,
    /// Near clipping plane distance.
    pub near: f32,
    /// Far clipping plane distance.
    pub far: f32,
    /// Draw order among cameras; greater depth renders later (in front).
    pub depth: f32,
    /// Viewport width in pixels.
    pub pixel_width: u32,
    /// Viewport height in pixels.
    pub pixel_height: u32,
    /// Display the camera renders to.
    pub target_display: i32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            fov: std::f32::consts::FRAC_PI_3, // 60 degrees
            near: 0.01,
            far: 1000.0,
            depth: 0.0,
            pixel_width: 1920,
            pixel_height: 1080,
            target_display: 0,
        }
    }
}

impl Camera {
    /// Move the camera to a new pose.
    pub fn set_pose(&mut self, position: Vec3, rotation: Quat) {
        self.position = position;
        self.rotation = rotation.normalize();
    }

    /// Viewing direction.
    pub fn forward(&self) -> Vec3 {
        self.rotation * FORWARD
    }

    /// Camera's local up axis.
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Viewport aspect ratio (width / height).
    pub fn aspect(&self) -> f32 {
        self.pixel_width.max(1) as f32 / self.pixel_height.max(1) as f32
    }

    /// Centre of the viewport in pixels.
    pub fn pixel_center(&self) -> Vec2 {
        Vec2::new(
            0.5 * self.pixel_width as f32,
            0.5 * self.pixel_height as f32,
        )
    }

    /// Ray along the camera's forward axis from its position.
    pub fn forward_ray(&self) -> Ray {
        Ray::new(self.position, self.forward())
    }

    /// Compute the view matrix (world space -> camera space).
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward(), self.up())
    }

    /// Compute the projection matrix (camera space -> clip space, depth 0..1).
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect(), self.near, self.far)
    }

    /// Compute the combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Project a world point to the screen.
    ///
    /// `x`/`y` are pixels; `z` is the distance in front of the camera along
    /// its forward axis (negative behind it).
    pub fn world_to_screen_point(&self, point: Vec3) -> Vec3 {
        let depth = (point - self.position).dot(self.forward());
        let clip = self.view_projection_matrix() * point.extend(1.0);
        if clip.w.abs() <= f32::EPSILON {
            return Vec3::new(f32::NAN, f32::NAN, depth);
        }
        let ndc = clip.xy() / clip.w;
        Vec3::new(
            (ndc.x + 1.0) * 0.5 * self.pixel_width as f32,
            (ndc.y + 1.0) * 0.5 * self.pixel_height as f32,
            depth,
        )
    }

    /// Ray from the near plane through a screen point.
    pub fn screen_point_to_ray(&self, screen: Vec2) -> Ray {
        let x = 2.0 * screen.x / self.pixel_width.max(1) as f32 - 1.0;
        let y = 2.0 * screen.y / self.pixel_height.max(1) as f32 - 1.0;

        let inverse = self.view_projection_matrix().inverse();
        let near = inverse.project_point3(Vec3::new(x, y, 0.0));
        let far = inverse.project_point3(Vec3::new(x, y, 1.0));
        Ray::new(near, far - near)
    }
}
