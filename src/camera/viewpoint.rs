use cgmath::{perspective, InnerSpace, Matrix4, Point3, Quaternion, Rad, Rotation, Rotation3, Vector3};

use crate::math::Pose;

/// Pitch limits that keep the view from flipping over the poles
#[derive(Debug, Clone, Copy)]
pub struct ViewpointBounds {
    pub min_pitch: f32,
    pub max_pitch: f32,
}

impl Default for ViewpointBounds {
    fn default() -> Self {
        Self {
            min_pitch: -std::f32::consts::FRAC_PI_2 + 0.05,
            max_pitch: std::f32::consts::FRAC_PI_2 - 0.05,
        }
    }
}

/// First-person viewpoint the pointer ray is cast from.
///
/// Yaw rotates around world +Y, pitch around the view's local X. With both at
/// zero the viewpoint looks down -Z.
#[derive(Debug, Clone, Copy)]
pub struct Viewpoint {
    pub eye: Vector3<f32>,
    pub yaw: f32,
    pub pitch: f32,
    pub bounds: ViewpointBounds,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    /// Framebuffer size in physical pixels
    pub screen_size: (f32, f32),
}

impl Viewpoint {
    pub fn new(eye: Vector3<f32>, yaw: f32, pitch: f32, screen_size: (f32, f32)) -> Self {
        let mut viewpoint = Self {
            eye,
            yaw,
            pitch: 0.0,
            bounds: ViewpointBounds::default(),
            fovy: Rad(std::f32::consts::PI / 3.0),
            znear: 0.05,
            zfar: 100.0,
            screen_size,
        };
        viewpoint.set_pitch(pitch);
        viewpoint
    }

    pub fn aspect(&self) -> f32 {
        let (width, height) = self.screen_size;
        if height <= 0.0 {
            1.0
        } else {
            width / height
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.screen_size = (width as f32, height as f32);
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(self.bounds.min_pitch, self.bounds.max_pitch);
    }

    pub fn add_pitch(&mut self, delta: f32) {
        self.set_pitch(self.pitch + delta);
    }

    pub fn add_yaw(&mut self, delta: f32) {
        self.yaw = (self.yaw + delta).rem_euclid(std::f32::consts::TAU);
    }

    pub fn orientation(&self) -> Quaternion<f32> {
        Quaternion::from_angle_y(Rad(self.yaw)) * Quaternion::from_angle_x(Rad(self.pitch))
    }

    pub fn forward(&self) -> Vector3<f32> {
        self.orientation()
            .rotate_vector(-Vector3::unit_z())
            .normalize()
    }

    pub fn pose(&self) -> Pose {
        Pose::new(self.eye, self.orientation())
    }

    /// Pose `distance` in front of the eye, optionally shifted in view space.
    /// Collaborators use this to keep the reading and focus anchors glued to
    /// the view.
    pub fn anchor_pose(&self, distance: f32, view_offset: Vector3<f32>) -> Pose {
        let local = Vector3::new(view_offset.x, view_offset.y, view_offset.z - distance);
        Pose::new(self.eye + self.orientation().rotate_vector(local), self.orientation())
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::new(self.eye.x, self.eye.y, self.eye.z);
        let target = eye + self.forward();
        Matrix4::look_at_rh(eye, target, Vector3::unit_y())
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        perspective(self.fovy, self.aspect(), self.znear, self.zfar)
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }
}
