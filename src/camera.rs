//! Euler-angle fly camera. Grounded in `original_source/src/camera.{h,cpp}`
//! (the LearnOpenGL-style camera the distilled spec is built from) and in
//! the teacher's own `camera.rs`, which drives position/yaw/pitch from raw
//! input deltas the same way.

use crate::math::{deg_to_radians, Mat4, Vec3};

/// Mirrors `original_source/src/camera.h`'s `CameraMovement` enum — an
/// abstraction over window-system-specific key codes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

const DEFAULT_YAW: f32 = -90.0;
const DEFAULT_PITCH: f32 = 0.0;
const DEFAULT_SPEED: f32 = 2.5;
const DEFAULT_SENSITIVITY: f32 = 0.1;
const DEFAULT_ZOOM: f32 = 45.0;
const PITCH_LIMIT: f32 = 89.0;
const ZOOM_MIN: f32 = 1.0;
const ZOOM_MAX: f32 = 45.0;

#[derive(Debug, Copy, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub front: Vec3,
    pub up: Vec3,
    pub right: Vec3,
    pub world_up: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    pub zoom: f32,
}

impl Camera {
    pub fn new(position: Vec3, world_up: Vec3, yaw: f32, pitch: f32) -> Camera {
        let mut camera = Camera {
            position,
            front: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::ZERO,
            right: Vec3::ZERO,
            world_up,
            yaw,
            pitch,
            movement_speed: DEFAULT_SPEED,
            mouse_sensitivity: DEFAULT_SENSITIVITY,
            zoom: DEFAULT_ZOOM,
        };
        camera.update_vectors();
        camera
    }

    pub fn with_defaults(position: Vec3) -> Camera {
        Camera::new(position, Vec3::new(0.0, 1.0, 0.0), DEFAULT_YAW, DEFAULT_PITCH)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.position + self.front, self.up)
    }

    pub fn process_keyboard(&mut self, direction: CameraMovement, delta_time: f32) {
        let velocity = self.movement_speed * delta_time;
        match direction {
            CameraMovement::Forward => self.position = self.position + self.front * velocity,
            CameraMovement::Backward => self.position = self.position - self.front * velocity,
            CameraMovement::Right => self.position = self.position + self.right * velocity,
            CameraMovement::Left => self.position = self.position - self.right * velocity,
            CameraMovement::Up => self.position = self.position + self.up * velocity,
            CameraMovement::Down => self.position = self.position - self.up * velocity,
        }
    }

    pub fn process_mouse_movement(&mut self, offset_x: f32, offset_y: f32, constrain_pitch: bool) {
        self.yaw += offset_x * self.mouse_sensitivity;
        self.pitch += offset_y * self.mouse_sensitivity;

        if constrain_pitch {
            self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }

        self.update_vectors();
    }

    pub fn process_mouse_scroll(&mut self, offset_y: f32) {
        self.zoom = (self.zoom - offset_y).clamp(ZOOM_MIN, ZOOM_MAX);
    }

    fn update_vectors(&mut self) {
        let yaw = deg_to_radians(self.yaw);
        let pitch = deg_to_radians(self.pitch);
        let front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos());
        self.front = front.normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
        log::trace!(
            "camera basis rebuilt: yaw={:.2} pitch={:.2} front={:?}",
            self.yaw,
            self.pitch,
            self.front
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_orthonormal(cam: &Camera) {
        let eps = 1e-5;
        assert!((cam.front.length() - 1.0).abs() < eps);
        assert!((cam.right.length() - 1.0).abs() < eps);
        assert!((cam.up.length() - 1.0).abs() < eps);
        assert!(cam.front.dot(cam.right).abs() < eps);
        assert!(cam.front.dot(cam.up).abs() < eps);
        assert!(cam.right.dot(cam.up).abs() < eps);
    }

    #[test]
    fn basis_is_orthonormal_after_creation() {
        let cam = Camera::with_defaults(Vec3::ZERO);
        assert_orthonormal(&cam);
    }

    #[test]
    fn basis_is_orthonormal_after_mouse_movement() {
        let mut cam = Camera::with_defaults(Vec3::ZERO);
        cam.process_mouse_movement(37.0, -12.0, true);
        assert_orthonormal(&cam);
    }

    #[test]
    fn pitch_constrained_to_89_degrees() {
        let mut cam = Camera::with_defaults(Vec3::ZERO);
        cam.process_mouse_movement(0.0, 100_000.0, true);
        assert!(cam.pitch <= 89.0 + 1e-4);
        cam.process_mouse_movement(0.0, -100_000.0, true);
        assert!(cam.pitch >= -89.0 - 1e-4);
    }

    #[test]
    fn zoom_clamped_both_directions() {
        let mut cam = Camera::with_defaults(Vec3::ZERO);
        cam.process_mouse_scroll(100.0);
        assert_eq!(cam.zoom, 1.0);
        cam.process_mouse_scroll(-100.0);
        assert_eq!(cam.zoom, 45.0);
    }

    #[test]
    fn orbit_90_degrees_points_down_positive_x() {
        // yaw=-90 (looking down -Z) + 90 degrees of yaw (sensitivity 0.1 * offset 900) -> 0 deg yaw -> front = (1,0,0)
        let mut cam = Camera::with_defaults(Vec3::ZERO);
        cam.process_mouse_movement(900.0, 0.0, true);
        assert!((cam.front.x - 1.0).abs() < 1e-4);
        assert!(cam.front.y.abs() < 1e-4);
        assert!(cam.front.z.abs() < 1e-4);
    }
}
