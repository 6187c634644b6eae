//! Orbit camera around the tank.
//!
//! Left drag rotates, the wheel zooms. Input is dropped while the debug panel
//! has the pointer.

use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll, MouseScrollUnit};
use bevy::prelude::*;
use std::f32::consts::FRAC_PI_2;

use crate::constants::{
    CAMERA_FOCUS, CAMERA_MAX_RADIUS, CAMERA_MIN_RADIUS, CAMERA_ROTATE_SPEED, CAMERA_START_RADIUS,
    CAMERA_ZOOM_SPEED,
};
use crate::input::{data::AquariumAction, keyboard::is_action_just_pressed, keyboard::KeyMap};
use crate::ui::UiPointerCapture;

/// Keeps the camera from flipping over the poles
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.05;
/// Pixels per scroll line for touchpads reporting pixel deltas
const PIXELS_PER_LINE: f32 = 16.0;

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    pub focus: Vec3,
    pub radius: f32,
    /// Rotation around the vertical axis, in radians
    pub yaw: f32,
    /// Elevation above the focus plane, in radians
    pub pitch: f32,
    pub min_radius: f32,
    pub max_radius: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            focus: Vec3::from_array(CAMERA_FOCUS),
            radius: CAMERA_START_RADIUS,
            yaw: 0.0,
            pitch: 0.35,
            min_radius: CAMERA_MIN_RADIUS,
            max_radius: CAMERA_MAX_RADIUS,
        }
    }
}

impl OrbitCamera {
    /// Applies a mouse drag (in pixels) and a scroll amount (in lines).
    pub fn apply_input(&mut self, drag: Vec2, scroll_lines: f32) {
        self.yaw -= drag.x * CAMERA_ROTATE_SPEED;
        self.pitch = (self.pitch + drag.y * CAMERA_ROTATE_SPEED).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.radius = (self.radius * (1.0 - scroll_lines * CAMERA_ZOOM_SPEED))
            .clamp(self.min_radius, self.max_radius);
    }

    pub fn transform(&self) -> Transform {
        orbit_transform(self.focus, self.radius, self.yaw, self.pitch)
    }
}

/// Camera transform on a sphere of `radius` around `focus`, looking at it.
pub fn orbit_transform(focus: Vec3, radius: f32, yaw: f32, pitch: f32) -> Transform {
    let (sin_pitch, cos_pitch) = pitch.sin_cos();
    let (sin_yaw, cos_yaw) = yaw.sin_cos();
    let offset = Vec3::new(
        radius * cos_pitch * sin_yaw,
        radius * sin_pitch,
        radius * cos_pitch * cos_yaw,
    );
    Transform::from_translation(focus + offset).looking_at(focus, Vec3::Y)
}

pub fn orbit_camera_system(
    mut cameras: Query<(&mut OrbitCamera, &mut Transform)>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    mouse_scroll: Res<AccumulatedMouseScroll>,
    keyboard_input: Res<ButtonInput<KeyCode>>,
    key_map: Res<KeyMap>,
    pointer_capture: Res<UiPointerCapture>,
) {
    let Ok((mut orbit, mut transform)) = cameras.single_mut() else {
        debug!("Orbit camera not found");
        return;
    };

    if is_action_just_pressed(AquariumAction::ResetCamera, &keyboard_input, &key_map) {
        *orbit = OrbitCamera::default();
    }

    if !pointer_capture.0 {
        let drag = if mouse_buttons.pressed(MouseButton::Left) {
            mouse_motion.delta
        } else {
            Vec2::ZERO
        };
        let scroll_lines = match mouse_scroll.unit {
            MouseScrollUnit::Line => mouse_scroll.delta.y,
            MouseScrollUnit::Pixel => mouse_scroll.delta.y / PIXELS_PER_LINE,
        };
        orbit.apply_input(drag, scroll_lines);
    }

    let target = orbit.transform();
    if *transform != target {
        *transform = target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orbit_transform_looks_at_focus() {
        let focus = Vec3::new(0.0, 3.0, 0.0);
        let transform = orbit_transform(focus, 10.0, 0.7, 0.3);
        assert!((transform.translation.distance(focus) - 10.0).abs() < 1e-4);
        let to_focus = (focus - transform.translation).normalize();
        assert!((transform.forward().as_vec3() - to_focus).length() < 1e-4);
    }

    #[test]
    fn test_zero_angles_sit_on_positive_z() {
        let transform = orbit_transform(Vec3::ZERO, 5.0, 0.0, 0.0);
        assert!((transform.translation - Vec3::new(0.0, 0.0, 5.0)).length() < 1e-5);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut orbit = OrbitCamera::default();
        orbit.apply_input(Vec2::new(0.0, 1.0e5), 0.0);
        assert_eq!(orbit.pitch, PITCH_LIMIT);
        orbit.apply_input(Vec2::new(0.0, -1.0e5), 0.0);
        assert_eq!(orbit.pitch, -PITCH_LIMIT);
        assert!(orbit.transform().translation.is_finite());
    }

    #[test]
    fn test_zoom_stays_within_limits() {
        let mut orbit = OrbitCamera::default();
        for _ in 0..100 {
            orbit.apply_input(Vec2::ZERO, 3.0);
        }
        assert_eq!(orbit.radius, orbit.min_radius);
        for _ in 0..100 {
            orbit.apply_input(Vec2::ZERO, -3.0);
        }
        assert_eq!(orbit.radius, orbit.max_radius);
    }
}
