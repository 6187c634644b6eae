//! Seek-and-turn steering.
//!
//! Each fish owns a target point. Every simulation step the fish turns a
//! fixed fraction of the way toward that point and swims forward by a fixed
//! stride, until it comes within [`ARRIVAL_DISTANCE`] of it. A retarget timer
//! picks the next point independently of whether the fish arrived.

use bevy::math::{Dir3, Quat, Vec3};
use bevy::transform::components::Transform;
use rand::Rng;

use crate::constants::{
    ARRIVAL_DISTANCE, RESTING_HEIGHT_WANDER, RETARGET_DELAY_SECS, STRIDE_PER_STEP, TAIL_SWING,
};

use super::FishState;

/// Region fish targets are clamped to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TankBounds {
    /// Targets stay within `[-half_extent, half_extent]` on X and Z
    pub half_extent: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl Default for TankBounds {
    fn default() -> Self {
        Self {
            half_extent: 9.0,
            min_y: 1.0,
            max_y: 7.0,
        }
    }
}

impl TankBounds {
    pub fn clamp(&self, point: Vec3) -> Vec3 {
        Vec3::new(
            point.x.clamp(-self.half_extent, self.half_extent),
            point.y.clamp(self.min_y, self.max_y),
            point.z.clamp(-self.half_extent, self.half_extent),
        )
    }

    pub fn contains(&self, point: Vec3) -> bool {
        self.clamp(point) == point
    }
}

/// Position and orientation of a fish, kept apart from any renderable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Pose {
    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    /// Unit vector the fish swims along (local -Z).
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }
}

/// Which half of the two-state steering machine a fish is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SteeringState {
    #[default]
    Seeking,
    Arrived,
}

/// Rotation whose local -Z axis points along `direction`.
///
/// Returns `None` for a zero-length or non-finite direction. A `direction`
/// parallel to `up` still yields a finite rotation.
pub fn look_rotation(direction: Vec3, up: Vec3) -> Option<Quat> {
    let direction = Dir3::new(direction).ok()?;
    let up = Dir3::new(up).unwrap_or(Dir3::Y);
    Some(Transform::IDENTITY.looking_to(direction, up).rotation)
}

/// Draws a new target around the fish's resting height.
///
/// X and Z are uniform over the full swim area, Y wanders up to
/// [`RESTING_HEIGHT_WANDER`] around `resting_height`. The result is clamped
/// to `bounds`.
pub fn pick_target<R: Rng + ?Sized>(rng: &mut R, bounds: &TankBounds, resting_height: f32) -> Vec3 {
    let x = rng.gen_range(-bounds.half_extent..=bounds.half_extent);
    let z = rng.gen_range(-bounds.half_extent..=bounds.half_extent);
    let y = resting_height + rng.gen_range(-RESTING_HEIGHT_WANDER..=RESTING_HEIGHT_WANDER);
    bounds.clamp(Vec3::new(x, y, z))
}

/// Next retarget deadline, uniformly in `[now + 3, now + 8)`.
pub fn next_retarget_time<R: Rng + ?Sized>(rng: &mut R, now: f32) -> f32 {
    now + rng.gen_range(RETARGET_DELAY_SECS)
}

/// Picks a new target if the retarget deadline has strictly passed.
///
/// Returns whether a new target was drawn.
pub fn retarget_if_due<R: Rng + ?Sized>(
    state: &mut FishState,
    now: f32,
    rng: &mut R,
    bounds: &TankBounds,
) -> bool {
    if now <= state.next_retarget {
        return false;
    }
    state.target = pick_target(rng, bounds, state.resting_height);
    state.next_retarget = next_retarget_time(rng, now);
    true
}

/// Advances one fish by a single simulation step.
///
/// Within [`ARRIVAL_DISTANCE`] of the target the pose is left untouched.
/// Otherwise the heading is slerped toward the target by the fish's turn
/// factor and the fish moves `speed * STRIDE_PER_STEP` along its new forward
/// axis.
pub fn steer(pose: &mut Pose, state: &FishState) -> SteeringState {
    let to_target = state.target - pose.translation;
    if to_target.length() <= ARRIVAL_DISTANCE {
        return SteeringState::Arrived;
    }

    if let Some(desired) = look_rotation(to_target, Vec3::Y) {
        pose.rotation = pose.rotation.slerp(desired, state.turn_speed).normalize();
    }
    pose.translation += pose.forward() * state.speed * STRIDE_PER_STEP;

    SteeringState::Seeking
}

/// Tail yaw at `elapsed` seconds.
#[inline]
pub fn tail_angle(elapsed: f32, tail_speed: f32) -> f32 {
    (elapsed * tail_speed).sin() * TAIL_SWING
}
