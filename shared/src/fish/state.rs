use bevy::math::Vec3;
use rand::Rng;

use crate::config::FishConfig;
use crate::constants::{SPEED_JITTER, TURN_SPEED_RANGE};

use super::{next_retarget_time, pick_target, TankBounds};

/// Behavior record of a single fish.
///
/// Speeds and rates are drawn once when the fish is created and never change
/// afterwards; only `target` and `next_retarget` move during the simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FishState {
    /// Cruise speed, the configured base speed times a per-fish jitter
    pub speed: f32,
    /// Slerp factor applied to the heading every step
    pub turn_speed: f32,
    pub target: Vec3,
    /// Simulation time after which a new target is drawn
    pub next_retarget: f32,
    /// Angular speed of the tail oscillation
    pub tail_speed: f32,
    /// Height the fish hovers around when picking targets
    pub resting_height: f32,
}

impl FishState {
    /// Creates a fish with randomized tuning and an initial target.
    pub fn new<R: Rng + ?Sized>(
        rng: &mut R,
        tuning: &FishConfig,
        bounds: &TankBounds,
        resting_height: f32,
        now: f32,
    ) -> Self {
        let speed = tuning.base_speed * rng.gen_range(SPEED_JITTER);
        let turn_speed = rng.gen_range(TURN_SPEED_RANGE);
        let tail_speed = rng.gen_range(tuning.min_tail_speed..=tuning.max_tail_speed);
        let target = pick_target(rng, bounds, resting_height);
        let next_retarget = next_retarget_time(rng, now);

        Self {
            speed,
            turn_speed,
            target,
            next_retarget,
            tail_speed,
            resting_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_new_fish_tuning_ranges() {
        let mut rng = StdRng::seed_from_u64(11);
        let tuning = FishConfig::default();
        let bounds = TankBounds::default();

        for _ in 0..200 {
            let state = FishState::new(&mut rng, &tuning, &bounds, 4.0, 10.0);
            assert!(state.speed >= tuning.base_speed * 0.8 - 1e-6);
            assert!(state.speed <= tuning.base_speed * 1.2 + 1e-6);
            assert!((0.02..=0.05).contains(&state.turn_speed));
            assert!((tuning.min_tail_speed..=tuning.max_tail_speed).contains(&state.tail_speed));
            assert!((13.0..=18.0).contains(&state.next_retarget));
            assert!(bounds.contains(state.target));
        }
    }
}
