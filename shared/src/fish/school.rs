//! The fish school is the simulation context for every fish in the tank.
//!
//! Renderable fish only carry a [`FishId`]; poses and behavior records live
//! here and are looked up by id when the scene is synced.

use bevy::prelude::*;
use bevy_log::{debug, info};
use rand::Rng;
use std::f32::consts::TAU;

use crate::config::FishConfig;

use super::{retarget_if_due, steer, tail_angle, FishState, Pose, SteeringState, TankBounds};

/// Stable index of a fish inside its school.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FishId(pub usize);

/// A single fish: where it is, how it behaves and what it did last step.
#[derive(Debug, Clone, PartialEq)]
pub struct Fish {
    pub id: FishId,
    pub pose: Pose,
    pub state: FishState,
    pub steering: SteeringState,
}

/// Counters reported by [`FishSchool::step`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepSummary {
    pub retargeted: usize,
    pub seeking: usize,
    pub arrived: usize,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct FishSchool {
    fish: Vec<Fish>,
    bounds: TankBounds,
    tuning: FishConfig,
}

impl FishSchool {
    /// Creates `count` fish at random poses inside `bounds`.
    pub fn populate<R: Rng + ?Sized>(
        count: u32,
        tuning: FishConfig,
        bounds: TankBounds,
        rng: &mut R,
        now: f32,
    ) -> Self {
        let mut school = Self {
            fish: Vec::with_capacity(count as usize),
            bounds,
            tuning,
        };
        school.resize(count, rng, now);
        info!("Populated fish school with {} fish", school.len());
        school
    }

    /// Grows or shrinks the school. Surviving fish keep their state and ids.
    pub fn resize<R: Rng + ?Sized>(&mut self, count: u32, rng: &mut R, now: f32) {
        let count = count as usize;
        if count <= self.fish.len() {
            self.fish.truncate(count);
            return;
        }
        for index in self.fish.len()..count {
            let fish = self.spawn_fish(FishId(index), rng, now);
            self.fish.push(fish);
        }
    }

    fn spawn_fish<R: Rng + ?Sized>(&self, id: FishId, rng: &mut R, now: f32) -> Fish {
        let bounds = &self.bounds;
        // Keep a margin of one unit so resting heights leave room to wander
        let low = (bounds.min_y + 1.0).min(bounds.max_y);
        let high = (bounds.max_y - 1.0).max(low);
        let resting_height = rng.gen_range(low..=high);

        let translation = Vec3::new(
            rng.gen_range(-bounds.half_extent..=bounds.half_extent),
            resting_height,
            rng.gen_range(-bounds.half_extent..=bounds.half_extent),
        );
        let rotation = Quat::from_rotation_y(rng.gen_range(0.0..TAU));

        Fish {
            id,
            pose: Pose::new(translation, rotation),
            state: FishState::new(rng, &self.tuning, bounds, resting_height, now),
            steering: SteeringState::Seeking,
        }
    }

    /// Runs one steering step for every fish: retarget when due, then steer.
    pub fn step<R: Rng + ?Sized>(&mut self, now: f32, rng: &mut R) -> StepSummary {
        let mut summary = StepSummary::default();
        let bounds = self.bounds;

        for fish in self.fish.iter_mut() {
            if retarget_if_due(&mut fish.state, now, rng, &bounds) {
                summary.retargeted += 1;
            }
            fish.steering = steer(&mut fish.pose, &fish.state);
            match fish.steering {
                SteeringState::Seeking => summary.seeking += 1,
                SteeringState::Arrived => summary.arrived += 1,
            }
        }

        if summary.retargeted > 0 {
            debug!(
                "{} fish retargeted at t={:.2} ({} seeking, {} arrived)",
                summary.retargeted, now, summary.seeking, summary.arrived
            );
        }
        summary
    }

    /// Tail yaw of a fish at `elapsed` seconds.
    pub fn tail_angle(&self, id: FishId, elapsed: f32) -> Option<f32> {
        self.get(id)
            .map(|fish| tail_angle(elapsed, fish.state.tail_speed))
    }

    pub fn get(&self, id: FishId) -> Option<&Fish> {
        self.fish.get(id.0)
    }

    pub fn get_mut(&mut self, id: FishId) -> Option<&mut Fish> {
        self.fish.get_mut(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fish> {
        self.fish.iter()
    }

    pub fn len(&self) -> usize {
        self.fish.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fish.is_empty()
    }

    pub fn bounds(&self) -> &TankBounds {
        &self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn school(count: u32, seed: u64) -> FishSchool {
        let mut rng = StdRng::seed_from_u64(seed);
        FishSchool::populate(
            count,
            FishConfig::default(),
            TankBounds::default(),
            &mut rng,
            0.0,
        )
    }

    #[test]
    fn test_populate_assigns_sequential_ids() {
        let school = school(8, 1);
        assert_eq!(school.len(), 8);
        for (index, fish) in school.iter().enumerate() {
            assert_eq!(fish.id, FishId(index));
            assert!(school.bounds().contains(fish.pose.translation));
        }
    }

    #[test]
    fn test_same_seed_same_school() {
        let a = school(10, 99);
        let b = school(10, 99);
        assert!(a.iter().zip(b.iter()).all(|(x, y)| x == y));
    }

    #[test]
    fn test_resize_keeps_surviving_fish() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut school = school(6, 5);
        let before: Vec<Fish> = school.iter().cloned().collect();

        school.resize(3, &mut rng, 1.0);
        assert_eq!(school.len(), 3);
        assert_eq!(school.get(FishId(2)), Some(&before[2]));

        school.resize(9, &mut rng, 1.0);
        assert_eq!(school.len(), 9);
        assert_eq!(school.get(FishId(0)), Some(&before[0]));
        assert_eq!(school.get(FishId(8)).map(|fish| fish.id), Some(FishId(8)));
    }

    #[test]
    fn test_step_retargets_only_expired_fish() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut school = school(4, 21);
        let first_deadline = school
            .iter()
            .map(|fish| fish.state.next_retarget)
            .fold(f32::INFINITY, f32::min);

        let summary = school.step(first_deadline - 0.5, &mut rng);
        assert_eq!(summary.retargeted, 0);
        assert_eq!(summary.seeking + summary.arrived, 4);

        let summary = school.step(60.0, &mut rng);
        assert_eq!(summary.retargeted, 4);
        for fish in school.iter() {
            assert!(fish.state.next_retarget > 60.0);
            assert!(school.bounds().contains(fish.state.target));
        }
    }

    #[test]
    fn test_arrived_fish_holds_position_in_step() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut school = school(1, 8);
        let fish = school.get_mut(FishId(0)).unwrap();
        fish.state.target = fish.pose.translation;
        let before = fish.pose;

        let summary = school.step(0.0, &mut rng);
        assert_eq!(summary.arrived, 1);
        assert_eq!(school.get(FishId(0)).unwrap().pose, before);
        assert_eq!(
            school.get(FishId(0)).unwrap().steering,
            SteeringState::Arrived
        );
    }

    #[test]
    fn test_tail_angle_lookup() {
        let school = school(2, 4);
        let speed = school.get(FishId(1)).unwrap().state.tail_speed;
        let angle = school.tail_angle(FishId(1), 1.25).unwrap();
        assert!((angle - (1.25 * speed).sin() * 0.2).abs() < 1e-6);
        assert!(school.tail_angle(FishId(7), 1.0).is_none());
    }
}
