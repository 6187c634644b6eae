use std::ops::{Range, RangeInclusive};

/// Distance under which a fish counts as having reached its target
pub const ARRIVAL_DISTANCE: f32 = 0.2;
/// Forward stride per simulation step, multiplied by the fish's cruise speed
pub const STRIDE_PER_STEP: f32 = 0.05;
/// Peak tail swing in radians
pub const TAIL_SWING: f32 = 0.2;
/// Delay before the next retarget, in seconds (upper bound excluded)
pub const RETARGET_DELAY_SECS: Range<f32> = 3.0..8.0;
/// Per-fish slerp factor, drawn once at creation
pub const TURN_SPEED_RANGE: RangeInclusive<f32> = 0.02..=0.05;
/// Multiplier applied to the configured base speed, drawn once at creation
pub const SPEED_JITTER: RangeInclusive<f32> = 0.8..=1.2;
/// Vertical wander around a fish's resting height when retargeting
pub const RESTING_HEIGHT_WANDER: f32 = 1.0;

/// Stems are drawn at this fraction of the chosen plant color
pub const STEM_SHADE: f32 = 0.7;
pub const PRIMARY_PLANT_BASE_COUNT: u32 = 5;
pub const SECONDARY_PLANT_BASE_COUNT: u32 = 3;
pub const MOSS_BASE_COUNT: u32 = 4;
/// Secondary plants only appear from this variety onwards
pub const SECONDARY_PLANT_MIN_VARIETY: u32 = 2;

pub const MAX_FISH: u32 = 200;
pub const MAX_PLANT_DENSITY: f32 = 4.0;

pub const DEFAULT_CONFIG_PATH: &str = "aquarium.ron";
