use bevy::prelude::*;

/// Ordering of the per-frame aquarium systems.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum AquariumUpdateSet {
    Input,
    Settings,
    Animation,
    Rendering,
    Ui,
}

/// Ordering of the fixed-rate simulation systems.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum AquariumFixedUpdateSet {
    Simulation,
    Sync,
}
