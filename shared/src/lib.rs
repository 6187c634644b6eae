pub mod config;
pub mod constants;
pub mod fish;
pub mod generators;
pub mod rng;
pub mod sets;
pub mod settings;

pub use config::*;
pub use constants::*;
pub use rng::SceneRng;
pub use sets::*;
pub use settings::*;
