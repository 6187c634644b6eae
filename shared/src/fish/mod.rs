//! Fish behavior: per-fish steering state, the seek-and-turn step and the
//! school that owns every fish record.

pub mod school;
pub mod state;
pub mod steering;

pub use school::*;
pub use state::*;
pub use steering::*;
