use bevy::prelude::*;
use bevy_log::info;
use rand::{rngs::StdRng, SeedableRng};

/// Random source shared by every scene generator and the fish school.
///
/// Seeding it with a fixed value makes the whole scene reproducible.
#[derive(Resource, Debug, Clone)]
pub struct SceneRng(pub StdRng);

impl SceneRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => {
                info!("Using scene seed {}", seed);
                Self::seeded(seed)
            }
            None => Self(StdRng::from_entropy()),
        }
    }
}

impl std::ops::Deref for SceneRng {
    type Target = StdRng;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::ops::DerefMut for SceneRng {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
