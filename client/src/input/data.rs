use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AquariumAction {
    ToggleInspector,
    TogglePanel,
    RegenerateScenery,
    ResetCamera,
    SaveSettings,
}
