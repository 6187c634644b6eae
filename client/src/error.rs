use shared::config::ConfigError;
use thiserror::Error;

/// Anything that keeps the scene from opening.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("--{flag}: {reason}")]
    Argument { flag: &'static str, reason: String },
}
