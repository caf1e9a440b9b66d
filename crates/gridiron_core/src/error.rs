use thiserror::Error;

use crate::transition::TransitionError;

/// Errors raised by the library's fallible surfaces (config, export, parsing).
///
/// Game-rule problems are never reported through this type; they are
/// `ValidationResult` issues.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid transition: {0}")]
    Transition(#[from] TransitionError),

    #[error("Unknown coaching archetype: {name}")]
    UnknownArchetype { name: String },

    #[error("Unsupported config format: {path}")]
    UnsupportedConfigFormat { path: String },
}

impl CoreError {
    pub fn is_recoverable(&self) -> bool {
        match self {
            CoreError::Io(_) => true,
            CoreError::UnknownArchetype { .. } => true,
            CoreError::UnsupportedConfigFormat { .. } => true,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
