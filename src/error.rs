//! Crate-wide error types
//!
//! Subsystems wrap foreign errors into `EngineError` through small context
//! traits (see `renderer::error`). Terrain generation itself has no error
//! path: noise evaluation and integration cannot fail, and mesh allocation
//! failure degrades to an empty chunk instead of an error.

use std::path::PathBuf;

/// Errors raised while loading or validating `ViewerConfig`
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration value for {field}: {reason}")]
    Invalid { field: String, reason: String },
}

impl ConfigError {
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Top-level engine error
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Window creation failed: {0}")]
    WindowCreation(String),

    #[error("Surface creation failed: {0}")]
    SurfaceCreation(String),

    #[error("No suitable GPU adapter found")]
    NoAdapter,

    #[error("GPU device request failed: {0}")]
    DeviceRequest(String),

    #[error("GPU operation '{operation}' failed: {error}")]
    GpuOperationFailed { operation: String, error: String },

    #[error("{component} error: {error}")]
    SystemError { component: String, error: String },
}

pub type EngineResult<T> = Result<T, EngineError>;
