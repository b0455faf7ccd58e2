use std::path::PathBuf;

/// Errors raised while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    MissingVar(&'static str),

    #[error("Failed to load env file {path:?}")]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
}

/// Errors raised by a key rotation
#[derive(Debug, thiserror::Error)]
pub enum RotationError {
    #[error("Key ID must be non-empty with no empty, '.' or '..' path segments")]
    InvalidKeyId,

    #[error("Failed to write rotated key to secret store")]
    Store(#[source] anyhow::Error),
}
