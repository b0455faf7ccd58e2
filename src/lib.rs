//! API Key Rotation Library
//!
//! Rotates a single API key stored in a HashiCorp Vault KV v2 mount.

pub mod backends;
pub mod config;
pub mod error;
pub mod rotation;

pub use backends::{SecretWriter, VaultClient};
pub use config::Config;
pub use error::{ConfigError, RotationError};
pub use rotation::{generate_key, rotate_key, ApiKey};
