use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::error::ConfigError;

pub const VAULT_ADDR_VAR: &str = "VAULT_ADDR";
pub const VAULT_TOKEN_VAR: &str = "VAULT_TOKEN";
pub const VAULT_MOUNT_VAR: &str = "VAULT_MOUNT";
pub const VAULT_NAMESPACE_VAR: &str = "VAULT_NAMESPACE";

pub const DEFAULT_MOUNT: &str = "secret";

#[derive(Debug, Clone)]
pub struct Config {
    pub vault: VaultConfig,
}

#[derive(Clone)]
pub struct VaultConfig {
    pub address: String,
    pub token: String,
    pub mount: String,
    pub namespace: Option<String>,
}

impl fmt::Debug for VaultConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultConfig")
            .field("address", &self.address)
            .field("token", &"<redacted>")
            .field("mount", &self.mount)
            .field("namespace", &self.namespace)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from a dotenv-style file.
    ///
    /// Variables already present in the process environment take precedence
    /// over the file, the same way `dotenvy` treats them when loading.
    pub fn from_env_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::from_env_file_over(path.as_ref(), |name| std::env::var(name).ok())
    }

    /// Layer `env` over the variables in the file at `path`.
    fn from_env_file_over<F>(path: &Path, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file_vars = read_env_file(path)?;
        Self::from_lookup(|name| env(name).or_else(|| file_vars.get(name).cloned()))
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// `VAULT_ADDR` and `VAULT_TOKEN` are required; an empty value counts as
    /// missing. `VAULT_MOUNT` falls back to `secret`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.is_empty());

        let vault = VaultConfig {
            address: non_empty(VAULT_ADDR_VAR).ok_or(ConfigError::MissingVar(VAULT_ADDR_VAR))?,
            token: non_empty(VAULT_TOKEN_VAR).ok_or(ConfigError::MissingVar(VAULT_TOKEN_VAR))?,
            mount: non_empty(VAULT_MOUNT_VAR).unwrap_or_else(|| DEFAULT_MOUNT.to_string()),
            namespace: non_empty(VAULT_NAMESPACE_VAR),
        };

        Ok(Self { vault })
    }
}

fn read_env_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let to_error = |source: dotenvy::Error| ConfigError::EnvFile {
        path: path.to_path_buf(),
        source,
    };

    dotenvy::from_path_iter(path)
        .map_err(to_error)?
        .map(|item| item.map_err(to_error))
        .collect()
}
