//! CLI parsing and the rotation run
//!
//! A run is strictly linear: load configuration, connect to the secret store,
//! rotate one key, report it.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use crate::backends::{SecretWriter, VaultClient};
use crate::config::{Config, VaultConfig};
use crate::error::ConfigError;
use crate::rotation::{self, ApiKey};

#[derive(Parser)]
#[command(name = "akr")]
#[command(about = "Rotate an API key stored in HashiCorp Vault", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Identifier of the API key to rotate
    #[arg(default_value = "example-key-id")]
    pub key_id: String,

    /// Vault KV v2 mount point [default: secret]
    #[arg(long, env = "VAULT_MOUNT")]
    pub mount: Option<String>,

    /// Load variables from this file instead of ./.env
    #[arg(long)]
    pub env_file: Option<PathBuf>,
}

/// Execute a rotation run
pub async fn execute(cli: Cli) -> Result<()> {
    println!("Starting API Key Rotation...");

    let env_file = cli.env_file;
    let api_key = run(
        move || match env_file {
            Some(path) => Config::from_env_file(path),
            None => Config::from_env(),
        },
        cli.mount,
        &cli.key_id,
        connect_vault,
    )
    .await?;

    eprintln!("WARNING: Secret value will be displayed. Ensure this output is secured.");
    println!("New API Key: {}", api_key.key);

    Ok(())
}

/// Load configuration, connect, and rotate `key_id`.
///
/// `connect` is only invoked once configuration has loaded successfully.
async fn run<L, F, W>(
    load: L,
    mount: Option<String>,
    key_id: &str,
    connect: F,
) -> Result<ApiKey>
where
    L: FnOnce() -> Result<Config, ConfigError>,
    F: FnOnce(&VaultConfig) -> Result<W>,
    W: SecretWriter,
{
    let mut config = load().context("Failed to load configuration")?;
    if let Some(mount) = mount {
        config.vault.mount = mount;
    }

    let writer = connect(&config.vault)?;
    info!(
        "Connected to {} at {} (mount: {})",
        writer.backend_type(),
        config.vault.address,
        config.vault.mount
    );

    rotation::rotate_key(&writer, &config.vault.mount, key_id)
        .await
        .with_context(|| format!("Failed to rotate API key '{}'", key_id))
}

/// Create a token-authenticated Vault client
fn connect_vault(vault: &VaultConfig) -> Result<VaultClient> {
    let client = VaultClient::new(vault.address.clone(), vault.token.clone())
        .context("Failed to create Vault client")?;

    Ok(client.with_namespace(vault.namespace.clone()))
}
