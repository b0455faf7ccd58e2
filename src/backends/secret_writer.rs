use anyhow::Result;
use std::collections::HashMap;

/// Write access to a path-addressed secret store
#[async_trait::async_trait]
pub trait SecretWriter: Send + Sync {
    /// Write `data` at `path` under the `mount` namespace.
    ///
    /// Resolves once the store has acknowledged the write.
    async fn write_secret(
        &self,
        mount: &str,
        path: &str,
        data: HashMap<String, String>,
    ) -> Result<()>;

    /// Get the backend type name for display purposes
    fn backend_type(&self) -> &'static str;
}
