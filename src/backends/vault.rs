use anyhow::{Context, Result};
use reqwest::{Client, Url};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info};

use super::secret_writer::SecretWriter;

/// HashiCorp Vault KV v2 client authenticated with a static token
#[derive(Clone)]
pub struct VaultClient {
    client: Client,
    address: Url,
    token: String,
    namespace: Option<String>,
}

#[derive(Debug, Serialize)]
struct VaultWriteRequest {
    data: HashMap<String, String>,
}

impl VaultClient {
    /// Create a new Vault client
    pub fn new(address: String, token: String) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        let address = Url::parse(&address)
            .with_context(|| format!("Invalid Vault address: {}", address))?;
        if address.cannot_be_a_base() {
            anyhow::bail!("Invalid Vault address: {}", address);
        }

        Ok(Self {
            client,
            address,
            token,
            namespace: None,
        })
    }

    /// Send requests into a Vault Enterprise namespace
    pub fn with_namespace(mut self, namespace: Option<String>) -> Self {
        self.namespace = namespace;
        self
    }

    /// Build `{address}/v1/{mount}/data/{path}`, percent-encoding every
    /// segment so `#`, `?` and `%` stay part of the secret path.
    fn data_url(&self, mount: &str, path: &str) -> Result<Url> {
        let segments: Vec<&str> = mount
            .trim_matches('/')
            .split('/')
            .chain(std::iter::once("data"))
            .chain(path.split('/'))
            .collect();

        if let Some(segment) = segments
            .iter()
            .find(|s| s.is_empty() || **s == "." || **s == "..")
        {
            anyhow::bail!(
                "Invalid path segment {:?} in {}/{}",
                segment,
                mount,
                path
            );
        }

        let mut url = self.address.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Invalid Vault address: {}", self.address))?
            .pop_if_empty()
            .push("v1")
            .extend(segments);

        Ok(url)
    }

    /// Write a secret to Vault KV v2
    pub async fn write_secret(
        &self,
        mount: &str,
        path: &str,
        data: HashMap<String, String>,
    ) -> Result<()> {
        let url = self.data_url(mount, path)?;
        debug!("Writing secret to: {}", url);

        let mut request = self
            .client
            .post(url)
            .header("X-Vault-Token", &self.token)
            .json(&VaultWriteRequest { data });

        if let Some(ref namespace) = self.namespace {
            request = request.header("X-Vault-Namespace", namespace);
        }

        let response = request
            .send()
            .await
            .context("Failed to write secret to Vault")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Vault write failed with status {}: {}", status, body);
        }

        info!("Successfully wrote secret to {}/{}", mount, path);
        Ok(())
    }
}

#[async_trait::async_trait]
impl SecretWriter for VaultClient {
    async fn write_secret(
        &self,
        mount: &str,
        path: &str,
        data: HashMap<String, String>,
    ) -> Result<()> {
        VaultClient::write_secret(self, mount, path, data).await
    }

    fn backend_type(&self) -> &'static str {
        "HashiCorp Vault"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn key_data(value: &str) -> HashMap<String, String> {
        let mut data = HashMap::new();
        data.insert("Key".to_string(), value.to_string());
        data
    }

    #[test]
    fn test_vault_client_new() {
        let client = VaultClient::new(
            "http://localhost:8200".to_string(),
            "test-token".to_string(),
        );
        assert!(client.is_ok());
    }

    #[test]
    fn test_data_url_construction() {
        let client = VaultClient::new(
            "http://localhost:8200/".to_string(),
            "test-token".to_string(),
        )
        .unwrap();

        assert_eq!(
            client
                .data_url("secret", "api-key/example-key-id")
                .unwrap()
                .as_str(),
            "http://localhost:8200/v1/secret/data/api-key/example-key-id"
        );
        assert_eq!(
            client.data_url("kv/", "api-key/billing").unwrap().as_str(),
            "http://localhost:8200/v1/kv/data/api-key/billing"
        );
    }

    #[test]
    fn test_data_url_encodes_segments() {
        let client = VaultClient::new(
            "http://localhost:8200".to_string(),
            "test-token".to_string(),
        )
        .unwrap();

        assert_eq!(
            client.data_url("secret", "api-key/billing#prod").unwrap().as_str(),
            "http://localhost:8200/v1/secret/data/api-key/billing%23prod"
        );
        assert_eq!(
            client.data_url("secret", "api-key/a?b=c").unwrap().as_str(),
            "http://localhost:8200/v1/secret/data/api-key/a%3Fb=c"
        );
        assert_eq!(
            client.data_url("secret", "api-key/50%").unwrap().as_str(),
            "http://localhost:8200/v1/secret/data/api-key/50%25"
        );
    }

    #[test]
    fn test_data_url_rejects_dot_segments() {
        let client = VaultClient::new(
            "http://localhost:8200".to_string(),
            "test-token".to_string(),
        )
        .unwrap();

        assert!(client.data_url("secret", "api-key/../billing").is_err());
        assert!(client.data_url("secret", "api-key/.").is_err());
        assert!(client.data_url("secret", "api-key//billing").is_err());
    }

    #[test]
    fn test_vault_client_invalid_address() {
        let client = VaultClient::new("not a url".to_string(), "test-token".to_string());
        assert!(client.is_err());
    }

    #[tokio::test]
    async fn test_fragment_in_key_id_stays_in_path() {
        let mut server = mockito::Server::new_async().await;
        let sibling = server
            .mock("POST", "/v1/secret/data/api-key/billing")
            .expect(0)
            .create_async()
            .await;
        let target = server
            .mock(
                "POST",
                Matcher::Regex(r"^/v1/secret/data/api-key/billing%23prod$".to_string()),
            )
            .with_status(204)
            .expect(1)
            .create_async()
            .await;

        let client = VaultClient::new(server.url(), "s.test".to_string()).unwrap();
        client
            .write_secret("secret", "api-key/billing#prod", key_data("value"))
            .await
            .unwrap();

        sibling.assert_async().await;
        target.assert_async().await;
    }

    #[tokio::test]
    async fn test_write_secret_request_shape() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/secret/data/api-key/example-key-id")
            .match_header("x-vault-token", "s.test")
            .match_header("x-vault-namespace", Matcher::Missing)
            .match_body(Matcher::Json(json!({ "data": { "Key": "new-value" } })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data":{"version":3,"created_time":"2024-01-01T00:00:00Z"}}"#)
            .create_async()
            .await;

        let client = VaultClient::new(server.url(), "s.test".to_string()).unwrap();
        client
            .write_secret("secret", "api-key/example-key-id", key_data("new-value"))
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_write_secret_sends_namespace() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/secret/data/api-key/ns-key")
            .match_header("x-vault-namespace", "team-a")
            .with_status(204)
            .create_async()
            .await;

        let client = VaultClient::new(server.url(), "s.test".to_string())
            .unwrap()
            .with_namespace(Some("team-a".to_string()));
        client
            .write_secret("secret", "api-key/ns-key", key_data("value"))
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_write_secret_rejected() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/secret/data/api-key/denied")
            .with_status(403)
            .with_body(r#"{"errors":["permission denied"]}"#)
            .create_async()
            .await;

        let client = VaultClient::new(server.url(), "s.bad".to_string()).unwrap();
        let err = client
            .write_secret("secret", "api-key/denied", key_data("value"))
            .await
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("403"));
        assert!(message.contains("permission denied"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_write_secret_unreachable() {
        let client = VaultClient::new(
            "http://127.0.0.1:1".to_string(),
            "s.test".to_string(),
        )
        .unwrap();

        let result = client
            .write_secret("secret", "api-key/offline", key_data("value"))
            .await;
        assert!(result.is_err());
    }
}
