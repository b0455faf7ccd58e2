use std::collections::HashMap;
use std::fmt;

use tracing::{error, info};
use uuid::Uuid;

use crate::backends::SecretWriter;
use crate::error::RotationError;

const KEY_PATH_PREFIX: &str = "api-key";
const KEY_FIELD: &str = "Key";

/// A freshly rotated API key
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey {
    pub id: String,
    pub key: String,
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKey")
            .field("id", &self.id)
            .field("key", &"<redacted>")
            .finish()
    }
}

/// Store path for a key identifier
pub fn key_path(key_id: &str) -> String {
    format!("{}/{}", KEY_PATH_PREFIX, key_id)
}

/// A key id must map onto exactly one store path: no empty, `.` or `..`
/// segments that the store would collapse into another key's path.
fn is_valid_key_id(key_id: &str) -> bool {
    !key_id.is_empty()
        && key_id
            .split('/')
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..")
}

/// Generate a new key value.
///
/// A hyphenated v4 UUID, 36 characters long.
pub fn generate_key() -> String {
    Uuid::new_v4().to_string()
}

/// Rotate the API key identified by `key_id`.
///
/// Writes a fresh value to `api-key/{key_id}` under `mount` and returns it.
/// The previous value is never read. Store failures are returned as-is,
/// without retrying.
pub async fn rotate_key(
    writer: &dyn SecretWriter,
    mount: &str,
    key_id: &str,
) -> Result<ApiKey, RotationError> {
    if !is_valid_key_id(key_id) {
        error!("Invalid key ID: {:?}", key_id);
        return Err(RotationError::InvalidKeyId);
    }

    let new_key = generate_key();
    info!("Generated new key for key ID: {}", key_id);

    let mut data = HashMap::new();
    data.insert(KEY_FIELD.to_string(), new_key.clone());

    let path = key_path(key_id);
    writer
        .write_secret(mount, &path, data)
        .await
        .map_err(RotationError::Store)?;

    info!(
        "Rotated key {} at {}/{} ({})",
        key_id,
        mount,
        path,
        writer.backend_type()
    );

    Ok(ApiKey {
        id: key_id.to_string(),
        key: new_key,
    })
}
