//! API keys API.
//!
//! An API key is the credential this crate attaches to every request.
//! Keys are scoped by permissions and may expire; the secret is returned
//! exactly once, at generation time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::connector::Connector;
use crate::error::Result;
use crate::pagination::{Cursor, Page};

const API_KEYS_PATH: &str = "/api-keys";

/// API-Keys API.
///
/// Obtained through
/// [`CybsiClient::api_keys`](crate::CybsiClient::api_keys).
#[derive(Debug, Clone)]
pub struct APIKeysAPI {
    connector: Connector,
}

impl APIKeysAPI {
    pub(crate) fn new(connector: Connector) -> Self {
        Self { connector }
    }

    /// Generate an API key.
    ///
    /// Calls `POST /api-keys`. The returned view is the only place the
    /// key secret ever appears; store it securely.
    #[tracing::instrument(skip(self, form))]
    pub async fn generate(&self, form: &APIKeyForm) -> Result<APIKeyRegistrationView> {
        let response = self.connector.do_post(API_KEYS_PATH, form).await?;
        Ok(response.json().await?)
    }

    /// Filter API keys. Key secrets are never listed.
    ///
    /// Calls `GET /api-keys`.
    #[tracing::instrument(skip(self))]
    pub async fn filter(
        &self,
        user_uuid: Option<Uuid>,
        cursor: Option<&Cursor>,
        limit: Option<u32>,
    ) -> Result<Page<APIKeyView>> {
        let mut params: Vec<(String, String)> = Vec::new();
        if let Some(uuid) = user_uuid {
            params.push(("userUUID".to_string(), uuid.to_string()));
        }
        if let Some(cursor) = cursor {
            params.push(("cursor".to_string(), cursor.to_string()));
        }
        if let Some(limit) = limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        self.connector.get_page(API_KEYS_PATH, params).await
    }

    /// Revoke an API key. Irreversible.
    ///
    /// Calls `DELETE /api-keys/{key_uuid}`.
    #[tracing::instrument(skip(self))]
    pub async fn revoke(&self, key_uuid: Uuid) -> Result<()> {
        let path = format!("{API_KEYS_PATH}/{key_uuid}");
        self.connector.do_delete(&path).await?;
        Ok(())
    }
}

/// API key generation form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct APIKeyForm {
    permissions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expires_at: Option<DateTime<Utc>>,
}

impl APIKeyForm {
    /// Key with the given permissions, in `"Resource:rw"` form. The
    /// server rejects permissions wider than the issuing user's.
    pub fn new(permissions: Vec<String>) -> Self {
        Self {
            permissions,
            description: None,
            expires_at: None,
        }
    }

    /// What the key is for.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Expiration moment. The key never expires without it.
    pub fn expires_at(mut self, at: DateTime<Utc>) -> Self {
        self.expires_at = Some(at);
        self
    }
}

/// Freshly generated API key.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct APIKeyRegistrationView {
    /// Key identifier, usable with
    /// [`APIKeysAPI::revoke`].
    pub uuid: Uuid,
    /// The key secret. Shown only here.
    pub key: String,
}

/// API key view.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct APIKeyView {
    /// Key identifier.
    pub uuid: Uuid,
    /// What the key is for.
    #[serde(default)]
    pub description: Option<String>,
    /// Granted permissions, in `"Resource:rw"` form.
    #[serde(default)]
    pub permissions: Vec<String>,
    /// When the key was generated.
    pub created_at: DateTime<Utc>,
    /// Expiration moment, if any.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// The key was revoked.
    #[serde(default)]
    pub is_revoked: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_serializes_permissions() {
        let form = APIKeyForm::new(vec![
            "Observations:rw".to_string(),
            "Artifacts:r".to_string(),
        ])
        .description("feed uploader");
        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(
            json["permissions"],
            serde_json::json!(["Observations:rw", "Artifacts:r"])
        );
        assert_eq!(json["description"], "feed uploader");
        assert!(json.get("expiresAt").is_none());
    }

    #[test]
    fn registration_view_carries_secret() {
        let json = serde_json::json!({
            "uuid": "f0d180a8-1b9f-4f3b-8e6e-8fd9c53e9a5b",
            "key": "8Nqjk6V4Q_et_Rf5EPu4SeWy4nKbVPKPzKJESYdRd7E"
        });
        let view: APIKeyRegistrationView = serde_json::from_value(json).unwrap();
        assert!(!view.key.is_empty());
    }
}
