//! Data sources API: registries of who reports facts to the system.
//!
//! Every observation, artifact and report is attributed to a data source.
//! Data sources have a type (a vendor or a kind of integration); both
//! levels carry a confidence factor used by server-side forecasts.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::{Nullable, RefView, Tag};
use crate::connector::Connector;
use crate::error::Result;
use crate::pagination::{Cursor, Page};

const DATA_SOURCES_PATH: &str = "/data-sources";
const DATA_SOURCE_TYPES_PATH: &str = "/data-source-types";

/// Data sources API.
///
/// Obtained through
/// [`CybsiClient::data_sources`](crate::CybsiClient::data_sources).
#[derive(Debug, Clone)]
pub struct DataSourcesAPI {
    connector: Connector,
}

impl DataSourcesAPI {
    pub(crate) fn new(connector: Connector) -> Self {
        Self { connector }
    }

    /// Register a data source.
    ///
    /// Calls `POST /data-sources`.
    ///
    /// # Errors
    ///
    /// [`CybsiError::Conflict`](crate::CybsiError::Conflict) when a data
    /// source with the same name is already registered under the type.
    #[tracing::instrument(skip(self, form))]
    pub async fn register(&self, form: &DataSourceForm) -> Result<RefView> {
        let response = self.connector.do_post(DATA_SOURCES_PATH, form).await?;
        Ok(response.json().await?)
    }

    /// Get the data source view.
    ///
    /// Calls `GET /data-sources/{source_uuid}`.
    #[tracing::instrument(skip(self))]
    pub async fn view(&self, source_uuid: Uuid) -> Result<DataSourceView> {
        let path = format!("{DATA_SOURCES_PATH}/{source_uuid}");
        let response = self.connector.do_get(&path, &[]).await?;
        let tag = Tag::from_response(&response);
        let mut view: DataSourceView = response.json().await?;
        view.tag = tag;
        Ok(view)
    }

    /// Get the data source the current API key reports as.
    ///
    /// Calls `GET /data-sources/me`.
    #[tracing::instrument(skip(self))]
    pub async fn me(&self) -> Result<DataSourceView> {
        let path = format!("{DATA_SOURCES_PATH}/me");
        let response = self.connector.do_get(&path, &[]).await?;
        let tag = Tag::from_response(&response);
        let mut view: DataSourceView = response.json().await?;
        view.tag = tag;
        Ok(view)
    }

    /// Edit the data source.
    ///
    /// Calls `PATCH /data-sources/{source_uuid}`. The tag must come from a
    /// fresh [`view`](Self::view).
    #[tracing::instrument(skip(self, patch))]
    pub async fn edit(&self, source_uuid: Uuid, tag: &Tag, patch: &DataSourcePatch) -> Result<()> {
        let path = format!("{DATA_SOURCES_PATH}/{source_uuid}");
        self.connector.do_patch(&path, tag, patch).await?;
        Ok(())
    }

    /// Filter data sources.
    ///
    /// Calls `GET /data-sources`.
    #[tracing::instrument(skip(self))]
    pub async fn filter(
        &self,
        type_uuid: Option<Uuid>,
        cursor: Option<&Cursor>,
        limit: Option<u32>,
    ) -> Result<Page<DataSourceView>> {
        let mut params: Vec<(String, String)> = Vec::new();
        if let Some(uuid) = type_uuid {
            params.push(("typeUUID".to_string(), uuid.to_string()));
        }
        if let Some(cursor) = cursor {
            params.push(("cursor".to_string(), cursor.to_string()));
        }
        if let Some(limit) = limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        self.connector.get_page(DATA_SOURCES_PATH, params).await
    }
}

/// Data source types API.
///
/// Obtained through
/// [`CybsiClient::data_source_types`](crate::CybsiClient::data_source_types).
#[derive(Debug, Clone)]
pub struct DataSourceTypesAPI {
    connector: Connector,
}

impl DataSourceTypesAPI {
    pub(crate) fn new(connector: Connector) -> Self {
        Self { connector }
    }

    /// Register a data source type.
    ///
    /// Calls `POST /data-source-types`.
    #[tracing::instrument(skip(self, form))]
    pub async fn register(&self, form: &DataSourceTypeForm) -> Result<RefView> {
        let response = self.connector.do_post(DATA_SOURCE_TYPES_PATH, form).await?;
        Ok(response.json().await?)
    }

    /// Get the data source type view.
    ///
    /// Calls `GET /data-source-types/{type_uuid}`.
    #[tracing::instrument(skip(self))]
    pub async fn view(&self, type_uuid: Uuid) -> Result<DataSourceTypeView> {
        let path = format!("{DATA_SOURCE_TYPES_PATH}/{type_uuid}");
        let response = self.connector.do_get(&path, &[]).await?;
        let tag = Tag::from_response(&response);
        let mut view: DataSourceTypeView = response.json().await?;
        view.tag = tag;
        Ok(view)
    }

    /// Edit the data source type.
    ///
    /// Calls `PATCH /data-source-types/{type_uuid}`.
    #[tracing::instrument(skip(self, patch))]
    pub async fn edit(
        &self,
        type_uuid: Uuid,
        tag: &Tag,
        patch: &DataSourceTypePatch,
    ) -> Result<()> {
        let path = format!("{DATA_SOURCE_TYPES_PATH}/{type_uuid}");
        self.connector.do_patch(&path, tag, patch).await?;
        Ok(())
    }

    /// Filter data source types.
    ///
    /// Calls `GET /data-source-types`.
    #[tracing::instrument(skip(self))]
    pub async fn filter(
        &self,
        cursor: Option<&Cursor>,
        limit: Option<u32>,
    ) -> Result<Page<DataSourceTypeView>> {
        let mut params: Vec<(String, String)> = Vec::new();
        if let Some(cursor) = cursor {
            params.push(("cursor".to_string(), cursor.to_string()));
        }
        if let Some(limit) = limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        self.connector.get_page(DATA_SOURCE_TYPES_PATH, params).await
    }
}

/// Data source form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceForm {
    #[serde(rename = "typeUUID")]
    type_uuid: Uuid,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    long_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    manual_confidence: Option<f64>,
}

impl DataSourceForm {
    /// Form with a machine-readable name, unique under the type.
    pub fn new(type_uuid: Uuid, name: impl Into<String>) -> Self {
        Self {
            type_uuid,
            name: name.into(),
            long_name: None,
            manual_confidence: None,
        }
    }

    /// Human-readable name.
    pub fn long_name(mut self, long_name: impl Into<String>) -> Self {
        self.long_name = Some(long_name.into());
        self
    }

    /// Override the confidence inherited from the type, in (0; 1].
    pub fn manual_confidence(mut self, confidence: f64) -> Self {
        self.manual_confidence = Some(confidence);
        self
    }
}

/// Data source view.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceView {
    /// View tag, required by [`DataSourcesAPI::edit`].
    #[serde(skip)]
    pub tag: Tag,
    /// Data source identifier.
    pub uuid: Uuid,
    /// Data source type reference.
    #[serde(rename = "type")]
    pub type_ref: RefView,
    /// Machine-readable name, unique under the type.
    pub name: String,
    /// Human-readable name.
    #[serde(default)]
    pub long_name: Option<String>,
    /// Effective confidence of the data source, in (0; 1].
    #[serde(default)]
    pub confidence: Option<f64>,
    /// Confidence override set on the source itself.
    #[serde(default)]
    pub manual_confidence: Option<f64>,
}

/// Data source partial update.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourcePatch {
    /// New human-readable name. Unchanged if `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_name: Option<String>,
    /// Confidence override. `Null` falls back to the type confidence.
    #[serde(skip_serializing_if = "Nullable::is_keep")]
    pub manual_confidence: Nullable<f64>,
}

/// Data source type form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceTypeForm {
    short_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    long_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    manual_confidence: Option<f64>,
}

impl DataSourceTypeForm {
    /// Form with a machine-readable type name.
    pub fn new(short_name: impl Into<String>) -> Self {
        Self {
            short_name: short_name.into(),
            long_name: None,
            manual_confidence: None,
        }
    }

    /// Human-readable name.
    pub fn long_name(mut self, long_name: impl Into<String>) -> Self {
        self.long_name = Some(long_name.into());
        self
    }

    /// Default confidence for sources of the type, in (0; 1].
    pub fn manual_confidence(mut self, confidence: f64) -> Self {
        self.manual_confidence = Some(confidence);
        self
    }
}

/// Data source type view.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceTypeView {
    /// View tag, required by [`DataSourceTypesAPI::edit`].
    #[serde(skip)]
    pub tag: Tag,
    /// Type identifier.
    pub uuid: Uuid,
    /// Machine-readable type name.
    pub short_name: String,
    /// Human-readable name.
    #[serde(default)]
    pub long_name: Option<String>,
    /// Effective confidence of the type, in (0; 1].
    #[serde(default)]
    pub confidence: Option<f64>,
    /// Confidence set on the type.
    #[serde(default)]
    pub manual_confidence: Option<f64>,
}

/// Data source type partial update.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceTypePatch {
    /// New human-readable name. Unchanged if `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_name: Option<String>,
    /// Default confidence. `Null` resets to the server default.
    #[serde(skip_serializing_if = "Nullable::is_keep")]
    pub manual_confidence: Nullable<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_serializes_type_uuid_wire_name() {
        let form = DataSourceForm::new(
            "d3c53120-cb7b-4a8b-94a9-6b1f2c6a2ea3".parse().unwrap(),
            "sandbox-1",
        )
        .long_name("Sandbox One")
        .manual_confidence(0.8);
        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["typeUUID"], "d3c53120-cb7b-4a8b-94a9-6b1f2c6a2ea3");
        assert_eq!(json["name"], "sandbox-1");
        assert_eq!(json["longName"], "Sandbox One");
    }

    #[test]
    fn patch_resets_confidence_with_null() {
        let patch = DataSourcePatch {
            manual_confidence: Nullable::Null,
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({"manualConfidence": null}));
    }

    #[test]
    fn view_deserializes_without_tag() {
        let json = serde_json::json!({
            "uuid": "baf54f9c-85c7-4f17-a9a4-0cf2b1167a3e",
            "type": {"uuid": "d3c53120-cb7b-4a8b-94a9-6b1f2c6a2ea3"},
            "name": "sandbox-1",
            "confidence": 0.8
        });
        let view: DataSourceView = serde_json::from_value(json).unwrap();
        assert_eq!(view.name, "sandbox-1");
        assert_eq!(view.tag, Tag::default());
    }
}
