//! Reports API.
//!
//! A report groups observations and artifacts describing one incident,
//! campaign or analysis result under a common header.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::{RefView, ShareLevels};
use crate::connector::Connector;
use crate::error::Result;
use crate::pagination::{Cursor, Page};

const REPORTS_PATH: &str = "/enrichment/reports";

/// Reports API.
///
/// Obtained through
/// [`CybsiClient::reports`](crate::CybsiClient::reports).
#[derive(Debug, Clone)]
pub struct ReportsAPI {
    connector: Connector,
}

impl ReportsAPI {
    pub(crate) fn new(connector: Connector) -> Self {
        Self { connector }
    }

    /// Register a report.
    ///
    /// Calls `POST /enrichment/reports`. Attached observations and
    /// artifacts must be registered beforehand.
    #[tracing::instrument(skip(self, form))]
    pub async fn register(&self, form: &ReportForm) -> Result<RefView> {
        let response = self.connector.do_post(REPORTS_PATH, form).await?;
        Ok(response.json().await?)
    }

    /// Get the report view.
    ///
    /// Calls `GET /enrichment/reports/{report_uuid}`.
    #[tracing::instrument(skip(self))]
    pub async fn view(&self, report_uuid: Uuid) -> Result<ReportView> {
        let path = format!("{REPORTS_PATH}/{report_uuid}");
        let response = self.connector.do_get(&path, &[]).await?;
        Ok(response.json().await?)
    }

    /// Filter reports.
    ///
    /// Calls `GET /enrichment/reports`.
    ///
    /// # Arguments
    ///
    /// * `title` - Keep reports whose title contains the substring.
    /// * `data_source_uuids` - Keep reports of these data sources.
    /// * `entity_uuid` - Keep reports mentioning the entity.
    #[tracing::instrument(skip(self))]
    pub async fn filter(
        &self,
        title: Option<&str>,
        data_source_uuids: Option<&[Uuid]>,
        entity_uuid: Option<Uuid>,
        cursor: Option<&Cursor>,
        limit: Option<u32>,
    ) -> Result<Page<ReportHeaderView>> {
        let mut params: Vec<(String, String)> = Vec::new();
        if let Some(title) = title {
            params.push(("title".to_string(), title.to_string()));
        }
        if let Some(uuids) = data_source_uuids {
            for uuid in uuids {
                params.push(("dataSourceUUID".to_string(), uuid.to_string()));
            }
        }
        if let Some(uuid) = entity_uuid {
            params.push(("entityUUID".to_string(), uuid.to_string()));
        }
        if let Some(cursor) = cursor {
            params.push(("cursor".to_string(), cursor.to_string()));
        }
        if let Some(limit) = limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        self.connector.get_page(REPORTS_PATH, params).await
    }

    /// List observations attached to the report.
    ///
    /// Calls `GET /enrichment/reports/{report_uuid}/observations`.
    #[tracing::instrument(skip(self))]
    pub async fn attached_observations(
        &self,
        report_uuid: Uuid,
        cursor: Option<&Cursor>,
        limit: Option<u32>,
    ) -> Result<Page<RefView>> {
        let mut params: Vec<(String, String)> = Vec::new();
        if let Some(cursor) = cursor {
            params.push(("cursor".to_string(), cursor.to_string()));
        }
        if let Some(limit) = limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        let path = format!("{REPORTS_PATH}/{report_uuid}/observations");
        self.connector.get_page(&path, params).await
    }
}

/// Report form.
///
/// # Example
///
/// ```
/// use cybsi::report::ReportForm;
/// use cybsi::ShareLevels;
///
/// let form = ReportForm::new(ShareLevels::Amber)
///     .title("Phishing wave, March")
///     .add_observation("5d8b50b1-4ff4-4a13-a50a-f81bd2c966d2".parse().unwrap());
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportForm {
    share_level: ShareLevels,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(rename = "externalID", skip_serializing_if = "Option::is_none")]
    external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    published_at: Option<DateTime<Utc>>,
    #[serde(rename = "dataSourceUUID", skip_serializing_if = "Option::is_none")]
    data_source_uuid: Option<Uuid>,
    observations: Vec<Uuid>,
    artifacts: Vec<Uuid>,
}

impl ReportForm {
    /// Empty report with the given share level.
    pub fn new(share_level: ShareLevels) -> Self {
        Self {
            share_level,
            title: None,
            description: None,
            external_id: None,
            published_at: None,
            data_source_uuid: None,
            observations: Vec::new(),
            artifacts: Vec::new(),
        }
    }

    /// Report title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Report description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Identifier of the report in the source system.
    pub fn external_id(mut self, id: impl Into<String>) -> Self {
        self.external_id = Some(id.into());
        self
    }

    /// When the source system published the report.
    pub fn published_at(mut self, at: DateTime<Utc>) -> Self {
        self.published_at = Some(at);
        self
    }

    /// Data source the report originates from.
    pub fn data_source(mut self, source_uuid: Uuid) -> Self {
        self.data_source_uuid = Some(source_uuid);
        self
    }

    /// Attach a registered observation.
    pub fn add_observation(mut self, observation_uuid: Uuid) -> Self {
        self.observations.push(observation_uuid);
        self
    }

    /// Attach a registered artifact.
    pub fn add_artifact(mut self, artifact_uuid: Uuid) -> Self {
        self.artifacts.push(artifact_uuid);
        self
    }
}

/// Report view.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportView {
    /// Report identifier.
    pub uuid: Uuid,
    /// Share level of the report.
    pub share_level: ShareLevels,
    /// Report title.
    #[serde(default)]
    pub title: Option<String>,
    /// Report description.
    #[serde(default)]
    pub description: Option<String>,
    /// Identifier of the report in the source system.
    #[serde(rename = "externalID", default)]
    pub external_id: Option<String>,
    /// When the source system published the report.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    /// When the report was registered.
    pub registered_at: DateTime<Utc>,
    /// User who registered the report.
    pub reporter: RefView,
    /// Data source the report originates from.
    pub data_source: RefView,
    /// Attached observations.
    #[serde(default)]
    pub observations: Vec<RefView>,
    /// Attached artifacts.
    #[serde(default)]
    pub artifacts: Vec<RefView>,
}

/// Report list item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportHeaderView {
    /// Report identifier.
    pub uuid: Uuid,
    /// Share level of the report.
    pub share_level: ShareLevels,
    /// Report title.
    #[serde(default)]
    pub title: Option<String>,
    /// When the source system published the report.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    /// When the report was registered.
    pub registered_at: DateTime<Utc>,
    /// Data source the report originates from.
    pub data_source: RefView,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_serializes_attachments() {
        let form = ReportForm::new(ShareLevels::Amber)
            .title("Phishing wave, March")
            .external_id("TI-2024-0312")
            .add_observation("5d8b50b1-4ff4-4a13-a50a-f81bd2c966d2".parse().unwrap())
            .add_artifact("0f04b5fc-cf16-4b2c-9e26-c12ba4257306".parse().unwrap());
        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["shareLevel"], "Amber");
        assert_eq!(json["externalID"], "TI-2024-0312");
        assert_eq!(
            json["observations"],
            serde_json::json!(["5d8b50b1-4ff4-4a13-a50a-f81bd2c966d2"])
        );
        assert_eq!(
            json["artifacts"],
            serde_json::json!(["0f04b5fc-cf16-4b2c-9e26-c12ba4257306"])
        );
        assert!(json.get("description").is_none());
    }

    #[test]
    fn header_view_deserializes() {
        let json = serde_json::json!({
            "uuid": "c87e17b9-4d18-4b7c-b9c9-7a2f7f5e0a11",
            "shareLevel": "Green",
            "title": "Daily feed",
            "registeredAt": "2024-03-01T12:00:00Z",
            "dataSource": {"uuid": "d3c53120-cb7b-4a8b-94a9-6b1f2c6a2ea3"}
        });
        let view: ReportHeaderView = serde_json::from_value(json).unwrap();
        assert_eq!(view.title.as_deref(), Some("Daily feed"));
        assert!(view.published_at.is_none());
    }
}
