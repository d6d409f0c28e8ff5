//! External databases API.
//!
//! External databases are systems outside of Cybsi. They can be queried
//! for information about entities; the result of such a query is an
//! observation, typically providing new attributes of the requested
//! entity and its relationships with other entities.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::{Nullable, RefView, Tag};
use crate::connector::Connector;
use crate::error::Result;
use crate::observable::EntityTypes;
use crate::pagination::{Cursor, Page};

const EXTERNAL_DBS_PATH: &str = "/enrichment/external-dbs";

/// External databases API.
///
/// Obtained through
/// [`EnrichmentAPI::external_dbs`](super::EnrichmentAPI::external_dbs).
#[derive(Debug, Clone)]
pub struct ExternalDBsAPI {
    connector: Connector,
}

impl ExternalDBsAPI {
    pub(crate) fn new(connector: Connector) -> Self {
        Self { connector }
    }

    /// Register an external database.
    ///
    /// Calls `POST /enrichment/external-dbs`.
    ///
    /// # Errors
    ///
    /// [`CybsiError::Conflict`](crate::CybsiError::Conflict) when an
    /// external database with the same data source is already registered;
    /// [`CybsiError::Semantic`](crate::CybsiError::Semantic) with
    /// `DataSourceNotFound` when the data source does not exist.
    #[tracing::instrument(skip(self, form))]
    pub async fn register(&self, form: &ExternalDBForm) -> Result<RefView> {
        let response = self.connector.do_post(EXTERNAL_DBS_PATH, form).await?;
        Ok(response.json().await?)
    }

    /// Get the external database view.
    ///
    /// Calls `GET /enrichment/external-dbs/{db_uuid}`.
    #[tracing::instrument(skip(self))]
    pub async fn view(&self, db_uuid: Uuid) -> Result<ExternalDBView> {
        let path = format!("{EXTERNAL_DBS_PATH}/{db_uuid}");
        let response = self.connector.do_get(&path, &[]).await?;
        let tag = Tag::from_response(&response);
        let mut view: ExternalDBView = response.json().await?;
        view.tag = tag;
        Ok(view)
    }

    /// Edit the external database.
    ///
    /// Calls `PATCH /enrichment/external-dbs/{db_uuid}`. The tag must come
    /// from a fresh [`view`](Self::view);
    /// [`CybsiError::ResourceModified`](crate::CybsiError::ResourceModified)
    /// means the database changed since then.
    #[tracing::instrument(skip(self, patch))]
    pub async fn edit(&self, db_uuid: Uuid, tag: &Tag, patch: &ExternalDBPatch) -> Result<()> {
        let path = format!("{EXTERNAL_DBS_PATH}/{db_uuid}");
        self.connector.do_patch(&path, tag, patch).await?;
        Ok(())
    }

    /// Filter external databases.
    ///
    /// Calls `GET /enrichment/external-dbs`.
    #[tracing::instrument(skip(self))]
    pub async fn filter(
        &self,
        entity_type: Option<EntityTypes>,
        cursor: Option<&Cursor>,
        limit: Option<u32>,
    ) -> Result<Page<ExternalDBView>> {
        let mut params: Vec<(String, String)> = Vec::new();
        if let Some(typ) = entity_type {
            params.push(("entityType".to_string(), typ.to_string()));
        }
        if let Some(cursor) = cursor {
            params.push(("cursor".to_string(), cursor.to_string()));
        }
        if let Some(limit) = limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        self.connector.get_page(EXTERNAL_DBS_PATH, params).await
    }
}

/// External database form.
///
/// # Example
///
/// ```
/// use cybsi::enrichment::ExternalDBForm;
/// use cybsi::observable::EntityTypes;
///
/// let db = ExternalDBForm::new(
///     "4fd3126f-a0e8-4613-8dc5-cb449641adf2".parse().unwrap(),
///     vec![EntityTypes::DomainName, EntityTypes::IPAddress],
/// )
/// .web_page_url("https://db.example.com");
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalDBForm {
    #[serde(rename = "dataSourceUUID")]
    data_source_uuid: Uuid,
    entity_types: Vec<EntityTypes>,
    #[serde(rename = "webPageURL", skip_serializing_if = "Option::is_none")]
    web_page_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    task_execution_timeout: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    task_execution_attempts_count: Option<u32>,
}

impl ExternalDBForm {
    /// Form for the data source representing the external database.
    /// `entity_types` is the non-empty list of types the database can
    /// enrich.
    pub fn new(data_source_uuid: Uuid, entity_types: Vec<EntityTypes>) -> Self {
        Self {
            data_source_uuid,
            entity_types,
            web_page_url: None,
            task_execution_timeout: None,
            task_execution_attempts_count: None,
        }
    }

    /// Link to the public page of the external database.
    pub fn web_page_url(mut self, url: impl Into<String>) -> Self {
        self.web_page_url = Some(url.into());
        self
    }

    /// Enricher task execution timeout, sec. Must be in [1; 864000].
    pub fn task_execution_timeout(mut self, timeout: u32) -> Self {
        self.task_execution_timeout = Some(timeout);
        self
    }

    /// Maximum number of attempts to complete a task. Must be in
    /// [1; 1000].
    pub fn task_execution_attempts_count(mut self, count: u32) -> Self {
        self.task_execution_attempts_count = Some(count);
        self
    }
}

/// External database view.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalDBView {
    /// View tag, required by [`ExternalDBsAPI::edit`].
    #[serde(skip)]
    pub tag: Tag,
    /// External database identifier.
    pub uuid: Uuid,
    /// Data source reference representing the external database.
    pub data_source: RefView,
    /// Entity types the external database can enrich.
    pub entity_types: Vec<EntityTypes>,
    /// Link to the public page of the external database.
    #[serde(rename = "webPageURL", default)]
    pub web_page_url: Option<String>,
    /// Enricher task execution timeout, sec.
    #[serde(default)]
    pub task_execution_timeout: Option<u32>,
    /// Maximum number of attempts to complete a task.
    #[serde(default)]
    pub task_execution_attempts_count: Option<u32>,
}

/// External database partial update.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalDBPatch {
    /// New entity type list. Non-empty; unchanged if `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_types: Option<Vec<EntityTypes>>,
    /// Public page URL. `Null` resets to empty.
    #[serde(rename = "webPageURL", skip_serializing_if = "Nullable::is_keep")]
    pub web_page_url: Nullable<String>,
    /// Task execution timeout, sec, in [1; 864000]. `Null` means the
    /// server default.
    #[serde(skip_serializing_if = "Nullable::is_keep")]
    pub task_execution_timeout: Nullable<u32>,
    /// Attempts count, in [1; 1000]. `Null` means the server default.
    #[serde(skip_serializing_if = "Nullable::is_keep")]
    pub task_execution_attempts_count: Nullable<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_serializes_wire_names() {
        let form = ExternalDBForm::new(
            "4fd3126f-a0e8-4613-8dc5-cb449641adf2".parse().unwrap(),
            vec![EntityTypes::DomainName, EntityTypes::IPAddress],
        )
        .web_page_url("https://db.example.com")
        .task_execution_timeout(60);
        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["dataSourceUUID"], "4fd3126f-a0e8-4613-8dc5-cb449641adf2");
        assert_eq!(json["entityTypes"], serde_json::json!(["DomainName", "IPAddress"]));
        assert_eq!(json["webPageURL"], "https://db.example.com");
        assert_eq!(json["taskExecutionTimeout"], 60);
        assert!(json.get("taskExecutionAttemptsCount").is_none());
    }

    #[test]
    fn patch_mixes_set_null_and_keep() {
        let patch = ExternalDBPatch {
            entity_types: Some(vec![EntityTypes::File]),
            web_page_url: Nullable::Null,
            task_execution_timeout: Nullable::Set(120),
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "entityTypes": ["File"],
                "webPageURL": null,
                "taskExecutionTimeout": 120
            })
        );
    }

    #[test]
    fn view_deserializes() {
        let json = serde_json::json!({
            "uuid": "9c1c9d8a-3ac0-4b3b-a07e-19b7b3e98b9a",
            "dataSource": {"uuid": "4fd3126f-a0e8-4613-8dc5-cb449641adf2"},
            "entityTypes": ["DomainName"],
            "webPageURL": "https://db.example.com",
            "taskExecutionTimeout": 60
        });
        let view: ExternalDBView = serde_json::from_value(json).unwrap();
        assert_eq!(view.entity_types, [EntityTypes::DomainName]);
        assert_eq!(view.task_execution_timeout, Some(60));
        assert_eq!(view.task_execution_attempts_count, None);
    }
}
