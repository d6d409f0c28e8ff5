//! Analyzers API.
//!
//! Analyzers are external systems which take an artifact and produce an
//! analysis report: sandboxes, static analyzers and similar tooling.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::artifact::ArtifactTypes;
use crate::common::{Nullable, RefView, Tag};
use crate::connector::Connector;
use crate::error::Result;
use crate::pagination::{Cursor, Page};

const ANALYZERS_PATH: &str = "/enrichment/analyzers";

/// Analyzers API.
///
/// Obtained through
/// [`EnrichmentAPI::analyzers`](super::EnrichmentAPI::analyzers).
#[derive(Debug, Clone)]
pub struct AnalyzersAPI {
    connector: Connector,
}

impl AnalyzersAPI {
    pub(crate) fn new(connector: Connector) -> Self {
        Self { connector }
    }

    /// Register an analyzer.
    ///
    /// Calls `POST /enrichment/analyzers`.
    ///
    /// # Errors
    ///
    /// [`CybsiError::Conflict`](crate::CybsiError::Conflict) when an
    /// analyzer with the same data source is already registered.
    #[tracing::instrument(skip(self, form))]
    pub async fn register(&self, form: &AnalyzerForm) -> Result<RefView> {
        let response = self.connector.do_post(ANALYZERS_PATH, form).await?;
        Ok(response.json().await?)
    }

    /// Get the analyzer view.
    ///
    /// Calls `GET /enrichment/analyzers/{analyzer_uuid}`.
    #[tracing::instrument(skip(self))]
    pub async fn view(&self, analyzer_uuid: Uuid) -> Result<AnalyzerView> {
        let path = format!("{ANALYZERS_PATH}/{analyzer_uuid}");
        let response = self.connector.do_get(&path, &[]).await?;
        let tag = Tag::from_response(&response);
        let mut view: AnalyzerView = response.json().await?;
        view.tag = tag;
        Ok(view)
    }

    /// Edit the analyzer.
    ///
    /// Calls `PATCH /enrichment/analyzers/{analyzer_uuid}`.
    #[tracing::instrument(skip(self, patch))]
    pub async fn edit(&self, analyzer_uuid: Uuid, tag: &Tag, patch: &AnalyzerPatch) -> Result<()> {
        let path = format!("{ANALYZERS_PATH}/{analyzer_uuid}");
        self.connector.do_patch(&path, tag, patch).await?;
        Ok(())
    }

    /// Filter analyzers.
    ///
    /// Calls `GET /enrichment/analyzers`.
    #[tracing::instrument(skip(self))]
    pub async fn filter(
        &self,
        artifact_type: Option<ArtifactTypes>,
        cursor: Option<&Cursor>,
        limit: Option<u32>,
    ) -> Result<Page<AnalyzerView>> {
        let mut params: Vec<(String, String)> = Vec::new();
        if let Some(typ) = artifact_type {
            params.push(("artifactType".to_string(), typ.to_string()));
        }
        if let Some(cursor) = cursor {
            params.push(("cursor".to_string(), cursor.to_string()));
        }
        if let Some(limit) = limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        self.connector.get_page(ANALYZERS_PATH, params).await
    }
}

/// Analyzer form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzerForm {
    #[serde(rename = "dataSourceUUID")]
    data_source_uuid: Uuid,
    artifact_types: Vec<ArtifactTypes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    artifact_size_limit: Option<u64>,
    #[serde(rename = "dashboardURL", skip_serializing_if = "Option::is_none")]
    dashboard_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    taxonomies: Option<Vec<String>>,
}

impl AnalyzerForm {
    /// Form for the data source representing the analyzer.
    /// `artifact_types` is the non-empty list of types it accepts.
    pub fn new(data_source_uuid: Uuid, artifact_types: Vec<ArtifactTypes>) -> Self {
        Self {
            data_source_uuid,
            artifact_types,
            artifact_size_limit: None,
            dashboard_url: None,
            taxonomies: None,
        }
    }

    /// Largest artifact the analyzer accepts, bytes.
    pub fn artifact_size_limit(mut self, limit: u64) -> Self {
        self.artifact_size_limit = Some(limit);
        self
    }

    /// Link to the analyzer dashboard.
    pub fn dashboard_url(mut self, url: impl Into<String>) -> Self {
        self.dashboard_url = Some(url.into());
        self
    }

    /// Taxonomies of the analysis verdicts.
    pub fn taxonomies(mut self, taxonomies: Vec<String>) -> Self {
        self.taxonomies = Some(taxonomies);
        self
    }
}

/// Analyzer view.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzerView {
    /// View tag, required by [`AnalyzersAPI::edit`].
    #[serde(skip)]
    pub tag: Tag,
    /// Analyzer identifier.
    pub uuid: Uuid,
    /// Data source reference representing the analyzer.
    pub data_source: RefView,
    /// Artifact types the analyzer accepts.
    pub artifact_types: Vec<ArtifactTypes>,
    /// Largest artifact the analyzer accepts, bytes.
    #[serde(default)]
    pub artifact_size_limit: Option<u64>,
    /// Link to the analyzer dashboard.
    #[serde(rename = "dashboardURL", default)]
    pub dashboard_url: Option<String>,
    /// Taxonomies of the analysis verdicts.
    #[serde(default)]
    pub taxonomies: Vec<String>,
}

/// Analyzer partial update.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzerPatch {
    /// New artifact type list. Non-empty; unchanged if `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_types: Option<Vec<ArtifactTypes>>,
    /// Artifact size limit, bytes. `Null` removes the limit.
    #[serde(skip_serializing_if = "Nullable::is_keep")]
    pub artifact_size_limit: Nullable<u64>,
    /// Dashboard URL. `Null` resets to empty.
    #[serde(rename = "dashboardURL", skip_serializing_if = "Nullable::is_keep")]
    pub dashboard_url: Nullable<String>,
    /// Taxonomies. `Null` resets to empty.
    #[serde(skip_serializing_if = "Nullable::is_keep")]
    pub taxonomies: Nullable<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_serializes() {
        let form = AnalyzerForm::new(
            "4fd3126f-a0e8-4613-8dc5-cb449641adf2".parse().unwrap(),
            vec![ArtifactTypes::FileSample, ArtifactTypes::Archive],
        )
        .artifact_size_limit(64 * 1024 * 1024)
        .dashboard_url("https://sandbox.example.com");
        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["artifactTypes"], serde_json::json!(["FileSample", "Archive"]));
        assert_eq!(json["artifactSizeLimit"], 67108864);
        assert_eq!(json["dashboardURL"], "https://sandbox.example.com");
    }

    #[test]
    fn patch_removes_size_limit() {
        let patch = AnalyzerPatch {
            artifact_size_limit: Nullable::Null,
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({"artifactSizeLimit": null}));
    }
}
