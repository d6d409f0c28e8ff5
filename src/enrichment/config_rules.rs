//! Enrichment configuration rules API.
//!
//! A rule binds a trigger (registration of a matching entity or artifact,
//! or an explicit request) to an enrichment type and the data sources it
//! applies to.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::artifact::ArtifactTypes;
use crate::common::{Nullable, RefView, Tag};
use crate::connector::Connector;
use crate::error::Result;
use crate::observable::EntityTypes;
use crate::pagination::{Cursor, Page};

use super::enums::{EnrichmentTriggerTypes, EnrichmentTypes};

const CONFIG_RULES_PATH: &str = "/enrichment/config-rules";

/// Enrichment configuration rules API.
///
/// Obtained through
/// [`EnrichmentAPI::config_rules`](super::EnrichmentAPI::config_rules).
#[derive(Debug, Clone)]
pub struct ConfigRulesAPI {
    connector: Connector,
}

impl ConfigRulesAPI {
    pub(crate) fn new(connector: Connector) -> Self {
        Self { connector }
    }

    /// Register an enrichment configuration rule.
    ///
    /// Calls `POST /enrichment/config-rules`.
    #[tracing::instrument(skip(self, form))]
    pub async fn register(&self, form: &ConfigRuleForm) -> Result<RefView> {
        let response = self.connector.do_post(CONFIG_RULES_PATH, form).await?;
        Ok(response.json().await?)
    }

    /// Get the rule view.
    ///
    /// Calls `GET /enrichment/config-rules/{rule_uuid}`.
    #[tracing::instrument(skip(self))]
    pub async fn view(&self, rule_uuid: Uuid) -> Result<ConfigRuleView> {
        let path = format!("{CONFIG_RULES_PATH}/{rule_uuid}");
        let response = self.connector.do_get(&path, &[]).await?;
        let tag = Tag::from_response(&response);
        let mut view: ConfigRuleView = response.json().await?;
        view.tag = tag;
        Ok(view)
    }

    /// Edit the rule.
    ///
    /// Calls `PATCH /enrichment/config-rules/{rule_uuid}`.
    #[tracing::instrument(skip(self, patch))]
    pub async fn edit(&self, rule_uuid: Uuid, tag: &Tag, patch: &ConfigRulePatch) -> Result<()> {
        let path = format!("{CONFIG_RULES_PATH}/{rule_uuid}");
        self.connector.do_patch(&path, tag, patch).await?;
        Ok(())
    }

    /// Filter rules.
    ///
    /// Calls `GET /enrichment/config-rules`.
    #[tracing::instrument(skip(self))]
    pub async fn filter(
        &self,
        enrichment: Option<EnrichmentTypes>,
        cursor: Option<&Cursor>,
        limit: Option<u32>,
    ) -> Result<Page<ConfigRuleView>> {
        let mut params: Vec<(String, String)> = Vec::new();
        if let Some(enrichment) = enrichment {
            params.push(("enrichment".to_string(), enrichment.to_string()));
        }
        if let Some(cursor) = cursor {
            params.push(("cursor".to_string(), cursor.to_string()));
        }
        if let Some(limit) = limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        self.connector.get_page(CONFIG_RULES_PATH, params).await
    }
}

/// Enrichment configuration rule form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigRuleForm {
    name: String,
    triggers: Vec<EnrichmentTriggerTypes>,
    enrichment: EnrichmentTypes,
    #[serde(skip_serializing_if = "Option::is_none")]
    artifact_types: Option<Vec<ArtifactTypes>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    entity_types: Option<Vec<EntityTypes>>,
    #[serde(
        rename = "triggerDataSourceUUIDs",
        skip_serializing_if = "Option::is_none"
    )]
    trigger_data_source_uuids: Option<Vec<Uuid>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    throttling_interval: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_disabled: Option<bool>,
}

impl ConfigRuleForm {
    /// Rule with a human-readable name, firing `enrichment` on `triggers`.
    ///
    /// Depending on the enrichment type the rule must also name the
    /// artifact types or entity types it applies to.
    pub fn new(
        name: impl Into<String>,
        triggers: Vec<EnrichmentTriggerTypes>,
        enrichment: EnrichmentTypes,
    ) -> Self {
        Self {
            name: name.into(),
            triggers,
            enrichment,
            artifact_types: None,
            entity_types: None,
            trigger_data_source_uuids: None,
            throttling_interval: None,
            is_disabled: None,
        }
    }

    /// Artifact types the rule applies to (artifact enrichments).
    pub fn artifact_types(mut self, types: Vec<ArtifactTypes>) -> Self {
        self.artifact_types = Some(types);
        self
    }

    /// Entity types the rule applies to (entity enrichments).
    pub fn entity_types(mut self, types: Vec<EntityTypes>) -> Self {
        self.entity_types = Some(types);
        self
    }

    /// Fire only for registrations reported by these data sources.
    pub fn trigger_data_sources(mut self, uuids: Vec<Uuid>) -> Self {
        self.trigger_data_source_uuids = Some(uuids);
        self
    }

    /// Minimum interval between repeated enrichments of the same target,
    /// sec.
    pub fn throttling_interval(mut self, seconds: u64) -> Self {
        self.throttling_interval = Some(seconds);
        self
    }

    /// Register the rule disabled.
    pub fn disabled(mut self) -> Self {
        self.is_disabled = Some(true);
        self
    }
}

/// Enrichment configuration rule view.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigRuleView {
    /// View tag, required by [`ConfigRulesAPI::edit`].
    #[serde(skip)]
    pub tag: Tag,
    /// Rule identifier.
    pub uuid: Uuid,
    /// Human-readable rule name.
    pub name: String,
    /// What starts the enrichment.
    pub triggers: Vec<EnrichmentTriggerTypes>,
    /// Enrichment the rule fires.
    pub enrichment: EnrichmentTypes,
    /// Artifact types the rule applies to.
    #[serde(default)]
    pub artifact_types: Vec<ArtifactTypes>,
    /// Entity types the rule applies to.
    #[serde(default)]
    pub entity_types: Vec<EntityTypes>,
    /// Data sources whose registrations fire the rule.
    #[serde(default)]
    pub trigger_data_sources: Vec<RefView>,
    /// Minimum interval between repeated enrichments, sec.
    #[serde(default)]
    pub throttling_interval: Option<u64>,
    /// The rule is disabled.
    #[serde(default)]
    pub is_disabled: bool,
    /// The rule is built into the server and cannot be removed.
    #[serde(default)]
    pub is_builtin: bool,
}

/// Enrichment configuration rule partial update.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigRulePatch {
    /// New rule name. Unchanged if `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New trigger list. Unchanged if `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub triggers: Option<Vec<EnrichmentTriggerTypes>>,
    /// Artifact types. `Null` resets to empty.
    #[serde(skip_serializing_if = "Nullable::is_keep")]
    pub artifact_types: Nullable<Vec<ArtifactTypes>>,
    /// Entity types. `Null` resets to empty.
    #[serde(skip_serializing_if = "Nullable::is_keep")]
    pub entity_types: Nullable<Vec<EntityTypes>>,
    /// Trigger data sources. `Null` resets to any.
    #[serde(
        rename = "triggerDataSourceUUIDs",
        skip_serializing_if = "Nullable::is_keep"
    )]
    pub trigger_data_source_uuids: Nullable<Vec<Uuid>>,
    /// Throttling interval, sec. `Null` removes throttling.
    #[serde(skip_serializing_if = "Nullable::is_keep")]
    pub throttling_interval: Nullable<u64>,
    /// Enable or disable the rule. Unchanged if `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_disabled: Option<bool>,
}
