//! Enrichment API: configuration of automatic enrichment and the
//! registries of enrichers (external databases, analyzers).

mod analyzers;
mod config_rules;
mod enums;
mod external_dbs;

pub use analyzers::{AnalyzerForm, AnalyzerPatch, AnalyzerView, AnalyzersAPI};
pub use config_rules::{ConfigRuleForm, ConfigRulePatch, ConfigRuleView, ConfigRulesAPI};
pub use enums::{
    EnrichmentErrorCodes, EnrichmentTaskPriorities, EnrichmentTaskStatuses,
    EnrichmentTriggerTypes, EnrichmentTypes,
};
pub use external_dbs::{ExternalDBForm, ExternalDBPatch, ExternalDBView, ExternalDBsAPI};

use crate::connector::Connector;

/// Enrichment API handle.
///
/// Obtained through
/// [`CybsiClient::enrichment`](crate::CybsiClient::enrichment).
#[derive(Debug, Clone)]
pub struct EnrichmentAPI {
    connector: Connector,
}

impl EnrichmentAPI {
    pub(crate) fn new(connector: Connector) -> Self {
        Self { connector }
    }

    /// Enrichment configuration rules API handle.
    pub fn config_rules(&self) -> ConfigRulesAPI {
        ConfigRulesAPI::new(self.connector.clone())
    }

    /// External databases API handle.
    pub fn external_dbs(&self) -> ExternalDBsAPI {
        ExternalDBsAPI::new(self.connector.clone())
    }

    /// Analyzers API handle.
    pub fn analyzers(&self) -> AnalyzersAPI {
        AnalyzersAPI::new(self.connector.clone())
    }
}
