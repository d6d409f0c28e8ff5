//! Enrichment vocabularies.

use serde::{Deserialize, Serialize};

/// Types of enrichment the system can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnrichmentTypes {
    /// Analyze an artifact in a sandbox or analyzer.
    ArtifactAnalysis,
    /// Unpack an archive artifact.
    ArchiveUnpack,
    /// Resolve a domain name or IP address.
    DNSLookup,
    /// Query Whois for a domain name or IP address.
    WhoisLookup,
    /// Query an external database about an entity.
    ExternalDBLookup,
}

impl EnrichmentTypes {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrichmentTypes::ArtifactAnalysis => "ArtifactAnalysis",
            EnrichmentTypes::ArchiveUnpack => "ArchiveUnpack",
            EnrichmentTypes::DNSLookup => "DNSLookup",
            EnrichmentTypes::WhoisLookup => "WhoisLookup",
            EnrichmentTypes::ExternalDBLookup => "ExternalDBLookup",
        }
    }
}

impl std::fmt::Display for EnrichmentTypes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What starts an enrichment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnrichmentTriggerTypes {
    /// Triggered automatically when a matching entity or artifact is
    /// registered.
    OnRegistration,
    /// Triggered by an explicit request.
    OnDemand,
}

/// Priorities of enrichment tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnrichmentTaskPriorities {
    High,
    Normal,
}

/// Lifecycle states of enrichment tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnrichmentTaskStatuses {
    Pending,
    Executing,
    Failed,
    Completed,
    Aborted,
}

/// Error codes reported by enrichers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum EnrichmentErrorCodes {
    /// The task can never succeed.
    FatalError,
    /// The task may succeed if retried.
    TemporaryError,
    /// The enrichment target was not found.
    NotFound,
    /// The enrichment target is corrupted or unreadable.
    Corrupted,
    /// The enricher does not support the target.
    Unsupported,
    /// The enricher did not finish in time.
    Timeout,
    #[serde(other)]
    Unknown,
}
