//! Observation vocabularies.

use serde::{Deserialize, Serialize};

/// Observation types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationTypes {
    /// Unpacked archive content.
    Archive,
    /// DNS lookup result.
    DNSLookup,
    /// Generic observation, a free-form set of facts.
    Generic,
    /// Network session.
    NetworkSession,
    /// Threat report verdict.
    Threat,
    /// Whois lookup result.
    WhoisLookup,
}
