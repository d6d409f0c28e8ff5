//! Cybsi API client.
//!
//! The client is low-level and structured around Cybsi REST API routes:
//! use its accessors to obtain handles of API sections instead of
//! constructing section APIs manually.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use url::Url;

use crate::artifact::ArtifactsAPI;
use crate::auth::APIKeysAPI;
use crate::connector::Connector;
use crate::data_source::{DataSourceTypesAPI, DataSourcesAPI};
use crate::enrichment::EnrichmentAPI;
use crate::error::{CybsiError, Result};
use crate::observable::ObservableAPI;
use crate::observation::ObservationsAPI;
use crate::replist::ReplistsAPI;
use crate::report::ReportsAPI;
use crate::search::SearchAPI;
use crate::user::UsersAPI;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// [`CybsiClient`] config.
#[derive(Clone)]
pub struct Config {
    /// Base API URL, e.g. `https://cybsi.example.com/api`.
    pub api_url: String,
    /// API key attached to every request.
    pub api_key: String,
    /// Enable TLS certificate verification. Disable for lab installations
    /// with self-signed certificates.
    pub ssl_verify: bool,
    /// Request timeout.
    pub timeout: Duration,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_url", &self.api_url)
            .field("ssl_verify", &self.ssl_verify)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Config with certificate verification on and the default timeout.
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            ssl_verify: true,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// The main entry point for all actions with the Cybsi REST API.
///
/// The client follows Cybsi REST API input-output formats, providing
/// little to no abstraction over the JSON the API uses. It is relatively
/// easy to construct an invalid request, so use the section handles
/// wisely.
///
/// Cheaply cloneable; clones reference the same underlying connection
/// pool.
///
/// # Example
///
/// ```no_run
/// use cybsi::{Config, CybsiClient};
///
/// # async fn example() -> cybsi::Result<()> {
/// let config = Config::new("https://cybsi.example.com/api", "api-key");
/// let client = CybsiClient::new(&config)?;
///
/// let version = client.version().await?;
/// println!("server {}", version.server_version);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CybsiClient {
    connector: Connector,
}

impl CybsiClient {
    /// Create a new client from a config.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty or the base URL is
    /// invalid.
    pub fn new(config: &Config) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(CybsiError::ConfigMissing(
                "no API key configured for client".to_string(),
            ));
        }
        Ok(Self {
            connector: Connector::new(config)?,
        })
    }

    /// Create a client from environment variables.
    ///
    /// Reads `CYBSI_API_KEY` and `CYBSI_API_URL`; both are required.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("CYBSI_API_KEY").map_err(|_| {
            CybsiError::ConfigMissing("CYBSI_API_KEY environment variable not set".to_string())
        })?;
        let api_url = env::var("CYBSI_API_URL").map_err(|_| {
            CybsiError::ConfigMissing("CYBSI_API_URL environment variable not set".to_string())
        })?;
        Self::new(&Config::new(api_url, api_key))
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        self.connector.base_url()
    }

    /// Artifacts API handle.
    pub fn artifacts(&self) -> ArtifactsAPI {
        ArtifactsAPI::new(self.connector.clone())
    }

    /// Data sources API handle.
    pub fn data_sources(&self) -> DataSourcesAPI {
        DataSourcesAPI::new(self.connector.clone())
    }

    /// Data source types API handle.
    pub fn data_source_types(&self) -> DataSourceTypesAPI {
        DataSourceTypesAPI::new(self.connector.clone())
    }

    /// Enrichment API handle.
    pub fn enrichment(&self) -> EnrichmentAPI {
        EnrichmentAPI::new(self.connector.clone())
    }

    /// Observable API handle.
    pub fn observable(&self) -> ObservableAPI {
        ObservableAPI::new(self.connector.clone())
    }

    /// Observations API handle.
    pub fn observations(&self) -> ObservationsAPI {
        ObservationsAPI::new(self.connector.clone())
    }

    /// Reputation lists API handle.
    pub fn replists(&self) -> ReplistsAPI {
        ReplistsAPI::new(self.connector.clone())
    }

    /// Reports API handle.
    pub fn reports(&self) -> ReportsAPI {
        ReportsAPI::new(self.connector.clone())
    }

    /// Search API handle.
    pub fn search(&self) -> SearchAPI {
        SearchAPI::new(self.connector.clone())
    }

    /// Users API handle.
    pub fn users(&self) -> UsersAPI {
        UsersAPI::new(self.connector.clone())
    }

    /// API-Keys API handle.
    pub fn api_keys(&self) -> APIKeysAPI {
        APIKeysAPI::new(self.connector.clone())
    }

    /// Get API and server version information.
    ///
    /// Calls `GET /version`.
    #[tracing::instrument(skip(self))]
    pub async fn version(&self) -> Result<VersionView> {
        let response = self.connector.do_get("/version", &[]).await?;
        let view = response.json().await.map_err(CybsiError::Http)?;
        Ok(view)
    }
}

/// Version view.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionView {
    /// API specification version.
    pub api_version: Version,
    /// Server version.
    pub server_version: Version,
}

/// Parsed server version, `major.minor.patch[-prerelease][+build]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    raw: String,
    major: u32,
    minor: u32,
    patch: u32,
    prerelease: Option<String>,
    build: Option<String>,
}

impl Version {
    /// Major part of version.
    pub fn major(&self) -> u32 {
        self.major
    }

    /// Minor part of version.
    pub fn minor(&self) -> u32 {
        self.minor
    }

    /// Patch part of version.
    pub fn patch(&self) -> u32 {
        self.patch
    }

    /// Prerelease part of version.
    pub fn prerelease(&self) -> Option<&str> {
        self.prerelease.as_deref()
    }

    /// Build part of version.
    pub fn build(&self) -> Option<&str> {
        self.build.as_deref()
    }
}

impl FromStr for Version {
    type Err = CybsiError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || CybsiError::InvalidVersion(s.to_string());

        let (rest, build) = match s.split_once('+') {
            Some((rest, build)) => (rest, Some(build.to_string())),
            None => (s, None),
        };
        let (core, prerelease) = match rest.split_once('-') {
            Some((core, pre)) => (core, Some(pre.to_string())),
            None => (rest, None),
        };

        let mut parts = core.splitn(3, '.');
        let mut next_part = || -> Result<u32> {
            parts
                .next()
                .and_then(|p| p.parse().ok())
                .ok_or_else(invalid)
        };
        let (major, minor, patch) = (next_part()?, next_part()?, next_part()?);

        Ok(Self {
            raw: s.to_string(),
            major,
            minor,
            patch,
            prerelease,
            build,
        })
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_requires_api_key() {
        let config = Config::new("https://cybsi.example.com/api", "");
        let err = CybsiClient::new(&config).unwrap_err();
        assert!(matches!(err, CybsiError::ConfigMissing(_)));
    }

    #[test]
    fn config_debug_does_not_leak_key() {
        let config = Config::new("https://cybsi.example.com/api", "secret-key");
        let debug = format!("{config:?}");
        assert!(debug.contains("api_url"));
        assert!(!debug.contains("secret-key"));
    }

    #[test]
    fn version_parses_core() {
        let v: Version = "2.12.0".parse().unwrap();
        assert_eq!((v.major(), v.minor(), v.patch()), (2, 12, 0));
        assert_eq!(v.prerelease(), None);
        assert_eq!(v.build(), None);
        assert_eq!(v.to_string(), "2.12.0");
    }

    #[test]
    fn version_parses_prerelease_and_build() {
        let v: Version = "2.13.1-rc.2+6f3bc89".parse().unwrap();
        assert_eq!((v.major(), v.minor(), v.patch()), (2, 13, 1));
        assert_eq!(v.prerelease(), Some("rc.2"));
        assert_eq!(v.build(), Some("6f3bc89"));
        assert_eq!(v.to_string(), "2.13.1-rc.2+6f3bc89");
    }

    #[test]
    fn version_rejects_garbage() {
        assert!("2.12".parse::<Version>().is_err());
        assert!("two.twelve.zero".parse::<Version>().is_err());
        assert!("".parse::<Version>().is_err());
    }

    #[test]
    fn version_view_deserializes() {
        let json = r#"{"apiVersion": "2.12.0", "serverVersion": "2.12.3+1034"}"#;
        let view: VersionView = serde_json::from_str(json).unwrap();
        assert_eq!(view.api_version.minor(), 12);
        assert_eq!(view.server_version.build(), Some("1034"));
    }
}
