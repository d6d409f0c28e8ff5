//! Error types for Cybsi API operations.

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur during Cybsi API operations.
#[derive(Debug, Error)]
pub enum CybsiError {
    /// Configuration is missing or incomplete.
    #[error("Cybsi configuration required: {0}")]
    ConfigMissing(String),

    /// Request is malformed (HTTP 400).
    #[error("invalid request: {}", .0.message)]
    InvalidRequest(ApiErrorView),

    /// API key is missing, invalid or expired (HTTP 401).
    #[error("unauthorized: {}", .0.message)]
    Unauthorized(ApiErrorView),

    /// Operation is not permitted for the key (HTTP 403).
    #[error("forbidden: {}", .0.message)]
    Forbidden(ApiErrorView),

    /// Resource not found (HTTP 404).
    #[error("resource not found")]
    NotFound,

    /// Resource already exists (HTTP 409).
    #[error("conflict: {}", .0.message)]
    Conflict(ApiErrorView),

    /// Resource changed since it was last read (HTTP 412).
    /// Fetch a fresh view to get a new tag and retry.
    #[error("resource was modified since last read")]
    ResourceModified,

    /// Request is valid but violates server-side logic (HTTP 422).
    #[error("semantic error [{:?}]: {}", .code, .view.message)]
    Semantic {
        code: SemanticErrorCodes,
        view: ApiErrorView,
    },

    /// Server-side failure (HTTP 5xx).
    #[error("server error: {}", .0.message)]
    Internal(ApiErrorView),

    /// Status code outside the documented protocol.
    #[error("unexpected HTTP status {status}: {message}")]
    UnexpectedStatus { status: u16, message: String },

    /// Version string the server returned does not parse.
    #[error("invalid version string '{0}'")]
    InvalidVersion(String),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Local I/O error (artifact download destinations).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Cybsi operations.
pub type Result<T> = core::result::Result<T, CybsiError>;

/// Error body the server attaches to non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorView {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Optional structured details.
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

impl ApiErrorView {
    /// Fallback view for responses without a parsable error body.
    pub(crate) fn from_text(status: reqwest::StatusCode, body: String) -> Self {
        let message = if body.trim().is_empty() {
            format!("HTTP {status}")
        } else {
            body
        };
        Self {
            code: String::new(),
            message,
            details: None,
        }
    }
}

/// Semantic error codes returned with HTTP 422 responses.
///
/// The set grows server-side; codes this crate does not know yet
/// deserialize as [`SemanticErrorCodes::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum SemanticErrorCodes {
    /// Entity key set is not applicable for the entity type.
    InvalidKeySet,
    /// Entity key value is not valid for the key type.
    InvalidKey,
    /// Provided keys identify different entities.
    KeyConflict,
    /// Key set identifies more than one registered entity.
    BrokenKeySet,
    /// Referenced entity is not registered.
    EntityNotFound,
    /// Attribute is not applicable for the entity type.
    WrongEntityAttribute,
    /// Referenced data source is not registered.
    DataSourceNotFound,
    /// Referenced stored query is not registered.
    QueryNotFound,
    #[serde(other)]
    Unknown,
}
