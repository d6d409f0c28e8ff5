//! Search API: stored queries.
//!
//! Queries are written in the server query language; its source text is
//! opaque to this crate. Stored queries drive reputation lists (see
//! [`ReplistsAPI`](crate::replist::ReplistsAPI)) and saved searches.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::{RefView, Tag};
use crate::connector::Connector;
use crate::error::Result;
use crate::pagination::{Cursor, Page};

const STORED_QUERIES_PATH: &str = "/search/stored-queries";
const QUERY_PATH: &str = "/search/query";

/// Intended use of a query, validated server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryCompatibility {
    /// The query can back a reputation list.
    Replist,
    /// The query can be used for interactive search.
    Search,
}

/// Search API handle.
///
/// Obtained through [`CybsiClient::search`](crate::CybsiClient::search).
#[derive(Debug, Clone)]
pub struct SearchAPI {
    connector: Connector,
}

impl SearchAPI {
    pub(crate) fn new(connector: Connector) -> Self {
        Self { connector }
    }

    /// Stored queries API handle.
    pub fn stored_queries(&self) -> StoredQueriesAPI {
        StoredQueriesAPI::new(self.connector.clone())
    }
}

/// Stored queries API.
#[derive(Debug, Clone)]
pub struct StoredQueriesAPI {
    connector: Connector,
}

impl StoredQueriesAPI {
    pub(crate) fn new(connector: Connector) -> Self {
        Self { connector }
    }

    /// Register a stored query.
    ///
    /// Calls `POST /search/stored-queries`.
    #[tracing::instrument(skip(self, form))]
    pub async fn register(&self, form: &StoredQueryForm) -> Result<RefView> {
        let response = self.connector.do_post(STORED_QUERIES_PATH, form).await?;
        Ok(response.json().await?)
    }

    /// Get the stored query view.
    ///
    /// Calls `GET /search/stored-queries/{query_uuid}`.
    #[tracing::instrument(skip(self))]
    pub async fn view(&self, query_uuid: Uuid) -> Result<StoredQueryView> {
        let path = format!("{STORED_QUERIES_PATH}/{query_uuid}");
        let response = self.connector.do_get(&path, &[]).await?;
        let tag = Tag::from_response(&response);
        let mut view: StoredQueryView = response.json().await?;
        view.tag = tag;
        Ok(view)
    }

    /// Edit the stored query.
    ///
    /// Calls `PATCH /search/stored-queries/{query_uuid}`.
    #[tracing::instrument(skip(self, patch))]
    pub async fn edit(&self, query_uuid: Uuid, tag: &Tag, patch: &StoredQueryPatch) -> Result<()> {
        let path = format!("{STORED_QUERIES_PATH}/{query_uuid}");
        self.connector.do_patch(&path, tag, patch).await?;
        Ok(())
    }

    /// Filter stored queries.
    ///
    /// Calls `GET /search/stored-queries`.
    #[tracing::instrument(skip(self))]
    pub async fn filter(
        &self,
        cursor: Option<&Cursor>,
        limit: Option<u32>,
    ) -> Result<Page<StoredQueryView>> {
        let mut params: Vec<(String, String)> = Vec::new();
        if let Some(cursor) = cursor {
            params.push(("cursor".to_string(), cursor.to_string()));
        }
        if let Some(limit) = limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        self.connector.get_page(STORED_QUERIES_PATH, params).await
    }

    /// Validate query text without storing it.
    ///
    /// Calls `PUT /search/query`. Returns the errors and warnings the
    /// query compiler produced; an empty error list means the text is
    /// valid for the requested use.
    #[tracing::instrument(skip(self, text))]
    pub async fn validate(
        &self,
        text: &str,
        compatibility: QueryCompatibility,
    ) -> Result<StoredQueryValidationView> {
        let body = serde_json::json!({
            "text": text,
            "compatibility": compatibility,
        });
        let response = self.connector.do_put(QUERY_PATH, &body).await?;
        Ok(response.json().await?)
    }
}

/// Stored query form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredQueryForm {
    name: String,
    text: String,
}

impl StoredQueryForm {
    /// Form with a human-readable name and query source text.
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Stored query view.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredQueryView {
    /// View tag, required by [`StoredQueriesAPI::edit`].
    #[serde(skip)]
    pub tag: Tag,
    /// Query identifier.
    pub uuid: Uuid,
    /// Human-readable query name.
    pub name: String,
    /// Query source text.
    pub text: String,
    /// User who stored the query.
    pub author: RefView,
}

/// Stored query partial update.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredQueryPatch {
    /// New query name. Unchanged if `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New query text. Unchanged if `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Result of query text validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredQueryValidationView {
    /// Compilation errors. Empty when the text is valid.
    #[serde(default)]
    pub errors: Vec<QueryLangErrorView>,
    /// Non-fatal findings.
    #[serde(default)]
    pub warnings: Vec<QueryLangErrorView>,
}

/// Query language compiler message.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryLangErrorView {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Position the message refers to.
    #[serde(default)]
    pub position: Option<QueryTextPositionView>,
}

/// Position in query source text.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryTextPositionView {
    /// One-based line number.
    pub line: u32,
    /// One-based column number.
    pub column: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_view_deserializes() {
        let json = serde_json::json!({
            "errors": [
                {
                    "code": "UnknownAttribute",
                    "message": "attribute 'IsIoCs' is not defined",
                    "position": {"line": 1, "column": 14}
                }
            ],
            "warnings": []
        });
        let view: StoredQueryValidationView = serde_json::from_value(json).unwrap();
        assert_eq!(view.errors.len(), 1);
        assert_eq!(view.errors[0].position.unwrap().column, 14);
        assert!(view.warnings.is_empty());
    }

    #[test]
    fn form_serializes() {
        let form = StoredQueryForm::new("malicious domains", "ENT { IsIoC = true }");
        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["name"], "malicious domains");
        assert_eq!(json["text"], "ENT { IsIoC = true }");
    }
}
