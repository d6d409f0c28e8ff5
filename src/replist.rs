//! Reputation lists API.
//!
//! A reputation list (replist) is the entity set matching a stored query,
//! maintained server-side. Clients can snapshot the current set and then
//! follow a change feed; change-feed cursors stay valid across client
//! restarts, so a consumer may persist the cursor and resume later.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::{RefView, ShareLevels, Tag};
use crate::connector::Connector;
use crate::error::Result;
use crate::observable::EntityView;
use crate::pagination::{Cursor, Page};

const REPLISTS_PATH: &str = "/replists";

/// Reputation list maintenance state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplistStatus {
    /// The list is maintained and the change feed advances.
    Active,
    /// The list is frozen.
    Inactive,
}

/// Change feed operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntitySetOperations {
    /// The entity entered the set.
    Add,
    /// The entity left the set.
    Remove,
}

/// Reputation lists API.
///
/// Obtained through
/// [`CybsiClient::replists`](crate::CybsiClient::replists).
#[derive(Debug, Clone)]
pub struct ReplistsAPI {
    connector: Connector,
}

impl ReplistsAPI {
    pub(crate) fn new(connector: Connector) -> Self {
        Self { connector }
    }

    /// Register a reputation list.
    ///
    /// Calls `POST /replists`.
    ///
    /// # Errors
    ///
    /// [`CybsiError::Semantic`](crate::CybsiError::Semantic) with
    /// `QueryNotFound` when the stored query does not exist.
    #[tracing::instrument(skip(self, form))]
    pub async fn register(&self, form: &ReplistForm) -> Result<RefView> {
        let response = self.connector.do_post(REPLISTS_PATH, form).await?;
        Ok(response.json().await?)
    }

    /// Get the reputation list view.
    ///
    /// Calls `GET /replists/{replist_uuid}`.
    #[tracing::instrument(skip(self))]
    pub async fn view(&self, replist_uuid: Uuid) -> Result<ReplistView> {
        let path = format!("{REPLISTS_PATH}/{replist_uuid}");
        let response = self.connector.do_get(&path, &[]).await?;
        let tag = Tag::from_response(&response);
        let mut view: ReplistView = response.json().await?;
        view.tag = tag;
        Ok(view)
    }

    /// Edit the reputation list.
    ///
    /// Calls `PATCH /replists/{replist_uuid}`.
    #[tracing::instrument(skip(self, patch))]
    pub async fn edit(&self, replist_uuid: Uuid, tag: &Tag, patch: &ReplistPatch) -> Result<()> {
        let path = format!("{REPLISTS_PATH}/{replist_uuid}");
        self.connector.do_patch(&path, tag, patch).await?;
        Ok(())
    }

    /// Filter reputation lists.
    ///
    /// Calls `GET /replists`.
    #[tracing::instrument(skip(self))]
    pub async fn filter(
        &self,
        cursor: Option<&Cursor>,
        limit: Option<u32>,
    ) -> Result<Page<ReplistView>> {
        let mut params: Vec<(String, String)> = Vec::new();
        if let Some(cursor) = cursor {
            params.push(("cursor".to_string(), cursor.to_string()));
        }
        if let Some(limit) = limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        self.connector.get_page(REPLISTS_PATH, params).await
    }

    /// Snapshot the current entity set of the list.
    ///
    /// Calls `GET /replists/{replist_uuid}/entities`. The cursor of the
    /// final page doubles as the starting cursor for
    /// [`changes`](Self::changes).
    #[tracing::instrument(skip(self))]
    pub async fn entities(
        &self,
        replist_uuid: Uuid,
        cursor: Option<&Cursor>,
        limit: Option<u32>,
    ) -> Result<Page<EntityView>> {
        let mut params: Vec<(String, String)> = Vec::new();
        if let Some(cursor) = cursor {
            params.push(("cursor".to_string(), cursor.to_string()));
        }
        if let Some(limit) = limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        let path = format!("{REPLISTS_PATH}/{replist_uuid}/entities");
        self.connector.get_page(&path, params).await
    }

    /// Read the change feed of the list.
    ///
    /// Calls `GET /replists/{replist_uuid}/changes`. Unlike other list
    /// endpoints the cursor is required here: it marks the reader's
    /// position in the feed and comes either from an
    /// [`entities`](Self::entities) snapshot or from a previous `changes`
    /// page. An empty page that still carries a cursor means "no changes
    /// yet"; poll again with the same cursor later.
    #[tracing::instrument(skip(self))]
    pub async fn changes(
        &self,
        replist_uuid: Uuid,
        cursor: &Cursor,
        limit: Option<u32>,
    ) -> Result<Page<EntitySetChangeView>> {
        let mut params: Vec<(String, String)> =
            vec![("cursor".to_string(), cursor.to_string())];
        if let Some(limit) = limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        let path = format!("{REPLISTS_PATH}/{replist_uuid}/changes");
        self.connector.get_page(&path, params).await
    }
}

/// Reputation list form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplistForm {
    #[serde(rename = "queryUUID")]
    query_uuid: Uuid,
    share_level: ShareLevels,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_active: Option<bool>,
}

impl ReplistForm {
    /// List backed by a stored query (the query must be
    /// [`Replist`](crate::search::QueryCompatibility::Replist)-compatible).
    pub fn new(query_uuid: Uuid, share_level: ShareLevels) -> Self {
        Self {
            query_uuid,
            share_level,
            is_active: None,
        }
    }

    /// Register the list inactive.
    pub fn inactive(mut self) -> Self {
        self.is_active = Some(false);
        self
    }
}

/// Reputation list view.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplistView {
    /// View tag, required by [`ReplistsAPI::edit`].
    #[serde(skip)]
    pub tag: Tag,
    /// Reputation list identifier.
    pub uuid: Uuid,
    /// Stored query backing the list.
    pub query: RefView,
    /// User who registered the list.
    pub author: RefView,
    /// Share level of the list.
    pub share_level: ShareLevels,
    /// The list is maintained.
    pub is_active: bool,
    /// Maintenance state.
    pub status: ReplistStatus,
    /// When the entity set last changed.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Reputation list partial update.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplistPatch {
    /// Stored query backing the list. Unchanged if `None`.
    #[serde(rename = "queryUUID", skip_serializing_if = "Option::is_none")]
    pub query_uuid: Option<Uuid>,
    /// Share level. Unchanged if `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_level: Option<ShareLevels>,
    /// Activate or freeze the list. Unchanged if `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// One change feed record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySetChangeView {
    /// What happened to the entity.
    pub operation: EntitySetOperations,
    /// The entity itself.
    pub entity: EntityView,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_view_deserializes() {
        let json = serde_json::json!({
            "operation": "Add",
            "entity": {
                "uuid": "3a53cc35-f632-434c-bd4b-1ed8c014003a",
                "type": "DomainName",
                "keys": [{"type": "String", "value": "evil.example"}]
            }
        });
        let view: EntitySetChangeView = serde_json::from_value(json).unwrap();
        assert_eq!(view.operation, EntitySetOperations::Add);
        assert_eq!(view.entity.keys[0].value, "evil.example");
    }

    #[test]
    fn form_serializes() {
        let form = ReplistForm::new(
            "7e4f2a93-12ab-4c6e-9f51-2b1e34f2b0d7".parse().unwrap(),
            ShareLevels::Green,
        )
        .inactive();
        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["queryUUID"], "7e4f2a93-12ab-4c6e-9f51-2b1e34f2b0d7");
        assert_eq!(json["shareLevel"], "Green");
        assert_eq!(json["isActive"], false);
    }
}
