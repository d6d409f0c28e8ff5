//! Users API.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::{RefView, Tag};
use crate::connector::Connector;
use crate::error::Result;
use crate::pagination::{Cursor, Page};

const USERS_PATH: &str = "/users";

/// User roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleName {
    /// Full control over the installation.
    Administrator,
    /// Read and report data.
    Analyst,
    /// Non-human account of an integrated system.
    External,
}

/// Users API.
///
/// Obtained through [`CybsiClient::users`](crate::CybsiClient::users).
#[derive(Debug, Clone)]
pub struct UsersAPI {
    connector: Connector,
}

impl UsersAPI {
    pub(crate) fn new(connector: Connector) -> Self {
        Self { connector }
    }

    /// Register a user.
    ///
    /// Calls `POST /users`.
    ///
    /// # Errors
    ///
    /// [`CybsiError::Conflict`](crate::CybsiError::Conflict) when the
    /// login is taken.
    #[tracing::instrument(skip(self, form))]
    pub async fn register(&self, form: &UserForm) -> Result<RefView> {
        let response = self.connector.do_post(USERS_PATH, form).await?;
        Ok(response.json().await?)
    }

    /// Get the user view.
    ///
    /// Calls `GET /users/{user_uuid}`.
    #[tracing::instrument(skip(self))]
    pub async fn view(&self, user_uuid: Uuid) -> Result<UserView> {
        let path = format!("{USERS_PATH}/{user_uuid}");
        let response = self.connector.do_get(&path, &[]).await?;
        let tag = Tag::from_response(&response);
        let mut view: UserView = response.json().await?;
        view.tag = tag;
        Ok(view)
    }

    /// Get the user the current API key belongs to.
    ///
    /// Calls `GET /users/me`.
    #[tracing::instrument(skip(self))]
    pub async fn me(&self) -> Result<UserView> {
        let path = format!("{USERS_PATH}/me");
        let response = self.connector.do_get(&path, &[]).await?;
        let tag = Tag::from_response(&response);
        let mut view: UserView = response.json().await?;
        view.tag = tag;
        Ok(view)
    }

    /// Filter users.
    ///
    /// Calls `GET /users`.
    #[tracing::instrument(skip(self))]
    pub async fn filter(
        &self,
        cursor: Option<&Cursor>,
        limit: Option<u32>,
    ) -> Result<Page<UserView>> {
        let mut params: Vec<(String, String)> = Vec::new();
        if let Some(cursor) = cursor {
            params.push(("cursor".to_string(), cursor.to_string()));
        }
        if let Some(limit) = limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        self.connector.get_page(USERS_PATH, params).await
    }
}

/// User registration form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserForm {
    login: String,
    roles: Vec<RoleName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<String>,
    #[serde(rename = "dataSourceUUID", skip_serializing_if = "Option::is_none")]
    data_source_uuid: Option<Uuid>,
}

impl UserForm {
    /// Form with a unique login and at least one role.
    pub fn new(login: impl Into<String>, roles: Vec<RoleName>) -> Self {
        Self {
            login: login.into(),
            roles,
            full_name: None,
            email: None,
            password: None,
            data_source_uuid: None,
        }
    }

    /// Full name of a human user.
    pub fn full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    /// Email of a human user.
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Initial password. Without it the user cannot log in interactively
    /// (API keys still work).
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Data source a non-human user reports as.
    pub fn data_source(mut self, source_uuid: Uuid) -> Self {
        self.data_source_uuid = Some(source_uuid);
        self
    }
}

/// User view.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    /// View tag.
    #[serde(skip)]
    pub tag: Tag,
    /// User identifier.
    pub uuid: Uuid,
    /// Unique login.
    pub login: String,
    /// Granted roles.
    pub roles: Vec<RoleName>,
    /// Full name.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Email.
    #[serde(default)]
    pub email: Option<String>,
    /// The user is disabled and cannot authenticate.
    #[serde(default)]
    pub is_disabled: bool,
    /// Data source a non-human user reports as.
    #[serde(default)]
    pub data_source: Option<RefView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_serializes_roles() {
        let form = UserForm::new("feed-bot", vec![RoleName::External])
            .data_source("d3c53120-cb7b-4a8b-94a9-6b1f2c6a2ea3".parse().unwrap());
        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["login"], "feed-bot");
        assert_eq!(json["roles"], serde_json::json!(["External"]));
        assert_eq!(json["dataSourceUUID"], "d3c53120-cb7b-4a8b-94a9-6b1f2c6a2ea3");
        assert!(json.get("password").is_none());
    }

    #[test]
    fn view_deserializes() {
        let json = serde_json::json!({
            "uuid": "7bc12d51-9b62-4b34-ad17-9aa27c6791f2",
            "login": "analyst1",
            "roles": ["Analyst"],
            "fullName": "First Analyst",
            "isDisabled": false
        });
        let view: UserView = serde_json::from_value(json).unwrap();
        assert_eq!(view.roles, [RoleName::Analyst]);
        assert!(!view.is_disabled);
        assert!(view.data_source.is_none());
    }
}
