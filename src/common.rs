//! Types shared by every API section.

use reqwest::Response;
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

/// Reference to an API resource.
///
/// Register operations return a `RefView` pointing at the created resource.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefView {
    /// Resource identifier.
    pub uuid: Uuid,
    /// Absolute URL of the resource, if the server provides one.
    #[serde(default)]
    pub url: Option<String>,
}

/// Opaque resource state tag.
///
/// Views of editable resources carry a tag captured from the `ETag`
/// response header. Edit operations send it back as `If-Match`; an edit
/// with a stale tag fails with
/// [`CybsiError::ResourceModified`](crate::CybsiError::ResourceModified).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tag(String);

impl Tag {
    pub(crate) fn from_response(response: &Response) -> Self {
        let value = response
            .headers()
            .get(reqwest::header::ETAG)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        Self(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Tag {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Tag {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tri-state field for PATCH bodies.
///
/// Partial updates distinguish three intents per field: leave the server
/// value unchanged (`Keep`), reset it to the server default (`Null`), or
/// replace it (`Set`). `Keep` fields must stay out of the request body
/// entirely; patch structs pair every `Nullable` field with
/// `#[serde(skip_serializing_if = "Nullable::is_keep")]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Nullable<T> {
    /// Leave the field unchanged. Never serialized.
    #[default]
    Keep,
    /// Clear the field (explicit JSON `null`).
    Null,
    /// Set the field to a value.
    Set(T),
}

impl<T> Nullable<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, Nullable::Keep)
    }
}

impl<T> From<T> for Nullable<T> {
    fn from(value: T) -> Self {
        Nullable::Set(value)
    }
}

impl<T> From<Option<T>> for Nullable<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Nullable::Set(v),
            None => Nullable::Null,
        }
    }
}

impl<T: Serialize> Serialize for Nullable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Nullable::Keep => Err(serde::ser::Error::custom(
                "Nullable::Keep must be skipped with skip_serializing_if",
            )),
            Nullable::Null => serializer.serialize_none(),
            Nullable::Set(value) => value.serialize(serializer),
        }
    }
}

/// Timestamp in the RFC 3339 form the API expects in query parameters.
pub(crate) fn rfc3339_timestamp(ts: &chrono::DateTime<chrono::Utc>) -> String {
    ts.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

/// Information share level, according to Traffic Light Protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShareLevels {
    /// Disclosure is not limited.
    White,
    /// Limited disclosure, restricted to the community.
    Green,
    /// Limited disclosure, restricted to participants' organizations.
    Amber,
    /// Not for disclosure, restricted to participants only.
    Red,
}

impl ShareLevels {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShareLevels::White => "White",
            ShareLevels::Green => "Green",
            ShareLevels::Amber => "Amber",
            ShareLevels::Red => "Red",
        }
    }
}

impl std::fmt::Display for ShareLevels {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize, Default)]
    #[serde(rename_all = "camelCase")]
    struct Patch {
        #[serde(skip_serializing_if = "Nullable::is_keep")]
        web_page_url: Nullable<String>,
        #[serde(skip_serializing_if = "Nullable::is_keep")]
        task_execution_timeout: Nullable<u32>,
    }

    #[test]
    fn nullable_keep_is_absent() {
        let body = serde_json::to_value(Patch::default()).unwrap();
        assert_eq!(body, serde_json::json!({}));
    }

    #[test]
    fn nullable_null_clears() {
        let patch = Patch {
            web_page_url: Nullable::Null,
            ..Default::default()
        };
        let body = serde_json::to_value(patch).unwrap();
        assert_eq!(body, serde_json::json!({"webPageUrl": null}));
    }

    #[test]
    fn nullable_set_replaces() {
        let patch = Patch {
            web_page_url: Nullable::Set("https://db.example.com".to_string()),
            task_execution_timeout: Nullable::Set(30),
        };
        let body = serde_json::to_value(patch).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"webPageUrl": "https://db.example.com", "taskExecutionTimeout": 30})
        );
    }

    #[test]
    fn nullable_from_option() {
        assert_eq!(Nullable::from(Some(1)), Nullable::Set(1));
        assert_eq!(Nullable::<i32>::from(None), Nullable::Null);
    }

    #[test]
    fn ref_view_deserializes() {
        let json = r#"{"uuid": "3a53cc35-f632-434c-bd4b-1ed8c014003a", "url": "https://cybsi.example.com/api/observable/entities/3a53cc35-f632-434c-bd4b-1ed8c014003a"}"#;
        let view: RefView = serde_json::from_str(json).unwrap();
        assert_eq!(
            view.uuid,
            "3a53cc35-f632-434c-bd4b-1ed8c014003a".parse::<Uuid>().unwrap()
        );
        assert!(view.url.is_some());
    }

    #[test]
    fn share_level_round_trip() {
        let level: ShareLevels = serde_json::from_str("\"Amber\"").unwrap();
        assert_eq!(level, ShareLevels::Amber);
        assert_eq!(serde_json::to_string(&level).unwrap(), "\"Amber\"");
    }
}
