//! Generic observations.
//!
//! A generic observation is a free-form set of facts about entities:
//! attribute values and relationships, observed at some point in time by
//! some data source.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::{RefView, ShareLevels};
use crate::connector::Connector;
use crate::error::Result;
use crate::observable::{AttributeNames, EntityForm, EntityView, RelationshipKinds};
use crate::pagination::{Cursor, Page};

const GENERICS_PATH: &str = "/observations/generics";

/// Generic observations API.
///
/// Obtained through
/// [`ObservationsAPI::generics`](super::ObservationsAPI::generics).
#[derive(Debug, Clone)]
pub struct GenericObservationsAPI {
    connector: Connector,
}

impl GenericObservationsAPI {
    pub(crate) fn new(connector: Connector) -> Self {
        Self { connector }
    }

    /// Register a generic observation.
    ///
    /// Calls `POST /observations/generics`. Entities embedded in the form
    /// are registered on the fly.
    ///
    /// # Errors
    ///
    /// [`CybsiError::Semantic`](crate::CybsiError::Semantic) when entity
    /// forms or attribute values inside the observation violate server
    /// logic.
    #[tracing::instrument(skip(self, observation))]
    pub async fn register(&self, observation: &GenericObservationForm) -> Result<RefView> {
        let response = self.connector.do_post(GENERICS_PATH, observation).await?;
        Ok(response.json().await?)
    }

    /// Get a generic observation view.
    ///
    /// Calls `GET /observations/generics/{observation_uuid}`.
    #[tracing::instrument(skip(self))]
    pub async fn view(&self, observation_uuid: Uuid) -> Result<GenericObservationView> {
        let path = format!("{GENERICS_PATH}/{observation_uuid}");
        let response = self.connector.do_get(&path, &[]).await?;
        Ok(response.json().await?)
    }

    /// Filter generic observations.
    ///
    /// Calls `GET /observations/generics`.
    ///
    /// # Arguments
    ///
    /// * `data_source_uuids` - Keep observations reported by these data
    ///   sources.
    /// * `entity_uuid` - Keep observations mentioning the entity.
    #[tracing::instrument(skip(self))]
    pub async fn filter(
        &self,
        data_source_uuids: Option<&[Uuid]>,
        entity_uuid: Option<Uuid>,
        cursor: Option<&Cursor>,
        limit: Option<u32>,
    ) -> Result<Page<GenericObservationView>> {
        let mut params: Vec<(String, String)> = Vec::new();
        if let Some(uuids) = data_source_uuids {
            for uuid in uuids {
                params.push(("dataSourceUUID".to_string(), uuid.to_string()));
            }
        }
        if let Some(uuid) = entity_uuid {
            params.push(("entityUUID".to_string(), uuid.to_string()));
        }
        if let Some(cursor) = cursor {
            params.push(("cursor".to_string(), cursor.to_string()));
        }
        if let Some(limit) = limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        self.connector.get_page(GENERICS_PATH, params).await
    }
}

/// Generic observation form.
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use cybsi::observable::{
///     AttributeNames, EntityForm, EntityKeyTypes, EntityTypes, RelationshipKinds,
/// };
/// use cybsi::observation::GenericObservationForm;
/// use cybsi::ShareLevels;
///
/// let domain = EntityForm::new(EntityTypes::DomainName)
///     .add_key(EntityKeyTypes::String, "test.com");
/// let ip = EntityForm::new(EntityTypes::IPAddress)
///     .add_key(EntityKeyTypes::String, "8.8.8.8");
///
/// let observation = GenericObservationForm::new(ShareLevels::Green, Utc::now())
///     .add_attribute_fact(domain.clone(), AttributeNames::IsIoC, true, Some(0.9))
///     .add_entity_relationship(domain, RelationshipKinds::ResolvesTo, ip, Some(0.5));
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenericObservationForm {
    share_level: ShareLevels,
    seen_at: DateTime<Utc>,
    #[serde(rename = "dataSourceUUID", skip_serializing_if = "Option::is_none")]
    data_source_uuid: Option<Uuid>,
    content: GenericObservationContentForm,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenericObservationContentForm {
    entity_relationships: Vec<RelationshipFactForm>,
    entity_attribute_values: Vec<AttributeFactForm>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct RelationshipFactForm {
    source: EntityForm,
    kind: RelationshipKinds,
    target: EntityForm,
    #[serde(skip_serializing_if = "Option::is_none")]
    confidence: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct AttributeFactForm {
    entity: EntityForm,
    attribute_name: AttributeNames,
    value: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    confidence: Option<f64>,
}

impl GenericObservationForm {
    /// Empty observation with the given share level and seen-at stamp.
    pub fn new(share_level: ShareLevels, seen_at: DateTime<Utc>) -> Self {
        Self {
            share_level,
            seen_at,
            data_source_uuid: None,
            content: GenericObservationContentForm::default(),
        }
    }

    /// Set the data source the facts originate from. Without it, the
    /// server attributes the observation to the reporting API key.
    pub fn data_source(mut self, source_uuid: Uuid) -> Self {
        self.data_source_uuid = Some(source_uuid);
        self
    }

    /// Add an attribute value fact.
    ///
    /// `confidence` is in (0; 1]; the server assumes 1 if omitted.
    pub fn add_attribute_fact(
        mut self,
        entity: EntityForm,
        attribute_name: AttributeNames,
        value: impl Into<serde_json::Value>,
        confidence: Option<f64>,
    ) -> Self {
        self.content.entity_attribute_values.push(AttributeFactForm {
            entity,
            attribute_name,
            value: value.into(),
            confidence,
        });
        self
    }

    /// Add a relationship fact between two entities.
    pub fn add_entity_relationship(
        mut self,
        source: EntityForm,
        kind: RelationshipKinds,
        target: EntityForm,
        confidence: Option<f64>,
    ) -> Self {
        self.content.entity_relationships.push(RelationshipFactForm {
            source,
            kind,
            target,
            confidence,
        });
        self
    }
}

/// Generic observation view.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenericObservationView {
    /// Observation identifier.
    pub uuid: Uuid,
    /// User who registered the observation.
    pub reporter: RefView,
    /// Data source the facts originate from.
    pub data_source: RefView,
    /// Share level of the observation.
    pub share_level: ShareLevels,
    /// Date and time the facts were observed.
    pub seen_at: DateTime<Utc>,
    /// Date and time the observation was registered.
    pub registered_at: DateTime<Utc>,
    /// Observation content.
    pub content: GenericObservationContentView,
}

/// Facts of a generic observation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenericObservationContentView {
    /// Relationship facts.
    #[serde(default)]
    pub entity_relationships: Vec<RelationshipFactView>,
    /// Attribute value facts.
    #[serde(default)]
    pub entity_attribute_values: Vec<AttributeFactView>,
}

/// Relationship fact.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipFactView {
    /// Source entity.
    pub source: EntityView,
    /// Kind of the relationship.
    pub kind: RelationshipKinds,
    /// Target entity.
    pub target: EntityView,
    /// Reported confidence, in (0; 1].
    pub confidence: f64,
}

/// Attribute value fact.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeFactView {
    /// The entity the fact is about.
    pub entity: EntityView,
    /// Attribute name.
    pub attribute_name: AttributeNames,
    /// Attribute value.
    pub value: serde_json::Value,
    /// Reported confidence, in (0; 1].
    pub confidence: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observable::{EntityKeyTypes, EntityTypes};
    use chrono::TimeZone;

    fn domain() -> EntityForm {
        EntityForm::new(EntityTypes::DomainName).add_key(EntityKeyTypes::String, "test.com")
    }

    #[test]
    fn form_serializes_facts() {
        let seen_at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let ip =
            EntityForm::new(EntityTypes::IPAddress).add_key(EntityKeyTypes::String, "8.8.8.8");
        let form = GenericObservationForm::new(ShareLevels::Green, seen_at)
            .add_attribute_fact(domain(), AttributeNames::IsIoC, true, Some(0.9))
            .add_entity_relationship(domain(), RelationshipKinds::ResolvesTo, ip, Some(0.5));

        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["shareLevel"], "Green");
        assert_eq!(json["content"]["entityAttributeValues"][0]["attributeName"], "IsIoC");
        assert_eq!(json["content"]["entityAttributeValues"][0]["value"], true);
        assert_eq!(json["content"]["entityRelationships"][0]["kind"], "ResolvesTo");
        assert_eq!(
            json["content"]["entityRelationships"][0]["target"]["keys"][0]["value"],
            "8.8.8.8"
        );
        assert!(json.get("dataSourceUUID").is_none());
    }

    #[test]
    fn form_confidence_omitted_when_none() {
        let seen_at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let form = GenericObservationForm::new(ShareLevels::White, seen_at).add_attribute_fact(
            domain(),
            AttributeNames::IsTrusted,
            false,
            None,
        );
        let json = serde_json::to_value(&form).unwrap();
        assert!(json["content"]["entityAttributeValues"][0]
            .get("confidence")
            .is_none());
    }

    #[test]
    fn view_deserializes() {
        let json = serde_json::json!({
            "uuid": "5d8b50b1-4ff4-4a13-a50a-f81bd2c966d2",
            "reporter": {"uuid": "7bc12d51-9b62-4b34-ad17-9aa27c6791f2"},
            "dataSource": {"uuid": "d3c53120-cb7b-4a8b-94a9-6b1f2c6a2ea3"},
            "shareLevel": "Amber",
            "seenAt": "2024-03-01T11:59:00Z",
            "registeredAt": "2024-03-01T12:00:01Z",
            "content": {
                "entityRelationships": [],
                "entityAttributeValues": [
                    {
                        "entity": {
                            "uuid": "3a53cc35-f632-434c-bd4b-1ed8c014003a",
                            "type": "DomainName",
                            "keys": [{"type": "String", "value": "test.com"}]
                        },
                        "attributeName": "IsIoC",
                        "value": true,
                        "confidence": 0.9
                    }
                ]
            }
        });
        let view: GenericObservationView = serde_json::from_value(json).unwrap();
        assert_eq!(view.share_level, ShareLevels::Amber);
        assert_eq!(view.content.entity_attribute_values.len(), 1);
        assert_eq!(
            view.content.entity_attribute_values[0].attribute_name,
            AttributeNames::IsIoC
        );
    }
}
