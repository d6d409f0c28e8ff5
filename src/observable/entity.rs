//! Entity forms and views.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::{RefView, ShareLevels};

use super::enums::{
    AttributeNames, EntityKeyTypes, EntityTypes, ThreatStatus,
};

/// Natural entity key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityKeyView {
    /// Key type.
    #[serde(rename = "type")]
    pub key_type: EntityKeyTypes,
    /// Key value, canonized by the server.
    pub value: String,
}

/// Entity registration form.
///
/// # Example
///
/// ```
/// use cybsi::observable::{EntityForm, EntityKeyTypes, EntityTypes};
///
/// let form = EntityForm::new(EntityTypes::DomainName)
///     .add_key(EntityKeyTypes::String, "example.com");
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct EntityForm {
    #[serde(rename = "type")]
    entity_type: EntityTypes,
    keys: Vec<EntityKeyView>,
}

impl EntityForm {
    /// Form with an empty key set. The server rejects registration until
    /// at least one key is added.
    pub fn new(entity_type: EntityTypes) -> Self {
        Self {
            entity_type,
            keys: Vec::new(),
        }
    }

    /// Form with an initial key set.
    pub fn with_keys<V: Into<String>>(
        entity_type: EntityTypes,
        keys: impl IntoIterator<Item = (EntityKeyTypes, V)>,
    ) -> Self {
        let keys = keys
            .into_iter()
            .map(|(key_type, value)| EntityKeyView {
                key_type,
                value: value.into(),
            })
            .collect();
        Self { entity_type, keys }
    }

    /// Add a natural key.
    pub fn add_key(mut self, key_type: EntityKeyTypes, value: impl Into<String>) -> Self {
        self.keys.push(EntityKeyView {
            key_type,
            value: value.into(),
        });
        self
    }

    pub fn entity_type(&self) -> EntityTypes {
        self.entity_type
    }
}

/// Registered entity.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityView {
    /// Entity identifier.
    pub uuid: Uuid,
    /// Entity type.
    #[serde(rename = "type")]
    pub entity_type: EntityTypes,
    /// Natural keys of the entity.
    #[serde(default)]
    pub keys: Vec<EntityKeyView>,
}

/// Aggregated view of an entity.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityAggregateView {
    /// Entity identifier.
    pub uuid: Uuid,
    /// Entity type.
    #[serde(rename = "type")]
    pub entity_type: EntityTypes,
    /// Natural keys of the entity.
    #[serde(default)]
    pub keys: Vec<EntityKeyView>,
    /// Aggregated sections, in server order. Only requested sections are
    /// present.
    #[serde(default)]
    pub sections: Vec<SectionView>,
}

impl EntityAggregateView {
    /// Attributes associated with the entity through observations.
    pub fn associated_attributes(&self) -> Option<&[AttributeAggregateView]> {
        self.sections.iter().find_map(|s| match s {
            SectionView::AssociatedAttributes(data) => Some(data.as_slice()),
            _ => None,
        })
    }

    /// Attributes the entity has by nature (file size, identity class).
    pub fn natural_attributes(&self) -> Option<&[AttributeAggregateView]> {
        self.sections.iter().find_map(|s| match s {
            SectionView::NaturalAttributes(data) => Some(data.as_slice()),
            _ => None,
        })
    }

    /// Threat verdict section.
    pub fn threat(&self) -> Option<&ThreatSectionView> {
        self.sections.iter().find_map(|s| match s {
            SectionView::Threat(data) => Some(data),
            _ => None,
        })
    }

    /// GeoIP section.
    pub fn geo_ip(&self) -> Option<&GeoIPSectionView> {
        self.sections.iter().find_map(|s| match s {
            SectionView::GeoIP(data) => Some(data),
            _ => None,
        })
    }

    /// Labels attached to the entity.
    pub fn labels(&self) -> Option<&[String]> {
        self.sections.iter().find_map(|s| match s {
            SectionView::Labels(data) => Some(data.as_slice()),
            _ => None,
        })
    }
}

/// One aggregated section.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "name", content = "data")]
pub enum SectionView {
    /// Attribute values observed for the entity.
    AssociatedAttributes(Vec<AttributeAggregateView>),
    /// Attribute values inherent to the entity.
    NaturalAttributes(Vec<AttributeAggregateView>),
    /// Threat verdict.
    Threat(ThreatSectionView),
    /// GeoIP data for IP addresses.
    GeoIP(GeoIPSectionView),
    /// Labels.
    Labels(Vec<String>),
}

/// Aggregated values of one attribute.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeAggregateView {
    /// Attribute name.
    pub attribute_name: AttributeNames,
    /// Values with their forecasted confidence.
    #[serde(default)]
    pub values: Vec<AttributeValueView>,
}

/// One attribute value with its confidence.
///
/// The value type depends on the attribute: booleans for flags like
/// `IsIoC`, numbers for `Size`/`ASN`, strings or dictionary items
/// otherwise.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeValueView {
    /// Attribute value.
    pub value: serde_json::Value,
    /// Forecasted confidence, in (0; 1].
    pub confidence: f64,
    /// Facts the forecast is based on. Present when valuable facts were
    /// requested.
    #[serde(default)]
    pub valuable_facts: Option<Vec<ValuableFactView>>,
}

/// A fact backing an attribute forecast.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuableFactView {
    /// Data source which reported the fact.
    pub data_source: RefView,
    /// Share level of the fact.
    pub share_level: ShareLevels,
    /// Date and time when the fact was observed.
    pub seen_at: DateTime<Utc>,
    /// Reported confidence.
    pub confidence: f64,
    /// Reported value.
    pub value: serde_json::Value,
}

/// Forecast of entity attribute values.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityAttributeForecastView {
    /// Forecasted values, most confident first.
    #[serde(default)]
    pub values: Vec<AttributeValueView>,
    /// Facts of different data sources contradict each other.
    #[serde(default)]
    pub has_conflicts: bool,
}

/// Threat section payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatSectionView {
    /// Forecasted threat status.
    pub status: ThreatStatus,
}

/// GeoIP section payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoIPSectionView {
    /// Autonomous system number.
    #[serde(default)]
    pub asn: Option<i64>,
    /// ISO country code.
    #[serde(default)]
    pub country_code: Option<String>,
    /// Country name.
    #[serde(default)]
    pub country: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observable::EntityAggregateSections;

    #[test]
    fn entity_form_serializes_keys_in_order() {
        let form = EntityForm::new(EntityTypes::File)
            .add_key(EntityKeyTypes::MD5, "6e34f33f9deb9a4ecbbd9b09282ba0c4")
            .add_key(EntityKeyTypes::SHA1, "f572d396fae9206628714fb2ce00f72e94f2258f");
        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "File",
                "keys": [
                    {"type": "MD5Hash", "value": "6e34f33f9deb9a4ecbbd9b09282ba0c4"},
                    {"type": "SHA1Hash", "value": "f572d396fae9206628714fb2ce00f72e94f2258f"},
                ]
            })
        );
    }

    #[test]
    fn entity_form_with_keys() {
        let form = EntityForm::with_keys(
            EntityTypes::DomainName,
            [(EntityKeyTypes::String, "example.com")],
        );
        assert_eq!(form.entity_type(), EntityTypes::DomainName);
        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["keys"][0]["value"], "example.com");
    }

    #[test]
    fn aggregate_view_sections() {
        let json = serde_json::json!({
            "uuid": "3a53cc35-f632-434c-bd4b-1ed8c014003a",
            "type": "DomainName",
            "keys": [{"type": "String", "value": "example.com"}],
            "sections": [
                {
                    "name": "AssociatedAttributes",
                    "data": [
                        {
                            "attributeName": "IsIoC",
                            "values": [{"value": true, "confidence": 0.9}]
                        }
                    ]
                },
                {"name": "Threat", "data": {"status": "Malicious"}},
                {"name": "Labels", "data": ["phishing-campaign"]}
            ]
        });
        let view: EntityAggregateView = serde_json::from_value(json).unwrap();

        let attrs = view.associated_attributes().unwrap();
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].attribute_name, AttributeNames::IsIoC);
        assert_eq!(attrs[0].values[0].value, serde_json::Value::Bool(true));
        assert!((attrs[0].values[0].confidence - 0.9).abs() < f64::EPSILON);

        assert_eq!(view.threat().unwrap().status, ThreatStatus::Malicious);
        assert_eq!(view.labels().unwrap(), ["phishing-campaign"]);
        assert!(view.natural_attributes().is_none());
        assert!(view.geo_ip().is_none());

        // requested-section names match the wire form
        assert_eq!(EntityAggregateSections::GeoIP.as_str(), "GeoIP");
    }

    #[test]
    fn attribute_forecast_with_valuable_facts() {
        let json = serde_json::json!({
            "values": [
                {
                    "value": true,
                    "confidence": 0.77,
                    "valuableFacts": [
                        {
                            "dataSource": {"uuid": "d3c53120-cb7b-4a8b-94a9-6b1f2c6a2ea3"},
                            "shareLevel": "Green",
                            "seenAt": "2024-03-01T12:00:00Z",
                            "confidence": 0.9,
                            "value": true
                        }
                    ]
                }
            ],
            "hasConflicts": true
        });
        let view: EntityAttributeForecastView = serde_json::from_value(json).unwrap();
        assert!(view.has_conflicts);
        let facts = view.values[0].valuable_facts.as_ref().unwrap();
        assert_eq!(facts[0].share_level, ShareLevels::Green);
    }
}
