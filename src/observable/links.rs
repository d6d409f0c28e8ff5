//! Entity link forecast views.

use serde::Deserialize;

use super::entity::EntityView;
use super::enums::{EntityTypes, LinkDirection, RelationshipKinds};

/// Forecast of one entity link.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityLinksForecastView {
    /// The forecasted link.
    pub link: LinkView,
    /// Forecasted confidence, in (0; 1].
    pub confidence: f64,
}

/// A link between the requested entity and a related one.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkView {
    /// Link direction, relative to the requested entity.
    pub direction: LinkDirection,
    /// Kind of the relationship.
    pub kind: RelationshipKinds,
    /// Entity on the other end of the link.
    pub related_entity: EntityView,
}

/// Forecast of link type statistics for an entity.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityLinkStatisticView {
    /// Statistic per link type.
    #[serde(default)]
    pub links: Vec<LinkTypeStatisticView>,
}

/// Statistic of links of one type.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkTypeStatisticView {
    /// Link type.
    pub link_type: LinkTypeView,
    /// Total number of links of this type.
    pub links_count: u64,
    /// Link counts bucketed by forecasted confidence.
    #[serde(default)]
    pub confidence_distribution: Vec<ConfidenceDistributionView>,
}

/// Link type grouping key.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkTypeView {
    /// Link direction, relative to the requested entity.
    pub direction: LinkDirection,
    /// Kind of the relationship.
    pub kind: RelationshipKinds,
    /// Type of the related entities.
    pub related_entity_type: EntityTypes,
}

/// One bucket of the confidence distribution.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceDistributionView {
    /// Lower bound of the bucket.
    pub confidence: f64,
    /// Number of links in the bucket.
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links_forecast_deserializes() {
        let json = serde_json::json!({
            "link": {
                "direction": "Forward",
                "kind": "ResolvesTo",
                "relatedEntity": {
                    "uuid": "85fca85e-0036-488d-9dcf-35970d182afc",
                    "type": "IPAddress",
                    "keys": [{"type": "String", "value": "8.8.8.8"}]
                }
            },
            "confidence": 0.5
        });
        let view: EntityLinksForecastView = serde_json::from_value(json).unwrap();
        assert_eq!(view.link.kind, RelationshipKinds::ResolvesTo);
        assert_eq!(view.link.related_entity.entity_type, EntityTypes::IPAddress);
    }

    #[test]
    fn link_statistic_deserializes() {
        let json = serde_json::json!({
            "links": [
                {
                    "linkType": {
                        "direction": "Reverse",
                        "kind": "Uses",
                        "relatedEntityType": "File"
                    },
                    "linksCount": 12,
                    "confidenceDistribution": [
                        {"confidence": 0.5, "count": 8},
                        {"confidence": 0.9, "count": 4}
                    ]
                }
            ]
        });
        let view: EntityLinkStatisticView = serde_json::from_value(json).unwrap();
        assert_eq!(view.links[0].links_count, 12);
        assert_eq!(view.links[0].confidence_distribution.len(), 2);
    }
}
