//! Entities API.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::common::{rfc3339_timestamp, RefView};
use crate::connector::Connector;
use crate::error::Result;
use crate::pagination::{Cursor, Page};

use super::entity::{
    EntityAggregateView, EntityAttributeForecastView, EntityForm, EntityKeyView,
};
use super::enums::{
    AttributeNames, EntityAggregateSections, EntityKeyTypes, EntityTypes, LinkDirection,
    RelationshipKinds,
};
use super::links::{EntityLinkStatisticView, EntityLinksForecastView};

const ENTITIES_PATH: &str = "/observable/entities";
const CANONICAL_KEY_PATH: &str = "/observable/entity-canonical-key";

/// Entities API.
///
/// Obtained through
/// [`CybsiClient::observable`](crate::CybsiClient::observable).
#[derive(Debug, Clone)]
pub struct EntitiesAPI {
    connector: Connector,
}

/// Filter for [`EntitiesAPI::forecast_links`].
#[derive(Debug, Clone, Default)]
pub struct LinkForecastFilter {
    /// Keep only links to entities of these types.
    pub related_entity_types: Option<Vec<EntityTypes>>,
    /// Keep only links of these directions.
    pub direction: Option<Vec<LinkDirection>>,
    /// Keep only relationships of these kinds.
    pub kind: Option<Vec<RelationshipKinds>>,
    /// Discard links with confidence below the threshold, in (0; 1].
    pub confidence_threshold: Option<f64>,
    /// Date of forecast. Current time if not set.
    pub forecast_at: Option<DateTime<Utc>>,
}

impl EntitiesAPI {
    pub(crate) fn new(connector: Connector) -> Self {
        Self { connector }
    }

    /// Register an entity.
    ///
    /// Calls `PUT /observable/entities`. Returns a reference to the
    /// registered entity; the server deduplicates by canonical key, so
    /// re-registering an existing entity returns the existing reference.
    ///
    /// # Errors
    ///
    /// [`CybsiError::Semantic`](crate::CybsiError::Semantic) with
    /// `InvalidKeySet`, `InvalidKey`, `KeyConflict` or `BrokenKeySet` when
    /// the form contains logic errors.
    #[tracing::instrument(skip(self, entity))]
    pub async fn register(&self, entity: &EntityForm) -> Result<RefView> {
        let response = self.connector.do_put(ENTITIES_PATH, entity).await?;
        Ok(response.json().await?)
    }

    /// Get an aggregated entity view.
    ///
    /// Calls `GET /observable/entities/{entity_uuid}`.
    ///
    /// # Arguments
    ///
    /// * `sections` - Sections to aggregate; all of them if `None`.
    /// * `forecast_at` - Point of time to aggregate sections at.
    /// * `with_valuable_facts` - Include valuable facts in the response.
    #[tracing::instrument(skip(self))]
    pub async fn view(
        &self,
        entity_uuid: Uuid,
        sections: Option<&[EntityAggregateSections]>,
        forecast_at: Option<DateTime<Utc>>,
        with_valuable_facts: Option<bool>,
    ) -> Result<EntityAggregateView> {
        let mut params: Vec<(String, String)> = Vec::new();
        if let Some(sections) = sections {
            for section in sections {
                params.push(("section".to_string(), section.to_string()));
            }
        }
        if let Some(at) = forecast_at {
            params.push(("forecastAt".to_string(), rfc3339_timestamp(&at)));
        }
        if let Some(valuable) = with_valuable_facts {
            params.push(("valuableFacts".to_string(), valuable.to_string()));
        }

        let path = format!("{ENTITIES_PATH}/{entity_uuid}");
        let response = self.connector.do_get(&path, &params).await?;
        Ok(response.json().await?)
    }

    /// Get a list of aggregated entities.
    ///
    /// Calls `GET /observable/entities`. At least one entity uuid must be
    /// provided.
    #[tracing::instrument(skip(self))]
    pub async fn aggregate(
        &self,
        entity_uuids: &[Uuid],
        sections: Option<&[EntityAggregateSections]>,
        forecast_at: Option<DateTime<Utc>>,
        cursor: Option<&Cursor>,
        limit: Option<u32>,
    ) -> Result<Page<EntityAggregateView>> {
        let mut params: Vec<(String, String)> = entity_uuids
            .iter()
            .map(|uuid| ("uuid".to_string(), uuid.to_string()))
            .collect();
        if let Some(sections) = sections {
            for section in sections {
                params.push(("section".to_string(), section.to_string()));
            }
        }
        if let Some(at) = forecast_at {
            params.push(("forecastAt".to_string(), rfc3339_timestamp(&at)));
        }
        if let Some(cursor) = cursor {
            params.push(("cursor".to_string(), cursor.to_string()));
        }
        if let Some(limit) = limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        self.connector.get_page(ENTITIES_PATH, params).await
    }

    /// Get a canonized entity key.
    ///
    /// Calls `GET /observable/entity-canonical-key`. Key canonization
    /// happens server-side (punycode, case folding and so on).
    #[tracing::instrument(skip(self))]
    pub async fn canonize_key(
        &self,
        entity_type: EntityTypes,
        key_type: EntityKeyTypes,
        value: &str,
    ) -> Result<EntityKeyView> {
        let params = vec![
            ("entityType".to_string(), entity_type.to_string()),
            ("keyType".to_string(), key_type.to_string()),
            ("key".to_string(), value.to_string()),
        ];
        let response = self.connector.do_get(CANONICAL_KEY_PATH, &params).await?;
        Ok(response.json().await?)
    }

    /// Get a forecast of entity attribute values.
    ///
    /// Calls `GET /observable/entities/{entity_uuid}/attributes/{attr}`,
    /// where the attribute name converts to kebab-case on the URL path.
    #[tracing::instrument(skip(self))]
    pub async fn forecast_attribute_values(
        &self,
        entity_uuid: Uuid,
        attr_name: AttributeNames,
        forecast_at: Option<DateTime<Utc>>,
    ) -> Result<EntityAttributeForecastView> {
        let mut params: Vec<(String, String)> = Vec::new();
        if let Some(at) = forecast_at {
            params.push(("forecastAt".to_string(), rfc3339_timestamp(&at)));
        }

        let path = format!("{ENTITIES_PATH}/{entity_uuid}/attributes/{}", attr_name.kebab());
        let response = self.connector.do_get(&path, &params).await?;
        Ok(response.json().await?)
    }

    /// Get a list of link forecasts of an entity.
    ///
    /// Calls `GET /observable/entities/{entity_uuid}/links`.
    #[tracing::instrument(skip(self, filter))]
    pub async fn forecast_links(
        &self,
        entity_uuid: Uuid,
        filter: &LinkForecastFilter,
        cursor: Option<&Cursor>,
        limit: Option<u32>,
    ) -> Result<Page<EntityLinksForecastView>> {
        let mut params: Vec<(String, String)> = Vec::new();
        if let Some(types) = &filter.related_entity_types {
            for typ in types {
                params.push(("relatedEntityType".to_string(), typ.to_string()));
            }
        }
        if let Some(directions) = &filter.direction {
            for direction in directions {
                params.push(("direction".to_string(), direction.to_string()));
            }
        }
        if let Some(kinds) = &filter.kind {
            for kind in kinds {
                params.push(("kind".to_string(), kind.to_string()));
            }
        }
        if let Some(threshold) = filter.confidence_threshold {
            params.push(("confidenceThreshold".to_string(), threshold.to_string()));
        }
        if let Some(at) = filter.forecast_at {
            params.push(("forecastAt".to_string(), rfc3339_timestamp(&at)));
        }
        if let Some(cursor) = cursor {
            params.push(("cursor".to_string(), cursor.to_string()));
        }
        if let Some(limit) = limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        let path = format!("{ENTITIES_PATH}/{entity_uuid}/links");
        self.connector.get_page(&path, params).await
    }

    /// Get statistics of links for an entity.
    ///
    /// Calls `GET /observable/entities/{entity_uuid}/link-type-statistic`.
    #[tracing::instrument(skip(self))]
    pub async fn forecast_links_statistic(
        &self,
        entity_uuid: Uuid,
        forecast_at: Option<DateTime<Utc>>,
    ) -> Result<EntityLinkStatisticView> {
        let mut params: Vec<(String, String)> = Vec::new();
        if let Some(at) = forecast_at {
            params.push(("forecastAt".to_string(), rfc3339_timestamp(&at)));
        }

        let path = format!("{ENTITIES_PATH}/{entity_uuid}/link-type-statistic");
        let response = self.connector.do_get(&path, &params).await?;
        Ok(response.json().await?)
    }
}
