//! Observable entities API: register entities, aggregate what the system
//! knows about them, forecast attributes and links.

mod entities;
mod entity;
mod enums;
mod links;

pub use entities::{EntitiesAPI, LinkForecastFilter};
pub use entity::{
    AttributeAggregateView, AttributeValueView, EntityAggregateView,
    EntityAttributeForecastView, EntityForm, EntityKeyView, EntityView, GeoIPSectionView,
    SectionView, ThreatSectionView, ValuableFactView,
};
pub use enums::{
    AttributeNames, EntityAggregateSections, EntityKeyTypes, EntityTypes, IdentityClass,
    LinkDirection, NodeRole, PotentialDamage, RegionalInternetRegistry, RelatedThreatCategory,
    RelationshipKinds, ThreatCategory, ThreatStatus,
};
pub use links::{
    ConfidenceDistributionView, EntityLinkStatisticView, EntityLinksForecastView, LinkTypeView,
    LinkTypeStatisticView, LinkView,
};

use crate::connector::Connector;

/// Observable API handle.
///
/// Groups the observable-domain sub-APIs; obtained through
/// [`CybsiClient::observable`](crate::CybsiClient::observable).
#[derive(Debug, Clone)]
pub struct ObservableAPI {
    connector: Connector,
}

impl ObservableAPI {
    pub(crate) fn new(connector: Connector) -> Self {
        Self { connector }
    }

    /// Entities API handle.
    pub fn entities(&self) -> EntitiesAPI {
        EntitiesAPI::new(self.connector.clone())
    }
}
