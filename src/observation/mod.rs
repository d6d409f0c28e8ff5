//! Observations API: facts reported to the system.

mod enums;
mod generic;

pub use enums::ObservationTypes;
pub use generic::{
    AttributeFactView, GenericObservationContentView, GenericObservationForm,
    GenericObservationView, GenericObservationsAPI, RelationshipFactView,
};

use crate::connector::Connector;

/// Observations API handle.
///
/// Obtained through
/// [`CybsiClient::observations`](crate::CybsiClient::observations).
#[derive(Debug, Clone)]
pub struct ObservationsAPI {
    connector: Connector,
}

impl ObservationsAPI {
    pub(crate) fn new(connector: Connector) -> Self {
        Self { connector }
    }

    /// Generic observations API handle.
    pub fn generics(&self) -> GenericObservationsAPI {
        GenericObservationsAPI::new(self.connector.clone())
    }
}
