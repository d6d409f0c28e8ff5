//! Register a generic observation and read it back.
//!
//! Run with:
//! ```
//! CYBSI_API_URL=https://cybsi.example.com/api CYBSI_API_KEY=your-key \
//!     cargo run --example register_generic
//! ```

use chrono::Utc;
use cybsi::observable::{
    AttributeNames, EntityForm, EntityKeyTypes, EntityTypes, RelationshipKinds,
};
use cybsi::observation::GenericObservationForm;
use cybsi::{CybsiClient, ShareLevels};

fn create_generic_observation() -> GenericObservationForm {
    let domain =
        EntityForm::new(EntityTypes::DomainName).add_key(EntityKeyTypes::String, "test.com");
    let ip_address =
        EntityForm::new(EntityTypes::IPAddress).add_key(EntityKeyTypes::String, "8.8.8.8");

    GenericObservationForm::new(ShareLevels::Green, Utc::now())
        .add_attribute_fact(domain.clone(), AttributeNames::IsIoC, true, Some(0.9))
        .add_attribute_fact(domain.clone(), AttributeNames::IsMalicious, true, Some(0.9))
        .add_entity_relationship(domain, RelationshipKinds::ResolvesTo, ip_address, Some(0.5))
}

#[tokio::main]
async fn main() -> cybsi::Result<()> {
    tracing_subscriber::fmt::init();

    let client = CybsiClient::from_env()?;
    let generics = client.observations().generics();

    let observation = create_generic_observation();
    let observation_ref = generics.register(&observation).await?;
    println!("registered observation {}", observation_ref.uuid);

    let view = generics.view(observation_ref.uuid).await?;
    println!(
        "share level {}, {} attribute fact(s), {} relationship(s), seen at {}",
        view.share_level,
        view.content.entity_attribute_values.len(),
        view.content.entity_relationships.len(),
        view.seen_at,
    );

    Ok(())
}
