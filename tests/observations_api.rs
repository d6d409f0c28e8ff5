//! Generic observations API tests.

use chrono::TimeZone;
use chrono::Utc;
use cybsi::observable::{
    AttributeNames, EntityForm, EntityKeyTypes, EntityTypes, RelationshipKinds,
};
use cybsi::observation::GenericObservationForm;
use cybsi::{Config, CybsiClient, ShareLevels};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const OBSERVATION_UUID: &str = "5d8b50b1-4ff4-4a13-a50a-f81bd2c966d2";

fn client(server: &MockServer) -> CybsiClient {
    CybsiClient::new(&Config::new(server.uri(), "test-key")).unwrap()
}

fn observation_json() -> serde_json::Value {
    serde_json::json!({
        "uuid": OBSERVATION_UUID,
        "reporter": {"uuid": "7bc12d51-9b62-4b34-ad17-9aa27c6791f2"},
        "dataSource": {"uuid": "d3c53120-cb7b-4a8b-94a9-6b1f2c6a2ea3"},
        "shareLevel": "Green",
        "seenAt": "2024-03-01T11:59:00Z",
        "registeredAt": "2024-03-01T12:00:01Z",
        "content": {
            "entityRelationships": [{
                "source": {
                    "uuid": "3a53cc35-f632-434c-bd4b-1ed8c014003a",
                    "type": "DomainName",
                    "keys": [{"type": "String", "value": "test.com"}]
                },
                "kind": "ResolvesTo",
                "target": {
                    "uuid": "85fca85e-0036-488d-9dcf-35970d182afc",
                    "type": "IPAddress",
                    "keys": [{"type": "String", "value": "8.8.8.8"}]
                },
                "confidence": 0.5
            }],
            "entityAttributeValues": [{
                "entity": {
                    "uuid": "3a53cc35-f632-434c-bd4b-1ed8c014003a",
                    "type": "DomainName",
                    "keys": [{"type": "String", "value": "test.com"}]
                },
                "attributeName": "IsIoC",
                "value": true,
                "confidence": 0.9
            }]
        }
    })
}

#[tokio::test]
async fn register_and_view_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/observations/generics"))
        .and(body_partial_json(serde_json::json!({
            "shareLevel": "Green",
            "content": {
                "entityAttributeValues": [{
                    "attributeName": "IsIoC",
                    "value": true,
                    "confidence": 0.9
                }]
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "uuid": OBSERVATION_UUID
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/observations/generics/{OBSERVATION_UUID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(observation_json()))
        .mount(&server)
        .await;

    let domain =
        EntityForm::new(EntityTypes::DomainName).add_key(EntityKeyTypes::String, "test.com");
    let ip = EntityForm::new(EntityTypes::IPAddress).add_key(EntityKeyTypes::String, "8.8.8.8");
    let seen_at = Utc.with_ymd_and_hms(2024, 3, 1, 11, 59, 0).unwrap();

    let form = GenericObservationForm::new(ShareLevels::Green, seen_at)
        .add_attribute_fact(domain.clone(), AttributeNames::IsIoC, true, Some(0.9))
        .add_entity_relationship(domain, RelationshipKinds::ResolvesTo, ip, Some(0.5));

    let generics = client(&server).observations().generics();
    let observation_ref = generics.register(&form).await.unwrap();
    let view = generics.view(observation_ref.uuid).await.unwrap();

    assert_eq!(view.share_level, ShareLevels::Green);
    assert_eq!(view.content.entity_relationships.len(), 1);
    assert_eq!(
        view.content.entity_relationships[0].kind,
        RelationshipKinds::ResolvesTo
    );
    assert_eq!(
        view.content.entity_attribute_values[0].attribute_name,
        AttributeNames::IsIoC
    );
}

#[tokio::test]
async fn filter_sends_entity_and_source_params() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/observations/generics"))
        .and(query_param(
            "dataSourceUUID",
            "d3c53120-cb7b-4a8b-94a9-6b1f2c6a2ea3",
        ))
        .and(query_param(
            "entityUUID",
            "3a53cc35-f632-434c-bd4b-1ed8c014003a",
        ))
        .and(query_param("limit", "10"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!([observation_json()])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let page = client(&server)
        .observations()
        .generics()
        .filter(
            Some(&["d3c53120-cb7b-4a8b-94a9-6b1f2c6a2ea3".parse().unwrap()]),
            Some("3a53cc35-f632-434c-bd4b-1ed8c014003a".parse().unwrap()),
            None,
            Some(10),
        )
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
}
