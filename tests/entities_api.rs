//! Entities API tests against a mocked server.

use cybsi::observable::{
    AttributeNames, EntityAggregateSections, EntityForm, EntityKeyTypes, EntityTypes,
};
use cybsi::{Config, CybsiClient};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> CybsiClient {
    CybsiClient::new(&Config::new(server.uri(), "test-key")).unwrap()
}

#[tokio::test]
async fn register_puts_entity_form() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/observable/entities"))
        .and(body_json(serde_json::json!({
            "type": "DomainName",
            "keys": [{"type": "String", "value": "example.com"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "uuid": "3a53cc35-f632-434c-bd4b-1ed8c014003a"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let form = EntityForm::new(EntityTypes::DomainName)
        .add_key(EntityKeyTypes::String, "example.com");
    let entity_ref = client(&server)
        .observable()
        .entities()
        .register(&form)
        .await
        .unwrap();
    assert_eq!(
        entity_ref.uuid.to_string(),
        "3a53cc35-f632-434c-bd4b-1ed8c014003a"
    );
}

#[tokio::test]
async fn view_requests_sections_and_parses_aggregate() {
    let server = MockServer::start().await;
    let uuid = "3a53cc35-f632-434c-bd4b-1ed8c014003a";

    Mock::given(method("GET"))
        .and(path(format!("/observable/entities/{uuid}")))
        .and(query_param("section", "Threat"))
        .and(query_param("valuableFacts", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "uuid": uuid,
            "type": "DomainName",
            "keys": [{"type": "String", "value": "example.com"}],
            "sections": [{"name": "Threat", "data": {"status": "Malicious"}}]
        })))
        .mount(&server)
        .await;

    let aggregate = client(&server)
        .observable()
        .entities()
        .view(
            uuid.parse().unwrap(),
            Some(&[EntityAggregateSections::Threat]),
            None,
            Some(true),
        )
        .await
        .unwrap();

    assert_eq!(aggregate.entity_type, EntityTypes::DomainName);
    assert!(aggregate.threat().is_some());
    assert!(aggregate.labels().is_none());
}

#[tokio::test]
async fn canonize_key_sends_key_params() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/observable/entity-canonical-key"))
        .and(query_param("entityType", "DomainName"))
        .and(query_param("keyType", "String"))
        .and(query_param("key", "EXAMPLE.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "type": "String",
            "value": "example.com"
        })))
        .mount(&server)
        .await;

    let key = client(&server)
        .observable()
        .entities()
        .canonize_key(EntityTypes::DomainName, EntityKeyTypes::String, "EXAMPLE.com")
        .await
        .unwrap();
    assert_eq!(key.value, "example.com");
}

#[tokio::test]
async fn attribute_forecast_uses_kebab_path() {
    let server = MockServer::start().await;
    let uuid = "3a53cc35-f632-434c-bd4b-1ed8c014003a";

    Mock::given(method("GET"))
        .and(path(format!("/observable/entities/{uuid}/attributes/is-ioc")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "values": [{"value": true, "confidence": 0.77}],
            "hasConflicts": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let forecast = client(&server)
        .observable()
        .entities()
        .forecast_attribute_values(uuid.parse().unwrap(), AttributeNames::IsIoC, None)
        .await
        .unwrap();
    assert_eq!(forecast.values.len(), 1);
    assert!(!forecast.has_conflicts);
}

#[tokio::test]
async fn links_statistic_parses_distribution() {
    let server = MockServer::start().await;
    let uuid = "3a53cc35-f632-434c-bd4b-1ed8c014003a";

    Mock::given(method("GET"))
        .and(path(format!(
            "/observable/entities/{uuid}/link-type-statistic"
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "links": [{
                "linkType": {
                    "direction": "Forward",
                    "kind": "ResolvesTo",
                    "relatedEntityType": "IPAddress"
                },
                "linksCount": 3,
                "confidenceDistribution": [{"confidence": 0.5, "count": 3}]
            }]
        })))
        .mount(&server)
        .await;

    let stats = client(&server)
        .observable()
        .entities()
        .forecast_links_statistic(uuid.parse().unwrap(), None)
        .await
        .unwrap();
    assert_eq!(stats.links[0].links_count, 3);
}
