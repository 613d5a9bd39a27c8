//! Integration tests for the HTTP client against a mock server.

use attrstore_client::{AttributeStore, StoreClient, StoreError};
use attrstore_core::{
    Attribute, GetAttributesRequest, ListDomainsRequest, ReplaceableAttribute, ReplaceableItem,
};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> StoreClient {
    StoreClient::builder()
        .endpoint(server.uri())
        .build()
        .expect("mock server URI is valid")
}

#[tokio::test]
async fn create_and_delete_domain() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/domains/users"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/domains/users"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.domains().create("users").await.unwrap();
    client.domains().delete("users").await.unwrap();
}

#[tokio::test]
async fn list_domains_follows_pagination() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/domains"))
        .and(query_param_is_missing("NextToken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "DomainNames": ["alpha", "beta"],
            "NextToken": "2"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/domains"))
        .and(query_param("NextToken", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "DomainNames": ["gamma"]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let all = client.domains().all().await.unwrap();
    assert_eq!(all, vec!["alpha", "beta", "gamma"]);
}

#[tokio::test]
async fn list_builder_passes_page_size() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/domains"))
        .and(query_param("MaxNumberOfDomains", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "DomainNames": ["a", "b"],
            "NextToken": "2"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let page = client.domains().list().max_domains(2).send().await.unwrap();
    assert_eq!(page.domain_names, vec!["a", "b"]);
    assert!(page.has_more());
}

#[tokio::test]
async fn domain_metadata_deserializes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/domains/users/metadata"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ItemCount": 42,
            "AttributeValueCount": 120,
            "Timestamp": 1_700_000_000u64
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let meta = client.domains().metadata("users").await.unwrap();
    assert_eq!(meta.item_count, 42);
    assert_eq!(meta.attribute_value_count, 120);
    assert_eq!(meta.timestamp, 1_700_000_000);
}

#[tokio::test]
async fn put_attributes_sends_wire_shape() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/domains/users/items/u1/attributes"))
        .and(body_json(json!({
            "Attributes": [
                { "Name": "color", "Value": "red" },
                { "Name": "color", "Value": "blue", "Replace": true }
            ]
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .attributes()
        .put(
            "users",
            "u1",
            &[
                ReplaceableAttribute::new("color", "red"),
                ReplaceableAttribute::replacing("color", "blue"),
            ],
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn batch_put_sends_items() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/domains/users/batch"))
        .and(body_json(json!({
            "Items": [
                { "Name": "u1", "Attributes": [{ "Name": "a", "Value": "1" }] },
                { "Name": "u2", "Attributes": [{ "Name": "a", "Value": "2" }] }
            ]
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .attributes()
        .batch_put(
            "users",
            &[
                ReplaceableItem::new("u1", vec![ReplaceableAttribute::new("a", "1")]),
                ReplaceableItem::new("u2", vec![ReplaceableAttribute::new("a", "2")]),
            ],
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn get_attributes_filters_and_reads_consistently() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/domains/users/items/u1/attributes"))
        .and(query_param("AttributeName", "color"))
        .and(query_param("ConsistentRead", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Attributes": [{ "Name": "color", "Value": "red" }]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let attrs = client
        .attributes()
        .get("users", "u1")
        .name("color")
        .consistent()
        .send()
        .await
        .unwrap();
    assert_eq!(attrs, vec![Attribute::new("color", "red")]);
}

#[tokio::test]
async fn reserved_characters_in_names_stay_in_one_path_segment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/domains/logs%2F2024/items/entry%201/attributes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Attributes": [{ "Name": "level", "Value": "info" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let attrs = client
        .attributes()
        .get("logs/2024", "entry 1")
        .send()
        .await
        .unwrap();
    assert_eq!(attrs, vec![Attribute::new("level", "info")]);
}

#[tokio::test]
async fn delete_attributes_posts_to_delete_route() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/domains/users/items/u1/attributes/delete"))
        .and(body_json(json!({
            "Attributes": [{ "Name": "color" }]
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .attributes()
        .delete("users", "u1", &[Attribute::named("color")])
        .await
        .unwrap();
}

#[tokio::test]
async fn select_round_trips_items() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/select"))
        .and(body_json(json!({
            "SelectExpression": "select * from users where color = 'red'",
            "ConsistentRead": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Items": [
                { "Name": "u1", "Attributes": [{ "Name": "color", "Value": "red" }] }
            ],
            "NextToken": "50"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client
        .select("select * from users where color = 'red'")
        .consistent()
        .send()
        .await
        .unwrap();
    assert_eq!(result.items.len(), 1);
    assert_eq!(result.items[0].value("color"), Some("red"));
    assert_eq!(result.next_token.as_deref(), Some("50"));
}

#[tokio::test]
async fn service_error_codes_map_to_variants() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/domains/ghost/metadata"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "Code": "NoSuchDomain",
            "Message": "ghost"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.domains().metadata("ghost").await.unwrap_err();
    assert!(matches!(err, StoreError::NoSuchDomain { ref domain } if domain == "ghost"));
    assert_eq!(err.code(), Some("NoSuchDomain"));
}

#[tokio::test]
async fn unknown_error_codes_are_preserved() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/domains/users"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "Code": "AccountSuspended",
            "Message": "contact support"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.domains().create("users").await.unwrap_err();
    assert!(
        matches!(err, StoreError::Service { ref code, .. } if code == "AccountSuspended")
    );
}

#[tokio::test]
async fn throttling_is_reported_with_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/select"))
        .respond_with(ResponseTemplate::new(503).insert_header("Retry-After", "2"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.select("select * from users").send().await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::ServiceUnavailable {
            retry_after: Some(2)
        }
    ));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn client_works_through_the_trait() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/domains"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "DomainNames": ["users"]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/domains/users/items/u1/attributes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Attributes": [] })))
        .mount(&server)
        .await;

    let store: Box<dyn AttributeStore> = Box::new(client_for(&server));
    let page = store.list_domains(ListDomainsRequest::new()).await.unwrap();
    assert_eq!(page.domain_names, vec!["users"]);

    // a missing item reads as an empty set
    let attrs = store
        .get_attributes(GetAttributesRequest::new("users", "u1"))
        .await
        .unwrap();
    assert!(attrs.is_empty());
}
