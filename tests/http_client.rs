//! HTTP transport against a stub management node.

use pexip_infinity_provider::infinity::types::{DnsServer, DnsServerCreateRequest, TlsCertificate};
use pexip_infinity_provider::infinity::{ClientConfig, InfinityClient, API_PREFIX};
use pexip_infinity_provider::{InfinityProvider, ProviderService};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{basic_auth, body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn endpoint(suffix: &str) -> String {
    format!("{}{}", API_PREFIX, suffix)
}

fn client(server: &MockServer) -> InfinityClient {
    assert_ok!(InfinityClient::new(&ClientConfig::new(
        server.uri(),
        "admin",
        "secret"
    )))
}

#[tokio::test]
async fn create_sends_basic_auth_and_parses_location() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(endpoint("dns_server/")))
        .and(basic_auth("admin", "secret"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"address": "1.1.1.1"})))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("Location", endpoint("dns_server/7/").as_str()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let created = assert_ok!(
        client(&server)
            .config()
            .create::<DnsServer>(&DnsServerCreateRequest {
                address: "1.1.1.1".to_string(),
                description: None,
            })
            .await
    );

    assert_eq!(assert_ok!(created.resource_id()), 7);
}

#[tokio::test]
async fn get_decodes_object() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(endpoint("dns_server/7/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "address": "8.8.8.8",
            "description": "google",
            "resource_uri": endpoint("dns_server/7/"),
        })))
        .mount(&server)
        .await;

    let dns: DnsServer = assert_ok!(client(&server).config().get(7).await);
    assert_eq!(dns.address, "8.8.8.8");
    assert_eq!(dns.description, "google");
    assert_eq!(dns.resource_uri, endpoint("dns_server/7/"));
}

#[tokio::test]
async fn missing_object_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(endpoint("dns_server/9/")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = assert_err!(client(&server).config().get::<DnsServer>(9).await);
    assert!(err.is_not_found());
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn lookup_failure_is_recognized() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(endpoint("conference_alias/3/")))
        .respond_with(ResponseTemplate::new(400).set_body_string(
            r#"{"conference": ["Lookup error: conference matching query does not exist."]}"#,
        ))
        .mount(&server)
        .await;

    let err = assert_err!(
        client(&server)
            .config()
            .delete::<pexip_infinity_provider::infinity::types::ConferenceAlias>(3)
            .await
    );
    assert!(err.is_lookup_error());
    assert!(!err.is_not_found());
}

#[tokio::test]
async fn list_sends_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(endpoint("tls_certificate/")))
        .and(query_param("subject_name", "pexip.local"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": {"total_count": 1, "limit": 20, "offset": 0, "next": null, "previous": null},
            "objects": [{
                "id": 4,
                "subject_name": "pexip.local",
                "issuer_name": "pexip.local",
                "serial_no": "0a",
                "resource_uri": endpoint("tls_certificate/4/"),
            }],
        })))
        .mount(&server)
        .await;

    let page = assert_ok!(
        client(&server)
            .config()
            .list::<TlsCertificate>(&[("subject_name", "pexip.local")])
            .await
    );
    assert_eq!(page.meta.total_count, 1);
    assert!(page.objects[0].is_self_signed());
}

#[tokio::test]
async fn configured_provider_talks_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(endpoint("ntp_server/")))
        .and(basic_auth("admin", "secret"))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("Location", endpoint("ntp_server/2/").as_str()),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(endpoint("ntp_server/2/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 2,
            "address": "pool.ntp.org",
            "description": "",
            "key_id": null,
            "resource_uri": endpoint("ntp_server/2/"),
        })))
        .mount(&server)
        .await;

    let provider = InfinityProvider::new();
    let diagnostics = assert_ok!(
        provider
            .configure(json!({
                "address": server.uri(),
                "username": "admin",
                "password": "secret",
            }))
            .await
    );
    assert!(diagnostics.is_empty(), "{:?}", diagnostics);

    let state = assert_ok!(
        provider
            .create("pexip_infinity_ntp_server", json!({"address": "pool.ntp.org"}))
            .await
    );
    assert_eq!(state["resource_id"], 2);
    assert_eq!(state["id"], endpoint("ntp_server/2/"));
}
