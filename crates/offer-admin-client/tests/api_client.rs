//! HTTP-level tests for the backend client

#![allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic,
    clippy::missing_panics_doc
)]

mod common;

use common::{ADMIN_TOKEN, admin_client, init_test_logging, offers_body, users_body};
use offer_admin_client::{AdminBackend, ApiClient, ClientError, Mutation};
use offer_admin_core::OfferStatus;
use offer_admin_core::types::find_admin;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use wiremock::matchers::{bearer_token, body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_offers_are_fetched_without_credentials() {
    init_test_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/offers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(offers_body()))
        .expect(1)
        .mount(&server)
        .await;

    let offers = admin_client(&server).get_offers().await.unwrap();

    let ids: Vec<u64> = offers.iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(offers[0].status, OfferStatus::Accepted);
    assert_eq!(offers[1].status, OfferStatus::Inaccepted);
    assert_eq!(offers[1].price.to_string(), "19.99");
    assert!(offers[2].image.is_none());

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_users_require_bearer_token() {
    init_test_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(bearer_token(ADMIN_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(users_body()))
        .expect(1)
        .mount(&server)
        .await;

    let users = admin_client(&server).get_users().await.unwrap();

    assert_eq!(users.len(), 3);
    assert_eq!(
        users[0].extra.get("email").and_then(|v| v.as_str()),
        Some("u@example.com")
    );
    let admin = find_admin(&users).unwrap();
    assert_eq!(admin.id, 11);
    assert_eq!(admin.avatar.as_deref(), Some("first-admin.png"));
}

#[tokio::test]
async fn test_users_without_token_never_reach_backend() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(users_body()))
        .expect(0)
        .mount(&server)
        .await;

    let err = ApiClient::new(server.uri()).get_users().await.unwrap_err();
    assert!(matches!(err, ClientError::MissingToken));
}

#[rstest]
#[case(Mutation::Delete, "DELETE", "/api/deleteOffer/7", false)]
#[case(Mutation::Accept, "PUT", "/api/offers/accept/7", true)]
#[case(Mutation::Reject, "PUT", "/api/offers/reject/7", true)]
#[case(Mutation::Archive, "DELETE", "/api/offers/archive/7", false)]
#[tokio::test]
async fn test_mutation_endpoints(
    #[case] mutation: Mutation,
    #[case] http_method: &str,
    #[case] endpoint: &str,
    #[case] empty_json_body: bool,
) {
    init_test_logging();
    let server = MockServer::start().await;
    let mut expected = Mock::given(method(http_method))
        .and(path(endpoint))
        .and(bearer_token(ADMIN_TOKEN));
    if empty_json_body {
        expected = expected.and(body_json(json!({})));
    }
    expected
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let client = admin_client(&server);
    let result = match mutation {
        Mutation::Delete => client.delete_offer(7).await,
        Mutation::Accept => client.accept_offer(7).await,
        Mutation::Reject => client.reject_offer(7).await,
        Mutation::Archive => client.archive_offer(7).await,
    };

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_error_status_keeps_body_and_code() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/offers/accept/2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database down"))
        .mount(&server)
        .await;

    let err = admin_client(&server).accept_offer(2).await.unwrap_err();

    assert_eq!(err.to_string(), "Request failed with status code 500");
    match err {
        ClientError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "database down");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_rate_limit_status_is_detected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/offers"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = admin_client(&server).get_offers().await.unwrap_err();
    assert!(err.is_rate_limited());
}

#[tokio::test]
async fn test_malformed_offers_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/offers"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"offers": "nope"}"#))
        .mount(&server)
        .await;

    let err = admin_client(&server).get_offers().await.unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)));
}
