//! Integration tests for the GraphQL invite store against a mock backend.

use std::time::Duration;

use secrecy::SecretString;
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use invite_quiz::config::BackendConfig;
use invite_quiz::error::BackendError;
use invite_quiz::store::{
    GraphqlInviteStore, InviteRecord, InviteStore, QuestionType, ResponseRecord,
};

const API_KEY: &str = "test-api-key";

fn store_for(server: &MockServer) -> GraphqlInviteStore {
    GraphqlInviteStore::new(&BackendConfig {
        endpoint: format!("{}/graphql", server.uri()),
        api_key: SecretString::from(API_KEY),
        timeout: Duration::from_secs(5),
    })
    .expect("client builds")
}

fn invite_with_responses() -> (InviteRecord, [ResponseRecord; 2]) {
    let invite = InviteRecord::new("42", "carol#0042", "QWERTY", 3);
    let responses = [
        ResponseRecord::new(&invite.id, QuestionType::Initial, "I surfed a \"big\" wave"),
        ResponseRecord::new(&invite.id, QuestionType::Challenge, "Plant a tree today"),
    ];
    (invite, responses)
}

async fn request_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}

#[tokio::test]
async fn find_returns_existing_invite() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("X-API-KEY", API_KEY))
        .and(body_partial_json(json!({ "variables": { "userId": "42" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "queryDiscordInvite": [
                    { "id": "discord-invite-1", "code": "ABCDEF", "isUsed": true }
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let found = store_for(&server)
        .find_invite_for_user("42")
        .await
        .unwrap()
        .expect("invite found");
    assert_eq!(found.code, "ABCDEF");
    assert!(found.is_used);
}

#[tokio::test]
async fn find_returns_none_for_empty_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "queryDiscordInvite": [] }
        })))
        .mount(&server)
        .await;

    assert!(store_for(&server).find_invite_for_user("42").await.unwrap().is_none());
}

#[tokio::test]
async fn user_id_travels_as_variable_not_query_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "queryDiscordInvite": [] }
        })))
        .mount(&server)
        .await;

    let hostile = r#"42"}}) { id } mutation { deleteDiscordInvite"#;
    store_for(&server).find_invite_for_user(hostile).await.unwrap();

    let bodies = request_bodies(&server).await;
    assert_eq!(bodies[0]["variables"]["userId"], hostile);
    assert!(!bodies[0]["query"].as_str().unwrap().contains("deleteDiscordInvite"));
}

#[tokio::test]
async fn graphql_errors_are_backend_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{ "message": "unauthorized" }]
        })))
        .mount(&server)
        .await;

    match store_for(&server).find_invite_for_user("42").await {
        Err(BackendError::Graphql { operation, message }) => {
            assert_eq!(operation, "FindInvite");
            assert_eq!(message, "unauthorized");
        }
        other => panic!("expected GraphQL error, got {other:?}"),
    }
}

#[tokio::test]
async fn http_failure_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    match store_for(&server).find_invite_for_user("42").await {
        Err(BackendError::Status { status, body }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn record_writes_header_then_each_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("X-API-KEY", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
        .expect(3)
        .mount(&server)
        .await;

    let (invite, responses) = invite_with_responses();
    store_for(&server)
        .record_invite(&invite, &responses)
        .await
        .unwrap();

    let bodies = request_bodies(&server).await;
    assert_eq!(bodies.len(), 3);

    let header_vars = &bodies[0]["variables"]["invite"];
    assert_eq!(header_vars["code"], "QWERTY");
    assert_eq!(header_vars["discordUserId"], "42");
    assert_eq!(header_vars["discordUsername"], "carol#0042");
    assert_eq!(header_vars["isUsed"], false);
    assert_eq!(header_vars["quizScore"], 3);

    let first = &bodies[1]["variables"]["response"];
    assert_eq!(first["questionType"], "initial");
    assert_eq!(first["response"], "I surfed a \"big\" wave");
    assert_eq!(first["discordInvite"]["id"], invite.id.as_str());
    assert_eq!(bodies[2]["variables"]["response"]["questionType"], "challenge");
}

#[tokio::test]
async fn response_failure_leaves_header_in_place() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "variables": { "invite": { "discordUserId": "42" } } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(
            json!({ "variables": { "response": { "questionType": "initial" } } }),
        ))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(
            json!({ "variables": { "response": { "questionType": "challenge" } } }),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
        .expect(0)
        .mount(&server)
        .await;

    let (invite, responses) = invite_with_responses();
    let result = store_for(&server).record_invite(&invite, &responses).await;

    match result {
        Err(BackendError::WriteFailed { record, id, .. }) => {
            assert_eq!(record, "initial response");
            assert_eq!(id, responses[0].id);
        }
        other => panic!("expected write failure, got {other:?}"),
    }
    assert_eq!(request_bodies(&server).await.len(), 2);
}
