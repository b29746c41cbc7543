//! End-to-end generation through the relay service against a mock HTTP endpoint

use super::test_utils::{relay_config, structured_reply};
use agentflow::{ErrorKind, Field, GenerationOrchestrator, OperationStatus, OutputState};
use httpmock::prelude::*;
use serde_json::json;
use std::time::Duration;

const DESCRIPTION: &str = "3BR apartment in Tel Aviv, sea view, renovated kitchen";

fn orchestrator(server: &MockServer) -> GenerationOrchestrator {
    GenerationOrchestrator::from_config(&relay_config(server.url("/chat"))).unwrap()
}

#[tokio::test]
async fn test_generate_all_fills_every_field() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/chat")
                .body_contains("3BR apartment in Tel Aviv")
                .body_contains("\"role\":\"system\"");
            then.status(200).json_body(structured_reply(&[
                ("listing", "Bright 3-bedroom with sweeping sea views."),
                ("caption", "Sea views and a brand new kitchen #TelAviv"),
                ("subject", "Just listed: sea-view 3BR in Tel Aviv"),
            ]));
        })
        .await;
    let orchestrator = orchestrator(&server);

    let report = orchestrator.generate_all(DESCRIPTION).await;

    mock.assert_async().await;
    assert_eq!(report.status, OperationStatus::Applied);
    assert_eq!(
        report.snapshot.outputs,
        OutputState::new(
            "Bright 3-bedroom with sweeping sea views.",
            "Sea views and a brand new kitchen #TelAviv",
            "Just listed: sea-view 3BR in Tel Aviv",
        )
    );
    assert_eq!(report.snapshot.error, None);
    assert!(!report.snapshot.loading);
}

#[tokio::test]
async fn test_regenerate_caption_keeps_other_fields() {
    let server = MockServer::start_async().await;
    let mut first = server
        .mock_async(|when, then| {
            when.method(POST).path("/chat");
            then.status(200).json_body(structured_reply(&[
                ("listing", "L1"),
                ("caption", "C1"),
                ("subject", "S1"),
            ]));
        })
        .await;
    let orchestrator = orchestrator(&server);
    orchestrator.generate_all(DESCRIPTION).await;
    first.delete_async().await;

    server
        .mock_async(|when, then| {
            when.method(POST).path("/chat");
            then.status(200).json_body(structured_reply(&[
                ("listing", "L2"),
                ("caption", "C2"),
                ("subject", "S2"),
            ]));
        })
        .await;

    let report = orchestrator
        .regenerate_field(DESCRIPTION, Field::Caption)
        .await;

    assert_eq!(report.status, OperationStatus::Applied);
    assert_eq!(report.snapshot.outputs, OutputState::new("L1", "C2", "S1"));
}

#[tokio::test]
async fn test_quota_error_is_reported_and_outputs_kept() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/chat");
            then.status(429)
                .json_body(json!({ "error": { "message": "quota exceeded" } }));
        })
        .await;
    let orchestrator = orchestrator(&server);
    orchestrator.edit_field(Field::Listing, "Hand written listing");

    let report = orchestrator.generate_all(DESCRIPTION).await;

    assert_eq!(report.status, OperationStatus::Failed(ErrorKind::Service));
    assert_eq!(report.snapshot.error.as_deref(), Some("AI error: quota exceeded"));
    assert_eq!(
        report.snapshot.outputs.get(Field::Listing),
        "Hand written listing"
    );
}

#[tokio::test]
async fn test_freeform_content_is_malformed() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/chat");
            then.status(200)
                .json_body(json!({ "content": "Here is your listing: a lovely home." }));
        })
        .await;
    let orchestrator = orchestrator(&server);

    let report = orchestrator.generate_all(DESCRIPTION).await;

    assert_eq!(
        report.status,
        OperationStatus::Failed(ErrorKind::MalformedResponse)
    );
    assert!(report.snapshot.outputs.is_empty());
    assert!(report
        .snapshot
        .error
        .as_deref()
        .unwrap()
        .starts_with("Malformed AI response"));
}

#[tokio::test]
async fn test_reply_without_content_or_error_is_unexpected() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/chat");
            then.status(200).json_body(json!({ "status": "ok" }));
        })
        .await;
    let orchestrator = orchestrator(&server);

    let report = orchestrator.regenerate_field(DESCRIPTION, Field::Subject).await;

    assert_eq!(
        report.status,
        OperationStatus::Failed(ErrorKind::UnexpectedShape)
    );
    assert!(report.snapshot.error.as_deref().unwrap().contains("status"));
}

#[tokio::test]
async fn test_empty_description_never_reaches_the_service() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/chat");
            then.status(200).json_body(structured_reply(&[("listing", "L")]));
        })
        .await;
    let orchestrator = orchestrator(&server);

    let full = orchestrator.generate_all("").await;
    let targeted = orchestrator.regenerate_field(" \n\t ", Field::Listing).await;

    assert_eq!(full.status, OperationStatus::SkippedEmptyInput);
    assert_eq!(targeted.status, OperationStatus::SkippedEmptyInput);
    assert!(targeted.snapshot.outputs.is_empty());
    assert_eq!(targeted.snapshot.error, None);
    mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_second_request_while_loading_is_rejected() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/chat");
            then.status(200)
                .delay(Duration::from_millis(500))
                .json_body(structured_reply(&[
                    ("listing", "L"),
                    ("caption", "C"),
                    ("subject", "S"),
                ]));
        })
        .await;
    let orchestrator = orchestrator(&server);

    let (first, second) = tokio::join!(orchestrator.generate_all(DESCRIPTION), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        let loading = orchestrator.is_loading();
        let report = orchestrator
            .regenerate_field(DESCRIPTION, Field::Caption)
            .await;
        (loading, report)
    });
    let (was_loading, rejected) = second;

    assert!(was_loading);
    assert_eq!(rejected.status, OperationStatus::RejectedBusy);
    assert_eq!(first.status, OperationStatus::Applied);
    assert_eq!(first.snapshot.outputs, OutputState::new("L", "C", "S"));
    assert!(!orchestrator.is_loading());
    mock.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_unreachable_backend_is_a_network_failure() {
    let orchestrator =
        GenerationOrchestrator::from_config(&relay_config("http://127.0.0.1:9/chat".to_string()))
            .unwrap();

    let report = orchestrator.generate_all(DESCRIPTION).await;

    assert_eq!(report.status, OperationStatus::Failed(ErrorKind::Network));
    assert!(report
        .snapshot
        .error
        .as_deref()
        .unwrap()
        .starts_with("Failed to connect to backend"));
    assert!(!orchestrator.is_loading());
}
