//! Notification Service Tests
//!
//! Tests for:
//! - Request bodies with scalar and array areas
//! - Validation rejections before any area is processed
//! - Response envelope for successful and failed batches
//! - History, per-sender history and statistics

use std::sync::Arc;

use pdn_platform::{
    AlertTemplate, AuditLogger, DispatchBody, DispatchConfig, DispatchEngine, InMemoryAuditStore,
    InMemoryCustomerDirectory, NotificationService, PlatformError, RecordingEmailTransport, SenderIdentity,
    ValidationPolicy,
};

struct Fixture {
    service: NotificationService,
    transport: Arc<RecordingEmailTransport>,
    store: Arc<InMemoryAuditStore>,
}

fn fixture() -> Fixture {
    let directory = InMemoryCustomerDirectory::new();
    directory.register("Meena", "meena@example.com", "chickpete").unwrap();
    directory.register("Irfan", "irfan@example.com", "chickpete").unwrap();
    directory.register("Lakshmi", "lakshmi@example.com", "balepete").unwrap();

    let transport = Arc::new(RecordingEmailTransport::new());
    let store = Arc::new(
        InMemoryAuditStore::new()
            .with_sender_name(1, "Ravi Kumar")
            .with_sender_name(2, "Asha Rao"),
    );
    let audit = AuditLogger::new(store.clone());

    let engine = DispatchEngine::new(
        Arc::new(directory),
        transport.clone(),
        audit.clone(),
        AlertTemplate::default(),
        DispatchConfig::default(),
    );
    let service = NotificationService::new(engine, audit, transport.clone(), ValidationPolicy::default());

    Fixture {
        service,
        transport,
        store,
    }
}

fn body(json: &str) -> DispatchBody {
    serde_json::from_str(json).unwrap()
}

fn ravi() -> SenderIdentity {
    SenderIdentity::new(1, "Ravi Kumar")
}

#[tokio::test]
async fn test_scalar_area_body() {
    let f = fixture();

    let response = f
        .service
        .send(body(r#"{"areas": "chickpete", "message": "Transformer fault, restoring by 4 PM"}"#), &ravi())
        .await
        .unwrap();

    assert!(response.success);
    assert_eq!(response.message, "Notification sent successfully to 2 recipients across 1 area(s)");
    assert_eq!(response.data.areas, vec!["chickpete"]);
    assert_eq!(f.transport.sent_count(), 2);
}

#[tokio::test]
async fn test_multi_area_body_with_duplicates() {
    let f = fixture();

    let response = f
        .service
        .send(
            body(r#"{"areas": ["chickpete", " balepete ", "chickpete", "cubbonpete"], "message": "Scheduled outage 10 AM to 1 PM"}"#),
            &ravi(),
        )
        .await
        .unwrap();

    assert!(response.success);
    assert_eq!(response.data.areas, vec!["chickpete", "balepete", "cubbonpete"]);
    assert_eq!(response.data.total_sent, 3);
    assert_eq!(response.data.results.len(), 3);
    assert_eq!(f.store.len(), 2);
    assert_eq!(
        response.message,
        "Notification sent successfully to 3 recipients across 3 area(s)"
    );
}

#[tokio::test]
async fn test_validation_rejects_before_sending() {
    let f = fixture();

    let err = f
        .service
        .send(body(r#"{"areas": ["c"], "message": "short"}"#), &ravi())
        .await
        .unwrap_err();

    assert!(matches!(err, PlatformError::Validation { .. }));
    assert!(err.is_client_error());
    assert_eq!(f.transport.sent_count(), 0);
    assert!(f.store.is_empty());
}

#[tokio::test]
async fn test_empty_area_list_rejected() {
    let f = fixture();

    let err = f
        .service
        .send(body(r#"{"areas": [], "message": "Scheduled outage 10 AM to 1 PM"}"#), &ravi())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Validation error: At least one area must be specified");
}

#[tokio::test]
async fn test_whitespace_area_rejected() {
    let f = fixture();

    let err = f
        .service
        .send(
            body(r#"{"areas": ["   ", "chickpete"], "message": "Scheduled outage 10 AM to 1 PM"}"#),
            &ravi(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, PlatformError::Validation { .. }));
    assert!(err.to_string().contains("Area '' must be between 2 and 100 characters"));
    assert_eq!(f.transport.sent_count(), 0);
    assert!(f.store.is_empty());
}

#[tokio::test]
async fn test_batch_reaching_no_area_is_server_error() {
    let f = fixture();

    let response = f
        .service
        .send(body(r#"{"areas": ["cubbonpete"], "message": "Scheduled outage 10 AM to 1 PM"}"#), &ravi())
        .await
        .unwrap();

    assert!(!response.success);
    assert!(response.is_server_error());
    assert_eq!(response.message, "Failed to send notifications to any areas");
}

#[tokio::test]
async fn test_history_and_stats() {
    let f = fixture();
    let asha = SenderIdentity::new(2, "Asha Rao");

    f.service
        .send(body(r#"{"areas": "chickpete", "message": "Cable repair in progress today"}"#), &ravi())
        .await
        .unwrap();
    f.service
        .send(body(r#"{"areas": ["chickpete", "balepete"], "message": "Supply restored in all areas"}"#), &asha)
        .await
        .unwrap();

    let history = f.service.history().await.unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].sent_by_name.as_deref(), Some("Asha Rao"));

    let mine = f.service.history_for(1).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].area, "chickpete");
    assert_eq!(mine[0].recipients_count, 2);

    let stats = f.service.stats().await.unwrap();
    assert_eq!(stats.total_notifications, 3);
    assert_eq!(stats.total_recipients, 5);
    assert_eq!(stats.unique_areas, 2);
}

#[tokio::test]
async fn test_email_service_check() {
    let f = fixture();
    assert!(f.service.test_email_service().await.unwrap());
}
