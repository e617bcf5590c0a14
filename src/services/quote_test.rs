use super::*;
use crate::error::ErrorCode;
use crate::state::test_helpers;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

// =============================================================================
// Mock sinks
// =============================================================================

/// Blocks every delivery until released, counting invocations.
#[derive(Default)]
struct GatedSink {
    calls: AtomicUsize,
    gate: Notify,
}

#[async_trait::async_trait]
impl QuoteSink for GatedSink {
    async fn deliver(&self, _payload: &SubmissionPayload) -> Result<(), SinkError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.notified().await;
        Ok(())
    }
}

struct FailingSink;

#[async_trait::async_trait]
impl QuoteSink for FailingSink {
    async fn deliver(&self, _payload: &SubmissionPayload) -> Result<(), SinkError> {
        Err(SinkError::Rejected { status: 503 })
    }
}

async fn status_of(state: &AppState, id: Uuid) -> SubmissionStatus {
    state.sessions.read().await[&id].configurator.submission().clone()
}

// =============================================================================
// start_submission
// =============================================================================

#[tokio::test]
async fn unknown_session_is_none() {
    let state = test_helpers::test_app_state();
    assert!(start_submission(&state, Uuid::new_v4()).await.is_none());
}

#[tokio::test]
async fn incomplete_contact_does_not_start() {
    let state = test_helpers::test_app_state();
    let id = state.open_session().await;
    let attempt = start_submission(&state, id).await.unwrap();
    assert!(!attempt.started);
    assert!(attempt.task.is_none());
    assert_eq!(attempt.status, SubmissionStatus::NotStarted);
}

#[tokio::test]
async fn successful_delivery_records_success() {
    let sink = Arc::new(test_helpers::RecordingSink::default());
    let state = test_helpers::test_app_state_with_sink(sink.clone());
    let id = test_helpers::seed_ready_session(&state).await;

    let attempt = start_submission(&state, id).await.unwrap();
    assert!(attempt.started);
    assert_eq!(attempt.status, SubmissionStatus::InFlight);
    attempt.task.unwrap().await.unwrap();

    assert_eq!(status_of(&state, id).await, SubmissionStatus::Succeeded);
    let delivered = sink.delivered.lock().unwrap();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].contact_info.name, "Ada Lovelace");
    assert_eq!(delivered[0].configuration.total_price, 8999 + 2499);
}

#[tokio::test]
async fn double_submit_invokes_sink_once() {
    let sink = Arc::new(GatedSink::default());
    let state = test_helpers::test_app_state_with_sink(sink.clone());
    let id = test_helpers::seed_ready_session(&state).await;

    let first = start_submission(&state, id).await.unwrap();
    let second = start_submission(&state, id).await.unwrap();
    assert!(first.started);
    assert!(!second.started);
    assert_eq!(second.status, SubmissionStatus::InFlight);

    sink.gate.notify_one();
    first.task.unwrap().await.unwrap();

    assert_eq!(sink.calls.load(Ordering::SeqCst), 1);
    assert_eq!(status_of(&state, id).await, SubmissionStatus::Succeeded);
}

#[tokio::test]
async fn failed_delivery_keeps_fields_and_allows_retry() {
    let state = test_helpers::test_app_state_with_sink(Arc::new(FailingSink));
    let id = test_helpers::seed_ready_session(&state).await;

    start_submission(&state, id).await.unwrap().task.unwrap().await.unwrap();

    let status = status_of(&state, id).await;
    assert!(matches!(status, SubmissionStatus::Failed(ref reason) if reason.contains("503")), "{status:?}");
    {
        let sessions = state.sessions.read().await;
        assert_eq!(sessions[&id].configurator.contact().name, "Ada Lovelace");
        assert_eq!(sessions[&id].configurator.selection().model, Some(1));
    }

    let retry = start_submission(&state, id).await.unwrap();
    assert!(retry.started);
}

#[tokio::test]
async fn reset_during_delivery_discards_outcome() {
    let sink = Arc::new(GatedSink::default());
    let state = test_helpers::test_app_state_with_sink(sink.clone());
    let id = test_helpers::seed_ready_session(&state).await;

    let attempt = start_submission(&state, id).await.unwrap();
    state.with_session(id, |session| session.reset()).await.unwrap();

    sink.gate.notify_one();
    attempt.task.unwrap().await.unwrap();
    assert_eq!(status_of(&state, id).await, SubmissionStatus::NotStarted);
}

#[tokio::test]
async fn closed_session_during_delivery_is_ignored() {
    let sink = Arc::new(GatedSink::default());
    let state = test_helpers::test_app_state_with_sink(sink.clone());
    let id = test_helpers::seed_ready_session(&state).await;

    let attempt = start_submission(&state, id).await.unwrap();
    assert!(state.close_session(id).await);

    sink.gate.notify_one();
    attempt.task.unwrap().await.unwrap();
    assert!(state.sessions.read().await.get(&id).is_none());
}

// =============================================================================
// Sinks
// =============================================================================

#[tokio::test]
async fn log_sink_accepts() {
    let state = test_helpers::test_app_state();
    let id = test_helpers::seed_ready_session(&state).await;
    let payload = state.sessions.read().await[&id].configurator.submission_payload();
    assert!(LogSink.deliver(&payload).await.is_ok());
}

#[test]
fn sink_from_config_builds_each_kind() {
    assert!(sink_from_config(&QuoteSinkConfig::Log).is_ok());
    assert!(sink_from_config(&QuoteSinkConfig::Http { url: "https://crm.test/quotes".into() }).is_ok());
    let email = QuoteSinkConfig::Email {
        api_key: "re_test".into(),
        from: "quotes@hearthline.test".into(),
        to: "sales@hearthline.test".into(),
    };
    assert!(sink_from_config(&email).is_ok());
}

#[test]
fn sink_errors_are_retryable_when_transient() {
    assert!(SinkError::Delivery("timeout".into()).retryable());
    assert!(SinkError::Rejected { status: 502 }.retryable());
    assert!(!SinkError::Rejected { status: 400 }.retryable());
    assert_eq!(SinkError::Rejected { status: 400 }.error_code(), "E_SINK_REJECTED");
}

#[tokio::test]
async fn template_renders_escaped_contact_and_summary() {
    let state = test_helpers::test_app_state();
    let id = test_helpers::seed_ready_session(&state).await;
    {
        state
            .with_session(id, |session| {
                session.update_contact(crate::configurator::ContactField::Name, "Ada <b>Lovelace</b>");
            })
            .await
            .unwrap();
    }
    let payload = state.sessions.read().await[&id].configurator.submission_payload();
    let html = render_quote_request_template(&payload);

    assert!(html.contains("Ada &lt;b&gt;Lovelace&lt;/b&gt;"));
    assert!(html.contains("ada@example.com"));
    assert!(html.contains("$11,498"));
    assert!(html.contains("Kitchen Configuration Summary:"));
    for placeholder in ["{{NAME}}", "{{EMAIL}}", "{{TOTAL}}", "{{SUMMARY}}"] {
        assert!(!html.contains(placeholder));
    }
}
