//! Quote intake: sinks that accept finished submissions, and the submit flow.
//!
//! DESIGN
//! ======
//! `start_submission` takes the session write lock only long enough to flip
//! the session to `InFlight` and capture its payload. Delivery then runs on a
//! spawned task against the configured `QuoteSink`, and the outcome is
//! written back under the lock with the attempt ticket. A second submit while
//! the first is pending finds the session already `InFlight` and does nothing.

use std::sync::Arc;
use std::time::Duration;

use resend_rs::Resend;
use resend_rs::types::CreateEmailBaseOptions;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::{HttpTimeouts, QuoteSinkConfig};
use crate::configurator::payload::SubmissionPayload;
use crate::configurator::pricing::format_price;
use crate::configurator::{SubmissionStatus, SubmissionTicket};
use crate::state::AppState;

const QUOTE_REQUEST_TEMPLATE: &str = include_str!("../../templates/quote_request.html");
const SINK_TIMEOUTS: HttpTimeouts = HttpTimeouts { request_secs: 20, connect_secs: 5 };

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("quote delivery failed: {0}")]
    Delivery(String),

    #[error("quote endpoint rejected submission with status {status}")]
    Rejected { status: u16 },

    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl crate::error::ErrorCode for SinkError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Delivery(_) => "E_SINK_DELIVERY",
            Self::Rejected { .. } => "E_SINK_REJECTED",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Delivery(_) | Self::Rejected { status: 429 | 500..=599 })
    }
}

// =============================================================================
// SINK TRAIT
// =============================================================================

/// Destination for completed quote requests. Enables mocking in tests.
#[async_trait::async_trait]
pub trait QuoteSink: Send + Sync {
    /// Hand `payload` to the intake backend.
    ///
    /// # Errors
    ///
    /// Returns a [`SinkError`] when the backend cannot be reached or refuses the payload.
    async fn deliver(&self, payload: &SubmissionPayload) -> Result<(), SinkError>;
}

/// Logs the request and accepts it. Default when no intake backend is configured.
pub struct LogSink;

#[async_trait::async_trait]
impl QuoteSink for LogSink {
    async fn deliver(&self, payload: &SubmissionPayload) -> Result<(), SinkError> {
        info!(
            name = %payload.contact_info.name,
            email = %payload.contact_info.email,
            total_price = payload.configuration.total_price,
            modules = payload.configuration.modules.len(),
            "quote request received"
        );
        tracing::debug!(summary = %payload.configuration_summary, "quote summary");
        Ok(())
    }
}

/// POSTs the payload as JSON to an intake endpoint.
pub struct HttpSink {
    http: reqwest::Client,
    url: String,
}

impl HttpSink {
    /// # Errors
    ///
    /// Returns [`SinkError::HttpClientBuild`] if the HTTP client cannot be constructed.
    pub fn new(url: impl Into<String>, timeouts: HttpTimeouts) -> Result<Self, SinkError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| SinkError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, url: url.into() })
    }
}

#[async_trait::async_trait]
impl QuoteSink for HttpSink {
    async fn deliver(&self, payload: &SubmissionPayload) -> Result<(), SinkError> {
        let response = self
            .http
            .post(&self.url)
            .json(payload)
            .send()
            .await
            .map_err(|e| SinkError::Delivery(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SinkError::Rejected { status: status.as_u16() });
        }
        Ok(())
    }
}

/// Emails the summary to the sales inbox through Resend.
pub struct EmailSink {
    api_key: String,
    from: String,
    to: String,
}

impl EmailSink {
    #[must_use]
    pub fn new(api_key: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self { api_key: api_key.into(), from: from.into(), to: to.into() }
    }
}

#[async_trait::async_trait]
impl QuoteSink for EmailSink {
    async fn deliver(&self, payload: &SubmissionPayload) -> Result<(), SinkError> {
        let resend = Resend::new(&self.api_key);
        let to = [self.to.as_str()];
        let subject = format!("Quote request from {}", payload.contact_info.name.trim());
        let html = render_quote_request_template(payload);

        let email = CreateEmailBaseOptions::new(&self.from, to, subject).with_html(&html);
        resend
            .emails
            .send(email)
            .await
            .map_err(|e| SinkError::Delivery(e.to_string()))?;
        Ok(())
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[must_use]
pub fn render_quote_request_template(payload: &SubmissionPayload) -> String {
    QUOTE_REQUEST_TEMPLATE
        .replace("{{NAME}}", &escape_html(payload.contact_info.name.trim()))
        .replace("{{EMAIL}}", &escape_html(payload.contact_info.email.trim()))
        .replace("{{TOTAL}}", &format_price(payload.configuration.total_price))
        .replace("{{SUMMARY}}", &escape_html(&payload.configuration_summary))
}

/// Build the sink selected by configuration.
///
/// # Errors
///
/// Returns [`SinkError::HttpClientBuild`] if the HTTP sink's client cannot be constructed.
pub fn sink_from_config(config: &QuoteSinkConfig) -> Result<Arc<dyn QuoteSink>, SinkError> {
    let sink: Arc<dyn QuoteSink> = match config {
        QuoteSinkConfig::Log => Arc::new(LogSink),
        QuoteSinkConfig::Http { url } => Arc::new(HttpSink::new(url.clone(), SINK_TIMEOUTS)?),
        QuoteSinkConfig::Email { api_key, from, to } => Arc::new(EmailSink::new(api_key, from, to)),
    };
    Ok(sink)
}

// =============================================================================
// SUBMIT FLOW
// =============================================================================

/// Result of a submit request against a live session.
#[derive(Debug)]
pub struct SubmitAttempt {
    /// Whether this call started a new delivery.
    pub started: bool,
    /// Session status right after the call.
    pub status: SubmissionStatus,
    /// Delivery task, present when `started`.
    pub task: Option<tokio::task::JoinHandle<()>>,
}

/// Submit the session's quote request. Returns `None` for an unknown session.
///
/// Not ready (missing contact details), already in flight and already
/// submitted all leave the session untouched and report `started: false`.
pub async fn start_submission(state: &AppState, session_id: Uuid) -> Option<SubmitAttempt> {
    let begun = state
        .with_session(session_id, |session| session.begin_submission().ok_or_else(|| session.submission().clone()))
        .await?;
    let (ticket, payload) = match begun {
        Ok(started) => started,
        Err(status) => return Some(SubmitAttempt { started: false, status, task: None }),
    };

    info!(%session_id, total_price = payload.configuration.total_price, "quote submission started");
    let task = tokio::spawn(deliver_and_record(state.clone(), session_id, ticket, payload));
    Some(SubmitAttempt { started: true, status: SubmissionStatus::InFlight, task: Some(task) })
}

async fn deliver_and_record(state: AppState, session_id: Uuid, ticket: SubmissionTicket, payload: SubmissionPayload) {
    let outcome = state.quote_sink.deliver(&payload).await;
    if let Err(e) = &outcome {
        warn!(%session_id, error = %e, "quote delivery failed");
    }

    let mut sessions = state.sessions.write().await;
    let Some(session) = sessions.get_mut(&session_id).map(|s| &mut s.configurator) else {
        info!(%session_id, "session closed before quote delivery finished");
        return;
    };
    let recorded = session.finish_submission(ticket, outcome.map_err(|e| e.to_string()));
    if recorded {
        info!(%session_id, status = ?session.submission(), "quote submission finished");
    } else {
        info!(%session_id, "discarding stale quote delivery outcome");
    }
}

#[cfg(test)]
#[path = "quote_test.rs"]
mod tests;
