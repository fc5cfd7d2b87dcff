//! Audit trail for release API exchanges
//!
//! The client reports exactly one [`AuditEvent`] per attempted exchange to
//! its [`Auditor`]: `RequestCompleted` whenever a response was received
//! (whatever its status or body), `RequestFailed` otherwise.

use crate::github::failure::ExchangeError;
use crate::github::types::Headers;
use reqwest::Url;
use std::fmt::Write;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub enum AuditEvent {
    RequestCompleted {
        uri: Url,
        status: u16,
        headers: Headers,
        body: String,
    },
    RequestFailed {
        uri: Url,
        cause: Arc<ExchangeError>,
    },
}

impl AuditEvent {
    pub fn uri(&self) -> &Url {
        match self {
            AuditEvent::RequestCompleted { uri, .. } | AuditEvent::RequestFailed { uri, .. } => uri,
        }
    }
}

/// Receives audit events from the client
pub trait Auditor: Send + Sync {
    fn event(&self, event: AuditEvent);
}

impl<F> Auditor for F
where
    F: Fn(AuditEvent) + Send + Sync,
{
    fn event(&self, event: AuditEvent) {
        self(event)
    }
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAuditor;

impl Auditor for NoopAuditor {
    fn event(&self, _event: AuditEvent) {}
}

/// Writes every event to the `tracing` debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingAuditor;

impl Auditor for LoggingAuditor {
    fn event(&self, event: AuditEvent) {
        match event {
            AuditEvent::RequestCompleted {
                uri,
                status,
                headers,
                body,
            } => {
                tracing::debug!(
                    target: "releasekit::audit",
                    "{}",
                    render_completed(&uri, status, &headers, &body)
                );
            }
            AuditEvent::RequestFailed { uri, cause } => {
                tracing::debug!(
                    target: "releasekit::audit",
                    error = %cause,
                    "Failed request to {}",
                    uri
                );
            }
        }
    }
}

fn render_completed(uri: &Url, status: u16, headers: &Headers, body: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Completed request to {}", uri);
    let _ = writeln!(out, "response status code: {}", status);
    let _ = writeln!(out, "response headers:");
    for (name, value) in headers {
        let _ = writeln!(out, "\t{}: {}", name, value);
    }
    let _ = writeln!(out, "response body:");
    out.push_str(body);
    out
}

/// Keeps every event in memory, in arrival order
#[derive(Debug, Default, Clone)]
pub struct RecordingAuditor {
    events: Arc<Mutex<Vec<AuditEvent>>>,
}

impl RecordingAuditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AuditEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl Auditor for RecordingAuditor {
    fn event(&self, event: AuditEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
