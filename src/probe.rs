use crate::service::{AnalyzeService, HttpAnalyzeService, ServiceError};
use serde::{Deserialize, Serialize};

/// Where probe outcomes go. Production uses [`TracingSink`]; tests
/// substitute a recording sink to assert on what was emitted.
pub trait DiagnosticSink {
    fn record(&self, event: &str, detail: &str);
}

pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, event: &str, detail: &str) {
        if detail.is_empty() {
            tracing::debug!("probe {event}");
        } else {
            tracing::warn!("probe {event}: {detail}");
        }
    }
}

/// One best-effort availability check. Never fails and never blocks
/// anything else: the outcome goes to the sink and nowhere near UI
/// state.
pub async fn ping<S: AnalyzeService + ?Sized, D: DiagnosticSink + ?Sized>(
    service: &S,
    sink: &D,
) {
    match service.health().await {
        Ok(()) => sink.record("health_ok", ""),
        Err(err) => sink.record("health_failed", &err.to_string()),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceDiag {
    pub endpoint: String,
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Foreground variant for the `doctor` subcommand: same check, but the
/// outcome is returned for display instead of sunk.
pub async fn doctor(service: &HttpAnalyzeService) -> ServiceDiag {
    let endpoint = service.health_url().to_string();
    match service.health().await {
        Ok(()) => ServiceDiag {
            endpoint,
            ok: true,
            error: None,
        },
        Err(err) => ServiceDiag {
            endpoint,
            ok: false,
            error: Some(describe(&err)),
        },
    }
}

fn describe(err: &ServiceError) -> String {
    match err {
        ServiceError::Status { status, .. } => format!("unexpected status {status}"),
        other => other.to_string(),
    }
}
