use call_audit::config::Config;
use call_audit::probe::{self, DiagnosticSink};
use call_audit::service::HttpAnalyzeService;
use std::cell::RefCell;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct RecordingSink {
    events: RefCell<Vec<(String, String)>>,
}

impl DiagnosticSink for RecordingSink {
    fn record(&self, event: &str, detail: &str) {
        self.events
            .borrow_mut()
            .push((event.to_string(), detail.to_string()));
    }
}

fn service_for(base_url: String) -> HttpAnalyzeService {
    let mut cfg = Config::default();
    cfg.service.base_url = base_url;
    HttpAnalyzeService::new(&cfg).expect("build service")
}

#[tokio::test]
async fn healthy_service_is_recorded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let sink = RecordingSink::default();
    probe::ping(&service_for(server.uri()), &sink).await;

    let events = sink.events.borrow();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].0, "health_ok");
}

#[tokio::test]
async fn failing_status_is_diagnostic_only() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let sink = RecordingSink::default();
    // Must not panic or error; the outcome goes to the sink alone.
    probe::ping(&service_for(server.uri()), &sink).await;

    let events = sink.events.borrow();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].0, "health_failed");
    assert!(events[0].1.contains("503"));
}

#[tokio::test]
async fn unreachable_service_is_diagnostic_only() {
    let sink = RecordingSink::default();
    probe::ping(&service_for("http://127.0.0.1:9".to_string()), &sink).await;

    let events = sink.events.borrow();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].0, "health_failed");
}

#[tokio::test]
async fn doctor_reports_both_outcomes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let diag = probe::doctor(&service_for(server.uri())).await;
    assert!(diag.ok);
    assert_eq!(diag.error, None);
    assert!(diag.endpoint.ends_with("/api/health"));

    let down = probe::doctor(&service_for("http://127.0.0.1:9".to_string())).await;
    assert!(!down.ok);
    assert!(down.error.is_some());
}
