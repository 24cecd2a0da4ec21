use call_audit::export::{self, ExportError};
use call_audit::report::ReportModel;
use serde_json::json;
use std::time::Duration;

fn report(value: serde_json::Value) -> ReportModel {
    let bytes = serde_json::to_vec(&value).expect("serialize fixture");
    ReportModel::from_json_bytes(&bytes).expect("parse report")
}

#[test]
fn data_export_without_a_report_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = export::export_data(None, dir.path()).unwrap_err();
    assert!(matches!(err, ExportError::NoReport));
}

#[test]
fn data_export_is_named_after_the_call_and_round_trips() {
    let model = report(json!({
        "callId": "call-42",
        "durationSec": 12.5,
        "scores": {"empathy": 0.7},
        "checklist": [{"id": "greeting", "score": 1, "max": 1, "passed": true}]
    }));

    let dir = tempfile::tempdir().expect("tempdir");
    let path = export::export_data(Some(&model), dir.path()).expect("export");

    assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("call-42.json"));

    let bytes = std::fs::read(&path).expect("read export");
    let reparsed = ReportModel::from_json_bytes(&bytes).expect("reparse export");
    assert_eq!(reparsed, model);
}

#[test]
fn data_export_falls_back_to_fixed_name_without_call_id() {
    let model = report(json!({}));
    let dir = tempfile::tempdir().expect("tempdir");
    let path = export::export_data(Some(&model), dir.path()).expect("export");
    assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("report.json"));
}

#[test]
fn document_export_requires_a_document() {
    let dir = tempfile::tempdir().expect("tempdir");

    let err = export::write_document(None, dir.path()).unwrap_err();
    assert!(matches!(err, ExportError::NoReport));

    let without_html = report(json!({"callId": "call-42"}));
    let err = export::write_document(Some(&without_html), dir.path()).unwrap_err();
    assert!(matches!(err, ExportError::NoDocument));
}

#[test]
fn document_export_writes_report_html_verbatim() {
    let html = "<html><body>Call report — call-42</body></html>";
    let model = report(json!({"callId": "call-42", "reportHtml": html}));

    let dir = tempfile::tempdir().expect("tempdir");
    let path = export::write_document(Some(&model), dir.path()).expect("export");

    assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("call-42.html"));
    assert_eq!(std::fs::read_to_string(&path).expect("read export"), html);
}

#[tokio::test]
async fn open_document_before_any_analysis_fails_without_side_effects() {
    let err = export::open_document(None, Duration::from_millis(10))
        .await
        .unwrap_err();
    assert!(matches!(err, ExportError::NoReport));

    let without_html = report(json!({"callId": "call-42"}));
    let err = export::open_document(Some(&without_html), Duration::from_millis(10))
        .await
        .unwrap_err();
    assert!(matches!(err, ExportError::NoDocument));
}

#[tokio::test]
async fn open_document_releases_the_temp_file_after_the_delay() {
    let model = report(json!({"callId": "call-42", "reportHtml": "<html></html>"}));

    let path = export::open_document(Some(&model), Duration::from_millis(50))
        .await
        .expect("open");
    assert!(path.exists(), "document staged for the viewer");

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(!path.exists(), "temp document released after the delay");
}
