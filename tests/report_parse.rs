use call_audit::report::ReportModel;
use serde_json::json;

fn parse(value: serde_json::Value) -> ReportModel {
    let bytes = serde_json::to_vec(&value).expect("serialize fixture");
    ReportModel::from_json_bytes(&bytes).expect("parse report")
}

#[test]
fn parses_service_shaped_payload() {
    // The original server nests checklist/highlights under `scores`,
    // sends the transcript as {text, lines} plus a top-level
    // `segments` array, and keeps `partial` inside `llmRaw`.
    let report = parse(json!({
        "callId": "call-42",
        "consent": true,
        "language": "ru",
        "durationSec": 183.4,
        "scores": {
            "empathy": 0.7,
            "compliance": 0.5,
            "structure": 0.9,
            "checklist": [
                {"id": "greeting", "score": 1, "max": 1, "passed": true,
                 "reason": "opened politely", "evidence": "добрый день", "ts": "0.00-4.20"}
            ],
            "highlights": [
                {"type": "objection", "quote": "это дорого", "ts": 41.5}
            ]
        },
        "operational": {
            "silencePct": 12.5,
            "overlapPct": 3.0,
            "speechRateWpm": {"manager": 132.0, "client": 104.0},
            "interruptions": {"byManager": 2, "byClient": 1}
        },
        "segments": [
            {"start": 0.0, "end": 4.2, "speaker": "manager", "text": "добрый день"}
        ],
        "transcript": {
            "text": "[0.00-4.20] manager: добрый день",
            "lines": [
                {"start": 0.0, "end": 4.2, "speaker": "manager", "text": "добрый день"}
            ]
        },
        "llmRaw": {"partial": true, "error": "judgment truncated"},
        "artifacts": {
            "json": {"path": "artifacts/call-42/report.json", "url": "/artifacts/call-42/report.json"}
        }
    }));

    assert_eq!(report.call_id, "call-42");
    assert_eq!(report.language.as_deref(), Some("ru"));
    assert!(report.consent);
    assert!(report.partial, "llmRaw.partial must surface");
    assert_eq!(report.scores.empathy, 0.7);
    assert_eq!(report.checklist.len(), 1);
    assert_eq!(report.checklist[0].id, "greeting");
    assert_eq!(report.checklist[0].ts.as_deref(), Some("0.00-4.20"));
    assert_eq!(report.highlights.len(), 1);
    assert_eq!(report.highlights[0].ts.as_deref(), Some("41.50"));
    assert_eq!(report.transcript.len(), 1);
    assert_eq!(report.transcript[0].speaker, "manager");
    assert_eq!(report.operational.interruptions.by_manager, 2);
    assert_eq!(report.artifacts.len(), 1);
    assert!(report.artifacts["json"].url.is_some());
}

#[test]
fn empty_object_parses_to_zero_shapes() {
    let report = parse(json!({}));
    assert_eq!(report.call_id, "");
    assert_eq!(report.language, None);
    assert_eq!(report.duration_sec, 0.0);
    assert!(!report.consent);
    assert!(!report.partial);
    assert_eq!(report.scores.empathy, 0.0);
    assert!(report.checklist.is_empty());
    assert!(report.highlights.is_empty());
    assert!(report.transcript.is_empty());
    assert!(report.artifacts.is_empty());
    assert_eq!(report.report_html, None);
}

#[test]
fn top_level_checklist_wins_over_nested() {
    let report = parse(json!({
        "checklist": [{"id": "top"}],
        "scores": {"checklist": [{"id": "nested"}]}
    }));
    assert_eq!(report.checklist.len(), 1);
    assert_eq!(report.checklist[0].id, "top");
}

#[test]
fn transcript_accepts_bare_array() {
    let report = parse(json!({
        "transcript": [
            {"speaker": "client", "start": 1.0, "end": 2.5, "text": "алло"}
        ]
    }));
    assert_eq!(report.transcript.len(), 1);
    assert_eq!(report.transcript[0].end, 2.5);
}

#[test]
fn negative_duration_is_floored() {
    let report = parse(json!({"durationSec": -3.0}));
    assert_eq!(report.duration_sec, 0.0);
}

#[test]
fn out_of_range_scores_are_kept_not_rejected() {
    let report = parse(json!({"scores": {"empathy": 1.5, "compliance": -0.2}}));
    assert_eq!(report.scores.empathy, 1.5);
    assert_eq!(report.scores.compliance, -0.2);
}

#[test]
fn malformed_json_fails() {
    assert!(ReportModel::from_json_bytes(b"not json").is_err());
}

#[test]
fn export_form_round_trips() {
    let original = parse(json!({
        "callId": "call-7",
        "language": "en",
        "durationSec": 60.5,
        "consent": true,
        "partial": true,
        "scores": {"empathy": 0.1, "compliance": 0.2, "structure": 0.3},
        "checklist": [{"id": "a", "score": 2, "max": 3, "passed": false, "reason": "r"}],
        "highlights": [{"type": "risk", "quote": "q", "ts": "1.00"}],
        "transcript": [{"speaker": "s", "start": 0.0, "end": 1.0, "text": "t"}],
        "reportHtml": "<html></html>"
    }));

    let json = original.to_pretty_json().expect("serialize");
    let reparsed = ReportModel::from_json_bytes(json.as_bytes()).expect("reparse");
    assert_eq!(reparsed, original);
}
