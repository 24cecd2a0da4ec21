use crate::service::types::{RawReport, RawTranscript, RawTs};
use serde::Serialize;
use std::collections::BTreeMap;

/// The structured result of analyzing one call, as the client consumes
/// it. Built only from a successful analyze response (or a previously
/// exported copy of one); immutable once built. The session holds at
/// most one of these at a time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportModel {
    pub call_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub duration_sec: f64,
    pub consent: bool,
    pub partial: bool,
    pub scores: Scores,
    pub operational: Operational,
    pub checklist: Vec<ChecklistItem>,
    pub highlights: Vec<Highlight>,
    pub transcript: Vec<Segment>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub artifacts: BTreeMap<String, ArtifactRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_html: Option<String>,
}

/// Semantically normalized to [0,1]; out-of-range values are kept here
/// and clamped at render time, not rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scores {
    pub empathy: f64,
    pub compliance: f64,
    pub structure: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Operational {
    pub silence_pct: f64,
    pub overlap_pct: f64,
    pub speech_rate_wpm: SpeechRate,
    pub interruptions: Interruptions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpeechRate {
    pub manager: f64,
    pub client: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Interruptions {
    pub by_manager: u32,
    pub by_client: u32,
}

/// One scored compliance/behavior criterion. `score <= max` is
/// expected but not enforced; both are display-only here.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChecklistItem {
    pub id: String,
    pub score: f64,
    pub max: f64,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ts: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Highlight {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ts: Option<String>,
}

/// One speaker turn. `start <= end` is expected from the service and
/// rendered as given.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Segment {
    pub speaker: String,
    pub start: f64,
    pub end: f64,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArtifactRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ReportModel {
    /// Decodes a response body (or a previously exported report) into
    /// the canonical model. Tolerates the wire variants the service is
    /// known to emit; only malformed JSON fails.
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let raw: RawReport = serde_json::from_slice(bytes)?;
        Ok(Self::from_raw(raw))
    }

    pub fn from_raw(raw: RawReport) -> Self {
        let raw_scores = raw.scores.unwrap_or_default();

        // Top-level checklist/highlights win over the nested copies the
        // original server keeps inside `scores`.
        let checklist = raw
            .checklist
            .or(raw_scores.checklist)
            .unwrap_or_default()
            .into_iter()
            .map(|item| ChecklistItem {
                id: item.id.unwrap_or_default(),
                score: item.score.unwrap_or(0.0),
                max: item.max.unwrap_or(0.0),
                passed: item.passed.unwrap_or(false),
                reason: non_empty(item.reason),
                evidence: non_empty(item.evidence),
                ts: item.ts.map(RawTs::into_display),
            })
            .collect();

        let highlights = raw
            .highlights
            .or(raw_scores.highlights)
            .unwrap_or_default()
            .into_iter()
            .map(|h| Highlight {
                kind: non_empty(h.kind),
                quote: non_empty(h.quote),
                ts: h.ts.map(RawTs::into_display),
            })
            .collect();

        let segments = match raw.transcript {
            Some(RawTranscript::Lines(lines)) => Some(lines),
            Some(RawTranscript::Wrapper { lines }) => lines,
            None => None,
        };
        let transcript = segments
            .or(raw.segments)
            .unwrap_or_default()
            .into_iter()
            .map(|s| Segment {
                speaker: s.speaker.unwrap_or_default(),
                start: s.start.unwrap_or(0.0),
                end: s.end.unwrap_or(0.0),
                text: s.text.unwrap_or_default(),
            })
            .collect();

        let raw_op = raw.operational.unwrap_or_default();
        let rate = raw_op.speech_rate_wpm.unwrap_or_default();
        let interruptions = raw_op.interruptions.unwrap_or_default();

        let partial = raw
            .partial
            .or(raw.llm_raw.and_then(|l| l.partial))
            .unwrap_or(false);

        ReportModel {
            call_id: raw.call_id.unwrap_or_default(),
            language: non_empty(raw.language),
            duration_sec: raw.duration_sec.unwrap_or(0.0).max(0.0),
            consent: raw.consent.unwrap_or(false),
            partial,
            scores: Scores {
                empathy: raw_scores.empathy.unwrap_or(0.0),
                compliance: raw_scores.compliance.unwrap_or(0.0),
                structure: raw_scores.structure.unwrap_or(0.0),
            },
            operational: Operational {
                silence_pct: raw_op.silence_pct.unwrap_or(0.0),
                overlap_pct: raw_op.overlap_pct.unwrap_or(0.0),
                speech_rate_wpm: SpeechRate {
                    manager: rate.manager.unwrap_or(0.0),
                    client: rate.client.unwrap_or(0.0),
                },
                interruptions: Interruptions {
                    by_manager: interruptions.by_manager.unwrap_or(0),
                    by_client: interruptions.by_client.unwrap_or(0),
                },
            },
            checklist,
            highlights,
            transcript,
            artifacts: raw
                .artifacts
                .unwrap_or_default()
                .into_iter()
                .map(|(label, a)| {
                    (
                        label,
                        ArtifactRef {
                            url: non_empty(a.url),
                            path: non_empty(a.path),
                        },
                    )
                })
                .collect(),
            report_html: non_empty(raw.report_html),
        }
    }

    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.is_empty())
}
