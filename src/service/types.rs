use serde::Deserialize;
use std::collections::BTreeMap;

/// Wire shape of a 2xx analyze response. Every field is optional: a
/// partial or degraded upstream response must still decode, and the
/// original server emits a few structural variants (checklist and
/// highlights nested under `scores`, the transcript as `{text, lines}`
/// or as a top-level `segments` array, `partial` inside `llmRaw`).
/// Normalization into the canonical model lives in `report.rs`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawReport {
    pub call_id: Option<String>,
    pub language: Option<String>,
    pub duration_sec: Option<f64>,
    pub consent: Option<bool>,
    pub partial: Option<bool>,
    pub scores: Option<RawScores>,
    pub operational: Option<RawOperational>,
    pub checklist: Option<Vec<RawChecklistItem>>,
    pub highlights: Option<Vec<RawHighlight>>,
    pub transcript: Option<RawTranscript>,
    pub segments: Option<Vec<RawSegment>>,
    pub llm_raw: Option<RawLlm>,
    pub artifacts: Option<BTreeMap<String, RawArtifact>>,
    pub report_html: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawScores {
    pub empathy: Option<f64>,
    pub compliance: Option<f64>,
    pub structure: Option<f64>,
    pub checklist: Option<Vec<RawChecklistItem>>,
    pub highlights: Option<Vec<RawHighlight>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawOperational {
    pub silence_pct: Option<f64>,
    pub overlap_pct: Option<f64>,
    pub speech_rate_wpm: Option<RawSpeechRate>,
    pub interruptions: Option<RawInterruptions>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSpeechRate {
    pub manager: Option<f64>,
    pub client: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawInterruptions {
    pub by_manager: Option<u32>,
    pub by_client: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawChecklistItem {
    pub id: Option<String>,
    pub score: Option<f64>,
    pub max: Option<f64>,
    pub passed: Option<bool>,
    pub reason: Option<String>,
    pub evidence: Option<String>,
    pub ts: Option<RawTs>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawHighlight {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub quote: Option<String>,
    pub ts: Option<RawTs>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawTranscript {
    Lines(Vec<RawSegment>),
    Wrapper { lines: Option<Vec<RawSegment>> },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSegment {
    pub speaker: Option<String>,
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawLlm {
    pub partial: Option<bool>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawArtifact {
    pub url: Option<String>,
    pub path: Option<String>,
}

/// Timestamps arrive as preformatted strings ("0.00-4.20") or as plain
/// seconds depending on which stage produced them.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawTs {
    Text(String),
    Seconds(f64),
}

impl RawTs {
    pub fn into_display(self) -> String {
        match self {
            RawTs::Text(s) => s,
            RawTs::Seconds(v) => format!("{v:.2}"),
        }
    }
}

/// Error body of a non-2xx response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ErrorBody {
    pub detail: Option<String>,
}
