use crate::report::ReportModel;

pub const PLACEHOLDER: &str = "–";
pub const EMPTY_CHECKLIST: &str = "No checklist items";
pub const EMPTY_HIGHLIGHTS: &str = "No highlights";
pub const EMPTY_TRANSCRIPT: &str = "No transcript segments";
pub const DEFAULT_HIGHLIGHT_KIND: &str = "Event";

/// The rendered structure of one report. Building it is a pure
/// function of the model: same input, same view, every time. Nothing
/// here assumes the upstream stages completed — absent data renders as
/// explicit placeholders, never as missing elements.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportView {
    pub summary: Vec<SummaryRow>,
    pub scores: Vec<ScoreBar>,
    pub operational: Vec<MetricRow>,
    pub checklist: Section<ChecklistCard>,
    pub highlights: Section<HighlightCard>,
    pub transcript: Section<TranscriptRow>,
}

/// A list section either has items or one explicit placeholder — an
/// empty container is never emitted.
#[derive(Debug, Clone, PartialEq)]
pub enum Section<T> {
    Empty { placeholder: &'static str },
    Items(Vec<T>),
}

impl<T> Section<T> {
    fn from_items(items: Vec<T>, placeholder: &'static str) -> Self {
        if items.is_empty() {
            Section::Empty { placeholder }
        } else {
            Section::Items(items)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBar {
    pub label: &'static str,
    /// Clamped to [0,1]; the filled fraction of the bar.
    pub fill: f64,
    /// The clamped value, two decimals.
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricRow {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChecklistCard {
    pub title: String,
    pub passed: bool,
    pub reason: String,
    /// Combined timestamp + evidence; present only when the item
    /// carries evidence.
    pub evidence: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HighlightCard {
    pub kind: String,
    pub quote: String,
    pub ts: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptRow {
    pub heading: String,
    pub text: String,
}

pub fn build(report: &ReportModel) -> ReportView {
    ReportView {
        summary: summary(report),
        scores: scores(report),
        operational: operational(report),
        checklist: checklist(report),
        highlights: highlights(report),
        transcript: transcript(report),
    }
}

fn summary(report: &ReportModel) -> Vec<SummaryRow> {
    let mut rows = vec![
        SummaryRow {
            label: "Call",
            value: or_placeholder(&report.call_id),
        },
        SummaryRow {
            label: "Language",
            value: report
                .language
                .as_deref()
                .map(str::to_uppercase)
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
        },
        SummaryRow {
            label: "Duration",
            value: format!("{:.1} s", report.duration_sec),
        },
        SummaryRow {
            label: "Consent",
            value: if report.consent { "yes" } else { "no" }.to_string(),
        },
    ];
    if report.partial {
        rows.push(SummaryRow {
            label: "Status",
            value: "partial result".to_string(),
        });
    }
    rows
}

fn scores(report: &ReportModel) -> Vec<ScoreBar> {
    [
        ("Empathy", report.scores.empathy),
        ("Compliance", report.scores.compliance),
        ("Structure", report.scores.structure),
    ]
    .into_iter()
    .map(|(label, raw)| {
        let fill = clamp_unit(raw);
        ScoreBar {
            label,
            fill,
            value: format!("{fill:.2}"),
        }
    })
    .collect()
}

fn operational(report: &ReportModel) -> Vec<MetricRow> {
    let op = &report.operational;
    vec![
        MetricRow {
            label: "Silence",
            value: format!("{:.1} %", op.silence_pct),
        },
        MetricRow {
            label: "Overlap",
            value: format!("{:.1} %", op.overlap_pct),
        },
        MetricRow {
            label: "Manager speech rate",
            value: format!("{:.0} wpm", op.speech_rate_wpm.manager),
        },
        MetricRow {
            label: "Client speech rate",
            value: format!("{:.0} wpm", op.speech_rate_wpm.client),
        },
        MetricRow {
            label: "Interruptions by manager",
            value: op.interruptions.by_manager.to_string(),
        },
        MetricRow {
            label: "Interruptions by client",
            value: op.interruptions.by_client.to_string(),
        },
    ]
}

fn checklist(report: &ReportModel) -> Section<ChecklistCard> {
    let cards = report
        .checklist
        .iter()
        .map(|item| ChecklistCard {
            title: format!(
                "{} · {}/{}",
                or_placeholder(&item.id),
                fmt_number(item.score),
                fmt_number(item.max)
            ),
            passed: item.passed,
            reason: item
                .reason
                .clone()
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            evidence: item.evidence.as_ref().map(|evidence| match &item.ts {
                Some(ts) => format!("[{ts}] {evidence}"),
                None => evidence.clone(),
            }),
        })
        .collect();
    Section::from_items(cards, EMPTY_CHECKLIST)
}

fn highlights(report: &ReportModel) -> Section<HighlightCard> {
    let cards = report
        .highlights
        .iter()
        .map(|h| HighlightCard {
            kind: h
                .kind
                .clone()
                .unwrap_or_else(|| DEFAULT_HIGHLIGHT_KIND.to_string()),
            quote: h.quote.clone().unwrap_or_else(|| PLACEHOLDER.to_string()),
            ts: h.ts.clone(),
        })
        .collect();
    Section::from_items(cards, EMPTY_HIGHLIGHTS)
}

fn transcript(report: &ReportModel) -> Section<TranscriptRow> {
    let rows = report
        .transcript
        .iter()
        .map(|seg| TranscriptRow {
            heading: format!(
                "{} · {:.2}–{:.2} s",
                or_placeholder(&seg.speaker),
                seg.start,
                seg.end
            ),
            text: seg.text.clone(),
        })
        .collect();
    Section::from_items(rows, EMPTY_TRANSCRIPT)
}

pub fn clamp_unit(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

/// Numbers the service sends as JSON render without trailing zeros:
/// 2.0 shows as "2", 2.5 as "2.5".
fn fmt_number(v: f64) -> String {
    if v.fract() == 0.0 && v.is_finite() {
        format!("{v:.0}")
    } else {
        format!("{v}")
    }
}

fn or_placeholder(s: &str) -> String {
    if s.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        s.to_string()
    }
}
