use crate::view::{ReportView, Section};
use std::fmt::Write;

const BAR_WIDTH: usize = 20;

/// Commits a view to a plain-text document. The whole document is
/// rebuilt from the view each time, so re-rendering the same report
/// yields byte-identical output.
pub fn to_text(view: &ReportView) -> String {
    let mut out = String::new();

    heading(&mut out, "Summary");
    for row in &view.summary {
        let _ = writeln!(out, "{:<26} {}", row.label, row.value);
    }

    heading(&mut out, "Scores");
    for bar in &view.scores {
        let filled = (bar.fill * BAR_WIDTH as f64).round() as usize;
        let filled = filled.min(BAR_WIDTH);
        let _ = writeln!(
            out,
            "{:<26} [{}{}] {}",
            bar.label,
            "#".repeat(filled),
            "-".repeat(BAR_WIDTH - filled),
            bar.value
        );
    }

    heading(&mut out, "Operational metrics");
    for row in &view.operational {
        let _ = writeln!(out, "{:<26} {}", row.label, row.value);
    }

    heading(&mut out, "Checklist");
    match &view.checklist {
        Section::Empty { placeholder } => {
            let _ = writeln!(out, "{placeholder}");
        }
        Section::Items(cards) => {
            for card in cards {
                let mark = if card.passed { "PASS" } else { "WARN" };
                let _ = writeln!(out, "[{mark}] {}", card.title);
                let _ = writeln!(out, "       {}", card.reason);
                if let Some(evidence) = &card.evidence {
                    let _ = writeln!(out, "       {evidence}");
                }
            }
        }
    }

    heading(&mut out, "Highlights");
    match &view.highlights {
        Section::Empty { placeholder } => {
            let _ = writeln!(out, "{placeholder}");
        }
        Section::Items(cards) => {
            for card in cards {
                match &card.ts {
                    Some(ts) => {
                        let _ = writeln!(out, "{}: {} [{ts}]", card.kind, card.quote);
                    }
                    None => {
                        let _ = writeln!(out, "{}: {}", card.kind, card.quote);
                    }
                }
            }
        }
    }

    heading(&mut out, "Transcript");
    match &view.transcript {
        Section::Empty { placeholder } => {
            let _ = writeln!(out, "{placeholder}");
        }
        Section::Items(rows) => {
            for row in rows {
                let _ = writeln!(out, "{}", row.heading);
                let _ = writeln!(out, "    {}", row.text);
            }
        }
    }

    out
}

fn heading(out: &mut String, title: &str) {
    if !out.is_empty() {
        out.push('\n');
    }
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "-".repeat(title.len()));
}
