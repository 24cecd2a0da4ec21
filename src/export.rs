use crate::report::ReportModel;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No analyzed report to export yet")]
    NoReport,

    #[error("No rendered document available for this call")]
    NoDocument,

    #[error("serializing report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("writing export: {0}")]
    Io(#[from] std::io::Error),
}

/// Export filename stem: the call id, with a fixed fallback when the
/// service did not provide one.
pub fn data_file_name(report: &ReportModel) -> String {
    if report.call_id.is_empty() {
        "report.json".to_string()
    } else {
        format!("{}.json", report.call_id)
    }
}

pub fn document_file_name(report: &ReportModel) -> String {
    if report.call_id.is_empty() {
        "report.html".to_string()
    } else {
        format!("{}.html", report.call_id)
    }
}

/// Writes the held report, pretty-printed, as `{callId}.json` under
/// `out_dir`. Fails when no report is held.
pub fn export_data(report: Option<&ReportModel>, out_dir: &Path) -> Result<PathBuf, ExportError> {
    let report = report.ok_or(ExportError::NoReport)?;
    let json = report.to_pretty_json()?;
    std::fs::create_dir_all(out_dir)?;
    let path = out_dir.join(data_file_name(report));
    std::fs::write(&path, json)?;
    debug!("exported report data: {}", path.display());
    Ok(path)
}

/// Persists the service-rendered document verbatim as `{callId}.html`
/// under `out_dir`. Fails when no report is held or the report carries
/// no document.
pub fn write_document(
    report: Option<&ReportModel>,
    out_dir: &Path,
) -> Result<PathBuf, ExportError> {
    let report = report.ok_or(ExportError::NoReport)?;
    let html = report.report_html.as_deref().ok_or(ExportError::NoDocument)?;
    std::fs::create_dir_all(out_dir)?;
    let path = out_dir.join(document_file_name(report));
    std::fs::write(&path, html)?;
    debug!("exported report document: {}", path.display());
    Ok(path)
}

/// Opens the service-rendered document in the platform viewer via a
/// temporary file, then removes the file after `cleanup_delay` on a
/// best-effort basis. A process exit before the delay leaves the file
/// in the temp dir; that leak is accepted.
pub async fn open_document(
    report: Option<&ReportModel>,
    cleanup_delay: Duration,
) -> Result<PathBuf, ExportError> {
    let report = report.ok_or(ExportError::NoReport)?;
    let html = report.report_html.as_deref().ok_or(ExportError::NoDocument)?;

    let file = tempfile::Builder::new()
        .prefix("call-audit-")
        .suffix(".html")
        .tempfile()?;
    std::fs::write(file.path(), html)?;
    let path = file
        .into_temp_path()
        .keep()
        .map_err(|err| ExportError::Io(err.error))?;

    if let Err(err) = open::that(&path) {
        warn!("opening document viewer failed: {err}");
    }

    let cleanup_path = path.clone();
    tokio::spawn(async move {
        tokio::time::sleep(cleanup_delay).await;
        if let Err(err) = std::fs::remove_file(&cleanup_path) {
            debug!(
                "temp document cleanup skipped ({}): {err}",
                cleanup_path.display()
            );
        }
    });

    Ok(path)
}
