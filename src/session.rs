use crate::report::ReportModel;
use crate::service::{AnalyzeService, AudioUpload, GENERIC_FAILURE};
use std::cell::{Cell, Ref, RefCell};
use std::path::Path;
use tracing::{info, warn};

/// Local validation wording; matches the service's own 400 detail so
/// the user sees one message for the same mistake on either side.
pub const MSG_NO_FILE: &str = "Audio file is required";
pub const MSG_COMPLETE: &str = "Analysis complete";
pub const MSG_COMPLETE_PARTIAL: &str = "Analysis complete (partial result)";

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The report slot now holds the new analysis.
    Completed { partial: bool },
    /// A local precondition failed; no request was issued.
    Rejected,
    /// A submit is already in flight; this call had no effect.
    Busy,
    /// The request was issued and failed; the slot is unchanged.
    Failed,
}

/// Owns the session: the single "last analyzed report" slot, the
/// in-flight guard, and the user-facing status line.
///
/// Single-threaded by contract — interior mutability models the UI
/// affordance (a second submit while one is pending is a no-op), and
/// the flag is cleared on every exit path so the affordance always
/// comes back, success or failure.
pub struct UploadController<S> {
    service: S,
    max_upload_bytes: u64,
    session: RefCell<Option<ReportModel>>,
    in_flight: Cell<bool>,
    status: RefCell<String>,
}

impl<S: AnalyzeService> UploadController<S> {
    pub fn new(service: S, max_upload_bytes: u64) -> Self {
        Self {
            service,
            max_upload_bytes,
            session: RefCell::new(None),
            in_flight: Cell::new(false),
            status: RefCell::new(String::new()),
        }
    }

    /// Validates and submits one audio file. Exactly one request is
    /// issued for a valid submission; none otherwise.
    pub async fn submit(&self, input: &Path, consent: bool) -> SubmitOutcome {
        if self.in_flight.get() {
            warn!("submit ignored: request already in flight");
            return SubmitOutcome::Busy;
        }

        if let Err(msg) = self.validate(input) {
            self.set_status(msg);
            return SubmitOutcome::Rejected;
        }

        self.in_flight.set(true);
        let outcome = self.run_submit(input, consent).await;
        self.in_flight.set(false);
        outcome
    }

    fn validate(&self, input: &Path) -> Result<(), String> {
        let meta = match std::fs::metadata(input) {
            Ok(meta) if meta.is_file() => meta,
            _ => return Err(MSG_NO_FILE.to_string()),
        };
        if meta.len() > self.max_upload_bytes {
            return Err(size_limit_message(self.max_upload_bytes));
        }
        Ok(())
    }

    async fn run_submit(&self, input: &Path, consent: bool) -> SubmitOutcome {
        let bytes = match tokio::fs::read(input).await {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!("reading input failed: {err}");
                self.set_status(GENERIC_FAILURE.to_string());
                return SubmitOutcome::Failed;
            }
        };

        let file_name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".to_string());

        let upload = AudioUpload {
            file_name,
            bytes,
            consent,
        };

        match self.service.analyze(upload).await {
            Ok(report) => {
                let partial = report.partial;
                info!("analysis complete call_id={} partial={partial}", report.call_id);
                *self.session.borrow_mut() = Some(report);
                self.set_status(if partial {
                    MSG_COMPLETE_PARTIAL.to_string()
                } else {
                    MSG_COMPLETE.to_string()
                });
                SubmitOutcome::Completed { partial }
            }
            Err(err) => {
                warn!("analysis failed: {err}");
                self.set_status(err.user_message());
                SubmitOutcome::Failed
            }
        }
    }

    /// The last successfully analyzed report, if any. Borrowed, not
    /// cloned: the slot stays the exclusive owner.
    pub fn report(&self) -> Option<Ref<'_, ReportModel>> {
        Ref::filter_map(self.session.borrow(), Option::as_ref).ok()
    }

    pub fn status(&self) -> String {
        self.status.borrow().clone()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.get()
    }

    fn set_status(&self, msg: impl Into<String>) {
        *self.status.borrow_mut() = msg.into();
    }
}

pub fn size_limit_message(max_upload_bytes: u64) -> String {
    format!(
        "File exceeds the {} MiB upload limit",
        max_upload_bytes / (1024 * 1024)
    )
}
