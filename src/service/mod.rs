pub mod http;
pub mod types;

use crate::report::ReportModel;
use async_trait::async_trait;
use thiserror::Error;

pub use http::HttpAnalyzeService;

/// User-facing fallback when the service gives no usable detail.
pub const GENERIC_FAILURE: &str = "Analysis failed. Please try again.";

/// One selected audio submission, validated and read into memory.
#[derive(Debug, Clone)]
pub struct AudioUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub consent: bool,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("service returned status {status}")]
    Status { status: u16, detail: Option<String> },

    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ServiceError {
    /// The status text shown to the user: the service-supplied detail
    /// message when one exists, a generic fallback otherwise.
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Status {
                detail: Some(detail),
                ..
            } => detail.clone(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}

/// The one HTTP boundary of this client. Everything about how the
/// report is computed lives behind it.
#[async_trait]
pub trait AnalyzeService {
    /// Issues one analyze request and decodes the response. No retry,
    /// no cancellation, no timeout beyond the transport's own.
    async fn analyze(&self, upload: AudioUpload) -> Result<ReportModel, ServiceError>;

    /// One availability check; any 2xx counts as healthy.
    async fn health(&self) -> Result<(), ServiceError>;
}
