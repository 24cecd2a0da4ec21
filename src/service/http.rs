use super::types::ErrorBody;
use super::{AnalyzeService, AudioUpload, ServiceError};
use crate::config::Config;
use crate::report::ReportModel;
use async_trait::async_trait;
use reqwest::multipart;
use tracing::debug;

/// Production implementation of [`AnalyzeService`] over reqwest.
#[derive(Debug, Clone)]
pub struct HttpAnalyzeService {
    http: reqwest::Client,
    analyze_url: String,
    health_url: String,
    audio_field: String,
    consent_field: String,
}

impl HttpAnalyzeService {
    pub fn new(cfg: &Config) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("call-audit/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let base = cfg.service.base_url.trim_end_matches('/');
        Ok(Self {
            http,
            analyze_url: format!("{}{}", base, cfg.service.analyze_path),
            health_url: format!("{}{}", base, cfg.service.health_path),
            audio_field: cfg.upload.audio_field.clone(),
            consent_field: cfg.upload.consent_field.clone(),
        })
    }

    pub fn health_url(&self) -> &str {
        &self.health_url
    }
}

#[async_trait]
impl AnalyzeService for HttpAnalyzeService {
    async fn analyze(&self, upload: AudioUpload) -> Result<ReportModel, ServiceError> {
        debug!(
            "analyze POST {} file={} bytes={} consent={}",
            self.analyze_url,
            upload.file_name,
            upload.bytes.len(),
            upload.consent
        );

        let part = multipart::Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str("application/octet-stream")?;
        let mut form = multipart::Form::new().part(self.audio_field.clone(), part);
        if upload.consent {
            form = form.text(self.consent_field.clone(), "true");
        }

        let resp = self
            .http
            .post(&self.analyze_url)
            .multipart(form)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let detail = match resp.bytes().await {
                Ok(body) => serde_json::from_slice::<ErrorBody>(&body)
                    .ok()
                    .and_then(|e| e.detail),
                Err(_) => None,
            };
            return Err(ServiceError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let body = resp.bytes().await?;
        let report = ReportModel::from_json_bytes(&body)?;
        debug!(
            "analyze ok call_id={} partial={}",
            report.call_id, report.partial
        );
        Ok(report)
    }

    async fn health(&self) -> Result<(), ServiceError> {
        let resp = self.http.get(&self.health_url).send().await?;
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ServiceError::Status {
                status: status.as_u16(),
                detail: None,
            })
        }
    }
}
