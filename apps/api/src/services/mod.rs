//! Clients for the external services this API sits in front of.
//!
//! Every outbound call goes through a `ScreeningBackend`. `HttpBackend` is the
//! production implementation; it is built once in `main` and shared through
//! `AppState`. Calls are not retried: failures surface to the caller as-is.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::models::analysis::CandidateAnalysis;
use crate::models::candidate::RankedCandidate;
use crate::models::resume::{ProcessedData, UploadedResumeRecord};

pub mod analysis;
pub mod http;

pub use http::HttpBackend;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("could not decode service response: {0}")]
    Decode(String),

    #[error("{0}")]
    Rejected(String),
}

impl ServiceError {
    /// Message suitable for showing to the HR user.
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Api { message, .. } | ServiceError::Rejected(message) => message.clone(),
            ServiceError::Http(_) | ServiceError::Decode(_) => {
                "The screening service is unavailable".to_string()
            }
        }
    }
}

/// Analysis failures keep "could not reach" and "could not read" apart.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Failed to get AI analysis: {0}")]
    Fetch(String),

    #[error("Failed to parse AI analysis: {0}")]
    Parse(String),

    #[error("{0}")]
    Reported(String),
}

impl From<ServiceError> for AnalysisError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Decode(detail) => AnalysisError::Parse(detail),
            ServiceError::Rejected(message) => AnalysisError::Reported(message),
            other => AnalysisError::Fetch(other.to_string()),
        }
    }
}

/// Content type sent for uploads whose own type is missing or malformed.
pub const DEFAULT_RESUME_MIME: &str = "application/pdf";

/// A file received from the HR client, forwarded to the parsing service.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub file_name: String,
    /// Always a well-formed MIME type; see [`normalize_content_type`].
    pub content_type: String,
    pub bytes: Bytes,
}

/// Returns `raw` when it parses as a MIME type, otherwise [`DEFAULT_RESUME_MIME`].
pub fn normalize_content_type(raw: Option<&str>) -> String {
    match raw.map(str::trim).filter(|ct| !ct.is_empty()) {
        Some(ct) if reqwest::multipart::Part::text("").mime_str(ct).is_ok() => ct.to_string(),
        _ => DEFAULT_RESUME_MIME.to_string(),
    }
}

/// The four external operations the screening flow depends on.
#[async_trait]
pub trait ScreeningBackend: Send + Sync {
    /// Parses one resume file.
    async fn parse_resume(&self, upload: ResumeUpload)
        -> Result<UploadedResumeRecord, ServiceError>;

    /// Ranks every resume known to the ranking service, best match first.
    async fn rank_candidates(&self) -> Result<Vec<RankedCandidate>, ServiceError>;

    async fn analyze_candidate(
        &self,
        candidate: &ProcessedData,
    ) -> Result<CandidateAnalysis, AnalysisError>;

    /// Returns the service's confirmation message.
    async fn send_confirmation_email(
        &self,
        candidate: &ProcessedData,
        email: &str,
    ) -> Result<String, ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_content_type() {
        assert_eq!(normalize_content_type(Some("application/pdf")), "application/pdf");
        assert_eq!(
            normalize_content_type(Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document")),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
        assert_eq!(normalize_content_type(Some("garbage")), DEFAULT_RESUME_MIME);
        assert_eq!(normalize_content_type(Some("  ")), DEFAULT_RESUME_MIME);
        assert_eq!(normalize_content_type(None), DEFAULT_RESUME_MIME);
    }

    #[test]
    fn test_decode_failure_maps_to_parse_state() {
        let err: AnalysisError = ServiceError::Decode("bad json".to_string()).into();
        assert!(matches!(err, AnalysisError::Parse(_)));
        assert!(err.to_string().starts_with("Failed to parse AI analysis"));
    }

    #[test]
    fn test_api_failure_maps_to_fetch_state() {
        let err: AnalysisError = ServiceError::Api {
            status: 503,
            message: "down".to_string(),
        }
        .into();
        assert!(matches!(err, AnalysisError::Fetch(_)));
        assert!(err.to_string().starts_with("Failed to get AI analysis"));
    }

    #[test]
    fn test_rejection_keeps_service_message() {
        let err: AnalysisError = ServiceError::Rejected("quota exceeded".to_string()).into();
        assert_eq!(err.to_string(), "quota exceeded");
    }

    #[test]
    fn test_user_message_hides_transport_detail() {
        let err = ServiceError::Decode("expected value at line 1".to_string());
        assert_eq!(err.user_message(), "The screening service is unavailable");
        let err = ServiceError::Api {
            status: 400,
            message: "Invalid PDF".to_string(),
        };
        assert_eq!(err.user_message(), "Invalid PDF");
    }
}
