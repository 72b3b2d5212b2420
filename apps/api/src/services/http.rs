use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::models::analysis::CandidateAnalysis;
use crate::models::candidate::{RankedCandidate, RankingReply};
use crate::models::resume::{ParseReply, ProcessedData, UploadedResumeRecord};
use crate::services::analysis::{decode_analysis, decode_email_reply, error_message};
use crate::services::{
    normalize_content_type, AnalysisError, ResumeUpload, ScreeningBackend, ServiceError,
};

const PARSE_PATH: &str = "/send-data";
const RANK_PATH: &str = "/process-and-match-resumes";
const ANALYZE_PATH: &str = "/analyze-candidate";
const EMAIL_PATH: &str = "/send-confirmation-email";

#[derive(Debug, Serialize)]
struct AnalysisRequest {
    /// The analysis service expects the resume as a JSON-encoded string.
    candidate_data: String,
}

#[derive(Debug, Serialize)]
struct EmailRequest<'a> {
    candidate_data: &'a ProcessedData,
    email: &'a str,
}

/// reqwest-backed implementation of [`ScreeningBackend`].
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    parser_url: String,
    ranking_url: String,
}

impl HttpBackend {
    pub fn new(config: &Config) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            parser_url: config.parser_service_url.trim_end_matches('/').to_string(),
            ranking_url: config.ranking_service_url.trim_end_matches('/').to_string(),
        })
    }

    fn parser(&self, path: &str) -> String {
        format!("{}{path}", self.parser_url)
    }

    fn ranking(&self, path: &str) -> String {
        format!("{}{path}", self.ranking_url)
    }
}

/// Turns non-2xx statuses into `ServiceError::Api`, then decodes the JSON body.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = error_message(&body);
        warn!("Service returned {status}: {message}");
        return Err(ServiceError::Api {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&body).map_err(|e| ServiceError::Decode(e.to_string()))
}

#[async_trait]
impl ScreeningBackend for HttpBackend {
    async fn parse_resume(
        &self,
        upload: ResumeUpload,
    ) -> Result<UploadedResumeRecord, ServiceError> {
        let ResumeUpload {
            file_name,
            content_type,
            bytes,
        } = upload;

        let part = multipart::Part::bytes(bytes.to_vec())
            .file_name(file_name.clone())
            .mime_str(&normalize_content_type(Some(&content_type)))?;
        let form = multipart::Form::new().part("file", part);

        debug!("Sending {file_name} to parsing service");
        let response = self
            .client
            .post(self.parser(PARSE_PATH))
            .multipart(form)
            .send()
            .await?;

        let reply: ParseReply = read_json(response).await?;
        Ok(reply.into_record(file_name))
    }

    async fn rank_candidates(&self) -> Result<Vec<RankedCandidate>, ServiceError> {
        let response = self.client.get(self.ranking(RANK_PATH)).send().await?;
        let reply: RankingReply = read_json(response).await?;
        debug!("Ranking service returned {} candidates", reply.candidates.len());
        Ok(reply.candidates)
    }

    async fn analyze_candidate(
        &self,
        candidate: &ProcessedData,
    ) -> Result<CandidateAnalysis, AnalysisError> {
        let request = AnalysisRequest {
            candidate_data: serde_json::to_string(candidate)
                .map_err(|e| AnalysisError::Fetch(e.to_string()))?,
        };

        let response = self
            .client
            .post(self.parser(ANALYZE_PATH))
            .json(&request)
            .send()
            .await
            .map_err(ServiceError::from)?;

        let body: Value = read_json(response).await?;
        decode_analysis(body)
    }

    async fn send_confirmation_email(
        &self,
        candidate: &ProcessedData,
        email: &str,
    ) -> Result<String, ServiceError> {
        let response = self
            .client
            .post(self.parser(EMAIL_PATH))
            .json(&EmailRequest {
                candidate_data: candidate,
                email,
            })
            .send()
            .await?;

        let body: Value = read_json(response).await?;
        decode_email_reply(body)
    }
}
