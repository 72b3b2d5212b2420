//! In-memory `ScreeningBackend` for handler and pipeline tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::Notify;

use crate::models::analysis::CandidateAnalysis;
use crate::models::candidate::RankedCandidate;
use crate::models::resume::{ParseReply, ProcessedData, UploadedResumeRecord};
use crate::services::{AnalysisError, ResumeUpload, ScreeningBackend, ServiceError};

pub fn ranked(name: &str, match_score: f64) -> RankedCandidate {
    RankedCandidate {
        name: name.to_string(),
        match_score,
    }
}

/// An upload whose bytes are the resume's raw text.
pub fn upload(file_name: &str, raw_text: &str) -> ResumeUpload {
    ResumeUpload {
        file_name: file_name.to_string(),
        content_type: "application/pdf".to_string(),
        bytes: Bytes::from(raw_text.to_string()),
    }
}

#[derive(Debug, Clone)]
pub enum AnalysisBehavior {
    Succeed(CandidateAnalysis),
    FailFetch,
    FailParse,
}

pub struct FakeBackend {
    ranking: Vec<RankedCandidate>,
    processed: HashMap<String, ProcessedData>,
    failing: HashSet<String>,
    analysis: AnalysisBehavior,
    gate: Option<(Arc<Notify>, Arc<Notify>)>,
    ranking_calls: AtomicUsize,
    sent_emails: Mutex<Vec<String>>,
    content_types: Mutex<Vec<(String, String)>>,
}

impl FakeBackend {
    pub fn new(ranking: Vec<RankedCandidate>) -> Self {
        Self {
            ranking,
            processed: HashMap::new(),
            failing: HashSet::new(),
            analysis: AnalysisBehavior::Succeed(CandidateAnalysis {
                strengths: vec!["Systems design".to_string()],
                improvements: vec!["Frontend exposure".to_string()],
                suitability: "Good fit".to_string(),
            }),
            gate: None,
            ranking_calls: AtomicUsize::new(0),
            sent_emails: Mutex::new(Vec::new()),
            content_types: Mutex::new(Vec::new()),
        }
    }

    pub fn with_processed(mut self, file_name: &str, data: ProcessedData) -> Self {
        self.processed.insert(file_name.to_string(), data);
        self
    }

    pub fn with_note(self, file_name: &str, note: &str) -> Self {
        let data = ProcessedData {
            note: Some(note.to_string()),
            ..Default::default()
        };
        self.with_processed(file_name, data)
    }

    pub fn failing_parse(mut self, file_name: &str) -> Self {
        self.failing.insert(file_name.to_string());
        self
    }

    pub fn with_analysis(mut self, behavior: AnalysisBehavior) -> Self {
        self.analysis = behavior;
        self
    }

    /// Makes `rank_candidates` signal `entered` and then wait for `release`.
    pub fn gated(mut self) -> (Self, Arc<Notify>, Arc<Notify>) {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        self.gate = Some((entered.clone(), release.clone()));
        (self, entered, release)
    }

    pub fn ranking_calls(&self) -> usize {
        self.ranking_calls.load(Ordering::SeqCst)
    }

    pub fn sent_emails(&self) -> Vec<String> {
        self.sent_emails.lock().unwrap().clone()
    }

    /// `(file name, content type)` of every parse request, in arrival order.
    pub fn received_content_types(&self) -> Vec<(String, String)> {
        self.content_types.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScreeningBackend for FakeBackend {
    async fn parse_resume(
        &self,
        upload: ResumeUpload,
    ) -> Result<UploadedResumeRecord, ServiceError> {
        self.content_types
            .lock()
            .unwrap()
            .push((upload.file_name.clone(), upload.content_type.clone()));
        if self.failing.contains(&upload.file_name) {
            return Err(ServiceError::Api {
                status: 400,
                message: "Could not extract text from PDF".to_string(),
            });
        }
        let reply = ParseReply {
            raw_text: String::from_utf8_lossy(&upload.bytes).into_owned(),
            processed_data: self
                .processed
                .get(&upload.file_name)
                .cloned()
                .unwrap_or_default(),
        };
        Ok(reply.into_record(upload.file_name))
    }

    async fn rank_candidates(&self) -> Result<Vec<RankedCandidate>, ServiceError> {
        self.ranking_calls.fetch_add(1, Ordering::SeqCst);
        if let Some((entered, release)) = &self.gate {
            entered.notify_one();
            release.notified().await;
        }
        Ok(self.ranking.clone())
    }

    async fn analyze_candidate(
        &self,
        _candidate: &ProcessedData,
    ) -> Result<CandidateAnalysis, AnalysisError> {
        match &self.analysis {
            AnalysisBehavior::Succeed(analysis) => Ok(analysis.clone()),
            AnalysisBehavior::FailFetch => {
                Err(AnalysisError::Fetch("connection refused".to_string()))
            }
            AnalysisBehavior::FailParse => Err(AnalysisError::Parse("expected value".to_string())),
        }
    }

    async fn send_confirmation_email(
        &self,
        _candidate: &ProcessedData,
        email: &str,
    ) -> Result<String, ServiceError> {
        self.sent_emails.lock().unwrap().push(email.to_string());
        Ok(format!("Confirmation email sent to {email}"))
    }
}
