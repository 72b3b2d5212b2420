//! Axum route handlers for the Screening API.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::errors::AppError;
use crate::models::analysis::CandidateAnalysis;
use crate::models::candidate::CombinedCandidate;
use crate::models::resume::UploadedResumeRecord;
use crate::screening::comparison::{
    compare_candidates, Comparison, ComparisonReport, COMPARISON_GUIDANCE,
};
use crate::screening::pipeline::{submit, ScreeningBatch};
use crate::screening::score::{normalize_and_inflate, DisplayScore, MatchTier};
use crate::screening::view::{paginate, ranked_views, CandidatePage};
use crate::services::{normalize_content_type, ResumeUpload};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "first_page")]
    pub page: usize,
}

fn first_page() -> usize {
    1
}

#[derive(Debug, Deserialize)]
pub struct CandidateRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub names: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct DisplayScoreQuery {
    #[serde(rename = "match")]
    pub match_score: f64,
}

#[derive(Debug, Serialize)]
pub struct ScreeningResponse {
    pub screening_id: Uuid,
    pub generation: u64,
    pub created_at: DateTime<Utc>,
    pub uploaded_files: Vec<String>,
    pub already_parsed: Vec<String>,
    pub rankings: CandidatePage,
}

impl ScreeningResponse {
    fn build(batch: &ScreeningBatch, page: usize, config: &Config) -> Self {
        let views = ranked_views(&batch.candidates, &config.score_calibration);
        Self {
            screening_id: batch.id,
            generation: batch.generation,
            created_at: batch.created_at,
            uploaded_files: batch.uploads.iter().map(|u| u.file_name.clone()).collect(),
            already_parsed: batch.already_parsed.clone(),
            rankings: paginate(views, page, config.candidates_per_page),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UploadsResponse {
    pub screening_id: Uuid,
    pub uploads: Vec<UploadedResumeRecord>,
    pub already_parsed: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub name: String,
    pub analysis: CandidateAnalysis,
}

#[derive(Debug, Serialize)]
pub struct EmailResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct DisplayScoreResponse {
    #[serde(rename = "match")]
    pub match_score: f64,
    pub display_score: DisplayScore,
    pub tier: MatchTier,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn latest_batch(state: &AppState) -> Result<Arc<ScreeningBatch>, AppError> {
    state
        .screenings
        .latest()
        .await
        .ok_or_else(|| AppError::NotFound("No screening has been run yet".to_string()))
}

fn find_candidate<'a>(
    batch: &'a ScreeningBatch,
    name: &str,
) -> Result<&'a CombinedCandidate, AppError> {
    batch
        .candidate(name)
        .ok_or_else(|| AppError::NotFound(format!("Candidate '{name}' is not in the latest ranking")))
}

fn validate_page(page: usize) -> Result<usize, AppError> {
    if page == 0 {
        return Err(AppError::Validation("page starts at 1".to_string()));
    }
    Ok(page)
}

/// Reads every `file`/`files` part of the form. Other parts are ignored.
async fn collect_uploads(multipart: &mut Multipart) -> Result<Vec<ResumeUpload>, AppError> {
    let mut uploads = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?
    {
        if !matches!(field.name(), Some("file") | Some("files")) {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("resume-{}.pdf", uploads.len() + 1));
        let content_type = normalize_content_type(field.content_type());
        if let Some(raw) = field.content_type().filter(|raw| raw.trim() != content_type) {
            warn!("Upload {file_name} has unusable content type {raw:?}; sending as {content_type}");
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;

        uploads.push(ResumeUpload {
            file_name,
            content_type,
            bytes,
        });
    }

    Ok(uploads)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/screenings
///
/// Multipart upload of one or more resumes. Parses each, ranks, reconciles,
/// and returns the first page of the ranking.
pub async fn handle_submit(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ScreeningResponse>, AppError> {
    let files = collect_uploads(&mut multipart).await?;
    if files.is_empty() {
        return Err(AppError::Validation(
            "Please select at least one PDF file".to_string(),
        ));
    }

    let batch = submit(&state.screenings, state.backend.as_ref(), files).await?;
    info!(screening_id = %batch.id, "Screening ready");

    Ok(Json(ScreeningResponse::build(&batch, 1, &state.config)))
}

/// GET /api/v1/screenings/latest?page=N
pub async fn handle_latest(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ScreeningResponse>, AppError> {
    let page = validate_page(query.page)?;
    let batch = latest_batch(&state).await?;
    Ok(Json(ScreeningResponse::build(&batch, page, &state.config)))
}

/// GET /api/v1/screenings/latest/uploads
pub async fn handle_latest_uploads(
    State(state): State<AppState>,
) -> Result<Json<UploadsResponse>, AppError> {
    let batch = latest_batch(&state).await?;
    Ok(Json(UploadsResponse {
        screening_id: batch.id,
        uploads: batch.uploads.clone(),
        already_parsed: batch.already_parsed.clone(),
    }))
}

/// POST /api/v1/screenings/latest/compare
///
/// Compares exactly two candidates from the latest ranking, by exact name.
pub async fn handle_compare(
    State(state): State<AppState>,
    Json(request): Json<CompareRequest>,
) -> Result<Json<ComparisonReport>, AppError> {
    if request.names.len() != 2 {
        return Err(AppError::Validation(COMPARISON_GUIDANCE.to_string()));
    }
    let batch = latest_batch(&state).await?;
    let selected = request
        .names
        .iter()
        .map(|name| find_candidate(&batch, name).cloned())
        .collect::<Result<Vec<_>, _>>()?;

    match compare_candidates(&selected, &state.config.score_calibration) {
        Comparison::Ready(report) => Ok(Json(report)),
        Comparison::Unavailable { guidance } => Err(AppError::Validation(guidance)),
    }
}

/// POST /api/v1/candidates/analysis
pub async fn handle_analysis(
    State(state): State<AppState>,
    Json(request): Json<CandidateRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let batch = latest_batch(&state).await?;
    let candidate = find_candidate(&batch, &request.name)?;
    let data = candidate.processed_data().ok_or_else(|| {
        AppError::UnprocessableEntity("Candidate has no parsed resume to analyze".to_string())
    })?;

    let analysis = state.backend.analyze_candidate(data).await?;

    Ok(Json(AnalysisResponse {
        name: candidate.name.clone(),
        analysis,
    }))
}

/// POST /api/v1/candidates/confirmation-email
pub async fn handle_confirmation_email(
    State(state): State<AppState>,
    Json(request): Json<CandidateRequest>,
) -> Result<Json<EmailResponse>, AppError> {
    let batch = latest_batch(&state).await?;
    let candidate = find_candidate(&batch, &request.name)?;
    let data = candidate
        .processed_data()
        .ok_or_else(|| AppError::UnprocessableEntity("No candidate selected".to_string()))?;
    let email = data.email().ok_or_else(|| {
        AppError::UnprocessableEntity("Candidate has no email address".to_string())
    })?;

    let message = state.backend.send_confirmation_email(data, email).await?;
    info!("Confirmation email sent for {}", candidate.name);

    Ok(Json(EmailResponse { message }))
}

/// GET /api/v1/scores/display?match=x
pub async fn handle_display_score(
    State(state): State<AppState>,
    Query(query): Query<DisplayScoreQuery>,
) -> Json<DisplayScoreResponse> {
    let display_score = normalize_and_inflate(query.match_score, &state.config.score_calibration);
    Json(DisplayScoreResponse {
        match_score: query.match_score,
        display_score,
        tier: display_score.tier(),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
