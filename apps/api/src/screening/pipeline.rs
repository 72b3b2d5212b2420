//! Submission flow: parse every file, rank, reconcile.

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::models::candidate::CombinedCandidate;
use crate::models::resume::UploadedResumeRecord;
use crate::screening::reconcile::reconcile;
use crate::screening::session::{ScreeningStore, Superseded};
use crate::services::{ResumeUpload, ScreeningBackend, ServiceError};

/// Everything produced by one submission. Replaced wholesale by the next one.
#[derive(Debug, Clone, Serialize)]
pub struct ScreeningBatch {
    pub id: Uuid,
    pub generation: u64,
    pub created_at: DateTime<Utc>,
    pub uploads: Vec<UploadedResumeRecord>,
    /// File names the parsing service reported as already stored.
    pub already_parsed: Vec<String>,
    /// Ranking order as returned by the ranking service.
    pub candidates: Vec<CombinedCandidate>,
}

impl ScreeningBatch {
    /// First candidate with exactly this name.
    pub fn candidate(&self, name: &str) -> Option<&CombinedCandidate> {
        self.candidates.iter().find(|c| c.name == name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Superseded(#[from] Superseded),
}

pub fn already_parsed_files(uploads: &[UploadedResumeRecord]) -> Vec<String> {
    uploads
        .iter()
        .filter(|u| u.already_in_database())
        .map(|u| u.file_name.clone())
        .collect()
}

/// Parses all uploads concurrently, then ranks once every parse has finished.
/// Any failed parse fails the whole batch.
pub async fn run_screening(
    backend: &dyn ScreeningBackend,
    files: Vec<ResumeUpload>,
    generation: u64,
) -> Result<ScreeningBatch, ServiceError> {
    let file_count = files.len();
    let uploads = try_join_all(files.into_iter().map(|file| backend.parse_resume(file))).await?;

    let already_parsed = already_parsed_files(&uploads);
    if !already_parsed.is_empty() {
        info!(
            "{} of {file_count} resumes already exist in the database",
            already_parsed.len()
        );
    }

    let ranked = backend.rank_candidates().await?;
    let candidates = reconcile(&uploads, &ranked);

    Ok(ScreeningBatch {
        id: Uuid::new_v4(),
        generation,
        created_at: Utc::now(),
        uploads,
        already_parsed,
        candidates,
    })
}

/// Runs a submission under a fresh generation ticket and commits it only if no
/// newer submission has started in the meantime.
pub async fn submit(
    store: &ScreeningStore,
    backend: &dyn ScreeningBackend,
    files: Vec<ResumeUpload>,
) -> Result<std::sync::Arc<ScreeningBatch>, SubmitError> {
    let ticket = store.begin().await;
    info!(
        generation = ticket.generation(),
        files = files.len(),
        "Screening submission started"
    );

    let batch = run_screening(backend, files, ticket.generation()).await?;
    let committed = store.commit(ticket, batch).await?;

    info!(
        generation = committed.generation,
        candidates = committed.candidates.len(),
        "Screening submission committed"
    );
    Ok(committed)
}
