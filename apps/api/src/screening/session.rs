//! Holds the latest committed screening batch.
//!
//! Each submission takes a generation ticket when it starts. Only the holder of
//! the newest ticket may commit, so a slow submission that finishes after a
//! newer one is dropped instead of overwriting it.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;
use tracing::warn;

use crate::screening::pipeline::ScreeningBatch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionTicket(u64);

impl SubmissionTicket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("submission {ticket} superseded by submission {current}")]
pub struct Superseded {
    pub ticket: u64,
    pub current: u64,
}

#[derive(Debug, Default)]
struct SessionState {
    issued: u64,
    latest: Option<Arc<ScreeningBatch>>,
}

#[derive(Debug, Default)]
pub struct ScreeningStore {
    state: RwLock<SessionState>,
}

impl ScreeningStore {
    pub async fn begin(&self) -> SubmissionTicket {
        let mut state = self.state.write().await;
        state.issued += 1;
        SubmissionTicket(state.issued)
    }

    pub async fn commit(
        &self,
        ticket: SubmissionTicket,
        batch: ScreeningBatch,
    ) -> Result<Arc<ScreeningBatch>, Superseded> {
        let mut state = self.state.write().await;
        if ticket.0 != state.issued {
            warn!(
                "Discarding stale screening result (generation {} < {})",
                ticket.0, state.issued
            );
            return Err(Superseded {
                ticket: ticket.0,
                current: state.issued,
            });
        }
        let batch = Arc::new(batch);
        state.latest = Some(batch.clone());
        Ok(batch)
    }

    pub async fn latest(&self) -> Option<Arc<ScreeningBatch>> {
        self.state.read().await.latest.clone()
    }
}
