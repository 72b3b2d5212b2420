use serde::{Deserialize, Serialize};

use crate::models::resume::{ProcessedData, UploadedResumeRecord};

/// One entry of the ranking service's response, best match first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedCandidate {
    pub name: String,
    /// Raw score as computed upstream. Never rescaled; ordering always uses this.
    #[serde(rename = "match")]
    pub match_score: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RankingReply {
    #[serde(default)]
    pub candidates: Vec<RankedCandidate>,
}

/// Parsed resume content attached to a ranked candidate after reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FullDetails {
    pub raw_text: String,
    pub processed_data: ProcessedData,
}

impl From<&UploadedResumeRecord> for FullDetails {
    fn from(record: &UploadedResumeRecord) -> Self {
        Self {
            raw_text: record.raw_text.clone(),
            processed_data: record.processed_data.clone(),
        }
    }
}

/// A ranked candidate merged with its upload, if one could be identified.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CombinedCandidate {
    pub name: String,
    #[serde(rename = "match")]
    pub match_score: f64,
    pub full_details: Option<FullDetails>,
}

impl CombinedCandidate {
    pub fn processed_data(&self) -> Option<&ProcessedData> {
        self.full_details.as_ref().map(|d| &d.processed_data)
    }
}
