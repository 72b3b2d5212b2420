use serde::Serialize;

use crate::models::candidate::{CombinedCandidate, FullDetails};
use crate::models::resume::{ProcessedData, NOT_AVAILABLE};
use crate::screening::score::{normalize_and_inflate, DisplayScore, MatchTier, ScoreCalibration};

/// A ranked candidate as the HR dashboard shows it.
#[derive(Debug, Clone, Serialize)]
pub struct RankedCandidateView {
    /// 1-based position in the ranking service's order.
    pub rank: usize,
    pub name: String,
    #[serde(rename = "match")]
    pub match_score: f64,
    pub display_score: DisplayScore,
    pub tier: MatchTier,
    pub already_in_database: bool,
    pub has_details: bool,
    pub summary: Option<CandidateSummary>,
    pub full_details: Option<FullDetails>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CandidateSummary {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub ats_score: Option<f64>,
}

impl CandidateSummary {
    pub fn from_processed(data: &ProcessedData) -> Self {
        let info = &data.personal_information;
        Self {
            name: or_not_available(info.name.as_deref()),
            email: or_not_available(info.email.as_deref()),
            phone: or_not_available(info.phone.as_deref()),
            location: or_not_available(info.location.as_deref()),
            ats_score: data.ats_score,
        }
    }
}

fn or_not_available(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

pub fn ranked_views(
    candidates: &[CombinedCandidate],
    calibration: &ScoreCalibration,
) -> Vec<RankedCandidateView> {
    candidates
        .iter()
        .enumerate()
        .map(|(index, candidate)| {
            let display_score = normalize_and_inflate(candidate.match_score, calibration);
            let data = candidate.processed_data();
            RankedCandidateView {
                rank: index + 1,
                name: candidate.name.clone(),
                match_score: candidate.match_score,
                display_score,
                tier: display_score.tier(),
                already_in_database: data.map(ProcessedData::is_already_stored).unwrap_or(false),
                has_details: data.is_some(),
                summary: data.map(CandidateSummary::from_processed),
                full_details: candidate.full_details.clone(),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidatePage {
    pub page: usize,
    pub per_page: usize,
    pub total_candidates: usize,
    pub total_pages: usize,
    pub candidates: Vec<RankedCandidateView>,
}

/// Slices `views` into 1-based pages. A page past the end is empty.
pub fn paginate(views: Vec<RankedCandidateView>, page: usize, per_page: usize) -> CandidatePage {
    let page = page.max(1);
    let per_page = per_page.max(1);
    let total_candidates = views.len();
    let total_pages = total_candidates.div_ceil(per_page);

    let candidates = views
        .into_iter()
        .skip((page - 1).saturating_mul(per_page))
        .take(per_page)
        .collect();

    CandidatePage {
        page,
        per_page,
        total_candidates,
        total_pages,
        candidates,
    }
}
