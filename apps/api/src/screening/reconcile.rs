//! Identity reconciliation between parsed uploads and ranked candidates.
//!
//! The ranking service returns names only. Each name is matched against the
//! first line of every upload's raw text, case-insensitively. When several
//! uploads share a name, the first one in upload order wins.

use std::collections::HashMap;

use tracing::debug;

use crate::models::candidate::{CombinedCandidate, FullDetails, RankedCandidate};
use crate::models::resume::UploadedResumeRecord;

/// First line of the resume text, trimmed. Used as a best-effort identity key.
pub fn extract_name(raw_text: &str) -> &str {
    raw_text.split('\n').next().unwrap_or_default().trim()
}

/// Case-folded lookup key. Only the extracted upload name is trimmed; the
/// ranked name is compared as the ranking service sent it.
fn comparison_key(name: &str) -> Option<String> {
    if name.is_empty() {
        None
    } else {
        Some(name.to_lowercase())
    }
}

/// Merges ranked candidates with their uploads. Output order equals `ranked` order.
pub fn reconcile(
    uploads: &[UploadedResumeRecord],
    ranked: &[RankedCandidate],
) -> Vec<CombinedCandidate> {
    let mut by_name: HashMap<String, &UploadedResumeRecord> = HashMap::new();
    for upload in uploads {
        if let Some(key) = comparison_key(extract_name(&upload.raw_text)) {
            by_name.entry(key).or_insert(upload);
        }
    }

    let combined: Vec<CombinedCandidate> = ranked
        .iter()
        .map(|candidate| {
            let matched = comparison_key(&candidate.name).and_then(|key| by_name.get(&key));
            CombinedCandidate {
                name: candidate.name.clone(),
                match_score: candidate.match_score,
                full_details: matched.map(|upload| FullDetails::from(*upload)),
            }
        })
        .collect();

    debug!(
        uploads = uploads.len(),
        ranked = ranked.len(),
        matched = combined.iter().filter(|c| c.full_details.is_some()).count(),
        "reconciled ranking with uploads"
    );

    combined
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::ProcessedData;

    fn upload(file_name: &str, raw_text: &str) -> UploadedResumeRecord {
        UploadedResumeRecord {
            file_name: file_name.to_string(),
            raw_text: raw_text.to_string(),
            processed_data: ProcessedData::default(),
        }
    }

    fn ranked(name: &str, match_score: f64) -> RankedCandidate {
        RankedCandidate {
            name: name.to_string(),
            match_score,
        }
    }

    #[test]
    fn test_extract_name_takes_trimmed_first_line() {
        assert_eq!(extract_name("  Jane Doe \nEngineer"), "Jane Doe");
        assert_eq!(extract_name("Jane Doe\r\nEngineer"), "Jane Doe");
        assert_eq!(extract_name(""), "");
        assert_eq!(extract_name("\nJane Doe"), "");
    }

    #[test]
    fn test_case_insensitive_match_attaches_details() {
        let uploads = vec![upload("jane.pdf", "Jane Doe\nSenior Engineer")];
        let merged = reconcile(&uploads, &[ranked("jane doe", 18.0)]);

        assert_eq!(merged.len(), 1);
        let details = merged[0].full_details.as_ref().expect("details attached");
        assert_eq!(details.raw_text, "Jane Doe\nSenior Engineer");
        assert_eq!(merged[0].match_score, 18.0);
    }

    #[test]
    fn test_unmatched_candidate_has_no_details() {
        let uploads = vec![upload("jane.pdf", "Jane Doe\n...")];
        let merged = reconcile(&uploads, &[ranked("John Smith", 22.0)]);
        assert!(merged[0].full_details.is_none());
    }

    #[test]
    fn test_order_follows_ranking_not_uploads() {
        let uploads = vec![
            upload("a.pdf", "Alice\n"),
            upload("b.pdf", "Bob\n"),
            upload("c.pdf", "Carol\n"),
        ];
        let ranking = vec![ranked("Carol", 24.0), ranked("Alice", 12.0), ranked("Bob", 19.0)];
        let merged = reconcile(&uploads, &ranking);

        let names: Vec<&str> = merged.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Carol", "Alice", "Bob"]);
    }

    #[test]
    fn test_duplicate_names_resolve_to_first_upload() {
        let uploads = vec![
            upload("first.pdf", "Sam Lee\nfirst version"),
            upload("second.pdf", "SAM LEE\nsecond version"),
        ];
        let merged = reconcile(&uploads, &[ranked("Sam Lee", 20.0)]);
        assert_eq!(
            merged[0].full_details.as_ref().unwrap().raw_text,
            "Sam Lee\nfirst version"
        );
    }

    #[test]
    fn test_empty_names_never_match() {
        let uploads = vec![upload("blank.pdf", ""), upload("spaces.pdf", "   \nbody")];
        let merged = reconcile(&uploads, &[ranked("", 10.0), ranked("  ", 9.0)]);
        assert!(merged.iter().all(|c| c.full_details.is_none()));
    }

    #[test]
    fn test_ranked_entries_without_uploads_are_kept() {
        let merged = reconcile(&[], &[ranked("Stored Earlier", 21.0)]);
        assert_eq!(merged.len(), 1);
        assert!(merged[0].full_details.is_none());
    }

    #[test]
    fn test_candidate_name_is_not_trimmed() {
        let uploads = vec![upload("jane.pdf", "  Jane Doe \n")];
        let merged = reconcile(
            &uploads,
            &[ranked(" Jane Doe ", 18.0), ranked("JANE DOE", 17.0)],
        );
        assert!(merged[0].full_details.is_none());
        assert!(merged[1].full_details.is_some());
    }

    #[test]
    fn test_blank_candidate_name_never_matches() {
        let uploads = vec![upload("blank.pdf", "   \nno name here")];
        let merged = reconcile(&uploads, &[ranked("", 10.0), ranked("   ", 9.0)]);
        assert!(merged.iter().all(|c| c.full_details.is_none()));
    }
}
