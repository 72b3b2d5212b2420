//! Side-by-side comparison of exactly two ranked candidates.

use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, Utc};
use serde::Serialize;

use crate::models::candidate::CombinedCandidate;
use crate::models::resume::ProcessedData;
use crate::screening::experience::experience_years;
use crate::screening::score::{normalize_and_inflate, DisplayScore, ScoreCalibration};

pub const COMPARISON_GUIDANCE: &str = "Please select exactly 2 candidates to compare";

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Comparison {
    Ready(ComparisonReport),
    Unavailable { guidance: String },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ComparisonReport {
    pub candidates: [CandidateAggregate; 2],
    pub categories: Vec<CategoryComparison>,
}

/// Per-candidate numbers behind the comparison charts.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CandidateAggregate {
    pub name: String,
    #[serde(rename = "match")]
    pub match_score: f64,
    pub display_score: DisplayScore,
    pub skill_counts: BTreeMap<String, usize>,
    pub experience_years: i64,
    pub education_count: usize,
}

/// Union of both candidates' skills in one category.
/// `has_skill[i][j]` tells whether candidate `i` lists `skills[j]`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryComparison {
    pub category: String,
    pub skills: Vec<String>,
    pub has_skill: [Vec<bool>; 2],
}

pub fn compare_candidates(
    candidates: &[CombinedCandidate],
    calibration: &ScoreCalibration,
) -> Comparison {
    let [first, second] = candidates else {
        return Comparison::Unavailable {
            guidance: COMPARISON_GUIDANCE.to_string(),
        };
    };
    Comparison::Ready(build_report(first, second, calibration, current_year()))
}

fn current_year() -> i32 {
    Utc::now().year()
}

fn build_report(
    first: &CombinedCandidate,
    second: &CombinedCandidate,
    calibration: &ScoreCalibration,
    current_year: i32,
) -> ComparisonReport {
    let empty = ProcessedData::default();
    let data = [
        first.processed_data().unwrap_or(&empty),
        second.processed_data().unwrap_or(&empty),
    ];

    let categories = ordered_union(data.iter().flat_map(|d| d.skills.keys()))
        .into_iter()
        .map(|category| {
            let skills =
                ordered_union(data.iter().flat_map(|d| d.skills_in(&category).iter()));
            let has_skill = data.map(|d| {
                let listed = d.skills_in(&category);
                skills.iter().map(|s| listed.contains(s)).collect::<Vec<bool>>()
            });
            CategoryComparison {
                category,
                skills,
                has_skill,
            }
        })
        .collect();

    ComparisonReport {
        candidates: [
            aggregate(first, data[0], calibration, current_year),
            aggregate(second, data[1], calibration, current_year),
        ],
        categories,
    }
}

fn aggregate(
    candidate: &CombinedCandidate,
    data: &ProcessedData,
    calibration: &ScoreCalibration,
    current_year: i32,
) -> CandidateAggregate {
    CandidateAggregate {
        name: candidate.name.clone(),
        match_score: candidate.match_score,
        display_score: normalize_and_inflate(candidate.match_score, calibration),
        skill_counts: data
            .skills
            .iter()
            .map(|(category, skills)| (category.clone(), skills.len()))
            .collect(),
        experience_years: experience_years(&data.work_experience, current_year),
        education_count: data.education.len(),
    }
}

/// Deduplicates while keeping first-seen order.
fn ordered_union<'a>(items: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .filter(|item| seen.insert(*item))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidate::FullDetails;
    use crate::models::resume::{EducationEntry, WorkExperienceEntry};

    fn candidate(name: &str, match_score: f64, skills: &[(&str, &[&str])]) -> CombinedCandidate {
        let mut data = ProcessedData::default();
        for (category, list) in skills {
            data.skills.insert(
                category.to_string(),
                list.iter().map(|s| s.to_string()).collect(),
            );
        }
        CombinedCandidate {
            name: name.to_string(),
            match_score,
            full_details: Some(FullDetails {
                raw_text: format!("{name}\n"),
                processed_data: data,
            }),
        }
    }

    fn report(candidates: &[CombinedCandidate]) -> ComparisonReport {
        match compare_candidates(candidates, &ScoreCalibration::default()) {
            Comparison::Ready(report) => report,
            Comparison::Unavailable { guidance } => panic!("unexpected: {guidance}"),
        }
    }

    #[test]
    fn test_skill_union_and_presence() {
        let a = candidate("A", 18.0, &[("languages", &["Go"])]);
        let b = candidate("B", 21.0, &[("languages", &["Go", "Rust"])]);
        let report = report(&[a, b]);

        assert_eq!(report.categories.len(), 1);
        let languages = &report.categories[0];
        assert_eq!(languages.category, "languages");
        assert_eq!(languages.skills, vec!["Go", "Rust"]);
        assert_eq!(languages.has_skill[0], vec![true, false]);
        assert_eq!(languages.has_skill[1], vec![true, true]);
    }

    #[test]
    fn test_category_union_covers_both_sides() {
        let a = candidate("A", 18.0, &[("languages", &["Go"]), ("cloud", &["AWS"])]);
        let b = candidate("B", 21.0, &[("databases", &["Postgres"])]);
        let report = report(&[a, b]);

        let categories: Vec<&str> = report.categories.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(categories, vec!["cloud", "languages", "databases"]);
        let databases = &report.categories[2];
        assert_eq!(databases.has_skill, [vec![false], vec![true]]);
    }

    #[test]
    fn test_skill_presence_is_case_sensitive() {
        let a = candidate("A", 18.0, &[("languages", &["rust"])]);
        let b = candidate("B", 21.0, &[("languages", &["Rust"])]);
        let report = report(&[a, b]);

        assert_eq!(report.categories[0].skills, vec!["rust", "Rust"]);
        assert_eq!(report.categories[0].has_skill[0], vec![true, false]);
    }

    #[test]
    fn test_duplicate_skills_collapse() {
        let a = candidate("A", 18.0, &[("languages", &["Go", "Go"])]);
        let b = candidate("B", 21.0, &[("languages", &["Go"])]);
        assert_eq!(report(&[a, b]).categories[0].skills, vec!["Go"]);
    }

    #[test]
    fn test_candidate_without_details_compares_as_empty() {
        let a = candidate("A", 18.0, &[("languages", &["Go"])]);
        let b = CombinedCandidate {
            name: "Unknown".to_string(),
            match_score: 11.0,
            full_details: None,
        };
        let report = report(&[a, b]);

        assert_eq!(report.categories[0].has_skill[1], vec![false]);
        assert!(report.candidates[1].skill_counts.is_empty());
        assert_eq!(report.candidates[1].experience_years, 0);
    }

    #[test]
    fn test_aggregates() {
        let mut a = candidate("A", 20.0, &[("languages", &["Go", "Rust"]), ("cloud", &["GCP"])]);
        {
            let data = &mut a.full_details.as_mut().unwrap().processed_data;
            data.education.push(EducationEntry::default());
            data.education.push(EducationEntry::default());
            data.work_experience.push(WorkExperienceEntry {
                start_date: Some("Jan 2016".to_string()),
                end_date: Some("Jan 2020".to_string()),
                ..Default::default()
            });
        }
        let b = candidate("B", 25.0, &[]);
        let report = build_report(&a, &b, &ScoreCalibration::default(), 2026);

        let first = &report.candidates[0];
        assert_eq!(first.skill_counts.get("languages"), Some(&2));
        assert_eq!(first.skill_counts.get("cloud"), Some(&1));
        assert_eq!(first.education_count, 2);
        assert_eq!(first.experience_years, 4);
        assert_eq!(first.display_score.value(), 73);
        assert_eq!(report.candidates[1].display_score.value(), 95);
        assert_eq!(report.candidates[1].match_score, 25.0);
    }

    #[test]
    fn test_wrong_count_returns_guidance() {
        let a = candidate("A", 18.0, &[]);
        for selection in [vec![], vec![a.clone()], vec![a.clone(), a.clone(), a]] {
            assert_eq!(
                compare_candidates(&selection, &ScoreCalibration::default()),
                Comparison::Unavailable {
                    guidance: COMPARISON_GUIDANCE.to_string()
                }
            );
        }
    }
}
