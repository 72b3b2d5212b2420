use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::null_as_default;

/// Note the parsing service attaches when the uploaded resume was already stored.
pub const ALREADY_EXISTS_NOTE: &str = "Resume already exists in database";

/// Placeholder shown for any personal field the parser did not extract.
pub const NOT_AVAILABLE: &str = "N/A";

/// Skill category → skills listed under it.
pub type SkillsMap = BTreeMap<String, Vec<String>>;

/// One successfully parsed upload. Lives only as long as the batch it came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadedResumeRecord {
    pub file_name: String,
    pub raw_text: String,
    pub processed_data: ProcessedData,
}

impl UploadedResumeRecord {
    pub fn already_in_database(&self) -> bool {
        self.processed_data.is_already_stored()
    }
}

/// Body returned by the parsing endpoint for a single file.
#[derive(Debug, Clone, Deserialize)]
pub struct ParseReply {
    #[serde(default, deserialize_with = "null_as_default")]
    pub raw_text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub processed_data: ProcessedData,
}

impl ParseReply {
    pub fn into_record(self, file_name: String) -> UploadedResumeRecord {
        UploadedResumeRecord {
            file_name,
            raw_text: self.raw_text,
            processed_data: self.processed_data,
        }
    }
}

/// Structured fields extracted from a resume.
/// Every section is optional upstream; absent sections deserialize empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProcessedData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub personal_information: PersonalInformation,
    #[serde(default, deserialize_with = "null_as_default")]
    pub education: Vec<EducationEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub work_experience: Vec<WorkExperienceEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: SkillsMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ats_score: Option<f64>,
    /// Fields this service does not interpret, kept so they reach the analysis
    /// and email services unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProcessedData {
    pub fn is_already_stored(&self) -> bool {
        self.note.as_deref() == Some(ALREADY_EXISTS_NOTE)
    }

    pub fn skills_in(&self, category: &str) -> &[String] {
        self.skills.get(category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn email(&self) -> Option<&str> {
        self.personal_information
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PersonalInformation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EducationEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WorkExperienceEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Free text, usually "<Month> <Year>".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// `None` or empty means the position is current.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
