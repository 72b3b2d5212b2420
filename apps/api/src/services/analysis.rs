//! Decoding of service reply bodies that come in more than one shape.

use serde_json::Value;

use crate::models::analysis::CandidateAnalysis;
use crate::services::{AnalysisError, ServiceError};

/// Decodes the analysis endpoint's reply.
///
/// `analysis` may be an object or a JSON string (sometimes fenced in markdown).
/// A reply without `analysis` but with `error` is the service's own rejection.
pub fn decode_analysis(body: Value) -> Result<CandidateAnalysis, AnalysisError> {
    match body.get("analysis") {
        Some(Value::String(text)) => serde_json::from_str(strip_json_fences(text))
            .map_err(|e| AnalysisError::Parse(e.to_string())),
        Some(value @ Value::Object(_)) => serde_json::from_value(value.clone())
            .map_err(|e| AnalysisError::Parse(e.to_string())),
        Some(Value::Null) | None => match body.get("error").and_then(Value::as_str) {
            Some(error) => Err(AnalysisError::Reported(error.to_string())),
            None => Err(AnalysisError::Parse(
                "response contained neither analysis nor error".to_string(),
            )),
        },
        Some(other) => Err(AnalysisError::Parse(format!(
            "unexpected analysis payload: {other}"
        ))),
    }
}

/// Decodes the confirmation-email reply into the service's message.
pub fn decode_email_reply(body: Value) -> Result<String, ServiceError> {
    if let Some(message) = body.get("message").and_then(Value::as_str) {
        return Ok(message.to_string());
    }
    let error = body
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or("Email sent but no confirmation received");
    Err(ServiceError::Rejected(error.to_string()))
}

/// Picks the most specific human-readable message out of an error body.
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            ["detail", "message", "error"]
                .iter()
                .find_map(|key| json.get(*key).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| body.to_string())
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));
    match inner {
        Some(stripped) => {
            let stripped = stripped.trim_start();
            stripped
                .strip_suffix("```")
                .map(str::trim)
                .unwrap_or(stripped)
        }
        None => text,
    }
}
