use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use examdoc::{Document, Theme};

use crate::request::ExamRequest;

/// Body posted to the generation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub form_data: ExamRequest,
}

impl GenerateRequest {
    /// Wrap `form_data`, stamping it with the submission time and form version.
    pub fn new(mut form_data: ExamRequest, now: DateTime<Utc>) -> Self {
        form_data.stamp(now);
        GenerateRequest { form_data }
    }
}

/// Body returned by the generation endpoint: the editor document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub exam_json: Document,
}

impl GenerateResponse {
    /// Convert the model's markup answer into a response body.
    pub fn from_text(text: &str, theme: &Theme) -> Self {
        GenerateResponse {
            exam_json: examdoc::convert_with(text, theme),
        }
    }
}
