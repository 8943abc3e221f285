//! Wire types for Google Forms exports and their normalized form.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One raw response as returned by the Forms API responses endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormResponse {
    pub response_id: String,
    pub create_time: String,
    #[serde(default)]
    pub last_submitted_time: Option<String>,
    #[serde(default)]
    pub respondent_email: Option<String>,
    /// Keyed by opaque question id.
    #[serde(default)]
    pub answers: HashMap<String, FormAnswer>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormAnswer {
    pub question_id: String,
    #[serde(default)]
    pub text_answers: Option<TextAnswers>,
    #[serde(default)]
    pub file_upload_answers: Option<FileUploadAnswers>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextAnswers {
    #[serde(default)]
    pub answers: Vec<TextValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextValue {
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileUploadAnswers {
    #[serde(default)]
    pub answers: Vec<FileUploadValue>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileUploadValue {
    pub file_id: String,
    pub file_name: String,
    pub mime_type: String,
}

/// The form definition, used to resolve question ids to titles.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormStructure {
    pub form_id: String,
    pub info: FormInfo,
    #[serde(default)]
    pub items: Vec<FormItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FormInfo {
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormItem {
    pub item_id: String,
    pub title: String,
    #[serde(default)]
    pub question_item: Option<QuestionItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionItem {
    pub question: Question,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question_id: String,
    #[serde(default)]
    pub required: bool,
}

/// A response with question ids resolved and answer values flattened.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedResponse {
    pub response_id: String,
    pub timestamp: String,
    pub email: Option<String>,
    pub answers: Vec<NormalizedAnswer>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedAnswer {
    pub question: String,
    /// Zero values means the answer type was not representable as text.
    pub values: Vec<String>,
}
