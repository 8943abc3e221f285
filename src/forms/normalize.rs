//! Resolves raw form responses against the form structure.

use std::collections::BTreeMap;

use crate::forms::types::{
    FormAnswer, FormResponse, FormStructure, NormalizedAnswer, NormalizedResponse,
};

/// Normalizes one raw response.
///
/// Answers are emitted in the order their questions appear in the form
/// structure; answers for ids missing from the structure come last, sorted
/// by id, under a `"Pregunta <id>"` fallback label. The timestamp prefers
/// `last_submitted_time` over `create_time`.
pub fn normalize_response(
    response: &FormResponse,
    structure: &FormStructure,
) -> NormalizedResponse {
    let mut answers = Vec::new();

    for item in &structure.items {
        let Some(question_item) = &item.question_item else {
            continue;
        };
        if let Some(answer) = response.answers.get(&question_item.question.question_id) {
            answers.push(NormalizedAnswer {
                question: item.title.clone(),
                values: answer_values(answer),
            });
        }
    }

    let known: std::collections::HashSet<&str> = structure
        .items
        .iter()
        .filter_map(|i| i.question_item.as_ref())
        .map(|q| q.question.question_id.as_str())
        .collect();

    let mut unknown: Vec<&FormAnswer> = response
        .answers
        .values()
        .filter(|a| !known.contains(a.question_id.as_str()))
        .collect();
    unknown.sort_by(|a, b| a.question_id.cmp(&b.question_id));

    for answer in unknown {
        answers.push(NormalizedAnswer {
            question: format!("Pregunta {}", answer.question_id),
            values: answer_values(answer),
        });
    }

    let timestamp = response
        .last_submitted_time
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or(&response.create_time)
        .to_string();

    NormalizedResponse {
        response_id: response.response_id.clone(),
        timestamp,
        email: response.respondent_email.clone(),
        answers,
    }
}

/// Normalizes a batch of responses against one structure.
pub fn normalize_all(
    responses: &[FormResponse],
    structure: &FormStructure,
) -> Vec<NormalizedResponse> {
    responses
        .iter()
        .map(|r| normalize_response(r, structure))
        .collect()
}

/// Flattens normalized responses into one row per response, with multi-value
/// answers joined by `", "`. Suitable for CSV export or table rendering.
pub fn to_tabular(normalized: &[NormalizedResponse]) -> Vec<BTreeMap<String, String>> {
    normalized
        .iter()
        .map(|response| {
            let mut row = BTreeMap::new();
            row.insert("response_id".to_string(), response.response_id.clone());
            row.insert("timestamp".to_string(), response.timestamp.clone());
            row.insert(
                "email".to_string(),
                response.email.clone().unwrap_or_else(|| "N/A".to_string()),
            );

            for answer in &response.answers {
                row.insert(answer.question.clone(), answer.values.join(", "));
            }

            row
        })
        .collect()
}

fn answer_values(answer: &FormAnswer) -> Vec<String> {
    if let Some(text) = &answer.text_answers {
        return text.answers.iter().map(|a| a.value.clone()).collect();
    }
    if let Some(files) = &answer.file_upload_answers {
        return files
            .answers
            .iter()
            .map(|f| format!("{} ({})", f.file_name, f.file_id))
            .collect();
    }
    Vec::new()
}
