//! Per-question statistics over normalized form responses.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use crate::forms::types::NormalizedResponse;

/// How a question's answers should be summarized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Categorical,
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

/// Summary for one question across all responses.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionStat {
    pub question: String,
    pub total: usize,
    pub kind: QuestionKind,
    /// Per-value counts, categorical questions only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counts: Option<BTreeMap<String, usize>>,
    /// Raw answers, free-text questions only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_answers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common_words: Option<Vec<WordCount>>,
}

static SPANISH_STOPWORDS: &[&str] = &[
    "de", "la", "que", "el", "en", "y", "a", "los", "del", "se", "las", "por", "un", "para",
    "con", "no", "una", "su", "al", "lo", "como", "más", "pero", "sus", "le", "ya", "o", "este",
    "sí", "porque", "esta", "entre", "cuando", "muy", "sin", "sobre", "también", "me", "hasta",
    "hay", "donde", "quien", "desde", "todo", "nos", "durante", "todos", "uno", "les", "ni",
    "contra", "otros", "ese", "eso", "ante", "ellos", "e", "esto", "mí", "antes", "algunos",
    "qué", "unos", "yo", "otro", "otras", "otra", "él", "tanto", "esa", "estos", "mucho",
    "quienes", "nada", "muchos", "cual", "poco", "ella", "estar", "estas", "algunas", "algo",
    "nosotros", "mi", "mis", "tú", "te", "ti", "es", "son", "ser", "era", "estaba", "fui",
];

const PUNCTUATION: &[char] = &[
    '.', ',', '/', '#', '!', '$', '%', '^', '&', '*', ';', ':', '{', '}', '=', '-', '_', '`',
    '~', '(', ')',
];

/// Computes per-question statistics from normalized responses.
///
/// Answers are grouped by question title (blank values skipped), then each
/// question is classified: free-text if its answers average over 30
/// characters, or are mostly unique and not trivially short; categorical
/// otherwise. Questions appear in first-seen order.
pub fn question_stats(responses: &[NormalizedResponse]) -> Vec<QuestionStat> {
    let mut questions: Vec<(String, Vec<String>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for response in responses {
        for answer in &response.answers {
            let i = match index.get(answer.question.as_str()) {
                Some(&i) => i,
                None => {
                    questions.push((answer.question.clone(), Vec::new()));
                    index.insert(answer.question.as_str(), questions.len() - 1);
                    questions.len() - 1
                }
            };

            for value in &answer.values {
                let trimmed = value.trim();
                if !trimmed.is_empty() {
                    questions[i].1.push(trimmed.to_string());
                }
            }
        }
    }

    questions
        .into_iter()
        .map(|(question, answers)| summarize(question, answers))
        .collect()
}

fn summarize(question: String, answers: Vec<String>) -> QuestionStat {
    let total = answers.len();

    let total_chars: usize = answers.iter().map(|a| a.chars().count()).sum();
    let avg_length = if total == 0 {
        0.0
    } else {
        total_chars as f64 / total as f64
    };

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for answer in &answers {
        *counts.entry(answer.clone()).or_default() += 1;
    }
    let uniqueness_ratio = if total == 0 {
        0.0
    } else {
        counts.len() as f64 / total as f64
    };

    // Long answers, or mostly-unique non-trivial ones, read as free text.
    // A low uniqueness ratio means many respondents chose the same value.
    let is_text = avg_length > 30.0 || (uniqueness_ratio > 0.5 && avg_length > 5.0);

    if is_text {
        let common_words = common_words(&answers);
        QuestionStat {
            question,
            total,
            kind: QuestionKind::Text,
            counts: None,
            text_answers: Some(answers),
            common_words: Some(common_words),
        }
    } else {
        QuestionStat {
            question,
            total,
            kind: QuestionKind::Categorical,
            counts: Some(counts),
            text_answers: None,
            common_words: None,
        }
    }
}

/// Top-10 words across the given texts: lowercased, punctuation stripped,
/// longer than 3 characters, Spanish stopwords removed. Ordered by count
/// descending, then alphabetically.
fn common_words(texts: &[String]) -> Vec<WordCount> {
    let stopwords: HashSet<&str> = SPANISH_STOPWORDS.iter().copied().collect();
    let mut word_counts: HashMap<String, usize> = HashMap::new();

    for text in texts {
        let cleaned: String = text
            .to_lowercase()
            .chars()
            .map(|c| if PUNCTUATION.contains(&c) { ' ' } else { c })
            .collect();

        for word in cleaned.split_whitespace() {
            if word.chars().count() > 3 && !stopwords.contains(word) {
                *word_counts.entry(word.to_string()).or_default() += 1;
            }
        }
    }

    let mut words: Vec<WordCount> = word_counts
        .into_iter()
        .map(|(word, count)| WordCount { word, count })
        .collect();

    words.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
    words.truncate(10);
    words
}
