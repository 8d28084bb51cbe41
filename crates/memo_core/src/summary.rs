//! Summarization prompt and model-output parsing.
//!
//! # Responsibility
//! - Build the fixed instruction prompt sent to the generation API.
//! - Turn free-form model output into a `SummaryResult`.
//!
//! # Invariants
//! - `parse_summary_response` never fails; non-conforming output degrades to
//!   the raw text with no suggested tags.
//! - Only string entries survive in `suggested_tags`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

static JSON_OBJECT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("valid json object regex"));

/// Structured summarization output returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResult {
    /// Short natural-language summary.
    pub summary: String,
    /// Keyword tags proposed by the model.
    pub suggested_tags: Vec<String>,
}

/// Builds the summarization prompt for one memo body.
///
/// `language` names the language the summary and tags must be written in.
pub fn build_prompt(content: &str, language: &str) -> String {
    format!(
        "Analyze the memo below and answer in the following JSON format.\n\
         Output JSON only. Do not include any other text.\n\
         \n\
         {{\n  \"summary\": \"summary of the key points in {language}, 3 to 5 sentences\",\n  \
         \"suggestedTags\": [\"tag1\", \"tag2\", \"tag3\"]\n}}\n\
         \n\
         Rules:\n\
         - summary: a concise summary of the memo's key content, written in {language}\n\
         - suggestedTags: 3 to 5 keyword tags related to the memo, written in {language} \
         (short, clear words)\n\
         \n\
         ---\n\
         {content}\n\
         ---"
    )
}

/// Extracts `{summary, suggestedTags}` from raw model output.
///
/// The first `{` through the last `}` is parsed as JSON. A non-string
/// `summary` falls back to `raw`; a non-array `suggestedTags` becomes empty.
pub fn parse_summary_response(raw: &str) -> SummaryResult {
    let parsed = JSON_OBJECT_RE
        .find(raw)
        .and_then(|found| serde_json::from_str::<Value>(found.as_str()).ok());

    let Some(parsed) = parsed else {
        return fallback(raw);
    };

    let summary = parsed
        .get("summary")
        .and_then(Value::as_str)
        .map_or_else(|| raw.to_string(), str::to_string);
    let suggested_tags = parsed
        .get("suggestedTags")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    SummaryResult {
        summary,
        suggested_tags,
    }
}

fn fallback(raw: &str) -> SummaryResult {
    SummaryResult {
        summary: raw.to_string(),
        suggested_tags: Vec::new(),
    }
}
