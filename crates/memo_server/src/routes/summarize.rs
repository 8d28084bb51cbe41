//! Stateless memo summarization.
//!
//! Checks run in a fixed order: credential, body syntax, content, then the
//! generation call. Nothing is persisted here; clients attach the result
//! through `PUT /api/memos/:id/summary`.

use super::AppState;
use crate::error::{ApiError, ApiResult};
use axum::body::Bytes;
use axum::extract::State;
use axum::response::Json;
use log::info;
use memo_core::{build_prompt, parse_summary_response, SummaryResult};
use serde_json::Value;
use std::sync::Arc;

const MISSING_KEY_MESSAGE: &str = "GEMINI_API_KEY is not configured";
const MISSING_CONTENT_MESSAGE: &str = "memo content is required";
const FALLBACK_FAILURE_MESSAGE: &str = "summarization failed";

// POST /api/summarize
pub async fn summarize(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<SummaryResult>> {
    let api_key = state
        .config
        .gemini_api_key
        .as_deref()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| ApiError::Configuration(MISSING_KEY_MESSAGE.to_string()))?;

    let payload: Value =
        serde_json::from_slice(&body).map_err(|err| ApiError::Internal(err.to_string()))?;
    let content = payload
        .get("content")
        .and_then(Value::as_str)
        .filter(|content| !content.is_empty())
        .ok_or_else(|| ApiError::Validation(MISSING_CONTENT_MESSAGE.to_string()))?;

    let prompt = build_prompt(content, &state.config.summary_language);
    let model = state.config.gemini_model.as_str();
    let raw = state
        .generator
        .generate(api_key, model, &prompt)
        .await
        .map_err(|err| {
            let message = err.to_string();
            if message.is_empty() {
                ApiError::Upstream(FALLBACK_FAILURE_MESSAGE.to_string())
            } else {
                ApiError::Upstream(message)
            }
        })?;

    let result = parse_summary_response(&raw);
    info!(
        "event=summarize module=http status=ok model={model} tags={}",
        result.suggested_tags.len()
    );
    Ok(Json(result))
}
