//! Memo CRUD over the session store.
//!
//! Every handler locks the store, runs one synchronous store call and
//! releases the lock before responding.

use super::AppState;
use crate::error::{ApiError, ApiResult};
use axum::body::Bytes;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use memo_core::markdown::preview_text;
use memo_core::{CategoryFilter, Memo, MemoForm, MemoId, MemoStats, SummaryResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const PREVIEW_CHARS: usize = 120;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub q: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MemoListItem {
    #[serde(flatten)]
    pub memo: Memo,
    /// Plain-text excerpt of the content.
    pub preview: String,
}

#[derive(Debug, Serialize)]
pub struct MemoListResponse {
    pub memos: Vec<MemoListItem>,
    pub stats: MemoStats,
}

#[derive(Debug, Deserialize)]
pub struct TagsRequest {
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdoptTagRequest {
    pub tag: String,
}

fn memo_id(path: Result<Path<MemoId>, PathRejection>) -> ApiResult<MemoId> {
    path.map(|Path(id)| id)
        .map_err(|rejection| ApiError::Validation(rejection.body_text()))
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::Validation(rejection.body_text()))
}

// GET /api/memos?q=&category=
pub async fn list_memos(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<MemoListResponse>> {
    let category = params
        .category
        .as_deref()
        .map(str::parse::<CategoryFilter>)
        .transpose()
        .map_err(|err| ApiError::Validation(err.to_string()))?;

    let mut store = state.lock_store()?;
    if let Some(search) = params.q {
        store.search_memos(search);
    }
    if let Some(category) = category {
        store.filter_by_category(category);
    }

    let memos = store
        .filtered()
        .into_iter()
        .map(|memo| MemoListItem {
            preview: preview_text(&memo.content, PREVIEW_CHARS),
            memo: memo.clone(),
        })
        .collect();
    Ok(Json(MemoListResponse {
        memos,
        stats: store.stats(),
    }))
}

// POST /api/memos
pub async fn create_memo(
    State(state): State<Arc<AppState>>,
    body: Result<Json<MemoForm>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Memo>)> {
    let form = json_body(body)?;
    let created = state.lock_store()?.create_memo(&form)?;
    Ok((StatusCode::CREATED, Json(created)))
}

// GET /api/memos/:id
pub async fn get_memo(
    State(state): State<Arc<AppState>>,
    path: Result<Path<MemoId>, PathRejection>,
) -> ApiResult<Json<Memo>> {
    let id = memo_id(path)?;
    let memo = state.lock_store()?.get_memo_by_id(id).cloned();
    memo.map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("memo not found: {id}")))
}

// PUT /api/memos/:id
pub async fn update_memo(
    State(state): State<Arc<AppState>>,
    path: Result<Path<MemoId>, PathRejection>,
    body: Result<Json<MemoForm>, JsonRejection>,
) -> ApiResult<Json<Memo>> {
    let id = memo_id(path)?;
    let form = json_body(body)?;
    let updated = state.lock_store()?.update_memo(id, &form)?;
    Ok(Json(updated))
}

// DELETE /api/memos/:id
pub async fn delete_memo(
    State(state): State<Arc<AppState>>,
    path: Result<Path<MemoId>, PathRejection>,
) -> ApiResult<StatusCode> {
    let id = memo_id(path)?;
    state.lock_store()?.delete_memo(id)?;
    Ok(StatusCode::NO_CONTENT)
}

// PUT /api/memos/:id/tags
pub async fn replace_tags(
    State(state): State<Arc<AppState>>,
    path: Result<Path<MemoId>, PathRejection>,
    body: Result<Json<TagsRequest>, JsonRejection>,
) -> ApiResult<Json<Memo>> {
    let id = memo_id(path)?;
    let request = json_body(body)?;
    let updated = state.lock_store()?.replace_tags(id, &request.tags)?;
    Ok(Json(updated))
}

// POST /api/memos/:id/tags/suggested
//
// With `{"tag": ...}` adopts one suggestion; an empty body adopts them all.
// Any other body is rejected rather than read as "all".
pub async fn adopt_suggested_tags(
    State(state): State<Arc<AppState>>,
    path: Result<Path<MemoId>, PathRejection>,
    body: Bytes,
) -> ApiResult<Json<Memo>> {
    let id = memo_id(path)?;
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        let request: AdoptTagRequest = serde_json::from_slice(&body)
            .map_err(|err| ApiError::Validation(format!("invalid tag request: {err}")))?;
        Some(request)
    };

    let mut store = state.lock_store()?;
    let updated = match request {
        Some(request) => store.add_suggested_tag(id, &request.tag)?,
        None => store.add_all_suggested_tags(id)?,
    };
    Ok(Json(updated))
}

// PUT /api/memos/:id/summary
pub async fn attach_summary(
    State(state): State<Arc<AppState>>,
    path: Result<Path<MemoId>, PathRejection>,
    body: Result<Json<SummaryResult>, JsonRejection>,
) -> ApiResult<Json<Memo>> {
    let id = memo_id(path)?;
    let result = json_body(body)?;
    let updated = state
        .lock_store()?
        .attach_summary(id, &result.summary, &result.suggested_tags)?;
    Ok(Json(updated))
}
