//! Axum routes for the memo HTTP API.

pub mod health;
pub mod memos;
pub mod summarize;

use crate::config::ServerConfig;
use crate::error::{ApiError, ApiResult};
use crate::generation::TextGenerator;
use axum::routing::{get, post, put};
use axum::Router;
use memo_core::{MemoStore, SqliteMemoRepository};
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::cors::CorsLayer;

pub type SharedStore = Mutex<MemoStore<SqliteMemoRepository>>;

pub struct AppState {
    pub config: ServerConfig,
    /// Locked for synchronous work only, never across an `.await`.
    pub store: SharedStore,
    pub generator: Arc<dyn TextGenerator>,
}

impl AppState {
    pub fn new(
        config: ServerConfig,
        store: MemoStore<SqliteMemoRepository>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            config,
            store: Mutex::new(store),
            generator,
        }
    }

    pub(crate) fn lock_store(&self) -> ApiResult<MutexGuard<'_, MemoStore<SqliteMemoRepository>>> {
        self.store
            .lock()
            .map_err(|_| ApiError::Internal("memo store lock poisoned".to_string()))
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/summarize", post(summarize::summarize))
        .route("/api/memos", get(memos::list_memos).post(memos::create_memo))
        .route(
            "/api/memos/:id",
            get(memos::get_memo)
                .put(memos::update_memo)
                .delete(memos::delete_memo),
        )
        .route("/api/memos/:id/tags", put(memos::replace_tags))
        .route(
            "/api/memos/:id/tags/suggested",
            post(memos::adopt_suggested_tags),
        )
        .route("/api/memos/:id/summary", put(memos::attach_summary))
        .with_state(state)
        .layer(CorsLayer::permissive())
}
