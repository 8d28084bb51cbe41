//! HTTP service for the memo pad.
//!
//! Wires `memo_core` (storage, store, parsing) to an axum router and a
//! Gemini-backed summarizer.

pub mod config;
pub mod error;
pub mod generation;
pub mod routes;

pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ApiResult};
pub use generation::{GeminiClient, GenerationError, TextGenerator};
pub use routes::{router, AppState};

use log::{error, info};
use memo_core::db::{open_db, DbError};
use memo_core::{MemoStore, RepoError, SqliteMemoRepository};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("logging error: {0}")]
    Logging(String),
    #[error("database error: {0}")]
    Db(#[from] DbError),
    #[error("repository error: {0}")]
    Repo(#[from] RepoError),
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Starts logging for `config`: rolling files when a directory is set,
/// stderr otherwise.
pub fn init_logging(config: &ServerConfig) -> Result<(), StartupError> {
    match config.log_dir.as_deref() {
        Some(dir) => memo_core::init_logging(&config.log_level, dir),
        None => memo_core::init_stderr_logging(&config.log_level),
    }
    .map_err(StartupError::Logging)
}

/// Opens the database and loads the session store.
pub fn build_state(
    config: ServerConfig,
    generator: Arc<dyn TextGenerator>,
) -> Result<AppState, StartupError> {
    let conn = open_db(&config.db_path)?;
    let repo = SqliteMemoRepository::try_new(conn)?;
    let store = MemoStore::open(repo);
    Ok(AppState::new(config, store, generator))
}

/// Binds the configured address and serves until the process exits.
pub async fn serve(config: ServerConfig) -> Result<(), StartupError> {
    let generator: Arc<dyn TextGenerator> = Arc::new(GeminiClient::new(&config.gemini_api_base));
    let bind_addr = config.bind_addr;
    if config.gemini_api_key.is_none() {
        info!("event=server_start module=http status=degraded reason=gemini_api_key_missing");
    }

    let state = Arc::new(build_state(config, generator)?);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .inspect_err(|err| {
            error!("event=server_bind module=http status=error addr={bind_addr} error={err}")
        })?;
    info!("event=server_bind module=http status=ok addr={bind_addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
