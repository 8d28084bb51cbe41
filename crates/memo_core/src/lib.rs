//! Core domain logic for the memo pad.
//! This crate is the single source of truth for memo invariants.

pub mod db;
pub mod logging;
pub mod markdown;
pub mod model;
pub mod repo;
pub mod store;
pub mod summary;

pub use logging::{
    default_log_level, init_logging, init_stderr_logging, logging_status, LogTarget,
};
pub use markdown::strip_markdown;
pub use model::memo::{Memo, MemoCategory, MemoForm, MemoId, MemoValidationError};
pub use repo::memo_repo::{MemoRepository, RepoError, RepoResult, SqliteMemoRepository};
pub use store::view::{CategoryFilter, MemoQuery, MemoStats};
pub use store::{MemoStore, StoreError, StoreResult};
pub use summary::{build_prompt, parse_summary_response, SummaryResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
