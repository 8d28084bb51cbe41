//! Repository layer: the memo persistence gateway.
//!
//! # Responsibility
//! - Define the data access contract used by the memo store.
//! - Isolate SQLite query and row-mapping details from callers.
//!
//! # Invariants
//! - Write paths validate `MemoForm` before any SQL mutation.
//! - Store-level nulls never leak into `Memo`.

pub mod memo_repo;
