//! Domain model for memos.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//!
//! # Invariants
//! - Every memo is identified by a stable `MemoId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod memo;
