//! Memo domain model.
//!
//! # Responsibility
//! - Define the canonical memo record and the user-submitted form.
//! - Validate form input before it reaches persistence.
//!
//! # Invariants
//! - `id` and `created_at` never change after creation.
//! - `summary` and `suggested_tags` are either both derived from the current
//!   content or cleared together.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier for a memo.
pub type MemoId = Uuid;

/// Fixed set of memo categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoCategory {
    Personal,
    Work,
    Study,
    Idea,
    Other,
}

impl MemoCategory {
    /// All categories in display order.
    pub const ALL: [MemoCategory; 5] = [
        MemoCategory::Personal,
        MemoCategory::Work,
        MemoCategory::Study,
        MemoCategory::Idea,
        MemoCategory::Other,
    ];

    /// Storage and wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Work => "work",
            Self::Study => "study",
            Self::Idea => "idea",
            Self::Other => "other",
        }
    }
}

impl Display for MemoCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemoCategory {
    type Err = MemoValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
            .ok_or_else(|| MemoValidationError::UnknownCategory(value.to_string()))
    }
}

/// Validation failures for user-submitted memo input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoValidationError {
    EmptyTitle,
    EmptyContent,
    UnknownCategory(String),
}

impl Display for MemoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "memo title cannot be empty"),
            Self::EmptyContent => write!(f, "memo content cannot be empty"),
            Self::UnknownCategory(value) => write!(f, "unknown memo category: `{value}`"),
        }
    }
}

impl Error for MemoValidationError {}

/// Canonical memo record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memo {
    pub id: MemoId,
    pub title: String,
    /// Markdown source text.
    pub content: String,
    pub category: MemoCategory,
    /// Display order is preserved; duplicates are allowed.
    pub tags: Vec<String>,
    /// Absent until a summary is attached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Absent until a summary is attached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_tags: Option<Vec<String>>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds, refreshed on every mutation.
    pub updated_at: i64,
}

impl Memo {
    /// Returns suggested tags that are not already attached to the memo.
    pub fn pending_suggested_tags(&self) -> Vec<String> {
        self.suggested_tags
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter(|tag| !self.tags.contains(tag))
            .cloned()
            .collect()
    }

    /// Returns whether a summary has been generated and saved.
    pub fn has_summary(&self) -> bool {
        self.summary.as_deref().is_some_and(|value| !value.is_empty())
    }
}

/// User-submitted fields for create and edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoForm {
    pub title: String,
    pub content: String,
    pub category: MemoCategory,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl MemoForm {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        category: MemoCategory,
        tags: Vec<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            category,
            tags,
        }
    }

    /// Checks required fields.
    ///
    /// # Errors
    /// - `EmptyTitle` when the title is blank.
    /// - `EmptyContent` when the content is blank.
    pub fn validate(&self) -> Result<(), MemoValidationError> {
        if self.title.trim().is_empty() {
            return Err(MemoValidationError::EmptyTitle);
        }
        if self.content.trim().is_empty() {
            return Err(MemoValidationError::EmptyContent);
        }
        Ok(())
    }
}
