//! Session-level memo store.
//!
//! # Responsibility
//! - Hold the cached memo collection loaded from the gateway.
//! - Expose filtered/searched views and stats derived on demand.
//! - Dispatch mutations to the gateway and reconcile the cache with the
//!   returned rows.
//!
//! # Invariants
//! - The cache only changes after the gateway call it depends on succeeds.
//! - Created memos are prepended, matching newest-first ordering.
//! - Derived fields are cleared on update exactly when the content string
//!   differs from the cached one.
//! - The detail view never points at a memo that is no longer cached.

pub mod view;

use crate::model::memo::{Memo, MemoForm, MemoId};
use crate::repo::memo_repo::{MemoRepository, RepoError};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use view::{filter_memos, memo_stats, CategoryFilter, MemoQuery, MemoStats};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store error for session-level memo operations.
#[derive(Debug)]
pub enum StoreError {
    /// Gateway failure, passed through unchanged.
    Repo(RepoError),
    /// The memo is not in the loaded collection.
    NotCached(MemoId),
    /// The tag is not among the memo's suggested tags.
    NotSuggested { id: MemoId, tag: String },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::NotCached(id) => write!(f, "memo not loaded: {id}"),
            Self::NotSuggested { id, tag } => {
                write!(f, "tag `{tag}` is not a suggested tag of memo {id}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::NotCached(_) | Self::NotSuggested { .. } => None,
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// In-memory memo collection plus list/detail view state.
pub struct MemoStore<R: MemoRepository> {
    repo: R,
    memos: Vec<Memo>,
    loading: bool,
    query: MemoQuery,
    viewing: Option<MemoId>,
}

impl<R: MemoRepository> MemoStore<R> {
    /// Creates an empty store in the loading state; call `load` next.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            memos: Vec::new(),
            loading: true,
            query: MemoQuery::default(),
            viewing: None,
        }
    }

    /// Creates a store and loads the full collection.
    pub fn open(repo: R) -> Self {
        let mut store = Self::new(repo);
        store.load();
        store
    }

    /// Replaces the cache with the gateway's full list.
    ///
    /// Failures are logged and leave an empty collection; loading ends
    /// either way.
    pub fn load(&mut self) {
        self.loading = true;
        match self.repo.list() {
            Ok(memos) => {
                info!(
                    "event=memos_load module=store status=ok count={}",
                    memos.len()
                );
                self.memos = memos;
            }
            Err(err) => {
                error!("event=memos_load module=store status=error error={err}");
                self.memos.clear();
            }
        }
        self.loading = false;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// The whole cached collection, newest first.
    pub fn all_memos(&self) -> &[Memo] {
        &self.memos
    }

    /// The filtered and searched view.
    pub fn filtered(&self) -> Vec<&Memo> {
        filter_memos(&self.memos, &self.query)
    }

    pub fn stats(&self) -> MemoStats {
        memo_stats(&self.memos, self.filtered().len())
    }

    pub fn query(&self) -> &MemoQuery {
        &self.query
    }

    pub fn search_memos(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
    }

    pub fn filter_by_category(&mut self, category: CategoryFilter) {
        self.query.category = category;
    }

    pub fn get_memo_by_id(&self, id: MemoId) -> Option<&Memo> {
        self.memos.iter().find(|memo| memo.id == id)
    }

    pub fn create_memo(&mut self, form: &MemoForm) -> StoreResult<Memo> {
        let created = self.repo.create(form)?;
        info!("event=memo_create module=store status=ok id={}", created.id);
        self.memos.insert(0, created.clone());
        Ok(created)
    }

    /// Saves an edit, clearing derived fields when the content changed.
    pub fn update_memo(&mut self, id: MemoId, form: &MemoForm) -> StoreResult<Memo> {
        let existing = self.get_memo_by_id(id).ok_or(StoreError::NotCached(id))?;
        let content_changed = existing.content != form.content;

        let updated = self.repo.update(id, form, content_changed)?;
        info!(
            "event=memo_update module=store status=ok id={id} cleared_derived={content_changed}"
        );
        self.replace_cached(&updated);
        Ok(updated)
    }

    pub fn attach_summary(
        &mut self,
        id: MemoId,
        summary: &str,
        suggested_tags: &[String],
    ) -> StoreResult<Memo> {
        let updated = self.repo.attach_summary(id, summary, suggested_tags)?;
        self.replace_cached(&updated);
        Ok(updated)
    }

    pub fn replace_tags(&mut self, id: MemoId, tags: &[String]) -> StoreResult<Memo> {
        let updated = self.repo.replace_tags(id, tags)?;
        self.replace_cached(&updated);
        Ok(updated)
    }

    /// Appends one suggested tag unless the memo already carries it.
    ///
    /// # Errors
    /// - `NotSuggested` when `tag` is not in the memo's suggested tags.
    pub fn add_suggested_tag(&mut self, id: MemoId, tag: &str) -> StoreResult<Memo> {
        let existing = self.get_memo_by_id(id).ok_or(StoreError::NotCached(id))?;
        if existing.tags.iter().any(|current| current == tag) {
            return Ok(existing.clone());
        }
        let suggested = existing.suggested_tags.as_deref().unwrap_or_default();
        if !suggested.iter().any(|candidate| candidate == tag) {
            return Err(StoreError::NotSuggested {
                id,
                tag: tag.to_string(),
            });
        }

        let mut tags = existing.tags.clone();
        tags.push(tag.to_string());
        self.replace_tags(id, &tags)
    }

    /// Appends every suggested tag the memo does not carry yet.
    pub fn add_all_suggested_tags(&mut self, id: MemoId) -> StoreResult<Memo> {
        let existing = self.get_memo_by_id(id).ok_or(StoreError::NotCached(id))?;
        let pending = existing.pending_suggested_tags();
        if pending.is_empty() {
            return Ok(existing.clone());
        }

        let mut tags = existing.tags.clone();
        tags.extend(pending);
        self.replace_tags(id, &tags)
    }

    /// Deletes through the gateway, then drops the memo from the cache.
    pub fn delete_memo(&mut self, id: MemoId) -> StoreResult<()> {
        self.repo.delete(id)?;
        self.memos.retain(|memo| memo.id != id);
        if self.viewing == Some(id) {
            self.viewing = None;
        }
        info!("event=memo_delete module=store status=ok id={id}");
        Ok(())
    }

    /// Opens the detail view for a cached memo.
    pub fn open_memo(&mut self, id: MemoId) -> Option<&Memo> {
        self.viewing = self.get_memo_by_id(id).map(|memo| memo.id);
        self.viewing()
    }

    pub fn close_memo(&mut self) {
        self.viewing = None;
    }

    /// The memo shown in the detail view, reflecting the latest cached row.
    pub fn viewing(&self) -> Option<&Memo> {
        self.viewing.and_then(|id| self.get_memo_by_id(id))
    }

    fn replace_cached(&mut self, updated: &Memo) {
        if let Some(slot) = self.memos.iter_mut().find(|memo| memo.id == updated.id) {
            *slot = updated.clone();
        }
    }
}
