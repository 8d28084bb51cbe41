//! Memo repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide list/get/create/update/delete plus the two partial writes
//!   (summary attachment, tag replacement) over the `memos` table.
//! - Map rows to `Memo`, collapsing nullable columns.
//!
//! # Invariants
//! - `create` stamps `created_at == updated_at`.
//! - Every mutating write refreshes `updated_at`.
//! - `update` with `clear_derived` nulls `summary` and `suggested_tags` in the
//!   same statement that writes the new content.
//! - `delete` of an absent id is a successful no-op.
//! - Read paths reject rows they cannot decode instead of masking them.

use crate::db::DbError;
use crate::model::memo::{Memo, MemoCategory, MemoForm, MemoId, MemoValidationError};
use rusqlite::{params, Connection, Params, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

const MEMO_COLUMNS: &str = "id, title, content, category, tags, summary, suggested_tags, \
     created_at, updated_at";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for memo persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(MemoValidationError),
    Db(DbError),
    NotFound(MemoId),
    InvalidData(String),
    /// The connection is not migrated to the `memos` schema.
    MissingRequiredColumn(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "memo not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted memo data: {message}"),
            Self::MissingRequiredColumn(column) => {
                write!(f, "memos table is missing required column `{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) | Self::MissingRequiredColumn(_) => None,
        }
    }
}

impl From<MemoValidationError> for RepoError {
    fn from(value: MemoValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence gateway between `Memo` and the `memos` table.
pub trait MemoRepository {
    /// All memos, newest first by creation time.
    fn list(&self) -> RepoResult<Vec<Memo>>;
    /// One memo, or `None` when no row matches.
    fn get_by_id(&self, id: MemoId) -> RepoResult<Option<Memo>>;
    /// Inserts a new memo and returns the persisted row.
    fn create(&self, form: &MemoForm) -> RepoResult<Memo>;
    /// Replaces the user-editable fields, optionally clearing derived fields.
    fn update(&self, id: MemoId, form: &MemoForm, clear_derived: bool) -> RepoResult<Memo>;
    /// Removes a memo. Absent ids succeed.
    fn delete(&self, id: MemoId) -> RepoResult<()>;
    /// Sets `summary` and `suggested_tags` without touching other fields.
    fn attach_summary(
        &self,
        id: MemoId,
        summary: &str,
        suggested_tags: &[String],
    ) -> RepoResult<Memo>;
    /// Replaces the tag list only.
    fn replace_tags(&self, id: MemoId, tags: &[String]) -> RepoResult<Memo>;
}

/// SQLite-backed memo repository owning its connection.
pub struct SqliteMemoRepository {
    conn: Connection,
}

impl SqliteMemoRepository {
    /// Wraps a migrated connection, checking the `memos` schema first.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        ensure_memo_columns(&conn)?;
        Ok(Self { conn })
    }

    /// Borrows the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn fetch_one<P: Params>(&self, sql: &str, params: P) -> RepoResult<Option<Memo>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_memo_row(row)?)),
            None => Ok(None),
        }
    }
}

impl MemoRepository for SqliteMemoRepository {
    fn list(&self) -> RepoResult<Vec<Memo>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {MEMO_COLUMNS}
             FROM memos
             ORDER BY created_at DESC, rowid DESC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut memos = Vec::new();
        while let Some(row) = rows.next()? {
            memos.push(parse_memo_row(row)?);
        }
        Ok(memos)
    }

    fn get_by_id(&self, id: MemoId) -> RepoResult<Option<Memo>> {
        self.fetch_one(
            &format!("SELECT {MEMO_COLUMNS} FROM memos WHERE id = ?1;"),
            [id.to_string()],
        )
    }

    fn create(&self, form: &MemoForm) -> RepoResult<Memo> {
        form.validate()?;

        let id = Uuid::new_v4();
        let now = now_epoch_ms();
        self.fetch_one(
            &format!(
                "INSERT INTO memos (id, title, content, category, tags, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
                 RETURNING {MEMO_COLUMNS};"
            ),
            params![
                id.to_string(),
                form.title.as_str(),
                form.content.as_str(),
                form.category.as_str(),
                encode_tags(&form.tags)?,
                now,
            ],
        )?
        .ok_or_else(|| RepoError::InvalidData(format!("insert of memo {id} returned no row")))
    }

    fn update(&self, id: MemoId, form: &MemoForm, clear_derived: bool) -> RepoResult<Memo> {
        form.validate()?;

        self.fetch_one(
            &format!(
                "UPDATE memos
                 SET
                    title = ?2,
                    content = ?3,
                    category = ?4,
                    tags = ?5,
                    summary = CASE WHEN ?6 = 1 THEN NULL ELSE summary END,
                    suggested_tags = CASE WHEN ?6 = 1 THEN NULL ELSE suggested_tags END,
                    updated_at = ?7
                 WHERE id = ?1
                 RETURNING {MEMO_COLUMNS};"
            ),
            params![
                id.to_string(),
                form.title.as_str(),
                form.content.as_str(),
                form.category.as_str(),
                encode_tags(&form.tags)?,
                i64::from(clear_derived),
                now_epoch_ms(),
            ],
        )?
        .ok_or(RepoError::NotFound(id))
    }

    fn delete(&self, id: MemoId) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM memos WHERE id = ?1;", [id.to_string()])?;
        Ok(())
    }

    fn attach_summary(
        &self,
        id: MemoId,
        summary: &str,
        suggested_tags: &[String],
    ) -> RepoResult<Memo> {
        self.fetch_one(
            &format!(
                "UPDATE memos
                 SET summary = ?2, suggested_tags = ?3, updated_at = ?4
                 WHERE id = ?1
                 RETURNING {MEMO_COLUMNS};"
            ),
            params![
                id.to_string(),
                summary,
                encode_tags(suggested_tags)?,
                now_epoch_ms()
            ],
        )?
        .ok_or(RepoError::NotFound(id))
    }

    fn replace_tags(&self, id: MemoId, tags: &[String]) -> RepoResult<Memo> {
        self.fetch_one(
            &format!(
                "UPDATE memos
                 SET tags = ?2, updated_at = ?3
                 WHERE id = ?1
                 RETURNING {MEMO_COLUMNS};"
            ),
            params![id.to_string(), encode_tags(tags)?, now_epoch_ms()],
        )?
        .ok_or(RepoError::NotFound(id))
    }
}

fn parse_memo_row(row: &Row<'_>) -> RepoResult<Memo> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{id_text}` in memos.id")))?;

    let category_text: String = row.get("category")?;
    let category = category_text.parse::<MemoCategory>().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid category `{category_text}` in memos.category"
        ))
    })?;

    let tags = decode_tags(row.get("tags")?, "tags")?.unwrap_or_default();
    let suggested_tags = decode_tags(row.get("suggested_tags")?, "suggested_tags")?;

    Ok(Memo {
        id,
        title: row.get("title")?,
        content: row.get("content")?,
        category,
        tags,
        summary: row.get("summary")?,
        suggested_tags,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn encode_tags(tags: &[String]) -> RepoResult<String> {
    serde_json::to_string(tags)
        .map_err(|err| RepoError::InvalidData(format!("cannot encode tag list: {err}")))
}

fn decode_tags(value: Option<String>, column: &str) -> RepoResult<Option<Vec<String>>> {
    value
        .map(|text| {
            serde_json::from_str::<Vec<String>>(&text).map_err(|err| {
                RepoError::InvalidData(format!("invalid tag list in memos.{column}: {err}"))
            })
        })
        .transpose()
}

fn ensure_memo_columns(conn: &Connection) -> RepoResult<()> {
    let mut stmt = conn.prepare("PRAGMA table_info(memos);")?;
    let mut rows = stmt.query([])?;
    let mut present = Vec::new();
    while let Some(row) = rows.next()? {
        present.push(row.get::<_, String>(1)?);
    }

    for column in [
        "id",
        "title",
        "content",
        "category",
        "tags",
        "summary",
        "suggested_tags",
        "created_at",
        "updated_at",
    ] {
        if !present.iter().any(|name| name == column) {
            return Err(RepoError::MissingRequiredColumn(column));
        }
    }
    Ok(())
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}
