use memo_core::db::open_db_in_memory;
use memo_core::{
    MemoCategory, MemoForm, MemoRepository, MemoValidationError, RepoError, SqliteMemoRepository,
};
use rusqlite::Connection;
use uuid::Uuid;

fn repo() -> SqliteMemoRepository {
    SqliteMemoRepository::try_new(open_db_in_memory().unwrap()).unwrap()
}

fn form(title: &str, content: &str) -> MemoForm {
    MemoForm::new(
        title,
        content,
        MemoCategory::Personal,
        vec!["home".to_string(), "list".to_string()],
    )
}

#[test]
fn create_then_get_roundtrip() {
    let repo = repo();
    let input = form("Groceries", "- milk\n- eggs");

    let created = repo.create(&input).unwrap();
    assert_eq!(created.created_at, created.updated_at);
    assert!(created.summary.is_none());
    assert!(created.suggested_tags.is_none());

    let loaded = repo.get_by_id(created.id).unwrap().unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.title, input.title);
    assert_eq!(loaded.content, input.content);
    assert_eq!(loaded.category, input.category);
    assert_eq!(loaded.tags, input.tags);
}

#[test]
fn get_missing_id_returns_none() {
    let repo = repo();
    assert!(repo.get_by_id(Uuid::new_v4()).unwrap().is_none());
}

#[test]
fn list_orders_newest_first() {
    let repo = repo();
    let first = repo.create(&form("first", "a")).unwrap();
    let second = repo.create(&form("second", "b")).unwrap();
    let third = repo.create(&form("third", "c")).unwrap();

    let ids: Vec<_> = repo.list().unwrap().into_iter().map(|memo| memo.id).collect();
    assert_eq!(ids, vec![third.id, second.id, first.id]);
}

#[test]
fn list_respects_created_at_over_insertion_order() {
    let repo = repo();
    let older = repo.create(&form("older", "a")).unwrap();
    let newer = repo.create(&form("newer", "b")).unwrap();
    repo.connection()
        .execute(
            "UPDATE memos SET created_at = 10 WHERE id = ?1;",
            [newer.id.to_string()],
        )
        .unwrap();
    repo.connection()
        .execute(
            "UPDATE memos SET created_at = 20 WHERE id = ?1;",
            [older.id.to_string()],
        )
        .unwrap();

    let ids: Vec<_> = repo.list().unwrap().into_iter().map(|memo| memo.id).collect();
    assert_eq!(ids, vec![older.id, newer.id]);
}

#[test]
fn create_rejects_blank_title() {
    let repo = repo();
    let err = repo.create(&form("  ", "body")).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(MemoValidationError::EmptyTitle)
    ));
    assert!(repo.list().unwrap().is_empty());
}

#[test]
fn update_with_clear_derived_drops_summary_and_suggestions() {
    let repo = repo();
    let created = repo.create(&form("t", "old body")).unwrap();
    repo.attach_summary(created.id, "old summary", &["x".to_string()])
        .unwrap();

    let updated = repo
        .update(created.id, &form("t", "new body"), true)
        .unwrap();
    assert_eq!(updated.content, "new body");
    assert!(updated.summary.is_none());
    assert!(updated.suggested_tags.is_none());
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);
}

#[test]
fn update_without_clear_derived_keeps_summary_and_suggestions() {
    let repo = repo();
    let created = repo.create(&form("t", "body")).unwrap();
    repo.attach_summary(created.id, "kept", &["k".to_string()])
        .unwrap();

    let mut edited = form("renamed", "body");
    edited.category = MemoCategory::Work;
    let updated = repo.update(created.id, &edited, false).unwrap();
    assert_eq!(updated.title, "renamed");
    assert_eq!(updated.category, MemoCategory::Work);
    assert_eq!(updated.summary.as_deref(), Some("kept"));
    assert_eq!(updated.suggested_tags, Some(vec!["k".to_string()]));
}

#[test]
fn update_missing_id_returns_not_found() {
    let repo = repo();
    let missing = Uuid::new_v4();
    let err = repo.update(missing, &form("t", "c"), false).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == missing));
}

#[test]
fn attach_summary_touches_only_derived_fields() {
    let repo = repo();
    let created = repo.create(&form("t", "c")).unwrap();

    let updated = repo
        .attach_summary(created.id, "S", &["a".to_string(), "b".to_string()])
        .unwrap();
    assert_eq!(updated.summary.as_deref(), Some("S"));
    assert_eq!(
        updated.suggested_tags,
        Some(vec!["a".to_string(), "b".to_string()])
    );
    assert_eq!(updated.title, created.title);
    assert_eq!(updated.content, created.content);
    assert_eq!(updated.tags, created.tags);
}

#[test]
fn replace_tags_keeps_order_and_duplicates() {
    let repo = repo();
    let created = repo.create(&form("t", "c")).unwrap();
    let tags = vec!["z".to_string(), "a".to_string(), "z".to_string()];

    let updated = repo.replace_tags(created.id, &tags).unwrap();
    assert_eq!(updated.tags, tags);
    assert_eq!(updated.content, created.content);

    let err = repo.replace_tags(Uuid::new_v4(), &tags).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[test]
fn delete_removes_row_and_tolerates_absent_ids() {
    let repo = repo();
    let kept = repo.create(&form("kept", "c")).unwrap();
    let dropped = repo.create(&form("dropped", "c")).unwrap();

    repo.delete(dropped.id).unwrap();
    repo.delete(dropped.id).unwrap();
    repo.delete(Uuid::new_v4()).unwrap();

    let remaining: Vec<_> = repo.list().unwrap().into_iter().map(|memo| memo.id).collect();
    assert_eq!(remaining, vec![kept.id]);
    assert!(repo.get_by_id(dropped.id).unwrap().is_none());
}

#[test]
fn null_columns_map_to_absent_and_empty() {
    let conn = open_db_in_memory().unwrap();
    let id = Uuid::new_v4();
    conn.execute(
        "INSERT INTO memos (id, title, content, category, tags, summary, suggested_tags, created_at, updated_at)
         VALUES (?1, 'legacy', 'body', 'idea', NULL, NULL, NULL, 5, 5);",
        [id.to_string()],
    )
    .unwrap();

    let repo = SqliteMemoRepository::try_new(conn).unwrap();
    let memo = repo.get_by_id(id).unwrap().unwrap();
    assert!(memo.tags.is_empty());
    assert!(memo.summary.is_none());
    assert!(memo.suggested_tags.is_none());
}

#[test]
fn undecodable_rows_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO memos (id, title, content, category, created_at, updated_at)
         VALUES (?1, 't', 'c', 'recipes', 1, 1);",
        [Uuid::new_v4().to_string()],
    )
    .unwrap();

    let repo = SqliteMemoRepository::try_new(conn).unwrap();
    let err = repo.list().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("recipes")));
}

#[test]
fn try_new_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqliteMemoRepository::try_new(conn).err().unwrap();
    assert!(matches!(err, RepoError::MissingRequiredColumn("id")));
}
