use futures::TryStreamExt as _;
use garde::Validate as _;
use langs_dal::PayloadFields;
use langs_dal::language::{CreateLanguage, LanguageRepositoryImpl, UpdateLanguage};
use sqlx::Executor;

const TEST_DATA: &str = r#"
INSERT INTO languages (id, name, year, last_version) VALUES (1, 'Rust', 2015, '1.80.0');
INSERT INTO languages (id, name, year, last_version) VALUES (2, 'Go', 2009, '1.23.0');
INSERT INTO languages (id, name, year, last_version) VALUES (3, 'OCaml', 1996, '5.2.0');
"#;

async fn init_db() -> sqlx::Pool<sqlx::Sqlite> {
    const DB_URL: &str = "sqlite::memory:";
    let conn = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .connect(DB_URL)
        .await
        .unwrap();
    langs_dal::init_schema(&conn).await.unwrap();

    conn.execute_many(TEST_DATA)
        .try_collect::<Vec<_>>()
        .await
        .unwrap();

    conn
}

fn create_payload(name: &str, year: i64, last_version: &str) -> CreateLanguage {
    CreateLanguage {
        name: Some(name.to_string()),
        year: Some(year),
        last_version: Some(last_version.to_string()),
    }
}

#[tokio::test]
async fn test_language_list() {
    let conn = init_db().await;
    let repo = LanguageRepositoryImpl::new(conn);

    let all = repo.list().await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[2].name.as_deref(), Some("OCaml"));

    let again = repo.list().await.unwrap();
    assert_eq!(all, again);
}

#[tokio::test]
async fn test_language_list_empty() {
    let conn = init_db().await;
    conn.execute("DELETE FROM languages").await.unwrap();
    let repo = LanguageRepositoryImpl::new(conn);

    assert!(repo.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_language_create() {
    let conn = init_db().await;
    let repo = LanguageRepositoryImpl::new(conn);

    let created = repo
        .create(create_payload("Zig", 2016, "0.13.0"))
        .await
        .unwrap();
    assert_eq!(created.name.as_deref(), Some("Zig"));
    assert_eq!(created.year, Some(2016));
    assert_eq!(created.last_version.as_deref(), Some("0.13.0"));
    assert!(created.id > 3);

    let all = repo.list().await.unwrap();
    assert!(all.iter().any(|l| l.id == created.id));

    let fetched = repo.get(created.id).await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_language_update_replaces_all_fields() {
    let conn = init_db().await;
    let repo = LanguageRepositoryImpl::new(conn);

    let payload = UpdateLanguage {
        name: Some("Rust".to_string()),
        year: Some(2015),
        last_version: Some("1.81.0".to_string()),
    };
    let updated = repo.update(1, payload).await.unwrap();
    assert_eq!(updated.id, 1);
    assert_eq!(updated.last_version.as_deref(), Some("1.81.0"));
    assert_eq!(repo.get(1).await.unwrap(), updated);

    let partial = UpdateLanguage {
        name: Some("Go".to_string()),
        ..Default::default()
    };
    let updated = repo.update(2, partial).await.unwrap();
    assert_eq!(updated.name.as_deref(), Some("Go"));
    assert_eq!(updated.year, None);
    assert_eq!(updated.last_version, None);
}

#[tokio::test]
async fn test_language_missing_id() {
    let conn = init_db().await;
    let repo = LanguageRepositoryImpl::new(conn);

    assert!(repo.get(42).await.unwrap_err().is_not_found());
    assert!(
        repo.update(42, UpdateLanguage::default())
            .await
            .unwrap_err()
            .is_not_found()
    );
    assert!(repo.delete(42).await.unwrap_err().is_not_found());

    assert_eq!(repo.list().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_language_delete_returns_prior_values() {
    let conn = init_db().await;
    let repo = LanguageRepositoryImpl::new(conn);

    let deleted = repo.delete(2).await.unwrap();
    assert_eq!(deleted.name.as_deref(), Some("Go"));
    assert_eq!(deleted.year, Some(2009));
    assert_eq!(deleted.last_version.as_deref(), Some("1.23.0"));

    assert!(repo.get(2).await.unwrap_err().is_not_found());
    assert_eq!(repo.list().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_storage_failure_is_database_error() {
    let conn = init_db().await;
    conn.execute("DROP TABLE languages").await.unwrap();
    let repo = LanguageRepositoryImpl::new(conn);

    let err = repo.list().await.unwrap_err();
    assert!(matches!(err, langs_dal::Error::DatabaseError(_)));
}

#[test]
fn test_create_validation() {
    assert!(create_payload("Zig", 2016, "0.13.0").validate().is_ok());

    let report = CreateLanguage::default().validate().unwrap_err();
    let mut fields: Vec<String> = report.iter().map(|(path, _)| path.to_string()).collect();
    fields.sort();
    assert_eq!(fields, ["last_version", "name", "year"]);
    assert_eq!(CreateLanguage::FIELDS, ["name", "year", "last_version"]);

    let report = create_payload("", 1957, "").validate().unwrap_err();
    let mut fields: Vec<String> = report.iter().map(|(path, _)| path.to_string()).collect();
    fields.sort();
    assert_eq!(fields, ["last_version", "name"]);

    assert!(create_payload("Algol", -58, "68").validate().is_ok());
    assert!(create_payload("Zero", 0, "1").validate().is_ok());
}

#[test]
fn test_create_payload_decoding() {
    let payload: CreateLanguage =
        serde_json::from_str(r#"{"name": 0, "year": 0, "last_version": false}"#).unwrap();
    assert!(payload.name.is_none());
    assert!(payload.year.is_none());
    assert!(payload.last_version.is_none());

    let payload: CreateLanguage =
        serde_json::from_str(r#"{"name": "Zig", "year": "0", "last_version": "1"}"#).unwrap();
    assert_eq!(payload.year, Some(0));
    assert!(payload.validate().is_ok());
}

#[tokio::test]
async fn test_language_update_keeps_falsy_values() {
    let conn = init_db().await;
    let repo = LanguageRepositoryImpl::new(conn);

    let payload: UpdateLanguage =
        serde_json::from_str(r#"{"name": 0, "year": 0, "last_version": false}"#).unwrap();
    let updated = repo.update(1, payload).await.unwrap();
    assert_eq!(updated.name.as_deref(), Some("0"));
    assert_eq!(updated.year, Some(0));
    assert_eq!(updated.last_version.as_deref(), Some("false"));

    assert_eq!(repo.get(1).await.unwrap(), updated);
}
