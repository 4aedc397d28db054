use std::path::Path;
use std::sync::Arc;

use common::prelude::*;
use docstore_daemon::database::Database;
use url::Url;
use uuid::Uuid;

async fn memory_db() -> Database {
    Database::connect(&Url::parse("sqlite::memory:").unwrap())
        .await
        .unwrap()
}

/// File-backed store with a multi-connection pool, for tests that hold a
/// transaction open while other lookups run.
async fn file_db(dir: &Path) -> Database {
    let url = Url::parse(&format!("sqlite://{}", dir.join("db.sqlite").display())).unwrap();
    Database::connect(&url).await.unwrap()
}

async fn user(db: &Database, login: &str) -> Uuid {
    db.registration(&Credentials::new(login, "Passw_345"))
        .await
        .unwrap()
}

async fn document(db: &Database, owner: Uuid, name: &str, grants: &[&str]) -> Uuid {
    let mut tx = db.begin().await.unwrap();
    let id = db
        .save(
            &mut tx,
            &NewDocument {
                user_id: owner,
                name: name.to_string(),
                mime: "text/plain".to_string(),
                content: "aGVsbG8=".to_string(),
                public: false,
            },
        )
        .await
        .unwrap();
    for login in grants {
        db.add_grant(&mut tx, &Grant::new(owner, id, *login))
            .await
            .unwrap();
    }
    tx.commit().await.unwrap();
    id
}

#[tokio::test]
async fn test_ping() -> anyhow::Result<()> {
    let db = memory_db().await;
    db.ping().await?;
    Ok(())
}

#[tokio::test]
async fn test_check_user_matches_login_and_password() -> anyhow::Result<()> {
    let db = memory_db().await;
    let id = user(&db, "login345").await;

    let found = db
        .check_user(&Credentials::new("login345", "Passw_345"))
        .await?;
    assert_eq!(found, Some(id));

    let wrong = db
        .check_user(&Credentials::new("login345", "Other_345"))
        .await?;
    assert_eq!(wrong, None);

    let stored = db.get_user(id).await?.unwrap();
    assert_eq!(stored.login, "login345");
    Ok(())
}

#[tokio::test]
async fn test_session_lifecycle() -> anyhow::Result<()> {
    let db = memory_db().await;
    let id = user(&db, "login345").await;
    let session = Session {
        user_id: id,
        token: "abcdefghij0123456789".to_string(),
    };

    db.authentication(&session).await?;
    assert!(db.authentication(&session).await.is_err());
    assert_eq!(db.get_user_id(&session.token).await?, Some(id));

    assert!(db.log_out(&session.token).await?);
    assert!(!db.log_out(&session.token).await?);
    assert_eq!(db.get_user_id(&session.token).await?, None);
    Ok(())
}

#[tokio::test]
async fn test_committed_document_carries_grants() -> anyhow::Result<()> {
    let db = memory_db().await;
    let owner = user(&db, "owner123").await;
    let id = document(&db, owner, "shared.txt", &["reader123", "friend123"]).await;

    let stored = db.get_document(id).await?.unwrap();
    assert_eq!(stored.user_id, owner);
    assert_eq!(stored.content, "aGVsbG8=");
    assert!(!stored.public);
    assert_eq!(
        stored.grant,
        vec!["friend123".to_string(), "reader123".to_string()]
    );

    assert!(db.check_grant(id, "reader123").await?);
    assert!(!db.check_grant(id, "stranger1").await?);
    Ok(())
}

#[tokio::test]
async fn test_rolled_back_document_is_absent() -> anyhow::Result<()> {
    let db = memory_db().await;
    let owner = user(&db, "owner123").await;

    let mut tx = db.begin().await?;
    let id = db
        .save(
            &mut tx,
            &NewDocument {
                user_id: owner,
                name: "draft".to_string(),
                mime: "text/plain".to_string(),
                content: String::new(),
                public: true,
            },
        )
        .await?;
    db.add_grant(&mut tx, &Grant::new(owner, id, "reader123"))
        .await?;
    tx.rollback().await?;

    assert_eq!(db.get_document(id).await?, None);
    assert!(!db.check_grant(id, "reader123").await?);
    Ok(())
}

#[tokio::test]
async fn test_listing_matches_owner_grant_or_filter() -> anyhow::Result<()> {
    let db = memory_db().await;
    let owner = user(&db, "owner123").await;
    let reader = user(&db, "reader123").await;
    let stranger = user(&db, "stranger1").await;

    document(&db, owner, "shared.txt", &["reader123", "reader123", "other999"]).await;
    document(&db, owner, "private.txt", &[]).await;
    document(&db, stranger, "report", &[]).await;
    document(&db, stranger, "unrelated", &[]).await;
    document(&db, reader, "mine", &[]).await;

    let query = DocumentQuery::new(
        reader,
        "reader123",
        DocumentFilter {
            key: FilterKey::Name,
            value: "report".to_string(),
            limit: 10,
        },
    );
    let mut docs = db.get_documents(&query).await?;
    sort_documents(&mut docs);

    let names: Vec<_> = docs.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["mine", "report", "shared.txt"]);

    let shared = docs.iter().find(|d| d.name == "shared.txt").unwrap();
    assert_eq!(
        shared.grant,
        vec!["other999".to_string(), "reader123".to_string()]
    );
    assert!(shared.content.is_empty());

    let limited = DocumentQuery::new(
        reader,
        "reader123",
        DocumentFilter {
            key: FilterKey::Mime,
            value: "text/plain".to_string(),
            limit: 2,
        },
    );
    assert_eq!(db.get_documents(&limited).await?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_delete_is_scoped_to_owner() -> anyhow::Result<()> {
    let db = memory_db().await;
    let owner = user(&db, "owner123").await;
    let other = user(&db, "other1234").await;
    let id = document(&db, owner, "doc", &["reader123"]).await;

    assert_eq!(db.delete_document(id, other).await?, None);
    assert_eq!(db.delete_document(id, owner).await?, Some(id));
    assert_eq!(db.delete_document(id, owner).await?, None);

    // grants cascade with the document
    assert!(!db.check_grant(id, "reader123").await?);
    Ok(())
}

#[tokio::test]
async fn test_nested_upload_follows_outer_transaction() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let db = file_db(dir.path()).await;
    let owner = user(&db, "owner123").await;
    db.authentication(&Session {
        user_id: owner,
        token: "abcdefghij0123456789".to_string(),
    })
    .await?;

    let service = DocumentService::new(Arc::new(db.clone()), &CacheConfig::default());
    let upload = Upload {
        name: "nested.txt".to_string(),
        token: "abcdefghij0123456789".to_string(),
        mime: "text/plain".to_string(),
        content: b"hello".to_vec(),
        grant: vec!["reader123".to_string()],
        public: false,
    };

    let mut outer = db.begin().await?;
    service.upload_in(Some(&mut outer), &upload).await?;
    outer.rollback().await?;

    let query = DocumentQuery::new(
        owner,
        "owner123",
        DocumentFilter {
            key: FilterKey::Name,
            value: "nested.txt".to_string(),
            limit: 10,
        },
    );
    assert!(db.get_documents(&query).await?.is_empty());

    service.upload(&upload).await?;
    let docs = db.get_documents(&query).await?;
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].grant, vec!["reader123".to_string()]);
    Ok(())
}
