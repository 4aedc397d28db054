mod support;

use common::prelude::*;
use time::OffsetDateTime;
use uuid::Uuid;

use support::{seed_session, setup};

#[tokio::test]
async fn test_public_document_needs_no_token() {
    let (repo, service) = setup();
    let owner = repo.insert_user("owner123", "Passw_345");
    let id = repo.insert_document(owner, "public.txt", true, OffsetDateTime::now_utc());

    let doc = service.get_document(id, "").await.unwrap();
    assert_eq!(doc.id, id);
    assert_eq!(repo.calls("get_user_id"), 0);
    assert_eq!(repo.calls("check_grant"), 0);
}

#[tokio::test]
async fn test_owner_reads_without_grant() {
    let (repo, service) = setup();
    let (owner, token) = seed_session(&repo, "owner123");
    let id = repo.insert_document(owner, "mine.txt", false, OffsetDateTime::now_utc());

    let doc = service.get_document(id, &token).await.unwrap();
    assert_eq!(doc.user_id, owner);
    assert_eq!(repo.calls("get_user"), 0);
    assert_eq!(repo.calls("check_grant"), 0);
}

#[tokio::test]
async fn test_stranger_without_grant_is_refused() {
    let (repo, service) = setup();
    let owner = repo.insert_user("owner123", "Passw_345");
    let (_, token) = seed_session(&repo, "reader123");
    let id = repo.insert_document(owner, "private.txt", false, OffsetDateTime::now_utc());

    let err = service.get_document(id, &token).await.unwrap_err();
    assert!(matches!(err, ServiceError::NoAccess));
    assert_eq!(err.kind(), ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_grantee_reads_shared_document() {
    let (repo, service) = setup();
    let owner = repo.insert_user("owner123", "Passw_345");
    let (_, token) = seed_session(&repo, "reader123");
    let id = repo.insert_document(owner, "shared.txt", false, OffsetDateTime::now_utc());
    repo.insert_grant(owner, id, "reader123");

    let doc = service.get_document(id, &token).await.unwrap();
    assert_eq!(doc.id, id);
    assert_eq!(repo.calls("check_grant"), 1);
}

#[tokio::test]
async fn test_grant_for_other_login_does_not_apply() {
    let (repo, service) = setup();
    let owner = repo.insert_user("owner123", "Passw_345");
    let (_, token) = seed_session(&repo, "reader123");
    let id = repo.insert_document(owner, "shared.txt", false, OffsetDateTime::now_utc());
    repo.insert_grant(owner, id, "someone99");

    let err = service.get_document(id, &token).await.unwrap_err();
    assert!(matches!(err, ServiceError::NoAccess));
}

#[tokio::test]
async fn test_missing_document() {
    let (_repo, service) = setup();

    let err = service.get_document(Uuid::new_v4(), "").await.unwrap_err();
    assert!(matches!(err, ServiceError::DocumentNotFound));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_private_document_with_bad_token() {
    let (repo, service) = setup();
    let owner = repo.insert_user("owner123", "Passw_345");
    let id = repo.insert_document(owner, "private.txt", false, OffsetDateTime::now_utc());

    let err = service.get_document(id, "").await.unwrap_err();
    assert!(matches!(err, ServiceError::UserNotFound));

    let err = service
        .get_document(id, "notarealtokennotreal")
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::UserNotFound));
}
