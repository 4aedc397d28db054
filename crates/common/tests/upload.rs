mod support;

use common::prelude::*;
use base64::Engine;

use support::{seed_session, setup, upload};

#[tokio::test]
async fn test_upload_stores_document_and_grants() {
    let (repo, service) = setup();
    let (owner, token) = seed_session(&repo, "owner123");

    let name = service
        .upload(&upload("notes.txt", &token, &["friend123", "other456"], false))
        .await
        .unwrap();
    assert_eq!(name, "notes.txt");

    let docs = repo.documents();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].user_id, owner);
    assert_eq!(
        base64::engine::general_purpose::STANDARD
            .decode(&docs[0].content)
            .unwrap(),
        b"contents of notes.txt"
    );
    assert_eq!(repo.grant_count(), 2);
    assert_eq!(repo.commits(), 1);
}

#[tokio::test]
async fn test_upload_unknown_token() {
    let (repo, service) = setup();

    let err = service
        .upload(&upload("notes.txt", "missingtokenmissing0", &[], false))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::TokenNotFound));
    assert_eq!(repo.calls("begin"), 0);
}

#[tokio::test]
async fn test_failed_grant_rolls_back_document() {
    let (repo, service) = setup();
    let (_, token) = seed_session(&repo, "owner123");
    repo.fail_grant_for("broken99");

    let err = service
        .upload(&upload("notes.txt", &token, &["friend123", "broken99"], false))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Internal);

    // the save went through inside the unit of work, but nothing is visible
    assert_eq!(repo.calls("save"), 1);
    assert_eq!(repo.calls("add_grant"), 2);
    assert!(repo.documents().is_empty());
    assert_eq!(repo.grant_count(), 0);
    assert_eq!(repo.rollbacks(), 1);
    assert_eq!(repo.commits(), 0);
}

#[tokio::test]
async fn test_failed_save_rolls_back() {
    let (repo, service) = setup();
    let (_, token) = seed_session(&repo, "owner123");
    repo.fail_save();

    let err = service
        .upload(&upload("notes.txt", &token, &["friend123"], false))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Repository(_)));
    assert_eq!(repo.calls("add_grant"), 0);
    assert_eq!(repo.rollbacks(), 1);
}

#[tokio::test]
async fn test_nested_upload_joins_outer_transaction() {
    let (repo, service) = setup();
    let (_, token) = seed_session(&repo, "owner123");

    let mut tx = repo.begin().await.unwrap();
    service
        .upload_in(Some(&mut tx), &upload("a.txt", &token, &["friend123"], false))
        .await
        .unwrap();
    service
        .upload_in(Some(&mut tx), &upload("b.txt", &token, &[], true))
        .await
        .unwrap();

    // nested units never commit on their own
    assert!(repo.documents().is_empty());
    assert_eq!(repo.commits(), 0);
    assert_eq!(repo.calls("begin"), 1);

    tx.commit().await.unwrap();
    assert_eq!(repo.documents().len(), 2);
    assert_eq!(repo.grant_count(), 1);
}

#[tokio::test]
async fn test_nested_failure_leaves_rollback_to_owner() {
    let (repo, service) = setup();
    let (_, token) = seed_session(&repo, "owner123");
    repo.fail_grant_for("broken99");

    let mut tx = repo.begin().await.unwrap();
    service
        .upload_in(Some(&mut tx), &upload("a.txt", &token, &[], false))
        .await
        .unwrap();
    let result = service
        .upload_in(Some(&mut tx), &upload("b.txt", &token, &["broken99"], false))
        .await;
    assert!(result.is_err());
    assert_eq!(repo.rollbacks(), 0);

    tx.rollback().await.unwrap();
    assert!(repo.documents().is_empty());
}
