use async_trait::async_trait;
use sqlx::Sqlite;
use uuid::Uuid;

use common::prelude::{
    Credentials, Document, DocumentQuery, Grant, NewDocument, Repository, RepositoryError,
    Session, Transaction, User,
};

use super::{documents, Database};

/// Open sqlx transaction on the pool backing [`Database`]
#[derive(Debug)]
pub struct SqliteTx(sqlx::Transaction<'static, Sqlite>);

#[async_trait]
impl Transaction for SqliteTx {
    async fn commit(self) -> Result<(), RepositoryError> {
        self.0.commit().await.map_err(RepositoryError::backend)
    }

    async fn rollback(self) -> Result<(), RepositoryError> {
        self.0.rollback().await.map_err(RepositoryError::backend)
    }
}

#[async_trait]
impl Repository for Database {
    type Tx = SqliteTx;

    async fn begin(&self) -> Result<Self::Tx, RepositoryError> {
        let tx = (**self).begin().await.map_err(RepositoryError::backend)?;
        Ok(SqliteTx(tx))
    }

    async fn registration(&self, credentials: &Credentials) -> Result<Uuid, RepositoryError> {
        self.insert_user(credentials)
            .await
            .map_err(RepositoryError::backend)
    }

    async fn check_user(&self, credentials: &Credentials) -> Result<Option<Uuid>, RepositoryError> {
        self.find_user_id(credentials)
            .await
            .map_err(RepositoryError::backend)
    }

    async fn authentication(&self, session: &Session) -> Result<(), RepositoryError> {
        self.insert_session(session)
            .await
            .map_err(RepositoryError::backend)
    }

    async fn get_user_id(&self, token: &str) -> Result<Option<Uuid>, RepositoryError> {
        self.session_owner(token)
            .await
            .map_err(RepositoryError::backend)
    }

    async fn log_out(&self, token: &str) -> Result<bool, RepositoryError> {
        self.delete_session(token)
            .await
            .map_err(RepositoryError::backend)
    }

    async fn save(
        &self,
        tx: &mut Self::Tx,
        document: &NewDocument,
    ) -> Result<Uuid, RepositoryError> {
        documents::insert_document(&mut tx.0, document)
            .await
            .map_err(RepositoryError::backend)
    }

    async fn add_grant(&self, tx: &mut Self::Tx, grant: &Grant) -> Result<(), RepositoryError> {
        documents::insert_grant(&mut tx.0, grant)
            .await
            .map_err(RepositoryError::backend)
    }

    async fn get_document(&self, id: Uuid) -> Result<Option<Document>, RepositoryError> {
        self.find_document(id)
            .await
            .map_err(RepositoryError::backend)
    }

    async fn check_grant(&self, document_id: Uuid, login: &str) -> Result<bool, RepositoryError> {
        self.has_grant(document_id, login)
            .await
            .map_err(RepositoryError::backend)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        self.find_user(id).await.map_err(RepositoryError::backend)
    }

    async fn get_documents(&self, query: &DocumentQuery) -> Result<Vec<Document>, RepositoryError> {
        self.list_documents(query)
            .await
            .map_err(RepositoryError::backend)
    }

    async fn delete_document(
        &self,
        id: Uuid,
        owner: Uuid,
    ) -> Result<Option<Uuid>, RepositoryError> {
        self.remove_document(id, owner)
            .await
            .map_err(RepositoryError::backend)
    }
}
