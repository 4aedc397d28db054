//! Ports the service core consumes from its persistence collaborator.

mod unit_of_work;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Credentials, Document, Grant, NewDocument, Session, User};
use crate::filter::DocumentQuery;

pub use unit_of_work::UnitOfWork;

/// Persistence port for users, sessions, documents and grants.
///
/// Lookups that may legitimately find nothing return `Option`; an `Err` always
/// means the store itself failed. Writes that must be atomic take an explicit
/// transaction handle obtained from [`Repository::begin`].
#[async_trait]
pub trait Repository: Send + Sync + 'static {
    type Tx: Transaction;

    /// Open a new transaction.
    async fn begin(&self) -> Result<Self::Tx, RepositoryError>;

    /// Insert a user and return the id the store assigned.
    async fn registration(&self, credentials: &Credentials) -> Result<Uuid, RepositoryError>;

    /// Find the user whose login AND password both match.
    async fn check_user(&self, credentials: &Credentials) -> Result<Option<Uuid>, RepositoryError>;

    /// Persist a session token.
    async fn authentication(&self, session: &Session) -> Result<(), RepositoryError>;

    /// Resolve the user a token belongs to.
    async fn get_user_id(&self, token: &str) -> Result<Option<Uuid>, RepositoryError>;

    /// Delete a session token; `false` when no row matched.
    async fn log_out(&self, token: &str) -> Result<bool, RepositoryError>;

    async fn save(
        &self,
        tx: &mut Self::Tx,
        document: &NewDocument,
    ) -> Result<Uuid, RepositoryError>;

    async fn add_grant(&self, tx: &mut Self::Tx, grant: &Grant) -> Result<(), RepositoryError>;

    async fn get_document(&self, id: Uuid) -> Result<Option<Document>, RepositoryError>;

    async fn check_grant(&self, document_id: Uuid, login: &str) -> Result<bool, RepositoryError>;

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, RepositoryError>;

    /// Documents matching the query, each carrying its distinct grant logins,
    /// in store order and capped at `query.limit`.
    async fn get_documents(&self, query: &DocumentQuery) -> Result<Vec<Document>, RepositoryError>;

    /// Delete a document scoped to its owner; `None` when no row matched.
    async fn delete_document(
        &self,
        id: Uuid,
        owner: Uuid,
    ) -> Result<Option<Uuid>, RepositoryError>;
}

/// An open transaction handle.
#[async_trait]
pub trait Transaction: Send + Sized {
    async fn commit(self) -> Result<(), RepositoryError>;

    async fn rollback(self) -> Result<(), RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("store backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("stored data is malformed: {0}")]
    Corrupt(String),

    #[error("operation rejected by store: {0}")]
    Rejected(String),
}

impl RepositoryError {
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend(Box::new(err))
    }
}
