use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::{Credentials, Document, Grant, NewDocument, Session, User};
use crate::filter::{DocumentQuery, FilterKey};
use crate::store::{Repository, RepositoryError, Transaction};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    tokens: HashMap<String, Uuid>,
    documents: Vec<Document>,
    grants: Vec<Grant>,
}

#[derive(Debug, Default)]
struct Failures {
    save: bool,
    grant_logins: HashSet<String>,
    lookups: bool,
}

#[derive(Debug, Default)]
struct Counters {
    calls: Mutex<HashMap<&'static str, usize>>,
    commits: AtomicUsize,
    rollbacks: AtomicUsize,
}

impl Counters {
    fn record(&self, op: &'static str) {
        *self.calls.lock().entry(op).or_default() += 1;
    }
}

/// Store adapter backed by in-process tables
#[derive(Debug, Default)]
pub struct MemoryRepository {
    tables: Arc<RwLock<Tables>>,
    counters: Arc<Counters>,
    failures: Mutex<Failures>,
}

/// Transaction handle for [`MemoryRepository`]; writes stay staged until commit
#[derive(Debug)]
pub struct MemoryTx {
    tables: Arc<RwLock<Tables>>,
    counters: Arc<Counters>,
    documents: Vec<Document>,
    grants: Vec<Grant>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times a port operation was called, by method name
    pub fn calls(&self, op: &str) -> usize {
        self.counters.calls.lock().get(op).copied().unwrap_or(0)
    }

    /// Total number of port calls so far
    pub fn total_calls(&self) -> usize {
        self.counters.calls.lock().values().sum()
    }

    pub fn commits(&self) -> usize {
        self.counters.commits.load(Ordering::SeqCst)
    }

    pub fn rollbacks(&self) -> usize {
        self.counters.rollbacks.load(Ordering::SeqCst)
    }

    /// Make every document save fail
    pub fn fail_save(&self) {
        self.failures.lock().save = true;
    }

    /// Make grant inserts for `login` fail
    pub fn fail_grant_for(&self, login: impl Into<String>) {
        self.failures.lock().grant_logins.insert(login.into());
    }

    /// Make token, user and document lookups fail
    pub fn fail_lookups(&self) {
        self.failures.lock().lookups = true;
    }

    /// Committed documents, in insertion order
    pub fn documents(&self) -> Vec<Document> {
        self.tables.read().documents.clone()
    }

    pub fn grant_count(&self) -> usize {
        self.tables.read().grants.len()
    }

    pub fn session_count(&self) -> usize {
        self.tables.read().tokens.len()
    }

    /// Seed a user directly, bypassing the port
    pub fn insert_user(&self, login: &str, password: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.tables.write().users.push(User {
            id,
            login: login.to_string(),
            password: password.to_string(),
        });
        id
    }

    /// Seed a session directly, bypassing the port
    pub fn insert_session(&self, user_id: Uuid, token: &str) {
        self.tables.write().tokens.insert(token.to_string(), user_id);
    }

    /// Seed a committed document with an explicit creation time
    pub fn insert_document(
        &self,
        owner: Uuid,
        name: &str,
        public: bool,
        created_at: OffsetDateTime,
    ) -> Uuid {
        let id = Uuid::new_v4();
        self.tables.write().documents.push(Document {
            id,
            user_id: owner,
            name: name.to_string(),
            mime: "text/plain".to_string(),
            content: String::new(),
            grant: Vec::new(),
            created_at,
            public,
        });
        id
    }

    /// Seed a committed grant
    pub fn insert_grant(&self, owner: Uuid, document_id: Uuid, login: &str) {
        self.tables
            .write()
            .grants
            .push(Grant::new(owner, document_id, login));
    }

    fn check_lookups(&self) -> Result<(), RepositoryError> {
        if self.failures.lock().lookups {
            return Err(RepositoryError::Rejected("lookup failure injected".into()));
        }
        Ok(())
    }
}

fn matches(document: &Document, query: &DocumentQuery, grants: &[Grant]) -> bool {
    let field = match query.key {
        FilterKey::Name => &document.name,
        FilterKey::Mime => &document.mime,
    };

    *field == query.value
        || document.user_id == query.user_id
        || grants
            .iter()
            .any(|g| g.document_id == document.id && g.grant_user_login == query.login)
}

#[async_trait]
impl Repository for MemoryRepository {
    type Tx = MemoryTx;

    async fn begin(&self) -> Result<Self::Tx, RepositoryError> {
        self.counters.record("begin");
        Ok(MemoryTx {
            tables: self.tables.clone(),
            counters: self.counters.clone(),
            documents: Vec::new(),
            grants: Vec::new(),
        })
    }

    async fn registration(&self, credentials: &Credentials) -> Result<Uuid, RepositoryError> {
        self.counters.record("registration");
        let id = Uuid::new_v4();
        self.tables.write().users.push(User {
            id,
            login: credentials.login.clone(),
            password: credentials.password.clone(),
        });
        Ok(id)
    }

    async fn check_user(&self, credentials: &Credentials) -> Result<Option<Uuid>, RepositoryError> {
        self.counters.record("check_user");
        Ok(self
            .tables
            .read()
            .users
            .iter()
            .find(|u| u.login == credentials.login && u.password == credentials.password)
            .map(|u| u.id))
    }

    async fn authentication(&self, session: &Session) -> Result<(), RepositoryError> {
        self.counters.record("authentication");
        let mut tables = self.tables.write();
        if tables.tokens.contains_key(&session.token) {
            return Err(RepositoryError::Rejected("duplicate token".into()));
        }
        tables.tokens.insert(session.token.clone(), session.user_id);
        Ok(())
    }

    async fn get_user_id(&self, token: &str) -> Result<Option<Uuid>, RepositoryError> {
        self.counters.record("get_user_id");
        self.check_lookups()?;
        Ok(self.tables.read().tokens.get(token).copied())
    }

    async fn log_out(&self, token: &str) -> Result<bool, RepositoryError> {
        self.counters.record("log_out");
        Ok(self.tables.write().tokens.remove(token).is_some())
    }

    async fn save(
        &self,
        tx: &mut Self::Tx,
        document: &NewDocument,
    ) -> Result<Uuid, RepositoryError> {
        self.counters.record("save");
        if self.failures.lock().save {
            return Err(RepositoryError::Rejected("save failure injected".into()));
        }

        let id = Uuid::new_v4();
        tx.documents.push(Document {
            id,
            user_id: document.user_id,
            name: document.name.clone(),
            mime: document.mime.clone(),
            content: document.content.clone(),
            grant: Vec::new(),
            created_at: OffsetDateTime::now_utc(),
            public: document.public,
        });
        Ok(id)
    }

    async fn add_grant(&self, tx: &mut Self::Tx, grant: &Grant) -> Result<(), RepositoryError> {
        self.counters.record("add_grant");
        if self.failures.lock().grant_logins.contains(&grant.grant_user_login) {
            return Err(RepositoryError::Rejected(format!(
                "grant failure injected for {}",
                grant.grant_user_login
            )));
        }

        tx.grants.push(grant.clone());
        Ok(())
    }

    async fn get_document(&self, id: Uuid) -> Result<Option<Document>, RepositoryError> {
        self.counters.record("get_document");
        self.check_lookups()?;
        Ok(self
            .tables
            .read()
            .documents
            .iter()
            .find(|d| d.id == id)
            .cloned())
    }

    async fn check_grant(&self, document_id: Uuid, login: &str) -> Result<bool, RepositoryError> {
        self.counters.record("check_grant");
        Ok(self
            .tables
            .read()
            .grants
            .iter()
            .any(|g| g.document_id == document_id && g.grant_user_login == login))
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        self.counters.record("get_user");
        self.check_lookups()?;
        Ok(self.tables.read().users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_documents(&self, query: &DocumentQuery) -> Result<Vec<Document>, RepositoryError> {
        self.counters.record("get_documents");
        let tables = self.tables.read();

        Ok(tables
            .documents
            .iter()
            .filter(|d| matches(d, query, &tables.grants))
            .take(query.limit as usize)
            .map(|d| {
                let logins: BTreeSet<_> = tables
                    .grants
                    .iter()
                    .filter(|g| g.document_id == d.id)
                    .map(|g| g.grant_user_login.clone())
                    .collect();
                Document {
                    content: String::new(),
                    grant: logins.into_iter().collect(),
                    ..d.clone()
                }
            })
            .collect())
    }

    async fn delete_document(
        &self,
        id: Uuid,
        owner: Uuid,
    ) -> Result<Option<Uuid>, RepositoryError> {
        self.counters.record("delete_document");
        let mut tables = self.tables.write();
        let before = tables.documents.len();
        tables
            .documents
            .retain(|d| !(d.id == id && d.user_id == owner));
        if tables.documents.len() == before {
            return Ok(None);
        }
        tables.grants.retain(|g| g.document_id != id);
        Ok(Some(id))
    }
}

#[async_trait]
impl Transaction for MemoryTx {
    async fn commit(self) -> Result<(), RepositoryError> {
        self.counters.commits.fetch_add(1, Ordering::SeqCst);
        let mut tables = self.tables.write();
        tables.documents.extend(self.documents);
        tables.grants.extend(self.grants);
        Ok(())
    }

    async fn rollback(self) -> Result<(), RepositoryError> {
        self.counters.rollbacks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_grants_follow_their_document() {
        let repo = MemoryRepository::new();
        let owner = repo.insert_user("owner123", "Passw_345");
        let kept = repo.insert_document(owner, "kept", false, OffsetDateTime::now_utc());
        let dropped = repo.insert_document(owner, "dropped", false, OffsetDateTime::now_utc());
        repo.insert_grant(owner, kept, "reader123");
        repo.insert_grant(owner, dropped, "reader123");

        assert!(repo.check_grant(dropped, "reader123").await.unwrap());
        assert!(!repo.check_grant(dropped, "other1234").await.unwrap());

        assert_eq!(repo.delete_document(dropped, owner).await.unwrap(), Some(dropped));
        assert!(!repo.check_grant(dropped, "reader123").await.unwrap());
        assert!(repo.check_grant(kept, "reader123").await.unwrap());
        assert_eq!(repo.grant_count(), 1);
    }
}
