//! Typed cache-aside layer.
//!
//! One TTL cache per lookup class, so values never need a runtime type check:
//!
//! | class                   | key                 | value        |
//! |-------------------------|---------------------|--------------|
//! | `document:<id>`         | document id         | `Document`   |
//! | `user-id-by-token:<t>`  | session token       | user id      |
//! | `user:<id>`             | user id             | `User`       |
//! | `grant:<id>:<login>`    | (document id, login)| grant exists |
//!
//! Reads check the cache, fall back to the store on a miss and populate the
//! cache with the process-wide expiry. Concurrent misses on one key may both
//! reach the store; the second insert simply overwrites the first.

use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use uuid::Uuid;

use crate::domain::{Document, User};
use crate::store::RepositoryError;

/// Configuration for the lookup caches
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Expiry applied to every entry (default: 5 minutes)
    pub ttl: Duration,
    /// Maximum entries per lookup class (default: 10,000)
    pub max_capacity: u64,
    /// Evict affected entries when a document is deleted or a session ends.
    /// When off, deleted documents and revoked tokens stay readable from the
    /// cache until their entries expire.
    pub invalidate_on_write: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_capacity: 10_000,
            invalidate_on_write: true,
        }
    }
}

/// A key/value cache with a fixed per-entry expiry
#[derive(Clone)]
pub struct TtlCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    inner: Cache<K, V>,
}

impl<K, V> TtlCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(ttl: Duration, max_capacity: u64) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.get(key)
    }

    pub fn set(&self, key: K, value: V) {
        self.inner.insert(key, value);
    }

    pub fn invalidate(&self, key: &K) {
        self.inner.invalidate(key);
    }

    pub fn contains(&self, key: &K) -> bool {
        self.inner.contains_key(key)
    }

    /// Return the cached value for `key`, or await `fetch` and cache whatever
    /// it finds. `fetch` is only polled on a miss; `Ok(None)` is not cached.
    pub async fn get_or_fetch<F>(&self, key: K, fetch: F) -> Result<Option<V>, RepositoryError>
    where
        F: Future<Output = Result<Option<V>, RepositoryError>>,
    {
        if let Some(value) = self.inner.get(&key) {
            return Ok(Some(value));
        }

        let value = fetch.await?;
        if let Some(value) = &value {
            self.inner.insert(key, value.clone());
        }
        Ok(value)
    }
}

/// The four lookup caches shared by every request
#[derive(Clone)]
pub struct LookupCache {
    documents: TtlCache<Uuid, Arc<Document>>,
    user_ids: TtlCache<String, Uuid>,
    users: TtlCache<Uuid, Arc<User>>,
    grants: TtlCache<(Uuid, String), bool>,
    invalidate_on_write: bool,
}

impl LookupCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            documents: TtlCache::new(config.ttl, config.max_capacity),
            user_ids: TtlCache::new(config.ttl, config.max_capacity),
            users: TtlCache::new(config.ttl, config.max_capacity),
            grants: TtlCache::new(config.ttl, config.max_capacity),
            invalidate_on_write: config.invalidate_on_write,
        }
    }

    pub fn documents(&self) -> &TtlCache<Uuid, Arc<Document>> {
        &self.documents
    }

    pub fn user_ids(&self) -> &TtlCache<String, Uuid> {
        &self.user_ids
    }

    pub fn users(&self) -> &TtlCache<Uuid, Arc<User>> {
        &self.users
    }

    pub fn grants(&self) -> &TtlCache<(Uuid, String), bool> {
        &self.grants
    }

    /// Drop the cached copy of a deleted document, if configured to.
    pub fn document_removed(&self, id: &Uuid) {
        if self.invalidate_on_write {
            tracing::debug!(document_id = %id, "evicting cached document");
            self.documents.invalidate(id);
        }
    }

    /// Drop the cached owner of a revoked token, if configured to.
    pub fn session_ended(&self, token: &str) {
        if self.invalidate_on_write {
            self.user_ids.invalidate(&token.to_string());
        }
    }
}

impl Default for LookupCache {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}
