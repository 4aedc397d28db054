//! Service-layer orchestration: credentials, the document write path, access
//! checks and listings, all reading through the lookup caches.

mod access;
mod credentials;
mod documents;
mod error;
mod listing;
mod lookups;

use std::sync::Arc;

use crate::cache::{CacheConfig, LookupCache};
use crate::store::Repository;

pub use error::{ErrorKind, ServiceError};
pub use listing::sort_documents;

/// Entry point for every inbound operation.
///
/// Cheap to clone; clones share the store handle and the caches.
pub struct DocumentService<R: Repository> {
    repo: Arc<R>,
    cache: LookupCache,
}

impl<R: Repository> Clone for DocumentService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            cache: self.cache.clone(),
        }
    }
}

impl<R: Repository> DocumentService<R> {
    pub fn new(repo: Arc<R>, cache_config: &CacheConfig) -> Self {
        Self {
            repo,
            cache: LookupCache::new(cache_config),
        }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repo
    }

    pub fn cache(&self) -> &LookupCache {
        &self.cache
    }
}
