/**
 * Typed lookup caches with a fixed expiry.
 *  One cache per lookup class: documents,
 *  token owners, users and grant checks.
 */
pub mod cache;
/**
 * Users, sessions, documents and the
 *  sharing grants between them.
 */
pub mod domain;
/**
 * Validated listing filters and the
 *  query handed to the store.
 */
pub mod filter;
/**
 * Credential orchestration, the document
 *  write path, access checks and listings.
 */
pub mod service;
/**
 * Store ports and the unit of work that
 *  scopes atomic writes.
 */
pub mod store;
/**
 * In-process store adapter for tests.
 */
pub mod testkit;
pub mod token;
pub mod validation;
/**
 * Helper for setting build version information
 *  at compile time.
 */
pub mod version;

pub mod prelude {
    pub use crate::cache::{CacheConfig, LookupCache, TtlCache};
    pub use crate::domain::{Credentials, Document, Grant, NewDocument, Session, Upload, User};
    pub use crate::filter::{DocumentFilter, DocumentQuery, FilterError, FilterKey, ListRequest};
    pub use crate::service::{sort_documents, DocumentService, ErrorKind, ServiceError};
    pub use crate::store::{Repository, RepositoryError, Transaction, UnitOfWork};
    pub use crate::version::build_info;
}
