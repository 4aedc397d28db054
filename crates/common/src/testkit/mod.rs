/// In-process store adapter for exercising the service core
///
/// `MemoryRepository` implements the full [`Repository`](crate::store::Repository)
/// port on plain maps guarded by locks. Transactions stage their writes and
/// only apply them on commit, so rollback behaviour is observable. Every port
/// call is counted and individual operations can be made to fail.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
///
/// use common::prelude::*;
/// use common::testkit::MemoryRepository;
///
/// #[tokio::test]
/// async fn test_register() -> anyhow::Result<()> {
///     let repo = Arc::new(MemoryRepository::new());
///     let service = DocumentService::new(repo.clone(), &CacheConfig::default());
///
///     service.register(&Credentials::new("login345", "Passw_345")).await?;
///     assert_eq!(repo.calls("registration"), 1);
///     Ok(())
/// }
/// ```
mod repository;

pub use repository::{MemoryRepository, MemoryTx};
