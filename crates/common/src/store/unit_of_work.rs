use super::{Repository, RepositoryError, Transaction};

/// Scope across which several writes commit or roll back together.
///
/// A unit of work either owns a fresh transaction (`Root`) or borrows one a
/// caller already opened (`Nested`). Nested units flatten onto the outer
/// transaction: finishing them never commits or rolls back, the owner of the
/// root decides.
pub enum UnitOfWork<'a, T: Transaction> {
    Root(T),
    Nested(&'a mut T),
}

impl<'a, T: Transaction> UnitOfWork<'a, T> {
    /// Join `outer` if given, otherwise begin a new transaction on `repo`.
    pub async fn begin<R>(repo: &R, outer: Option<&'a mut T>) -> Result<Self, RepositoryError>
    where
        R: Repository<Tx = T> + ?Sized,
    {
        match outer {
            Some(tx) => Ok(UnitOfWork::Nested(tx)),
            None => Ok(UnitOfWork::Root(repo.begin().await?)),
        }
    }

    /// The transaction writes inside this unit must go through
    pub fn tx(&mut self) -> &mut T {
        match self {
            UnitOfWork::Root(tx) => tx,
            UnitOfWork::Nested(tx) => &mut **tx,
        }
    }

    pub fn is_nested(&self) -> bool {
        matches!(self, UnitOfWork::Nested(_))
    }

    /// Close the unit according to `result`.
    ///
    /// An `Err` rolls a root transaction back; a rollback failure is logged and
    /// the original error is returned. An `Ok` commits; a commit failure is
    /// logged and also returned, unlike rollback, so a caller never reports
    /// success for writes that did not land.
    pub async fn finish<V, E>(self, result: Result<V, E>) -> Result<V, E>
    where
        E: From<RepositoryError> + std::fmt::Display,
    {
        let tx = match self {
            UnitOfWork::Nested(_) => return result,
            UnitOfWork::Root(tx) => tx,
        };

        match result {
            Ok(value) => match tx.commit().await {
                Ok(()) => Ok(value),
                Err(e) => {
                    tracing::error!(error = %e, "unit of work commit failed");
                    Err(E::from(e))
                }
            },
            Err(err) => {
                tracing::warn!(error = %err, "rolling back unit of work");
                if let Err(e) = tx.rollback().await {
                    tracing::error!(error = %e, "unit of work rollback failed");
                }
                Err(err)
            }
        }
    }
}
