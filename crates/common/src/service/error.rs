use crate::filter::FilterError;
use crate::store::RepositoryError;

/// Broad class of a failure, used by adapters to pick a status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Forbidden,
    Unauthorized,
    Internal,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("login user incorrect")]
    InvalidLogin,
    #[error("password user incorrect")]
    InvalidPassword,
    #[error("invalid filter: {0}")]
    InvalidFilter(#[from] FilterError),

    #[error("user already exists")]
    UserExists,

    #[error("user not found")]
    UserNotFound,
    #[error("token not found")]
    TokenNotFound,
    #[error("document not found")]
    DocumentNotFound,
    #[error("documents not found")]
    DocumentsNotFound,

    #[error("there is no access to the file")]
    NoAccess,

    #[error("user not registered")]
    Registration,
    #[error("user not authenticated")]
    Authentication,
    #[error("user did not finish the session")]
    LogOut,
    #[error("store error: {0}")]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::InvalidLogin
            | ServiceError::InvalidPassword
            | ServiceError::InvalidFilter(_) => ErrorKind::Validation,
            ServiceError::UserExists => ErrorKind::Conflict,
            ServiceError::UserNotFound
            | ServiceError::TokenNotFound
            | ServiceError::DocumentNotFound
            | ServiceError::DocumentsNotFound => ErrorKind::NotFound,
            ServiceError::NoAccess => ErrorKind::Forbidden,
            ServiceError::Registration
            | ServiceError::Authentication
            | ServiceError::LogOut
            | ServiceError::Repository(_) => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(ServiceError::InvalidLogin.kind(), ErrorKind::Validation);
        assert_eq!(
            ServiceError::from(FilterError::EmptyValue).kind(),
            ErrorKind::Validation
        );
        assert_eq!(ServiceError::UserExists.kind(), ErrorKind::Conflict);
        assert_eq!(ServiceError::TokenNotFound.kind(), ErrorKind::NotFound);
        assert_eq!(ServiceError::NoAccess.kind(), ErrorKind::Forbidden);
        assert_eq!(
            ServiceError::from(RepositoryError::Rejected("x".into())).kind(),
            ErrorKind::Internal
        );
    }
}
