use super::{DocumentService, ServiceError};
use crate::domain::{Credentials, Session};
use crate::store::Repository;
use crate::token::generate_token;
use crate::validation::{check_login, check_password};

fn validate(credentials: &Credentials, method: &'static str) -> Result<(), ServiceError> {
    if !check_login(&credentials.login) {
        tracing::warn!(service_method = method, "{}", ServiceError::InvalidLogin);
        return Err(ServiceError::InvalidLogin);
    }
    if !check_password(&credentials.password) {
        tracing::warn!(service_method = method, "{}", ServiceError::InvalidPassword);
        return Err(ServiceError::InvalidPassword);
    }
    Ok(())
}

impl<R: Repository> DocumentService<R> {
    /// Register a new user and return its login.
    ///
    /// A user "exists" only when both login and password match a stored row,
    /// so the same login may be registered again under another password.
    pub async fn register(&self, credentials: &Credentials) -> Result<String, ServiceError> {
        validate(credentials, "register")?;

        match self.repo.check_user(credentials).await {
            Ok(Some(_)) => {
                tracing::error!(service_method = "register", login = %credentials.login, "user already exists");
                return Err(ServiceError::UserExists);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!(service_method = "register", error = %e, "error when check user");
                return Err(e.into());
            }
        }

        self.repo.registration(credentials).await.map_err(|e| {
            tracing::error!(service_method = "register", error = %e, "error when registration user");
            ServiceError::Registration
        })?;

        tracing::info!(service_method = "register", login = %credentials.login, "user registered");
        Ok(credentials.login.clone())
    }

    /// Check credentials and issue a fresh session token.
    ///
    /// Earlier tokens of the same user stay valid.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<String, ServiceError> {
        validate(credentials, "authenticate")?;

        let user_id = match self.repo.check_user(credentials).await {
            Ok(Some(id)) => id,
            Ok(None) => {
                tracing::error!(service_method = "authenticate", login = %credentials.login, "user not found");
                return Err(ServiceError::UserNotFound);
            }
            Err(e) => {
                tracing::error!(service_method = "authenticate", error = %e, "error when check user");
                return Err(e.into());
            }
        };

        let session = Session {
            user_id,
            token: generate_token(),
        };
        self.repo.authentication(&session).await.map_err(|e| {
            tracing::error!(service_method = "authenticate", error = %e, "error when authentication user");
            ServiceError::Authentication
        })?;

        tracing::info!(service_method = "authenticate", user_id = %user_id, "session opened");
        Ok(session.token)
    }

    /// Revoke a session token.
    pub async fn log_out(&self, token: &str) -> Result<(), ServiceError> {
        match self.repo.log_out(token).await {
            Ok(true) => {
                self.cache.session_ended(token);
                Ok(())
            }
            Ok(false) => {
                tracing::warn!(service_method = "log_out", "token not found");
                Err(ServiceError::TokenNotFound)
            }
            Err(e) => {
                tracing::error!(service_method = "log_out", error = %e, "error when logout user");
                Err(ServiceError::LogOut)
            }
        }
    }
}
