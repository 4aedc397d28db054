use std::sync::Arc;

use uuid::Uuid;

use super::{DocumentService, ServiceError};
use crate::domain::Document;
use crate::store::Repository;

impl<R: Repository> DocumentService<R> {
    /// Fetch a document if the caller may read it.
    ///
    /// Checks run in a fixed order: public documents return before the token
    /// is looked at, and ownership is settled before any grant lookup.
    pub async fn get_document(
        &self,
        document_id: Uuid,
        token: &str,
    ) -> Result<Arc<Document>, ServiceError> {
        let document = match self.cached_document(document_id).await {
            Ok(Some(document)) => document,
            Ok(None) => {
                tracing::warn!(service_method = "get_document", document_id = %document_id, "document not found");
                return Err(ServiceError::DocumentNotFound);
            }
            Err(e) => {
                tracing::error!(service_method = "get_document", error = %e, "error get document");
                return Err(ServiceError::DocumentNotFound);
            }
        };

        if document.public {
            return Ok(document);
        }

        let user_id = match self.cached_user_id(token).await {
            Ok(Some(id)) => id,
            Ok(None) => {
                tracing::warn!(service_method = "get_document", "error get user id: token not found");
                return Err(ServiceError::UserNotFound);
            }
            Err(e) => {
                tracing::error!(service_method = "get_document", error = %e, "error get user id");
                return Err(ServiceError::UserNotFound);
            }
        };

        if document.is_owned_by(user_id) {
            return Ok(document);
        }

        let user = match self.cached_user(user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::error!(service_method = "get_document", user_id = %user_id, "error get user");
                return Err(ServiceError::UserNotFound);
            }
            Err(e) => {
                tracing::error!(service_method = "get_document", error = %e, "error get user");
                return Err(ServiceError::UserNotFound);
            }
        };

        let granted = self
            .cached_grant(document_id, &user.login)
            .await
            .map_err(|e| {
                tracing::error!(service_method = "get_document", error = %e, "error check grant");
                ServiceError::from(e)
            })?;

        if granted {
            Ok(document)
        } else {
            tracing::warn!(service_method = "get_document", document_id = %document_id, user_id = %user_id, "no access");
            Err(ServiceError::NoAccess)
        }
    }
}
