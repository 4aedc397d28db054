use uuid::Uuid;

use super::{DocumentService, ServiceError};
use crate::domain::{Grant, Upload};
use crate::store::{Repository, UnitOfWork};

impl<R: Repository> DocumentService<R> {
    /// Store a document and its grants atomically, returning the document name.
    pub async fn upload(&self, upload: &Upload) -> Result<String, ServiceError> {
        self.upload_in(None, upload).await
    }

    /// Like [`upload`](Self::upload), but joins `outer` when the caller already
    /// holds an open transaction. The writes then commit or roll back with it.
    pub async fn upload_in(
        &self,
        outer: Option<&mut R::Tx>,
        upload: &Upload,
    ) -> Result<String, ServiceError> {
        let user_id = match self.cached_user_id(&upload.token).await {
            Ok(Some(id)) => id,
            Ok(None) => {
                tracing::error!(service_method = "upload", "error get user id: token not found");
                return Err(ServiceError::TokenNotFound);
            }
            Err(e) => {
                tracing::error!(service_method = "upload", error = %e, "error get user id");
                return Err(ServiceError::TokenNotFound);
            }
        };

        let mut uow = UnitOfWork::begin(self.repo.as_ref(), outer).await?;
        let written = self.write_document(uow.tx(), user_id, upload).await;
        let document_id = uow.finish(written).await?;

        tracing::info!(
            service_method = "upload",
            document_id = %document_id,
            grants = upload.grant.len(),
            "document stored"
        );
        Ok(upload.name.clone())
    }

    async fn write_document(
        &self,
        tx: &mut R::Tx,
        owner: Uuid,
        upload: &Upload,
    ) -> Result<Uuid, ServiceError> {
        let document_id = self
            .repo
            .save(tx, &upload.to_new_document(owner))
            .await
            .map_err(|e| {
                tracing::error!(service_method = "upload", error = %e, "error save document");
                e
            })?;

        for login in &upload.grant {
            self.repo
                .add_grant(tx, &Grant::new(owner, document_id, login))
                .await
                .map_err(|e| {
                    tracing::error!(service_method = "upload", error = %e, login = %login, "error add grant");
                    e
                })?;
        }

        Ok(document_id)
    }

    /// Delete a document owned by the token's user.
    pub async fn delete_document(&self, id: Uuid, token: &str) -> Result<Uuid, ServiceError> {
        let user_id = match self.cached_user_id(token).await {
            Ok(Some(id)) => id,
            Ok(None) => {
                tracing::error!(service_method = "delete_document", "error get user id: token not found");
                return Err(ServiceError::UserNotFound);
            }
            Err(e) => {
                tracing::error!(service_method = "delete_document", error = %e, "error get user id");
                return Err(ServiceError::UserNotFound);
            }
        };

        match self.repo.delete_document(id, user_id).await {
            Ok(Some(id)) => {
                self.cache.document_removed(&id);
                Ok(id)
            }
            Ok(None) => {
                tracing::warn!(service_method = "delete_document", document_id = %id, "no owned document matched");
                Err(ServiceError::DocumentNotFound)
            }
            Err(e) => {
                tracing::error!(service_method = "delete_document", error = %e, "error delete document");
                Err(ServiceError::DocumentNotFound)
            }
        }
    }
}
