use std::sync::Arc;

use uuid::Uuid;

use super::DocumentService;
use crate::domain::{Document, User};
use crate::store::{Repository, RepositoryError};

impl<R: Repository> DocumentService<R> {
    pub(super) async fn cached_document(
        &self,
        id: Uuid,
    ) -> Result<Option<Arc<Document>>, RepositoryError> {
        self.cache
            .documents()
            .get_or_fetch(id, async {
                self.repo
                    .get_document(id)
                    .await
                    .map(|document| document.map(Arc::new))
            })
            .await
    }

    pub(super) async fn cached_user_id(&self, token: &str) -> Result<Option<Uuid>, RepositoryError> {
        if token.is_empty() {
            return Ok(None);
        }

        self.cache
            .user_ids()
            .get_or_fetch(token.to_string(), self.repo.get_user_id(token))
            .await
    }

    pub(super) async fn cached_user(&self, id: Uuid) -> Result<Option<Arc<User>>, RepositoryError> {
        self.cache
            .users()
            .get_or_fetch(id, async {
                self.repo.get_user(id).await.map(|user| user.map(Arc::new))
            })
            .await
    }

    pub(super) async fn cached_grant(
        &self,
        document_id: Uuid,
        login: &str,
    ) -> Result<bool, RepositoryError> {
        let granted = self
            .cache
            .grants()
            .get_or_fetch((document_id, login.to_string()), async {
                self.repo.check_grant(document_id, login).await.map(Some)
            })
            .await?;

        Ok(granted.unwrap_or(false))
    }
}
