use super::{DocumentService, ServiceError};
use crate::domain::Document;
use crate::filter::{DocumentFilter, DocumentQuery, ListRequest};
use crate::store::Repository;

/// Order documents by name (byte-wise), then by creation time. The sort is
/// stable, so exact ties keep the order the store returned them in.
pub fn sort_documents(documents: &mut [Document]) {
    documents.sort_by(|a, b| {
        a.name
            .cmp(&b.name)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
}

impl<R: Repository> DocumentService<R> {
    /// List the documents visible to the caller under a filter.
    ///
    /// A document is returned when it matches the filter, is owned by the
    /// caller, or is granted to the caller's login.
    pub async fn list_documents(&self, request: &ListRequest) -> Result<Vec<Document>, ServiceError> {
        let filter = DocumentFilter::try_from(request).map_err(|e| {
            tracing::warn!(service_method = "list_documents", error = %e, "invalid filter");
            e
        })?;

        let user_id = match self.cached_user_id(&request.token).await {
            Ok(Some(id)) => id,
            Ok(None) => {
                tracing::error!(service_method = "list_documents", "error get user id: token not found");
                return Err(ServiceError::UserNotFound);
            }
            Err(e) => {
                tracing::error!(service_method = "list_documents", error = %e, "error get user id");
                return Err(ServiceError::UserNotFound);
            }
        };

        let user = match self.cached_user(user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::error!(service_method = "list_documents", user_id = %user_id, "error get user");
                return Err(ServiceError::UserNotFound);
            }
            Err(e) => {
                tracing::error!(service_method = "list_documents", error = %e, "error get user");
                return Err(ServiceError::UserNotFound);
            }
        };

        if !request.login.is_empty() && request.login != user.login {
            tracing::debug!(
                service_method = "list_documents",
                requested = %request.login,
                "ignoring login that does not belong to the token"
            );
        }

        let query = DocumentQuery::new(user_id, user.login.clone(), filter);
        let mut documents = self.repo.get_documents(&query).await.map_err(|e| {
            tracing::error!(service_method = "list_documents", error = %e, "error get documents");
            ServiceError::DocumentsNotFound
        })?;

        sort_documents(&mut documents);
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use time::{Duration, OffsetDateTime};
    use uuid::Uuid;

    use super::*;

    fn doc(name: &str, created_at: OffsetDateTime) -> Document {
        Document {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: name.to_string(),
            mime: "text/plain".to_string(),
            content: String::new(),
            grant: Vec::new(),
            created_at,
            public: false,
        }
    }

    #[test]
    fn test_sort_by_name_then_created_at() {
        let now = OffsetDateTime::now_utc();
        let yesterday = now - Duration::days(1);

        let mut docs = vec![doc("1", now), doc("1", yesterday), doc("2", now)];
        sort_documents(&mut docs);

        let order: Vec<_> = docs.iter().map(|d| (d.name.as_str(), d.created_at)).collect();
        assert_eq!(order, vec![("1", yesterday), ("1", now), ("2", now)]);
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let now = OffsetDateTime::now_utc();
        let first = doc("same", now);
        let second = doc("same", now);
        let (first_id, second_id) = (first.id, second.id);

        let mut docs = vec![first, second];
        sort_documents(&mut docs);
        assert_eq!(docs[0].id, first_id);
        assert_eq!(docs[1].id, second_id);
    }

    #[test]
    fn test_sort_is_bytewise() {
        let now = OffsetDateTime::now_utc();
        let mut docs = vec![doc("b", now), doc("B", now), doc("a", now)];
        sort_documents(&mut docs);
        let names: Vec<_> = docs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["B", "a", "b"]);
    }
}
