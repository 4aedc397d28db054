use std::collections::{BTreeSet, HashMap};

use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use time::OffsetDateTime;
use uuid::Uuid;

use common::prelude::{Document, DocumentQuery, Grant, NewDocument};

use super::types::{DBool, DUuid};
use super::Database;

const DOCUMENT_COLUMNS: &str = "d.id, d.user_id, d.name, d.mime, d.content, d.is_public, d.created_at";

#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    id: DUuid,
    user_id: DUuid,
    name: String,
    mime: String,
    content: String,
    is_public: DBool,
    created_at: OffsetDateTime,
}

impl DocumentRow {
    fn into_document(self, grant: Vec<String>) -> Document {
        Document {
            id: self.id.into(),
            user_id: self.user_id.into(),
            name: self.name,
            mime: self.mime,
            content: self.content,
            grant,
            created_at: self.created_at,
            public: self.is_public.into(),
        }
    }
}

pub async fn insert_document(
    conn: &mut SqliteConnection,
    document: &NewDocument,
) -> Result<Uuid, sqlx::Error> {
    let id = DUuid::new();
    sqlx::query(
        r#"
        INSERT INTO documents (id, user_id, name, mime, content, is_public, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(DUuid::from(document.user_id))
    .bind(&document.name)
    .bind(&document.mime)
    .bind(&document.content)
    .bind(DBool::from(document.public))
    .bind(OffsetDateTime::now_utc())
    .execute(conn)
    .await?;
    Ok(id.into())
}

pub async fn insert_grant(conn: &mut SqliteConnection, grant: &Grant) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO grants (id, user_id, document_id, grant_user_login)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(DUuid::new())
    .bind(DUuid::from(grant.user_id))
    .bind(DUuid::from(grant.document_id))
    .bind(&grant.grant_user_login)
    .execute(conn)
    .await?;
    Ok(())
}

impl Database {
    pub async fn find_document(&self, id: Uuid) -> Result<Option<Document>, sqlx::Error> {
        let row = sqlx::query_as::<_, DocumentRow>(&format!(
            "SELECT {} FROM documents d WHERE d.id = ?",
            DOCUMENT_COLUMNS
        ))
        .bind(DUuid::from(id))
        .fetch_optional(&**self)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut grants = self.grant_logins(&[row.id]).await?;
        let logins = grants.remove(&row.id).unwrap_or_default();
        Ok(Some(row.into_document(logins)))
    }

    pub async fn has_grant(&self, document_id: Uuid, login: &str) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(1) FROM grants WHERE document_id = ? AND grant_user_login = ?",
        )
        .bind(DUuid::from(document_id))
        .bind(login)
        .fetch_one(&**self)
        .await?;
        Ok(count > 0)
    }

    /// Documents the caller owns, was granted, or whose filter column
    /// matches exactly. Content is left out of listings.
    pub async fn list_documents(&self, query: &DocumentQuery) -> Result<Vec<Document>, sqlx::Error> {
        // the column name comes from a closed enum, never from the request
        let sql = format!(
            r#"
            SELECT d.id, d.user_id, d.name, d.mime, '' AS content, d.is_public, d.created_at
            FROM documents d
            WHERE d.{} = ?
               OR d.user_id = ?
               OR EXISTS (
                   SELECT 1 FROM grants g
                   WHERE g.document_id = d.id AND g.grant_user_login = ?
               )
            LIMIT ?
            "#,
            query.key.as_str()
        );

        let rows = sqlx::query_as::<_, DocumentRow>(&sql)
            .bind(&query.value)
            .bind(DUuid::from(query.user_id))
            .bind(&query.login)
            .bind(i64::from(query.limit))
            .fetch_all(&**self)
            .await?;

        let ids: Vec<DUuid> = rows.iter().map(|row| row.id).collect();
        let mut grants = self.grant_logins(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let logins = grants.remove(&row.id).unwrap_or_default();
                row.into_document(logins)
            })
            .collect())
    }

    /// Distinct grant logins per document, sorted
    async fn grant_logins(&self, ids: &[DUuid]) -> Result<HashMap<DUuid, Vec<String>>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT DISTINCT document_id, grant_user_login FROM grants WHERE document_id IN (",
        );
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let pairs: Vec<(DUuid, String)> = builder.build_query_as().fetch_all(&**self).await?;

        let mut grouped: HashMap<DUuid, BTreeSet<String>> = HashMap::new();
        for (document_id, login) in pairs {
            grouped.entry(document_id).or_default().insert(login);
        }

        Ok(grouped
            .into_iter()
            .map(|(id, logins)| (id, logins.into_iter().collect()))
            .collect())
    }

    /// Delete a document if `owner` owns it; grants go with it
    pub async fn remove_document(&self, id: Uuid, owner: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
        let result = sqlx::query("DELETE FROM documents WHERE id = ? AND user_id = ?")
            .bind(DUuid::from(id))
            .bind(DUuid::from(owner))
            .execute(&**self)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(id))
    }
}
