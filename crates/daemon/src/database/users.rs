use uuid::Uuid;

use common::prelude::{Credentials, Session, User};

use super::types::DUuid;
use super::Database;

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: DUuid,
    login: String,
    password: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id.into(),
            login: row.login,
            password: row.password,
        }
    }
}

impl Database {
    pub async fn insert_user(&self, credentials: &Credentials) -> Result<Uuid, sqlx::Error> {
        let id = DUuid::new();
        sqlx::query("INSERT INTO users (id, login, password) VALUES (?, ?, ?)")
            .bind(id)
            .bind(&credentials.login)
            .bind(&credentials.password)
            .execute(&**self)
            .await?;
        Ok(id.into())
    }

    /// Matches on login and password together, so the same login may exist
    /// more than once with different passwords.
    pub async fn find_user_id(&self, credentials: &Credentials) -> Result<Option<Uuid>, sqlx::Error> {
        let id: Option<DUuid> =
            sqlx::query_scalar("SELECT id FROM users WHERE login = ? AND password = ? LIMIT 1")
                .bind(&credentials.login)
                .bind(&credentials.password)
                .fetch_optional(&**self)
                .await?;
        Ok(id.map(Into::into))
    }

    pub async fn find_user(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        let row = sqlx::query_as::<_, UserRow>("SELECT id, login, password FROM users WHERE id = ?")
            .bind(DUuid::from(id))
            .fetch_optional(&**self)
            .await?;
        Ok(row.map(User::from))
    }

    pub async fn insert_session(&self, session: &Session) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO tokens (id, user_id, token) VALUES (?, ?, ?)")
            .bind(DUuid::new())
            .bind(DUuid::from(session.user_id))
            .bind(&session.token)
            .execute(&**self)
            .await?;
        Ok(())
    }

    pub async fn session_owner(&self, token: &str) -> Result<Option<Uuid>, sqlx::Error> {
        let id: Option<DUuid> = sqlx::query_scalar("SELECT user_id FROM tokens WHERE token = ?")
            .bind(token)
            .fetch_optional(&**self)
            .await?;
        Ok(id.map(Into::into))
    }

    /// Returns whether a session row was removed
    pub async fn delete_session(&self, token: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tokens WHERE token = ?")
            .bind(token)
            .execute(&**self)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
