use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// A registered account.
///
/// Passwords are stored and compared as supplied; hashing is not a concern of
/// this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub login: String,
    pub password: String,
}

/// Login/password pair supplied by a caller at registration or authentication
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

impl Credentials {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }
}

/// A bearer token issued to a user at authentication time.
///
/// The token is never kept on [`User`]; it only lives in the session row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: Uuid,
    pub token: String,
}

/// A stored document.
///
/// `content` holds the standard base64 encoding of the uploaded bytes.
/// `grant` is the distinct set of logins the document is shared with; it is
/// only populated by listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub mime: String,
    pub content: String,
    pub grant: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub public: bool,
}

impl Document {
    /// Whether `user_id` owns this document
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// A document about to be written; the store assigns id and creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    pub user_id: Uuid,
    pub name: String,
    pub mime: String,
    pub content: String,
    pub public: bool,
}

/// A sharing edge from a document to a login name.
///
/// Grants are matched by login equality at read time, never by user id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    pub user_id: Uuid,
    pub document_id: Uuid,
    pub grant_user_login: String,
}

impl Grant {
    pub fn new(owner: Uuid, document_id: Uuid, login: impl Into<String>) -> Self {
        Self {
            user_id: owner,
            document_id,
            grant_user_login: login.into(),
        }
    }
}

/// Everything a caller hands in to store a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub name: String,
    pub token: String,
    pub mime: String,
    pub content: Vec<u8>,
    pub grant: Vec<String>,
    pub public: bool,
}

impl Upload {
    /// Build the row to persist for `owner`, base64-encoding the content.
    pub fn to_new_document(&self, owner: Uuid) -> NewDocument {
        use base64::Engine;

        NewDocument {
            user_id: owner,
            name: self.name.clone(),
            mime: self.mime.clone(),
            content: base64::engine::general_purpose::STANDARD.encode(&self.content),
            public: self.public,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_encodes_content_as_base64() {
        let owner = Uuid::new_v4();
        let upload = Upload {
            name: "report.txt".to_string(),
            token: "t".repeat(20),
            mime: "text/plain".to_string(),
            content: b"hello world".to_vec(),
            grant: vec!["friend123".to_string()],
            public: true,
        };

        let doc = upload.to_new_document(owner);
        assert_eq!(doc.user_id, owner);
        assert_eq!(doc.content, "aGVsbG8gd29ybGQ=");
        assert_eq!(doc.name, "report.txt");
        assert!(doc.public);
    }
}
