use axum::response::{IntoResponse, Response};
use http::StatusCode;
use uuid::Uuid;

use super::error::error_response;

pub mod delete;
pub mod get;
pub mod list;
pub mod upload;

/// A path segment that is not a document id
#[derive(Debug, thiserror::Error)]
#[error("invalid document id: {0}")]
pub struct InvalidId(String);

impl IntoResponse for InvalidId {
    fn into_response(self) -> Response {
        tracing::warn!(id = %self.0, "rejecting malformed document id");
        error_response(StatusCode::BAD_REQUEST, self.to_string())
    }
}

pub(crate) fn parse_id(raw: &str) -> Result<Uuid, InvalidId> {
    Uuid::parse_str(raw).map_err(|_| InvalidId(raw.to_string()))
}
