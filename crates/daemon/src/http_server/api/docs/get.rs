use axum::body::Body;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use base64::Engine;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue, StatusCode};

use common::prelude::ServiceError;

use super::{parse_id, InvalidId};
use crate::http_server::api::error::{error_response, service_error_response};
use crate::http_server::api::{header_value, TOKEN_HEADER};
use crate::ServiceState;

/// Raw document bytes under the stored content type
pub async fn handler(
    State(state): State<ServiceState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, GetError> {
    let id = parse_id(&id)?;
    let token = header_value(&headers, TOKEN_HEADER);

    let document = state.service().get_document(id, &token).await?;
    let bytes = base64::engine::general_purpose::STANDARD.decode(&document.content)?;

    let content_type = HeaderValue::from_str(&document.mime)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));

    Ok((StatusCode::OK, [(CONTENT_TYPE, content_type)], Body::from(bytes)).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum GetError {
    #[error(transparent)]
    InvalidId(#[from] InvalidId),
    #[error("stored content is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl IntoResponse for GetError {
    fn into_response(self) -> Response {
        match self {
            GetError::InvalidId(e) => e.into_response(),
            GetError::Decode(ref e) => {
                tracing::error!(route = "get", error = %e, "stored document is corrupt");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            GetError::Service(e) => service_error_response("get", &e),
        }
    }
}
