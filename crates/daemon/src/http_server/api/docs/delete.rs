use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::HeaderMap;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::prelude::ServiceError;

use super::{parse_id, InvalidId};
use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::http_server::api::error::service_error_response;
use crate::http_server::api::{header_value, ResponseEnvelope, TOKEN_HEADER};
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct DeleteRequest {
    /// Document to delete
    #[arg(long)]
    pub id: Uuid,

    /// Session token of the owner
    #[arg(long)]
    pub token: String,
}

/// `{"<id>": true}`
pub type DeleteResponse = ResponseEnvelope<HashMap<String, bool>>;

pub async fn handler(
    State(state): State<ServiceState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, DeleteError> {
    let id = parse_id(&id)?;
    let token = header_value(&headers, TOKEN_HEADER);

    let deleted = state.service().delete_document(id, &token).await?;

    Ok(Json(DeleteResponse {
        response: HashMap::from([(deleted.to_string(), true)]),
    }))
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteError {
    #[error(transparent)]
    InvalidId(#[from] InvalidId),
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl IntoResponse for DeleteError {
    fn into_response(self) -> Response {
        match self {
            DeleteError::InvalidId(e) => e.into_response(),
            DeleteError::Service(e) => service_error_response("delete", &e),
        }
    }
}

impl ApiRequest for DeleteRequest {
    type Response = DeleteResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join(&format!("/api/docs/{}", self.id))?;
        Ok(client.delete(full_url).header(TOKEN_HEADER, self.token))
    }
}
