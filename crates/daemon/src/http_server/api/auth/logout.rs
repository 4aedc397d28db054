use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::ServiceError;

use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::http_server::api::error::service_error_response;
use crate::http_server::api::ResponseEnvelope;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct LogoutRequest {
    /// Session token to end
    #[arg(long)]
    pub token: String,
}

/// `{"<token>": true}`
pub type LogoutResponse = ResponseEnvelope<HashMap<String, bool>>;

pub async fn handler(
    State(state): State<ServiceState>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, LogoutError> {
    state.service().log_out(&token).await?;

    Ok(Json(LogoutResponse {
        response: HashMap::from([(token, true)]),
    }))
}

#[derive(Debug, thiserror::Error)]
pub enum LogoutError {
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl IntoResponse for LogoutError {
    fn into_response(self) -> Response {
        match self {
            LogoutError::Service(e) => service_error_response("logout", &e),
        }
    }
}

impl ApiRequest for LogoutRequest {
    type Response = LogoutResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join(&format!("/api/auth/{}", self.token))?;
        Ok(client.delete(full_url))
    }
}
