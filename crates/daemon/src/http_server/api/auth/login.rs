use axum::extract::{Form, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::ServiceError;

use super::CredentialsForm;
use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::http_server::api::error::service_error_response;
use crate::http_server::api::ResponseEnvelope;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct AuthRequest {
    #[arg(long)]
    pub login: String,

    #[arg(long)]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBody {
    pub token: String,
}

pub type AuthResponse = ResponseEnvelope<TokenBody>;

pub async fn handler(
    State(state): State<ServiceState>,
    Form(form): Form<CredentialsForm>,
) -> Result<impl IntoResponse, AuthError> {
    let token = state.service().authenticate(&form.into()).await?;

    Ok(Json(AuthResponse {
        response: TokenBody { token },
    }))
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::Service(e) => service_error_response("auth", &e),
        }
    }
}

impl ApiRequest for AuthRequest {
    type Response = AuthResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/auth")?;
        Ok(client
            .post(full_url)
            .form(&[("login", self.login), ("pswd", self.password)]))
    }
}
