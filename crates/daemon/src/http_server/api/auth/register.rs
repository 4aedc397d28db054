use axum::extract::{Form, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::HeaderMap;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::ServiceError;

use super::CredentialsForm;
use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::http_server::api::error::{error_response, service_error_response};
use crate::http_server::api::{header_value, ResponseEnvelope, ADMIN_TOKEN_HEADER};
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct RegisterRequest {
    /// Login for the new account
    #[arg(long)]
    pub login: String,

    /// Password for the new account
    #[arg(long)]
    pub password: String,

    /// Registration secret; read from config.toml when not given
    #[arg(long)]
    pub admin_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginBody {
    pub login: String,
}

pub type RegisterResponse = ResponseEnvelope<LoginBody>;

pub async fn handler(
    State(state): State<ServiceState>,
    headers: HeaderMap,
    Form(form): Form<CredentialsForm>,
) -> Result<impl IntoResponse, RegisterError> {
    if header_value(&headers, ADMIN_TOKEN_HEADER) != state.admin_token() {
        return Err(RegisterError::AdminUnauthorized);
    }

    let login = state.service().register(&form.into()).await?;

    Ok(Json(RegisterResponse {
        response: LoginBody { login },
    }))
}

#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("admin unauthorized")]
    AdminUnauthorized,
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl IntoResponse for RegisterError {
    fn into_response(self) -> Response {
        match self {
            RegisterError::AdminUnauthorized => {
                tracing::warn!(route = "register", "admin token mismatch");
                error_response(http::StatusCode::UNAUTHORIZED, self.to_string())
            }
            RegisterError::Service(e) => service_error_response("register", &e),
        }
    }
}

impl ApiRequest for RegisterRequest {
    type Response = RegisterResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/register")?;
        Ok(client
            .post(full_url)
            .header(ADMIN_TOKEN_HEADER, self.admin_token.unwrap_or_default())
            .form(&[("login", self.login), ("pswd", self.password)]))
    }
}
