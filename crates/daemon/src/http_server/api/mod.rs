use axum::routing::{get, post};
use axum::Router;
use http::HeaderMap;
use serde::{Deserialize, Serialize};

pub mod auth;
pub mod client;
pub mod docs;
pub mod error;

use crate::ServiceState;

/// Header carrying a session token
pub const TOKEN_HEADER: &str = "token";
/// Header carrying the registration secret
pub const ADMIN_TOKEN_HEADER: &str = "admin_token";

/// `{"response": ...}` wrapper used by the account and delete endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope<T> {
    pub response: T,
}

/// `{"data": ...}` wrapper used by the document endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// Value of a header, or an empty string when absent or not valid UTF-8
pub(crate) fn header_value(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/register", post(auth::register::handler))
        .route("/auth", post(auth::login::handler))
        .route("/auth/:token", axum::routing::delete(auth::logout::handler))
        .route("/docs", post(docs::upload::handler).get(docs::list::handler))
        .route(
            "/docs/:id",
            get(docs::get::handler).delete(docs::delete::handler),
        )
        .with_state(state)
}
