use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::{HeaderMap, StatusCode};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use time::format_description::FormatItem;
use time::macros::format_description;
use uuid::Uuid;

use common::prelude::{Document, ListRequest, ServiceError};

use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::http_server::api::error::{error_response, service_error_response};
use crate::http_server::api::{header_value, DataEnvelope, TOKEN_HEADER};
use crate::ServiceState;

const CREATED_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Query string of a listing; every field is optional on the wire
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    pub login: String,
    pub key: String,
    pub value: String,
    pub limit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentEntry {
    pub id: Uuid,
    pub name: String,
    pub mime: String,
    pub file: bool,
    pub public: bool,
    pub created: String,
    pub grant: Vec<String>,
}

impl DocumentEntry {
    fn from_document(document: Document) -> Result<Self, time::error::Format> {
        Ok(Self {
            id: document.id,
            created: document.created_at.format(CREATED_FORMAT)?,
            name: document.name,
            mime: document.mime,
            file: true,
            public: document.public,
            grant: document.grant,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentList {
    pub docs: Vec<DocumentEntry>,
}

pub type ListResponse = DataEnvelope<DocumentList>;

pub async fn handler(
    State(state): State<ServiceState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ListError> {
    let limit: i64 = query.limit.trim().parse().map_err(|_| ListError::InvalidLimit)?;

    let request = ListRequest {
        token: header_value(&headers, TOKEN_HEADER),
        login: query.login,
        key: query.key,
        value: query.value,
        limit,
    };

    let documents = state.service().list_documents(&request).await?;
    let docs = documents
        .into_iter()
        .map(DocumentEntry::from_document)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(ListResponse {
        data: DocumentList { docs },
    }))
}

#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error("invalid limit")]
    InvalidLimit,
    #[error("failed to format creation time: {0}")]
    Format(#[from] time::error::Format),
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl IntoResponse for ListError {
    fn into_response(self) -> Response {
        match self {
            ListError::InvalidLimit => {
                tracing::warn!(route = "list", "non-numeric limit");
                error_response(StatusCode::BAD_REQUEST, self.to_string())
            }
            ListError::Format(ref e) => {
                tracing::error!(route = "list", error = %e, "listing serialization failed");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            ListError::Service(e) => service_error_response("list", &e),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct LsRequest {
    /// Session token of the caller
    #[arg(long)]
    pub token: String,

    /// Filter column: name or mime
    #[arg(long, default_value = "name")]
    pub key: String,

    /// Exact value the filter column must equal
    #[arg(long)]
    pub value: String,

    /// Maximum number of documents returned
    #[arg(long, default_value_t = 100)]
    pub limit: i64,
}

impl ApiRequest for LsRequest {
    type Response = ListResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/docs")?;
        Ok(client
            .get(full_url)
            .header(TOKEN_HEADER, self.token)
            .query(&[
                ("key", self.key),
                ("value", self.value),
                ("limit", self.limit.to_string()),
            ]))
    }
}
