use std::path::PathBuf;

use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{ServiceError, Upload};

use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::http_server::api::error::{error_response, service_error_response};
use crate::http_server::api::DataEnvelope;
use crate::ServiceState;

/// JSON carried by the `meta` part; missing fields read as empty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Meta {
    pub name: String,
    pub token: String,
    pub mime: String,
    pub grant: Vec<String>,
    pub file: bool,
    pub public: bool,
}

impl Meta {
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty() && !self.mime.is_empty() && !self.token.is_empty()
    }

    fn into_upload(self, content: Vec<u8>) -> Upload {
        Upload {
            name: self.name,
            token: self.token,
            mime: self.mime,
            content,
            grant: self.grant,
            public: self.public,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub file: String,
}

pub type UploadResponse = DataEnvelope<UploadedFile>;

pub async fn handler(
    State(state): State<ServiceState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, UploadError> {
    let mut meta: Option<Meta> = None;
    let mut content: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadError::Multipart(e.to_string()))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "meta" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| UploadError::Multipart(e.to_string()))?;
                let parsed: Meta =
                    serde_json::from_str(&text).map_err(|_| UploadError::InvalidMeta)?;
                meta = Some(parsed);
            }
            "file" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| UploadError::Multipart(e.to_string()))?;
                content = Some(bytes.to_vec());
            }
            _ => {
                tracing::debug!("ignoring unknown upload field: {}", field_name);
            }
        }
    }

    let meta = meta
        .filter(Meta::is_valid)
        .ok_or(UploadError::InvalidMeta)?;
    let content = content.ok_or(UploadError::MissingFile)?;

    tracing::info!(
        name = %meta.name,
        mime = %meta.mime,
        size = content.len(),
        grants = meta.grant.len(),
        "uploading document"
    );

    let file = state.service().upload(&meta.into_upload(content)).await?;

    Ok(Json(UploadResponse {
        data: UploadedFile { file },
    }))
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("invalid meta")]
    InvalidMeta,
    #[error("file part is required")]
    MissingFile,
    #[error("multipart error: {0}")]
    Multipart(String),
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        match self {
            UploadError::Service(e) => service_error_response("upload", &e),
            other => {
                tracing::warn!(route = "upload", error = %other, "malformed upload");
                error_response(StatusCode::BAD_REQUEST, other.to_string())
            }
        }
    }
}

/// Client side of an upload: a local file plus its metadata
#[derive(Debug, Clone, clap::Args)]
pub struct UploadRequest {
    /// Local file to upload
    #[arg(long)]
    pub file: PathBuf,

    /// Session token of the uploader
    #[arg(long)]
    pub token: String,

    /// Stored name (defaults to the file name)
    #[arg(long)]
    pub name: Option<String>,

    /// Content type stored with the document
    #[arg(long, default_value = "application/octet-stream")]
    pub mime: String,

    /// Login to share the document with (repeatable)
    #[arg(long = "grant")]
    pub grant: Vec<String>,

    /// Make the document readable without a token
    #[arg(long)]
    pub public: bool,

    #[arg(skip)]
    pub content: Vec<u8>,
}

impl UploadRequest {
    fn meta(&self) -> Meta {
        let name = self.name.clone().unwrap_or_else(|| {
            self.file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        });
        Meta {
            name,
            token: self.token.clone(),
            mime: self.mime.clone(),
            grant: self.grant.clone(),
            file: true,
            public: self.public,
        }
    }
}

impl ApiRequest for UploadRequest {
    type Response = UploadResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/docs")?;
        let meta = self.meta();
        let form = Form::new()
            .text("meta", serde_json::to_string(&meta)?)
            .part("file", Part::bytes(self.content).file_name(meta.name));
        Ok(client.post(full_url).multipart(form))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_requires_name_mime_and_token() {
        let meta: Meta =
            serde_json::from_str(r#"{"name":"a.txt","token":"t","mime":"text/plain"}"#).unwrap();
        assert!(meta.is_valid());
        assert!(meta.grant.is_empty());
        assert!(!meta.public);

        for missing in ["name", "token", "mime"] {
            let mut value = serde_json::json!({"name":"a.txt","token":"t","mime":"text/plain"});
            value[missing] = serde_json::json!("");
            let meta: Meta = serde_json::from_value(value).unwrap();
            assert!(!meta.is_valid(), "{missing}");
        }
    }

    #[test]
    fn test_request_meta_defaults_name_to_file_name() {
        let request = UploadRequest {
            file: PathBuf::from("/tmp/report.pdf"),
            token: "t".into(),
            name: None,
            mime: "application/pdf".into(),
            grant: vec!["friend123".into()],
            public: false,
            content: Vec::new(),
        };
        let meta = request.meta();
        assert_eq!(meta.name, "report.pdf");
        assert!(meta.file);
    }
}
