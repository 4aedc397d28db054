use reqwest::StatusCode;

use crate::http_server::api::error::ErrorBody;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("HTTP status {0}: {1}")]
    HttpStatus(StatusCode, String),
}

impl ApiError {
    /// Build a status error, preferring the `text` of a JSON error body
    pub fn from_status(status: StatusCode, body: String) -> Self {
        let text = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.text)
            .unwrap_or(body);
        ApiError::HttpStatus(status, text)
    }
}
