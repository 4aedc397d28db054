use axum::Json;

use common::version::{build_info, BuildInfo};

/// Build metadata of the running daemon
#[tracing::instrument]
pub async fn handler() -> Json<BuildInfo> {
    Json(build_info())
}
