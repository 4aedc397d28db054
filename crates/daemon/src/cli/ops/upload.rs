use clap::Args;

use docstore_daemon::http_server::api::client::ApiError;
use docstore_daemon::http_server::api::docs::upload::UploadRequest;

#[derive(Args, Debug, Clone)]
pub struct Upload {
    #[command(flatten)]
    pub request: UploadRequest,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("failed to read {0}: {1}")]
    Read(String, std::io::Error),
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Upload {
    type Error = UploadError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut request = self.request.clone();
        request.content = tokio::fs::read(&request.file)
            .await
            .map_err(|e| UploadError::Read(request.file.display().to_string(), e))?;

        let response = ctx.client.call(request).await?;
        Ok(format!("uploaded {}", response.data.file))
    }
}
