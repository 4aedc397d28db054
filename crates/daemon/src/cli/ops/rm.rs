use clap::Args;

use docstore_daemon::http_server::api::client::ApiError;
use docstore_daemon::http_server::api::docs::delete::DeleteRequest;

#[derive(Args, Debug, Clone)]
pub struct Rm {
    #[command(flatten)]
    pub request: DeleteRequest,
}

#[derive(Debug, thiserror::Error)]
pub enum RmError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Rm {
    type Error = RmError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let response = ctx.client.call(self.request.clone()).await?;
        let ids: Vec<&str> = response.response.keys().map(String::as_str).collect();
        Ok(format!("deleted {}", ids.join(", ")))
    }
}
