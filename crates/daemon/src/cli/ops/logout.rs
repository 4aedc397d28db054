use clap::Args;

use docstore_daemon::http_server::api::auth::logout::LogoutRequest;
use docstore_daemon::http_server::api::client::ApiError;

#[derive(Args, Debug, Clone)]
pub struct Logout {
    #[command(flatten)]
    pub request: LogoutRequest,
}

#[derive(Debug, thiserror::Error)]
pub enum LogoutError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Logout {
    type Error = LogoutError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        ctx.client.call(self.request.clone()).await?;
        Ok(format!("session {} ended", self.request.token))
    }
}
