use clap::Args;

use docstore_daemon::http_server::api::auth::login::AuthRequest;
use docstore_daemon::http_server::api::client::ApiError;

#[derive(Args, Debug, Clone)]
pub struct Auth {
    #[command(flatten)]
    pub request: AuthRequest,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Auth {
    type Error = AuthError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let response = ctx.client.call(self.request.clone()).await?;
        Ok(response.response.token)
    }
}
