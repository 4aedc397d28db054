use clap::Args;

use docstore_daemon::http_server::api::auth::register::RegisterRequest;
use docstore_daemon::http_server::api::client::ApiError;
use docstore_daemon::state::{AppState, StateError};

#[derive(Args, Debug, Clone)]
pub struct Register {
    #[command(flatten)]
    pub request: RegisterRequest,
}

#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("no admin token given and config unavailable: {0}")]
    State(#[from] StateError),
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Register {
    type Error = RegisterError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut request = self.request.clone();
        if request.admin_token.is_none() {
            let state = AppState::load(ctx.config_path.clone())?;
            request.admin_token = Some(state.config.admin_token);
        }

        let response = ctx.client.call(request).await?;
        Ok(format!("registered {}", response.response.login))
    }
}
