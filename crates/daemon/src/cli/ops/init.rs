use clap::Args;

use docstore_daemon::state::{AppConfig, AppState};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// API server port
    #[arg(long, default_value_t = docstore_daemon::state::DEFAULT_API_PORT)]
    pub api_port: u16,

    /// Lifetime of cached lookups, in seconds
    #[arg(long, default_value_t = 300)]
    pub cache_ttl_secs: u64,

    /// Keep serving cached documents and sessions after they are deleted
    #[arg(long)]
    pub no_invalidate: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] docstore_daemon::state::StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let config = AppConfig {
            api_port: self.api_port,
            cache_ttl_secs: self.cache_ttl_secs,
            invalidate_cache_on_write: !self.no_invalidate,
            ..AppConfig::default()
        };

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;

        let output = format!(
            "Initialized docstore directory at: {}\n\
             - Database: {}\n\
             - Config: {}\n\
             - API port: {}\n\
             - Admin token: {}",
            state.docstore_dir.display(),
            state.db_path.display(),
            state.config_path.display(),
            state.config.api_port,
            state.config.admin_token,
        );

        Ok(output)
    }
}
