use std::sync::Arc;

use axum::extract::FromRef;

use common::prelude::DocumentService;

use crate::database::{Database, DatabaseSetupError};
use crate::ServiceConfig;

/// Shared handles every request can reach
#[derive(Clone)]
pub struct State {
    database: Database,
    service: DocumentService<Database>,
    admin_token: Arc<str>,
}

impl State {
    pub async fn from_config(config: &ServiceConfig) -> Result<Self, StateSetupError> {
        let url = config.database_url()?;
        tracing::info!(database = %url, "connecting to document store");
        let database = Database::connect(&url).await?;

        Ok(Self::new(database, config))
    }

    /// Wrap an already connected database
    pub fn new(database: Database, config: &ServiceConfig) -> Self {
        let service = DocumentService::new(Arc::new(database.clone()), &config.cache);
        Self {
            database,
            service,
            admin_token: Arc::from(config.admin_token.as_str()),
        }
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn service(&self) -> &DocumentService<Database> {
        &self.service
    }

    pub fn admin_token(&self) -> &str {
        &self.admin_token
    }
}

impl FromRef<State> for Database {
    fn from_ref(state: &State) -> Self {
        state.database.clone()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("invalid database url: {0}")]
    DatabaseUrl(#[from] url::ParseError),

    #[error("failed to setup the database: {0}")]
    DatabaseSetup(#[from] DatabaseSetupError),
}
