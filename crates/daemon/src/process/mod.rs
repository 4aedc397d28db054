pub mod utils;

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::http_server;
use crate::service_state::StateSetupError;
use crate::{ServiceConfig, ServiceState};

const FINAL_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);
const LOG_FILE_PREFIX: &str = "docstore.log";

/// Running server tasks plus the channel that stops them
pub struct ShutdownHandle {
    signal_task: JoinHandle<()>,
    servers: Vec<JoinHandle<()>>,
    shutdown_tx: watch::Sender<()>,
}

impl ShutdownHandle {
    /// Wait for a signal or [`shutdown`](Self::shutdown), then give the servers
    /// a bounded time to drain.
    pub async fn wait(self) -> Result<(), StartupError> {
        let _ = self.signal_task.await;

        timeout(FINAL_SHUTDOWN_TIMEOUT, join_all(self.servers))
            .await
            .map(|_| ())
            .map_err(|_| StartupError::ShutdownTimeout(FINAL_SHUTDOWN_TIMEOUT))
    }

    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("unable to install signal handlers: {0}")]
    Signals(#[from] std::io::Error),

    #[error("error creating server state: {0}")]
    State(#[from] StateSetupError),

    #[error("failed to shut down within {} seconds", .0.as_secs())]
    ShutdownTimeout(Duration),
}

impl StartupError {
    /// Process exit code reported for this failure
    pub fn exit_code(&self) -> i32 {
        match self {
            StartupError::Signals(_) => 2,
            StartupError::State(_) => 3,
            StartupError::ShutdownTimeout(_) => 4,
        }
    }
}

fn env_filter(level: tracing::Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy()
}

/// Install the global subscriber: compact stdout, plus a daily rolling file
/// when `log_dir` is set. The returned guards flush on drop.
fn init_logging(service_config: &ServiceConfig) -> Vec<WorkerGuard> {
    let level = service_config.log_level;
    let mut guards = Vec::new();

    let (stdout_writer, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());
    guards.push(stdout_guard);
    let stdout_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(stdout_writer)
        .with_filter(env_filter(level));

    let file_layer = service_config.log_dir.as_deref().map(|log_dir| {
        let (file_writer, file_guard) = tracing_appender::non_blocking(rolling_file(log_dir));
        guards.push(file_guard);
        tracing_subscriber::fmt::layer()
            .with_writer(file_writer)
            .with_ansi(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter(level))
    });

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .init();

    utils::register_panic_logger();
    utils::report_build_info();

    guards
}

fn rolling_file(log_dir: &Path) -> tracing_appender::rolling::RollingFileAppender {
    if let Err(e) = std::fs::create_dir_all(log_dir) {
        eprintln!("Warning: failed to create log directory {:?}: {}", log_dir, e);
    }
    tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX)
}

/// Build the service state and spawn the API server.
///
/// Dropping the returned handle does not stop the server; call
/// [`ShutdownHandle::shutdown`] or send SIGINT/SIGTERM.
pub async fn start_service(
    service_config: &ServiceConfig,
) -> Result<(ServiceState, ShutdownHandle), StartupError> {
    let (signal_task, shutdown_tx, shutdown_rx) = utils::graceful_shutdown_blocker()?;
    let state = ServiceState::from_config(service_config).await?;

    let api_addr = SocketAddr::from(([0, 0, 0, 0], service_config.api_port));
    let api_config = http_server::Config::new(api_addr);
    let api_state = state.clone();
    let api_server = tokio::spawn(async move {
        if let Err(e) = http_server::run_api(api_config, api_state, shutdown_rx).await {
            tracing::error!("API server error: {}", e);
        }
    });

    tracing::info!(
        api_port = service_config.api_port,
        cache_ttl_secs = service_config.cache.ttl.as_secs(),
        invalidate_on_write = service_config.cache.invalidate_on_write,
        "docstore running"
    );

    let handle = ShutdownHandle {
        signal_task,
        servers: vec![api_server],
        shutdown_tx,
    };
    Ok((state, handle))
}

/// Run the daemon until it is told to stop; exits the process on failure.
pub async fn spawn_service(service_config: &ServiceConfig) {
    let _guards = init_logging(service_config);

    let result = match start_service(service_config).await {
        Ok((_, handle)) => handle.wait().await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "daemon stopped abnormally");
        std::process::exit(e.exit_code());
    }
}
