//! IoT Lock visitor client
//!
//! Command-line client for the smart lock backend: sign in, review the visitor
//! history, approve or deny visitors at the door, and enroll known faces.

mod api;
mod auth;
mod commands;
mod config;
mod db;
mod devices;
mod enrollment;
mod errors;
mod inflight;
mod models;
mod notifications;
mod session;
mod visits;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use api::ApiClient;
use commands::Command;
use config::{Config, LogFormat};
use db::Repository;
use devices::DeviceRegistrar;
use errors::ClientError;
use session::SessionStore;

/// Application context shared by every controller.
///
/// Created once at startup; the session inside it is loaded before any
/// command runs and cleared on logout.
#[derive(Clone)]
pub struct AppContext {
    pub api: Arc<ApiClient>,
    pub session: Arc<SessionStore>,
    pub devices: Arc<DeviceRegistrar>,
    pub config: Arc<Config>,
}

impl AppContext {
    /// Open local storage, build the HTTP client and load the stored session.
    pub async fn init(config: Config) -> Result<Self, ClientError> {
        let pool = db::init_database(&config.session_db_path).await?;
        let repo = Repository::new(pool);

        let api = Arc::new(ApiClient::new(
            config.api_base_url.clone(),
            config.api_key.clone(),
        )?);
        let session = Arc::new(SessionStore::new(repo.clone()));
        let devices = Arc::new(DeviceRegistrar::new(
            Arc::clone(&api),
            repo,
            config.platform,
        ));

        let ctx = Self {
            api,
            session,
            devices,
            config: Arc::new(config),
        };

        ctx.devices.load().await;
        if let Some(user) = ctx.session.load().await {
            tracing::info!("Restored session for {}", user.email);
        }

        Ok(ctx)
    }
}

#[derive(Parser)]
#[command(name = "iotlock")]
#[command(author, version, about = "Smart door visitor management")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    match config.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }

    tracing::debug!("Backend: {}", config.api_base_url);
    tracing::debug!("Session database: {:?}", config.session_db_path);

    let result = match AppContext::init(config).await {
        Ok(ctx) => commands::run(&ctx, cli.command).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("{}", failure_line(&e));
        std::process::exit(1);
    }
}

/// The single line printed when a command fails.
fn failure_line(err: &ClientError) -> String {
    format!("Error [{}]: {}", err.error_code(), err.message())
}
