//! Market Backend Binary
//!
//! Main entry point for the market backend service.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
#[cfg(feature = "mocks")]
use market_backend_lib::data::market_db::mock_repository::MockRepository;
use market_backend_lib::{
    api::create_app,
    config::{Config, LogFormat},
    data::market_db::{client::DBClient, repository::postgres::Repository},
    log::initialize_logging,
    services::Services,
};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "market-backend")]
#[command(about = "Market Backend Service", long_about = None)]
struct Args {
    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Override server host
    #[arg(long)]
    host: Option<String>,

    /// Override server port
    #[arg(short, long)]
    port: Option<u16>,

    /// Override database URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Override log format (auto, json or text)
    #[arg(long)]
    log_format: Option<LogFormat>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config()?;
    config.validate().context("Invalid configuration")?;

    initialize_logging(config.log_format);

    info!("Starting Market Backend");
    info!("Server will run on {}:{}", config.host, config.port);

    let db_client = create_db_client(&config).await?;
    let services = Services::new(db_client, config.pagination.default_limit);

    // Start server
    let app = create_app(services);
    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .context("Failed to bind TCP listener")?;

    info!("Server listening on http://{}:{}", config.host, config.port);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn load_config() -> Result<Config> {
    let args = Args::parse();

    let mut config = match args.config {
        Some(path) => Config::from_file(&path)
            .with_context(|| format!("Failed to read config file: {}", path))?,
        None => {
            debug!("No config file specified, using defaults");
            Config::default()
        }
    };

    // Apply CLI overrides
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(database_url) = args.database_url {
        config.database.url = database_url;
        #[cfg(feature = "mocks")]
        {
            config.database.mock_mode = false;
        }
    }
    if let Some(log_format) = args.log_format {
        config.log_format = log_format;
    }

    Ok(config)
}

async fn create_db_client(config: &Config) -> Result<DBClient> {
    let limits = config.pagination.page_limits();

    #[cfg(feature = "mocks")]
    {
        if config.database.mock_mode {
            info!("Using mock repository (mock_mode enabled)");

            let client = DBClient::new(Arc::new(MockRepository::new()), limits);

            // Test the connection (mock always succeeds)
            client
                .test_connection()
                .await
                .context("Failed to test mock connection")?;

            return Ok(client);
        }
    }

    market_db::run_migrations(&config.database.url)
        .await
        .context("Failed to run database migrations")?;

    // Initialize real repository for database access
    let repository = Repository::new(&config.database.url, config.database.pool.settings())
        .await
        .context("Failed to create repository with database connection")?;

    let client = DBClient::new(Arc::new(repository), limits);

    // Test the connection
    client
        .test_connection()
        .await
        .context("Failed to connect to PostgreSQL")?;

    info!("Connected to PostgreSQL database");
    Ok(client)
}
