mod cli;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use qrtrack_core::Repository;
use qrtrack_gateway::{App, AppState};
use qrtrack_generator::PngRenderer;
use qrtrack_issuer::IssuerService;
use qrtrack_redirector::RedirectorService;
use qrtrack_storage::{InMemoryRepository, PostgresRepository};
use qrtrack_uploader::CloudinaryHost;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::cli::{Cli, StorageBackendArg};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_file = cli::load_env_file();
    let config = Cli::parse();
    let _telemetry = qrtrack_telemetry::init(config.telemetry())?;

    if let Some(path) = env_file {
        info!(path = %path.display(), "loaded settings from env file");
    }

    info!(
        listen_addr = %config.listen_addr(),
        public_base_url = %config.public_base_url,
        storage_backend = %config.storage,
        scan_mode = %config.scan_mode,
        "starting qrtrack"
    );

    match config.storage {
        StorageBackendArg::InMemory => {
            run_server(&config, Arc::new(InMemoryRepository::new())).await?;
        }
        StorageBackendArg::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database.db_max_connections)
                .connect_with(config.database.connect_options())
                .await
                .context("failed to connect to postgres")?;
            let repository = PostgresRepository::new(pool);
            repository
                .ensure_schema()
                .await
                .context("failed to prepare qr_codes table")?;
            run_server(&config, Arc::new(repository)).await?;
        }
    }

    Ok(())
}

async fn run_server<R: Repository>(config: &Cli, repository: Arc<R>) -> anyhow::Result<()> {
    let staging_dir = config.staging_dir();
    tokio::fs::create_dir_all(&staging_dir)
        .await
        .with_context(|| format!("failed to create staging dir {}", staging_dir.display()))?;

    let issuer = IssuerService::new(
        Arc::clone(&repository),
        PngRenderer::default(),
        CloudinaryHost::new(config.cloudinary.config()),
        config.public_base_url.as_str(),
        staging_dir,
    );
    let redirector = RedirectorService::new(repository);
    let state = AppState::new(Arc::new(issuer), Arc::new(redirector), config.presenter());

    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(listener, App::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
    }
    info!("shutting down");
}
