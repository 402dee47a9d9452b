use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use meme_generator_api::{
    aws_clients::{create_dynamodb_client, create_sdk_config},
    config::Config,
    imgflip::ImgflipClient,
    repositories::{DynamoMemeRepository, DynamoStatusRepository, DynamoUploadRepository},
    routes::create_router,
    startup::init_tables,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (logging)
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "meme_generator_api=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = Config::load().context("Failed to load configuration")?;
    tracing::info!(bind_address = %config.bind_address, table_prefix = %config.table_prefix, "Loaded configuration");
    if config.imgflip_credentials().is_none() {
        tracing::warn!(
            "Imgflip credentials not configured; template browsing will work but meme composition will fail"
        );
    }

    // --- DynamoDB client ---
    tracing::info!("Initializing DynamoDB client...");
    let sdk_config = create_sdk_config(&config).await;
    let db_client = create_dynamodb_client(&sdk_config);

    init_tables(&db_client, &config).await?;

    // --- Imgflip client ---
    let renderer = ImgflipClient::new(
        config.imgflip_api_base.clone(),
        config.imgflip_credentials(),
        config.provider_timeout,
    )
    .context("Failed to build Imgflip HTTP client")?;

    // --- Application State ---
    let state = Arc::new(AppState {
        meme_repo: Arc::new(DynamoMemeRepository::new(
            db_client.clone(),
            config.memes_table(),
        )),
        upload_repo: Arc::new(DynamoUploadRepository::new(
            db_client.clone(),
            config.uploads_table(),
        )),
        status_repo: Arc::new(DynamoStatusRepository::new(
            db_client,
            config.status_checks_table(),
        )),
        renderer: Arc::new(renderer),
    });

    let app = create_router(state);

    // --- Server Startup ---
    tracing::info!("Server listening on http://{}", config.bind_address);
    let listener = tokio::net::TcpListener::bind(config.bind_address)
        .await
        .context("Failed to bind listener")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Clients (DynamoDB, reqwest) are dropped here, releasing their
    // connections deterministically.
    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server shuts
/// down cleanly whether stopped interactively or by a process manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
