use clap::Parser;

use lectern::app::{router, AppState};
use lectern::config::Config;
use lectern::db::post_repository::POSTS_COLLECTION;

/// Read-only content API for blog posts, authors and tags.
#[derive(Parser, Debug)]
#[command(name = "lectern", about, long_about = None)]
struct Args {
    /// Optional config file; environment variables take precedence.
    #[arg(long, env = "LECTERN_CONFIG")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lectern=info,tower_http=info".into()),
        )
        .init();

    tracing::info!("Starting Lectern server...");

    let config = Config::load(args.config.as_deref())?;

    // Connect to MongoDB
    let mongo_client = mongodb::Client::with_uri_str(&config.mongodb_uri).await?;
    let mongo_db = mongo_client.database(&config.mongodb_database);

    match mongo_db
        .collection::<bson::Document>(POSTS_COLLECTION)
        .estimated_document_count()
        .await
    {
        Ok(count) => tracing::info!(
            uri = %config.redacted_mongodb_uri(),
            database = %config.mongodb_database,
            posts = count,
            "Connected to MongoDB"
        ),
        Err(e) => tracing::warn!(
            uri = %config.redacted_mongodb_uri(),
            "MongoDB not reachable yet: {e}"
        ),
    }

    let state = AppState::from_database(&mongo_db, config.page_settings());
    let app = router(state, &config)?;

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(
        "Listening on http://{} (content API under {})",
        config.bind_addr,
        config.api_prefix
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
