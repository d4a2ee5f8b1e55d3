use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fraterny_affiliates::app;
use fraterny_affiliates::config::Config;
use fraterny_affiliates::db::Database;
use fraterny_affiliates::handlers::AppState;
use fraterny_affiliates::store::{InfluencerStore, MemoryInfluencerStore, PgInfluencerStore};

/// Main entry point for the application.
///
/// Initializes tracing, loads configuration, picks the influencer store
/// (Postgres when `DATABASE_URL` is set, in-memory otherwise) and starts the
/// Axum server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fraterny_affiliates=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    let store: Arc<dyn InfluencerStore> = match config.database_url {
        Some(ref url) => {
            let db = Database::new(url, config.db_max_connections).await?;
            tracing::info!("Database connection pool established");
            Arc::new(PgInfluencerStore::new(db.pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory influencer store");
            Arc::new(MemoryInfluencerStore::new())
        }
    };

    // Build application state
    let app_state = Arc::new(AppState {
        config: config.clone(),
        store,
    });

    let app = app::app(app_state, &config)?;

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
