use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use stocktracker::app;
use stocktracker::config::{AppConfig, StoreBackend};
use stocktracker::logging::{init_logging, LoggingConfig};
use stocktracker::seed;
use stocktracker::state::AppState;
use stocktracker::store::{MemoryStore, PgStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(LoggingConfig::from_env()?)?;

    let config = AppConfig::from_env()?;

    let state = match config.backend {
        StoreBackend::Postgres => {
            let database_url = config.database_url.as_deref()
                .ok_or("DATABASE_URL must be set")?;
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(database_url)
                .await?;

            tracing::info!("Running database migrations");
            sqlx::migrate!("./migrations").run(&pool).await?;
            AppState::new(PgStore::new(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store, data is lost on shutdown");
            AppState::new(MemoryStore::new())
        }
    };

    if config.seed_database {
        seed::run(&state).await?;
    }

    let app = app::create_app(state);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Stocktracker running at http://{}/", config.bind_addr);
    axum::serve(listener, app)
        .await?;

    Ok(())
}
