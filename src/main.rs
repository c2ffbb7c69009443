use anyhow::Context;
use datehub::{
    config::Config,
    genai::Assist,
    hub::Hub,
    persistence::Persistence,
    storage::Storage,
    AppState,
};
use sqlx::sqlite::SqlitePoolOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    if config.api_key.is_none() {
        info!("API_KEY not set, AI features will use their fallbacks");
    }

    let db_pool = SqlitePoolOptions::new()
        .max_connections(16)
        .connect(&config.database_url)
        .await
        .with_context(|| format!("opening {}", config.database_url))?;

    let storage = Storage::new(db_pool).await?;
    let hub = Hub::load(Persistence::new(storage)).await.shared();
    let assist = Assist::new(&config)?;

    let app = datehub::app(AppState { hub, assist });

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
