use anyhow::Context as _;
use api::db::{connect_pool, PgStore};
use munch_server::settings::{Settings, DEVELOPMENT_SECRET};
use munch_server::{init_tracing, router, shutdown_signal, AppState};
use store::{DocumentStore, MemoryStore};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let settings = Settings::new().context("Failed to load settings")?;
    if settings.auth.secret == DEVELOPMENT_SECRET {
        warn!("MUNCH_AUTH_SECRET is not set; using the development secret");
    }
    let auth = settings.auth.config();

    if settings.database.memory {
        info!("Using in-memory store");
        return serve(AppState::new(MemoryStore::new(), &auth), &settings).await;
    }

    info!("Connecting to database...");
    let pool = connect_pool(&settings.database.url(), settings.database.connections)
        .await
        .context("Failed to connect to database")?;
    let store = PgStore::new(pool);
    store.migrate().await.context("Failed to run migrations")?;

    serve(AppState::new(store, &auth), &settings).await
}

async fn serve<S: DocumentStore>(state: AppState<S>, settings: &Settings) -> anyhow::Result<()> {
    let address = settings.server.address();
    info!("Binding to {address}");
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;

    info!("Server running on {address}");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}
