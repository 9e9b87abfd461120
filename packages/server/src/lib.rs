//! # Munch server — HTTP surface for the food-truck backend
//!
//! Wires the `api` components into an axum [`Router`]:
//!
//! | Method & path | Handler |
//! |---------------|---------|
//! | `GET /health` | [`routes::health`] |
//! | `POST /register`, `POST /login` | [`routes::users`] |
//! | `GET /profile`, `GET/PUT /users/{id}` | [`routes::users`] |
//! | `GET/POST /foodtrucks`, `GET/PUT /foodtrucks/{id}` | [`routes::food_trucks`] |
//! | `GET /foodtrucks/{id}/reviews` | [`routes::reviews`] |
//! | `GET/POST /reviews`, `GET /reviews/{id}` | [`routes::reviews`] |
//!
//! The router is generic over the [`DocumentStore`], so the binary serves
//! PostgreSQL while the integration tests drive the same routes over
//! [`store::MemoryStore`].
//!
//! ## Configuration
//!
//! [`settings::Settings`] layers defaults, an optional `config.toml` and
//! `MUNCH_*` environment variables (`MUNCH_DATABASE_HOST`, `MUNCH_AUTH_SECRET`,
//! `MUNCH_SERVER_PORT`, ...). Log output is filtered with `RUST_LOG`.

use std::time::Duration;

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    routing::{get, post},
    Router,
};
use store::DocumentStore;
use tokio::signal::{self, ctrl_c};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

pub mod error;
pub mod extract;
pub mod routes;
pub mod settings;
pub mod state;

pub use state::AppState;

pub fn init_tracing() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
}

/// Build the application router over `state`.
pub fn router<S: DocumentStore>(state: AppState<S>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/health", get(routes::health))
        .route("/register", post(routes::users::register::<S>))
        .route("/login", post(routes::users::login::<S>))
        .route("/profile", get(routes::users::profile::<S>))
        .route(
            "/users/{id}",
            get(routes::users::get_user::<S>).put(routes::users::update_user::<S>),
        )
        .route(
            "/foodtrucks",
            get(routes::food_trucks::list::<S>).post(routes::food_trucks::create::<S>),
        )
        .route(
            "/foodtrucks/{id}",
            get(routes::food_trucks::get::<S>).put(routes::food_trucks::update::<S>),
        )
        .route(
            "/foodtrucks/{id}/reviews",
            get(routes::reviews::for_food_truck::<S>),
        )
        .route(
            "/reviews",
            get(routes::reviews::list::<S>).post(routes::reviews::submit::<S>),
        )
        .route("/reviews/{id}", get(routes::reviews::get::<S>))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(err) => {
                tracing::error!("failed to install signal handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
