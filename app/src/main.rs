//! Eventbook HTTP server.

use eventbook::{
    AppState, Config, build_router,
    media::{CloudinaryUploader, DisabledUploader, ImageUploader},
    metrics,
    server::shutdown_signal,
};
use eventbook_auth::{PasswordHasher, TokenIssuer};
use eventbook_core::environment::SystemClock;
use eventbook_postgres::PostgresStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine; the environment may already be set.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eventbook=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Eventbook HTTP Server");

    let config = Config::from_env();
    info!(
        bind_address = %config.bind_address(),
        seed_route = config.server.enable_seed_route,
        metrics = config.server.enable_metrics,
        "Configuration loaded"
    );
    if config.auth.uses_dev_secret() {
        warn!("AUTH_JWT_SECRET is not set; using the development secret");
    }

    info!("Connecting to database...");
    let store = PostgresStore::connect(&config.postgres.url, &config.postgres.pool_settings()).await?;
    store.migrate().await?;
    info!("Database ready");

    let uploader: Arc<dyn ImageUploader> = match config.media.cloudinary() {
        Some(credentials) => {
            info!(
                cloud_name = %credentials.cloud_name,
                signature_algorithm = ?credentials.signature_algorithm,
                "Image uploads enabled"
            );
            Arc::new(CloudinaryUploader::new(credentials))
        }
        None => {
            warn!("Cloudinary credentials missing; image uploads disabled");
            Arc::new(DisabledUploader)
        }
    };

    let mut state = AppState::new(
        store,
        Arc::new(SystemClock),
        TokenIssuer::new(config.auth.jwt_secret.as_bytes(), config.auth.session_ttl()),
        PasswordHasher::default(),
    )
    .with_uploader(uploader)
    .with_seed_route(config.server.enable_seed_route);

    if config.server.enable_metrics {
        let handle = metrics::install_prometheus_recorder()?;
        metrics::register_business_metrics();
        state = state.with_metrics(handle);
    }

    let app = build_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "Server listening");

    // Start the shutdown timer once the signal arrives.
    let stopping = Arc::new(Notify::new());
    let server = {
        let stopping = stopping.clone();
        axum::serve(listener, app).with_graceful_shutdown(async move {
            shutdown_signal().await;
            stopping.notify_one();
        })
    };
    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout);

    tokio::select! {
        result = async move { server.await } => result?,
        () = async {
            stopping.notified().await;
            tokio::time::sleep(shutdown_timeout).await;
        } => {
            warn!(timeout_secs = config.server.shutdown_timeout, "Graceful shutdown timed out");
        }
    }

    info!("Server stopped");
    Ok(())
}
