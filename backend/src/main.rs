use std::sync::Arc;

mod config;
mod error;
mod flows;
mod handlers;
mod models;
mod remote;
mod routes;
mod session;
mod views;

use config::Config;
use remote::{supabase::SupabaseClient, RemoteBackend};

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn RemoteBackend>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reflection_journal=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    // No degraded mode without a backend: refuse to start.
    let config = match Config::from_env() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    let backend: Arc<dyn RemoteBackend> = Arc::new(SupabaseClient::from_config(&config));
    tracing::info!(backend = %config.supabase_url, "Remote backend configured");

    let state = AppState {
        backend,
        config: config.clone(),
    };
    let app = routes::build_router(state);

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
