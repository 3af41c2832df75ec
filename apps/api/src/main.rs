mod catalog;
mod config;
mod db;
mod errors;
mod models;
mod roadmap;
mod routes;
mod skills;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::catalog::ContentCatalog;
use crate::config::Config;
use crate::db::create_pool;
use crate::routes::build_router;
use crate::skills::taxonomy::SkillTaxonomy;
use crate::state::AppState;
use crate::store::{MemoryStore, PgStore, RoadmapStore};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Guru API v{}", env!("CARGO_PKG_VERSION"));

    // Reference data: loaded once, read-only for the process lifetime
    let catalog = Arc::new(ContentCatalog::load(config.catalog_path.as_deref())?);
    let taxonomy = Arc::new(SkillTaxonomy::load(config.taxonomy_path.as_deref())?);

    let store: Arc<dyn RoadmapStore> = match &config.database_url {
        Some(url) => Arc::new(PgStore::new(
            create_pool(url, config.db_max_connections).await?,
        )),
        None => {
            warn!("DATABASE_URL not set, using in-memory store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let state = AppState::new(store, catalog, taxonomy);

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
