mod config;
mod db;
mod entities;
mod error;
mod forms;
mod models;
mod notify;
mod routes;
mod store;
mod templates;

use std::sync::Arc;

use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::{Config, StoreBackend},
    store::{MemoryStore, MovieStore, SqliteStore},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn MovieStore>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,marquee=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Arc::new(Config::from_env()?);

    let store: Arc<dyn MovieStore> = match config.store_backend {
        StoreBackend::Sqlite => {
            let db = db::connect_and_migrate(&config.database_url).await?;
            Arc::new(SqliteStore::new(db, config.movies_collection.clone()))
        },
        StoreBackend::Memory => {
            tracing::warn!("using in-memory store, movies are lost on restart");
            Arc::new(MemoryStore::new(config.movies_collection.clone()))
        },
    };

    let state = Arc::new(AppState { config: config.clone(), store });

    let app = routes::router(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, collection = %config.movies_collection, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
