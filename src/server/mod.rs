//! HTTP API server around the vector index.

pub mod routes;

use crate::config::Config;
use crate::index::VectorIndex;
use crate::metrics::MetricsCollector;
use std::sync::{Arc, RwLock};
use tracing::info;

/// Shared application state, owned here by the composition root and
/// handed to request handlers by `Arc`. No handler touches the index
/// outside these locks.
pub struct AppState {
    pub index: RwLock<VectorIndex>,
    pub metrics: RwLock<MetricsCollector>,
}

impl AppState {
    pub fn new(index: VectorIndex) -> Self {
        Self {
            index: RwLock::new(index),
            metrics: RwLock::new(MetricsCollector::new()),
        }
    }
}

/// Open the index for `config` and serve it on `addr`.
pub async fn start(addr: &str, config: &Config) -> anyhow::Result<()> {
    let index = VectorIndex::open(config)?;
    let state = Arc::new(AppState::new(index));

    let app = routes::create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, dimension = config.dimension, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
