//! HTTP route handlers for the vector index API.

use crate::error::VecsimError;
use crate::server::AppState;
use crate::vector::Vector;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, warn};

// --- Request/Response types ---

#[derive(Debug, Deserialize)]
pub struct AddRequest {
    pub id: String,
    pub vector: Vec<f32>,
}

#[derive(Deserialize)]
pub struct UploadRequest {
    pub items: Vec<AddRequest>,
}

#[derive(Deserialize)]
pub struct SearchRequest {
    pub vector: Vec<f32>,
    pub k: Option<usize>,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub total_vectors: usize,
    pub dimension: usize,
}

#[derive(Serialize)]
pub struct AddResponse {
    pub id: String,
    pub total_vectors: usize,
}

#[derive(Serialize)]
pub struct UploadFailure {
    pub id: String,
    pub error: String,
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub inserted: usize,
    pub failed: Vec<UploadFailure>,
    pub total_vectors: usize,
}

#[derive(Serialize)]
pub struct SearchHitResponse {
    pub id: String,
    pub confidence: f32,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchHitResponse>,
}

#[derive(Serialize)]
pub struct MetricsResponse {
    pub total_searches: u64,
    pub total_inserts: u64,
    pub total_clears: u64,
    pub avg_search_latency_us: f64,
    pub p50_search_latency_us: f64,
    pub p95_search_latency_us: f64,
    pub p99_search_latency_us: f64,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    (status, Json(ErrorResponse { error: msg.into() }))
}

fn lock_poisoned() -> ApiError {
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "Lock poisoned")
}

fn map_index_error(e: VecsimError) -> ApiError {
    let status = match e {
        VecsimError::DimensionMismatch { .. } | VecsimError::InvalidVector { .. } => {
            StatusCode::BAD_REQUEST
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    api_error(status, e.to_string())
}

// --- Router ---

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(status))
        .route("/add", post(add_vector))
        .route("/upload_vectors", post(upload_vectors))
        .route("/search", post(search_vectors))
        .route("/clear_all", delete(clear_all))
        .route("/metrics", get(get_metrics))
        .with_state(state)
}

// --- Handlers ---

async fn status(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, ApiError> {
    let index = state.index.read().map_err(|_| lock_poisoned())?;
    Ok(Json(StatusResponse {
        status: "ok".to_string(),
        total_vectors: index.len(),
        dimension: index.dimension(),
    }))
}

async fn add_vector(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddRequest>,
) -> Result<(StatusCode, Json<AddResponse>), ApiError> {
    let mut index = state.index.write().map_err(|_| lock_poisoned())?;

    let total = index
        .add(req.id.clone(), Vector::new(req.vector))
        .map_err(map_index_error)?;

    // The insert stays in memory even if the save fails; disk catches up
    // on the next successful save.
    if let Err(e) = index.save() {
        error!(error = %e, "snapshot save failed after add");
        return Err(map_index_error(e));
    }

    if let Ok(mut metrics) = state.metrics.write() {
        metrics.record_inserts(1);
    }

    Ok((
        StatusCode::CREATED,
        Json(AddResponse {
            id: req.id,
            total_vectors: total,
        }),
    ))
}

async fn upload_vectors(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UploadRequest>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut index = state.index.write().map_err(|_| lock_poisoned())?;

    // Best effort: each item validated and inserted independently, one
    // save after the whole batch.
    let mut inserted = 0usize;
    let mut failed = Vec::new();
    for item in req.items {
        match index.add(item.id.clone(), Vector::new(item.vector)) {
            Ok(_) => inserted += 1,
            Err(e) => failed.push(UploadFailure {
                id: item.id,
                error: e.to_string(),
            }),
        }
    }

    if let Err(e) = index.save() {
        error!(error = %e, "snapshot save failed after batch upload");
        return Err(map_index_error(e));
    }

    if !failed.is_empty() {
        warn!(rejected = failed.len(), inserted, "batch upload partially rejected");
    }
    if let Ok(mut metrics) = state.metrics.write() {
        metrics.record_inserts(inserted as u64);
    }

    Ok(Json(UploadResponse {
        inserted,
        failed,
        total_vectors: index.len(),
    }))
}

async fn search_vectors(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let k = req.k.unwrap_or(1);
    if k == 0 {
        return Err(api_error(StatusCode::BAD_REQUEST, "k must be at least 1"));
    }

    let start = Instant::now();

    let index = state.index.read().map_err(|_| lock_poisoned())?;
    let hits = index
        .search(&Vector::new(req.vector), k)
        .map_err(map_index_error)?;
    drop(index);

    let elapsed = start.elapsed();
    if let Ok(mut metrics) = state.metrics.write() {
        metrics.record_search(elapsed);
    }

    Ok(Json(SearchResponse {
        results: hits
            .into_iter()
            .map(|h| SearchHitResponse {
                id: h.id,
                confidence: h.confidence,
            })
            .collect(),
    }))
}

async fn clear_all(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut index = state.index.write().map_err(|_| lock_poisoned())?;

    index.clear();
    if let Err(e) = index.save() {
        error!(error = %e, "snapshot save failed after clear");
        return Err(map_index_error(e));
    }

    if let Ok(mut metrics) = state.metrics.write() {
        metrics.record_clear();
    }

    Ok(Json(serde_json::json!({"status": "cleared"})))
}

async fn get_metrics(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MetricsResponse>, ApiError> {
    let metrics = state.metrics.read().map_err(|_| lock_poisoned())?;

    Ok(Json(MetricsResponse {
        total_searches: metrics.total_searches(),
        total_inserts: metrics.total_inserts(),
        total_clears: metrics.total_clears(),
        avg_search_latency_us: metrics.avg_search_latency_us(),
        p50_search_latency_us: metrics.percentile_search_latency_us(50.0),
        p95_search_latency_us: metrics.percentile_search_latency_us(95.0),
        p99_search_latency_us: metrics.percentile_search_latency_us(99.0),
    }))
}
