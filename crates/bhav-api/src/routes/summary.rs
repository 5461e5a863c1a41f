//! 전체 요약 endpoint.

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;

use super::timestamp;
use crate::state::AppState;

/// GET /summary
pub async fn summary(State(state): State<Arc<AppState>>) -> Json<Value> {
    let summary = state.coordinator.summary().await;

    Json(json!({
        "status": "success",
        "timestamp": timestamp(),
        "statistics": summary.statistics,
        "exchanges": summary.exchanges
    }))
}

pub fn summary_router() -> Router<Arc<AppState>> {
    Router::new().route("/summary", get(summary))
}
