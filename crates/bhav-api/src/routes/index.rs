//! 서비스 정보 endpoint.

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::state::AppState;

/// GET /
pub async fn api_info(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "message": "NSE/BSE Bhavcopy Archive API",
        "version": state.version,
        "endpoints": {
            "GET /": "API information",
            "GET /health": "Health check",
            "GET /status": "Get data status for all exchanges",
            "GET /status/<exchange>": "Get data status for specific exchange",
            "POST /refresh": "Refresh data for selected exchanges",
            "POST /refresh/<exchange>": "Refresh data for specific exchange",
            "GET /summary": "Get data summary",
            "GET /config": "Get current configuration",
            "GET /metrics": "Prometheus metrics"
        }
    }))
}

pub fn index_router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(api_info))
}
