//! 세그먼트 신선도 endpoint.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use bhav_core::ExchangeSegment;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::error;

use super::timestamp;
use crate::error::{ApiErrorResponse, ApiResult};
use crate::state::AppState;

/// GET /status
///
/// 전체 세그먼트 상태. 저장소 오류는 해당 세그먼트 항목에 `error` 로 표시됩니다.
pub async fn all_status(State(state): State<Arc<AppState>>) -> Json<Value> {
    let exchanges = state.coordinator.status_all().await;

    Json(json!({
        "status": "success",
        "timestamp": timestamp(),
        "exchanges": exchanges
    }))
}

/// GET /status/{exchange}
pub async fn exchange_status(
    State(state): State<Arc<AppState>>,
    Path(exchange): Path<String>,
) -> ApiResult<Json<Value>> {
    let segment: ExchangeSegment = exchange
        .parse()
        .map_err(|_| ApiErrorResponse::invalid_exchange(&exchange))?;

    let status = state.coordinator.status(segment).await.map_err(|e| {
        error!(segment = %segment, error = %e, "세그먼트 상태 조회 실패");
        let (code, Json(body)) = ApiErrorResponse::internal(e.to_string());
        (code, Json(body.with_exchange(segment.as_str())))
    })?;

    Ok(Json(json!({
        "status": "success",
        "timestamp": timestamp(),
        "exchange": segment,
        "data": status
    })))
}

pub fn status_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/status", get(all_status))
        .route("/status/{exchange}", get(exchange_status))
}
