//! 현재 설정 endpoint.

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::state::AppState;

/// GET /config
pub async fn config_info(State(state): State<Arc<AppState>>) -> Json<Value> {
    let config = &state.config;

    Json(json!({
        "status": "success",
        "config": {
            "base_data_path": config.data.base_data_path.display().to_string(),
            "available_exchanges": bhav_core::ExchangeSegment::valid_ids(),
            "download_settings": {
                "max_concurrent_downloads": config.download.max_concurrent_downloads,
                "retry_attempts": config.download.retry_attempts,
                "timeout_seconds": config.download.timeout_seconds
            },
            "date_settings": {
                "base_start_date": config.dates.base_start_date,
                "weekend_skip": config.dates.weekend_skip,
                "holiday_skip": config.dates.holiday_skip,
                "freshness_tolerance_days": config.dates.freshness_tolerance_days,
                "holidays": config.dates.holidays.len()
            }
        }
    }))
}

pub fn config_router() -> Router<Arc<AppState>> {
    Router::new().route("/config", get(config_info))
}
