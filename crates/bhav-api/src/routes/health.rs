//! 헬스 체크 endpoint.

use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::timestamp;
use crate::state::AppState;

/// 헬스 체크 응답 구조체.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// 서비스 상태 ("healthy")
    pub status: String,

    /// 현재 시간 (RFC 3339)
    pub timestamp: String,

    /// 설정 로드 여부
    pub config_loaded: bool,

    /// 코디네이터 준비 여부
    pub data_manager_ready: bool,

    /// API 버전
    pub version: String,

    /// 서버 업타임(초)
    pub uptime_secs: i64,
}

/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: timestamp(),
        config_loaded: true,
        data_manager_ready: true,
        version: state.version.clone(),
        uptime_secs: state.uptime_secs(),
    })
}

pub fn health_router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health_check))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::create_test_state;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_check_returns_json() {
        let (state, _) = create_test_state(&[]).await;
        let app = health_router().with_state(state);

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let health: HealthResponse = serde_json::from_slice(&body).unwrap();

        assert_eq!(health.status, "healthy");
        assert!(health.config_loaded);
        assert!(!health.version.is_empty());
        assert!(health.uptime_secs >= 0);
    }
}
