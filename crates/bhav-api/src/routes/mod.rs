//! API 라우트.
//!
//! # 라우트 구조
//!
//! - `/` - 서비스 정보
//! - `/health` - 헬스 체크
//! - `/status`, `/status/{exchange}` - 세그먼트 신선도
//! - `/refresh`, `/refresh/{exchange}` - 갱신 실행
//! - `/summary` - 전체 요약
//! - `/config` - 현재 설정

pub mod config;
pub mod health;
pub mod index;
pub mod refresh;
pub mod status;
pub mod summary;

pub use config::config_router;
pub use health::{health_router, HealthResponse};
pub use index::index_router;
pub use refresh::{refresh_router, RefreshRequest};
pub use status::status_router;
pub use summary::summary_router;

use axum::http::StatusCode;
use axum::{Json, Router};
use std::sync::Arc;

use crate::error::ApiErrorResponse;
use crate::state::AppState;

/// 사용 가능한 엔드포인트 목록.
pub const AVAILABLE_ENDPOINTS: [&str; 9] = [
    "GET /",
    "GET /health",
    "GET /status",
    "GET /status/<exchange>",
    "POST /refresh",
    "POST /refresh/<exchange>",
    "GET /summary",
    "GET /config",
    "GET /metrics",
];

/// 전체 API 라우터 생성.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(index_router())
        .merge(health_router())
        .merge(status_router())
        .merge(refresh_router())
        .merge(summary_router())
        .merge(config_router())
        .fallback(not_found)
}

/// 알 수 없는 경로 → 404.
async fn not_found() -> (StatusCode, Json<ApiErrorResponse>) {
    let mut body = ApiErrorResponse::new("Endpoint not found");
    body.available_endpoints = Some(AVAILABLE_ENDPOINTS.iter().map(|e| e.to_string()).collect());
    (StatusCode::NOT_FOUND, Json(body))
}

/// 응답 타임스탬프 (RFC 3339).
pub(crate) fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::create_test_state;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_unknown_route_returns_404_with_endpoints() {
        let (state, _) = create_test_state(&[]).await;
        let app = create_api_router().with_state(state);

        let response = app
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.status, "error");
        assert_eq!(error.message, "Endpoint not found");
        assert!(error
            .available_endpoints
            .unwrap()
            .contains(&"POST /refresh/<exchange>".to_string()));
    }
}
