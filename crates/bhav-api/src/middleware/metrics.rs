//! HTTP 요청 metrics middleware.
//!
//! 라벨은 요청 URI 가 아니라 매칭된 라우트 템플릿(`/status/{exchange}`)을 사용합니다.
//! 어떤 라우트에도 매칭되지 않은 요청은 모두 [`UNMATCHED_ROUTE`] 하나로 집계되므로
//! 임의의 URL 로 시계열 수가 늘어나지 않습니다.

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;

use crate::metrics::{record_http_duration, record_http_request, record_http_response};

/// fallback(404) 으로 처리된 요청의 라우트 라벨
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// 요청의 라우트 라벨.
pub fn route_label(request: &Request) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string())
}

/// HTTP 메트릭 수집 레이어. 라우트와 fallback 을 모두 감싸도록 `Router::layer` 로 적용합니다.
pub async fn metrics_layer(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = route_label(&request);

    record_http_request(&method, &route);
    let response = next.run(request).await;

    record_http_response(&method, &route, response.status().as_u16());
    record_http_duration(&method, &route, start.elapsed().as_secs_f64());

    response
}
