//! 갱신 endpoint.
//!
//! 본문은 비어 있어도 됩니다. 날짜 형식 검증은 갱신 로직보다 먼저 수행됩니다.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use bhav_core::{parse_optional_date, ExchangeSegment, RefreshOutcome};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

use super::timestamp;
use crate::error::{ApiErrorResponse, ApiResult};
use crate::state::AppState;

/// 갱신 요청 본문. 모든 필드는 선택입니다.
#[derive(Debug, Default, Deserialize)]
pub struct RefreshRequest {
    /// 대상 세그먼트 (없거나 비어 있으면 전체)
    #[serde(default)]
    pub exchanges: Option<Vec<String>>,
    /// 시작일 (YYYY-MM-DD)
    #[serde(default)]
    pub start_date: Option<String>,
    /// 종료일 (YYYY-MM-DD)
    #[serde(default)]
    pub end_date: Option<String>,
}

impl RefreshRequest {
    /// 요청 본문 파싱. 공백뿐인 본문은 기본값입니다.
    pub fn from_body(body: &[u8]) -> ApiResult<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| ApiErrorResponse::bad_request(format!("Invalid JSON body: {}", e)))
    }

    /// 시작/종료일 검증.
    pub fn dates(&self) -> ApiResult<(Option<NaiveDate>, Option<NaiveDate>)> {
        let start = parse_optional_date(self.start_date.as_deref())
            .map_err(|e| ApiErrorResponse::from_validation(&e))?;
        let end = parse_optional_date(self.end_date.as_deref())
            .map_err(|e| ApiErrorResponse::from_validation(&e))?;
        Ok((start, end))
    }
}

/// POST /refresh
///
/// 여러 세그먼트를 갱신합니다. 알 수 없는 식별자가 있으면 아무것도 갱신하지 않고 400.
pub async fn refresh_all(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    let request = RefreshRequest::from_body(&body)?;
    let (start, end) = request.dates()?;
    let identifiers = request.exchanges.unwrap_or_default();

    let batch = state
        .coordinator
        .refresh_many(&identifiers, start, end)
        .await
        .map_err(|e| {
            warn!(error = %e, "갱신 요청 거부");
            ApiErrorResponse::from_validation(&e)
        })?;

    info!(summary = %batch.summary(), "배치 갱신 요청 처리 완료");

    Ok(Json(json!({
        "status": batch.status(),
        "timestamp": timestamp(),
        "summary": batch.summary(),
        "results": batch.results
    })))
}

/// POST /refresh/{exchange}
///
/// 단일 세그먼트 갱신. 실패하면 500 과 함께 실패 결과를 `details` 에 담습니다.
pub async fn refresh_exchange(
    State(state): State<Arc<AppState>>,
    Path(exchange): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    let segment: ExchangeSegment = exchange
        .parse()
        .map_err(|_| ApiErrorResponse::invalid_exchange(&exchange))?;

    let request = RefreshRequest::from_body(&body)?;
    let (start, end) = request.dates()?;

    let outcome = state.coordinator.refresh_one(segment, start, end).await;

    if outcome.is_success() {
        return Ok(Json(json!({
            "status": "success",
            "timestamp": timestamp(),
            "exchange": segment,
            "data": outcome
        })));
    }

    let message = match &outcome {
        RefreshOutcome::Failed(failure) => failure.error.clone(),
        RefreshOutcome::Completed(report) => report.message.clone(),
    };
    let details = serde_json::to_value(&outcome).unwrap_or(Value::Null);

    Err((
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(
            ApiErrorResponse::new(message)
                .with_exchange(segment.as_str())
                .with_details(details),
        ),
    ))
}

pub fn refresh_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/refresh", post(refresh_all))
        .route("/refresh/{exchange}", post(refresh_exchange))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::create_test_state;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    async fn post_json(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[test]
    fn test_request_from_empty_body() {
        let request = RefreshRequest::from_body(b"  ").unwrap();
        assert!(request.exchanges.is_none());
        assert_eq!(request.dates().unwrap(), (None, None));
    }

    #[test]
    fn test_request_rejects_bad_date() {
        let request = RefreshRequest::from_body(br#"{"start_date": "10-06-2024"}"#).unwrap();
        let (status, Json(body)) = request.dates().unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.message.contains("10-06-2024"));
    }

    #[tokio::test]
    async fn test_refresh_all_with_empty_body() {
        let (state, _) = create_test_state(&[]).await;
        let app = refresh_router().with_state(state);

        let (status, value) = post_json(app, "/refresh", "").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["status"], "success");
        assert_eq!(value["summary"], "6/6 exchanges refreshed successfully");
        // 06-07 금, 06-10 월
        assert_eq!(value["results"]["BSE_INDEX"]["dates_processed"], 2);
        assert_eq!(value["results"]["BSE_INDEX"]["last_file_date"], "2024-06-10");
    }

    #[tokio::test]
    async fn test_refresh_all_with_empty_exchange_list_targets_every_segment() {
        let (state, store) = create_test_state(&[]).await;
        let app = refresh_router().with_state(state);

        let (status, value) = post_json(app, "/refresh", r#"{"exchanges": []}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["summary"], "6/6 exchanges refreshed successfully");
        assert_eq!(value["results"].as_object().unwrap().len(), 6);
        assert_eq!(store.dates(ExchangeSegment::BseEq).await.len(), 3);
    }

    #[tokio::test]
    async fn test_refresh_all_partial() {
        let (state, _) = create_test_state(&[ExchangeSegment::NseSme]).await;
        let app = refresh_router().with_state(state);

        let (status, value) = post_json(
            app,
            "/refresh",
            r#"{"exchanges": ["NSE_EQ", "nse_sme"], "start_date": "2024-06-07"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["status"], "partial");
        assert_eq!(value["summary"], "1/2 exchanges refreshed successfully");
        assert_eq!(value["results"]["NSE_SME"]["success"], false);
        assert_eq!(value["results"]["NSE_EQ"]["success"], true);
    }

    #[tokio::test]
    async fn test_refresh_all_rejects_unknown_exchange() {
        let (state, store) = create_test_state(&[]).await;
        let app = refresh_router().with_state(state);

        let (status, value) = post_json(
            app,
            "/refresh",
            r#"{"exchanges": ["NSE_EQ", "LSE_EQ"]}"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["status"], "error");
        assert!(value["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid exchanges: LSE_EQ"));
        // 아무 세그먼트도 갱신되지 않음
        assert_eq!(store.dates(ExchangeSegment::NseEq).await.len(), 1);
    }

    #[tokio::test]
    async fn test_refresh_all_rejects_bad_date_before_exchanges() {
        let (state, _) = create_test_state(&[]).await;
        let app = refresh_router().with_state(state);

        let (status, value) = post_json(
            app,
            "/refresh",
            r#"{"exchanges": ["LSE_EQ"], "end_date": "2024/06/10"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(value["message"].as_str().unwrap().contains("YYYY-MM-DD"));
    }

    #[tokio::test]
    async fn test_refresh_all_rejects_malformed_json() {
        let (state, _) = create_test_state(&[]).await;
        let app = refresh_router().with_state(state);

        let (status, value) = post_json(app, "/refresh", "{not json").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(value["message"].as_str().unwrap().starts_with("Invalid JSON body"));
    }

    #[tokio::test]
    async fn test_refresh_exchange_success() {
        let (state, _) = create_test_state(&[]).await;
        let app = refresh_router().with_state(state);

        let (status, value) = post_json(app, "/refresh/bse_eq", "").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["status"], "success");
        assert_eq!(value["exchange"], "BSE_EQ");
        assert_eq!(value["data"]["success"], true);
        assert_eq!(value["data"]["start_date"], "2024-06-07");
        assert_eq!(value["data"]["end_date"], "2024-06-10");
        assert_eq!(value["data"]["total_files"], 3);
    }

    #[tokio::test]
    async fn test_refresh_exchange_no_op_window() {
        let (state, _) = create_test_state(&[]).await;
        let app = refresh_router().with_state(state);

        let (status, value) = post_json(
            app,
            "/refresh/NSE_FO",
            r#"{"start_date": "2024-06-08", "end_date": "2024-06-09"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["data"]["dates_processed"], 0);
        assert_eq!(value["data"]["message"], "No trading days in date range");
    }

    #[tokio::test]
    async fn test_refresh_exchange_failure_is_500() {
        let (state, _) = create_test_state(&[ExchangeSegment::NseIndex]).await;
        let app = refresh_router().with_state(state);

        let (status, value) = post_json(app, "/refresh/NSE_INDEX", "{}").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(value["status"], "error");
        assert_eq!(value["exchange"], "NSE_INDEX");
        assert_eq!(value["message"], "Some downloads failed");
        assert_eq!(value["details"]["success"], false);
    }

    #[tokio::test]
    async fn test_refresh_exchange_unknown_is_400() {
        let (state, _) = create_test_state(&[]).await;
        let app = refresh_router().with_state(state);

        let (status, value) = post_json(app, "/refresh/NSE_XX", "").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(value["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid exchange: NSE_XX"));
    }
}
