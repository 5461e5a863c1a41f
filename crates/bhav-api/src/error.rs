//! 통합 API 에러 응답 타입.
//!
//! 모든 엔드포인트의 실패 응답은 `status: "error"` 와 `message` 를 포함합니다.

use axum::http::StatusCode;
use axum::Json;
use bhav_core::{BhavError, ExchangeSegment};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 통합 API 에러 응답.
///
/// # 예시
///
/// ```json
/// {
///   "status": "error",
///   "message": "Invalid exchange: MCX_FO. Valid exchanges: NSE_EQ, ...",
///   "valid_exchanges": ["NSE_EQ", "NSE_FO", "NSE_SME", "NSE_INDEX", "BSE_EQ", "BSE_INDEX"]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// 항상 "error"
    pub status: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 대상 세그먼트
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
    /// 유효한 세그먼트 식별자 목록
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_exchanges: Option<Vec<String>>,
    /// 사용 가능한 엔드포인트 목록 (404)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_endpoints: Option<Vec<String>>,
    /// 추가 상세 정보
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ApiErrorResponse {
    /// 기본 에러 생성.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            exchange: None,
            valid_exchanges: None,
            available_endpoints: None,
            details: None,
        }
    }

    /// 세그먼트 정보 추가.
    #[must_use]
    pub fn with_exchange(mut self, exchange: impl Into<String>) -> Self {
        self.exchange = Some(exchange.into());
        self
    }

    /// 상세 정보 추가.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// 400 응답.
    pub fn bad_request(message: impl Into<String>) -> (StatusCode, Json<Self>) {
        (StatusCode::BAD_REQUEST, Json(Self::new(message)))
    }

    /// 500 응답.
    pub fn internal(message: impl Into<String>) -> (StatusCode, Json<Self>) {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(Self::new(message)))
    }

    /// 입력 검증 에러 → 400. 알 수 없는 세그먼트면 유효 목록을 포함합니다.
    pub fn from_validation(err: &BhavError) -> (StatusCode, Json<Self>) {
        let mut body = Self::new(err.to_string());
        if let BhavError::UnknownSegments { valid, .. } = err {
            body.valid_exchanges = Some(valid.clone());
        }
        (StatusCode::BAD_REQUEST, Json(body))
    }

    /// 경로의 세그먼트 식별자가 유효하지 않을 때 → 400.
    pub fn invalid_exchange(raw: &str) -> (StatusCode, Json<Self>) {
        let valid = ExchangeSegment::valid_ids();
        let mut body = Self::new(format!(
            "Invalid exchange: {}. Valid exchanges: {}",
            raw.trim().to_uppercase(),
            valid.join(", ")
        ));
        body.valid_exchanges = Some(valid);
        (StatusCode::BAD_REQUEST, Json(body))
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.status, self.message)
    }
}

impl std::error::Error for ApiErrorResponse {}

/// 핸들러 Result 타입.
pub type ApiResult<T> = Result<T, (StatusCode, Json<ApiErrorResponse>)>;
