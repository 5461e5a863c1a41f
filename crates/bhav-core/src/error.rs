//! 아카이브 시스템의 에러 타입.
//!
//! 요청 검증과 설정 단계에서 발생하는 에러를 정의합니다.
//! 저장소/다운로드 에러는 `bhav-data` 크레이트의 `DataError`가 담당합니다.

use thiserror::Error;

/// 핵심 도메인 에러.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BhavError {
    /// 일반 입력 검증 실패
    #[error("{0}")]
    Validation(String),

    /// 알 수 없는 거래소/세그먼트 식별자
    #[error("Invalid exchanges: {}. Valid exchanges: {}", invalid.join(", "), valid.join(", "))]
    UnknownSegments {
        /// 거부된 식별자 (요청에 들어온 그대로)
        invalid: Vec<String>,
        /// 허용되는 식별자 목록
        valid: Vec<String>,
    },

    /// 날짜 형식 오류 (YYYY-MM-DD 가 아님)
    #[error("Invalid date format: {0}. Use YYYY-MM-DD format")]
    InvalidDate(String),

    /// 설정 에러
    #[error("Configuration error: {0}")]
    Config(String),
}

/// 핵심 작업을 위한 Result 타입.
pub type BhavResult<T> = Result<T, BhavError>;

impl BhavError {
    /// 요청 검증 단계의 에러인지 확인합니다 (HTTP 400 대상).
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            BhavError::Validation(_) | BhavError::UnknownSegments { .. } | BhavError::InvalidDate(_)
        )
    }
}

impl From<config::ConfigError> for BhavError {
    fn from(err: config::ConfigError) -> Self {
        BhavError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_segments_message_lists_both_sides() {
        let err = BhavError::UnknownSegments {
            invalid: vec!["MCX_FO".to_string()],
            valid: vec!["NSE_EQ".to_string(), "BSE_EQ".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Invalid exchanges: MCX_FO. Valid exchanges: NSE_EQ, BSE_EQ"
        );
        assert!(err.is_validation());
    }

    #[test]
    fn test_config_error_is_not_validation() {
        let err = BhavError::Config("bad port".to_string());
        assert!(!err.is_validation());
    }
}
