//! 에러 타입 정의.

use bhav_core::BhavError;
use bhav_data::DataError;
use std::fmt;

/// Collector 에러 타입
#[derive(Debug)]
pub enum CollectorError {
    /// 입력 검증/설정 에러
    Core(BhavError),
    /// 저장소/다운로드 에러
    Data(DataError),
    /// 설정 에러
    Config(String),
    /// 일반 에러
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl CollectorError {
    /// 입력 검증 실패인지 확인합니다.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Core(e) if e.is_validation())
    }
}

impl fmt::Display for CollectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Core(e) => write!(f, "{}", e),
            Self::Data(e) => write!(f, "{}", e),
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::Other(e) => write!(f, "Error: {}", e),
        }
    }
}

impl std::error::Error for CollectorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Core(e) => Some(e),
            Self::Data(e) => Some(e),
            Self::Config(_) => None,
            Self::Other(e) => Some(e.as_ref()),
        }
    }
}

impl From<BhavError> for CollectorError {
    fn from(err: BhavError) -> Self {
        Self::Core(err)
    }
}

impl From<DataError> for CollectorError {
    fn from(err: DataError) -> Self {
        Self::Data(err)
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for CollectorError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Self::Other(err)
    }
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, CollectorError>;
