//! 데이터 모듈 오류 타입.

use std::path::Path;
use thiserror::Error;

/// 저장소/다운로드 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 아카이브를 읽거나 쓸 수 없음
    #[error("Storage access error at {path}: {message}")]
    StorageAccess {
        /// 대상 경로
        path: String,
        /// 원인
        message: String,
    },

    /// HTTP 클라이언트 오류
    #[error("HTTP error: {0}")]
    Http(String),

    /// 다운로드 오류
    #[error("Download error: {0}")]
    Download(String),

    /// 설정 오류
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DataError {
    /// 경로와 I/O 오류로부터 저장소 접근 오류를 생성합니다.
    pub fn storage(path: impl AsRef<Path>, err: impl std::fmt::Display) -> Self {
        DataError::StorageAccess {
            path: path.as_ref().display().to_string(),
            message: err.to_string(),
        }
    }

    /// 저장소 접근 오류인지 확인합니다.
    pub fn is_storage(&self) -> bool {
        matches!(self, DataError::StorageAccess { .. })
    }
}

impl From<reqwest::Error> for DataError {
    fn from(err: reqwest::Error) -> Self {
        DataError::Http(err.to_string())
    }
}

/// 데이터 작업 Result 타입.
pub type Result<T> = std::result::Result<T, DataError>;
