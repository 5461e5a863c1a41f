//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! 시작 시 한 번 생성되어 `Arc` 로 라우터에 주입됩니다. 요청 간 가변 상태는 없습니다.

use bhav_collector::RefreshCoordinator;
use bhav_core::AppConfig;
use std::sync::Arc;

/// 애플리케이션 공유 상태.
pub struct AppState {
    /// 갱신 코디네이터 - 상태 조회, 갱신, 요약
    pub coordinator: Arc<RefreshCoordinator>,

    /// 로드된 설정
    pub config: Arc<AppConfig>,

    /// 서버 시작 시간
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 새 상태 생성.
    pub fn new(config: Arc<AppConfig>, coordinator: Arc<RefreshCoordinator>) -> Self {
        Self {
            coordinator,
            config,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 서버 업타임(초).
    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }
}
