//! bhavcopy 아카이브 갱신 오케스트레이션.
//!
//! 이 crate는 다음을 제공합니다:
//! - 날짜 구간 결정 (첫 실행, 이어받기, 명시 구간)
//! - 세그먼트 단위/배치 갱신 코디네이터
//! - 세그먼트 상태와 전체 요약 조회
//! - 단독 실행 CLI (`bhav-collector`)

pub mod error;
pub mod metrics;
pub mod modules;
pub mod stats;

pub use error::{CollectorError, Result};
pub use modules::{calculate_date_range, RefreshCoordinator};
pub use stats::RefreshStats;
