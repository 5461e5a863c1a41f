//! 세그먼트 신선도 상태.

use chrono::NaiveDate;
use serde::Serialize;

/// 한 세그먼트 아카이브의 현재 상태.
///
/// 호출 시점의 저장소 상태를 반영하며 캐시되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FreshnessStatus {
    /// 가장 최근 아카이브 파일의 날짜
    pub last_date: Option<NaiveDate>,
    /// 저장된 파일 수
    pub file_count: usize,
    /// 첫 실행 여부 (파일 없음)
    pub is_first_run: bool,
    /// 최신 상태 여부
    pub is_up_to_date: bool,
    /// 판정 사유
    #[serde(rename = "status_message")]
    pub reason: String,
    /// 세그먼트 저장 경로
    pub data_path: String,
}
