//! 날짜 구간 결정.
//!
//! 결과 구간은 역전될 수 있습니다(`start > end`). 역전된 구간은 오류가 아니라
//! "새로 받을 데이터 없음"을 뜻하며, 판단은 호출자가 합니다.

use bhav_core::{DateWindow, ExchangeSegment};
use bhav_data::{FreshnessTracker, Result};
use chrono::NaiveDate;

/// 세그먼트의 갱신 구간을 결정합니다.
///
/// - 시작일: 명시값 → 첫 실행이면 `base_start_date` → 마지막 파일 다음 날
/// - 종료일: 명시값 → `today`
///
/// 명시 시작일이 주어지면 저장소를 조회하지 않습니다.
pub async fn calculate_date_range(
    tracker: &FreshnessTracker,
    segment: ExchangeSegment,
    base_start_date: NaiveDate,
    explicit_start: Option<NaiveDate>,
    explicit_end: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<DateWindow> {
    let start = match explicit_start {
        Some(date) => date,
        None if tracker.is_first_run(segment).await? => base_start_date,
        // 이어받기
        None => match tracker.last_file_date(segment).await? {
            Some(last) => last.succ_opt().unwrap_or(last),
            None => base_start_date,
        },
    };

    let end = explicit_end.unwrap_or(today);

    tracing::debug!(
        segment = %segment,
        start = %start,
        end = %end,
        explicit_start = explicit_start.is_some(),
        explicit_end = explicit_end.is_some(),
        "날짜 구간 결정"
    );

    Ok(DateWindow::new(start, end))
}
