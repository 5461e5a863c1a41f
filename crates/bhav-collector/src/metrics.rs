//! 갱신 메트릭 헬퍼.
//!
//! 레코더 설치는 바이너리(API 서버)가 담당합니다. 레코더가 없으면 기록은 무시됩니다.

use bhav_core::ExchangeSegment;
use metrics::{counter, histogram};

/// 세그먼트 갱신 결과 카운터 증가.
pub fn record_refresh(segment: ExchangeSegment, success: bool) {
    let result = if success { "success" } else { "failure" };
    counter!(
        "bhav_refresh_total",
        "segment" => segment.as_str(),
        "result" => result
    )
    .increment(1);
}

/// 처리한 거래일 수 누적.
pub fn record_dates_processed(segment: ExchangeSegment, dates: usize) {
    counter!("bhav_refresh_dates_total", "segment" => segment.as_str()).increment(dates as u64);
}

/// 세그먼트 갱신 소요 시간 기록.
pub fn record_refresh_duration(segment: ExchangeSegment, duration_secs: f64) {
    histogram!("bhav_refresh_duration_seconds", "segment" => segment.as_str())
        .record(duration_secs);
}
