//! 갱신 통계 구조체.

use bhav_core::BatchOutcome;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 배치 갱신 통계
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefreshStats {
    /// 대상 세그먼트 수
    pub total: usize,
    /// 성공 세그먼트 수
    pub success: usize,
    /// 실패 세그먼트 수
    pub errors: usize,
    /// 새 데이터가 없던 세그먼트 수
    pub skipped: usize,
    /// 처리한 총 거래일 수
    pub dates_processed: usize,
    /// 소요 시간
    #[serde(skip)]
    pub elapsed: Duration,
}

impl RefreshStats {
    /// 새 통계 객체 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 배치 결과로부터 통계 생성
    pub fn from_batch(batch: &BatchOutcome, elapsed: Duration) -> Self {
        let skipped = batch
            .results
            .values()
            .filter(|r| r.is_success() && r.dates_processed() == 0)
            .count();

        Self {
            total: batch.total_count(),
            success: batch.success_count(),
            errors: batch.total_count() - batch.success_count(),
            skipped,
            dates_processed: batch.total_dates_processed(),
            elapsed,
        }
    }

    /// 성공률 계산 (%)
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.success as f64 / self.total as f64) * 100.0
        }
    }

    /// 통계 요약 로그 출력
    pub fn log_summary(&self, operation: &str) {
        tracing::info!(
            operation = operation,
            total = self.total,
            success = self.success,
            errors = self.errors,
            skipped = self.skipped,
            dates_processed = self.dates_processed,
            success_rate = format!("{:.1}%", self.success_rate()),
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "갱신 완료"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bhav_core::{DateWindow, ExchangeSegment, RefreshOutcome, RefreshReport};
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    #[test]
    fn test_from_batch_counts() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let window = DateWindow::new(day, day);

        let mut results = BTreeMap::new();
        results.insert(
            ExchangeSegment::NseEq,
            RefreshOutcome::Completed(RefreshReport::downloaded(window, 1, vec![], Some(day), 5)),
        );
        results.insert(
            ExchangeSegment::NseFo,
            RefreshOutcome::Completed(RefreshReport::no_trading_days(window)),
        );
        results.insert(ExchangeSegment::BseEq, RefreshOutcome::failed("boom"));

        let stats = RefreshStats::from_batch(&BatchOutcome::new(results), Duration::from_secs(2));
        assert_eq!(stats.total, 3);
        assert_eq!(stats.success, 2);
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.dates_processed, 1);
        assert!((stats.success_rate() - 66.666).abs() < 0.01);
    }

    #[test]
    fn test_empty_stats() {
        assert_eq!(RefreshStats::new().success_rate(), 0.0);
    }
}
