//! 아카이브 신선도 추적.
//!
//! 저장소를 호출 시점마다 조회하며 결과를 캐시하지 않습니다.
//! 저장소 접근 실패는 첫 실행으로 취급하지 않고 호출자에게 전파합니다.

use bhav_core::{AppConfig, ExchangeSegment, FreshnessStatus, TradingCalendar};
use chrono::NaiveDate;
use std::sync::Arc;

use crate::storage::ArchiveStore;
use crate::Result;

/// 세그먼트 아카이브 신선도 추적기.
#[derive(Clone)]
pub struct FreshnessTracker {
    store: Arc<dyn ArchiveStore>,
    calendar: Arc<TradingCalendar>,
    tolerance_days: usize,
}

impl FreshnessTracker {
    /// 새 추적기 생성.
    pub fn new(
        store: Arc<dyn ArchiveStore>,
        calendar: Arc<TradingCalendar>,
        tolerance_days: usize,
    ) -> Self {
        Self {
            store,
            calendar,
            tolerance_days,
        }
    }

    /// 설정으로부터 추적기 생성.
    pub fn from_config(store: Arc<dyn ArchiveStore>, config: &AppConfig) -> Self {
        Self::new(
            store,
            Arc::new(config.calendar()),
            config.dates.freshness_tolerance_days,
        )
    }

    /// 내부 저장소.
    pub fn store(&self) -> &Arc<dyn ArchiveStore> {
        &self.store
    }

    /// 가장 최근 파일 날짜.
    pub async fn last_file_date(&self, segment: ExchangeSegment) -> Result<Option<NaiveDate>> {
        self.store.last_date(segment).await
    }

    /// 저장된 파일 수.
    pub async fn file_count(&self, segment: ExchangeSegment) -> Result<usize> {
        self.store.file_count(segment).await
    }

    /// 파일이 하나도 없으면 첫 실행.
    pub async fn is_first_run(&self, segment: ExchangeSegment) -> Result<bool> {
        Ok(self.file_count(segment).await? == 0)
    }

    /// 최신 여부와 사유.
    pub async fn is_up_to_date(
        &self,
        segment: ExchangeSegment,
        today: NaiveDate,
    ) -> Result<(bool, String)> {
        let last = self.last_file_date(segment).await?;
        Ok(freshness_verdict(&self.calendar, last, today, self.tolerance_days))
    }

    /// 세그먼트 전체 상태.
    pub async fn status(&self, segment: ExchangeSegment, today: NaiveDate) -> Result<FreshnessStatus> {
        let last_date = self.last_file_date(segment).await?;
        let file_count = self.file_count(segment).await?;
        let (is_up_to_date, reason) =
            freshness_verdict(&self.calendar, last_date, today, self.tolerance_days);

        Ok(FreshnessStatus {
            last_date,
            file_count,
            is_first_run: file_count == 0,
            is_up_to_date,
            reason,
            data_path: self.store.data_path(segment).display().to_string(),
        })
    }
}

/// 마지막 파일 날짜와 최근 거래일을 비교해 판정합니다.
///
/// 지연은 `last` 다음 날부터 최근 거래일까지의 거래일 수이며,
/// `tolerance_days` 이하이면 최신으로 봅니다.
pub fn freshness_verdict(
    calendar: &TradingCalendar,
    last: Option<NaiveDate>,
    today: NaiveDate,
    tolerance_days: usize,
) -> (bool, String) {
    let Some(last) = last else {
        return (false, "No data files found".to_string());
    };

    if last == today {
        return (true, "Last file is today".to_string());
    }
    if last > today {
        return (true, format!("Last file ({last}) is dated after today"));
    }

    let expected = calendar.latest_working_day(today).unwrap_or(today);
    let lag = calendar.trading_days_between(last, expected);

    match lag {
        0 => (
            true,
            format!("Last file matches latest trading day ({expected})"),
        ),
        n if n <= tolerance_days => (
            true,
            format!(
                "Last file is {n} trading {} old (within tolerance of {tolerance_days})",
                plural_days(n)
            ),
        ),
        n => (false, format!("Last file is {n} trading {} old", plural_days(n))),
    }
}

fn plural_days(n: usize) -> &'static str {
    if n == 1 {
        "day"
    } else {
        "days"
    }
}
