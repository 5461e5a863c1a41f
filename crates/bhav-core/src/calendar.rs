//! 거래일 달력.
//!
//! 날짜 구간에서 주말과 설정된 휴장일을 제외한 거래일 목록을 계산합니다.
//! 모든 함수는 순수 함수입니다. I/O 나 현재 시각에 의존하지 않습니다.
//! 휴장일 목록은 설정에서 주입되며 이 모듈이 소유하지 않습니다.

use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeSet;

use crate::config::DateSettings;
use crate::types::DateWindow;

/// 오름차순으로 정렬된 거래일 목록. 비어 있을 수 있습니다.
pub type WorkingDaySequence = Vec<NaiveDate>;

/// 직전 거래일 탐색 시 최대로 거슬러 올라가는 일수.
const MAX_LOOKBACK_DAYS: u32 = 366;

/// 구간의 거래일을 계산합니다.
///
/// - `window.start > window.end` 이면 빈 목록을 반환합니다 (에러 아님).
/// - `weekend_skip` 이면 토/일요일을 제외합니다.
/// - `holiday_skip` 이면 `holidays` 에 포함된 날짜를 제외합니다.
pub fn working_days(
    window: DateWindow,
    weekend_skip: bool,
    holiday_skip: bool,
    holidays: &BTreeSet<NaiveDate>,
) -> WorkingDaySequence {
    window
        .days()
        .filter(|date| !(weekend_skip && is_weekend(*date)))
        .filter(|date| !(holiday_skip && holidays.contains(date)))
        .collect()
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// 주말/휴장일 규칙을 묶은 거래일 달력.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TradingCalendar {
    /// 주말 제외 여부
    pub weekend_skip: bool,
    /// 휴장일 제외 여부
    pub holiday_skip: bool,
    /// 휴장일 목록
    pub holidays: BTreeSet<NaiveDate>,
}

impl TradingCalendar {
    /// 새 달력 생성.
    pub fn new(
        weekend_skip: bool,
        holiday_skip: bool,
        holidays: impl IntoIterator<Item = NaiveDate>,
    ) -> Self {
        Self {
            weekend_skip,
            holiday_skip,
            holidays: holidays.into_iter().collect(),
        }
    }

    /// 날짜 설정으로부터 달력을 생성합니다.
    pub fn from_settings(settings: &DateSettings) -> Self {
        Self::new(
            settings.weekend_skip,
            settings.holiday_skip,
            settings.holidays.iter().copied(),
        )
    }

    /// 해당 날짜가 거래일인지 확인합니다.
    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        !(self.weekend_skip && is_weekend(date))
            && !(self.holiday_skip && self.holidays.contains(&date))
    }

    /// 구간의 거래일 목록.
    pub fn working_days(&self, window: DateWindow) -> WorkingDaySequence {
        working_days(window, self.weekend_skip, self.holiday_skip, &self.holidays)
    }

    /// `date` 당일 또는 그 이전의 가장 최근 거래일.
    ///
    /// 1년 이내에 거래일이 없으면 `None` 을 반환합니다.
    pub fn latest_working_day(&self, date: NaiveDate) -> Option<NaiveDate> {
        let mut current = date;
        for _ in 0..=MAX_LOOKBACK_DAYS {
            if self.is_working_day(current) {
                return Some(current);
            }
            current = current.pred_opt()?;
        }
        None
    }

    /// `after` 다음 날부터 `through` 까지(포함)의 거래일 수.
    pub fn trading_days_between(&self, after: NaiveDate, through: NaiveDate) -> usize {
        match after.succ_opt() {
            Some(start) => self.working_days(DateWindow::new(start, through)).len(),
            None => 0,
        }
    }
}
