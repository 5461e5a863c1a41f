//! "오늘" 날짜 제공자.
//!
//! 날짜 범위 계산은 호출자의 로컬 날짜를 기준으로 합니다 (거래소 시간대 아님).
//! 테스트에서는 [`FixedClock`] 으로 날짜를 고정합니다.

use chrono::NaiveDate;

/// 현재 날짜 제공자.
pub trait Clock: Send + Sync {
    /// 오늘 날짜.
    fn today(&self) -> NaiveDate;
}

/// 시스템 로컬 시간 기준 시계.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        // TODO: IST 밖에서 실행될 때를 위해 거래소 시간대(Asia/Kolkata) 기준 today 로 전환
        chrono::Local::now().date_naive()
    }
}

/// 고정된 날짜를 반환하는 시계.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
