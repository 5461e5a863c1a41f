//! 날짜 구간 타입과 날짜 파싱.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::BhavError;

/// 요청/응답에서 사용하는 날짜 형식.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 닫힌 날짜 구간 `[start, end]`.
///
/// `start <= end` 는 보장되지 않습니다. 역전된 구간(`start > end`)은
/// "가져올 데이터 없음"을 뜻하는 정상 신호이며, 호출자가 [`DateWindow::is_empty`]로 확인합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    /// 시작일 (포함)
    pub start: NaiveDate,
    /// 종료일 (포함)
    pub end: NaiveDate,
}

impl DateWindow {
    /// 새 구간 생성. 역전된 구간도 그대로 보존합니다.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// 역전된 구간인지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// 구간에 포함된 달력 날짜 수.
    pub fn len_days(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            (self.end - self.start).num_days() as usize + 1
        }
    }

    /// 날짜가 구간에 포함되는지 확인합니다.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// 구간의 모든 달력 날짜를 오름차순으로 순회합니다.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}]",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

/// `YYYY-MM-DD` 형식의 날짜를 엄격하게 파싱합니다.
///
/// chrono 는 `2024-6-1` 같은 한 자리 월/일도 허용하므로 길이와 구분자를 먼저 확인합니다.
pub fn parse_date(raw: &str) -> Result<NaiveDate, BhavError> {
    let bytes = raw.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());

    if !shape_ok {
        return Err(BhavError::InvalidDate(raw.to_string()));
    }

    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| BhavError::InvalidDate(raw.to_string()))
}

/// 선택적 날짜 파싱. 빈 문자열은 미지정으로 취급합니다.
pub fn parse_optional_date(raw: Option<&str>) -> Result<Option<NaiveDate>, BhavError> {
    match raw {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => parse_date(s).map(Some),
    }
}
