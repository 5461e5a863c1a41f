//! 갱신 결과 값 객체.
//!
//! 세그먼트 하나의 갱신 결과([`RefreshOutcome`])와 여러 세그먼트를 묶은
//! 배치 결과([`BatchOutcome`])를 정의합니다.

use chrono::NaiveDate;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

use crate::types::{DateWindow, ExchangeSegment};

/// 갱신이 실행(또는 no-op 으로 종료)된 결과.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshReport {
    /// 다운로더가 요청된 모든 날짜를 저장했는지
    pub success: bool,
    /// 사람이 읽을 수 있는 결과 메시지
    pub message: String,
    /// 시도한 거래일 수
    pub dates_processed: usize,
    /// 계산된 시작일
    pub start_date: NaiveDate,
    /// 계산된 종료일
    pub end_date: NaiveDate,
    /// 갱신 후 최신 파일 날짜
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_file_date: Option<NaiveDate>,
    /// 갱신 후 파일 수
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_files: Option<usize>,
    /// 실패한 날짜 목록
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_dates: Vec<NaiveDate>,
}

impl RefreshReport {
    /// 역전된 구간: 새로 받을 데이터 없음.
    pub fn no_new_data(window: DateWindow) -> Self {
        Self::no_op(window, "No new data to download")
    }

    /// 구간에 거래일이 없음.
    pub fn no_trading_days(window: DateWindow) -> Self {
        Self::no_op(window, "No trading days in date range")
    }

    fn no_op(window: DateWindow, message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            dates_processed: 0,
            start_date: window.start,
            end_date: window.end,
            last_file_date: None,
            total_files: None,
            failed_dates: Vec::new(),
        }
    }

    /// 다운로더 실행 후 결과.
    pub fn downloaded(
        window: DateWindow,
        dates_processed: usize,
        failed_dates: Vec<NaiveDate>,
        last_file_date: Option<NaiveDate>,
        total_files: usize,
    ) -> Self {
        let success = failed_dates.is_empty();
        let message = if success {
            "Data refreshed successfully"
        } else {
            "Some downloads failed"
        };

        Self {
            success,
            message: message.to_string(),
            dates_processed,
            start_date: window.start,
            end_date: window.end,
            last_file_date,
            total_files: Some(total_files),
            failed_dates,
        }
    }
}

/// 예외 대신 반환되는 갱신 실패.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshFailure {
    /// 에러 설명
    pub error: String,
}

impl Serialize for RefreshFailure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("RefreshFailure", 2)?;
        state.serialize_field("success", &false)?;
        state.serialize_field("error", &self.error)?;
        state.end()
    }
}

/// 세그먼트 하나의 갱신 결과.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RefreshOutcome {
    /// 갱신 로직이 끝까지 실행됨 (다운로더 실패 포함)
    Completed(RefreshReport),
    /// 갱신 도중 에러 발생
    Failed(RefreshFailure),
}

impl RefreshOutcome {
    /// 에러로부터 실패 결과 생성.
    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed(RefreshFailure {
            error: error.into(),
        })
    }

    /// 성공 여부.
    pub fn is_success(&self) -> bool {
        match self {
            Self::Completed(report) => report.success,
            Self::Failed(_) => false,
        }
    }

    /// 시도한 거래일 수.
    pub fn dates_processed(&self) -> usize {
        match self {
            Self::Completed(report) => report.dates_processed,
            Self::Failed(_) => 0,
        }
    }

    /// 실패 사유. 다운로더 실패는 메시지를, 에러는 에러 설명을 반환합니다.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Completed(report) if report.success => None,
            Self::Completed(report) => Some(&report.message),
            Self::Failed(failure) => Some(&failure.error),
        }
    }

    /// 실행 결과 보고서.
    pub fn report(&self) -> Option<&RefreshReport> {
        match self {
            Self::Completed(report) => Some(report),
            Self::Failed(_) => None,
        }
    }
}

/// 배치 전체 상태. 구성원 결과로부터 파생됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    /// 모든 세그먼트 성공
    Success,
    /// 하나 이상 실패
    Partial,
}

/// 여러 세그먼트 갱신 결과.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// 세그먼트별 결과
    pub results: BTreeMap<ExchangeSegment, RefreshOutcome>,
}

impl BatchOutcome {
    /// 결과 맵으로부터 배치 결과 생성.
    pub fn new(results: BTreeMap<ExchangeSegment, RefreshOutcome>) -> Self {
        Self { results }
    }

    /// 성공한 세그먼트 수.
    pub fn success_count(&self) -> usize {
        self.results.values().filter(|r| r.is_success()).count()
    }

    /// 전체 세그먼트 수.
    pub fn total_count(&self) -> usize {
        self.results.len()
    }

    /// 배치 상태. 모두 성공이면 `Success`, 아니면 `Partial`.
    pub fn status(&self) -> BatchStatus {
        if self.success_count() == self.total_count() {
            BatchStatus::Success
        } else {
            BatchStatus::Partial
        }
    }

    /// 요약 문자열 (예: "5/6 exchanges refreshed successfully").
    pub fn summary(&self) -> String {
        format!(
            "{}/{} exchanges refreshed successfully",
            self.success_count(),
            self.total_count()
        )
    }

    /// 전체 처리 거래일 수.
    pub fn total_dates_processed(&self) -> usize {
        self.results.values().map(|r| r.dates_processed()).sum()
    }
}

impl Serialize for BatchOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("BatchOutcome", 3)?;
        state.serialize_field("status", &self.status())?;
        state.serialize_field("summary", &self.summary())?;
        state.serialize_field("results", &self.results)?;
        state.end()
    }
}
