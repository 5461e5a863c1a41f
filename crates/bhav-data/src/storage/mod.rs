//! 아카이브 저장소.
//!
//! 세그먼트마다 하나의 디렉토리(또는 메모리 버킷)에 날짜별 파일을 보관합니다.
//! 갱신 로직은 저장소를 읽기만 하며, 쓰기는 다운로더가 담당합니다.

pub mod fs;
pub mod memory;

use async_trait::async_trait;
use bhav_core::ExchangeSegment;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::Result;

pub use fs::FsArchiveStore;
pub use memory::MemoryArchiveStore;

/// 세그먼트 아카이브 저장소.
#[async_trait]
pub trait ArchiveStore: Send + Sync {
    /// 가장 최근 아카이브 파일의 날짜. 비어 있으면 `None`.
    async fn last_date(&self, segment: ExchangeSegment) -> Result<Option<NaiveDate>>;

    /// 저장된 아카이브 파일 수.
    async fn file_count(&self, segment: ExchangeSegment) -> Result<usize>;

    /// 파일이 있는 날짜 집합. 여러 날짜를 확인할 때 한 번만 조회합니다.
    async fn archived_dates(&self, segment: ExchangeSegment) -> Result<BTreeSet<NaiveDate>>;

    /// 해당 날짜의 파일이 있는지 확인.
    async fn exists(&self, segment: ExchangeSegment, date: NaiveDate) -> Result<bool> {
        Ok(self.archived_dates(segment).await?.contains(&date))
    }

    /// 날짜 파일 저장. `extension` 은 점 없이 전달합니다 (예: "csv.zip").
    async fn save(
        &self,
        segment: ExchangeSegment,
        date: NaiveDate,
        extension: &str,
        contents: &[u8],
    ) -> Result<PathBuf>;

    /// 세그먼트 저장 경로 (표시용).
    fn data_path(&self, segment: ExchangeSegment) -> PathBuf;
}

/// 저장 파일 이름 (예: "NSE_EQ_20240610.csv.zip").
pub fn archive_file_name(segment: ExchangeSegment, date: NaiveDate, extension: &str) -> String {
    format!("{}_{}.{}", segment.as_str(), date.format("%Y%m%d"), extension)
}

/// 파일 이름에서 아카이브 날짜를 추출합니다.
///
/// `YYYY-MM-DD`, `YYYYMMDD`, `DDMMYYYY` 순으로 시도하며 이름 뒤쪽의 날짜를 우선합니다.
/// 숨김 파일과 `.part` 임시 파일은 제외합니다.
pub fn extract_file_date(file_name: &str) -> Option<NaiveDate> {
    if file_name.starts_with('.') || file_name.ends_with(".part") {
        return None;
    }

    let stem = file_name.split('.').next().unwrap_or(file_name);
    let bytes = stem.as_bytes();

    // YYYY-MM-DD
    if bytes.len() >= 10 {
        for start in (0..=bytes.len() - 10).rev() {
            let Some(candidate) = stem.get(start..start + 10) else {
                continue;
            };
            if let Ok(date) = bhav_core::parse_date(candidate) {
                if plausible(date) {
                    return Some(date);
                }
            }
        }
    }

    // 연속된 8자리 숫자
    let mut runs = Vec::new();
    let mut run_start = None;
    for (i, b) in bytes.iter().enumerate() {
        match (b.is_ascii_digit(), run_start) {
            (true, None) => run_start = Some(i),
            (false, Some(s)) => {
                runs.push((s, i));
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = run_start {
        runs.push((s, bytes.len()));
    }

    runs.iter()
        .rev()
        .filter(|(s, e)| e - s == 8)
        .find_map(|(s, e)| {
            let digits = &stem[*s..*e];
            NaiveDate::parse_from_str(digits, "%Y%m%d")
                .ok()
                .filter(|d| plausible(*d))
                .or_else(|| {
                    NaiveDate::parse_from_str(digits, "%d%m%Y")
                        .ok()
                        .filter(|d| plausible(*d))
                })
        })
}

fn plausible(date: NaiveDate) -> bool {
    use chrono::Datelike;
    (1990..=2100).contains(&date.year())
}
