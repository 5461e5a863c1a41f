//! 세그먼트 다운로더.
//!
//! 다운로더는 거래일 목록을 받아 날짜별 결과를 보고합니다.
//! 갱신 로직은 보고서만 보고 성공 여부를 판정합니다.

pub mod http;

use async_trait::async_trait;
use bhav_core::{AppConfig, ExchangeSegment};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::info;

use crate::storage::ArchiveStore;
use crate::Result;

pub use http::HttpArchiveDownloader;

/// 날짜별 다운로드 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateStatus {
    /// 새로 저장됨
    Saved {
        /// 저장한 바이트 수
        bytes: usize,
    },
    /// 이미 저장소에 있음
    AlreadyPresent,
    /// 거래소가 해당 날짜 파일을 게시하지 않음 (404)
    NotPublished,
    /// 실패
    Failed(String),
}

impl DateStatus {
    /// 해당 날짜가 아카이브에 존재하게 되었는지.
    pub fn is_success(&self) -> bool {
        matches!(self, DateStatus::Saved { .. } | DateStatus::AlreadyPresent)
    }
}

impl fmt::Display for DateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateStatus::Saved { bytes } => write!(f, "saved ({bytes} bytes)"),
            DateStatus::AlreadyPresent => write!(f, "already present"),
            DateStatus::NotPublished => write!(f, "not published"),
            DateStatus::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// 한 날짜의 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateResult {
    pub date: NaiveDate,
    pub status: DateStatus,
}

/// 다운로더 호출 한 번의 결과.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadReport {
    pub results: Vec<DateResult>,
}

impl DownloadReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, date: NaiveDate, status: DateStatus) {
        self.results.push(DateResult { date, status });
    }

    /// 모든 날짜가 아카이브에 존재하게 되었는지.
    pub fn all_succeeded(&self) -> bool {
        self.results.iter().all(|r| r.status.is_success())
    }

    /// 실패한 날짜 목록.
    pub fn failed_dates(&self) -> Vec<NaiveDate> {
        self.results
            .iter()
            .filter(|r| !r.status.is_success())
            .map(|r| r.date)
            .collect()
    }

    /// 새로 저장한 날짜 수.
    pub fn saved_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.status, DateStatus::Saved { .. }))
            .count()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// 세그먼트 다운로더.
///
/// 구현체는 날짜마다 결과를 보고해야 하며, 개별 날짜 실패로 호출 전체를
/// 중단하지 않습니다. `Err` 는 저장소 접근 불가처럼 진행할 수 없는 경우에만 반환합니다.
#[async_trait]
pub trait SegmentDownloader: Send + Sync {
    /// 담당 세그먼트
    fn segment(&self) -> ExchangeSegment;

    /// 주어진 거래일들을 다운로드합니다.
    async fn download(&self, dates: &[NaiveDate]) -> Result<DownloadReport>;
}

/// 세그먼트 → 다운로더 매핑.
#[derive(Clone, Default)]
pub struct DownloaderRegistry {
    downloaders: HashMap<ExchangeSegment, Arc<dyn SegmentDownloader>>,
}

impl DownloaderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 설정의 URL 템플릿으로 모든 세그먼트의 HTTP 다운로더를 등록합니다.
    pub fn from_config(config: &AppConfig, store: Arc<dyn ArchiveStore>) -> Result<Self> {
        let client = http::build_client(&config.download)?;
        let mut registry = Self::new();

        for segment in ExchangeSegment::ALL {
            let downloader = HttpArchiveDownloader::new(
                segment,
                config.url_template(segment),
                client.clone(),
                store.clone(),
                config.download.clone(),
            )?;
            registry.register(Arc::new(downloader));
        }

        info!(segments = registry.len(), "다운로더 레지스트리 초기화");
        Ok(registry)
    }

    /// 다운로더 등록 (같은 세그먼트는 교체).
    pub fn register(&mut self, downloader: Arc<dyn SegmentDownloader>) {
        self.downloaders.insert(downloader.segment(), downloader);
    }

    pub fn get(&self, segment: ExchangeSegment) -> Option<Arc<dyn SegmentDownloader>> {
        self.downloaders.get(&segment).cloned()
    }

    /// 등록된 세그먼트 (정렬됨).
    pub fn segments(&self) -> Vec<ExchangeSegment> {
        let mut segments: Vec<_> = self.downloaders.keys().copied().collect();
        segments.sort();
        segments
    }

    pub fn len(&self) -> usize {
        self.downloaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.downloaders.is_empty()
    }
}
