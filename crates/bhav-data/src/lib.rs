//! 아카이브 저장소와 다운로더.
//!
//! 이 crate는 다음을 제공합니다:
//! - 세그먼트별 아카이브 저장소 ([`ArchiveStore`]: 파일 시스템, 메모리)
//! - 아카이브 신선도 추적 ([`FreshnessTracker`])
//! - 세그먼트별 bhavcopy 다운로더 ([`SegmentDownloader`], [`HttpArchiveDownloader`])

pub mod downloader;
pub mod error;
pub mod freshness;
pub mod storage;

pub use downloader::{
    DateResult, DateStatus, DownloadReport, DownloaderRegistry, HttpArchiveDownloader,
    SegmentDownloader,
};
pub use error::{DataError, Result};
pub use freshness::{freshness_verdict, FreshnessTracker};
pub use storage::{archive_file_name, extract_file_date, ArchiveStore, FsArchiveStore, MemoryArchiveStore};
