//! 도메인 값 객체.
//!
//! 요청 하나 안에서 생성되고 소비되는 값들입니다. 어떤 컴포넌트도 요청 간에 보관하지 않습니다.

pub mod freshness;
pub mod outcome;
pub mod summary;

pub use freshness::FreshnessStatus;
pub use outcome::{BatchOutcome, BatchStatus, RefreshFailure, RefreshOutcome, RefreshReport};
pub use summary::{ArchiveSummary, SegmentState, SummaryStatistics};
