//! 전체 세그먼트 요약.

use serde::Serialize;
use std::collections::BTreeMap;

use super::FreshnessStatus;
use crate::types::ExchangeSegment;

/// 세그먼트 하나의 조회 결과. 저장소 오류는 요약 전체를 실패시키지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SegmentState {
    /// 정상 조회
    Available(FreshnessStatus),
    /// 저장소 조회 실패
    Unavailable {
        /// 오류 설명
        error: String,
    },
}

impl SegmentState {
    /// 정상 조회된 상태.
    pub fn status(&self) -> Option<&FreshnessStatus> {
        match self {
            Self::Available(status) => Some(status),
            Self::Unavailable { .. } => None,
        }
    }
}

/// 집계 통계.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SummaryStatistics {
    /// 전체 세그먼트 수
    pub total_exchanges: usize,
    /// 파일이 하나 이상 있는 세그먼트 수
    pub exchanges_with_data: usize,
    /// 전체 파일 수
    pub total_files: usize,
}

/// 전체 아카이브 요약.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveSummary {
    pub statistics: SummaryStatistics,
    pub exchanges: BTreeMap<ExchangeSegment, SegmentState>,
}

impl ArchiveSummary {
    /// 세그먼트 상태로부터 통계를 계산합니다.
    pub fn from_states(exchanges: BTreeMap<ExchangeSegment, SegmentState>) -> Self {
        let available = exchanges.values().filter_map(SegmentState::status);
        let (with_data, files) = available.fold((0, 0), |(with_data, files), status| {
            (
                with_data + usize::from(status.file_count > 0),
                files + status.file_count,
            )
        });

        Self {
            statistics: SummaryStatistics {
                total_exchanges: exchanges.len(),
                exchanges_with_data: with_data,
                total_files: files,
            },
            exchanges,
        }
    }
}
