//! 메모리 아카이브 저장소.
//!
//! 테스트와 드라이런 용도입니다. 세그먼트별로 저장 실패를 주입할 수 있습니다.

use async_trait::async_trait;
use bhav_core::ExchangeSegment;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::PathBuf;
use tokio::sync::RwLock;

use super::{archive_file_name, ArchiveStore};
use crate::{DataError, Result};

/// 메모리 기반 아카이브 저장소.
#[derive(Debug, Default)]
pub struct MemoryArchiveStore {
    files: RwLock<HashMap<ExchangeSegment, BTreeMap<NaiveDate, Vec<u8>>>>,
    unreadable: RwLock<HashSet<ExchangeSegment>>,
}

impl MemoryArchiveStore {
    /// 빈 저장소 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 세그먼트에 날짜 파일을 미리 채웁니다.
    pub async fn insert_dates(&self, segment: ExchangeSegment, dates: &[NaiveDate]) {
        let mut files = self.files.write().await;
        let bucket = files.entry(segment).or_default();
        for date in dates {
            bucket.insert(*date, Vec::new());
        }
    }

    /// 세그먼트 읽기 실패를 설정/해제합니다.
    pub async fn set_unreadable(&self, segment: ExchangeSegment, unreadable: bool) {
        let mut set = self.unreadable.write().await;
        if unreadable {
            set.insert(segment);
        } else {
            set.remove(&segment);
        }
    }

    /// 저장된 날짜 목록 (오름차순).
    pub async fn dates(&self, segment: ExchangeSegment) -> Vec<NaiveDate> {
        self.files
            .read()
            .await
            .get(&segment)
            .map(|bucket| bucket.keys().copied().collect())
            .unwrap_or_default()
    }

    async fn check_readable(&self, segment: ExchangeSegment) -> Result<()> {
        if self.unreadable.read().await.contains(&segment) {
            return Err(DataError::storage(
                self.data_path(segment),
                "permission denied",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ArchiveStore for MemoryArchiveStore {
    async fn last_date(&self, segment: ExchangeSegment) -> Result<Option<NaiveDate>> {
        self.check_readable(segment).await?;
        Ok(self
            .files
            .read()
            .await
            .get(&segment)
            .and_then(|bucket| bucket.keys().next_back().copied()))
    }

    async fn file_count(&self, segment: ExchangeSegment) -> Result<usize> {
        self.check_readable(segment).await?;
        Ok(self
            .files
            .read()
            .await
            .get(&segment)
            .map_or(0, BTreeMap::len))
    }

    async fn archived_dates(&self, segment: ExchangeSegment) -> Result<BTreeSet<NaiveDate>> {
        self.check_readable(segment).await?;
        Ok(self
            .files
            .read()
            .await
            .get(&segment)
            .map(|bucket| bucket.keys().copied().collect())
            .unwrap_or_default())
    }

    async fn exists(&self, segment: ExchangeSegment, date: NaiveDate) -> Result<bool> {
        self.check_readable(segment).await?;
        Ok(self
            .files
            .read()
            .await
            .get(&segment)
            .is_some_and(|bucket| bucket.contains_key(&date)))
    }

    async fn save(
        &self,
        segment: ExchangeSegment,
        date: NaiveDate,
        extension: &str,
        contents: &[u8],
    ) -> Result<PathBuf> {
        self.check_readable(segment).await?;
        self.files
            .write()
            .await
            .entry(segment)
            .or_default()
            .insert(date, contents.to_vec());
        Ok(self
            .data_path(segment)
            .join(archive_file_name(segment, date, extension)))
    }

    fn data_path(&self, segment: ExchangeSegment) -> PathBuf {
        PathBuf::from("memory")
            .join(segment.exchange())
            .join(segment.segment())
    }
}
