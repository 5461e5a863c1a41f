//! 파일 시스템 아카이브 저장소.
//!
//! 디렉토리 구조: `<base_data_path>/<거래소>/<세그먼트>/<파일>`

use async_trait::async_trait;
use bhav_core::{AppConfig, ExchangeSegment};
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{archive_file_name, extract_file_date, ArchiveStore};
use crate::{DataError, Result};

/// 디렉토리 기반 아카이브 저장소.
#[derive(Debug, Clone)]
pub struct FsArchiveStore {
    paths: HashMap<ExchangeSegment, PathBuf>,
}

impl FsArchiveStore {
    /// 설정의 세그먼트 경로로 저장소를 생성합니다.
    pub fn from_config(config: &AppConfig) -> Self {
        let paths = ExchangeSegment::ALL
            .iter()
            .map(|segment| (*segment, config.data_path(*segment)))
            .collect();
        Self { paths }
    }

    /// 루트 디렉토리 아래 기본 레이아웃으로 저장소를 생성합니다.
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        let paths = ExchangeSegment::ALL
            .iter()
            .map(|segment| {
                (
                    *segment,
                    root.as_ref().join(segment.exchange()).join(segment.segment()),
                )
            })
            .collect();
        Self { paths }
    }

    /// 세그먼트 디렉토리의 파일 날짜 목록.
    ///
    /// 디렉토리가 없으면 빈 아카이브로 취급합니다.
    async fn scan(&self, segment: ExchangeSegment) -> Result<Vec<NaiveDate>> {
        let dir = self.data_path(segment);

        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(segment = %segment, path = %dir.display(), "아카이브 디렉토리 없음");
                return Ok(Vec::new());
            }
            Err(e) => return Err(DataError::storage(&dir, e)),
        };

        let mut dates = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| DataError::storage(&dir, e))?
        {
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| DataError::storage(entry.path(), e))?;
            if !file_type.is_file() {
                continue;
            }

            let name = entry.file_name();
            if let Some(date) = extract_file_date(&name.to_string_lossy()) {
                dates.push(date);
            }
        }

        Ok(dates)
    }
}

#[async_trait]
impl ArchiveStore for FsArchiveStore {
    async fn last_date(&self, segment: ExchangeSegment) -> Result<Option<NaiveDate>> {
        Ok(self.scan(segment).await?.into_iter().max())
    }

    async fn file_count(&self, segment: ExchangeSegment) -> Result<usize> {
        Ok(self.scan(segment).await?.len())
    }

    async fn archived_dates(&self, segment: ExchangeSegment) -> Result<BTreeSet<NaiveDate>> {
        Ok(self.scan(segment).await?.into_iter().collect())
    }

    async fn save(
        &self,
        segment: ExchangeSegment,
        date: NaiveDate,
        extension: &str,
        contents: &[u8],
    ) -> Result<PathBuf> {
        let dir = self.data_path(segment);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| DataError::storage(&dir, e))?;

        let target = dir.join(archive_file_name(segment, date, extension));
        let partial = target.with_file_name(format!(
            "{}.part",
            archive_file_name(segment, date, extension)
        ));

        // 임시 파일에 기록 후 rename 하여 부분 파일이 아카이브로 보이지 않게 함
        tokio::fs::write(&partial, contents)
            .await
            .map_err(|e| DataError::storage(&partial, e))?;
        tokio::fs::rename(&partial, &target)
            .await
            .map_err(|e| DataError::storage(&target, e))?;

        debug!(segment = %segment, path = %target.display(), bytes = contents.len(), "아카이브 파일 저장");
        Ok(target)
    }

    fn data_path(&self, segment: ExchangeSegment) -> PathBuf {
        self.paths
            .get(&segment)
            .cloned()
            .unwrap_or_else(|| PathBuf::from(segment.exchange()).join(segment.segment()))
    }
}
