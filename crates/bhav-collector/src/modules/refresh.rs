//! 세그먼트 갱신 코디네이터.
//!
//! 흐름: 구간 결정 → 거래일 계산 → 다운로더 호출 → 신선도 재조회 → 결과.
//!
//! - 단일 세그먼트 갱신은 어떤 오류도 호출자에게 전파하지 않고 실패 결과로 변환합니다.
//! - 배치 갱신은 입력 검증이 전부 통과해야만 시작하며, 세그먼트끼리 서로 영향을 주지 않습니다.
//! - 같은 세그먼트의 동시 갱신은 세그먼트 게이트로 직렬화됩니다. 뒤의 호출은 앞의 갱신이
//!   끝난 뒤 구간을 다시 결정하므로 보통 no-op 이 됩니다.

use bhav_core::{
    AppConfig, ArchiveSummary, BatchOutcome, BhavError, Clock, DateWindow, ExchangeSegment,
    FreshnessStatus, RefreshOutcome, RefreshReport, SegmentState, SystemClock, TradingCalendar,
};
use bhav_data::{
    ArchiveStore, DataError, DownloaderRegistry, FreshnessTracker, FsArchiveStore,
};
use chrono::NaiveDate;
use futures::future::join_all;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, RwLock, Semaphore};
use tracing::{error, info, warn};

use super::date_range::calculate_date_range;
use crate::{metrics, CollectorError, RefreshStats, Result};

/// 세그먼트별 갱신 게이트 맵
type SegmentGateMap = Arc<RwLock<HashMap<ExchangeSegment, Arc<Mutex<()>>>>>;

/// 갱신 코디네이터.
///
/// 설정, 저장소, 다운로더, 시계를 생성 시 주입받으며 요청 간 상태를 보관하지 않습니다
/// (게이트와 동시성 제한 제외).
pub struct RefreshCoordinator {
    config: Arc<AppConfig>,
    calendar: Arc<TradingCalendar>,
    tracker: FreshnessTracker,
    downloaders: DownloaderRegistry,
    clock: Arc<dyn Clock>,
    /// 동시 다운로더 호출 제한
    permits: Arc<Semaphore>,
    gates: SegmentGateMap,
}

impl RefreshCoordinator {
    /// 새 코디네이터 생성.
    pub fn new(
        config: Arc<AppConfig>,
        store: Arc<dyn ArchiveStore>,
        downloaders: DownloaderRegistry,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let calendar = Arc::new(config.calendar());
        let tracker = FreshnessTracker::new(
            store,
            calendar.clone(),
            config.dates.freshness_tolerance_days,
        );
        let permits = Arc::new(Semaphore::new(config.download.max_concurrent_downloads.max(1)));

        Self {
            config,
            calendar,
            tracker,
            downloaders,
            clock,
            permits,
            gates: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// 설정으로 파일 시스템 저장소, HTTP 다운로더, 시스템 시계를 구성합니다.
    pub fn from_config(config: Arc<AppConfig>) -> Result<Self> {
        let store: Arc<dyn ArchiveStore> = Arc::new(FsArchiveStore::from_config(&config));
        let downloaders = DownloaderRegistry::from_config(&config, store.clone())?;

        info!(
            base_data_path = %config.data.base_data_path.display(),
            max_concurrent_downloads = config.download.max_concurrent_downloads,
            "갱신 코디네이터 초기화"
        );

        Ok(Self::new(config, store, downloaders, Arc::new(SystemClock)))
    }

    /// 설정.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 신선도 추적기.
    pub fn tracker(&self) -> &FreshnessTracker {
        &self.tracker
    }

    /// 오늘 날짜 (주입된 시계 기준).
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// 세그먼트 갱신 구간 결정.
    pub async fn date_range(
        &self,
        segment: ExchangeSegment,
        explicit_start: Option<NaiveDate>,
        explicit_end: Option<NaiveDate>,
    ) -> std::result::Result<DateWindow, DataError> {
        calculate_date_range(
            &self.tracker,
            segment,
            self.config.base_start_date(segment),
            explicit_start,
            explicit_end,
            self.today(),
        )
        .await
    }

    /// 단일 세그먼트 갱신. 실패는 `RefreshOutcome::Failed` 로 반환됩니다.
    pub async fn refresh_one(
        &self,
        segment: ExchangeSegment,
        explicit_start: Option<NaiveDate>,
        explicit_end: Option<NaiveDate>,
    ) -> RefreshOutcome {
        let gate = self.segment_gate(segment).await;
        let _guard = gate.lock().await;

        let started = Instant::now();
        let outcome = match self.try_refresh(segment, explicit_start, explicit_end).await {
            Ok(report) => RefreshOutcome::Completed(report),
            Err(e) => {
                error!(segment = %segment, error = %e, "세그먼트 갱신 실패");
                RefreshOutcome::failed(e.to_string())
            }
        };

        metrics::record_refresh(segment, outcome.is_success());
        metrics::record_dates_processed(segment, outcome.dates_processed());
        metrics::record_refresh_duration(segment, started.elapsed().as_secs_f64());

        outcome
    }

    async fn try_refresh(
        &self,
        segment: ExchangeSegment,
        explicit_start: Option<NaiveDate>,
        explicit_end: Option<NaiveDate>,
    ) -> Result<RefreshReport> {
        let window = self.date_range(segment, explicit_start, explicit_end).await?;

        if window.is_empty() {
            info!(segment = %segment, window = %window, "새로 받을 데이터 없음");
            return Ok(RefreshReport::no_new_data(window));
        }

        let days = self.calendar.working_days(window);
        if days.is_empty() {
            info!(segment = %segment, window = %window, "구간에 거래일 없음");
            return Ok(RefreshReport::no_trading_days(window));
        }

        let downloader = self.downloaders.get(segment).ok_or_else(|| {
            CollectorError::Config(format!("No downloader registered for {}", segment))
        })?;

        info!(
            segment = %segment,
            window = %window,
            dates = days.len(),
            "세그먼트 다운로드 시작"
        );

        let report = {
            let _permit = self
                .permits
                .acquire()
                .await
                .map_err(|e| CollectorError::Other(Box::new(e)))?;
            downloader.download(&days).await?
        };

        let failed_dates = report.failed_dates();
        if !failed_dates.is_empty() {
            warn!(
                segment = %segment,
                failed = failed_dates.len(),
                requested = days.len(),
                "일부 날짜 다운로드 실패"
            );
        }

        let last_file_date = self.tracker.last_file_date(segment).await?;
        let total_files = self.tracker.file_count(segment).await?;

        Ok(RefreshReport::downloaded(
            window,
            days.len(),
            failed_dates,
            last_file_date,
            total_files,
        ))
    }

    /// 식별자 목록으로 배치 갱신. 비어 있으면 전체 세그먼트.
    ///
    /// 알 수 없는 식별자가 하나라도 있으면 아무 갱신도 하지 않고 실패합니다.
    pub async fn refresh_many<S: AsRef<str>>(
        &self,
        identifiers: &[S],
        explicit_start: Option<NaiveDate>,
        explicit_end: Option<NaiveDate>,
    ) -> std::result::Result<BatchOutcome, BhavError> {
        let segments = if identifiers.is_empty() {
            ExchangeSegment::ALL.to_vec()
        } else {
            ExchangeSegment::parse_many(identifiers)?
        };

        Ok(self
            .refresh_segments(&segments, explicit_start, explicit_end)
            .await)
    }

    /// 검증된 세그먼트들을 동시에 갱신합니다.
    pub async fn refresh_segments(
        &self,
        segments: &[ExchangeSegment],
        explicit_start: Option<NaiveDate>,
        explicit_end: Option<NaiveDate>,
    ) -> BatchOutcome {
        let started = Instant::now();
        info!(segments = segments.len(), "배치 갱신 시작");

        let outcomes = join_all(segments.iter().map(|segment| async move {
            (
                *segment,
                self.refresh_one(*segment, explicit_start, explicit_end).await,
            )
        }))
        .await;

        let batch = BatchOutcome::new(outcomes.into_iter().collect::<BTreeMap<_, _>>());
        RefreshStats::from_batch(&batch, started.elapsed()).log_summary("배치 갱신");
        batch
    }

    /// 세그먼트 상태 조회.
    pub async fn status(
        &self,
        segment: ExchangeSegment,
    ) -> std::result::Result<FreshnessStatus, DataError> {
        self.tracker.status(segment, self.today()).await
    }

    /// 전체 세그먼트 상태. 저장소 오류는 해당 세그먼트에만 기록됩니다.
    pub async fn status_all(&self) -> BTreeMap<ExchangeSegment, SegmentState> {
        let today = self.today();
        let states = join_all(ExchangeSegment::ALL.iter().map(|segment| async move {
            let state = match self.tracker.status(*segment, today).await {
                Ok(status) => SegmentState::Available(status),
                Err(e) => {
                    warn!(segment = %segment, error = %e, "세그먼트 상태 조회 실패");
                    SegmentState::Unavailable {
                        error: e.to_string(),
                    }
                }
            };
            (*segment, state)
        }))
        .await;

        states.into_iter().collect()
    }

    /// 전체 요약.
    pub async fn summary(&self) -> ArchiveSummary {
        ArchiveSummary::from_states(self.status_all().await)
    }

    /// 세그먼트 게이트 조회 (없으면 생성).
    async fn segment_gate(&self, segment: ExchangeSegment) -> Arc<Mutex<()>> {
        let gates = self.gates.read().await;
        if let Some(gate) = gates.get(&segment) {
            return gate.clone();
        }
        drop(gates);

        let mut gates = self.gates.write().await;
        gates
            .entry(segment)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
