//! 갱신 코디네이터 시나리오 테스트.

use async_trait::async_trait;
use bhav_collector::RefreshCoordinator;
use bhav_core::{
    AppConfig, BatchStatus, BhavError, ExchangeSegment, FixedClock, RefreshOutcome,
};
use bhav_data::{
    ArchiveStore, DateStatus, DownloadReport, DownloaderRegistry, MemoryArchiveStore,
    SegmentDownloader,
};
use chrono::{Datelike, NaiveDate, Weekday};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// 호출을 기록하고 메모리 저장소에 날짜를 채우는 다운로더.
struct RecordingDownloader {
    segment: ExchangeSegment,
    store: Arc<MemoryArchiveStore>,
    fail: bool,
    delay: Option<Duration>,
    calls: Arc<Mutex<Vec<(ExchangeSegment, Vec<NaiveDate>)>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

#[async_trait]
impl SegmentDownloader for RecordingDownloader {
    fn segment(&self) -> ExchangeSegment {
        self.segment
    }

    async fn download(&self, dates: &[NaiveDate]) -> bhav_data::Result<DownloadReport> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        self.calls
            .lock()
            .unwrap()
            .push((self.segment, dates.to_vec()));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let mut report = DownloadReport::new();
        for &date in dates {
            if self.fail {
                report.push(date, DateStatus::Failed("HTTP 503".to_string()));
            } else {
                self.store.save(self.segment, date, "csv", b"x").await?;
                report.push(date, DateStatus::Saved { bytes: 1 });
            }
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(report)
    }
}

struct Harness {
    coordinator: RefreshCoordinator,
    store: Arc<MemoryArchiveStore>,
    calls: Arc<Mutex<Vec<(ExchangeSegment, Vec<NaiveDate>)>>>,
    max_in_flight: Arc<AtomicUsize>,
}

impl Harness {
    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

struct HarnessBuilder {
    config: AppConfig,
    today: NaiveDate,
    failing: Vec<ExchangeSegment>,
    without: Vec<ExchangeSegment>,
    delay: Option<Duration>,
}

impl HarnessBuilder {
    fn new(today: NaiveDate) -> Self {
        let mut config = AppConfig::default();
        config.dates.base_start_date = d(2020, 1, 1);
        config.dates.weekend_skip = true;
        config.dates.holiday_skip = false;
        Self {
            config,
            today,
            failing: Vec::new(),
            without: Vec::new(),
            delay: None,
        }
    }

    fn failing(mut self, segment: ExchangeSegment) -> Self {
        self.failing.push(segment);
        self
    }

    fn without_downloader(mut self, segment: ExchangeSegment) -> Self {
        self.without.push(segment);
        self
    }

    fn max_concurrent(mut self, permits: usize) -> Self {
        self.config.download.max_concurrent_downloads = permits;
        self
    }

    fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn build(self) -> Harness {
        let store = Arc::new(MemoryArchiveStore::new());
        let calls = Arc::new(Mutex::new(Vec::new()));
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_in_flight = Arc::new(AtomicUsize::new(0));

        let mut registry = DownloaderRegistry::new();
        for segment in ExchangeSegment::ALL {
            if self.without.contains(&segment) {
                continue;
            }
            registry.register(Arc::new(RecordingDownloader {
                segment,
                store: store.clone(),
                fail: self.failing.contains(&segment),
                delay: self.delay,
                calls: calls.clone(),
                in_flight: in_flight.clone(),
                max_in_flight: max_in_flight.clone(),
            }));
        }

        let coordinator = RefreshCoordinator::new(
            Arc::new(self.config),
            store.clone(),
            registry,
            Arc::new(FixedClock(self.today)),
        );

        Harness {
            coordinator,
            store,
            calls,
            max_in_flight,
        }
    }
}

fn weekdays_between(start: NaiveDate, end: NaiveDate) -> usize {
    start
        .iter_days()
        .take_while(|day| *day <= end)
        .filter(|day| !matches!(day.weekday(), Weekday::Sat | Weekday::Sun))
        .count()
}

#[tokio::test]
async fn first_run_downloads_every_weekday_since_base_date() {
    let harness = HarnessBuilder::new(d(2024, 6, 10)).build();

    let outcome = harness
        .coordinator
        .refresh_one(ExchangeSegment::NseEq, None, None)
        .await;

    let expected = weekdays_between(d(2020, 1, 1), d(2024, 6, 10));
    let report = outcome.report().expect("completed outcome");
    assert!(report.success);
    assert_eq!(report.dates_processed, expected);
    assert_eq!(report.start_date, d(2020, 1, 1));
    assert_eq!(report.end_date, d(2024, 6, 10));
    assert_eq!(report.last_file_date, Some(d(2024, 6, 10)));
    assert_eq!(report.total_files, Some(expected));

    let calls = harness.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let (segment, dates) = &calls[0];
    assert_eq!(*segment, ExchangeSegment::NseEq);
    assert_eq!(dates.len(), expected);
    assert_eq!(dates.first(), Some(&d(2020, 1, 1)));
    assert_eq!(dates.last(), Some(&d(2024, 6, 10)));
    assert!(dates
        .iter()
        .all(|day| !matches!(day.weekday(), Weekday::Sat | Weekday::Sun)));
}

#[tokio::test]
async fn saturday_after_friday_file_has_no_trading_days() {
    let harness = HarnessBuilder::new(d(2024, 6, 8)).build();
    harness
        .store
        .insert_dates(ExchangeSegment::BseIndex, &[d(2024, 6, 7)])
        .await;

    let outcome = harness
        .coordinator
        .refresh_one(ExchangeSegment::BseIndex, None, None)
        .await;

    let report = outcome.report().expect("completed outcome");
    assert!(report.success);
    assert_eq!(report.dates_processed, 0);
    assert_eq!(report.start_date, d(2024, 6, 8));
    assert_eq!(report.end_date, d(2024, 6, 8));
    assert_eq!(report.message, "No trading days in date range");
    assert_eq!(harness.call_count(), 0);
}

#[tokio::test]
async fn inverted_window_is_successful_no_op() {
    let harness = HarnessBuilder::new(d(2024, 6, 10)).build();

    let outcome = harness
        .coordinator
        .refresh_one(
            ExchangeSegment::NseFo,
            Some(d(2024, 6, 12)),
            Some(d(2024, 6, 10)),
        )
        .await;

    let report = outcome.report().expect("completed outcome");
    assert!(report.success);
    assert_eq!(report.dates_processed, 0);
    assert_eq!(report.message, "No new data to download");
    assert_eq!(harness.call_count(), 0);
}

#[tokio::test]
async fn no_op_refresh_is_idempotent() {
    let harness = HarnessBuilder::new(d(2024, 6, 10)).build();
    harness
        .store
        .insert_dates(ExchangeSegment::NseSme, &[d(2024, 6, 10)])
        .await;

    let first = harness
        .coordinator
        .refresh_one(ExchangeSegment::NseSme, None, None)
        .await;
    let second = harness
        .coordinator
        .refresh_one(ExchangeSegment::NseSme, None, None)
        .await;

    assert_eq!(first, second);
    assert!(first.is_success());
    assert_eq!(first.dates_processed(), 0);
    assert_eq!(harness.call_count(), 0);
}

#[tokio::test]
async fn unknown_segment_rejects_whole_batch() {
    let harness = HarnessBuilder::new(d(2024, 6, 10)).build();

    let result = harness
        .coordinator
        .refresh_many(&["NSE_EQ", "MCX_COMMODITY", "BSE_EQ"], None, None)
        .await;

    match result {
        Err(BhavError::UnknownSegments { invalid, valid }) => {
            assert_eq!(invalid, vec!["MCX_COMMODITY".to_string()]);
            assert_eq!(valid.len(), 6);
        }
        other => panic!("expected UnknownSegments, got {:?}", other),
    }
    assert_eq!(harness.call_count(), 0);
}

#[tokio::test]
async fn one_failing_downloader_makes_batch_partial() {
    let harness = HarnessBuilder::new(d(2024, 6, 10))
        .failing(ExchangeSegment::BseEq)
        .build();
    for segment in ExchangeSegment::ALL {
        harness.store.insert_dates(segment, &[d(2024, 6, 6)]).await;
    }

    let batch = harness
        .coordinator
        .refresh_many::<&str>(&[], None, None)
        .await
        .unwrap();

    assert_eq!(batch.status(), BatchStatus::Partial);
    assert_eq!(batch.total_count(), 6);
    assert_eq!(batch.success_count(), 5);
    assert_eq!(batch.summary(), "5/6 exchanges refreshed successfully");

    let failed = batch.results[&ExchangeSegment::BseEq].report().unwrap();
    assert!(!failed.success);
    assert_eq!(failed.failed_dates, vec![d(2024, 6, 7), d(2024, 6, 10)]);
    assert_eq!(failed.last_file_date, Some(d(2024, 6, 6)));

    for segment in ExchangeSegment::ALL
        .into_iter()
        .filter(|s| *s != ExchangeSegment::BseEq)
    {
        let report = batch.results[&segment].report().unwrap();
        assert!(report.success, "{segment} should succeed");
        // 06-07 금, 06-10 월
        assert_eq!(report.dates_processed, 2);
        assert_eq!(report.last_file_date, Some(d(2024, 6, 10)));
    }
}

#[tokio::test]
async fn all_segments_succeeding_is_success() {
    let harness = HarnessBuilder::new(d(2024, 6, 10)).build();
    for segment in ExchangeSegment::ALL {
        harness.store.insert_dates(segment, &[d(2024, 6, 7)]).await;
    }

    let batch = harness
        .coordinator
        .refresh_many(&["NSE_EQ", "bse_index"], None, None)
        .await
        .unwrap();

    assert_eq!(batch.status(), BatchStatus::Success);
    assert_eq!(batch.total_count(), 2);
    assert_eq!(batch.total_dates_processed(), 2);
}

#[tokio::test]
async fn duplicate_identifiers_are_collapsed() {
    let harness = HarnessBuilder::new(d(2024, 6, 10)).build();
    harness
        .store
        .insert_dates(ExchangeSegment::NseEq, &[d(2024, 6, 7)])
        .await;

    let batch = harness
        .coordinator
        .refresh_many(&["nse_eq", "NSE_EQ", " Nse_Eq "], None, None)
        .await
        .unwrap();

    assert_eq!(batch.total_count(), 1);
    assert_eq!(harness.call_count(), 1);
}

#[tokio::test]
async fn storage_failure_becomes_failed_outcome_without_touching_siblings() {
    let harness = HarnessBuilder::new(d(2024, 6, 10)).build();
    harness.store.insert_dates(ExchangeSegment::NseEq, &[d(2024, 6, 7)]).await;
    harness.store.insert_dates(ExchangeSegment::NseFo, &[d(2024, 6, 7)]).await;
    harness.store.set_unreadable(ExchangeSegment::NseFo, true).await;

    let batch = harness
        .coordinator
        .refresh_many(&["NSE_EQ", "NSE_FO"], None, None)
        .await
        .unwrap();

    assert_eq!(batch.status(), BatchStatus::Partial);
    assert!(batch.results[&ExchangeSegment::NseEq].is_success());
    match &batch.results[&ExchangeSegment::NseFo] {
        RefreshOutcome::Failed(failure) => assert!(failure.error.contains("Storage")),
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn missing_downloader_is_reported_as_failure() {
    let harness = HarnessBuilder::new(d(2024, 6, 10))
        .without_downloader(ExchangeSegment::NseIndex)
        .build();
    harness
        .store
        .insert_dates(ExchangeSegment::NseIndex, &[d(2024, 6, 7)])
        .await;

    let outcome = harness
        .coordinator
        .refresh_one(ExchangeSegment::NseIndex, None, None)
        .await;

    assert!(!outcome.is_success());
    assert!(outcome
        .error_message()
        .unwrap()
        .contains("No downloader registered for NSE_INDEX"));
}

#[tokio::test]
async fn concurrent_refreshes_of_one_segment_download_once() {
    let harness = HarnessBuilder::new(d(2024, 6, 10))
        .delay(Duration::from_millis(20))
        .build();
    harness
        .store
        .insert_dates(ExchangeSegment::BseEq, &[d(2024, 6, 6)])
        .await;

    let (first, second) = tokio::join!(
        harness
            .coordinator
            .refresh_one(ExchangeSegment::BseEq, None, None),
        harness
            .coordinator
            .refresh_one(ExchangeSegment::BseEq, None, None),
    );

    assert!(first.is_success());
    assert!(second.is_success());
    assert_eq!(first.dates_processed() + second.dates_processed(), 2);
    assert_eq!(harness.call_count(), 1);
}

#[tokio::test]
async fn downloader_concurrency_is_bounded() {
    let harness = HarnessBuilder::new(d(2024, 6, 10))
        .max_concurrent(1)
        .delay(Duration::from_millis(10))
        .build();
    for segment in ExchangeSegment::ALL {
        harness.store.insert_dates(segment, &[d(2024, 6, 7)]).await;
    }

    let batch = harness
        .coordinator
        .refresh_many::<&str>(&[], None, None)
        .await
        .unwrap();

    assert_eq!(batch.status(), BatchStatus::Success);
    assert_eq!(harness.call_count(), 6);
    assert_eq!(harness.max_in_flight.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn summary_counts_files_and_isolates_storage_errors() {
    let harness = HarnessBuilder::new(d(2024, 6, 10)).build();
    harness
        .store
        .insert_dates(ExchangeSegment::NseEq, &[d(2024, 6, 6), d(2024, 6, 7)])
        .await;
    harness
        .store
        .insert_dates(ExchangeSegment::BseIndex, &[d(2024, 6, 10)])
        .await;
    harness.store.set_unreadable(ExchangeSegment::NseFo, true).await;

    let summary = harness.coordinator.summary().await;
    assert_eq!(summary.statistics.total_exchanges, 6);
    assert_eq!(summary.statistics.exchanges_with_data, 2);
    assert_eq!(summary.statistics.total_files, 3);
    assert!(summary.exchanges[&ExchangeSegment::NseFo].status().is_none());

    let status = harness
        .coordinator
        .status(ExchangeSegment::BseIndex)
        .await
        .unwrap();
    assert!(status.is_up_to_date);
    assert_eq!(status.last_date, Some(d(2024, 6, 10)));
}
