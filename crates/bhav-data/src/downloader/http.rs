//! HTTP bhavcopy 다운로더.
//!
//! 날짜마다 URL 템플릿을 채워 파일을 받아 저장소에 기록합니다.
//! 네트워크 오류와 5xx 응답은 선형 백오프로 재시도하고, 404 는 미게시로 보고합니다.

use async_trait::async_trait;
use bhav_core::{DownloadSettings, ExchangeSegment};
use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use std::fmt::Write;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::{DateStatus, DownloadReport, SegmentDownloader};
use crate::storage::ArchiveStore;
use crate::{DataError, Result};

/// 다운로드 설정으로 공유 HTTP 클라이언트를 생성합니다.
pub fn build_client(settings: &DownloadSettings) -> Result<Client> {
    Client::builder()
        .timeout(settings.timeout())
        .user_agent(settings.user_agent.as_str())
        .build()
        .map_err(|e| DataError::Http(format!("HTTP 클라이언트 생성 실패: {e}")))
}

/// 한 번의 fetch 결과.
enum FetchOutcome {
    Body(Vec<u8>),
    NotFound,
    Failed(String),
}

/// URL 템플릿 기반 세그먼트 다운로더.
pub struct HttpArchiveDownloader {
    segment: ExchangeSegment,
    url_template: String,
    extension: String,
    client: Client,
    store: Arc<dyn ArchiveStore>,
    settings: DownloadSettings,
}

impl HttpArchiveDownloader {
    /// 새 다운로더 생성. 템플릿에 잘못된 strftime 지정자가 있으면 실패합니다.
    pub fn new(
        segment: ExchangeSegment,
        url_template: impl Into<String>,
        client: Client,
        store: Arc<dyn ArchiveStore>,
        settings: DownloadSettings,
    ) -> Result<Self> {
        let url_template = url_template.into();
        if StrftimeItems::new(&url_template).any(|item| matches!(item, Item::Error)) {
            return Err(DataError::Config(format!(
                "invalid url_template for {segment}: {url_template}"
            )));
        }

        let extension = extension_from_template(&url_template);
        Ok(Self {
            segment,
            url_template,
            extension,
            client,
            store,
            settings,
        })
    }

    /// 날짜의 다운로드 URL.
    pub fn url_for(&self, date: NaiveDate) -> Result<String> {
        let mut url = String::new();
        write!(url, "{}", date.format(&self.url_template))
            .map_err(|_| DataError::Config(format!("cannot format url for {date}")))?;
        Ok(url)
    }

    /// 저장 파일 확장자 (예: "csv.zip").
    pub fn extension(&self) -> &str {
        &self.extension
    }

    async fn fetch_with_retry(&self, url: &str) -> FetchOutcome {
        let attempts = self.settings.retry_attempts.saturating_add(1);
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            if attempt > 1 {
                tokio::time::sleep(self.settings.retry_delay(attempt - 1)).await;
            }

            match self.client.get(url).send().await {
                Ok(response) if response.status() == StatusCode::NOT_FOUND => {
                    return FetchOutcome::NotFound;
                }
                Ok(response) if response.status().is_success() => {
                    match response.bytes().await {
                        Ok(bytes) => return FetchOutcome::Body(bytes.to_vec()),
                        Err(e) => last_error = format!("body read failed: {e}"),
                    }
                }
                Ok(response) if response.status().is_server_error() => {
                    last_error = format!("HTTP {}", response.status());
                }
                Ok(response) => {
                    return FetchOutcome::Failed(format!("HTTP {}", response.status()));
                }
                Err(e) => last_error = e.to_string(),
            }

            warn!(
                segment = %self.segment,
                url = %url,
                attempt,
                max_attempts = attempts,
                error = %last_error,
                "다운로드 시도 실패"
            );
        }

        FetchOutcome::Failed(last_error)
    }
}

#[async_trait]
impl SegmentDownloader for HttpArchiveDownloader {
    fn segment(&self) -> ExchangeSegment {
        self.segment
    }

    async fn download(&self, dates: &[NaiveDate]) -> Result<DownloadReport> {
        let mut report = DownloadReport::new();
        let mut requested = false;
        // 디렉토리는 다운로드 시작 시 한 번만 조회
        let mut present = self.store.archived_dates(self.segment).await?;

        for &date in dates {
            if present.contains(&date) {
                debug!(segment = %self.segment, %date, "이미 저장된 날짜, 건너뜀");
                report.push(date, DateStatus::AlreadyPresent);
                continue;
            }

            if requested {
                tokio::time::sleep(self.settings.request_delay()).await;
            }
            requested = true;

            let url = self.url_for(date)?;
            let status = match self.fetch_with_retry(&url).await {
                FetchOutcome::Body(body) => {
                    match self
                        .store
                        .save(self.segment, date, &self.extension, &body)
                        .await
                    {
                        Ok(_) => {
                            present.insert(date);
                            DateStatus::Saved { bytes: body.len() }
                        }
                        Err(e) => DateStatus::Failed(e.to_string()),
                    }
                }
                FetchOutcome::NotFound => {
                    debug!(segment = %self.segment, %date, url = %url, "아카이브 미게시 (404)");
                    DateStatus::NotPublished
                }
                FetchOutcome::Failed(reason) => DateStatus::Failed(reason),
            };

            report.push(date, status);
        }

        info!(
            segment = %self.segment,
            requested = dates.len(),
            saved = report.saved_count(),
            failed = report.failed_dates().len(),
            "세그먼트 다운로드 완료"
        );

        Ok(report)
    }
}

/// 템플릿 마지막 경로 조각의 첫 `.` 이후를 확장자로 사용합니다.
fn extension_from_template(template: &str) -> String {
    let path = template.split(['?', '#']).next().unwrap_or(template);
    let file = path.rsplit('/').next().unwrap_or(path);

    match file.split_once('.') {
        Some((_, ext)) if !ext.is_empty() && !ext.contains('%') => ext.to_ascii_lowercase(),
        _ => "dat".to_string(),
    }
}
