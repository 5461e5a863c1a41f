//! 설정 관리.
//!
//! 기본값 → TOML 파일 → 환경 변수(`BHAV__` 접두사) 순서로 설정을 로드합니다.
//! 설정은 시작 시 한 번 생성되어 `Arc` 로 각 컴포넌트에 명시적으로 전달됩니다.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::calendar::TradingCalendar;
use crate::error::BhavError;
use crate::logging::{level_filter, LogFormat};
use crate::types::ExchangeSegment;

/// 기본 설정 파일 경로 (확장자 제외).
pub const DEFAULT_CONFIG_PATH: &str = "config/default";

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 서버 설정
    pub server: ServerConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
    /// 데이터 저장 설정
    pub data: DataSettings,
    /// 다운로드 설정
    pub download: DownloadSettings,
    /// 날짜/달력 설정
    pub dates: DateSettings,
    /// 세그먼트별 설정 (키: 세그먼트 식별자, 대소문자 무시)
    pub segments: HashMap<String, SegmentConfig>,
    /// 데몬 모드 설정
    pub daemon: DaemonConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 허용할 CORS origin (비어 있으면 모두 허용)
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            cors_origins: Vec::new(),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨 필터 (`RUST_LOG` 문법)
    pub level: String,
    /// 로그 형식
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// 데이터 저장 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DataSettings {
    /// 아카이브 루트 디렉토리
    pub base_data_path: PathBuf,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            base_data_path: PathBuf::from("./data"),
        }
    }
}

/// 다운로드 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DownloadSettings {
    /// 동시에 실행할 수 있는 다운로더 호출 수
    pub max_concurrent_downloads: usize,
    /// 날짜당 재시도 횟수
    pub retry_attempts: u32,
    /// HTTP 요청 타임아웃 (초)
    pub timeout_seconds: u64,
    /// 재시도 간 기본 대기 (밀리초, 시도 횟수만큼 배수)
    pub retry_delay_ms: u64,
    /// 날짜 간 요청 딜레이 (밀리초)
    pub request_delay_ms: u64,
    /// HTTP User-Agent
    pub user_agent: String,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            max_concurrent_downloads: 3,
            retry_attempts: 3,
            timeout_seconds: 30,
            retry_delay_ms: 1000,
            request_delay_ms: 250,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) bhav-archive/0.1".to_string(),
        }
    }
}

impl DownloadSettings {
    /// HTTP 타임아웃을 Duration 으로 반환
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// 날짜 간 요청 딜레이를 Duration 으로 반환
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    /// `attempt` 번째 재시도 전 대기 시간 (선형 증가)
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.retry_delay_ms.saturating_mul(u64::from(attempt)))
    }
}

/// 날짜/달력 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DateSettings {
    /// 첫 실행 시 수집 시작일
    pub base_start_date: NaiveDate,
    /// 주말 제외
    pub weekend_skip: bool,
    /// 휴장일 제외
    pub holiday_skip: bool,
    /// 최신 판정 허용 지연 (거래일 수)
    pub freshness_tolerance_days: usize,
    /// 휴장일 목록
    pub holidays: Vec<NaiveDate>,
}

impl Default for DateSettings {
    fn default() -> Self {
        Self {
            base_start_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default(),
            weekend_skip: true,
            holiday_skip: true,
            freshness_tolerance_days: 0,
            holidays: Vec::new(),
        }
    }
}

/// 세그먼트별 설정. 지정하지 않은 항목은 전역 설정/기본값을 사용합니다.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SegmentConfig {
    /// 첫 실행 시 수집 시작일
    pub base_start_date: Option<NaiveDate>,
    /// 다운로드 URL 템플릿 (chrono `strftime` 패턴)
    pub url_template: Option<String>,
    /// 저장 디렉토리 (상대 경로면 `base_data_path` 기준)
    pub data_dir: Option<PathBuf>,
}

/// 데몬 모드 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DaemonConfig {
    /// 전체 갱신 주기 (분 단위)
    pub interval_minutes: u64,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            interval_minutes: 60,
        }
    }
}

impl DaemonConfig {
    /// 갱신 주기를 Duration 으로 반환
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes.max(1) * 60)
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// `path` 가 없으면 `config/default.toml` 을 (있는 경우에만) 읽습니다.
    pub fn load(path: Option<&Path>) -> Result<Self, BhavError> {
        let file_source = match path {
            Some(p) => config::File::from(p).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_PATH).required(false),
        };

        let config = config::Config::builder()
            .add_source(file_source)
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("BHAV")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins")
                    .with_list_parse_key("dates.holidays")
                    .try_parsing(true),
            )
            .build()?;

        let app_config: AppConfig = config.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    /// TOML 문자열에서 설정을 로드합니다 (환경 변수 무시).
    pub fn from_toml_str(toml: &str) -> Result<Self, BhavError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?;

        let app_config: AppConfig = config.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    /// 설정 값 검증.
    pub fn validate(&self) -> Result<(), BhavError> {
        if self.download.max_concurrent_downloads == 0 {
            return Err(BhavError::Config(
                "download.max_concurrent_downloads must be at least 1".to_string(),
            ));
        }
        if self.download.timeout_seconds == 0 {
            return Err(BhavError::Config(
                "download.timeout_seconds must be at least 1".to_string(),
            ));
        }

        if let Err(e) = level_filter(&self.logging.level) {
            return Err(BhavError::Config(format!(
                "logging.level is not a valid filter ({}): {e}",
                self.logging.level
            )));
        }

        let unknown: Vec<&str> = self
            .segments
            .keys()
            .filter(|key| key.parse::<ExchangeSegment>().is_err())
            .map(String::as_str)
            .collect();
        if !unknown.is_empty() {
            return Err(BhavError::Config(format!(
                "unknown segments in [segments]: {}",
                unknown.join(", ")
            )));
        }

        for (key, segment) in &self.segments {
            if matches!(&segment.url_template, Some(t) if t.trim().is_empty()) {
                return Err(BhavError::Config(format!(
                    "segments.{key}.url_template must not be empty"
                )));
            }
        }

        Ok(())
    }

    /// 세그먼트 설정 조회 (키 대소문자 무시).
    pub fn segment_config(&self, segment: ExchangeSegment) -> SegmentConfig {
        self.segments
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(segment.as_str()))
            .map(|(_, cfg)| cfg.clone())
            .unwrap_or_default()
    }

    /// 세그먼트의 첫 실행 시작일.
    pub fn base_start_date(&self, segment: ExchangeSegment) -> NaiveDate {
        self.segment_config(segment)
            .base_start_date
            .unwrap_or(self.dates.base_start_date)
    }

    /// 세그먼트의 다운로드 URL 템플릿.
    pub fn url_template(&self, segment: ExchangeSegment) -> String {
        self.segment_config(segment)
            .url_template
            .unwrap_or_else(|| segment.default_url_template().to_string())
    }

    /// 세그먼트의 저장 경로.
    ///
    /// 기본값은 `<base_data_path>/<거래소>/<세그먼트>` 입니다.
    pub fn data_path(&self, segment: ExchangeSegment) -> PathBuf {
        match self.segment_config(segment).data_dir {
            Some(dir) if dir.is_absolute() => dir,
            Some(dir) => self.data.base_data_path.join(dir),
            None => self
                .data
                .base_data_path
                .join(segment.exchange())
                .join(segment.segment()),
        }
    }

    /// 날짜 설정으로부터 거래일 달력을 생성합니다.
    pub fn calendar(&self) -> TradingCalendar {
        TradingCalendar::from_settings(&self.dates)
    }
}
