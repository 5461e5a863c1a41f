//! 로깅 초기화.
//!
//! `[logging]` 설정의 레벨과 형식으로 전역 tracing subscriber 를 설치합니다.
//! 레벨은 `RUST_LOG` 가 있으면 그쪽이 우선합니다.

use serde::{Deserialize, Serialize};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingConfig;

/// 로그 출력 형식.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// 개발용 여러 줄 형식
    #[default]
    Pretty,
    /// 로그 수집기용 JSON 한 줄
    Json,
    /// 데몬 실행용 한 줄 형식
    Compact,
}

/// 레벨 문자열을 필터로 파싱합니다 (예: "info,bhav_data=debug").
pub fn level_filter(level: &str) -> Result<EnvFilter, tracing_subscriber::filter::ParseError> {
    EnvFilter::try_new(level)
}

/// 설정으로 로깅을 초기화합니다. 두 번 호출하면 에러를 반환합니다.
pub fn init_logging(
    settings: &LoggingConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => level_filter(&settings.level)?,
    };

    let fmt_layer = match settings.format {
        LogFormat::Pretty => tracing_subscriber::fmt::layer().pretty().boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(false)
            .boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_target(false)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    tracing::info!(format = ?settings.format, level = %settings.level, "로깅 초기화 완료");
    Ok(())
}
