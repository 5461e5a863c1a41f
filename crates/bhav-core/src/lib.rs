//! # Bhav Core
//!
//! 거래소 일별 아카이브(bhavcopy) 갱신 시스템의 핵심 도메인 타입을 제공합니다.
//!
//! 이 크레이트는 시스템 전반에서 사용되는 기본 타입을 제공합니다:
//! - 거래소/세그먼트 식별자 ([`ExchangeSegment`])
//! - 날짜 구간과 거래일 달력 ([`DateWindow`], [`TradingCalendar`])
//! - 신선도 및 갱신 결과 값 객체
//! - 설정 관리
//! - 로깅 인프라

pub mod calendar;
pub mod clock;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use calendar::{working_days, TradingCalendar, WorkingDaySequence};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
