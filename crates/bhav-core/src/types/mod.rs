//! 핵심 타입 정의.

pub mod date_window;
pub mod segment;

pub use date_window::{parse_date, parse_optional_date, DateWindow};
pub use segment::ExchangeSegment;
