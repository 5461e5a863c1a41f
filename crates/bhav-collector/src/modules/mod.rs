//! 갱신 모듈.

pub mod date_range;
pub mod refresh;

pub use date_range::calculate_date_range;
pub use refresh::RefreshCoordinator;
