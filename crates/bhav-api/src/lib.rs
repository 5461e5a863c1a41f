//! bhavcopy 아카이브 REST API.
//!
//! 세그먼트 상태 조회, 갱신 실행, 전체 요약을 JSON 으로 제공합니다.

pub mod error;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::{ApiErrorResponse, ApiResult};
pub use routes::create_api_router;
pub use state::AppState;
