//! bhavcopy 아카이브 API 서버.
//!
//! Axum 기반 REST API 서버를 시작합니다.
//! 세그먼트 상태 조회, 갱신 실행, 요약, Prometheus 메트릭 엔드포인트를 제공합니다.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use bhav_api::metrics::setup_metrics_recorder;
use bhav_api::middleware::metrics_layer;
use bhav_api::routes::create_api_router;
use bhav_api::state::AppState;
use bhav_collector::RefreshCoordinator;
use bhav_core::{AppConfig, ServerConfig};

/// CORS 레이어 생성.
///
/// `server.cors_origins` 가 비어 있으면 모든 origin 을 허용합니다.
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<_> = server
        .cors_origins
        .iter()
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    let restricted = !origins.is_empty();
    let allow_origin = if restricted {
        info!("CORS 허용 origin {}개 설정", origins.len());
        AllowOrigin::list(origins)
    } else {
        if !server.cors_origins.is_empty() {
            warn!("cors_origins 에 유효한 origin 이 없어 모든 origin 허용");
        }
        AllowOrigin::any()
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([axum::http::header::CONTENT_TYPE, axum::http::header::ACCEPT])
        .allow_credentials(restricted)
        // preflight 요청 캐시 시간
        .max_age(Duration::from_secs(3600))
}

/// /metrics 엔드포인트 핸들러.
async fn metrics_handler(
    axum::extract::State(handle): axum::extract::State<PrometheusHandle>,
) -> String {
    handle.render()
}

/// 전체 라우터 생성.
fn create_router(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    // 메트릭 라우터 (별도 상태)
    let metrics_router = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics_handle);

    let cors = cors_layer(&state.config.server);
    let api_router = create_api_router().with_state(state);

    Router::new()
        .merge(metrics_router)
        .merge(api_router)
        .layer(middleware::from_fn(metrics_layer))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    // 설정 로드 (BHAV_CONFIG 로 경로 지정 가능)
    let config_path = std::env::var("BHAV_CONFIG").ok().map(std::path::PathBuf::from);
    let config = Arc::new(AppConfig::load(config_path.as_deref()).context("설정 로드 실패")?);

    bhav_core::init_logging(&config.logging)
        .map_err(|e| anyhow::anyhow!("로깅 초기화 실패: {}", e))?;

    info!("bhav API 서버 시작");

    // Prometheus 메트릭 레코더 설정
    let metrics_handle = setup_metrics_recorder().context("메트릭 레코더 설정 실패")?;
    info!("Prometheus 메트릭 레코더 초기화");

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| {
            error!(
                host = %config.server.host,
                port = config.server.port,
                error = %e,
                "소켓 주소 설정이 유효하지 않습니다. server.host, server.port 를 확인하세요."
            );
            e
        })?;

    let coordinator = Arc::new(RefreshCoordinator::from_config(config.clone())?);
    let state = Arc::new(AppState::new(config, coordinator));
    info!(version = %state.version, "애플리케이션 상태 초기화");

    let app = create_router(state, metrics_handle);

    info!(%addr, "API 서버 리스닝");
    info!("메트릭: http://{}/metrics", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("서버 정상 종료");

    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 반환합니다.
/// 진행 중인 갱신 요청은 응답을 마칠 때까지 기다립니다.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Ctrl+C 핸들러 설치 실패");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "SIGTERM 핸들러 설치 실패");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Ctrl+C 수신, 서버 종료 중...");
        }
        _ = terminate => {
            warn!("SIGTERM 수신, 서버 종료 중...");
        }
    }
}
