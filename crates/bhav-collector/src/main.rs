//! Standalone archive refresher CLI.

use bhav_core::{parse_optional_date, AppConfig, BatchStatus, ExchangeSegment};
use bhav_collector::RefreshCoordinator;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "bhav-collector")]
#[command(about = "NSE/BSE bhavcopy archive refresher", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 설정 파일 경로 (기본: config/default.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 로그 레벨 (trace, debug, info, warn, error). 설정 파일보다 우선
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// 세그먼트 상태 조회 (생략 시 전체)
    Status {
        /// 세그먼트 식별자 (예: NSE_EQ)
        #[arg(long)]
        exchange: Option<String>,
    },

    /// 전체 요약
    Summary,

    /// 아카이브 갱신
    Refresh {
        /// 대상 세그먼트 (쉼표로 구분, 예: "NSE_EQ,BSE_INDEX"). 생략 시 전체
        #[arg(long)]
        exchanges: Option<String>,

        /// 시작일 (YYYY-MM-DD)
        #[arg(long)]
        start_date: Option<String>,

        /// 종료일 (YYYY-MM-DD)
        #[arg(long)]
        end_date: Option<String>,
    },

    /// 데몬 모드: 주기적으로 전체 세그먼트 갱신
    Daemon,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error + Send + Sync>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // 설정 로드
    let config = Arc::new(AppConfig::load(cli.config.as_deref())?);

    // 로깅 초기화
    let mut logging = config.logging.clone();
    if let Some(level) = cli.log_level {
        logging.level = level;
    }
    bhav_core::init_logging(&logging)?;

    tracing::info!("bhav-collector 시작");

    let coordinator = RefreshCoordinator::from_config(config.clone())?;

    // 명령 실행
    let exit_code = match cli.command {
        Commands::Status { exchange } => {
            match exchange {
                Some(id) => {
                    let segment: ExchangeSegment = id.parse()?;
                    let status = coordinator.status(segment).await?;
                    println!("{}", serde_json::to_string_pretty(&status)?);
                }
                None => {
                    let states = coordinator.status_all().await;
                    println!("{}", serde_json::to_string_pretty(&states)?);
                }
            }
            ExitCode::SUCCESS
        }
        Commands::Summary => {
            let summary = coordinator.summary().await;
            println!("{}", serde_json::to_string_pretty(&summary)?);
            ExitCode::SUCCESS
        }
        Commands::Refresh {
            exchanges,
            start_date,
            end_date,
        } => {
            let start = parse_optional_date(start_date.as_deref())?;
            let end = parse_optional_date(end_date.as_deref())?;
            let identifiers: Vec<String> = exchanges
                .as_deref()
                .map(|s| {
                    s.split(',')
                        .map(|id| id.trim().to_string())
                        .filter(|id| !id.is_empty())
                        .collect()
                })
                .unwrap_or_default();

            let batch = coordinator.refresh_many(&identifiers, start, end).await?;
            println!("{}", serde_json::to_string_pretty(&batch)?);

            if batch.status() == BatchStatus::Success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Commands::Daemon => {
            tracing::info!(
                "=== 데몬 모드 시작 (주기: {}분) ===",
                config.daemon.interval_minutes
            );

            let mut interval = tokio::time::interval(config.daemon.interval());
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {
                        tracing::info!("종료 신호 수신, 데몬 종료 중...");
                        break;
                    }
                    _ = interval.tick() => {
                        tracing::info!("=== 전체 갱신 시작 ===");

                        let batch = coordinator
                            .refresh_segments(&ExchangeSegment::ALL, None, None)
                            .await;

                        tracing::info!(
                            status = ?batch.status(),
                            summary = %batch.summary(),
                            "=== 전체 갱신 완료, 다음 실행: {}분 후 ===",
                            config.daemon.interval_minutes
                        );
                    }
                }
            }
            ExitCode::SUCCESS
        }
    };

    tracing::info!("bhav-collector 종료");

    Ok(exit_code)
}
