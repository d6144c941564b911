//! Market monitor CLI.

use clap::{Parser, Subcommand};
use monitor_cli::{commands, split_list};
use monitor_core::{init_logging, LogConfig, MonitorConfig};
use monitor_data::MarketMonitor;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "market-monitor")]
#[command(about = "Market movers, price series and headline aggregation", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 설정 파일 경로 (TOML, 없으면 기본값 사용)
    #[arg(long, short, default_value = "config/default.toml")]
    config: PathBuf,

    /// 로그 레벨 (설정 파일 값보다 우선)
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// 자산별 등락률 (내림차순)
    Movers {
        /// 자산 이름 (쉼표로 구분, 예: "DAX,Brent"). 없으면 전체
        #[arg(long)]
        watchlist: Option<String>,
    },

    /// 단일 심볼 가격 시계열
    Prices {
        /// 업스트림 심볼 또는 자산 이름 (예: "^GSPC", "Gold")
        symbol: String,

        /// 조회 기간 (예: "1d", "5d", "6mo")
        #[arg(long)]
        period: Option<String>,
    },

    /// 뉴스 헤드라인
    News {
        /// 최대 개수
        #[arg(long)]
        limit: Option<usize>,

        /// 제목/요약 검색어
        #[arg(long)]
        q: Option<String>,

        /// 소스 이름 (쉼표로 구분). 없으면 전체
        #[arg(long)]
        sources: Option<String>,
    },

    /// 설정된 자산 이름/심볼과 뉴스 소스 목록
    Directory,

    /// 주기적으로 movers 조회 (Ctrl-C로 종료)
    Watch {
        /// 실행 주기 (초)
        #[arg(long, default_value_t = 60)]
        interval_secs: u64,

        /// 자산 이름 (쉼표로 구분). 없으면 전체
        #[arg(long)]
        watchlist: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // 설정 로드
    let config = MonitorConfig::load(Some(cli.config.as_path()))?;

    // 로깅 초기화
    let mut log_config = LogConfig::from(&config.logging);
    if let Some(level) = cli.log_level {
        log_config.filter = level;
    }
    init_logging(log_config)?;

    let monitor = MarketMonitor::from_config(&config)?;

    match cli.command {
        Commands::Movers { watchlist } => {
            let watchlist = split_list(watchlist.as_deref());
            println!("{}", commands::movers_json(&monitor, &watchlist).await?);
        }
        Commands::Prices { symbol, period } => {
            println!(
                "{}",
                commands::prices_json(&monitor, &symbol, period.as_deref()).await?
            );
        }
        Commands::News { limit, q, sources } => {
            let sources = split_list(sources.as_deref());
            println!(
                "{}",
                commands::news_json(&monitor, limit, q.as_deref(), &sources).await?
            );
        }
        Commands::Directory => {
            println!("{}", commands::directory_json(&monitor)?);
        }
        Commands::Watch {
            interval_secs,
            watchlist,
        } => {
            let watchlist = split_list(watchlist.as_deref());
            let shutdown = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!("종료 신호 대기 실패: {}", e);
                }
            };

            let stats = commands::watch(
                &monitor,
                Duration::from_secs(interval_secs.max(1)),
                &watchlist,
                shutdown,
                |rows| match commands::to_json(rows) {
                    Ok(json) => println!("{}", json),
                    Err(e) => tracing::error!("movers 직렬화 실패: {}", e),
                },
            )
            .await;
            stats.log_summary("watch");
        }
    }

    Ok(())
}
