//! 설정 관리.
//!
//! 기본값 → (선택) TOML 파일 → `MONITOR_` 환경 변수 순으로 덮어씁니다.
//!
//! ```text
//! MONITOR_CACHE__TTL_SECS=60
//! MONITOR_NEWS__TIMEOUT_SECS=5
//! MONITOR_LOGGING__FORMAT=json
//! ```

use crate::directory::{default_assets, default_news_sources, AssetDirectory, AssetEntry, NewsDirectory};
use crate::domain::NewsSource;
use crate::error::{MonitorError, MonitorResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// 로깅 설정
    pub logging: LoggingConfig,
    /// 가격 캐시 설정
    pub cache: CacheConfig,
    /// 뉴스 수집 설정
    pub news: NewsConfig,
    /// 시세 조회 설정
    pub market: MarketConfig,
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 가격 캐시 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// 캐시 항목 TTL (초)
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_secs: 300 }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// 뉴스 수집 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NewsConfig {
    /// 소스당 요청 타임아웃 (초)
    pub timeout_secs: u64,
    /// 소스당 최대 항목 수
    pub max_per_source: usize,
    /// 기본 반환 개수
    pub default_limit: usize,
    /// HTTP User-Agent
    pub user_agent: String,
    /// 뉴스 소스 (순서 유지)
    pub sources: Vec<NewsSource>,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            max_per_source: 30,
            default_limit: 25,
            user_agent: "MarketMonitor/1.0".to_string(),
            sources: default_news_sources(),
        }
    }
}

impl NewsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// 시세 조회 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MarketConfig {
    /// 추적 자산 (순서 유지)
    pub assets: Vec<AssetEntry>,
    /// movers 계산에 쓰는 조회 기간
    pub movers_period: String,
    /// movers 계산에 쓰는 샘플링 간격
    pub movers_interval: String,
    /// 가격 시계열 기본 조회 기간
    pub default_period: String,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            assets: default_assets(),
            movers_period: "5d".to_string(),
            movers_interval: "1d".to_string(),
            default_period: "6mo".to_string(),
        }
    }
}

impl MonitorConfig {
    /// 기본값, 파일, 환경 변수에서 설정을 로드합니다.
    ///
    /// `path`가 주어졌지만 파일이 없으면 기본값과 환경 변수만 사용합니다.
    /// CLI 기본 경로는 `config/default.toml`입니다.
    /// 로드 후 `validate`를 거칩니다.
    pub fn load(path: Option<&Path>) -> MonitorResult<Self> {
        // 누락된 값은 serde 기본값으로 채움 (배열은 병합하지 않고 통째로 교체)
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("MONITOR")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let loaded: Self = config.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// 설정 값의 일관성을 확인합니다.
    pub fn validate(&self) -> MonitorResult<()> {
        if self.news.timeout_secs == 0 {
            return Err(MonitorError::Config("news.timeout_secs must be > 0".into()));
        }
        if self.news.max_per_source == 0 {
            return Err(MonitorError::Config("news.max_per_source must be > 0".into()));
        }

        let mut labels = HashSet::new();
        for asset in &self.market.assets {
            if asset.label.trim().is_empty() || asset.symbol.trim().is_empty() {
                return Err(MonitorError::Config(format!(
                    "asset entry has empty label or symbol: {:?}",
                    asset
                )));
            }
            if !labels.insert(asset.label.as_str()) {
                return Err(MonitorError::Config(format!(
                    "duplicate asset label: {}",
                    asset.label
                )));
            }
        }

        let mut names = HashSet::new();
        for source in &self.news.sources {
            if !names.insert(source.name.as_str()) {
                return Err(MonitorError::Config(format!(
                    "duplicate news source: {}",
                    source.name
                )));
            }
        }

        Ok(())
    }

    /// 자산 디렉토리 생성.
    pub fn asset_directory(&self) -> AssetDirectory {
        AssetDirectory::new(self.market.assets.clone())
    }

    /// 뉴스 디렉토리 생성.
    pub fn news_directory(&self) -> NewsDirectory {
        NewsDirectory::new(self.news.sources.clone())
    }
}
