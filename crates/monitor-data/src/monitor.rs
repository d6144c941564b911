//! 조회 파사드.
//!
//! HTTP/뷰 계층이 사용하는 읽기 전용 작업을 제공합니다:
//!
//! - `movers`: 자산 목록의 직전 대비 등락률 (내림차순)
//! - `price_series`: 단일 심볼 가격 시계열 (실패 시 빈 시계열)
//! - `news`: 다중 소스 병합 헤드라인
//!
//! 가격 다운로드만 TTL 캐시를 거칩니다. 뉴스는 호출마다 새로 수집합니다.
//! 어떤 작업도 업스트림 실패를 호출자에게 전달하지 않습니다.

use crate::cache::{CacheStats, TtlCache};
use crate::error::Result;
use crate::news::{NewsAggregator, SourceFetcher};
use crate::provider::{FeedTransport, HttpFeedTransport, PriceHistoryProvider, YahooPriceProvider};
use futures::future::join_all;
use monitor_core::{
    rank_movers, AssetDirectory, MarketConfig, MonitorConfig, MoverRow, NewsDirectory, NewsItem,
    PriceSeries,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// 가격 캐시 키. 결과에 영향을 주는 모든 파라미터를 포함합니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesKey {
    pub symbol: String,
    pub period: String,
    pub interval: String,
}

impl SeriesKey {
    pub fn new(symbol: &str, period: &str, interval: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            period: period.to_string(),
            interval: interval.to_string(),
        }
    }
}

/// 조회 기간에 맞는 샘플링 간격.
///
/// - "1d" → "1m"
/// - "5d" → "5m"
/// - 그 외 → "1d"
pub fn interval_for_period(period: &str) -> &'static str {
    match period {
        "1d" => "1m",
        "5d" => "5m",
        _ => "1d",
    }
}

/// 마켓 모니터 파사드.
pub struct MarketMonitor {
    prices: Arc<dyn PriceHistoryProvider>,
    cache: TtlCache<SeriesKey, PriceSeries>,
    ttl: Duration,
    aggregator: NewsAggregator,
    assets: AssetDirectory,
    sources: NewsDirectory,
    market: MarketConfig,
    default_news_limit: usize,
}

impl MarketMonitor {
    /// Provider와 설정으로 생성합니다.
    pub fn new(
        prices: Arc<dyn PriceHistoryProvider>,
        transport: Arc<dyn FeedTransport>,
        config: &MonitorConfig,
    ) -> Self {
        let fetcher = SourceFetcher::new(transport)
            .with_timeout(config.news.timeout())
            .with_max_items(config.news.max_per_source);

        Self {
            prices,
            cache: TtlCache::new(),
            ttl: config.cache.ttl(),
            aggregator: NewsAggregator::new(fetcher),
            assets: config.asset_directory(),
            sources: config.news_directory(),
            market: config.market.clone(),
            default_news_limit: config.news.default_limit,
        }
    }

    /// Yahoo Finance와 HTTP 피드 전송으로 생성합니다.
    pub fn from_config(config: &MonitorConfig) -> Result<Self> {
        let prices = Arc::new(YahooPriceProvider::new()?);
        let transport = Arc::new(HttpFeedTransport::new(
            &config.news.user_agent,
            config.news.timeout(),
        )?);

        info!(
            provider = prices.name(),
            assets = config.market.assets.len(),
            sources = config.news.sources.len(),
            ttl_secs = config.cache.ttl_secs,
            "마켓 모니터 초기화"
        );

        Ok(Self::new(prices, transport, config))
    }

    pub fn assets(&self) -> &AssetDirectory {
        &self.assets
    }

    pub fn news_sources(&self) -> &NewsDirectory {
        &self.sources
    }

    /// 캐시를 거쳐 시계열을 내려받습니다. 실패는 캐시하지 않습니다.
    async fn cached_download(
        &self,
        symbol: &str,
        period: &str,
        interval: &str,
    ) -> Result<PriceSeries> {
        let key = SeriesKey::new(symbol, period, interval);
        self.cache
            .get_or_compute(key, self.ttl, || {
                self.prices.download(symbol, period, interval)
            })
            .await
    }

    /// 자산 이름 목록의 등락률을 내림차순으로 반환합니다.
    ///
    /// `labels`가 비어 있으면 전체 디렉토리를 사용합니다. 알 수 없는 이름,
    /// 다운로드 실패, 2행 미만 시계열은 결과에서 조용히 빠집니다.
    #[instrument(skip(self, labels), fields(requested = labels.len()))]
    pub async fn movers<S: AsRef<str>>(&self, labels: &[S]) -> Vec<MoverRow> {
        let entries = self.assets.resolve_all(labels);
        let period = self.market.movers_period.as_str();
        let interval = self.market.movers_interval.as_str();

        let downloads = entries.iter().map(|entry| async move {
            let result = self.cached_download(&entry.symbol, period, interval).await;
            (*entry, result)
        });

        let mut rows = Vec::with_capacity(entries.len());
        for (entry, result) in join_all(downloads).await {
            match result {
                Ok(series) => match MoverRow::from_series(&entry.label, &series) {
                    Some(row) => rows.push(row),
                    None => debug!(
                        asset = %entry.label,
                        symbol = %entry.symbol,
                        rows = series.len(),
                        "데이터 부족, 제외"
                    ),
                },
                Err(e) => warn!(
                    asset = %entry.label,
                    symbol = %entry.symbol,
                    error = %e,
                    "가격 조회 실패, 제외"
                ),
            }
        }

        rank_movers(&mut rows);
        debug!(resolved = entries.len(), returned = rows.len(), "movers 계산 완료");
        rows
    }

    /// 단일 심볼의 가격 시계열.
    ///
    /// `period`가 없으면 설정의 기본 기간을 사용하고, 간격은 기간에서 유도합니다.
    /// 업스트림 데이터가 없으면 빈 시계열을 반환합니다.
    #[instrument(skip(self))]
    pub async fn price_series(&self, symbol: &str, period: Option<&str>) -> PriceSeries {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return PriceSeries::empty(symbol);
        }

        let period = period
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(self.market.default_period.as_str());
        let interval = interval_for_period(period);
        let asset = self.assets.label_for(symbol).unwrap_or("-");

        match self.cached_download(symbol, period, interval).await {
            Ok(series) => {
                debug!(asset, rows = series.len(), "가격 시계열 조회 완료");
                series
            }
            Err(e) => {
                warn!(asset, error = %e, "가격 시계열 조회 실패, 빈 시계열 반환");
                PriceSeries::empty(symbol)
            }
        }
    }

    /// 뉴스 헤드라인.
    ///
    /// - `limit`: 없으면 설정 기본값
    /// - `query`: 제목/요약 부분 문자열 (대소문자 무시)
    /// - `sources`: 소스 이름 목록. 없거나 비어 있으면 전체
    pub async fn news<S: AsRef<str>>(
        &self,
        limit: Option<usize>,
        query: Option<&str>,
        sources: Option<&[S]>,
    ) -> Vec<NewsItem> {
        let selected = self.sources.select(sources);
        let limit = limit.unwrap_or(self.default_news_limit);
        self.aggregator.aggregate(&selected, limit, query).await
    }

    /// 가격 캐시 통계.
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    /// 만료된 가격 캐시 항목 제거.
    pub async fn purge_expired(&self) -> usize {
        self.cache.purge_expired(self.ttl).await
    }
}
