//! 명령 구현.
//!
//! 각 명령은 `MarketMonitor` 조회 결과를 JSON 문자열로 돌려줍니다.
//! 출력(stdout)은 `main`에서 담당합니다.

use crate::stats::WatchStats;
use anyhow::Result;
use monitor_core::MoverRow;
use monitor_data::MarketMonitor;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::info;

/// 쉼표로 구분된 목록을 나눕니다. 빈 항목은 버립니다.
pub fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

/// 보기 좋게 정렬된 JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// movers 조회. `watchlist`가 비어 있으면 전체 자산.
pub async fn movers_json(monitor: &MarketMonitor, watchlist: &[String]) -> Result<String> {
    let rows = monitor.movers(watchlist).await;
    to_json(&rows)
}

/// 가격 시계열 조회 (열 단위 payload).
///
/// `target`이 등록된 자산 이름이면 해당 심볼로, 아니면 심볼 그대로 조회합니다.
pub async fn prices_json(
    monitor: &MarketMonitor,
    target: &str,
    period: Option<&str>,
) -> Result<String> {
    let symbol = monitor.assets().resolve(target.trim()).unwrap_or(target);
    let series = monitor.price_series(symbol, period).await;
    to_json(&series.to_payload())
}

#[derive(Serialize)]
struct DirectoryView<'a> {
    assets: Vec<AssetView<'a>>,
    sources: Vec<&'a str>,
}

#[derive(Serialize)]
struct AssetView<'a> {
    label: &'a str,
    symbol: &'a str,
}

/// 설정된 자산 이름/심볼과 뉴스 소스 이름 (등록 순서).
pub fn directory_json(monitor: &MarketMonitor) -> Result<String> {
    let assets = monitor.assets();
    let view = DirectoryView {
        assets: assets
            .labels()
            .filter_map(|label| assets.resolve(label).map(|symbol| AssetView { label, symbol }))
            .collect(),
        sources: monitor.news_sources().names().collect(),
    };
    to_json(&view)
}

/// 뉴스 조회. `sources`가 비어 있으면 전체 소스.
pub async fn news_json(
    monitor: &MarketMonitor,
    limit: Option<usize>,
    query: Option<&str>,
    sources: &[String],
) -> Result<String> {
    let items = monitor.news(limit, query, Some(sources)).await;
    to_json(&items)
}

/// 주기적으로 movers를 조회합니다.
///
/// 매 실행마다 결과를 `on_rows`로 넘기고, 만료된 캐시 항목을 정리한 뒤
/// 캐시 통계를 로그로 남깁니다. `shutdown`이 완료되면 종료합니다.
pub async fn watch<F, S>(
    monitor: &MarketMonitor,
    every: Duration,
    watchlist: &[String],
    shutdown: S,
    mut on_rows: F,
) -> WatchStats
where
    F: FnMut(&[MoverRow]),
    S: Future<Output = ()>,
{
    let started = Instant::now();
    let mut stats = WatchStats::new();

    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    info!("=== watch 시작 (주기: {}초) ===", every.as_secs());

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("종료 신호 수신, watch 종료 중...");
                break;
            }
            _ = interval.tick() => {
                let rows = monitor.movers(watchlist).await;
                on_rows(&rows);

                let purged = monitor.purge_expired().await;
                monitor.cache_stats().await.log_summary("price-series");
                stats.record_tick(rows.len(), purged);
            }
        }
    }

    stats.elapsed = started.elapsed();
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use monitor_core::{AssetEntry, MonitorConfig, NewsSource, PriceBar, PriceSeries};
    use monitor_data::{DataError, FeedTransport, PriceHistoryProvider};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct TwoDayPrices {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PriceHistoryProvider for TwoDayPrices {
        fn name(&self) -> &str {
            "two-day"
        }

        async fn download(
            &self,
            symbol: &str,
            _period: &str,
            _interval: &str,
        ) -> monitor_data::Result<PriceSeries> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let closes: [Decimal; 2] = match symbol {
                "^GSPC" => [dec!(98), dec!(100)],
                "GC=F" => [dec!(2000), dec!(1990)],
                _ => return Err(DataError::NoData(symbol.to_string())),
            };
            let bars = closes
                .iter()
                .enumerate()
                .map(|(i, &close)| PriceBar {
                    timestamp: Utc.with_ymd_and_hms(2024, 6, 3 + i as u32, 0, 0, 0).unwrap(),
                    open: close,
                    high: close,
                    low: close,
                    close,
                    volume: 10,
                })
                .collect();
            Ok(PriceSeries::from_bars(symbol, bars))
        }
    }

    struct NoFeeds;

    #[async_trait]
    impl FeedTransport for NoFeeds {
        async fn fetch(&self, url: &str) -> monitor_data::Result<Vec<u8>> {
            Err(DataError::Fetch(url.to_string()))
        }
    }

    fn monitor(prices: Arc<TwoDayPrices>) -> MarketMonitor {
        let mut config = MonitorConfig::default();
        config.market.assets = vec![
            AssetEntry::new("S&P 500", "^GSPC"),
            AssetEntry::new("Gold", "GC=F"),
        ];
        config.news.sources = vec![NewsSource::new("Down", "stub://down")];
        MarketMonitor::new(prices, Arc::new(NoFeeds), &config)
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(Some(" DAX, Brent ,,WTI ")), vec!["DAX", "Brent", "WTI"]);
        assert!(split_list(Some(" , ")).is_empty());
        assert!(split_list(None).is_empty());
    }

    #[tokio::test]
    async fn test_movers_json_shape() {
        let monitor = monitor(Arc::new(TwoDayPrices::default()));
        let json = movers_json(&monitor, &[]).await.unwrap();
        let rows: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(rows.as_array().unwrap().len(), 2);
        assert_eq!(rows[0]["asset"], "S&P 500");
        assert_eq!(rows[0]["symbol"], "^GSPC");
        assert_eq!(rows[0]["prev_close"], 98.0);
        assert_eq!(rows[0]["last_close"], 100.0);
        assert_eq!(rows[0]["as_of"], "2024-06-04");
        assert_eq!(rows[1]["asset"], "Gold");
    }

    #[tokio::test]
    async fn test_prices_and_news_degrade_to_empty() {
        let monitor = monitor(Arc::new(TwoDayPrices::default()));

        let json = prices_json(&monitor, "UNKNOWN", Some("1d")).await.unwrap();
        let payload: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(payload["symbol"], "UNKNOWN");
        assert!(payload["close"].as_array().unwrap().is_empty());

        let json = news_json(&monitor, Some(5), None, &[]).await.unwrap();
        assert_eq!(json.trim(), "[]");
    }

    #[tokio::test]
    async fn test_prices_accepts_asset_label() {
        let monitor = monitor(Arc::new(TwoDayPrices::default()));

        let json = prices_json(&monitor, "Gold", None).await.unwrap();
        let payload: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(payload["symbol"], "GC=F");
        assert_eq!(payload["close"], serde_json::json!([2000.0, 1990.0]));

        let json = prices_json(&monitor, "^GSPC", None).await.unwrap();
        let payload: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(payload["symbol"], "^GSPC");
    }

    #[test]
    fn test_directory_json_lists_configured_entries() {
        let monitor = monitor(Arc::new(TwoDayPrices::default()));
        let json: serde_json::Value =
            serde_json::from_str(&directory_json(&monitor).unwrap()).unwrap();

        assert_eq!(json["assets"][0]["label"], "S&P 500");
        assert_eq!(json["assets"][0]["symbol"], "^GSPC");
        assert_eq!(json["assets"][1]["label"], "Gold");
        assert_eq!(json["sources"], serde_json::json!(["Down"]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_runs_until_shutdown() {
        let prices = Arc::new(TwoDayPrices::default());
        let monitor = monitor(prices.clone());
        let mut seen = Vec::new();

        let stats = watch(
            &monitor,
            Duration::from_secs(60),
            &[],
            tokio::time::sleep(Duration::from_secs(150)),
            |rows| seen.push(rows.len()),
        )
        .await;

        // t = 0, 60, 120
        assert_eq!(stats.ticks, 3);
        assert_eq!(seen, vec![2, 2, 2]);
        assert_eq!(stats.last_rows, 2);
        // TTL(300초) 안에서는 심볼당 한 번만 다운로드
        assert_eq!(prices.calls.load(Ordering::SeqCst), 2);
    }
}
