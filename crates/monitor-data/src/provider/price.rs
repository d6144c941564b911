//! 가격 히스토리 Provider.
//!
//! `(symbol, period, interval)`로 OHLCV 시계열을 내려받습니다.
//! 기본 구현은 Yahoo Finance (`yahoo_finance_api`).

use crate::error::{DataError, Result};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use monitor_core::{PriceBar, PriceSeries};
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// 가격 히스토리 Provider trait.
#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    /// Provider 이름.
    fn name(&self) -> &str;

    /// 시계열 다운로드.
    ///
    /// - `period`: 조회 기간 (예: "1d", "5d", "6mo")
    /// - `interval`: 샘플링 간격 (예: "1m", "5m", "1d")
    async fn download(&self, symbol: &str, period: &str, interval: &str) -> Result<PriceSeries>;
}

/// Yahoo Finance Provider.
pub struct YahooPriceProvider {
    connector: yahoo_finance_api::YahooConnector,
}

impl YahooPriceProvider {
    pub fn new() -> Result<Self> {
        let connector = yahoo_finance_api::YahooConnector::new()
            .map_err(|e| DataError::Config(format!("Yahoo Finance 연결 실패: {}", e)))?;
        Ok(Self { connector })
    }
}

#[async_trait]
impl PriceHistoryProvider for YahooPriceProvider {
    fn name(&self) -> &str {
        "yahoo"
    }

    async fn download(&self, symbol: &str, period: &str, interval: &str) -> Result<PriceSeries> {
        debug!(symbol = symbol, interval = interval, range = period, "Yahoo Finance API 호출");

        let response = self
            .connector
            .get_quote_range(symbol, interval, period)
            .await
            .map_err(|e| DataError::Fetch(format!("Yahoo Finance API 오류 ({}): {}", symbol, e)))?;

        let quotes = response
            .quotes()
            .map_err(|e| DataError::Parse(format!("Quote 파싱 오류 ({}): {}", symbol, e)))?;

        let bars: Vec<PriceBar> = quotes
            .iter()
            .filter_map(|q| {
                bar_from_raw(
                    q.timestamp as i64,
                    q.open,
                    q.high,
                    q.low,
                    q.close,
                    q.volume,
                )
            })
            .collect();

        if bars.is_empty() {
            return Err(DataError::NoData(symbol.to_string()));
        }

        // 일봉 날짜는 거래소 현지 기준
        let utc_offset = match response.metadata() {
            Ok(meta) => meta.gmtoffset,
            Err(e) => {
                warn!(symbol = symbol, error = %e, "메타데이터 조회 실패, UTC 기준 사용");
                0
            }
        };

        Ok(PriceSeries::from_bars(symbol, bars).with_utc_offset(utc_offset))
    }
}

/// 원시 값으로 행을 만듭니다.
///
/// 업스트림은 거래가 없던 구간을 NaN으로 채워 보내므로,
/// 유한하지 않은 가격이 하나라도 있으면 행을 버립니다 (보간하지 않음).
pub fn bar_from_raw(
    timestamp: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
) -> Option<PriceBar> {
    let timestamp = Utc.timestamp_opt(timestamp, 0).single()?;
    let price = |v: f64| if v.is_finite() { Decimal::from_f64_retain(v) } else { None };

    Some(PriceBar {
        timestamp,
        open: price(open)?,
        high: price(high)?,
        low: price(low)?,
        close: price(close)?,
        volume,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_bar_from_raw() {
        let bar = bar_from_raw(1_717_372_800, 1.5, 2.0, 1.0, 1.75, 42).unwrap();
        assert_eq!(bar.timestamp.to_rfc3339(), "2024-06-03T00:00:00+00:00");
        assert_eq!(bar.close, dec!(1.75));
        assert_eq!(bar.volume, 42);
    }

    #[test]
    fn test_bar_from_raw_drops_missing_prices() {
        assert!(bar_from_raw(1_717_372_800, f64::NAN, 2.0, 1.0, 1.5, 0).is_none());
        assert!(bar_from_raw(1_717_372_800, 1.0, 2.0, 1.0, f64::INFINITY, 0).is_none());
    }
}
