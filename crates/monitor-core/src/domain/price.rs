//! 가격 시계열 타입.
//!
//! - `PriceBar` - OHLCV 한 행
//! - `PriceSeries` - 시간 오름차순으로 정렬된 행 목록
//! - `PriceSeriesPayload` - 차트용 열 단위 직렬화 형식

use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 출력 시 가격 필드의 소수점 자리수.
pub const PRICE_DECIMALS: u32 = 6;

/// OHLCV 한 행.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// 행 시작 시각
    pub timestamp: DateTime<Utc>,
    /// 시가
    pub open: Decimal,
    /// 고가
    pub high: Decimal,
    /// 저가
    pub low: Decimal,
    /// 종가
    pub close: Decimal,
    /// 거래량
    pub volume: u64,
}

/// 한 심볼의 가격 시계열.
///
/// 행은 항상 timestamp 기준 순증가입니다. 누락 구간은 채우지 않습니다.
/// `utc_offset_secs`는 거래소 현지 시각의 UTC 오프셋으로, 날짜 계산에만 쓰입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<PriceBar>,
    #[serde(default)]
    utc_offset_secs: i32,
}

impl PriceSeries {
    /// 빈 시계열.
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            bars: Vec::new(),
            utc_offset_secs: 0,
        }
    }

    /// 임의 순서의 행으로 시계열을 만듭니다.
    ///
    /// 시간순으로 정렬하고, 같은 timestamp가 반복되면 먼저 나온 행만 남깁니다.
    pub fn from_bars(symbol: impl Into<String>, mut bars: Vec<PriceBar>) -> Self {
        bars.sort_by_key(|b| b.timestamp);
        bars.dedup_by_key(|b| b.timestamp);
        Self {
            symbol: symbol.into(),
            bars,
            utc_offset_secs: 0,
        }
    }

    /// 거래소 UTC 오프셋(초) 지정.
    pub fn with_utc_offset(mut self, secs: i32) -> Self {
        self.utc_offset_secs = secs;
        self
    }

    pub fn utc_offset_secs(&self) -> i32 {
        self.utc_offset_secs
    }

    /// 거래소 현지 기준 날짜. 오프셋이 범위를 벗어나면 UTC 날짜.
    pub fn local_date(&self, timestamp: DateTime<Utc>) -> NaiveDate {
        match FixedOffset::east_opt(self.utc_offset_secs) {
            Some(offset) => timestamp.with_timezone(&offset).date_naive(),
            None => timestamp.date_naive(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// 마지막 두 행 (직전, 최신).
    pub fn last_two(&self) -> Option<(&PriceBar, &PriceBar)> {
        match self.bars.as_slice() {
            [.., prev, last] => Some((prev, last)),
            _ => None,
        }
    }

    /// 열 단위 payload로 변환합니다. 가격은 `PRICE_DECIMALS` 자리로 반올림.
    pub fn to_payload(&self) -> PriceSeriesPayload {
        let n = self.bars.len();
        let mut payload = PriceSeriesPayload {
            symbol: self.symbol.clone(),
            index: Vec::with_capacity(n),
            open: Vec::with_capacity(n),
            high: Vec::with_capacity(n),
            low: Vec::with_capacity(n),
            close: Vec::with_capacity(n),
            volume: Vec::with_capacity(n),
        };

        for bar in &self.bars {
            payload
                .index
                .push(bar.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true));
            payload.open.push(round_price(bar.open));
            payload.high.push(round_price(bar.high));
            payload.low.push(round_price(bar.low));
            payload.close.push(round_price(bar.close));
            payload.volume.push(bar.volume);
        }

        payload
    }
}

/// 차트용 열 단위 시계열.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeriesPayload {
    pub symbol: String,
    pub index: Vec<String>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub volume: Vec<u64>,
}

/// 가격을 `PRICE_DECIMALS` 자리로 반올림해 f64로 변환합니다.
///
/// 문자열을 거쳐 변환하므로 결과는 반올림된 십진수에 가장 가까운 f64입니다.
pub fn round_price(value: Decimal) -> f64 {
    let rounded = value.round_dp(PRICE_DECIMALS);
    rounded
        .to_string()
        .parse::<f64>()
        .unwrap_or_else(|_| rounded.to_f64().unwrap_or(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn bar(day: u32, close: Decimal) -> PriceBar {
        PriceBar {
            timestamp: Utc.with_ymd_and_hms(2024, 5, day, 0, 0, 0).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1_000,
        }
    }

    #[test]
    fn test_from_bars_sorts_and_dedups() {
        let series = PriceSeries::from_bars(
            "^GSPC",
            vec![bar(3, dec!(3)), bar(1, dec!(1)), bar(2, dec!(2)), bar(1, dec!(9))],
        );

        let closes: Vec<Decimal> = series.bars().iter().map(|b| b.close).collect();
        assert_eq!(closes.len(), 3);
        assert_eq!(closes[1], dec!(2));
        assert_eq!(closes[2], dec!(3));
        for w in series.bars().windows(2) {
            assert!(w[0].timestamp < w[1].timestamp);
        }
    }

    #[test]
    fn test_last_two() {
        assert!(PriceSeries::empty("X").last_two().is_none());
        assert!(PriceSeries::from_bars("X", vec![bar(1, dec!(1))]).last_two().is_none());

        let series = PriceSeries::from_bars("X", vec![bar(1, dec!(98)), bar(2, dec!(100))]);
        let (prev, last) = series.last_two().unwrap();
        assert_eq!(prev.close, dec!(98));
        assert_eq!(last.close, dec!(100));
    }

    #[test]
    fn test_payload_rounds_to_six_places() {
        let series = PriceSeries::from_bars("EURUSD=X", vec![bar(2, dec!(1.0845678951))]);
        let payload = series.to_payload();

        assert_eq!(payload.symbol, "EURUSD=X");
        assert_eq!(payload.index, vec!["2024-05-02T00:00:00Z".to_string()]);
        assert_eq!(payload.close, vec![1.084568]);
        assert_eq!(payload.volume, vec![1_000]);
    }

    #[test]
    fn test_local_date_applies_exchange_offset() {
        // 런던(BST) 자정 = 전날 23:00 UTC
        let stamp = Utc.with_ymd_and_hms(2024, 6, 3, 23, 0, 0).unwrap();
        let series = PriceSeries::empty("EURUSD=X");
        assert_eq!(series.local_date(stamp), NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());

        let london = series.clone().with_utc_offset(3600);
        assert_eq!(london.utc_offset_secs(), 3600);
        assert_eq!(london.local_date(stamp), NaiveDate::from_ymd_opt(2024, 6, 4).unwrap());

        // 뉴욕(EDT) 16:00 = 20:00 UTC, 같은 날
        let close = Utc.with_ymd_and_hms(2024, 6, 3, 20, 0, 0).unwrap();
        let new_york = series.clone().with_utc_offset(-14_400);
        assert_eq!(new_york.local_date(close), NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());

        let bogus = series.with_utc_offset(i32::MAX);
        assert_eq!(bogus.local_date(stamp), NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
    }

    #[test]
    fn test_empty_payload_has_empty_arrays() {
        let payload = PriceSeries::empty("BZ=F").to_payload();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["symbol"], "BZ=F");
        assert_eq!(json["index"].as_array().unwrap().len(), 0);
        assert_eq!(json["volume"].as_array().unwrap().len(), 0);
    }
}
