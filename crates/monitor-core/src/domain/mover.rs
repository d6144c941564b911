//! 등락률(movers) 타입.

use crate::domain::price::PriceSeries;
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 자산 하나의 직전 대비 등락률.
///
/// # 필드
///
/// - `asset_label`: 사람이 읽는 자산 이름 (예: "S&P 500")
/// - `symbol`: 업스트림 심볼 (예: "^GSPC")
/// - `prev_close` / `last_close`: 마지막 두 행의 종가
/// - `pct_change`: `(last_close / prev_close - 1) * 100`
/// - `as_of`: 마지막 행의 날짜
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoverRow {
    #[serde(rename = "asset")]
    pub asset_label: String,
    pub symbol: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub prev_close: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub last_close: Decimal,
    pub pct_change: f64,
    pub as_of: NaiveDate,
}

impl MoverRow {
    /// 시계열의 마지막 두 행으로 등락률 행을 만듭니다.
    ///
    /// 행이 2개 미만이거나 직전 종가가 0이면 `None`.
    /// `as_of`는 시계열의 거래소 현지 날짜입니다.
    pub fn from_series(asset_label: &str, series: &PriceSeries) -> Option<Self> {
        let (prev, last) = series.last_two()?;
        let pct_change = calculate_change_pct(last.close, prev.close)?;

        Some(Self {
            asset_label: asset_label.to_string(),
            symbol: series.symbol().to_string(),
            prev_close: prev.close,
            last_close: last.close,
            pct_change,
            as_of: series.local_date(last.timestamp),
        })
    }
}

/// 변동률 계산 (%). 직전 값이 0이면 정의되지 않으므로 `None`.
pub fn calculate_change_pct(current: Decimal, previous: Decimal) -> Option<f64> {
    if previous.is_zero() {
        return None;
    }

    let ratio = current.checked_div(previous)?;
    let pct = (ratio - Decimal::ONE) * Decimal::ONE_HUNDRED;
    pct.to_f64()
}

/// 등락률 내림차순 정렬. 같은 값은 입력 순서를 유지합니다.
pub fn rank_movers(rows: &mut [MoverRow]) {
    rows.sort_by(|a, b| b.pct_change.total_cmp(&a.pct_change));
}
