//! 데이터 Provider 모듈.
//!
//! 업스트림을 블랙박스로 다루는 경계 trait와 기본 구현을 정의합니다.
//!
//! ## 가격
//! - `PriceHistoryProvider`: `(symbol, period, interval)` → 시계열
//! - `YahooPriceProvider`: Yahoo Finance 구현
//!
//! ## 뉴스
//! - `FeedTransport`: URL → 원시 피드 문서
//! - `HttpFeedTransport`: reqwest 구현

pub mod feed;
pub mod price;

pub use feed::{FeedTransport, HttpFeedTransport};
pub use price::{bar_from_raw, PriceHistoryProvider, YahooPriceProvider};
