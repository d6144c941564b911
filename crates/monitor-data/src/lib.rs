//! 시세 및 뉴스 데이터 수집.
//!
//! 이 crate는 다음을 제공합니다:
//! - 요청 형태를 키로 하는 TTL 메모이제이션 캐시
//! - 가격 히스토리 / 피드 전송 Provider (Yahoo Finance, HTTP)
//! - 실패를 흡수하는 단일 소스 뉴스 수집기
//! - 동시 수집 + 중복 제거 + 최신순 정렬 뉴스 집계기
//! - movers / 가격 시계열 / 뉴스 조회 파사드

pub mod cache;
pub mod error;
pub mod monitor;
pub mod news;
pub mod provider;

pub use error::{DataError, Result};
pub use monitor::{interval_for_period, MarketMonitor, SeriesKey};

pub use cache::{CacheStats, TtlCache};
pub use news::{NewsAggregator, SourceFetcher};
pub use provider::{FeedTransport, HttpFeedTransport, PriceHistoryProvider, YahooPriceProvider};
