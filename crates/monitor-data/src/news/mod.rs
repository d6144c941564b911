//! 뉴스 수집 및 집계.
//!
//! - `SourceFetcher`: 소스 하나 수집 (실패 시 빈 목록)
//! - `NewsAggregator`: 여러 소스 동시 수집 → 병합 → 중복 제거 → 필터 → 정렬 → 절단

pub mod aggregator;
pub mod fetcher;

pub use aggregator::{
    dedup_by_content, filter_by_query, merge_batches, rank_by_recency, NewsAggregator,
};
pub use fetcher::{parse_feed, SourceFetcher, DEFAULT_FETCH_TIMEOUT, DEFAULT_MAX_PER_SOURCE};
