//! 다중 소스 뉴스 집계.
//!
//! # 처리 순서
//!
//! 1. 소스별 수집을 동시에 실행하고 모두 끝날 때까지 대기
//! 2. 소스 순서 → 소스 내 업스트림 순서로 평탄화
//! 3. `(title, link)` 해시로 중복 제거 (먼저 나온 항목 유지)
//! 4. 검색어가 있으면 제목/요약에 대소문자 무시 부분 문자열 포함 여부로 필터
//! 5. 발행 시각 내림차순 안정 정렬
//! 6. `limit`개로 자름
//!
//! 결과 내용은 소스 순서와 무관합니다. 다만 발행 시각이 같은 항목끼리의
//! 순서, 그리고 서로 다른 소스가 같은 기사를 보낸 경우 어느 소스의 사본이
//! 남는지는 소스 순서에 따라 달라질 수 있습니다.
//!
//! 호출 간 상태를 갖지 않으므로 동시에 여러 번 호출해도 안전합니다.

use crate::news::fetcher::SourceFetcher;
use futures::future::join_all;
use monitor_core::{NewsItem, NewsSource};
use std::collections::HashSet;
use tracing::{debug, info, instrument};

/// 뉴스 집계기.
#[derive(Clone)]
pub struct NewsAggregator {
    fetcher: SourceFetcher,
}

impl NewsAggregator {
    pub fn new(fetcher: SourceFetcher) -> Self {
        Self { fetcher }
    }

    /// 소스들을 동시에 수집해 병합, 중복 제거, 필터, 정렬, 절단합니다.
    ///
    /// 실패한 소스는 빈 기여로 처리되며 호출 자체는 실패하지 않습니다.
    #[instrument(skip(self, sources), fields(sources = sources.len()))]
    pub async fn aggregate(
        &self,
        sources: &[NewsSource],
        limit: usize,
        query: Option<&str>,
    ) -> Vec<NewsItem> {
        let futures: Vec<_> = sources.iter().map(|s| self.fetcher.fetch(s)).collect();
        let batches = join_all(futures).await;

        let fetched: usize = batches.iter().map(Vec::len).sum();
        let empty_sources = batches.iter().filter(|b| b.is_empty()).count();

        let items = merge_batches(batches);
        let items = dedup_by_content(items);
        let deduped = items.len();
        let mut items = filter_by_query(items, query);
        rank_by_recency(&mut items);
        items.truncate(limit);

        if empty_sources > 0 {
            debug!(empty_sources, "일부 소스가 항목을 반환하지 않음");
        }
        info!(
            fetched,
            deduped,
            returned = items.len(),
            "뉴스 집계 완료"
        );

        items
    }
}

/// 소스별 목록을 입력 순서대로 이어 붙입니다.
pub fn merge_batches(batches: Vec<Vec<NewsItem>>) -> Vec<NewsItem> {
    batches.into_iter().flatten().collect()
}

/// `(title, link)` 해시 기준 중복 제거. 먼저 나온 항목이 남습니다.
pub fn dedup_by_content(items: Vec<NewsItem>) -> Vec<NewsItem> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(item.dedup_key()))
        .collect()
}

/// 검색어 필터.
///
/// 검색어는 앞뒤 공백을 제거하고 소문자로 비교합니다.
/// `None`이거나 공백뿐이면 필터하지 않습니다.
pub fn filter_by_query(items: Vec<NewsItem>, query: Option<&str>) -> Vec<NewsItem> {
    let needle = match query.map(str::trim) {
        Some(q) if !q.is_empty() => q.to_lowercase(),
        _ => return items,
    };

    items
        .into_iter()
        .filter(|item| item.mentions(&needle))
        .collect()
}

/// 발행 시각 내림차순 정렬. 같은 시각은 입력 순서를 유지합니다.
pub fn rank_by_recency(items: &mut [NewsItem]) {
    items.sort_by(|a, b| b.published_at.cmp(&a.published_at));
}
