//! 단일 뉴스 소스 수집기.
//!
//! 소스 하나를 호출해 정규화된 `NewsItem` 목록을 반환합니다.
//! 네트워크 오류, 타임아웃, 파싱 실패는 모두 여기서 흡수되어 빈 목록이 됩니다.

use crate::error::{DataError, Result};
use crate::provider::FeedTransport;
use chrono::{DateTime, Utc};
use monitor_core::{NewsItem, NewsSource};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// 소스당 기본 요청 타임아웃.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// 소스당 기본 최대 항목 수.
pub const DEFAULT_MAX_PER_SOURCE: usize = 30;

/// 뉴스 소스 수집기.
#[derive(Clone)]
pub struct SourceFetcher {
    transport: Arc<dyn FeedTransport>,
    timeout: Duration,
    max_items: usize,
}

impl SourceFetcher {
    pub fn new(transport: Arc<dyn FeedTransport>) -> Self {
        Self {
            transport,
            timeout: DEFAULT_FETCH_TIMEOUT,
            max_items: DEFAULT_MAX_PER_SOURCE,
        }
    }

    /// 요청 타임아웃 설정.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// 소스당 최대 항목 수 설정.
    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    /// 소스 하나를 수집합니다. 실패하지 않습니다.
    ///
    /// 실패 시 경고 로그를 남기고 빈 목록을 반환합니다.
    #[instrument(skip(self, source), fields(source = %source.name))]
    pub async fn fetch(&self, source: &NewsSource) -> Vec<NewsItem> {
        match self.try_fetch(source).await {
            Ok(items) => {
                debug!(count = items.len(), "뉴스 소스 수집 완료");
                items
            }
            Err(e) => {
                warn!(url = %source.url, error = %e, "뉴스 소스 수집 실패, 건너뜀");
                Vec::new()
            }
        }
    }

    async fn try_fetch(&self, source: &NewsSource) -> Result<Vec<NewsItem>> {
        let body = tokio::time::timeout(self.timeout, self.transport.fetch(&source.url))
            .await
            .map_err(|_| DataError::Timeout(format!("{} ({:?})", source.url, self.timeout)))??;

        parse_feed(source, &body, self.max_items, Utc::now())
    }
}

/// 피드 문서를 파싱해 최대 `max_items`개의 항목으로 정규화합니다.
///
/// - 제목이 없으면 `"(no title)"`
/// - 요약이 없으면 본문(content), 그것도 없으면 빈 문자열
/// - 발행 시각이 없으면 수정 시각, 그것도 없으면 `now`
pub fn parse_feed(
    source: &NewsSource,
    body: &[u8],
    max_items: usize,
    now: DateTime<Utc>,
) -> Result<Vec<NewsItem>> {
    let feed = feed_rs::parser::parse(body)
        .map_err(|e| DataError::Parse(format!("{}: {}", source.name, e)))?;

    let items = feed
        .entries
        .into_iter()
        .take(max_items)
        .map(|entry| {
            let title = entry.title.as_ref().map(|t| t.content.as_str());
            let link = entry.links.first().map(|l| l.href.as_str()).unwrap_or("");
            let summary = entry
                .summary
                .as_ref()
                .map(|t| t.content.as_str())
                .or_else(|| entry.content.as_ref().and_then(|c| c.body.as_deref()))
                .unwrap_or("");

            let stamp = entry.published.or(entry.updated);
            let published_text = stamp.map(|t| t.to_rfc2822()).unwrap_or_default();

            NewsItem::new(
                &source.name,
                title,
                link,
                summary,
                published_text,
                stamp.unwrap_or(now),
            )
        })
        .collect();

    Ok(items)
}
