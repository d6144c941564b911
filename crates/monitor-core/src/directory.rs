//! 정적 디렉토리.
//!
//! - `AssetDirectory`: 사람이 읽는 자산 이름 → 업스트림 심볼 (Yahoo Finance)
//! - `NewsDirectory`: 뉴스 소스 이름 → 피드 URL
//!
//! 둘 다 설정 데이터이며, 입력 순서를 그대로 유지합니다.

use crate::domain::NewsSource;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 자산 이름과 심볼 한 쌍.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetEntry {
    pub label: String,
    pub symbol: String,
}

impl AssetEntry {
    pub fn new(label: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            symbol: symbol.into(),
        }
    }
}

/// 기본 추적 자산 목록.
pub fn default_assets() -> Vec<AssetEntry> {
    [
        ("S&P 500", "^GSPC"),
        ("Nasdaq 100", "^NDX"),
        ("DAX", "^GDAXI"),
        ("WIG20", "^WIG20"),
        ("EURUSD", "EURUSD=X"),
        ("USDJPY", "JPY=X"),
        ("Brent", "BZ=F"),
        ("WTI", "CL=F"),
        ("Gold", "GC=F"),
        ("BTC-USD", "BTC-USD"),
        ("ETH-USD", "ETH-USD"),
    ]
    .into_iter()
    .map(|(label, symbol)| AssetEntry::new(label, symbol))
    .collect()
}

/// 기본 뉴스 소스 목록.
pub fn default_news_sources() -> Vec<NewsSource> {
    [
        ("Reuters Markets", "https://feeds.reuters.com/reuters/marketsNews"),
        ("Reuters Business", "https://feeds.reuters.com/reuters/businessNews"),
        ("Reuters World", "https://feeds.reuters.com/Reuters/worldNews"),
        ("Yahoo Finance", "https://finance.yahoo.com/news/rssindex"),
        ("MarketWatch", "https://www.marketwatch.com/feeds/topstories"),
        ("Federal Reserve", "https://www.federalreserve.gov/feeds/press_all.xml"),
        (
            "ECB Press",
            "https://www.ecb.europa.eu/press/pressconf/2024/html/index.en.rss.xml",
        ),
        ("Bank of England", "https://www.bankofengland.co.uk/news/news.xml"),
    ]
    .into_iter()
    .map(|(name, url)| NewsSource::new(name, url))
    .collect()
}

/// 자산 이름 → 심볼 디렉토리.
#[derive(Debug, Clone, Default)]
pub struct AssetDirectory {
    entries: Vec<AssetEntry>,
}

impl AssetDirectory {
    pub fn new(entries: Vec<AssetEntry>) -> Self {
        Self { entries }
    }

    /// 이름으로 심볼 조회.
    pub fn resolve(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.symbol.as_str())
    }

    /// 심볼로 이름 역조회.
    pub fn label_for(&self, symbol: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.symbol == symbol)
            .map(|e| e.label.as_str())
    }

    /// 등록 순서대로 모든 이름.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.label.as_str())
    }

    /// 요청된 이름들을 (이름, 심볼) 쌍으로 변환합니다.
    ///
    /// 알 수 없는 이름은 조용히 제외하고, 중복 이름은 첫 번째만 남깁니다.
    /// `labels`가 비어 있으면 전체 디렉토리를 반환합니다.
    pub fn resolve_all<S: AsRef<str>>(&self, labels: &[S]) -> Vec<&AssetEntry> {
        if labels.is_empty() {
            return self.entries.iter().collect();
        }

        let mut seen = HashSet::new();
        labels
            .iter()
            .map(|l| l.as_ref().trim())
            .filter(|l| seen.insert(*l))
            .filter_map(|l| self.entries.iter().find(|e| e.label == l))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 뉴스 소스 이름 → URL 디렉토리.
#[derive(Debug, Clone, Default)]
pub struct NewsDirectory {
    sources: Vec<NewsSource>,
}

impl NewsDirectory {
    pub fn new(sources: Vec<NewsSource>) -> Self {
        Self { sources }
    }

    /// 등록 순서대로 모든 소스 이름.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|s| s.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&NewsSource> {
        self.sources.iter().find(|s| s.name == name)
    }

    /// 이름 목록에 해당하는 소스를 디렉토리 순서대로 선택합니다.
    ///
    /// `None`이거나 빈 목록이면 전체, 알 수 없는 이름은 무시합니다.
    pub fn select<S: AsRef<str>>(&self, names: Option<&[S]>) -> Vec<NewsSource> {
        match names {
            Some(names) if !names.is_empty() => {
                let wanted: HashSet<&str> = names.iter().map(|n| n.as_ref().trim()).collect();
                self.sources
                    .iter()
                    .filter(|s| wanted.contains(s.name.as_str()))
                    .cloned()
                    .collect()
            }
            _ => self.sources.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directories() {
        let assets = AssetDirectory::new(default_assets());
        assert_eq!(assets.len(), 11);
        assert_eq!(assets.resolve("S&P 500"), Some("^GSPC"));
        assert_eq!(assets.label_for("GC=F"), Some("Gold"));
        assert_eq!(assets.resolve("Nikkei"), None);

        let news = NewsDirectory::new(default_news_sources());
        assert_eq!(news.len(), 8);
        assert_eq!(news.names().next(), Some("Reuters Markets"));
    }

    #[test]
    fn test_resolve_all_skips_unknown_and_duplicates() {
        let assets = AssetDirectory::new(default_assets());
        let resolved = assets.resolve_all(&["DAX", "Nikkei", "Brent", "DAX"]);
        let symbols: Vec<&str> = resolved.iter().map(|e| e.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["^GDAXI", "BZ=F"]);
    }

    #[test]
    fn test_resolve_all_empty_means_everything() {
        let assets = AssetDirectory::new(default_assets());
        let empty: [&str; 0] = [];
        assert_eq!(assets.resolve_all(&empty).len(), 11);

        let labels: Vec<&str> = assets.labels().collect();
        assert_eq!(labels.first(), Some(&"S&P 500"));
    }

    #[test]
    fn test_select_news_sources() {
        let news = NewsDirectory::new(default_news_sources());

        let all = news.select::<&str>(None);
        assert_eq!(all.len(), 8);

        // 디렉토리 순서 유지, 알 수 없는 이름 무시
        let picked = news.select(Some(&["ECB Press", "Nope", "Reuters World"][..]));
        let names: Vec<&str> = picked.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Reuters World", "ECB Press"]);

        assert!(news.select(Some(&["Nope"][..])).is_empty());
        assert_eq!(news.get("MarketWatch").map(|s| s.url.as_str()), Some("https://www.marketwatch.com/feeds/topstories"));
    }
}
