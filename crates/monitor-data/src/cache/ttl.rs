//! TTL 기반 메모이제이션 캐시.
//!
//! 비싼 업스트림 조회 결과를 요청 형태(심볼, 기간, 간격 등)를 키로 저장합니다.
//!
//! # 동작
//!
//! - 만료 여부는 읽을 때 판단합니다 (백그라운드 정리 작업 없음).
//! - 만료된 항목은 다음 같은 키 호출에서 덮어씁니다.
//! - `compute` 실패는 저장하지 않으므로 다음 호출에서 즉시 재시도됩니다.
//! - 키 단위 상호 배제가 없습니다. 같은 만료 키를 동시에 조회하면
//!   `compute`가 여러 번 실행될 수 있고, 마지막 결과가 남습니다.
//!
//! 시간 측정에 `tokio::time::Instant`를 사용하므로 테스트에서
//! `tokio::time::pause`/`advance`로 만료를 제어할 수 있습니다.

use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info};

/// 저장된 값과 저장 시각.
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_live(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) < ttl
    }
}

/// Cache 통계.
#[derive(Debug, Default, Clone, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// 현재 저장된 항목 수 (만료 항목 포함)
    pub entries: usize,
    pub hit_rate: f64,
}

impl CacheStats {
    /// 통계 요약 로그 출력.
    pub fn log_summary(&self, name: &str) {
        info!(
            cache = name,
            hits = self.hits,
            misses = self.misses,
            entries = self.entries,
            hit_rate = %format!("{:.1}%", self.hit_rate * 100.0),
            "캐시 통계"
        );
    }
}

/// TTL 캐시.
///
/// TTL은 호출마다 지정합니다. 같은 키라도 더 짧은 TTL로 조회하면
/// 더 일찍 만료된 것으로 봅니다.
pub struct TtlCache<K, V> {
    entries: RwLock<HashMap<K, CacheEntry<V>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<K, V> Default for TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// 유효한 항목이 있으면 복사본을 반환합니다.
    pub async fn get(&self, key: &K, ttl: Duration) -> Option<V> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        let value = entries
            .get(key)
            .filter(|e| e.is_live(ttl, now))
            .map(|e| e.value.clone());

        if value.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        value
    }

    /// 현재 시각으로 값을 저장합니다. 기존 항목은 덮어씁니다.
    pub async fn insert(&self, key: K, value: V) {
        let entry = CacheEntry {
            value,
            stored_at: Instant::now(),
        };
        self.entries.write().await.insert(key, entry);
    }

    /// 유효한 항목이 있으면 반환하고, 없으면 `compute`를 실행해 저장 후 반환합니다.
    ///
    /// `compute` 실행 중에는 락을 잡지 않습니다. 실패는 저장되지 않고
    /// 그대로 호출자에게 전달됩니다.
    pub async fn get_or_compute<F, Fut, E>(&self, key: K, ttl: Duration, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key, ttl).await {
            debug!("캐시 히트");
            return Ok(value);
        }

        debug!("캐시 미스, 재계산");
        let value = compute().await?;
        self.insert(key, value.clone()).await;
        Ok(value)
    }

    /// `ttl` 기준으로 만료된 항목을 제거하고 제거한 개수를 반환합니다.
    pub async fn purge_expired(&self, ttl: Duration) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, e| e.is_live(ttl, now));
        let removed = before - entries.len();

        if removed > 0 {
            debug!(removed, remaining = entries.len(), "만료된 캐시 항목 제거");
        }
        removed
    }

    /// 저장된 항목 수 (만료 항목 포함).
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Cache 통계를 가져옵니다.
    pub async fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };

        CacheStats {
            hits,
            misses,
            entries: self.len().await,
            hit_rate,
        }
    }

    /// 통계를 초기화합니다.
    pub fn reset_stats(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    const TTL: Duration = Duration::from_secs(300);

    async fn counted(calls: &AtomicUsize, value: u32) -> Result<u32, String> {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(value)
    }

    #[tokio::test(start_paused = true)]
    async fn test_compute_once_within_ttl() {
        let cache: TtlCache<&str, u32> = TtlCache::new();
        let calls = AtomicUsize::new(0);

        let a = cache.get_or_compute("k", TTL, || counted(&calls, 1)).await.unwrap();
        tokio::time::advance(Duration::from_secs(299)).await;
        let b = cache.get_or_compute("k", TTL, || counted(&calls, 2)).await.unwrap();

        assert_eq!((a, b), (1, 1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_recompute_after_ttl() {
        let cache: TtlCache<&str, u32> = TtlCache::new();
        let calls = AtomicUsize::new(0);

        cache.get_or_compute("k", TTL, || counted(&calls, 1)).await.unwrap();
        tokio::time::advance(TTL).await;
        let v = cache.get_or_compute("k", TTL, || counted(&calls, 2)).await.unwrap();

        assert_eq!(v, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_distinct_keys_do_not_collide() {
        let cache: TtlCache<(String, String), u32> = TtlCache::new();
        let calls = AtomicUsize::new(0);

        let a = cache
            .get_or_compute(("^GSPC".into(), "5d".into()), TTL, || counted(&calls, 1))
            .await
            .unwrap();
        let b = cache
            .get_or_compute(("^GSPC".into(), "1mo".into()), TTL, || counted(&calls, 2))
            .await
            .unwrap();

        assert_eq!((a, b), (1, 2));
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_are_not_cached() {
        let cache: TtlCache<&str, u32> = TtlCache::new();
        let calls = AtomicUsize::new(0);

        let err = cache
            .get_or_compute("k", TTL, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>("upstream down".to_string())
            })
            .await;
        assert!(err.is_err());
        assert!(cache.is_empty().await);

        let v = cache.get_or_compute("k", TTL, || counted(&calls, 7)).await.unwrap();
        assert_eq!(v, 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired_and_stats() {
        let cache: TtlCache<u8, u8> = TtlCache::new();
        cache.insert(1, 1).await;
        tokio::time::advance(Duration::from_secs(200)).await;
        cache.insert(2, 2).await;
        tokio::time::advance(Duration::from_secs(150)).await;

        assert_eq!(cache.get(&1, TTL).await, None);
        assert_eq!(cache.get(&2, TTL).await, Some(2));

        assert_eq!(cache.purge_expired(TTL).await, 1);
        assert_eq!(cache.len().await, 1);

        let stats = cache.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
        assert!((stats.hit_rate - 0.5).abs() < f64::EPSILON);

        cache.reset_stats();
        assert_eq!(cache.stats().await.hits, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_share_cache() {
        let cache: Arc<TtlCache<&'static str, u32>> = Arc::new(TtlCache::new());
        let calls = Arc::new(AtomicUsize::new(0));

        cache
            .get_or_compute("k", TTL, || counted(&calls, 1))
            .await
            .unwrap();

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                let calls = calls.clone();
                tokio::spawn(async move {
                    cache
                        .get_or_compute("k", TTL, || async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            Ok::<u32, String>(2)
                        })
                        .await
                })
            })
            .collect();

        for result in futures::future::join_all(tasks).await {
            assert_eq!(result.unwrap().unwrap(), 1);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
