//! watch 실행 통계.

use serde::Serialize;
use std::time::Duration;

/// watch 루프 누적 통계
#[derive(Debug, Clone, Default, Serialize)]
pub struct WatchStats {
    /// 실행 횟수
    pub ticks: usize,
    /// 마지막 실행의 movers 행 수
    pub last_rows: usize,
    /// 결과가 비어 있던 실행 횟수
    pub empty_ticks: usize,
    /// 제거한 만료 캐시 항목 수 (누적)
    pub purged: usize,
    /// 소요 시간
    #[serde(skip)]
    pub elapsed: Duration,
}

impl WatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// 한 번의 실행 결과 기록
    pub fn record_tick(&mut self, rows: usize, purged: usize) {
        self.ticks += 1;
        self.last_rows = rows;
        self.purged += purged;
        if rows == 0 {
            self.empty_ticks += 1;
        }
    }

    /// 통계 요약 로그 출력
    pub fn log_summary(&self, operation: &str) {
        tracing::info!(
            operation = operation,
            ticks = self.ticks,
            last_rows = self.last_rows,
            empty_ticks = self.empty_ticks,
            purged = self.purged,
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "watch 종료"
        );
    }
}
