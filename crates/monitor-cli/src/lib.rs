//! 마켓 모니터 명령줄 도구.
//!
//! 조회 파사드를 명령줄에서 실행하고 결과를 JSON으로 출력합니다:
//! - movers: 자산별 직전 대비 등락률
//! - prices: 단일 심볼(또는 자산 이름) 가격 시계열
//! - directory: 설정된 자산/뉴스 소스 목록
//! - news: 다중 소스 헤드라인
//! - watch: 주기적 movers 조회 + 캐시 정리

pub mod commands;
pub mod stats;

pub use commands::{directory_json, movers_json, news_json, prices_json, split_list, to_json, watch};
pub use stats::WatchStats;
