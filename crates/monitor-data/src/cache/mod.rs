//! 캐시 모듈.
//!
//! 프로세스 메모리에만 존재하며 재시작 시 비워집니다.

pub mod ttl;

pub use ttl::{CacheStats, TtlCache};
