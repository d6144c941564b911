//! # Monitor Core
//!
//! 마켓 모니터의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 시스템 전반에서 사용되는 기본 타입을 제공합니다:
//! - 가격 시계열 및 등락률(movers) 타입
//! - 뉴스 헤드라인 및 내용 해시
//! - 자산/뉴스 소스 정적 디렉토리
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod directory;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::*;
pub use directory::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
