//! 마켓 모니터 공통 에러 타입.

use thiserror::Error;

/// 핵심 모듈 에러.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 로깅 초기화 에러
    #[error("로깅 초기화 에러: {0}")]
    Logging(String),
}

/// 핵심 모듈 작업을 위한 Result 타입.
pub type MonitorResult<T> = Result<T, MonitorError>;

impl From<config::ConfigError> for MonitorError {
    fn from(err: config::ConfigError) -> Self {
        MonitorError::Config(err.to_string())
    }
}
