//! 데이터 모듈 오류 타입.

use thiserror::Error;

/// 데이터 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 데이터 가져오기 오류 (외부 소스)
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// 2xx가 아닌 HTTP 응답
    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// 타임아웃 오류
    #[error("Operation timeout: {0}")]
    Timeout(String),

    /// 파싱 오류
    #[error("Parse error: {0}")]
    Parse(String),

    /// 업스트림이 빈 결과를 반환함
    #[error("No data: {0}")]
    NoData(String),

    /// 설정 오류
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DataError {
    /// 업스트림(네트워크/원격 서버) 원인의 오류인지 여부.
    pub fn is_upstream_failure(&self) -> bool {
        matches!(
            self,
            DataError::Fetch(_) | DataError::HttpStatus { .. } | DataError::Timeout(_)
        )
    }
}

impl From<reqwest::Error> for DataError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DataError::Timeout(err.to_string())
        } else if let Some(status) = err.status() {
            DataError::HttpStatus {
                status: status.as_u16(),
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            }
        } else {
            DataError::Fetch(err.to_string())
        }
    }
}

impl From<monitor_core::MonitorError> for DataError {
    fn from(err: monitor_core::MonitorError) -> Self {
        DataError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
