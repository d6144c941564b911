//! 피드 전송 계층.
//!
//! URL로 원시 피드 문서(RSS/Atom 바이트)를 가져옵니다. 파싱은 하지 않습니다.

use crate::error::{DataError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// 피드 전송 trait.
#[async_trait]
pub trait FeedTransport: Send + Sync {
    /// URL의 문서 본문을 가져옵니다.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// reqwest 기반 HTTP 전송.
#[derive(Debug, Clone)]
pub struct HttpFeedTransport {
    client: Client,
}

impl HttpFeedTransport {
    /// User-Agent와 요청 타임아웃을 지정해 생성합니다.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| DataError::Config(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl FeedTransport for HttpFeedTransport {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        debug!(url = url, bytes = body.len(), "피드 수신");
        Ok(body.to_vec())
    }
}
