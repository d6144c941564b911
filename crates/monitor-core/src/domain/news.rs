//! 뉴스 헤드라인 타입.
//!
//! - `NewsSource` - 이름과 URL로 식별되는 뉴스 피드
//! - `NewsItem` - 정규화된 헤드라인 한 건
//! - `ContentHash` - 식별/중복 제거용 내용 해시

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;

/// 제목이 없는 항목에 사용하는 대체 문자열.
pub const UNTITLED: &str = "(no title)";

/// 필드 사이에 넣는 구분 바이트 (ASCII unit separator).
const FIELD_SEPARATOR: u8 = 0x1f;

/// 선택된 텍스트 필드의 64비트 내용 해시.
///
/// SHA-256 다이제스트의 앞 8바이트를 사용합니다. 보안 용도가 아니라
/// 항목 ID와 교차 소스 중복 제거 키로만 쓰입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash(u64);

impl ContentHash {
    /// 필드 목록의 해시를 계산합니다.
    pub fn of(parts: &[&str]) -> Self {
        let mut hasher = Sha256::new();
        for (i, part) in parts.iter().enumerate() {
            if i > 0 {
                hasher.update([FIELD_SEPARATOR]);
            }
            hasher.update(part.as_bytes());
        }
        let digest = hasher.finalize();

        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        Self(u64::from_be_bytes(head))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// 16자리 소문자 hex 문자열.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0.to_be_bytes())
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for ContentHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ContentHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        u64::from_str_radix(&raw, 16)
            .map(ContentHash)
            .map_err(serde::de::Error::custom)
    }
}

/// 뉴스 피드 소스.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NewsSource {
    /// 표시 이름 (예: "Reuters Markets")
    pub name: String,
    /// 피드 문서 URL
    pub url: String,
}

impl NewsSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// 정규화된 뉴스 헤드라인.
///
/// 집계 호출마다 생성되며 저장되지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    /// (source, title, link) 해시
    pub id: ContentHash,
    /// 소스 이름
    pub source: String,
    /// 제목 (공백 제거, 없으면 `UNTITLED`)
    pub title: String,
    /// 기사 링크
    pub link: String,
    /// 요약 (공백 제거)
    pub summary: String,
    /// 피드에 표시된 발행 시각 문자열
    #[serde(rename = "published")]
    pub published_text: String,
    /// 최신순 정렬에 쓰는 발행 시각
    #[serde(rename = "ts", with = "chrono::serde::ts_seconds")]
    pub published_at: DateTime<Utc>,
}

impl NewsItem {
    /// 원시 필드로부터 항목을 생성합니다.
    ///
    /// 제목과 요약은 앞뒤 공백을 제거하며, 비어 있는 제목은 `UNTITLED`로 대체합니다.
    pub fn new(
        source: &str,
        title: Option<&str>,
        link: &str,
        summary: &str,
        published_text: impl Into<String>,
        published_at: DateTime<Utc>,
    ) -> Self {
        let title = match title.map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => UNTITLED.to_string(),
        };
        let link = link.trim().to_string();

        Self {
            id: ContentHash::of(&[source, &title, &link]),
            source: source.to_string(),
            title,
            link,
            summary: summary.trim().to_string(),
            published_text: published_text.into(),
            published_at,
        }
    }

    /// 소스와 무관한 중복 제거 키 (title, link).
    pub fn dedup_key(&self) -> ContentHash {
        ContentHash::of(&[&self.title, &self.link])
    }

    /// 제목이나 요약에 `needle`이 포함되는지 확인합니다.
    ///
    /// `needle`은 이미 소문자로 변환된 값이어야 합니다.
    pub fn mentions(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.summary.to_lowercase().contains(needle)
    }
}
