//! tracing 구독자 초기화.
//!
//! 모든 로그는 stderr로 나갑니다. stdout은 명령 결과(JSON) 전용입니다.
//! 필터는 `RUST_LOG` → 설정 파일 `[logging].level` 순으로 결정됩니다.

use crate::config::LoggingConfig;
use crate::error::{MonitorError, MonitorResult};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

/// fmt 레이어 출력 형식. 설정의 `logging.format`, 환경 변수 `LOG_FORMAT` 값과 대응합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 여러 줄, 색상 (로컬 실행)
    #[default]
    Pretty,
    /// 줄 단위 JSON (수집기 연동)
    Json,
    /// 한 줄 요약 (watch 장시간 실행)
    Compact,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pretty => "pretty",
            Self::Json => "json",
            Self::Compact => "compact",
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = MonitorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Pretty, Self::Json, Self::Compact]
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| MonitorError::InvalidInput(format!("알 수 없는 로그 형식: {}", s)))
    }
}

/// 로깅 초기화 옵션.
///
/// `filter`는 `EnvFilter` 지시문 (예: `"info"`, `"monitor_data=debug"`).
/// `RUST_LOG`가 있으면 초기화 시점에 그쪽이 우선합니다.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub filter: String,
    pub format: LogFormat,
    /// span 생성/종료 이벤트 출력
    pub span_events: bool,
    /// 파일명:줄 번호 출력
    pub source_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new("info")
    }
}

impl LogConfig {
    pub fn new(filter: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
            format: LogFormat::default(),
            span_events: false,
            source_location: false,
        }
    }

    pub fn with_format(self, format: LogFormat) -> Self {
        Self { format, ..self }
    }

    pub fn with_span_events(self, span_events: bool) -> Self {
        Self { span_events, ..self }
    }

    pub fn with_source_location(self, source_location: bool) -> Self {
        Self {
            source_location,
            ..self
        }
    }

    /// `RUST_LOG` / `LOG_FORMAT` 환경 변수로 구성. 값이 없거나 잘못되면 기본값.
    pub fn from_env() -> Self {
        let format = std::env::var("LOG_FORMAT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();

        match std::env::var("RUST_LOG") {
            Ok(filter) => Self::new(filter).with_format(format),
            Err(_) => Self::default().with_format(format),
        }
    }
}

impl From<&LoggingConfig> for LogConfig {
    /// 설정 파일 `[logging]` 섹션. 알 수 없는 형식은 pretty.
    fn from(section: &LoggingConfig) -> Self {
        let format = section.format.parse().unwrap_or_default();
        Self::new(section.level.as_str()).with_format(format)
    }
}

/// 주어진 설정으로 로깅 시스템을 초기화합니다.
///
/// 로그는 stderr로 출력합니다 (stdout은 명령 결과용).
/// `RUST_LOG`가 설정되어 있으면 설정 파일의 레벨보다 우선합니다.
///
/// # 예제
///
/// ```no_run
/// use monitor_core::logging::{init_logging, LogConfig, LogFormat};
///
/// let config = LogConfig::new("debug").with_format(LogFormat::Json);
/// init_logging(config).unwrap();
/// ```
pub fn init_logging(config: LogConfig) -> MonitorResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .map_err(|e| MonitorError::Logging(e.to_string()))?;

    tracing_subscriber::registry()
        .with(fmt_layer(&config))
        .with(env_filter)
        .try_init()
        .map_err(|e| MonitorError::Logging(e.to_string()))?;

    tracing::debug!(format = config.format.as_str(), filter = %config.filter, "로깅 초기화");

    Ok(())
}

/// 형식별 fmt 레이어. 모든 형식이 stderr로 출력합니다.
fn fmt_layer(config: &LogConfig) -> Box<dyn Layer<Registry> + Send + Sync> {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_file(config.source_location)
        .with_line_number(config.source_location)
        .with_span_events(if config.span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        });

    match config.format {
        LogFormat::Pretty => layer.pretty().boxed(),
        LogFormat::Json => layer.json().boxed(),
        LogFormat::Compact => layer.compact().boxed(),
    }
}

/// 환경 변수에서 로깅을 초기화합니다.
pub fn init_logging_from_env() -> MonitorResult<()> {
    init_logging(LogConfig::from_env())
}
