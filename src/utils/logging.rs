//! tracing 구독자 초기화
//!
//! stdout은 `LOG_FORMAT`(json 기본, `pretty` 지원)으로, 파일은 항상 JSON으로 남깁니다.
//! 파일은 `LOG_DIR`(기본 `logs/`) 아래 `matchup.log.YYYY-MM-DD`로 일별 회전합니다.

use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "info,matchup_server=debug,sea_orm=warn,tower_http=info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StdoutFormat {
    Json,
    Pretty,
}

impl StdoutFormat {
    fn from_env_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("pretty") => StdoutFormat::Pretty,
            _ => StdoutFormat::Json,
        }
    }
}

/// 반환된 guard는 main이 끝날 때까지 들고 있어야 버퍼링된 파일 로그가 flush됩니다.
pub fn init_logging() -> WorkerGuard {
    let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());
    let format = StdoutFormat::from_env_value(std::env::var("LOG_FORMAT").ok().as_deref());

    let (file_writer, guard) = tracing_appender::non_blocking(rolling::daily(&log_dir, "matchup.log"));
    let file_layer = fmt::layer()
        .json()
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_current_span(true)
        .with_ansi(false)
        .with_writer(file_writer);

    let (json_stdout, pretty_stdout) = match format {
        StdoutFormat::Json => (
            Some(
                fmt::layer()
                    .json()
                    .with_timer(fmt::time::UtcTime::rfc_3339())
                    .with_current_span(true),
            ),
            None,
        ),
        StdoutFormat::Pretty => (None, Some(fmt::layer().pretty())),
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    if let Err(err) = tracing_subscriber::registry()
        .with(filter)
        .with(json_stdout)
        .with(pretty_stdout)
        .with(file_layer)
        .try_init()
    {
        eprintln!("tracing 초기화 건너뜀: {}", err);
    }

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_json_stdout() {
        assert_eq!(StdoutFormat::from_env_value(None), StdoutFormat::Json);
        assert_eq!(StdoutFormat::from_env_value(Some("text")), StdoutFormat::Json);
    }

    #[test]
    fn should_accept_pretty_case_insensitively() {
        assert_eq!(StdoutFormat::from_env_value(Some(" Pretty ")), StdoutFormat::Pretty);
    }
}
