use std::env;
use std::str::FromStr;

/// 애플리케이션 설정
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_port: u16,
    pub database_url: String,
    /// true면 시작 시 엔티티로부터 테이블/인덱스를 생성합니다.
    pub db_schema_update: bool,
    pub jwt_secret: String,
    pub jwt_expiration: i64,
    pub app_env: AppEnv,

    // Rate limiting (/api 전체)
    pub rate_limit_enabled: bool,
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,

    /// 게임 룸별 브로드캐스트 채널 용량
    pub live_channel_capacity: usize,
    pub cors_origin: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn is_development(self) -> bool {
        self == AppEnv::Development
    }
}

impl AppConfig {
    /// 환경 변수에서 설정 로드
    pub fn from_env() -> Result<Self, ConfigError> {
        let server_port = parse_env("SERVER_PORT", 8080, ConfigError::InvalidPort)?;

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://matchup.db?mode=rwc".to_string());

        let db_schema_update = parse_env("DB_SCHEMA_UPDATE", false, ConfigError::InvalidFlag)?;

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!(
                "JWT_SECRET 환경변수가 설정되지 않았습니다. 프로덕션 환경에서는 반드시 설정하세요."
            );
            "secret".to_string()
        });

        let jwt_expiration = parse_env("JWT_EXPIRATION", 86400, ConfigError::InvalidExpiration)?;

        let app_env = match env::var("APP_ENV").as_deref() {
            Ok("development") | Ok("dev") => AppEnv::Development,
            Ok("production") | Ok("prod") | Err(_) => AppEnv::Production,
            Ok(other) => return Err(ConfigError::InvalidAppEnv(other.to_string())),
        };

        let rate_limit_enabled =
            parse_env("RATE_LIMIT_ENABLED", true, ConfigError::InvalidFlag)?;
        let rate_limit_per_second =
            parse_env("RATE_LIMIT_PER_SECOND", 10, ConfigError::InvalidRateLimit)?;
        let rate_limit_burst = parse_env("RATE_LIMIT_BURST", 50, ConfigError::InvalidRateLimit)?;

        let live_channel_capacity =
            parse_env("LIVE_CHANNEL_CAPACITY", 64, ConfigError::InvalidCapacity)?;

        let cors_origin = env::var("CORS_ORIGIN").ok().filter(|v| !v.is_empty());

        Ok(Self {
            server_port,
            database_url,
            db_schema_update,
            jwt_secret,
            jwt_expiration,
            app_env,
            rate_limit_enabled,
            rate_limit_per_second,
            rate_limit_burst,
            live_channel_capacity,
            cors_origin,
        })
    }

    /// 테스트용 설정 (rate limit 비활성화)
    pub fn for_test(jwt_secret: &str) -> Self {
        Self {
            server_port: 0,
            database_url: "sqlite::memory:".to_string(),
            db_schema_update: true,
            jwt_secret: jwt_secret.to_string(),
            jwt_expiration: 3600,
            app_env: AppEnv::Development,
            rate_limit_enabled: false,
            rate_limit_per_second: 10,
            rate_limit_burst: 50,
            live_channel_capacity: 64,
            cors_origin: None,
        }
    }
}

fn parse_env<T: FromStr>(key: &str, default: T, err: ConfigError) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|_| err),
        Err(_) => Ok(default),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid port number")]
    InvalidPort,
    #[error("Invalid expiration time")]
    InvalidExpiration,
    #[error("Invalid boolean flag (use 'true' or 'false')")]
    InvalidFlag,
    #[error("Invalid rate limit setting")]
    InvalidRateLimit,
    #[error("Invalid live channel capacity")]
    InvalidCapacity,
    #[error("Unknown APP_ENV value: {0}")]
    InvalidAppEnv(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_should_disable_rate_limit() {
        let config = AppConfig::for_test("s");

        assert!(!config.rate_limit_enabled);
        assert!(config.app_env.is_development());
    }

    #[test]
    fn parse_env_should_fall_back_to_default() {
        let value: u16 = parse_env(
            "MATCHUP_TEST_UNSET_VARIABLE",
            1234,
            ConfigError::InvalidPort,
        )
        .unwrap();
        assert_eq!(value, 1234);
    }
}
