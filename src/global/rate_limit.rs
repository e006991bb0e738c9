//! `/api` 전체에 적용하는 IP 기반 요청 제한

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorError,
    GovernorLayer,
};

use crate::config::AppConfig;
use crate::utils::BaseResponse;

pub type ApiRateLimiter =
    GovernorLayer<SmartIpKeyExtractor, governor::middleware::NoOpMiddleware>;

/// 설정값으로 Rate Limiter 레이어를 만듭니다.
///
/// 초당 허용량이나 버스트가 0이면 구성이 불가능하므로 `None`을 반환합니다.
pub fn create_api_rate_limiter(config: &AppConfig) -> Option<ApiRateLimiter> {
    let governor_config = GovernorConfigBuilder::default()
        .per_second(config.rate_limit_per_second)
        .burst_size(config.rate_limit_burst)
        .key_extractor(SmartIpKeyExtractor)
        .error_handler(|err| RateLimitResponse::from(err).into_response())
        .finish()?;

    Some(GovernorLayer {
        config: Arc::new(governor_config),
    })
}

#[derive(Debug)]
struct RateLimitResponse {
    retry_after: Option<u64>,
}

impl From<GovernorError> for RateLimitResponse {
    fn from(err: GovernorError) -> Self {
        match err {
            GovernorError::TooManyRequests { wait_time, .. } => Self {
                retry_after: Some(wait_time),
            },
            _ => Self { retry_after: None },
        }
    }
}

impl IntoResponse for RateLimitResponse {
    fn into_response(self) -> Response {
        tracing::warn!(retry_after_secs = ?self.retry_after, "Rate limit exceeded");

        let body = BaseResponse::<()>::error(
            "RATE_LIMIT",
            "요청이 너무 많습니다. 잠시 후 다시 시도해주세요.",
        );
        let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();

        if let Some(retry_after) = self.retry_after {
            if let Ok(value) = retry_after.to_string().parse() {
                response.headers_mut().insert("Retry-After", value);
            }
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_build_limiter_from_config() {
        let mut config = AppConfig::for_test("secret");
        config.rate_limit_per_second = 5;
        config.rate_limit_burst = 10;

        assert!(create_api_rate_limiter(&config).is_some());
    }

    #[test]
    fn should_refuse_zero_burst() {
        let mut config = AppConfig::for_test("secret");
        config.rate_limit_burst = 0;

        assert!(create_api_rate_limiter(&config).is_none());
    }

    #[test]
    fn should_include_retry_after_header() {
        let response = RateLimitResponse {
            retry_after: Some(30),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get("Retry-After").unwrap(), "30");
    }
}
