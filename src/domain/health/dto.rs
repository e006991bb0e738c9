use serde::Serialize;
use utoipa::ToSchema;

/// `GET /health` 응답
#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: HealthState,
    #[schema(example = "0.1.0")]
    pub version: &'static str,
    #[schema(example = 3600)]
    pub uptime_secs: u64,
    pub checks: HealthChecks,
}

/// healthy / degraded / unhealthy
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
    /// 응답은 하지만 느림
    Degraded,
    Unhealthy,
}

#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthChecks {
    pub database: CheckResult,
}

/// 의존성 하나의 점검 결과
#[derive(Serialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    #[schema(example = true)]
    pub status: bool,
    #[schema(example = 4)]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckResult {
    pub fn success(latency_ms: u64) -> Self {
        Self {
            status: true,
            latency_ms: Some(latency_ms),
            error: None,
        }
    }

    pub fn failure(latency_ms: u64, error: impl Into<String>) -> Self {
        Self {
            status: false,
            latency_ms: Some(latency_ms),
            error: Some(error.into()),
        }
    }

    /// 제한 시간 안에 응답이 없었음
    pub fn timeout(waited_ms: u64) -> Self {
        Self::failure(waited_ms, "timeout")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_omit_error_on_success() {
        let json = serde_json::to_value(CheckResult::success(3)).unwrap();

        assert_eq!(json["status"], true);
        assert_eq!(json["latencyMs"], 3);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn should_mark_timeout_as_failure() {
        let result = CheckResult::timeout(5000);

        assert!(!result.status);
        assert_eq!(result.error.as_deref(), Some("timeout"));
    }

    #[test]
    fn should_serialize_status_in_lowercase_with_database_check() {
        let status = HealthStatus {
            status: HealthState::Degraded,
            version: "0.1.0",
            uptime_secs: 12,
            checks: HealthChecks {
                database: CheckResult::failure(40, "pool timed out"),
            },
        };

        let json = serde_json::to_value(&status).unwrap();

        assert_eq!(json["status"], "degraded");
        assert_eq!(json["uptimeSecs"], 12);
        assert_eq!(json["checks"]["database"]["error"], "pool timed out");
    }
}
