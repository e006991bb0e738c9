use std::sync::OnceLock;
use std::time::{Duration, Instant};

use sea_orm::DatabaseConnection;
use tokio::time::timeout;

use super::dto::{CheckResult, HealthChecks, HealthState, HealthStatus};

static START_TIME: OnceLock<Instant> = OnceLock::new();

/// DB ping 타임아웃
const PING_TIMEOUT: Duration = Duration::from_secs(5);

/// 이 이상 걸리면 degraded
const DEGRADED_THRESHOLD: Duration = Duration::from_secs(1);

/// 서버 시작 시간 초기화 (main에서 한 번 호출)
pub fn init_start_time() {
    START_TIME.get_or_init(Instant::now);
}

pub fn uptime_secs() -> u64 {
    START_TIME.get().map(|t| t.elapsed().as_secs()).unwrap_or(0)
}

pub async fn check_health(db: &DatabaseConnection) -> HealthStatus {
    let database = ping_database(db).await;

    HealthStatus {
        status: determine_health_state(&database),
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: uptime_secs(),
        checks: HealthChecks { database },
    }
}

fn determine_health_state(check: &CheckResult) -> HealthState {
    if !check.status {
        return HealthState::Unhealthy;
    }

    match check.latency_ms {
        Some(latency) if latency >= DEGRADED_THRESHOLD.as_millis() as u64 => HealthState::Degraded,
        _ => HealthState::Healthy,
    }
}

async fn ping_database(db: &DatabaseConnection) -> CheckResult {
    let start = Instant::now();
    let result = timeout(PING_TIMEOUT, db.ping()).await;
    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(Ok(())) => CheckResult::success(latency_ms),
        Ok(Err(e)) => {
            tracing::warn!(latency_ms, error = %e, "DB 헬스체크 실패");
            CheckResult::failure(latency_ms, e.to_string())
        }
        Err(_) => {
            tracing::warn!(latency_ms, "DB 헬스체크 타임아웃");
            CheckResult::timeout(latency_ms)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_report_healthy_for_fast_ping() {
        let check = CheckResult::success(3);
        assert_eq!(determine_health_state(&check), HealthState::Healthy);
    }

    #[test]
    fn should_report_degraded_at_threshold() {
        assert_eq!(
            determine_health_state(&CheckResult::success(999)),
            HealthState::Healthy
        );
        assert_eq!(
            determine_health_state(&CheckResult::success(1000)),
            HealthState::Degraded
        );
    }

    #[test]
    fn should_report_unhealthy_on_failure_or_timeout() {
        let failed = CheckResult::failure(10, "connection refused".to_string());
        assert_eq!(determine_health_state(&failed), HealthState::Unhealthy);
        assert_eq!(
            determine_health_state(&CheckResult::timeout(5000)),
            HealthState::Unhealthy
        );
    }

    #[test]
    fn should_keep_first_start_time() {
        init_start_time();
        let first = START_TIME.get().copied();
        init_start_time();
        assert_eq!(first, START_TIME.get().copied());
    }

    #[tokio::test]
    async fn should_ping_in_memory_sqlite() {
        let db = sea_orm::Database::connect("sqlite::memory:")
            .await
            .expect("sqlite memory");

        let status = check_health(&db).await;

        assert!(status.checks.database.status);
        assert_ne!(status.status, HealthState::Unhealthy);
    }
}
