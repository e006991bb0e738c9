use std::net::SocketAddr;

use matchup_server::config::{establish_connection, AppConfig};
use matchup_server::domain::health::init_start_time;
use matchup_server::shutdown::shutdown_signal;
use matchup_server::utils::error::set_expose_internal_errors;
use matchup_server::utils::logging::init_logging;
use matchup_server::{app, AppState};

#[tokio::main]
async fn main() {
    // 1. 환경변수 로드
    dotenvy::dotenv().ok();

    // 2. 로깅 초기화 (guard는 종료 시까지 유지)
    let _log_guard = init_logging();
    init_start_time();

    // 3. 설정 로드
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "설정 로드 실패");
            std::process::exit(1);
        }
    };
    set_expose_internal_errors(config.app_env.is_development());

    // 4. DB 연결
    let db = match establish_connection(&config.database_url, config.db_schema_update).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!(error = %e, "DB 연결 실패");
            std::process::exit(1);
        }
    };

    let port = config.server_port;
    let state = AppState::new(db, config);
    let app = app(state);

    // 5. 서버 실행
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "포트 바인딩 실패");
            std::process::exit(1);
        }
    };
    tracing::info!("Server listening on {}", addr);
    tracing::info!("Swagger UI: http://localhost:{}/swagger-ui", port);

    if let Err(e) = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    {
        tracing::error!(error = %e, "서버 실행 중 오류");
    }

    tracing::info!("Server stopped");
}
