pub mod config;
pub mod domain;
pub mod global;
pub mod shutdown;
pub mod state;
pub mod utils;

use axum::{
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::domain::{
    auth, defender, export, game, health, line, lineup, live, point, team, user,
};
use crate::global::middleware::request_id_middleware;
use crate::global::rate_limit::{create_api_rate_limiter, ApiRateLimiter};

pub use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::handler::health_check,
        auth::handler::register,
        auth::handler::login,
        user::handler::get_me,
        team::handler::create_team,
        team::handler::list_my_teams,
        team::handler::get_team,
        team::handler::join_team,
        team::handler::update_member_role,
        team::handler::remove_member,
        team::handler::leave_team,
        team::handler::delete_team,
        defender::handler::list_defenders,
        defender::handler::create_defender,
        defender::handler::update_defender,
        defender::handler::delete_defender,
        defender::handler::get_defender_stats,
        game::handler::list_games,
        game::handler::create_game,
        game::handler::get_game,
        game::handler::get_game_by_slug,
        game::handler::get_public_game,
        game::handler::update_game,
        game::handler::delete_game,
        game::handler::add_player,
        game::handler::update_player,
        game::handler::remove_player,
        game::handler::reorder_players,
        game::handler::add_available_defender,
        game::handler::remove_available_defender,
        game::handler::list_activity,
        point::handler::create_point,
        point::handler::list_points,
        point::handler::update_point,
        point::handler::delete_point,
        point::handler::update_matchup,
        lineup::handler::get_selected,
        lineup::handler::update_selected,
        lineup::handler::get_current_point,
        lineup::handler::assign_current_point,
        lineup::handler::clear_current_point,
        line::handler::list_lines,
        line::handler::create_line,
        line::handler::update_line,
        line::handler::delete_line,
        line::handler::apply_line,
        export::handler::export_game,
        export::handler::team_stats,
        live::handler::live_socket,
    ),
    components(
        schemas(
            utils::response::ErrorResponse,
            health::dto::HealthStatus,
            health::dto::HealthState,
            health::dto::HealthChecks,
            health::dto::CheckResult,
            auth::dto::RegisterRequest,
            auth::dto::LoginRequest,
            auth::dto::TokenResponse,
            user::dto::MeResponse,
            team::dto::CreateTeamRequest,
            team::dto::JoinTeamRequest,
            team::dto::UpdateMemberRoleRequest,
            team::dto::TeamResponse,
            team::dto::TeamMemberItem,
            team::dto::TeamDetailResponse,
            team::entity::team_member::TeamRole,
            defender::dto::CreateDefenderRequest,
            defender::dto::UpdateDefenderRequest,
            defender::dto::DefenderResponse,
            defender::dto::DefenderStatsItem,
            defender::dto::DefenderStatsResponse,
            game::dto::CreateGameRequest,
            game::dto::UpdateGameRequest,
            game::dto::AddPlayerRequest,
            game::dto::UpdatePlayerRequest,
            game::dto::ReorderPlayersRequest,
            game::dto::AvailableDefenderRequest,
            game::dto::GameResponse,
            game::dto::OffensivePlayerResponse,
            game::dto::GameDetailResponse,
            game::dto::ActivityItem,
            game::entity::game::GameStatus,
            game::entity::offensive_player::PlayerPosition,
            point::dto::CreatePointRequest,
            point::dto::MatchupInput,
            point::dto::UpdatePointRequest,
            point::dto::UpdateMatchupRequest,
            point::dto::MatchupResponse,
            point::dto::PointResponse,
            point::dto::DeletePointResponse,
            point::entity::matchup::MatchupResult,
            lineup::dto::UpdateSelectedDefendersRequest,
            lineup::dto::SelectedDefendersResponse,
            lineup::dto::AssignCurrentPointRequest,
            lineup::dto::CurrentPointDefenderItem,
            line::dto::CreateLineRequest,
            line::dto::UpdateLineRequest,
            line::dto::LineResponse,
            export::dto::ExportFormat,
            export::dto::DefenderReportItem,
            export::dto::GameTotals,
            export::dto::GameStatistics,
            export::dto::GameExportResponse,
            export::dto::TeamStatsResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "헬스체크"),
        (name = "Auth", description = "회원가입/로그인"),
        (name = "Team", description = "팀과 멤버 역할"),
        (name = "Defender", description = "수비수 명단과 통계"),
        (name = "Game", description = "게임, 공격 선수, 출전 가능 수비수"),
        (name = "Point", description = "포인트와 매치업 기록"),
        (name = "Lineup", description = "선택 수비수와 현재 포인트 배정"),
        (name = "Line", description = "수비 라인 템플릿"),
        (name = "Export", description = "통계와 내보내기"),
        (name = "Live", description = "실시간 게임 동기화")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// `/api` 하위 라우트
fn api_routes() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/auth/register", post(auth::handler::register))
        .route("/auth/login", post(auth::handler::login))
        .route("/auth/me", get(user::handler::get_me))
        // Team
        .route(
            "/teams",
            post(team::handler::create_team).get(team::handler::list_my_teams),
        )
        .route("/teams/join", post(team::handler::join_team))
        .route(
            "/teams/:team_id",
            get(team::handler::get_team).delete(team::handler::delete_team),
        )
        .route(
            "/teams/:team_id/members/:user_id/role",
            put(team::handler::update_member_role),
        )
        .route(
            "/teams/:team_id/members/:user_id",
            delete(team::handler::remove_member),
        )
        .route("/teams/:team_id/leave", post(team::handler::leave_team))
        // Defender
        .route("/defenders", post(defender::handler::create_defender))
        .route(
            "/defenders/team/:team_id",
            get(defender::handler::list_defenders),
        )
        .route(
            "/defenders/:defender_id",
            put(defender::handler::update_defender).delete(defender::handler::delete_defender),
        )
        .route(
            "/defenders/:defender_id/stats",
            get(defender::handler::get_defender_stats),
        )
        // Game
        .route("/games", post(game::handler::create_game))
        .route("/games/team/:team_id", get(game::handler::list_games))
        .route("/games/slug/:slug", get(game::handler::get_game_by_slug))
        .route(
            "/games/:game_id",
            get(game::handler::get_game)
                .put(game::handler::update_game)
                .delete(game::handler::delete_game),
        )
        .route("/games/:game_id/players", post(game::handler::add_player))
        .route(
            "/games/:game_id/players/order",
            put(game::handler::reorder_players),
        )
        .route(
            "/games/:game_id/players/:player_id",
            put(game::handler::update_player).delete(game::handler::remove_player),
        )
        .route(
            "/games/:game_id/available-defenders",
            post(game::handler::add_available_defender),
        )
        .route(
            "/games/:game_id/available-defenders/:defender_id",
            delete(game::handler::remove_available_defender),
        )
        .route("/games/:game_id/activity", get(game::handler::list_activity))
        .route(
            "/public/games/:share_code",
            get(game::handler::get_public_game),
        )
        // Point
        .route("/points", post(point::handler::create_point))
        .route("/points/game/:game_id", get(point::handler::list_points))
        .route(
            "/points/matchups/:matchup_id",
            put(point::handler::update_matchup),
        )
        .route(
            "/points/:point_id",
            put(point::handler::update_point).delete(point::handler::delete_point),
        )
        // Lineup
        .route(
            "/selected-defenders/:game_id",
            get(lineup::handler::get_selected).put(lineup::handler::update_selected),
        )
        .route(
            "/selected-defenders/:game_id/current-point",
            get(lineup::handler::get_current_point)
                .put(lineup::handler::assign_current_point)
                .delete(lineup::handler::clear_current_point),
        )
        // Line
        .route("/lines", post(line::handler::create_line))
        .route("/lines/team/:team_id", get(line::handler::list_lines))
        .route(
            "/lines/:line_id",
            put(line::handler::update_line).delete(line::handler::delete_line),
        )
        .route(
            "/lines/:line_id/apply/:game_id",
            post(line::handler::apply_line),
        )
        // Export
        .route("/export/games/:game_id", get(export::handler::export_game))
        .route(
            "/export/teams/:team_id/stats",
            get(export::handler::team_stats),
        )
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match origin.and_then(|o| HeaderValue::from_str(o).ok()) {
        Some(origin) => layer.allow_origin(origin),
        None => layer.allow_origin(Any),
    }
}

fn build_router(state: AppState, limiter: Option<ApiRateLimiter>) -> Router {
    let api = match limiter {
        Some(limiter) => api_routes().layer(limiter),
        None => api_routes(),
    };
    let cors = cors_layer(state.config.cors_origin.as_deref());

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health::handler::health_check))
        .route("/ws", get(live::handler::live_socket))
        .nest("/api", api)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Rate limit 없이 라우터 구성 (테스트, 내부 호출용)
pub fn create_router(state: AppState) -> Router {
    build_router(state, None)
}

/// 운영 라우터. 설정에서 켜져 있으면 `/api`에 IP 기반 Rate limit을 적용합니다.
///
/// Rate limit은 클라이언트 IP가 필요하므로 `into_make_service_with_connect_info`로 띄워야 합니다.
pub fn app(state: AppState) -> Router {
    let limiter = if state.config.rate_limit_enabled {
        let limiter = create_api_rate_limiter(&state.config);
        if limiter.is_none() {
            tracing::warn!("Rate limit 설정값이 올바르지 않아 비활성화합니다.");
        }
        limiter
    } else {
        None
    };
    build_router(state, limiter)
}
