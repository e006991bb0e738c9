use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use validator::Validate;

use crate::state::AppState;
use crate::utils::auth::{AuthUser, OptionalAuthUser};
use crate::utils::error::AppError;
use crate::utils::BaseResponse;

use super::dto::{
    ActivityItem, ActivityQuery, AddPlayerRequest, AvailableDefenderRequest, CreateGameRequest,
    GameDetailResponse, GameResponse, OffensivePlayerResponse, ReorderPlayersRequest,
    UpdateGameRequest, UpdatePlayerRequest,
};
use super::service::GameService;

/// 팀 게임 목록 API
#[utoipa::path(
    get,
    path = "/api/games/team/{team_id}",
    params(("team_id" = i64, Path, description = "팀 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "조회 성공", body = [GameResponse]),
        (status = 403, description = "팀 멤버 아님", body = ErrorResponse),
        (status = 404, description = "팀 없음", body = ErrorResponse)
    ),
    tag = "Game"
)]
pub async fn list_games(
    State(state): State<AppState>,
    user: AuthUser,
    Path(team_id): Path<i64>,
) -> Result<Json<BaseResponse<Vec<GameResponse>>>, AppError> {
    let result = GameService::list_games(state, user.user_id()?, team_id).await?;
    Ok(Json(BaseResponse::success(result)))
}

/// 게임 생성 API
#[utoipa::path(
    post,
    path = "/api/games",
    request_body = CreateGameRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "생성 성공", body = GameResponse),
        (status = 400, description = "잘못된 요청", body = ErrorResponse),
        (status = 403, description = "권한 없음", body = ErrorResponse)
    ),
    tag = "Game"
)]
pub async fn create_game(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<CreateGameRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<GameResponse>>, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let result = GameService::create_game(state, user.user_id()?, req).await?;
    Ok(Json(BaseResponse::success_with_result(
        "게임이 생성되었습니다.",
        result,
    )))
}

/// 게임 전체 조회 API (공개 게임은 비로그인 허용)
#[utoipa::path(
    get,
    path = "/api/games/{game_id}",
    params(("game_id" = i64, Path, description = "게임 ID")),
    security((), ("bearer_auth" = [])),
    responses(
        (status = 200, description = "조회 성공", body = GameDetailResponse),
        (status = 403, description = "권한 없음", body = ErrorResponse),
        (status = 404, description = "게임 없음", body = ErrorResponse)
    ),
    tag = "Game"
)]
pub async fn get_game(
    State(state): State<AppState>,
    user: OptionalAuthUser,
    Path(game_id): Path<i64>,
) -> Result<Json<BaseResponse<GameDetailResponse>>, AppError> {
    let result = GameService::get_game(state, user.user_id()?, game_id).await?;
    Ok(Json(BaseResponse::success(result)))
}

/// 슬러그로 게임 조회 API
#[utoipa::path(
    get,
    path = "/api/games/slug/{slug}",
    params(("slug" = String, Path, description = "게임 슬러그")),
    security((), ("bearer_auth" = [])),
    responses(
        (status = 200, description = "조회 성공", body = GameDetailResponse),
        (status = 403, description = "권한 없음", body = ErrorResponse),
        (status = 404, description = "게임 없음", body = ErrorResponse)
    ),
    tag = "Game"
)]
pub async fn get_game_by_slug(
    State(state): State<AppState>,
    user: OptionalAuthUser,
    Path(slug): Path<String>,
) -> Result<Json<BaseResponse<GameDetailResponse>>, AppError> {
    let result = GameService::get_game_by_slug(state, user.user_id()?, &slug).await?;
    Ok(Json(BaseResponse::success(result)))
}

/// 공유 코드로 공개 게임 조회 API
#[utoipa::path(
    get,
    path = "/api/public/games/{share_code}",
    params(("share_code" = String, Path, description = "공유 코드")),
    responses(
        (status = 200, description = "조회 성공", body = GameDetailResponse),
        (status = 404, description = "공개 게임 없음", body = ErrorResponse)
    ),
    tag = "Game"
)]
pub async fn get_public_game(
    State(state): State<AppState>,
    Path(share_code): Path<String>,
) -> Result<Json<BaseResponse<GameDetailResponse>>, AppError> {
    let result = GameService::get_public_game(state, &share_code).await?;
    Ok(Json(BaseResponse::success(result)))
}

/// 게임 수정 API (상태 포함)
#[utoipa::path(
    put,
    path = "/api/games/{game_id}",
    params(("game_id" = i64, Path, description = "게임 ID")),
    request_body = UpdateGameRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "수정 성공", body = GameResponse),
        (status = 400, description = "잘못된 요청", body = ErrorResponse),
        (status = 403, description = "권한 없음", body = ErrorResponse),
        (status = 404, description = "게임 없음", body = ErrorResponse)
    ),
    tag = "Game"
)]
pub async fn update_game(
    State(state): State<AppState>,
    user: AuthUser,
    Path(game_id): Path<i64>,
    payload: Result<Json<UpdateGameRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<GameResponse>>, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let result = GameService::update_game(state, user.user_id()?, game_id, req).await?;
    Ok(Json(BaseResponse::success(result)))
}

/// 게임 삭제 API (ADMIN)
#[utoipa::path(
    delete,
    path = "/api/games/{game_id}",
    params(("game_id" = i64, Path, description = "게임 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "삭제 성공"),
        (status = 403, description = "권한 없음", body = ErrorResponse),
        (status = 404, description = "게임 없음", body = ErrorResponse)
    ),
    tag = "Game"
)]
pub async fn delete_game(
    State(state): State<AppState>,
    user: AuthUser,
    Path(game_id): Path<i64>,
) -> Result<Json<BaseResponse<()>>, AppError> {
    GameService::delete_game(state, user.user_id()?, game_id).await?;
    Ok(Json(BaseResponse::success_with_message("게임이 삭제되었습니다.")))
}

/// 공격수 추가 API
#[utoipa::path(
    post,
    path = "/api/games/{game_id}/players",
    params(("game_id" = i64, Path, description = "게임 ID")),
    request_body = AddPlayerRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "추가 성공", body = OffensivePlayerResponse),
        (status = 400, description = "잘못된 요청", body = ErrorResponse),
        (status = 403, description = "권한 없음", body = ErrorResponse)
    ),
    tag = "Game"
)]
pub async fn add_player(
    State(state): State<AppState>,
    user: AuthUser,
    Path(game_id): Path<i64>,
    payload: Result<Json<AddPlayerRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<OffensivePlayerResponse>>, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let result = GameService::add_player(state, user.user_id()?, game_id, req).await?;
    Ok(Json(BaseResponse::success(result)))
}

/// 공격수 수정 API
#[utoipa::path(
    put,
    path = "/api/games/{game_id}/players/{player_id}",
    params(
        ("game_id" = i64, Path, description = "게임 ID"),
        ("player_id" = i64, Path, description = "공격수 ID")
    ),
    request_body = UpdatePlayerRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "수정 성공", body = OffensivePlayerResponse),
        (status = 404, description = "공격수 없음", body = ErrorResponse)
    ),
    tag = "Game"
)]
pub async fn update_player(
    State(state): State<AppState>,
    user: AuthUser,
    Path((game_id, player_id)): Path<(i64, i64)>,
    payload: Result<Json<UpdatePlayerRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<OffensivePlayerResponse>>, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let result =
        GameService::update_player(state, user.user_id()?, game_id, player_id, req).await?;
    Ok(Json(BaseResponse::success(result)))
}

/// 공격수 삭제 API
#[utoipa::path(
    delete,
    path = "/api/games/{game_id}/players/{player_id}",
    params(
        ("game_id" = i64, Path, description = "게임 ID"),
        ("player_id" = i64, Path, description = "공격수 ID")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "삭제 성공"),
        (status = 404, description = "공격수 없음", body = ErrorResponse)
    ),
    tag = "Game"
)]
pub async fn remove_player(
    State(state): State<AppState>,
    user: AuthUser,
    Path((game_id, player_id)): Path<(i64, i64)>,
) -> Result<Json<BaseResponse<()>>, AppError> {
    GameService::remove_player(state, user.user_id()?, game_id, player_id).await?;
    Ok(Json(BaseResponse::success_with_message("공격수가 삭제되었습니다.")))
}

/// 공격수 순서 변경 API
#[utoipa::path(
    put,
    path = "/api/games/{game_id}/players/order",
    params(("game_id" = i64, Path, description = "게임 ID")),
    request_body = ReorderPlayersRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "변경 성공", body = [OffensivePlayerResponse]),
        (status = 400, description = "공격수 목록 불일치", body = ErrorResponse)
    ),
    tag = "Game"
)]
pub async fn reorder_players(
    State(state): State<AppState>,
    user: AuthUser,
    Path(game_id): Path<i64>,
    payload: Result<Json<ReorderPlayersRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<Vec<OffensivePlayerResponse>>>, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let result = GameService::reorder_players(state, user.user_id()?, game_id, req).await?;
    Ok(Json(BaseResponse::success(result)))
}

/// 출전 가능 수비수 추가 API
#[utoipa::path(
    post,
    path = "/api/games/{game_id}/available-defenders",
    params(("game_id" = i64, Path, description = "게임 ID")),
    request_body = AvailableDefenderRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "추가 성공", body = [i64]),
        (status = 400, description = "팀 소속이 아닌 수비수", body = ErrorResponse),
        (status = 409, description = "이미 등록됨", body = ErrorResponse)
    ),
    tag = "Game"
)]
pub async fn add_available_defender(
    State(state): State<AppState>,
    user: AuthUser,
    Path(game_id): Path<i64>,
    payload: Result<Json<AvailableDefenderRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<Vec<i64>>>, AppError> {
    let Json(req) = payload?;

    let result =
        GameService::add_available_defender(state, user.user_id()?, game_id, req.defender_id)
            .await?;
    Ok(Json(BaseResponse::success(result)))
}

/// 출전 가능 수비수 제외 API
#[utoipa::path(
    delete,
    path = "/api/games/{game_id}/available-defenders/{defender_id}",
    params(
        ("game_id" = i64, Path, description = "게임 ID"),
        ("defender_id" = i64, Path, description = "수비수 ID")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "제외 성공", body = [i64]),
        (status = 404, description = "명단에 없음", body = ErrorResponse)
    ),
    tag = "Game"
)]
pub async fn remove_available_defender(
    State(state): State<AppState>,
    user: AuthUser,
    Path((game_id, defender_id)): Path<(i64, i64)>,
) -> Result<Json<BaseResponse<Vec<i64>>>, AppError> {
    let result =
        GameService::remove_available_defender(state, user.user_id()?, game_id, defender_id)
            .await?;
    Ok(Json(BaseResponse::success(result)))
}

/// 게임 활동 기록 API (최신순)
#[utoipa::path(
    get,
    path = "/api/games/{game_id}/activity",
    params(("game_id" = i64, Path, description = "게임 ID"), ActivityQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "조회 성공", body = [ActivityItem]),
        (status = 403, description = "권한 없음", body = ErrorResponse)
    ),
    tag = "Game"
)]
pub async fn list_activity(
    State(state): State<AppState>,
    user: AuthUser,
    Path(game_id): Path<i64>,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<BaseResponse<Vec<ActivityItem>>>, AppError> {
    let result = GameService::list_activity(state, user.user_id()?, game_id, query.limit).await?;
    Ok(Json(BaseResponse::success(result)))
}
