use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use validator::Validate;

use crate::state::AppState;
use crate::utils::auth::{AuthUser, OptionalAuthUser};
use crate::utils::error::AppError;
use crate::utils::BaseResponse;

use super::dto::{
    CreatePointRequest, DeletePointResponse, MatchupResponse, PointResponse,
    UpdateMatchupRequest, UpdatePointRequest,
};
use super::service::PointService;

/// 포인트 기록 API
///
/// 출전 수비수(`selectedDefenderIds`) 전원의 통계를 같은 트랜잭션에서 갱신합니다.
/// `clientKey`가 이미 기록된 키면 기존 포인트를 그대로 반환합니다.
#[utoipa::path(
    post,
    path = "/api/points",
    request_body = CreatePointRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "포인트 기록 성공", body = PointResponse),
        (status = 400, description = "잘못된 요청", body = ErrorResponse),
        (status = 401, description = "인증 실패", body = ErrorResponse),
        (status = 403, description = "권한 없음", body = ErrorResponse),
        (status = 404, description = "게임 없음", body = ErrorResponse)
    ),
    tag = "Point"
)]
pub async fn create_point(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<CreatePointRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<PointResponse>>, AppError> {
    let Json(req) = payload?;
    req.validate()?;
    let user_id = user.user_id()?;

    let result = PointService::create_point(state, user_id, req).await?;

    Ok(Json(BaseResponse::success_with_result(
        "포인트가 기록되었습니다.",
        result,
    )))
}

/// 게임 포인트 목록 API
#[utoipa::path(
    get,
    path = "/api/points/game/{game_id}",
    params(("game_id" = i64, Path, description = "게임 ID")),
    security((), ("bearer_auth" = [])),
    responses(
        (status = 200, description = "조회 성공", body = [PointResponse]),
        (status = 403, description = "권한 없음", body = ErrorResponse),
        (status = 404, description = "게임 없음", body = ErrorResponse)
    ),
    tag = "Point"
)]
pub async fn list_points(
    State(state): State<AppState>,
    user: OptionalAuthUser,
    Path(game_id): Path<i64>,
) -> Result<Json<BaseResponse<Vec<PointResponse>>>, AppError> {
    let result = PointService::list_points(state, user.user_id()?, game_id).await?;
    Ok(Json(BaseResponse::success(result)))
}

/// 포인트 수정 API (바람/메모/결과)
#[utoipa::path(
    put,
    path = "/api/points/{point_id}",
    params(("point_id" = i64, Path, description = "포인트 ID")),
    request_body = UpdatePointRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "수정 성공", body = PointResponse),
        (status = 400, description = "잘못된 요청", body = ErrorResponse),
        (status = 403, description = "권한 없음", body = ErrorResponse),
        (status = 404, description = "포인트 없음", body = ErrorResponse)
    ),
    tag = "Point"
)]
pub async fn update_point(
    State(state): State<AppState>,
    user: AuthUser,
    Path(point_id): Path<i64>,
    payload: Result<Json<UpdatePointRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<PointResponse>>, AppError> {
    let Json(req) = payload?;
    req.validate()?;
    let user_id = user.user_id()?;

    let result = PointService::update_point(state, user_id, point_id, req).await?;
    Ok(Json(BaseResponse::success(result)))
}

/// 포인트 삭제 API (뒤 번호는 하나씩 당겨짐)
#[utoipa::path(
    delete,
    path = "/api/points/{point_id}",
    params(("point_id" = i64, Path, description = "포인트 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "삭제 성공", body = DeletePointResponse),
        (status = 403, description = "권한 없음", body = ErrorResponse),
        (status = 404, description = "포인트 없음", body = ErrorResponse)
    ),
    tag = "Point"
)]
pub async fn delete_point(
    State(state): State<AppState>,
    user: AuthUser,
    Path(point_id): Path<i64>,
) -> Result<Json<BaseResponse<DeletePointResponse>>, AppError> {
    let user_id = user.user_id()?;
    let result = PointService::delete_point(state, user_id, point_id).await?;
    Ok(Json(BaseResponse::success(result)))
}

/// 매치업 수정 API
#[utoipa::path(
    put,
    path = "/api/points/matchups/{matchup_id}",
    params(("matchup_id" = i64, Path, description = "매치업 ID")),
    request_body = UpdateMatchupRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "수정 성공", body = MatchupResponse),
        (status = 400, description = "잘못된 요청", body = ErrorResponse),
        (status = 403, description = "권한 없음", body = ErrorResponse),
        (status = 404, description = "매치업 없음", body = ErrorResponse)
    ),
    tag = "Point"
)]
pub async fn update_matchup(
    State(state): State<AppState>,
    user: AuthUser,
    Path(matchup_id): Path<i64>,
    payload: Result<Json<UpdateMatchupRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<MatchupResponse>>, AppError> {
    let Json(req) = payload?;
    req.validate()?;
    let user_id = user.user_id()?;

    let result = PointService::update_matchup(state, user_id, matchup_id, req).await?;
    Ok(Json(BaseResponse::success(result)))
}
