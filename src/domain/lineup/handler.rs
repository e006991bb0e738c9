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
    AssignCurrentPointRequest, CurrentPointDefenderItem, SelectedDefendersResponse,
    UpdateSelectedDefendersRequest,
};
use super::service::LineupService;

/// 선택 수비수 조회 API
#[utoipa::path(
    get,
    path = "/api/selected-defenders/{game_id}",
    params(("game_id" = i64, Path, description = "게임 ID")),
    security((), ("bearer_auth" = [])),
    responses(
        (status = 200, description = "조회 성공", body = SelectedDefendersResponse),
        (status = 404, description = "게임 없음", body = ErrorResponse)
    ),
    tag = "Lineup"
)]
pub async fn get_selected(
    State(state): State<AppState>,
    user: OptionalAuthUser,
    Path(game_id): Path<i64>,
) -> Result<Json<BaseResponse<SelectedDefendersResponse>>, AppError> {
    let result = LineupService::get_selected(state, user.user_id()?, game_id).await?;
    Ok(Json(BaseResponse::success(result)))
}

/// 선택 수비수 전체 교체 API (최대 7명)
#[utoipa::path(
    put,
    path = "/api/selected-defenders/{game_id}",
    params(("game_id" = i64, Path, description = "게임 ID")),
    request_body = UpdateSelectedDefendersRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "교체 성공", body = SelectedDefendersResponse),
        (status = 400, description = "7명 초과 또는 잘못된 수비수", body = ErrorResponse),
        (status = 403, description = "권한 없음", body = ErrorResponse)
    ),
    tag = "Lineup"
)]
pub async fn update_selected(
    State(state): State<AppState>,
    user: AuthUser,
    Path(game_id): Path<i64>,
    payload: Result<Json<UpdateSelectedDefendersRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<SelectedDefendersResponse>>, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let result = LineupService::update_selected(state, user.user_id()?, game_id, req).await?;
    Ok(Json(BaseResponse::success(result)))
}

/// 현재 포인트 배정 조회 API
#[utoipa::path(
    get,
    path = "/api/selected-defenders/{game_id}/current-point",
    params(("game_id" = i64, Path, description = "게임 ID")),
    security((), ("bearer_auth" = [])),
    responses(
        (status = 200, description = "조회 성공", body = [CurrentPointDefenderItem]),
        (status = 404, description = "게임 없음", body = ErrorResponse)
    ),
    tag = "Lineup"
)]
pub async fn get_current_point(
    State(state): State<AppState>,
    user: OptionalAuthUser,
    Path(game_id): Path<i64>,
) -> Result<Json<BaseResponse<Vec<CurrentPointDefenderItem>>>, AppError> {
    let result = LineupService::get_current_point(state, user.user_id()?, game_id).await?;
    Ok(Json(BaseResponse::success(result)))
}

/// 현재 포인트 배정 설정/해제 API
#[utoipa::path(
    put,
    path = "/api/selected-defenders/{game_id}/current-point",
    params(("game_id" = i64, Path, description = "게임 ID")),
    request_body = AssignCurrentPointRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "변경 성공", body = [CurrentPointDefenderItem]),
        (status = 400, description = "선택되지 않은 수비수", body = ErrorResponse)
    ),
    tag = "Lineup"
)]
pub async fn assign_current_point(
    State(state): State<AppState>,
    user: AuthUser,
    Path(game_id): Path<i64>,
    payload: Result<Json<AssignCurrentPointRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<Vec<CurrentPointDefenderItem>>>, AppError> {
    let Json(req) = payload?;

    let result = LineupService::assign_current_point(state, user.user_id()?, game_id, req).await?;
    Ok(Json(BaseResponse::success(result)))
}

/// 현재 포인트 배정 전체 해제 API
#[utoipa::path(
    delete,
    path = "/api/selected-defenders/{game_id}/current-point",
    params(("game_id" = i64, Path, description = "게임 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "해제된 공격수 ID 목록", body = [i64]),
        (status = 403, description = "권한 없음", body = ErrorResponse)
    ),
    tag = "Lineup"
)]
pub async fn clear_current_point(
    State(state): State<AppState>,
    user: AuthUser,
    Path(game_id): Path<i64>,
) -> Result<Json<BaseResponse<Vec<i64>>>, AppError> {
    let result = LineupService::clear_current_point(state, user.user_id()?, game_id).await?;
    Ok(Json(BaseResponse::success(result)))
}
