use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use validator::Validate;

use crate::state::AppState;
use crate::utils::auth::AuthUser;
use crate::utils::error::AppError;
use crate::utils::BaseResponse;

use super::dto::{
    CreateDefenderRequest, DefenderResponse, DefenderStatsResponse, UpdateDefenderRequest,
};
use super::service::DefenderService;

/// 팀 수비수 목록 API
#[utoipa::path(
    get,
    path = "/api/defenders/team/{team_id}",
    params(("team_id" = i64, Path, description = "팀 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "조회 성공", body = [DefenderResponse]),
        (status = 403, description = "팀 멤버 아님", body = ErrorResponse)
    ),
    tag = "Defender"
)]
pub async fn list_defenders(
    State(state): State<AppState>,
    user: AuthUser,
    Path(team_id): Path<i64>,
) -> Result<Json<BaseResponse<Vec<DefenderResponse>>>, AppError> {
    let result = DefenderService::list_defenders(state, user.user_id()?, team_id).await?;
    Ok(Json(BaseResponse::success(result)))
}

/// 수비수 등록 API (MEMBER 이상)
#[utoipa::path(
    post,
    path = "/api/defenders",
    request_body = CreateDefenderRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "등록 성공", body = DefenderResponse),
        (status = 400, description = "잘못된 요청", body = ErrorResponse),
        (status = 403, description = "권한 없음", body = ErrorResponse)
    ),
    tag = "Defender"
)]
pub async fn create_defender(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<CreateDefenderRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<DefenderResponse>>, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let result = DefenderService::create_defender(state, user.user_id()?, req).await?;
    Ok(Json(BaseResponse::success(result)))
}

/// 수비수 수정 API (활성/비활성 포함)
#[utoipa::path(
    put,
    path = "/api/defenders/{defender_id}",
    params(("defender_id" = i64, Path, description = "수비수 ID")),
    request_body = UpdateDefenderRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "수정 성공", body = DefenderResponse),
        (status = 403, description = "권한 없음", body = ErrorResponse),
        (status = 404, description = "수비수 없음", body = ErrorResponse)
    ),
    tag = "Defender"
)]
pub async fn update_defender(
    State(state): State<AppState>,
    user: AuthUser,
    Path(defender_id): Path<i64>,
    payload: Result<Json<UpdateDefenderRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<DefenderResponse>>, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let result = DefenderService::update_defender(state, user.user_id()?, defender_id, req).await?;
    Ok(Json(BaseResponse::success(result)))
}

/// 수비수 삭제 API (ADMIN 이상)
#[utoipa::path(
    delete,
    path = "/api/defenders/{defender_id}",
    params(("defender_id" = i64, Path, description = "수비수 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "삭제 성공"),
        (status = 403, description = "권한 없음", body = ErrorResponse),
        (status = 404, description = "수비수 없음", body = ErrorResponse)
    ),
    tag = "Defender"
)]
pub async fn delete_defender(
    State(state): State<AppState>,
    user: AuthUser,
    Path(defender_id): Path<i64>,
) -> Result<Json<BaseResponse<()>>, AppError> {
    DefenderService::delete_defender(state, user.user_id()?, defender_id).await?;
    Ok(Json(BaseResponse::success_with_message("수비수가 삭제되었습니다.")))
}

/// 수비수 통계 API
#[utoipa::path(
    get,
    path = "/api/defenders/{defender_id}/stats",
    params(("defender_id" = i64, Path, description = "수비수 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "조회 성공", body = DefenderStatsResponse),
        (status = 404, description = "수비수 없음", body = ErrorResponse)
    ),
    tag = "Defender"
)]
pub async fn get_defender_stats(
    State(state): State<AppState>,
    user: AuthUser,
    Path(defender_id): Path<i64>,
) -> Result<Json<BaseResponse<DefenderStatsResponse>>, AppError> {
    let result = DefenderService::get_stats(state, user.user_id()?, defender_id).await?;
    Ok(Json(BaseResponse::success(result)))
}
