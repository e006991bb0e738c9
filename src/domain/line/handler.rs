use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use validator::Validate;

use crate::domain::lineup::dto::SelectedDefendersResponse;
use crate::state::AppState;
use crate::utils::auth::AuthUser;
use crate::utils::error::AppError;
use crate::utils::BaseResponse;

use super::dto::{CreateLineRequest, LineResponse, UpdateLineRequest};
use super::service::LineService;

/// 팀 라인 목록 API
#[utoipa::path(
    get,
    path = "/api/lines/team/{team_id}",
    params(("team_id" = i64, Path, description = "팀 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "조회 성공", body = [LineResponse]),
        (status = 403, description = "팀 멤버 아님", body = ErrorResponse)
    ),
    tag = "Line"
)]
pub async fn list_lines(
    State(state): State<AppState>,
    user: AuthUser,
    Path(team_id): Path<i64>,
) -> Result<Json<BaseResponse<Vec<LineResponse>>>, AppError> {
    let result = LineService::list_lines(state, user.user_id()?, team_id).await?;
    Ok(Json(BaseResponse::success(result)))
}

/// 라인 생성 API
#[utoipa::path(
    post,
    path = "/api/lines",
    request_body = CreateLineRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "생성 성공", body = LineResponse),
        (status = 400, description = "잘못된 요청", body = ErrorResponse),
        (status = 403, description = "권한 없음", body = ErrorResponse)
    ),
    tag = "Line"
)]
pub async fn create_line(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<CreateLineRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<LineResponse>>, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let result = LineService::create_line(state, user.user_id()?, req).await?;
    Ok(Json(BaseResponse::success(result)))
}

/// 라인 수정 API
#[utoipa::path(
    put,
    path = "/api/lines/{line_id}",
    params(("line_id" = i64, Path, description = "라인 ID")),
    request_body = UpdateLineRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "수정 성공", body = LineResponse),
        (status = 404, description = "라인 없음", body = ErrorResponse)
    ),
    tag = "Line"
)]
pub async fn update_line(
    State(state): State<AppState>,
    user: AuthUser,
    Path(line_id): Path<i64>,
    payload: Result<Json<UpdateLineRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<LineResponse>>, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let result = LineService::update_line(state, user.user_id()?, line_id, req).await?;
    Ok(Json(BaseResponse::success(result)))
}

/// 라인 삭제 API (ADMIN 이상)
#[utoipa::path(
    delete,
    path = "/api/lines/{line_id}",
    params(("line_id" = i64, Path, description = "라인 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "삭제 성공"),
        (status = 403, description = "권한 없음", body = ErrorResponse),
        (status = 404, description = "라인 없음", body = ErrorResponse)
    ),
    tag = "Line"
)]
pub async fn delete_line(
    State(state): State<AppState>,
    user: AuthUser,
    Path(line_id): Path<i64>,
) -> Result<Json<BaseResponse<()>>, AppError> {
    LineService::delete_line(state, user.user_id()?, line_id).await?;
    Ok(Json(BaseResponse::success_with_message("라인이 삭제되었습니다.")))
}

/// 라인을 게임 선택 수비수로 적용하는 API
#[utoipa::path(
    post,
    path = "/api/lines/{line_id}/apply/{game_id}",
    params(
        ("line_id" = i64, Path, description = "라인 ID"),
        ("game_id" = i64, Path, description = "게임 ID")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "적용 성공", body = SelectedDefendersResponse),
        (status = 400, description = "다른 팀의 라인", body = ErrorResponse),
        (status = 404, description = "라인 또는 게임 없음", body = ErrorResponse)
    ),
    tag = "Line"
)]
pub async fn apply_line(
    State(state): State<AppState>,
    user: AuthUser,
    Path((line_id, game_id)): Path<(i64, i64)>,
) -> Result<Json<BaseResponse<SelectedDefendersResponse>>, AppError> {
    let result = LineService::apply_to_game(state, user.user_id()?, line_id, game_id).await?;
    Ok(Json(BaseResponse::success(result)))
}
