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
    CreateTeamRequest, JoinTeamRequest, TeamDetailResponse, TeamMemberItem, TeamResponse,
    UpdateMemberRoleRequest,
};
use super::service::TeamService;

/// 팀 생성 API
///
/// 새로운 팀을 생성하고 생성자를 OWNER로 설정합니다.
#[utoipa::path(
    post,
    path = "/api/teams",
    request_body = CreateTeamRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "팀 생성 성공", body = TeamResponse),
        (status = 400, description = "잘못된 요청", body = ErrorResponse),
        (status = 401, description = "인증 실패", body = ErrorResponse)
    ),
    tag = "Team"
)]
pub async fn create_team(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<CreateTeamRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<TeamResponse>>, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let result = TeamService::create_team(state, user.user_id()?, req).await?;
    Ok(Json(BaseResponse::success(result)))
}

/// 내 팀 목록 API
#[utoipa::path(
    get,
    path = "/api/teams",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "조회 성공", body = [TeamResponse]),
        (status = 401, description = "인증 실패", body = ErrorResponse)
    ),
    tag = "Team"
)]
pub async fn list_my_teams(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<BaseResponse<Vec<TeamResponse>>>, AppError> {
    let result = TeamService::list_my_teams(state, user.user_id()?).await?;
    Ok(Json(BaseResponse::success(result)))
}

/// 팀 상세 API (멤버 포함)
#[utoipa::path(
    get,
    path = "/api/teams/{team_id}",
    params(("team_id" = i64, Path, description = "팀 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "조회 성공", body = TeamDetailResponse),
        (status = 403, description = "팀 멤버 아님", body = ErrorResponse),
        (status = 404, description = "팀 없음", body = ErrorResponse)
    ),
    tag = "Team"
)]
pub async fn get_team(
    State(state): State<AppState>,
    user: AuthUser,
    Path(team_id): Path<i64>,
) -> Result<Json<BaseResponse<TeamDetailResponse>>, AppError> {
    let result = TeamService::get_team(state, user.user_id()?, team_id).await?;
    Ok(Json(BaseResponse::success(result)))
}

/// 초대 코드로 팀 참여 API
#[utoipa::path(
    post,
    path = "/api/teams/join",
    request_body = JoinTeamRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "참여 성공", body = TeamResponse),
        (status = 404, description = "유효하지 않은 코드", body = ErrorResponse),
        (status = 409, description = "이미 멤버", body = ErrorResponse)
    ),
    tag = "Team"
)]
pub async fn join_team(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<JoinTeamRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<TeamResponse>>, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let result = TeamService::join_team(state, user.user_id()?, req).await?;
    Ok(Json(BaseResponse::success(result)))
}

/// 멤버 역할 변경 API (ADMIN 이상)
#[utoipa::path(
    put,
    path = "/api/teams/{team_id}/members/{user_id}/role",
    params(
        ("team_id" = i64, Path, description = "팀 ID"),
        ("user_id" = i64, Path, description = "대상 사용자 ID")
    ),
    request_body = UpdateMemberRoleRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "변경 성공", body = TeamMemberItem),
        (status = 400, description = "OWNER 부여 불가", body = ErrorResponse),
        (status = 403, description = "권한 없음", body = ErrorResponse)
    ),
    tag = "Team"
)]
pub async fn update_member_role(
    State(state): State<AppState>,
    user: AuthUser,
    Path((team_id, target_user_id)): Path<(i64, i64)>,
    payload: Result<Json<UpdateMemberRoleRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<TeamMemberItem>>, AppError> {
    let Json(req) = payload?;

    let result =
        TeamService::update_member_role(state, user.user_id()?, team_id, target_user_id, req)
            .await?;
    Ok(Json(BaseResponse::success(result)))
}

/// 멤버 내보내기 API (ADMIN 이상)
#[utoipa::path(
    delete,
    path = "/api/teams/{team_id}/members/{user_id}",
    params(
        ("team_id" = i64, Path, description = "팀 ID"),
        ("user_id" = i64, Path, description = "대상 사용자 ID")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "내보내기 성공"),
        (status = 403, description = "권한 없음", body = ErrorResponse)
    ),
    tag = "Team"
)]
pub async fn remove_member(
    State(state): State<AppState>,
    user: AuthUser,
    Path((team_id, target_user_id)): Path<(i64, i64)>,
) -> Result<Json<BaseResponse<()>>, AppError> {
    TeamService::remove_member(state, user.user_id()?, team_id, target_user_id).await?;
    Ok(Json(BaseResponse::success_with_message("멤버를 내보냈습니다.")))
}

/// 팀 나가기 API
#[utoipa::path(
    post,
    path = "/api/teams/{team_id}/leave",
    params(("team_id" = i64, Path, description = "팀 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "나가기 성공"),
        (status = 400, description = "위임할 ADMIN 없음", body = ErrorResponse)
    ),
    tag = "Team"
)]
pub async fn leave_team(
    State(state): State<AppState>,
    user: AuthUser,
    Path(team_id): Path<i64>,
) -> Result<Json<BaseResponse<()>>, AppError> {
    TeamService::leave_team(state, user.user_id()?, team_id).await?;
    Ok(Json(BaseResponse::success_with_message("팀을 나갔습니다.")))
}

/// 팀 삭제 API (OWNER)
#[utoipa::path(
    delete,
    path = "/api/teams/{team_id}",
    params(("team_id" = i64, Path, description = "팀 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "삭제 성공"),
        (status = 403, description = "권한 없음", body = ErrorResponse)
    ),
    tag = "Team"
)]
pub async fn delete_team(
    State(state): State<AppState>,
    user: AuthUser,
    Path(team_id): Path<i64>,
) -> Result<Json<BaseResponse<()>>, AppError> {
    TeamService::delete_team(state, user.user_id()?, team_id).await?;
    Ok(Json(BaseResponse::success_with_message("팀이 삭제되었습니다.")))
}
