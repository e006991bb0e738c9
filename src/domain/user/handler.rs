use axum::{extract::State, Json};

use super::dto::MeResponse;
use super::service::UserService;
use crate::state::AppState;
use crate::utils::auth::AuthUser;
use crate::utils::error::AppError;
use crate::utils::BaseResponse;

/// 내 정보 조회 API
///
/// Authorization 헤더의 Bearer 토큰으로 사용자를 식별합니다.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "조회 성공", body = MeResponse),
        (status = 401, description = "인증 실패", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn get_me(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<BaseResponse<MeResponse>>, AppError> {
    let result = UserService::get_me(state, user.user_id()?).await?;
    Ok(Json(BaseResponse::success(result)))
}
