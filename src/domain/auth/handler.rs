use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use validator::Validate;

use super::dto::{LoginRequest, RegisterRequest, TokenResponse};
use super::service::AuthService;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::BaseResponse;

/// 회원가입 API
///
/// 사용자명/이메일 중복 시 409를 반환합니다. 가입 즉시 액세스 토큰이 발급됩니다.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "가입 성공", body = TokenResponse),
        (status = 400, description = "잘못된 요청", body = ErrorResponse),
        (status = 409, description = "사용자명 또는 이메일 중복", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<TokenResponse>>, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let result = AuthService::register(state, req).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 로그인 API
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "로그인 성공", body = TokenResponse),
        (status = 401, description = "사용자명 또는 비밀번호 불일치", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<TokenResponse>>, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let result = AuthService::login(state, req).await?;

    Ok(Json(BaseResponse::success(result)))
}
