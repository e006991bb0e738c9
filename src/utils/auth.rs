use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::jwt::{decode_access_token, Claims};

/// 인증된 사용자 정보를 담는 Extractor
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// JWT Claims에서 사용자 ID를 추출합니다.
    pub fn user_id(&self) -> Result<i64, AppError> {
        parse_user_id(&self.0)
    }
}

/// 인증이 선택적인 경로(공개 게임 조회 등)용 Extractor
///
/// Authorization 헤더가 없으면 `None`, 있는데 유효하지 않으면 401을 반환합니다.
pub struct OptionalAuthUser(pub Option<Claims>);

impl OptionalAuthUser {
    pub fn user_id(&self) -> Result<Option<i64>, AppError> {
        self.0.as_ref().map(parse_user_id).transpose()
    }
}

fn parse_user_id(claims: &Claims) -> Result<i64, AppError> {
    claims
        .sub
        .parse()
        .map_err(|_| AppError::Unauthorized("유효하지 않은 사용자 ID입니다.".to_string()))
}

/// 헤더 외 경로(WebSocket 쿼리 등)로 받은 토큰에서 사용자 ID 추출
pub fn user_id_from_token(token: &str, secret: &str) -> Result<i64, AppError> {
    let claims = decode_access_token(token, secret)?;
    parse_user_id(&claims)
}

/// `Authorization: Bearer <token>` 헤더에서 토큰을 꺼냅니다.
pub fn bearer_token(parts: &Parts) -> Result<Option<String>, AppError> {
    let Some(auth_header) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_header_str = auth_header
        .to_str()
        .map_err(|_| AppError::Unauthorized("잘못된 헤더 형식입니다.".to_string()))?;

    auth_header_str
        .strip_prefix("Bearer ")
        .map(|token| Some(token.trim().to_string()))
        .ok_or_else(|| AppError::Unauthorized("토큰 형식이 올바르지 않습니다.".to_string()))
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?
            .ok_or_else(|| AppError::Unauthorized("로그인이 필요합니다.".to_string()))?;

        let claims = decode_access_token(&token, &state.config.jwt_secret)?;

        Ok(AuthUser(claims))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for OptionalAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match bearer_token(parts)? {
            Some(token) => {
                let claims = decode_access_token(&token, &state.config.jwt_secret)?;
                Ok(OptionalAuthUser(Some(claims)))
            }
            None => Ok(OptionalAuthUser(None)),
        }
    }
}
