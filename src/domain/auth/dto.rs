use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// 사용자명 유효성 검증 (영문, 숫자, `_`, `-`만 허용)
fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        Ok(())
    } else {
        Err(ValidationError::new("username_invalid_chars"))
    }
}

/// 회원가입 요청 DTO
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// 사용자명 (3~30자)
    #[validate(
        length(min = 3, max = 30, message = "사용자명은 3~30자 이내로 입력해야 합니다"),
        custom(
            function = "validate_username",
            message = "사용자명에는 영문, 숫자, _, -만 사용할 수 있습니다"
        )
    )]
    pub username: String,

    #[validate(email(message = "이메일 형식이 올바르지 않습니다"))]
    pub email: String,

    /// 비밀번호 (8~72자)
    #[validate(length(min = 8, max = 72, message = "비밀번호는 8~72자여야 합니다"))]
    pub password: String,
}

/// 로그인 요청 DTO (사용자명 또는 이메일)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "사용자명 또는 이메일은 필수입니다"))]
    pub identifier: String,

    #[validate(length(min = 1, message = "비밀번호는 필수입니다"))]
    pub password: String,
}

/// 로그인/회원가입 응답 DTO
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub user_id: i64,
    pub username: String,
    pub access_token: String,
    pub token_type: String,
    /// 만료까지 남은 초
    pub expires_in: i64,
}
