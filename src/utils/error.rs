use std::sync::OnceLock;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use tracing::{error, warn};
use validator::ValidationErrors;

use super::response::{ErrorResponse, FieldError};

/// 내부 오류 메시지를 응답에 노출할지 여부 (development 환경에서만 true)
static EXPOSE_INTERNAL_ERRORS: OnceLock<bool> = OnceLock::new();

/// 서버 시작 시 한 번 호출합니다. 이후 호출은 무시됩니다.
pub fn set_expose_internal_errors(expose: bool) {
    let _ = EXPOSE_INTERNAL_ERRORS.set(expose);
}

fn expose_internal_errors() -> bool {
    EXPOSE_INTERNAL_ERRORS.get().copied().unwrap_or(false)
}

/// 애플리케이션 전역 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("요청 값이 올바르지 않습니다.")]
    Validation(Vec<FieldError>),
    #[error("잘못된 요청 형식입니다: {0}")]
    JsonParseFailed(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    /// 팀 멤버가 아닌 경우
    #[error("{0}")]
    TeamAccessDenied(String),
    /// 팀 멤버이지만 역할이 부족한 경우
    #[error("{0}")]
    InsufficientRole(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    InternalError(String),
}

impl AppError {
    /// 에러 코드 반환
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => "COMMON400",
            AppError::Validation(_) => "COMMON400",
            AppError::JsonParseFailed(_) => "COMMON400",
            AppError::Unauthorized(_) => "AUTH4001",
            AppError::Forbidden(_) => "COMMON403",
            AppError::TeamAccessDenied(_) => "TEAM4031",
            AppError::InsufficientRole(_) => "TEAM4032",
            AppError::NotFound(_) => "COMMON404",
            AppError::Conflict(_) => "COMMON409",
            AppError::InternalError(_) => "COMMON500",
        }
    }

    /// HTTP 상태 코드 반환
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::Validation(_) | AppError::JsonParseFailed(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_)
            | AppError::TeamAccessDenied(_)
            | AppError::InsufficientRole(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 클라이언트에 노출할 메시지
    pub fn message(&self) -> String {
        match self {
            AppError::InternalError(_) if !expose_internal_errors() => {
                "서버 내부 오류가 발생했습니다.".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        match &self {
            AppError::InternalError(msg) => error!(code, "Internal Server Error: {}", msg),
            other => warn!(code, status = status.as_u16(), "{}", other),
        }

        let body = match self {
            AppError::Validation(fields) => {
                ErrorResponse::with_fields(code, "요청 값이 올바르지 않습니다.", fields)
            }
            other => ErrorResponse::new(code, other.message()),
        };

        (status, Json(body)).into_response()
    }
}

/// JsonRejection을 AppError로 변환
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::JsonParseFailed(rejection.body_text())
    }
}

/// validator 에러를 필드 단위 상세 정보로 변환
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let field = field.to_string();
                errs.iter().map(move |e| FieldError {
                    field: field.clone(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::Validation(fields)
    }
}

/// 영속성 계층 에러 매핑 (unique 위반 → 409, 레코드 없음 → 404)
impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
            return AppError::Conflict(format!("이미 존재하는 데이터입니다: {}", detail));
        }
        match err {
            DbErr::RecordNotFound(msg) => AppError::NotFound(msg),
            other => AppError::InternalError(other.to_string()),
        }
    }
}

/// 편의 함수들
impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        AppError::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        AppError::Forbidden(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    pub fn internal_error(msg: impl Into<String>) -> Self {
        AppError::InternalError(msg.into())
    }

    /// 단일 필드 검증 실패
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation(vec![FieldError {
            field: field.to_string(),
            message: message.into(),
        }])
    }
}
