use serde::Serialize;
use utoipa::ToSchema;

/// API 명세에 맞는 기본 응답 구조체
///
/// 형식:
/// ```json
/// {
///   "isSuccess": true,
///   "code": "COMMON200",
///   "message": "성공입니다.",
///   "result": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseResponse<T: Serialize> {
    pub is_success: bool,
    pub code: String,
    pub message: String,
    pub result: Option<T>,
}

impl<T: Serialize> BaseResponse<T> {
    /// 성공 응답 생성
    pub fn success(result: T) -> Self {
        Self {
            is_success: true,
            code: "COMMON200".to_string(),
            message: "성공입니다.".to_string(),
            result: Some(result),
        }
    }

    /// 메시지를 지정한 성공 응답 생성
    pub fn success_with_result(message: impl Into<String>, result: T) -> Self {
        Self {
            is_success: true,
            code: "COMMON200".to_string(),
            message: message.into(),
            result: Some(result),
        }
    }

    /// 결과 없는 성공 응답 생성
    pub fn success_with_message(message: impl Into<String>) -> Self {
        Self {
            is_success: true,
            code: "COMMON200".to_string(),
            message: message.into(),
            result: None,
        }
    }
}

impl BaseResponse<()> {
    /// 에러 응답 생성 (미들웨어 등 AppError를 거치지 않는 경로용)
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            is_success: false,
            code: code.into(),
            message: message.into(),
            result: None,
        }
    }
}

/// 필드 단위 검증 실패 정보
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// 에러 응답 구조체
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub is_success: bool,
    pub code: String,
    pub message: String,
    pub result: Option<Vec<FieldError>>,
}

impl ErrorResponse {
    /// 에러 응답 생성
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            is_success: false,
            code: code.into(),
            message: message.into(),
            result: None,
        }
    }

    /// 필드 상세를 포함한 검증 에러 응답 생성
    pub fn with_fields(
        code: impl Into<String>,
        message: impl Into<String>,
        fields: Vec<FieldError>,
    ) -> Self {
        Self {
            is_success: false,
            code: code.into(),
            message: message.into(),
            result: Some(fields),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_serialize_success_in_camel_case() {
        let json = serde_json::to_value(BaseResponse::success(42)).unwrap();

        assert_eq!(json["isSuccess"], true);
        assert_eq!(json["code"], "COMMON200");
        assert_eq!(json["result"], 42);
        assert!(json.get("is_success").is_none());
    }

    #[test]
    fn should_serialize_field_errors_as_result() {
        let body = ErrorResponse::with_fields(
            "COMMON400",
            "요청 값이 올바르지 않습니다.",
            vec![FieldError {
                field: "defenderIds".into(),
                message: "최대 7명".into(),
            }],
        );

        let json = serde_json::to_value(body).unwrap();

        assert_eq!(json["isSuccess"], false);
        assert_eq!(json["result"][0]["field"], "defenderIds");
    }
}
