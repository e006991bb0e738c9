use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::error::AppError;

const ACCESS_TOKEN_TYPE: &str = "access";

/// 액세스 토큰 Claims. `sub`는 user_id 문자열입니다.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

impl Claims {
    fn access(sub: String, ttl_seconds: i64) -> Result<Self, AppError> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(Duration::seconds(ttl_seconds))
            .ok_or_else(|| AppError::internal_error("토큰 만료 시각 계산 실패"))?;

        Ok(Self {
            sub,
            iat: now.timestamp() as usize,
            exp: exp.timestamp() as usize,
            token_type: Some(ACCESS_TOKEN_TYPE.to_string()),
        })
    }
}

/// HS256 액세스 토큰 발급
pub fn encode_token(sub: String, secret: &str, ttl_seconds: i64) -> Result<String, AppError> {
    let claims = Claims::access(sub, ttl_seconds)?;
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalError(format!("토큰 생성 실패: {}", e)))
}

/// 서명/만료를 검증하고 액세스 토큰인지 확인
pub fn decode_access_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::Unauthorized("토큰이 만료되었습니다.".into()),
        _ => AppError::Unauthorized("유효하지 않은 토큰입니다.".into()),
    })?;

    if claims.token_type.as_deref() != Some(ACCESS_TOKEN_TYPE) {
        return Err(AppError::Unauthorized(
            "유효하지 않은 토큰 타입입니다.".into(),
        ));
    }
    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_round_trip_user_id() {
        let token = encode_token("42".to_string(), "secret", 3600).unwrap();

        let claims = decode_access_token(&token, "secret").unwrap();

        assert_eq!(claims.sub, "42");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn should_reject_garbage_and_foreign_secret() {
        assert!(matches!(
            decode_access_token("garbage", "secret"),
            Err(AppError::Unauthorized(_))
        ));

        let token = encode_token("1".to_string(), "secret-a", 3600).unwrap();
        assert!(decode_access_token(&token, "secret-b").is_err());
    }

    #[test]
    fn should_report_expired_token() {
        // 기본 leeway(60초)보다 충분히 과거
        let token = encode_token("1".to_string(), "secret", -3600).unwrap();

        let err = decode_access_token(&token, "secret").unwrap_err();

        assert_eq!(err.to_string(), "토큰이 만료되었습니다.");
    }

    #[test]
    fn should_reject_token_without_access_type() {
        let claims = Claims {
            sub: "1".to_string(),
            iat: Utc::now().timestamp() as usize,
            exp: (Utc::now().timestamp() + 600) as usize,
            token_type: None,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        assert!(decode_access_token(&token, "secret").is_err());
    }
}
