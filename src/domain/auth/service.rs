use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, Set};
use tracing::{info, warn};

use super::dto::{LoginRequest, RegisterRequest, TokenResponse};
use crate::domain::user::entity::user;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::jwt::encode_token;
use crate::utils::password::{hash_password, verify_password};

pub struct AuthService;

impl AuthService {
    /// 회원가입 (가입 즉시 액세스 토큰 발급)
    pub async fn register(state: AppState, req: RegisterRequest) -> Result<TokenResponse, AppError> {
        let email = req.email.trim().to_lowercase();

        let duplicate = user::Entity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Username.eq(&req.username))
                    .add(user::Column::Email.eq(&email)),
            )
            .one(&state.db)
            .await?;
        if let Some(existing) = duplicate {
            let field = if existing.username == req.username {
                "사용자명"
            } else {
                "이메일"
            };
            return Err(AppError::conflict(format!("이미 사용 중인 {}입니다.", field)));
        }

        let password_hash = hash_password(&req.password)?;
        let now = Utc::now().naive_utc();
        let created = user::ActiveModel {
            username: Set(req.username),
            email: Set(email),
            password_hash: Set(password_hash),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&state.db)
        .await?;

        info!(user_id = created.user_id, "회원가입 완료");
        Self::issue(&state, created)
    }

    /// 로그인 (사용자명 또는 이메일)
    pub async fn login(state: AppState, req: LoginRequest) -> Result<TokenResponse, AppError> {
        let identifier = req.identifier.trim();

        let found = user::Entity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Username.eq(identifier))
                    .add(user::Column::Email.eq(identifier.to_lowercase())),
            )
            .one(&state.db)
            .await?;

        let Some(found) = found else {
            warn!("로그인 실패: 존재하지 않는 사용자");
            return Err(AppError::unauthorized(
                "사용자명 또는 비밀번호가 올바르지 않습니다.",
            ));
        };

        if !verify_password(&req.password, &found.password_hash)? {
            warn!(user_id = found.user_id, "로그인 실패: 비밀번호 불일치");
            return Err(AppError::unauthorized(
                "사용자명 또는 비밀번호가 올바르지 않습니다.",
            ));
        }

        info!(user_id = found.user_id, "로그인 성공");
        Self::issue(&state, found)
    }

    fn issue(state: &AppState, user: user::Model) -> Result<TokenResponse, AppError> {
        let access_token = encode_token(
            user.user_id.to_string(),
            &state.config.jwt_secret,
            state.config.jwt_expiration,
        )?;

        Ok(TokenResponse {
            user_id: user.user_id,
            username: user.username,
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: state.config.jwt_expiration,
        })
    }
}
