use chrono::NaiveDateTime;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::team::dto::TeamResponse;

use super::entity::user;

/// 내 정보 응답 (소속 팀과 역할 포함)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub created_at: NaiveDateTime,
    pub teams: Vec<TeamResponse>,
}

impl MeResponse {
    pub fn new(user: user::Model, teams: Vec<TeamResponse>) -> Self {
        Self {
            user_id: user.user_id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
            teams,
        }
    }
}
