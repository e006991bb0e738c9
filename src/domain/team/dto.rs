use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::entity::team;
use super::entity::team_member::TeamRole;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamRequest {
    #[validate(length(min = 1, max = 50, message = "팀 이름은 1~50자여야 합니다."))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JoinTeamRequest {
    /// 초대 코드 (대소문자 구분 없음)
    #[validate(length(min = 1, max = 16, message = "초대 코드 형식이 올바르지 않습니다."))]
    pub invite_code: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberRoleRequest {
    pub role: TeamRole,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamResponse {
    pub team_id: i64,
    pub name: String,
    pub slug: String,
    pub invite_code: String,
    pub my_role: TeamRole,
    pub created_at: NaiveDateTime,
}

impl TeamResponse {
    pub fn new(team: team::Model, my_role: TeamRole) -> Self {
        Self {
            team_id: team.team_id,
            name: team.name,
            slug: team.slug,
            invite_code: team.invite_code,
            my_role,
            created_at: team.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberItem {
    pub user_id: i64,
    pub username: String,
    pub role: TeamRole,
    pub joined_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamDetailResponse {
    pub team: TeamResponse,
    pub members: Vec<TeamMemberItem>,
}

/// 초대 코드 정규화 (앞뒤 공백 제거, 대문자)
pub fn normalize_invite_code(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::random::INVITE_CODE_LENGTH;

    #[test]
    fn should_normalize_invite_code_case() {
        assert_eq!(normalize_invite_code(" abcd2345 "), "ABCD2345");
        assert_eq!(normalize_invite_code("abcd2345").len(), INVITE_CODE_LENGTH);
    }
}
