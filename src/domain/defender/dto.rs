use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::point::stats::break_percentage;

use super::entity::defender;
use super::entity::defender_stats;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDefenderRequest {
    pub team_id: i64,

    #[validate(length(min = 1, max = 50, message = "수비수 이름은 1~50자여야 합니다."))]
    pub name: String,

    #[validate(range(min = 0, max = 99, message = "등번호는 0~99 사이여야 합니다."))]
    pub jersey_number: Option<i32>,

    #[validate(length(max = 30, message = "포지션은 30자를 초과할 수 없습니다."))]
    pub position: Option<String>,

    #[validate(length(max = 500, message = "메모는 500자를 초과할 수 없습니다."))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDefenderRequest {
    #[validate(length(min = 1, max = 50, message = "수비수 이름은 1~50자여야 합니다."))]
    pub name: Option<String>,

    #[validate(range(min = 0, max = 99, message = "등번호는 0~99 사이여야 합니다."))]
    pub jersey_number: Option<i32>,

    #[validate(length(max = 30, message = "포지션은 30자를 초과할 수 없습니다."))]
    pub position: Option<String>,

    #[validate(length(max = 500, message = "메모는 500자를 초과할 수 없습니다."))]
    pub notes: Option<String>,

    pub active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DefenderResponse {
    pub defender_id: i64,
    pub team_id: i64,
    pub name: String,
    pub jersey_number: Option<i32>,
    pub position: Option<String>,
    pub notes: Option<String>,
    pub active: bool,
    pub created_at: NaiveDateTime,
}

impl From<defender::Model> for DefenderResponse {
    fn from(d: defender::Model) -> Self {
        Self {
            defender_id: d.defender_id,
            team_id: d.team_id,
            name: d.name,
            jersey_number: d.jersey_number,
            position: d.position,
            notes: d.notes,
            active: d.active,
            created_at: d.created_at,
        }
    }
}

/// 수비수-게임 단위 저장 통계
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DefenderStatsItem {
    pub defender_id: i64,
    pub game_id: i64,
    pub points_played: i32,
    pub breaks: i32,
    pub no_breaks: i32,
    pub break_percentage: i32,
}

impl From<defender_stats::Model> for DefenderStatsItem {
    fn from(s: defender_stats::Model) -> Self {
        Self {
            defender_id: s.defender_id,
            game_id: s.game_id,
            points_played: s.points_played,
            breaks: s.breaks,
            no_breaks: s.no_breaks,
            break_percentage: break_percentage(s.breaks, s.points_played),
        }
    }
}

/// 수비수 통계 조회 응답 (게임별 + 합계)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DefenderStatsResponse {
    pub defender: DefenderResponse,
    pub games: Vec<DefenderStatsItem>,
    pub total_points_played: i32,
    pub total_breaks: i32,
    pub total_no_breaks: i32,
    pub break_percentage: i32,
}

impl DefenderStatsResponse {
    pub fn new(defender: DefenderResponse, games: Vec<DefenderStatsItem>) -> Self {
        let total_points_played = games.iter().map(|g| g.points_played).sum();
        let total_breaks = games.iter().map(|g| g.breaks).sum();
        let total_no_breaks = games.iter().map(|g| g.no_breaks).sum();
        Self {
            defender,
            games,
            total_points_played,
            total_breaks,
            total_no_breaks,
            break_percentage: break_percentage(total_breaks, total_points_played),
        }
    }
}
