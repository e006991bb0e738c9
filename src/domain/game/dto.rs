use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::defender::dto::DefenderStatsItem;
use crate::domain::lineup::dto::CurrentPointDefenderItem;
use crate::domain::point::dto::PointResponse;

use super::entity::activity;
use super::entity::game::{self, GameStatus};
use super::entity::offensive_player::{self, PlayerPosition};

// ============== 요청 ==============

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    pub team_id: i64,

    #[validate(length(min = 1, max = 100, message = "게임 이름은 1~100자여야 합니다."))]
    pub name: String,

    #[validate(length(min = 1, max = 100, message = "상대 팀 이름은 1~100자여야 합니다."))]
    pub opponent: String,

    #[validate(length(max = 100, message = "장소는 100자를 초과할 수 없습니다."))]
    pub location: Option<String>,

    /// 경기 일시 (예: 2026-05-01T10:00:00)
    #[schema(value_type = String, example = "2026-05-01T10:00:00")]
    pub game_date: NaiveDateTime,

    #[serde(default)]
    pub is_public: bool,

    #[validate(length(max = 1000, message = "메모는 1000자를 초과할 수 없습니다."))]
    pub notes: Option<String>,
}

/// 게임 수정 요청. 상태 전이 제약은 없습니다.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGameRequest {
    #[validate(length(min = 1, max = 100, message = "게임 이름은 1~100자여야 합니다."))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 100, message = "상대 팀 이름은 1~100자여야 합니다."))]
    pub opponent: Option<String>,

    #[validate(length(max = 100, message = "장소는 100자를 초과할 수 없습니다."))]
    pub location: Option<String>,

    #[schema(value_type = Option<String>)]
    pub game_date: Option<NaiveDateTime>,

    pub status: Option<GameStatus>,

    pub is_public: Option<bool>,

    #[validate(length(max = 1000, message = "메모는 1000자를 초과할 수 없습니다."))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddPlayerRequest {
    #[validate(length(min = 1, max = 50, message = "선수 이름은 1~50자여야 합니다."))]
    pub name: String,

    pub position: PlayerPosition,

    #[serde(default)]
    pub is_bench: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlayerRequest {
    #[validate(length(min = 1, max = 50, message = "선수 이름은 1~50자여야 합니다."))]
    pub name: Option<String>,

    pub position: Option<PlayerPosition>,

    pub is_bench: Option<bool>,
}

/// 공격수 순서 재정렬. 게임의 모든 공격수 id를 원하는 순서로 전달합니다.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReorderPlayersRequest {
    #[validate(length(min = 1, message = "공격수 목록이 비어 있습니다."))]
    pub offensive_player_ids: Vec<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailableDefenderRequest {
    pub defender_id: i64,
}

// ============== 응답 ==============

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameResponse {
    pub game_id: i64,
    pub team_id: i64,
    pub name: String,
    pub opponent: String,
    pub location: Option<String>,
    #[schema(value_type = String)]
    pub game_date: NaiveDateTime,
    pub slug: String,
    pub share_code: String,
    pub status: GameStatus,
    pub is_public: bool,
    pub notes: Option<String>,
    #[schema(value_type = String)]
    pub created_at: NaiveDateTime,
    #[schema(value_type = String)]
    pub updated_at: NaiveDateTime,
}

impl From<game::Model> for GameResponse {
    fn from(g: game::Model) -> Self {
        Self {
            game_id: g.game_id,
            team_id: g.team_id,
            name: g.name,
            opponent: g.opponent,
            location: g.location,
            game_date: g.game_date,
            slug: g.slug,
            share_code: g.share_code,
            status: g.status,
            is_public: g.is_public,
            notes: g.notes,
            created_at: g.created_at,
            updated_at: g.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OffensivePlayerResponse {
    pub offensive_player_id: i64,
    pub game_id: i64,
    pub name: String,
    pub position: PlayerPosition,
    pub is_bench: bool,
    pub order: i32,
}

impl From<offensive_player::Model> for OffensivePlayerResponse {
    fn from(p: offensive_player::Model) -> Self {
        Self {
            offensive_player_id: p.offensive_player_id,
            game_id: p.game_id,
            name: p.name,
            position: p.position,
            is_bench: p.is_bench,
            order: p.sort_order,
        }
    }
}

/// 게임 전체 상태 (클라이언트가 이벤트 수신 후 다시 조회하는 단위)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameDetailResponse {
    pub game: GameResponse,
    pub players: Vec<OffensivePlayerResponse>,
    pub available_defender_ids: Vec<i64>,
    pub selected_defender_ids: Vec<i64>,
    pub current_point_defenders: Vec<CurrentPointDefenderItem>,
    pub points: Vec<PointResponse>,
    pub defender_stats: Vec<DefenderStatsItem>,
    /// 현재 실시간 중계 seq (이후 이벤트와 비교해 누락 판단)
    pub live_seq: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityItem {
    pub activity_id: i64,
    pub user_id: i64,
    pub action: String,
    pub detail: Option<String>,
    #[schema(value_type = String)]
    pub created_at: NaiveDateTime,
}

impl From<activity::Model> for ActivityItem {
    fn from(a: activity::Model) -> Self {
        Self {
            activity_id: a.activity_id,
            user_id: a.user_id,
            action: a.action,
            detail: a.detail,
            created_at: a.created_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ActivityQuery {
    /// 최근 N건 (기본 50, 최대 200)
    pub limit: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_create_game_request() {
        let req: CreateGameRequest = serde_json::from_value(serde_json::json!({
            "teamId": 1,
            "name": "Pool Play 1",
            "opponent": "Rival",
            "gameDate": "2026-05-01T10:00:00"
        }))
        .unwrap();

        assert!(!req.is_public);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn should_reject_empty_opponent() {
        let req: CreateGameRequest = serde_json::from_value(serde_json::json!({
            "teamId": 1,
            "name": "Final",
            "opponent": "",
            "gameDate": "2026-05-01T10:00:00"
        }))
        .unwrap();

        assert!(req.validate().is_err());
    }
}
