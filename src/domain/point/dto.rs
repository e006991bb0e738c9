use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::entity::matchup::{self, MatchupResult};
use super::entity::point;

/// 포인트 최대 출전 수비수 수 (한 라인)
pub const MAX_POINT_DEFENDERS: usize = 7;

// ============== 요청 ==============

/// 포인트 생성 요청
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePointRequest {
    pub game_id: i64,

    /// 브레이크 성공 여부
    pub got_break: bool,

    #[validate(range(min = 0, max = 200, message = "풍속은 0~200 사이여야 합니다."))]
    pub wind_speed: Option<i32>,

    #[validate(length(max = 20, message = "풍향은 20자를 초과할 수 없습니다."))]
    pub wind_direction: Option<String>,

    #[validate(length(max = 500, message = "메모는 500자를 초과할 수 없습니다."))]
    pub notes: Option<String>,

    /// 이 포인트를 실제로 뛴 수비수 (통계 집계 기준)
    #[validate(length(max = 7, message = "포인트당 수비수는 최대 7명입니다."))]
    #[serde(default)]
    pub selected_defender_ids: Vec<i64>,

    /// 공격수별 수비 배정 (표시용)
    #[serde(default)]
    pub matchups: Vec<MatchupInput>,

    /// 재전송 중복 방지 키 (같은 게임에서 같은 키면 기존 포인트 반환)
    #[validate(length(min = 1, max = 64, message = "clientKey는 1~64자여야 합니다."))]
    pub client_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchupInput {
    pub offensive_player_id: i64,
    pub defender_id: Option<i64>,
    pub result: Option<MatchupResult>,
    pub is_active: Option<bool>,
}

/// 포인트 수정 요청 (출전 수비수 목록은 수정 대상이 아님)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePointRequest {
    pub got_break: Option<bool>,

    #[validate(range(min = 0, max = 200, message = "풍속은 0~200 사이여야 합니다."))]
    pub wind_speed: Option<i32>,

    #[validate(length(max = 20, message = "풍향은 20자를 초과할 수 없습니다."))]
    pub wind_direction: Option<String>,

    #[validate(length(max = 500, message = "메모는 500자를 초과할 수 없습니다."))]
    pub notes: Option<String>,
}

/// 매치업 수정 요청 (통계는 재계산하지 않음)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMatchupRequest {
    pub defender_id: Option<i64>,
    pub result: MatchupResult,
    pub is_active: bool,
}

// ============== 응답 ==============

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchupResponse {
    pub matchup_id: i64,
    pub point_id: i64,
    pub offensive_player_id: i64,
    pub defender_id: Option<i64>,
    pub result: MatchupResult,
    pub is_active: bool,
}

impl From<matchup::Model> for MatchupResponse {
    fn from(m: matchup::Model) -> Self {
        Self {
            matchup_id: m.matchup_id,
            point_id: m.point_id,
            offensive_player_id: m.offensive_player_id,
            defender_id: m.defender_id,
            result: m.result,
            is_active: m.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PointResponse {
    pub point_id: i64,
    pub game_id: i64,
    pub point_number: i32,
    pub got_break: bool,
    pub wind_speed: Option<i32>,
    pub wind_direction: Option<String>,
    pub notes: Option<String>,
    pub selected_defender_ids: Vec<i64>,
    pub matchups: Vec<MatchupResponse>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl PointResponse {
    pub fn from_parts(
        p: point::Model,
        selected_defender_ids: Vec<i64>,
        matchups: Vec<matchup::Model>,
    ) -> Self {
        Self {
            point_id: p.point_id,
            game_id: p.game_id,
            point_number: p.point_number,
            got_break: p.got_break,
            wind_speed: p.wind_speed,
            wind_direction: p.wind_direction,
            notes: p.notes,
            selected_defender_ids,
            matchups: matchups.into_iter().map(MatchupResponse::from).collect(),
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletePointResponse {
    pub point_id: i64,
    pub point_number: i32,
    /// 삭제 후 번호가 당겨진 포인트 수
    pub renumbered: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_reject_eighth_point_defender() {
        let req: CreatePointRequest = serde_json::from_value(serde_json::json!({
            "gameId": 1,
            "gotBreak": true,
            "selectedDefenderIds": [1, 2, 3, 4, 5, 6, 7, 8]
        }))
        .unwrap();

        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("selected_defender_ids"));
    }

    #[test]
    fn should_default_missing_lists() {
        let req: CreatePointRequest = serde_json::from_value(serde_json::json!({
            "gameId": 1,
            "gotBreak": false
        }))
        .unwrap();

        assert!(req.selected_defender_ids.is_empty());
        assert!(req.matchups.is_empty());
        assert!(req.validate().is_ok());
    }
}
