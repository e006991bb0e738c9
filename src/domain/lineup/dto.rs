use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::entity::current_point_defender;

/// Call-Your-Line 전체 교체 요청
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSelectedDefendersRequest {
    #[validate(length(max = 7, message = "라인에는 최대 7명까지 선택할 수 있습니다."))]
    pub defender_ids: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectedDefendersResponse {
    pub game_id: i64,
    pub defender_ids: Vec<i64>,
    /// 선택 해제로 배정이 지워진 공격수
    pub cleared_offensive_player_ids: Vec<i64>,
}

/// 현재 포인트 배정 설정/해제 (defenderId가 null이면 해제)
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignCurrentPointRequest {
    pub offensive_player_id: i64,
    pub defender_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CurrentPointDefenderItem {
    pub offensive_player_id: i64,
    pub defender_id: i64,
}

impl From<current_point_defender::Model> for CurrentPointDefenderItem {
    fn from(m: current_point_defender::Model) -> Self {
        Self {
            offensive_player_id: m.offensive_player_id,
            defender_id: m.defender_id,
        }
    }
}
