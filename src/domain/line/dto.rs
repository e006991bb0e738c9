use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::entity::defensive_line;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLineRequest {
    pub team_id: i64,

    #[validate(length(min = 1, max = 50, message = "라인 이름은 1~50자여야 합니다."))]
    pub name: String,

    #[validate(length(max = 7, message = "라인에는 최대 7명까지 넣을 수 있습니다."))]
    #[serde(default)]
    pub defender_ids: Vec<i64>,
}

/// 라인 수정. defenderIds를 주면 순서 포함 전체 교체합니다.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLineRequest {
    #[validate(length(min = 1, max = 50, message = "라인 이름은 1~50자여야 합니다."))]
    pub name: Option<String>,

    #[validate(length(max = 7, message = "라인에는 최대 7명까지 넣을 수 있습니다."))]
    pub defender_ids: Option<Vec<i64>>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineResponse {
    pub defensive_line_id: i64,
    pub team_id: i64,
    pub name: String,
    /// 순서대로 정렬된 수비수 ID
    pub defender_ids: Vec<i64>,
    pub updated_at: NaiveDateTime,
}

impl LineResponse {
    pub fn new(line: defensive_line::Model, defender_ids: Vec<i64>) -> Self {
        Self {
            defensive_line_id: line.defensive_line_id,
            team_id: line.team_id,
            name: line.name,
            defender_ids,
            updated_at: line.updated_at,
        }
    }
}
