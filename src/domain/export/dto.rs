use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::game::dto::GameDetailResponse;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ExportQuery {
    /// json(기본) 또는 csv
    pub format: Option<ExportFormat>,
}

/// 수비수별 집계 (저장된 포인트 기준)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DefenderReportItem {
    pub defender_id: i64,
    pub name: String,
    pub jersey_number: Option<i32>,
    pub points_played: i32,
    pub breaks: i32,
    pub no_breaks: i32,
    /// 0~100 정수, 출전 0이면 0
    pub break_percentage: i32,
    /// 표시용 ("N/A" 또는 "67%")
    pub break_percentage_label: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameTotals {
    pub points: i32,
    pub breaks: i32,
    pub no_breaks: i32,
    pub break_percentage: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameStatistics {
    pub totals: GameTotals,
    pub defenders: Vec<DefenderReportItem>,
}

/// JSON 내보내기: 게임 전체 상태 + 통계
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameExportResponse {
    pub game: GameDetailResponse,
    pub statistics: GameStatistics,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamStatsResponse {
    pub team_id: i64,
    pub games: usize,
    pub totals: GameTotals,
    pub defenders: Vec<DefenderReportItem>,
}

/// CSV 본문과 다운로드 파일명
pub struct CsvExport {
    pub filename: String,
    pub body: String,
}
