use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use super::dto::{ExportFormat, ExportQuery, GameExportResponse, TeamStatsResponse};
use super::service::ExportService;
use crate::state::AppState;
use crate::utils::auth::{AuthUser, OptionalAuthUser};
use crate::utils::error::AppError;
use crate::utils::BaseResponse;

/// 게임 내보내기 API
///
/// `format=json`(기본)은 게임 전체 상태와 통계를, `format=csv`는 매치업 단위 CSV 파일을 반환합니다.
/// 공개 게임은 비로그인으로도 내보낼 수 있습니다.
#[utoipa::path(
    get,
    path = "/api/export/games/{game_id}",
    security((), ("bearer_auth" = [])),
    params(("game_id" = i64, Path, description = "게임 ID"), ExportQuery),
    responses(
        (status = 200, description = "내보내기 성공 (csv는 text/csv 첨부파일)", body = GameExportResponse),
        (status = 403, description = "접근 권한 없음", body = ErrorResponse),
        (status = 404, description = "게임 없음", body = ErrorResponse)
    ),
    tag = "Export"
)]
pub async fn export_game(
    State(state): State<AppState>,
    user: OptionalAuthUser,
    Path(game_id): Path<i64>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, AppError> {
    let user_id = user.user_id()?;

    match query.format.unwrap_or_default() {
        ExportFormat::Json => {
            let result = ExportService::game_report(state, user_id, game_id).await?;
            Ok(Json(BaseResponse::success(result)).into_response())
        }
        ExportFormat::Csv => {
            let csv = ExportService::game_csv(state, user_id, game_id).await?;
            let disposition = format!("attachment; filename=\"{}\"", csv.filename);
            Ok((
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                csv.body,
            )
                .into_response())
        }
    }
}

/// 팀 통계 API
///
/// 팀의 모든 게임에 걸친 수비수별 출전/브레이크 합계를 반환합니다.
#[utoipa::path(
    get,
    path = "/api/export/teams/{team_id}/stats",
    security(("bearer_auth" = [])),
    params(("team_id" = i64, Path, description = "팀 ID")),
    responses(
        (status = 200, description = "조회 성공", body = TeamStatsResponse),
        (status = 403, description = "팀 멤버 아님", body = ErrorResponse)
    ),
    tag = "Export"
)]
pub async fn team_stats(
    State(state): State<AppState>,
    user: AuthUser,
    Path(team_id): Path<i64>,
) -> Result<Json<BaseResponse<TeamStatsResponse>>, AppError> {
    let result = ExportService::team_stats(state, user.user_id()?, team_id).await?;
    Ok(Json(BaseResponse::success(result)))
}
