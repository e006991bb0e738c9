use std::collections::HashMap;

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use tracing::info;

use crate::domain::access::AccessGate;
use crate::domain::defender::entity::defender;
use crate::domain::game::entity::game;
use crate::domain::game::service::GameService;
use crate::domain::point::entity::{point, point_defender};
use crate::domain::team::entity::team_member::TeamRole;
use crate::state::AppState;
use crate::utils::error::AppError;

use super::dto::{CsvExport, GameExportResponse, GameStatistics, TeamStatsResponse};
use super::report::{self, Tally};

pub struct ExportService;

impl ExportService {
    /// 게임 전체 상태와 재계산한 통계
    pub async fn game_report(
        state: AppState,
        user_id: Option<i64>,
        game_id: i64,
    ) -> Result<GameExportResponse, AppError> {
        let game = AccessGate::readable_game_by_id(&state.db, user_id, game_id).await?;
        let roster = team_roster(&state, game.team_id).await?;
        let detail = GameService::build_detail(&state, game).await?;

        let tallies = report::tally_defenders(
            detail
                .points
                .iter()
                .map(|p| (p.got_break, p.selected_defender_ids.as_slice())),
        );
        // 이 게임에 출전한 수비수만
        let credited: Vec<defender::Model> = roster
            .into_iter()
            .filter(|d| tallies.contains_key(&d.defender_id))
            .collect();

        let statistics = GameStatistics {
            totals: report::game_totals(&detail.points),
            defenders: report::defender_reports(&tallies, &credited),
        };

        info!(game_id, points = detail.points.len(), "게임 JSON 내보내기");
        Ok(GameExportResponse {
            game: detail,
            statistics,
        })
    }

    pub async fn game_csv(
        state: AppState,
        user_id: Option<i64>,
        game_id: i64,
    ) -> Result<CsvExport, AppError> {
        let game = AccessGate::readable_game_by_id(&state.db, user_id, game_id).await?;
        let defender_names: HashMap<i64, String> = team_roster(&state, game.team_id)
            .await?
            .into_iter()
            .map(|d| (d.defender_id, d.name))
            .collect();
        let detail = GameService::build_detail(&state, game).await?;

        let body = report::render_game_csv(
            &detail.game,
            &detail.players,
            &defender_names,
            &detail.points,
        );

        info!(game_id, bytes = body.len(), "게임 CSV 내보내기");
        Ok(CsvExport {
            filename: format!("{}.csv", detail.game.slug),
            body,
        })
    }

    /// 팀의 모든 게임에 걸친 수비수별 합계 (VIEWER 이상)
    pub async fn team_stats(
        state: AppState,
        user_id: i64,
        team_id: i64,
    ) -> Result<TeamStatsResponse, AppError> {
        AccessGate::require_team(&state.db, user_id, team_id, TeamRole::Viewer).await?;

        let game_ids: Vec<i64> = game::Entity::find()
            .filter(game::Column::TeamId.eq(team_id))
            .all(&state.db)
            .await?
            .into_iter()
            .map(|g| g.game_id)
            .collect();

        let points = point::Entity::find()
            .filter(point::Column::GameId.is_in(game_ids.clone()))
            .order_by_asc(point::Column::PointId)
            .all(&state.db)
            .await?;

        let mut credits: HashMap<i64, Vec<i64>> = HashMap::new();
        if !points.is_empty() {
            for row in point_defender::Entity::find()
                .filter(point_defender::Column::PointId.is_in(points.iter().map(|p| p.point_id)))
                .all(&state.db)
                .await?
            {
                credits.entry(row.point_id).or_default().push(row.defender_id);
            }
        }

        let tallies = report::tally_defenders(points.iter().map(|p| {
            let ids = credits.get(&p.point_id).map(Vec::as_slice).unwrap_or(&[]);
            (p.got_break, ids)
        }));

        let mut totals = Tally::default();
        for p in &points {
            totals.record(p.got_break);
        }

        let roster = team_roster(&state, team_id).await?;
        Ok(TeamStatsResponse {
            team_id,
            games: game_ids.len(),
            totals: totals.into(),
            defenders: report::defender_reports(&tallies, &roster),
        })
    }
}

async fn team_roster(state: &AppState, team_id: i64) -> Result<Vec<defender::Model>, AppError> {
    Ok(defender::Entity::find()
        .filter(defender::Column::TeamId.eq(team_id))
        .order_by_asc(defender::Column::DefenderId)
        .all(&state.db)
        .await?)
}
