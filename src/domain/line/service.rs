use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::info;

use crate::domain::access::AccessGate;
use crate::domain::lineup::dto::SelectedDefendersResponse;
use crate::domain::lineup::service::LineupService;
use crate::domain::team::entity::team_member::TeamRole;
use crate::global::validator::{ensure_distinct, ensure_team_defenders};
use crate::state::AppState;
use crate::utils::error::AppError;

use super::dto::{CreateLineRequest, LineResponse, UpdateLineRequest};
use super::entity::{defensive_line, defensive_line_defender};

pub struct LineService;

impl LineService {
    pub async fn list_lines(
        state: AppState,
        user_id: i64,
        team_id: i64,
    ) -> Result<Vec<LineResponse>, AppError> {
        AccessGate::require_team(&state.db, user_id, team_id, TeamRole::Viewer).await?;

        let lines = defensive_line::Entity::find()
            .filter(defensive_line::Column::TeamId.eq(team_id))
            .order_by_asc(defensive_line::Column::Name)
            .all(&state.db)
            .await?;
        if lines.is_empty() {
            return Ok(Vec::new());
        }

        let line_ids: Vec<i64> = lines.iter().map(|l| l.defensive_line_id).collect();
        let mut members: HashMap<i64, Vec<i64>> = HashMap::new();
        for row in defensive_line_defender::Entity::find()
            .filter(defensive_line_defender::Column::DefensiveLineId.is_in(line_ids))
            .order_by_asc(defensive_line_defender::Column::SortOrder)
            .all(&state.db)
            .await?
        {
            members
                .entry(row.defensive_line_id)
                .or_default()
                .push(row.defender_id);
        }

        Ok(lines
            .into_iter()
            .map(|line| {
                let ids = members.remove(&line.defensive_line_id).unwrap_or_default();
                LineResponse::new(line, ids)
            })
            .collect())
    }

    pub async fn create_line(
        state: AppState,
        user_id: i64,
        req: CreateLineRequest,
    ) -> Result<LineResponse, AppError> {
        AccessGate::require_team(&state.db, user_id, req.team_id, TeamRole::Member).await?;
        ensure_distinct(&req.defender_ids, "defenderIds")?;
        ensure_team_defenders(&state.db, req.team_id, &req.defender_ids, "defenderIds").await?;

        let now = Utc::now().naive_utc();
        let txn = state.db.begin().await?;
        let line = defensive_line::ActiveModel {
            team_id: Set(req.team_id),
            name: Set(req.name),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        Self::write_members(&txn, line.defensive_line_id, &req.defender_ids).await?;
        txn.commit().await?;

        info!(
            defensive_line_id = line.defensive_line_id,
            team_id = line.team_id,
            user_id,
            "라인 생성 완료"
        );
        Ok(LineResponse::new(line, req.defender_ids))
    }

    pub async fn update_line(
        state: AppState,
        user_id: i64,
        line_id: i64,
        req: UpdateLineRequest,
    ) -> Result<LineResponse, AppError> {
        let line = Self::find_line(&state.db, line_id).await?;
        AccessGate::require_team(&state.db, user_id, line.team_id, TeamRole::Member).await?;
        if let Some(ids) = &req.defender_ids {
            ensure_distinct(ids, "defenderIds")?;
            ensure_team_defenders(&state.db, line.team_id, ids, "defenderIds").await?;
        }

        let txn = state.db.begin().await?;
        let mut active: defensive_line::ActiveModel = line.into();
        if let Some(name) = req.name {
            active.name = Set(name);
        }
        active.updated_at = Set(Utc::now().naive_utc());
        let updated = active.update(&txn).await?;

        if let Some(ids) = &req.defender_ids {
            defensive_line_defender::Entity::delete_many()
                .filter(defensive_line_defender::Column::DefensiveLineId.eq(line_id))
                .exec(&txn)
                .await?;
            Self::write_members(&txn, line_id, ids).await?;
        }
        let defender_ids = Self::member_ids(&txn, line_id).await?;
        txn.commit().await?;

        Ok(LineResponse::new(updated, defender_ids))
    }

    /// 라인 삭제 (ADMIN)
    pub async fn delete_line(state: AppState, user_id: i64, line_id: i64) -> Result<(), AppError> {
        let line = Self::find_line(&state.db, line_id).await?;
        AccessGate::require_team(&state.db, user_id, line.team_id, TeamRole::Admin).await?;

        let txn = state.db.begin().await?;
        defensive_line_defender::Entity::delete_many()
            .filter(defensive_line_defender::Column::DefensiveLineId.eq(line_id))
            .exec(&txn)
            .await?;
        defensive_line::Entity::delete_by_id(line_id)
            .exec(&txn)
            .await?;
        txn.commit().await?;

        info!(defensive_line_id = line_id, user_id, "라인 삭제 완료");
        Ok(())
    }

    /// 라인을 게임의 선택 수비수로 적용 (선택 수비수 전체 교체와 동일한 규칙)
    pub async fn apply_to_game(
        state: AppState,
        user_id: i64,
        line_id: i64,
        game_id: i64,
    ) -> Result<SelectedDefendersResponse, AppError> {
        let line = Self::find_line(&state.db, line_id).await?;
        let game = AccessGate::require_game(&state.db, user_id, game_id, TeamRole::Member).await?;
        if game.team_id != line.team_id {
            return Err(AppError::bad_request("다른 팀의 라인은 적용할 수 없습니다."));
        }

        let defender_ids = Self::member_ids(&state.db, line_id).await?;
        LineupService::replace_selection(&state, user_id, &game, defender_ids, "line-applied").await
    }

    async fn write_members<C: ConnectionTrait>(
        conn: &C,
        line_id: i64,
        defender_ids: &[i64],
    ) -> Result<(), AppError> {
        for (index, &defender_id) in defender_ids.iter().enumerate() {
            defensive_line_defender::ActiveModel {
                defensive_line_id: Set(line_id),
                defender_id: Set(defender_id),
                sort_order: Set(index as i32),
                ..Default::default()
            }
            .insert(conn)
            .await?;
        }
        Ok(())
    }

    async fn member_ids<C: ConnectionTrait>(conn: &C, line_id: i64) -> Result<Vec<i64>, AppError> {
        Ok(defensive_line_defender::Entity::find()
            .filter(defensive_line_defender::Column::DefensiveLineId.eq(line_id))
            .order_by_asc(defensive_line_defender::Column::SortOrder)
            .all(conn)
            .await?
            .into_iter()
            .map(|row| row.defender_id)
            .collect())
    }

    async fn find_line<C: ConnectionTrait>(
        db: &C,
        line_id: i64,
    ) -> Result<defensive_line::Model, AppError> {
        defensive_line::Entity::find_by_id(line_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found("존재하지 않는 라인입니다."))
    }
}
