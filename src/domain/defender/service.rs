use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::info;

use crate::domain::access::AccessGate;
use crate::domain::team::entity::team_member::TeamRole;
use crate::state::AppState;
use crate::utils::error::AppError;

use super::dto::{
    CreateDefenderRequest, DefenderResponse, DefenderStatsItem, DefenderStatsResponse,
    UpdateDefenderRequest,
};
use super::entity::{defender, defender_stats};

pub struct DefenderService;

impl DefenderService {
    pub async fn list_defenders(
        state: AppState,
        user_id: i64,
        team_id: i64,
    ) -> Result<Vec<DefenderResponse>, AppError> {
        AccessGate::require_team(&state.db, user_id, team_id, TeamRole::Viewer).await?;

        let defenders = defender::Entity::find()
            .filter(defender::Column::TeamId.eq(team_id))
            .order_by_asc(defender::Column::Name)
            .all(&state.db)
            .await?;

        Ok(defenders.into_iter().map(DefenderResponse::from).collect())
    }

    pub async fn create_defender(
        state: AppState,
        user_id: i64,
        req: CreateDefenderRequest,
    ) -> Result<DefenderResponse, AppError> {
        AccessGate::require_team(&state.db, user_id, req.team_id, TeamRole::Member).await?;

        let now = Utc::now().naive_utc();
        let created = defender::ActiveModel {
            team_id: Set(req.team_id),
            name: Set(req.name),
            jersey_number: Set(req.jersey_number),
            position: Set(req.position),
            notes: Set(req.notes),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&state.db)
        .await?;

        info!(
            defender_id = created.defender_id,
            team_id = created.team_id,
            user_id,
            "수비수 등록 완료"
        );
        Ok(DefenderResponse::from(created))
    }

    pub async fn update_defender(
        state: AppState,
        user_id: i64,
        defender_id: i64,
        req: UpdateDefenderRequest,
    ) -> Result<DefenderResponse, AppError> {
        let existing = Self::find_defender(&state, defender_id).await?;
        AccessGate::require_team(&state.db, user_id, existing.team_id, TeamRole::Member).await?;

        let mut active: defender::ActiveModel = existing.into();
        if let Some(name) = req.name {
            active.name = Set(name);
        }
        if let Some(jersey_number) = req.jersey_number {
            active.jersey_number = Set(Some(jersey_number));
        }
        if let Some(position) = req.position {
            active.position = Set(Some(position));
        }
        if let Some(notes) = req.notes {
            active.notes = Set(Some(notes));
        }
        if let Some(is_active) = req.active {
            active.active = Set(is_active);
        }
        active.updated_at = Set(Utc::now().naive_utc());

        let updated = active.update(&state.db).await?;
        Ok(DefenderResponse::from(updated))
    }

    /// 수비수 삭제 (ADMIN)
    ///
    /// 통계, 라인 선택, 현재 포인트 배정, 라인 템플릿 항목은 FK cascade로 지워지고
    /// 매치업의 수비수 배정은 null이 됩니다.
    pub async fn delete_defender(
        state: AppState,
        user_id: i64,
        defender_id: i64,
    ) -> Result<(), AppError> {
        let existing = Self::find_defender(&state, defender_id).await?;
        AccessGate::require_team(&state.db, user_id, existing.team_id, TeamRole::Admin).await?;

        defender::Entity::delete_by_id(defender_id)
            .exec(&state.db)
            .await?;

        info!(defender_id, team_id = existing.team_id, user_id, "수비수 삭제 완료");
        Ok(())
    }

    /// 수비수 게임별 저장 통계
    pub async fn get_stats(
        state: AppState,
        user_id: i64,
        defender_id: i64,
    ) -> Result<DefenderStatsResponse, AppError> {
        let existing = Self::find_defender(&state, defender_id).await?;
        AccessGate::require_team(&state.db, user_id, existing.team_id, TeamRole::Viewer).await?;

        let games = defender_stats::Entity::find()
            .filter(defender_stats::Column::DefenderId.eq(defender_id))
            .order_by_asc(defender_stats::Column::GameId)
            .all(&state.db)
            .await?
            .into_iter()
            .map(DefenderStatsItem::from)
            .collect();

        Ok(DefenderStatsResponse::new(
            DefenderResponse::from(existing),
            games,
        ))
    }

    async fn find_defender(state: &AppState, defender_id: i64) -> Result<defender::Model, AppError> {
        defender::Entity::find_by_id(defender_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::not_found("존재하지 않는 수비수입니다."))
    }
}
