use std::collections::HashSet;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::info;

use crate::domain::access::AccessGate;
use crate::domain::game::entity::game;
use crate::domain::game::service::GameService;
use crate::domain::live::LiveEvent;
use crate::domain::team::entity::team_member::TeamRole;
use crate::global::validator::{
    ensure_distinct, ensure_game_players, ensure_max_len, ensure_team_defenders,
};
use crate::state::AppState;
use crate::utils::error::AppError;

use super::dto::{
    AssignCurrentPointRequest, CurrentPointDefenderItem, SelectedDefendersResponse,
    UpdateSelectedDefendersRequest,
};
use super::entity::{current_point_defender, selected_defender};

/// 게임당 선택 가능한 최대 수비수 수
pub const MAX_SELECTED_DEFENDERS: usize = 7;

pub struct LineupService;

impl LineupService {
    // ============== 선택 수비수 (Call-Your-Line) ==============

    pub async fn get_selected(
        state: AppState,
        user_id: Option<i64>,
        game_id: i64,
    ) -> Result<SelectedDefendersResponse, AppError> {
        AccessGate::readable_game_by_id(&state.db, user_id, game_id).await?;

        Ok(SelectedDefendersResponse {
            game_id,
            defender_ids: Self::selected_ids(&state.db, game_id).await?,
            cleared_offensive_player_ids: Vec::new(),
        })
    }

    pub async fn update_selected(
        state: AppState,
        user_id: i64,
        game_id: i64,
        req: UpdateSelectedDefendersRequest,
    ) -> Result<SelectedDefendersResponse, AppError> {
        let game = AccessGate::require_game(&state.db, user_id, game_id, TeamRole::Member).await?;
        Self::replace_selection(&state, user_id, &game, req.defender_ids, "selected-defenders-updated")
            .await
    }

    /// 선택 수비수 전체 교체
    ///
    /// 선택에서 빠진 수비수가 현재 포인트에 배정돼 있으면 그 배정을 지우고,
    /// 커밋 후 공격수마다 해제 이벤트를 하나씩 발행합니다.
    /// 라인 적용도 이 경로를 그대로 사용합니다.
    pub async fn replace_selection(
        state: &AppState,
        user_id: i64,
        game: &game::Model,
        defender_ids: Vec<i64>,
        action: &str,
    ) -> Result<SelectedDefendersResponse, AppError> {
        let game_id = game.game_id;

        // 쓰기 전에 모두 검증
        ensure_max_len(&defender_ids, MAX_SELECTED_DEFENDERS, "defenderIds")?;
        ensure_distinct(&defender_ids, "defenderIds")?;
        ensure_team_defenders(&state.db, game.team_id, &defender_ids, "defenderIds").await?;

        let keep: HashSet<i64> = defender_ids.iter().copied().collect();
        let now = Utc::now().naive_utc();

        let txn = state.db.begin().await?;
        GameService::lock_game(&txn, game_id).await?;

        selected_defender::Entity::delete_many()
            .filter(selected_defender::Column::GameId.eq(game_id))
            .exec(&txn)
            .await?;
        for &defender_id in &defender_ids {
            selected_defender::ActiveModel {
                game_id: Set(game_id),
                defender_id: Set(defender_id),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        let stale: Vec<current_point_defender::Model> = current_point_defender::Entity::find()
            .filter(current_point_defender::Column::GameId.eq(game_id))
            .order_by_asc(current_point_defender::Column::OffensivePlayerId)
            .all(&txn)
            .await?
            .into_iter()
            .filter(|row| !keep.contains(&row.defender_id))
            .collect();
        if !stale.is_empty() {
            let stale_ids: Vec<i64> = stale.iter().map(|r| r.current_point_defender_id).collect();
            current_point_defender::Entity::delete_many()
                .filter(current_point_defender::Column::CurrentPointDefenderId.is_in(stale_ids))
                .exec(&txn)
                .await?;
        }

        GameService::record_activity(
            &txn,
            game_id,
            user_id,
            action,
            Some(format!("{} defenders", defender_ids.len())),
        )
        .await?;
        txn.commit().await?;

        let cleared: Vec<i64> = stale.iter().map(|r| r.offensive_player_id).collect();
        info!(
            game_id,
            selected = defender_ids.len(),
            cleared = cleared.len(),
            user_id,
            "선택 수비수 교체 완료"
        );

        state.relay.publish(
            game_id,
            LiveEvent::SelectedDefendersUpdated {
                defender_ids: defender_ids.clone(),
            },
        );
        for &offensive_player_id in &cleared {
            state.relay.publish(
                game_id,
                LiveEvent::CurrentPointDefenderUpdated {
                    offensive_player_id,
                    defender_id: None,
                },
            );
        }

        Ok(SelectedDefendersResponse {
            game_id,
            defender_ids,
            cleared_offensive_player_ids: cleared,
        })
    }

    // ============== 현재 포인트 배정 ==============

    pub async fn get_current_point(
        state: AppState,
        user_id: Option<i64>,
        game_id: i64,
    ) -> Result<Vec<CurrentPointDefenderItem>, AppError> {
        AccessGate::readable_game_by_id(&state.db, user_id, game_id).await?;
        Self::current_point_items(&state.db, game_id).await
    }

    /// 공격수 한 명의 배정 설정/해제. 배정 가능한 수비수는 현재 선택된 수비수뿐입니다.
    pub async fn assign_current_point(
        state: AppState,
        user_id: i64,
        game_id: i64,
        req: AssignCurrentPointRequest,
    ) -> Result<Vec<CurrentPointDefenderItem>, AppError> {
        AccessGate::require_game(&state.db, user_id, game_id, TeamRole::Member).await?;
        ensure_game_players(
            &state.db,
            game_id,
            &[req.offensive_player_id],
            "offensivePlayerId",
        )
        .await?;

        // 선택 확인과 쓰기 사이에 선택 교체가 끼어들지 않도록 게임 행을 잠급니다.
        let txn = state.db.begin().await?;
        GameService::lock_game(&txn, game_id).await?;

        let existing = current_point_defender::Entity::find()
            .filter(current_point_defender::Column::GameId.eq(game_id))
            .filter(current_point_defender::Column::OffensivePlayerId.eq(req.offensive_player_id))
            .one(&txn)
            .await?;

        match (req.defender_id, existing) {
            (Some(defender_id), existing) => {
                let selected = Self::selected_ids(&txn, game_id).await?;
                if !selected.contains(&defender_id) {
                    return Err(AppError::field(
                        "defenderId",
                        "선택된 수비수만 배정할 수 있습니다.",
                    ));
                }

                let now = Utc::now().naive_utc();
                match existing {
                    Some(row) => {
                        let mut active: current_point_defender::ActiveModel = row.into();
                        active.defender_id = Set(defender_id);
                        active.updated_at = Set(now);
                        active.update(&txn).await?;
                    }
                    None => {
                        current_point_defender::ActiveModel {
                            game_id: Set(game_id),
                            offensive_player_id: Set(req.offensive_player_id),
                            defender_id: Set(defender_id),
                            updated_at: Set(now),
                            ..Default::default()
                        }
                        .insert(&txn)
                        .await?;
                    }
                }
            }
            (None, Some(row)) => {
                current_point_defender::Entity::delete_by_id(row.current_point_defender_id)
                    .exec(&txn)
                    .await?;
            }
            (None, None) => {}
        }
        txn.commit().await?;

        state.relay.publish(
            game_id,
            LiveEvent::CurrentPointDefenderUpdated {
                offensive_player_id: req.offensive_player_id,
                defender_id: req.defender_id,
            },
        );
        Self::current_point_items(&state.db, game_id).await
    }

    /// 현재 포인트 배정 전체 해제 (포인트 저장 후 다음 포인트 준비)
    pub async fn clear_current_point(
        state: AppState,
        user_id: i64,
        game_id: i64,
    ) -> Result<Vec<i64>, AppError> {
        AccessGate::require_game(&state.db, user_id, game_id, TeamRole::Member).await?;

        let txn = state.db.begin().await?;
        let cleared: Vec<i64> = current_point_defender::Entity::find()
            .filter(current_point_defender::Column::GameId.eq(game_id))
            .order_by_asc(current_point_defender::Column::OffensivePlayerId)
            .all(&txn)
            .await?
            .into_iter()
            .map(|row| row.offensive_player_id)
            .collect();
        current_point_defender::Entity::delete_many()
            .filter(current_point_defender::Column::GameId.eq(game_id))
            .exec(&txn)
            .await?;
        txn.commit().await?;

        for &offensive_player_id in &cleared {
            state.relay.publish(
                game_id,
                LiveEvent::CurrentPointDefenderUpdated {
                    offensive_player_id,
                    defender_id: None,
                },
            );
        }
        Ok(cleared)
    }

    pub async fn selected_ids<C: ConnectionTrait>(
        db: &C,
        game_id: i64,
    ) -> Result<Vec<i64>, AppError> {
        Ok(selected_defender::Entity::find()
            .filter(selected_defender::Column::GameId.eq(game_id))
            .order_by_asc(selected_defender::Column::SelectedDefenderId)
            .all(db)
            .await?
            .into_iter()
            .map(|row| row.defender_id)
            .collect())
    }

    async fn current_point_items<C: ConnectionTrait>(
        db: &C,
        game_id: i64,
    ) -> Result<Vec<CurrentPointDefenderItem>, AppError> {
        Ok(current_point_defender::Entity::find()
            .filter(current_point_defender::Column::GameId.eq(game_id))
            .order_by_asc(current_point_defender::Column::OffensivePlayerId)
            .all(db)
            .await?
            .into_iter()
            .map(CurrentPointDefenderItem::from)
            .collect())
    }
}
