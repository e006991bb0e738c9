use std::collections::HashSet;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use tracing::info;

use crate::domain::access::AccessGate;
use crate::domain::defender::dto::DefenderStatsItem;
use crate::domain::defender::entity::{defender, defender_stats};
use crate::domain::live::LiveEvent;
use crate::domain::lineup::dto::CurrentPointDefenderItem;
use crate::domain::lineup::entity::{current_point_defender, selected_defender};
use crate::domain::point::entity::matchup;
use crate::domain::point::service::PointService;
use crate::domain::team::entity::team_member::TeamRole;
use crate::global::validator::{ensure_distinct, ensure_team_defenders};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::random;

use super::dto::{
    ActivityItem, AddPlayerRequest, CreateGameRequest, GameDetailResponse, GameResponse,
    OffensivePlayerResponse, ReorderPlayersRequest, UpdateGameRequest, UpdatePlayerRequest,
};
use super::entity::activity;
use super::entity::available_defender;
use super::entity::game::{self, GameStatus};
use super::entity::offensive_player;

const DEFAULT_ACTIVITY_LIMIT: u64 = 50;
const MAX_ACTIVITY_LIMIT: u64 = 200;

pub struct GameService;

impl GameService {
    // ============== 공용 헬퍼 ==============

    /// 트랜잭션 안에서 게임 행을 잠그고 반환합니다 (포인트 번호 경합 방지).
    pub async fn lock_game<C: ConnectionTrait>(
        conn: &C,
        game_id: i64,
    ) -> Result<game::Model, AppError> {
        game::Entity::find_by_id(game_id)
            .lock_exclusive()
            .one(conn)
            .await?
            .ok_or_else(|| AppError::not_found("존재하지 않는 게임입니다."))
    }

    /// 활동 기록 추가 (append-only)
    pub async fn record_activity<C: ConnectionTrait>(
        conn: &C,
        game_id: i64,
        user_id: i64,
        action: &str,
        detail: Option<String>,
    ) -> Result<(), AppError> {
        activity::ActiveModel {
            game_id: Set(game_id),
            user_id: Set(user_id),
            action: Set(action.to_string()),
            detail: Set(detail),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(conn)
        .await?;
        Ok(())
    }

    /// 게임 전체 상태 조립
    ///
    /// seq를 먼저 읽어 두므로 이후 발행된 이벤트는 클라이언트가 반드시 받게 됩니다.
    pub async fn build_detail(
        state: &AppState,
        game: game::Model,
    ) -> Result<GameDetailResponse, AppError> {
        let live_seq = state.relay.current_seq(game.game_id);
        let db = &state.db;
        let game_id = game.game_id;

        let players = offensive_player::Entity::find()
            .filter(offensive_player::Column::GameId.eq(game_id))
            .order_by_asc(offensive_player::Column::SortOrder)
            .order_by_asc(offensive_player::Column::OffensivePlayerId)
            .all(db)
            .await?
            .into_iter()
            .map(OffensivePlayerResponse::from)
            .collect();

        let available_defender_ids = available_defender::Entity::find()
            .filter(available_defender::Column::GameId.eq(game_id))
            .order_by_asc(available_defender::Column::AvailableDefenderId)
            .all(db)
            .await?
            .into_iter()
            .map(|a| a.defender_id)
            .collect();

        let selected_defender_ids = selected_defender::Entity::find()
            .filter(selected_defender::Column::GameId.eq(game_id))
            .order_by_asc(selected_defender::Column::SelectedDefenderId)
            .all(db)
            .await?
            .into_iter()
            .map(|s| s.defender_id)
            .collect();

        let current_point_defenders = current_point_defender::Entity::find()
            .filter(current_point_defender::Column::GameId.eq(game_id))
            .order_by_asc(current_point_defender::Column::OffensivePlayerId)
            .all(db)
            .await?
            .into_iter()
            .map(CurrentPointDefenderItem::from)
            .collect();

        let points = PointService::list_for_game(db, game_id).await?;

        let defender_stats = defender_stats::Entity::find()
            .filter(defender_stats::Column::GameId.eq(game_id))
            .order_by_asc(defender_stats::Column::DefenderId)
            .all(db)
            .await?
            .into_iter()
            .map(DefenderStatsItem::from)
            .collect();

        Ok(GameDetailResponse {
            game: GameResponse::from(game),
            players,
            available_defender_ids,
            selected_defender_ids,
            current_point_defenders,
            points,
            defender_stats,
            live_seq,
        })
    }

    // ============== 게임 ==============

    pub async fn list_games(
        state: AppState,
        user_id: i64,
        team_id: i64,
    ) -> Result<Vec<GameResponse>, AppError> {
        AccessGate::require_team(&state.db, user_id, team_id, TeamRole::Viewer).await?;

        let games = game::Entity::find()
            .filter(game::Column::TeamId.eq(team_id))
            .order_by_desc(game::Column::GameDate)
            .all(&state.db)
            .await?;

        Ok(games.into_iter().map(GameResponse::from).collect())
    }

    /// 게임 생성. 팀의 활성 수비수 전원을 출전 가능 명단으로 등록합니다.
    pub async fn create_game(
        state: AppState,
        user_id: i64,
        req: CreateGameRequest,
    ) -> Result<GameResponse, AppError> {
        AccessGate::require_team(&state.db, user_id, req.team_id, TeamRole::Member).await?;

        let now = Utc::now().naive_utc();
        let txn = state.db.begin().await?;

        let created = game::ActiveModel {
            team_id: Set(req.team_id),
            slug: Set(random::slug(&format!("{} vs {}", req.name, req.opponent))),
            share_code: Set(random::share_code()),
            name: Set(req.name),
            opponent: Set(req.opponent),
            location: Set(req.location),
            game_date: Set(req.game_date),
            status: Set(GameStatus::Setup),
            is_public: Set(req.is_public),
            notes: Set(req.notes),
            created_by: Set(user_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let roster = defender::Entity::find()
            .filter(defender::Column::TeamId.eq(req.team_id))
            .filter(defender::Column::Active.eq(true))
            .order_by_asc(defender::Column::DefenderId)
            .all(&txn)
            .await?;
        for d in &roster {
            available_defender::ActiveModel {
                game_id: Set(created.game_id),
                defender_id: Set(d.defender_id),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        Self::record_activity(&txn, created.game_id, user_id, "game-created", None).await?;
        txn.commit().await?;

        info!(
            game_id = created.game_id,
            team_id = created.team_id,
            available = roster.len(),
            user_id,
            "게임 생성 완료"
        );
        Ok(GameResponse::from(created))
    }

    pub async fn get_game(
        state: AppState,
        user_id: Option<i64>,
        game_id: i64,
    ) -> Result<GameDetailResponse, AppError> {
        let game = AccessGate::readable_game_by_id(&state.db, user_id, game_id).await?;
        Self::build_detail(&state, game).await
    }

    pub async fn get_game_by_slug(
        state: AppState,
        user_id: Option<i64>,
        slug: &str,
    ) -> Result<GameDetailResponse, AppError> {
        let game = game::Entity::find()
            .filter(game::Column::Slug.eq(slug))
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::not_found("존재하지 않는 게임입니다."))?;
        let game = AccessGate::readable_game(&state.db, user_id, game).await?;
        Self::build_detail(&state, game).await
    }

    /// 공유 코드로 공개 게임 조회 (비공개면 존재 여부도 노출하지 않음)
    pub async fn get_public_game(
        state: AppState,
        share_code: &str,
    ) -> Result<GameDetailResponse, AppError> {
        let game = game::Entity::find()
            .filter(game::Column::ShareCode.eq(share_code))
            .filter(game::Column::IsPublic.eq(true))
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::not_found("존재하지 않는 게임입니다."))?;
        Self::build_detail(&state, game).await
    }

    pub async fn update_game(
        state: AppState,
        user_id: i64,
        game_id: i64,
        req: UpdateGameRequest,
    ) -> Result<GameResponse, AppError> {
        let game = AccessGate::require_game(&state.db, user_id, game_id, TeamRole::Member).await?;
        let previous_status = game.status;

        let mut active: game::ActiveModel = game.into();
        if let Some(name) = req.name {
            active.name = Set(name);
        }
        if let Some(opponent) = req.opponent {
            active.opponent = Set(opponent);
        }
        if let Some(location) = req.location {
            active.location = Set(Some(location));
        }
        if let Some(game_date) = req.game_date {
            active.game_date = Set(game_date);
        }
        if let Some(status) = req.status {
            active.status = Set(status);
        }
        if let Some(is_public) = req.is_public {
            active.is_public = Set(is_public);
        }
        if let Some(notes) = req.notes {
            active.notes = Set(Some(notes));
        }
        active.updated_at = Set(Utc::now().naive_utc());

        let txn = state.db.begin().await?;
        let updated = active.update(&txn).await?;
        let detail = (previous_status != updated.status)
            .then(|| format!("{:?} -> {:?}", previous_status, updated.status));
        Self::record_activity(&txn, game_id, user_id, "game-updated", detail).await?;
        txn.commit().await?;

        info!(game_id, status = ?updated.status, user_id, "게임 수정 완료");

        let response = GameResponse::from(updated);
        state
            .relay
            .publish(game_id, LiveEvent::GameUpdated(response.clone()));
        Ok(response)
    }

    /// 게임 삭제 (ADMIN). 하위 데이터는 FK cascade로 함께 삭제됩니다.
    pub async fn delete_game(state: AppState, user_id: i64, game_id: i64) -> Result<(), AppError> {
        AccessGate::require_game(&state.db, user_id, game_id, TeamRole::Admin).await?;

        game::Entity::delete_by_id(game_id).exec(&state.db).await?;

        info!(game_id, user_id, "게임 삭제 완료");
        Ok(())
    }

    // ============== 공격수 ==============

    pub async fn add_player(
        state: AppState,
        user_id: i64,
        game_id: i64,
        req: AddPlayerRequest,
    ) -> Result<OffensivePlayerResponse, AppError> {
        AccessGate::require_game(&state.db, user_id, game_id, TeamRole::Member).await?;

        let txn = state.db.begin().await?;
        let last = offensive_player::Entity::find()
            .filter(offensive_player::Column::GameId.eq(game_id))
            .order_by_desc(offensive_player::Column::SortOrder)
            .one(&txn)
            .await?;
        let sort_order = last.map(|p| p.sort_order + 1).unwrap_or(0);

        let player = offensive_player::ActiveModel {
            game_id: Set(game_id),
            name: Set(req.name),
            position: Set(req.position),
            is_bench: Set(req.is_bench),
            sort_order: Set(sort_order),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        Self::record_activity(&txn, game_id, user_id, "player-added", Some(player.name.clone()))
            .await?;
        txn.commit().await?;

        let response = OffensivePlayerResponse::from(player);
        state
            .relay
            .publish(game_id, LiveEvent::PlayerAdded(response.clone()));
        Ok(response)
    }

    pub async fn update_player(
        state: AppState,
        user_id: i64,
        game_id: i64,
        player_id: i64,
        req: UpdatePlayerRequest,
    ) -> Result<OffensivePlayerResponse, AppError> {
        AccessGate::require_game(&state.db, user_id, game_id, TeamRole::Member).await?;
        let player = Self::find_player(&state.db, game_id, player_id).await?;

        let mut active: offensive_player::ActiveModel = player.into();
        if let Some(name) = req.name {
            active.name = Set(name);
        }
        if let Some(position) = req.position {
            active.position = Set(position);
        }
        if let Some(is_bench) = req.is_bench {
            active.is_bench = Set(is_bench);
        }
        let updated = active.update(&state.db).await?;

        let response = OffensivePlayerResponse::from(updated);
        state
            .relay
            .publish(game_id, LiveEvent::PlayerUpdated(response.clone()));
        Ok(response)
    }

    /// 공격수 삭제. 현재 포인트 배정과 매치업 기록도 함께 지웁니다.
    pub async fn remove_player(
        state: AppState,
        user_id: i64,
        game_id: i64,
        player_id: i64,
    ) -> Result<(), AppError> {
        AccessGate::require_game(&state.db, user_id, game_id, TeamRole::Member).await?;
        let player = Self::find_player(&state.db, game_id, player_id).await?;

        let txn = state.db.begin().await?;
        current_point_defender::Entity::delete_many()
            .filter(current_point_defender::Column::OffensivePlayerId.eq(player_id))
            .exec(&txn)
            .await?;
        matchup::Entity::delete_many()
            .filter(matchup::Column::OffensivePlayerId.eq(player_id))
            .exec(&txn)
            .await?;
        offensive_player::Entity::delete_by_id(player_id)
            .exec(&txn)
            .await?;
        Self::record_activity(&txn, game_id, user_id, "player-removed", Some(player.name)).await?;
        txn.commit().await?;

        info!(game_id, player_id, user_id, "공격수 삭제 완료");
        state.relay.publish(
            game_id,
            LiveEvent::PlayerRemoved {
                offensive_player_id: player_id,
            },
        );
        Ok(())
    }

    /// 공격수 순서 재정렬. 게임의 모든 공격수를 빠짐없이 전달해야 하며 0..n-1로 다시 씁니다.
    pub async fn reorder_players(
        state: AppState,
        user_id: i64,
        game_id: i64,
        req: ReorderPlayersRequest,
    ) -> Result<Vec<OffensivePlayerResponse>, AppError> {
        AccessGate::require_game(&state.db, user_id, game_id, TeamRole::Member).await?;
        ensure_distinct(&req.offensive_player_ids, "offensivePlayerIds")?;

        let txn = state.db.begin().await?;
        let players = offensive_player::Entity::find()
            .filter(offensive_player::Column::GameId.eq(game_id))
            .all(&txn)
            .await?;

        let existing: HashSet<i64> = players.iter().map(|p| p.offensive_player_id).collect();
        let requested: HashSet<i64> = req.offensive_player_ids.iter().copied().collect();
        if existing != requested {
            return Err(AppError::field(
                "offensivePlayerIds",
                "게임의 모든 공격수를 정확히 한 번씩 전달해야 합니다.",
            ));
        }

        let mut reordered = Vec::with_capacity(players.len());
        for (index, player_id) in req.offensive_player_ids.iter().enumerate() {
            let Some(player) = players.iter().find(|p| p.offensive_player_id == *player_id) else {
                continue;
            };
            let mut active: offensive_player::ActiveModel = player.clone().into();
            active.sort_order = Set(index as i32);
            reordered.push(OffensivePlayerResponse::from(active.update(&txn).await?));
        }
        txn.commit().await?;

        state.relay.publish(
            game_id,
            LiveEvent::PlayersReordered {
                offensive_player_ids: req.offensive_player_ids,
            },
        );
        Ok(reordered)
    }

    // ============== 출전 가능 수비수 ==============

    pub async fn add_available_defender(
        state: AppState,
        user_id: i64,
        game_id: i64,
        defender_id: i64,
    ) -> Result<Vec<i64>, AppError> {
        let game = AccessGate::require_game(&state.db, user_id, game_id, TeamRole::Member).await?;
        ensure_team_defenders(&state.db, game.team_id, &[defender_id], "defenderId").await?;

        let exists = available_defender::Entity::find()
            .filter(available_defender::Column::GameId.eq(game_id))
            .filter(available_defender::Column::DefenderId.eq(defender_id))
            .one(&state.db)
            .await?;
        if exists.is_some() {
            return Err(AppError::conflict("이미 출전 가능 명단에 있는 수비수입니다."));
        }

        available_defender::ActiveModel {
            game_id: Set(game_id),
            defender_id: Set(defender_id),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(&state.db)
        .await?;

        state
            .relay
            .publish(game_id, LiveEvent::AvailableDefenderAdded { defender_id });
        Self::available_ids(&state, game_id).await
    }

    pub async fn remove_available_defender(
        state: AppState,
        user_id: i64,
        game_id: i64,
        defender_id: i64,
    ) -> Result<Vec<i64>, AppError> {
        AccessGate::require_game(&state.db, user_id, game_id, TeamRole::Member).await?;

        let removed = available_defender::Entity::delete_many()
            .filter(available_defender::Column::GameId.eq(game_id))
            .filter(available_defender::Column::DefenderId.eq(defender_id))
            .exec(&state.db)
            .await?;
        if removed.rows_affected == 0 {
            return Err(AppError::not_found("출전 가능 명단에 없는 수비수입니다."));
        }

        state
            .relay
            .publish(game_id, LiveEvent::AvailableDefenderRemoved { defender_id });
        Self::available_ids(&state, game_id).await
    }

    // ============== 활동 기록 ==============

    pub async fn list_activity(
        state: AppState,
        user_id: i64,
        game_id: i64,
        limit: Option<u64>,
    ) -> Result<Vec<ActivityItem>, AppError> {
        AccessGate::require_game(&state.db, user_id, game_id, TeamRole::Viewer).await?;

        let limit = limit
            .unwrap_or(DEFAULT_ACTIVITY_LIMIT)
            .clamp(1, MAX_ACTIVITY_LIMIT);
        let rows = activity::Entity::find()
            .filter(activity::Column::GameId.eq(game_id))
            .order_by_desc(activity::Column::CreatedAt)
            .order_by_desc(activity::Column::ActivityId)
            .limit(limit)
            .all(&state.db)
            .await?;

        Ok(rows.into_iter().map(ActivityItem::from).collect())
    }

    async fn available_ids(state: &AppState, game_id: i64) -> Result<Vec<i64>, AppError> {
        Ok(available_defender::Entity::find()
            .filter(available_defender::Column::GameId.eq(game_id))
            .order_by_asc(available_defender::Column::AvailableDefenderId)
            .all(&state.db)
            .await?
            .into_iter()
            .map(|a| a.defender_id)
            .collect())
    }

    async fn find_player<C: ConnectionTrait>(
        db: &C,
        game_id: i64,
        player_id: i64,
    ) -> Result<offensive_player::Model, AppError> {
        offensive_player::Entity::find_by_id(player_id)
            .filter(offensive_player::Column::GameId.eq(game_id))
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found("존재하지 않는 공격수입니다."))
    }
}
