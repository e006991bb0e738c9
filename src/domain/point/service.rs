use std::collections::HashMap;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::info;

use crate::domain::access::AccessGate;
use crate::domain::game::dto::GameResponse;
use crate::domain::game::entity::game::{self, GameStatus};
use crate::domain::game::service::GameService;
use crate::domain::live::LiveEvent;
use crate::domain::team::entity::team_member::TeamRole;
use crate::global::validator::{ensure_distinct, ensure_game_players, ensure_team_defenders};
use crate::state::AppState;
use crate::utils::error::AppError;

use super::dto::{
    CreatePointRequest, DeletePointResponse, MatchupResponse, PointResponse,
    UpdateMatchupRequest, UpdatePointRequest,
};
use super::entity::matchup::{self, MatchupResult};
use super::entity::point;
use super::entity::point_defender;
use super::stats::{apply_delta, StatDelta};

pub struct PointService;

impl PointService {
    /// 포인트 기록
    ///
    /// 포인트, 출전 수비수, 매치업, 통계 증감, 게임 상태 전환, 활동 기록을
    /// 하나의 트랜잭션으로 처리하고 커밋 후에만 이벤트를 발행합니다.
    pub async fn create_point(
        state: AppState,
        user_id: i64,
        req: CreatePointRequest,
    ) -> Result<PointResponse, AppError> {
        // 1. 요청 자체 검증
        ensure_distinct(&req.selected_defender_ids, "selectedDefenderIds")?;
        let player_ids: Vec<i64> = req.matchups.iter().map(|m| m.offensive_player_id).collect();
        ensure_distinct(&player_ids, "matchups")?;

        // 2. 권한 확인
        let game =
            AccessGate::require_game(&state.db, user_id, req.game_id, TeamRole::Member).await?;

        // 3. 참조 검증 (쓰기 전)
        ensure_team_defenders(
            &state.db,
            game.team_id,
            &req.selected_defender_ids,
            "selectedDefenderIds",
        )
        .await?;
        let matchup_defenders: Vec<i64> = req.matchups.iter().filter_map(|m| m.defender_id).collect();
        ensure_team_defenders(&state.db, game.team_id, &matchup_defenders, "matchups").await?;
        ensure_game_players(&state.db, game.game_id, &player_ids, "matchups").await?;

        // 4. 트랜잭션
        let txn = state.db.begin().await?;
        let game = GameService::lock_game(&txn, game.game_id).await?;

        if let Some(key) = req.client_key.as_deref() {
            let existing = point::Entity::find()
                .filter(point::Column::GameId.eq(game.game_id))
                .filter(point::Column::ClientKey.eq(key))
                .one(&txn)
                .await?;
            if let Some(existing) = existing {
                txn.rollback().await?;
                info!(
                    game_id = game.game_id,
                    point_id = existing.point_id,
                    client_key = key,
                    "중복 포인트 요청, 기존 포인트를 반환합니다."
                );
                return Self::load_point(&state.db, existing).await;
            }
        }

        let last = point::Entity::find()
            .filter(point::Column::GameId.eq(game.game_id))
            .order_by_desc(point::Column::PointNumber)
            .one(&txn)
            .await?;
        let point_number = last.map(|p| p.point_number).unwrap_or(0) + 1;
        let now = Utc::now().naive_utc();

        let point = point::ActiveModel {
            game_id: Set(game.game_id),
            point_number: Set(point_number),
            got_break: Set(req.got_break),
            wind_speed: Set(req.wind_speed),
            wind_direction: Set(req.wind_direction.clone()),
            notes: Set(req.notes.clone()),
            client_key: Set(req.client_key.clone()),
            created_by: Set(user_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for &defender_id in &req.selected_defender_ids {
            point_defender::ActiveModel {
                point_id: Set(point.point_id),
                defender_id: Set(defender_id),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        let mut matchups = Vec::with_capacity(req.matchups.len());
        for input in &req.matchups {
            let saved = matchup::ActiveModel {
                point_id: Set(point.point_id),
                offensive_player_id: Set(input.offensive_player_id),
                defender_id: Set(input.defender_id),
                result: Set(input.result.unwrap_or(MatchupResult::Neutral)),
                is_active: Set(input.is_active.unwrap_or(true)),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            matchups.push(saved);
        }

        apply_delta(
            &txn,
            game.game_id,
            &req.selected_defender_ids,
            StatDelta::credit(req.got_break),
        )
        .await?;

        let started = if game.status == GameStatus::Setup {
            let mut active: game::ActiveModel = game.clone().into();
            active.status = Set(GameStatus::InProgress);
            active.updated_at = Set(now);
            Some(active.update(&txn).await?)
        } else {
            None
        };

        GameService::record_activity(
            &txn,
            game.game_id,
            user_id,
            "point-created",
            Some(format!(
                "#{} {}",
                point_number,
                if req.got_break { "break" } else { "no-break" }
            )),
        )
        .await?;

        txn.commit().await?;

        info!(
            game_id = game.game_id,
            point_id = point.point_id,
            point_number,
            got_break = req.got_break,
            credited = req.selected_defender_ids.len(),
            user_id,
            "포인트 기록 완료"
        );

        // 5. 커밋 후 발행
        let response = PointResponse::from_parts(point, req.selected_defender_ids, matchups);
        state
            .relay
            .publish(game.game_id, LiveEvent::PointCreated(response.clone()));
        if let Some(started) = started {
            state
                .relay
                .publish(game.game_id, LiveEvent::GameUpdated(GameResponse::from(started)));
        }

        Ok(response)
    }

    /// 게임의 포인트 목록 (번호순)
    pub async fn list_points(
        state: AppState,
        user_id: Option<i64>,
        game_id: i64,
    ) -> Result<Vec<PointResponse>, AppError> {
        AccessGate::readable_game_by_id(&state.db, user_id, game_id).await?;
        Self::list_for_game(&state.db, game_id).await
    }

    /// 포인트 수정
    ///
    /// 결과가 바뀌면 출전 수비수 전원의 breaks/noBreaks를 반대 방향으로 하나씩
    /// 옮깁니다. pointsPlayed는 바뀌지 않습니다.
    pub async fn update_point(
        state: AppState,
        user_id: i64,
        point_id: i64,
        req: UpdatePointRequest,
    ) -> Result<PointResponse, AppError> {
        let point = Self::find_point(&state.db, point_id).await?;
        AccessGate::require_game(&state.db, user_id, point.game_id, TeamRole::Member).await?;

        let txn = state.db.begin().await?;
        GameService::lock_game(&txn, point.game_id).await?;
        let point = Self::find_point(&txn, point_id).await?;
        let credited = Self::credited_ids(&txn, point_id).await?;

        let was_break = point.got_break;
        if let Some(now_break) = req.got_break {
            apply_delta(
                &txn,
                point.game_id,
                &credited,
                StatDelta::outcome_change(was_break, now_break),
            )
            .await?;
        }

        let mut active: point::ActiveModel = point.into();
        if let Some(got_break) = req.got_break {
            active.got_break = Set(got_break);
        }
        if let Some(wind_speed) = req.wind_speed {
            active.wind_speed = Set(Some(wind_speed));
        }
        if let Some(wind_direction) = req.wind_direction {
            active.wind_direction = Set(Some(wind_direction));
        }
        if let Some(notes) = req.notes {
            active.notes = Set(Some(notes));
        }
        active.updated_at = Set(Utc::now().naive_utc());
        let updated = active.update(&txn).await?;

        let detail = match req.got_break {
            Some(now_break) if now_break != was_break => format!(
                "#{} {} -> {}",
                updated.point_number,
                outcome_label(was_break),
                outcome_label(now_break)
            ),
            _ => format!("#{}", updated.point_number),
        };
        GameService::record_activity(&txn, updated.game_id, user_id, "point-updated", Some(detail))
            .await?;

        txn.commit().await?;
        info!(game_id = updated.game_id, point_id, user_id, "포인트 수정 완료");

        let response = Self::load_point(&state.db, updated).await?;
        state
            .relay
            .publish(response.game_id, LiveEvent::PointUpdated(response.clone()));
        Ok(response)
    }

    /// 포인트 삭제
    ///
    /// 출전 기록을 회수하고 매치업/출전 수비수/포인트를 지운 뒤
    /// 뒤 번호 포인트를 하나씩 당깁니다.
    pub async fn delete_point(
        state: AppState,
        user_id: i64,
        point_id: i64,
    ) -> Result<DeletePointResponse, AppError> {
        let point = Self::find_point(&state.db, point_id).await?;
        AccessGate::require_game(&state.db, user_id, point.game_id, TeamRole::Member).await?;

        let txn = state.db.begin().await?;
        GameService::lock_game(&txn, point.game_id).await?;
        let point = Self::find_point(&txn, point_id).await?;
        let credited = Self::credited_ids(&txn, point_id).await?;

        apply_delta(&txn, point.game_id, &credited, StatDelta::revoke(point.got_break)).await?;

        matchup::Entity::delete_many()
            .filter(matchup::Column::PointId.eq(point_id))
            .exec(&txn)
            .await?;
        point_defender::Entity::delete_many()
            .filter(point_defender::Column::PointId.eq(point_id))
            .exec(&txn)
            .await?;
        point::Entity::delete_by_id(point_id).exec(&txn).await?;

        let renumbered = point::Entity::update_many()
            .col_expr(
                point::Column::PointNumber,
                Expr::col(point::Column::PointNumber).sub(1),
            )
            .filter(point::Column::GameId.eq(point.game_id))
            .filter(point::Column::PointNumber.gt(point.point_number))
            .exec(&txn)
            .await?
            .rows_affected;

        GameService::record_activity(
            &txn,
            point.game_id,
            user_id,
            "point-deleted",
            Some(format!("#{}", point.point_number)),
        )
        .await?;

        txn.commit().await?;
        info!(
            game_id = point.game_id,
            point_id,
            point_number = point.point_number,
            renumbered,
            user_id,
            "포인트 삭제 완료"
        );

        state.relay.publish(
            point.game_id,
            LiveEvent::PointDeleted {
                point_id,
                point_number: point.point_number,
            },
        );

        Ok(DeletePointResponse {
            point_id,
            point_number: point.point_number,
            renumbered,
        })
    }

    /// 매치업 수정. 통계는 다시 계산하지 않습니다.
    pub async fn update_matchup(
        state: AppState,
        user_id: i64,
        matchup_id: i64,
        req: UpdateMatchupRequest,
    ) -> Result<MatchupResponse, AppError> {
        let existing = matchup::Entity::find_by_id(matchup_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::not_found("존재하지 않는 매치업입니다."))?;
        let point = Self::find_point(&state.db, existing.point_id).await?;
        let game =
            AccessGate::require_game(&state.db, user_id, point.game_id, TeamRole::Member).await?;

        if let Some(defender_id) = req.defender_id {
            ensure_team_defenders(&state.db, game.team_id, &[defender_id], "defenderId").await?;
        }

        let mut active: matchup::ActiveModel = existing.into();
        active.defender_id = Set(req.defender_id);
        active.result = Set(req.result);
        active.is_active = Set(req.is_active);
        active.updated_at = Set(Utc::now().naive_utc());
        let updated = active.update(&state.db).await?;

        info!(
            game_id = game.game_id,
            matchup_id,
            result = ?updated.result,
            user_id,
            "매치업 수정 완료"
        );

        let response = MatchupResponse::from(updated);
        state
            .relay
            .publish(game.game_id, LiveEvent::MatchupUpdated(response.clone()));
        Ok(response)
    }

    /// 게임의 전체 포인트를 매치업/출전 수비수와 함께 번호순으로 조회
    pub async fn list_for_game<C: ConnectionTrait>(
        db: &C,
        game_id: i64,
    ) -> Result<Vec<PointResponse>, AppError> {
        let points = point::Entity::find()
            .filter(point::Column::GameId.eq(game_id))
            .order_by_asc(point::Column::PointNumber)
            .all(db)
            .await?;
        if points.is_empty() {
            return Ok(Vec::new());
        }

        let point_ids: Vec<i64> = points.iter().map(|p| p.point_id).collect();
        let mut credits: HashMap<i64, Vec<i64>> = HashMap::new();
        for row in point_defender::Entity::find()
            .filter(point_defender::Column::PointId.is_in(point_ids.clone()))
            .order_by_asc(point_defender::Column::PointDefenderId)
            .all(db)
            .await?
        {
            credits.entry(row.point_id).or_default().push(row.defender_id);
        }

        let mut matchups: HashMap<i64, Vec<matchup::Model>> = HashMap::new();
        for row in matchup::Entity::find()
            .filter(matchup::Column::PointId.is_in(point_ids))
            .order_by_asc(matchup::Column::MatchupId)
            .all(db)
            .await?
        {
            matchups.entry(row.point_id).or_default().push(row);
        }

        Ok(points
            .into_iter()
            .map(|p| {
                let credited = credits.remove(&p.point_id).unwrap_or_default();
                let rows = matchups.remove(&p.point_id).unwrap_or_default();
                PointResponse::from_parts(p, credited, rows)
            })
            .collect())
    }

    async fn load_point<C: ConnectionTrait>(
        db: &C,
        point: point::Model,
    ) -> Result<PointResponse, AppError> {
        let credited = Self::credited_ids(db, point.point_id).await?;
        let matchups = matchup::Entity::find()
            .filter(matchup::Column::PointId.eq(point.point_id))
            .order_by_asc(matchup::Column::MatchupId)
            .all(db)
            .await?;
        Ok(PointResponse::from_parts(point, credited, matchups))
    }

    async fn find_point<C: ConnectionTrait>(db: &C, point_id: i64) -> Result<point::Model, AppError> {
        point::Entity::find_by_id(point_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found("존재하지 않는 포인트입니다."))
    }

    async fn credited_ids<C: ConnectionTrait>(db: &C, point_id: i64) -> Result<Vec<i64>, AppError> {
        Ok(point_defender::Entity::find()
            .filter(point_defender::Column::PointId.eq(point_id))
            .order_by_asc(point_defender::Column::PointDefenderId)
            .all(db)
            .await?
            .into_iter()
            .map(|row| row.defender_id)
            .collect())
    }
}

fn outcome_label(got_break: bool) -> &'static str {
    if got_break {
        "break"
    } else {
        "no-break"
    }
}
