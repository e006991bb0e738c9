use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;

use crate::domain::access::AccessGate;
use crate::domain::user::entity::user;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::random;

use super::dto::{
    normalize_invite_code, CreateTeamRequest, JoinTeamRequest, TeamDetailResponse,
    TeamMemberItem, TeamResponse, UpdateMemberRoleRequest,
};
use super::entity::team;
use super::entity::team_member::{self, TeamRole};

pub struct TeamService;

impl TeamService {
    /// 팀 생성 (생성자는 OWNER)
    pub async fn create_team(
        state: AppState,
        user_id: i64,
        req: CreateTeamRequest,
    ) -> Result<TeamResponse, AppError> {
        let now = Utc::now().naive_utc();
        let txn = state.db.begin().await?;

        let created = team::ActiveModel {
            slug: Set(random::slug(&req.name)),
            invite_code: Set(random::invite_code()),
            name: Set(req.name),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        team_member::ActiveModel {
            user_id: Set(user_id),
            team_id: Set(created.team_id),
            role: Set(TeamRole::Owner),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(team_id = created.team_id, user_id, "팀 생성 완료");
        Ok(TeamResponse::new(created, TeamRole::Owner))
    }

    /// 내가 속한 팀 목록
    pub async fn list_my_teams(state: AppState, user_id: i64) -> Result<Vec<TeamResponse>, AppError> {
        let rows = team_member::Entity::find()
            .filter(team_member::Column::UserId.eq(user_id))
            .order_by_asc(team_member::Column::CreatedAt)
            .find_also_related(team::Entity)
            .all(&state.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(membership, team)| team.map(|t| TeamResponse::new(t, membership.role)))
            .collect())
    }

    pub async fn get_team(
        state: AppState,
        user_id: i64,
        team_id: i64,
    ) -> Result<TeamDetailResponse, AppError> {
        let my_role = AccessGate::require_team(&state.db, user_id, team_id, TeamRole::Viewer).await?;
        let team = Self::find_team(&state, team_id).await?;

        let mut members: Vec<TeamMemberItem> = team_member::Entity::find()
            .filter(team_member::Column::TeamId.eq(team_id))
            .find_also_related(user::Entity)
            .all(&state.db)
            .await?
            .into_iter()
            .filter_map(|(membership, user)| {
                user.map(|u| TeamMemberItem {
                    user_id: u.user_id,
                    username: u.username,
                    role: membership.role,
                    joined_at: membership.created_at,
                })
            })
            .collect();
        members.sort_by(|a, b| {
            b.role
                .rank()
                .cmp(&a.role.rank())
                .then_with(|| a.joined_at.cmp(&b.joined_at))
        });

        Ok(TeamDetailResponse {
            team: TeamResponse::new(team, my_role),
            members,
        })
    }

    /// 초대 코드로 팀 참여 (MEMBER 역할)
    pub async fn join_team(
        state: AppState,
        user_id: i64,
        req: JoinTeamRequest,
    ) -> Result<TeamResponse, AppError> {
        let code = normalize_invite_code(&req.invite_code);
        let team = team::Entity::find()
            .filter(team::Column::InviteCode.eq(code))
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::not_found("유효하지 않은 초대 코드입니다."))?;

        if AccessGate::team_role(&state.db, user_id, team.team_id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("이미 참여한 팀입니다."));
        }

        team_member::ActiveModel {
            user_id: Set(user_id),
            team_id: Set(team.team_id),
            role: Set(TeamRole::Member),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(&state.db)
        .await?;

        info!(team_id = team.team_id, user_id, "팀 참여 완료");
        Ok(TeamResponse::new(team, TeamRole::Member))
    }

    /// 멤버 역할 변경 (ADMIN 이상). OWNER 역할은 이 경로로 주거나 뺏을 수 없습니다.
    pub async fn update_member_role(
        state: AppState,
        user_id: i64,
        team_id: i64,
        target_user_id: i64,
        req: UpdateMemberRoleRequest,
    ) -> Result<TeamMemberItem, AppError> {
        AccessGate::require_team(&state.db, user_id, team_id, TeamRole::Admin).await?;
        if req.role == TeamRole::Owner {
            return Err(AppError::bad_request("OWNER 역할은 부여할 수 없습니다."));
        }

        let membership = Self::find_membership(&state, team_id, target_user_id).await?;
        if membership.role == TeamRole::Owner {
            return Err(AppError::forbidden("OWNER의 역할은 변경할 수 없습니다."));
        }

        let mut active: team_member::ActiveModel = membership.into();
        active.role = Set(req.role);
        let updated = active.update(&state.db).await?;

        let target = user::Entity::find_by_id(target_user_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::not_found("존재하지 않는 사용자입니다."))?;

        info!(team_id, target_user_id, role = ?updated.role, user_id, "멤버 역할 변경");
        Ok(TeamMemberItem {
            user_id: target.user_id,
            username: target.username,
            role: updated.role,
            joined_at: updated.created_at,
        })
    }

    /// 멤버 내보내기 (ADMIN 이상). OWNER와 자기 자신은 대상이 될 수 없습니다.
    pub async fn remove_member(
        state: AppState,
        user_id: i64,
        team_id: i64,
        target_user_id: i64,
    ) -> Result<(), AppError> {
        AccessGate::require_team(&state.db, user_id, team_id, TeamRole::Admin).await?;
        if target_user_id == user_id {
            return Err(AppError::bad_request("자기 자신은 팀 나가기를 사용하세요."));
        }

        let membership = Self::find_membership(&state, team_id, target_user_id).await?;
        if membership.role == TeamRole::Owner {
            return Err(AppError::forbidden("OWNER는 내보낼 수 없습니다."));
        }

        team_member::Entity::delete_by_id(membership.team_member_id)
            .exec(&state.db)
            .await?;

        info!(team_id, target_user_id, user_id, "멤버 내보내기 완료");
        Ok(())
    }

    /// 팀 나가기
    ///
    /// OWNER는 다른 ADMIN이 있을 때만 나갈 수 있으며, 가장 먼저 합류한 ADMIN이
    /// 같은 트랜잭션에서 OWNER가 됩니다.
    pub async fn leave_team(state: AppState, user_id: i64, team_id: i64) -> Result<(), AppError> {
        let role = AccessGate::require_team(&state.db, user_id, team_id, TeamRole::Viewer).await?;
        let membership = Self::find_membership(&state, team_id, user_id).await?;

        let txn = state.db.begin().await?;
        if role == TeamRole::Owner {
            let successor = team_member::Entity::find()
                .filter(team_member::Column::TeamId.eq(team_id))
                .filter(team_member::Column::Role.eq(TeamRole::Admin))
                .order_by_asc(team_member::Column::CreatedAt)
                .order_by_asc(team_member::Column::TeamMemberId)
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    AppError::bad_request("다른 ADMIN이 있어야 OWNER가 팀을 나갈 수 있습니다.")
                })?;

            let successor_id = successor.user_id;
            let mut active: team_member::ActiveModel = successor.into();
            active.role = Set(TeamRole::Owner);
            active.update(&txn).await?;
            info!(team_id, from = user_id, to = successor_id, "OWNER 위임");
        }

        team_member::Entity::delete_by_id(membership.team_member_id)
            .exec(&txn)
            .await?;
        txn.commit().await?;

        info!(team_id, user_id, "팀 나가기 완료");
        Ok(())
    }

    /// 팀 삭제 (OWNER). 팀 하위 데이터는 FK cascade로 모두 삭제됩니다.
    pub async fn delete_team(state: AppState, user_id: i64, team_id: i64) -> Result<(), AppError> {
        AccessGate::require_team(&state.db, user_id, team_id, TeamRole::Owner).await?;

        team::Entity::delete_by_id(team_id).exec(&state.db).await?;

        info!(team_id, user_id, "팀 삭제 완료");
        Ok(())
    }

    async fn find_team(state: &AppState, team_id: i64) -> Result<team::Model, AppError> {
        team::Entity::find_by_id(team_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::not_found("존재하지 않는 팀입니다."))
    }

    async fn find_membership(
        state: &AppState,
        team_id: i64,
        user_id: i64,
    ) -> Result<team_member::Model, AppError> {
        team_member::Entity::find()
            .filter(team_member::Column::TeamId.eq(team_id))
            .filter(team_member::Column::UserId.eq(user_id))
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::not_found("팀 멤버가 아닙니다."))
    }
}
