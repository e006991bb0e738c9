use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::domain::game::entity::game;
use crate::domain::team::entity::team;
use crate::domain::team::entity::team_member::{self, TeamRole};
use crate::utils::error::AppError;

/// 팀/게임 접근 권한 확인을 한 곳에서 처리하는 서비스
///
/// 모든 핸들러/서비스는 직접 멤버십을 조회하지 않고 이 함수들을 거칩니다.
/// 트랜잭션 안에서도 쓸 수 있도록 `ConnectionTrait`에 대해 제네릭입니다.
pub struct AccessGate;

impl AccessGate {
    /// 사용자의 팀 내 역할 (멤버가 아니면 None)
    pub async fn team_role<C: ConnectionTrait>(
        db: &C,
        user_id: i64,
        team_id: i64,
    ) -> Result<Option<TeamRole>, AppError> {
        let membership = team_member::Entity::find()
            .filter(team_member::Column::UserId.eq(user_id))
            .filter(team_member::Column::TeamId.eq(team_id))
            .one(db)
            .await?;

        Ok(membership.map(|m| m.role))
    }

    /// 팀에 `min_role` 이상 권한이 있는지 확인하고 실제 역할을 반환
    ///
    /// - 팀 없음: 404
    /// - 멤버 아님: 403 (TEAM4031)
    /// - 권한 부족: 403 (TEAM4032)
    pub async fn require_team<C: ConnectionTrait>(
        db: &C,
        user_id: i64,
        team_id: i64,
        min_role: TeamRole,
    ) -> Result<TeamRole, AppError> {
        let team_exists = team::Entity::find_by_id(team_id).one(db).await?;
        if team_exists.is_none() {
            return Err(AppError::not_found("존재하지 않는 팀입니다."));
        }

        let role = Self::team_role(db, user_id, team_id)
            .await?
            .ok_or_else(|| AppError::TeamAccessDenied("해당 팀의 멤버가 아닙니다.".to_string()))?;

        Self::check_role(role, min_role)?;
        Ok(role)
    }

    /// 게임이 속한 팀에 `min_role` 이상 권한이 있는지 확인하고 게임을 반환
    pub async fn require_game<C: ConnectionTrait>(
        db: &C,
        user_id: i64,
        game_id: i64,
        min_role: TeamRole,
    ) -> Result<game::Model, AppError> {
        let game = game::Entity::find_by_id(game_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found("존재하지 않는 게임입니다."))?;

        let role = Self::team_role(db, user_id, game.team_id)
            .await?
            .ok_or_else(|| AppError::TeamAccessDenied("해당 팀의 멤버가 아닙니다.".to_string()))?;

        Self::check_role(role, min_role)?;
        Ok(game)
    }

    /// 읽기 권한 확인 (공개 게임은 멤버십 검사 생략)
    ///
    /// 비로그인 사용자에게는 비공개 게임의 존재 여부를 노출하지 않도록 404로 응답합니다.
    pub async fn readable_game<C: ConnectionTrait>(
        db: &C,
        user_id: Option<i64>,
        game: game::Model,
    ) -> Result<game::Model, AppError> {
        if game.is_public {
            return Ok(game);
        }

        let Some(user_id) = user_id else {
            return Err(AppError::not_found("존재하지 않는 게임입니다."));
        };

        match Self::team_role(db, user_id, game.team_id).await? {
            Some(_) => Ok(game),
            None => Err(AppError::TeamAccessDenied(
                "해당 게임에 접근 권한이 없습니다.".to_string(),
            )),
        }
    }

    /// id로 게임을 찾아 읽기 권한을 확인
    pub async fn readable_game_by_id<C: ConnectionTrait>(
        db: &C,
        user_id: Option<i64>,
        game_id: i64,
    ) -> Result<game::Model, AppError> {
        let game = game::Entity::find_by_id(game_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found("존재하지 않는 게임입니다."))?;

        Self::readable_game(db, user_id, game).await
    }

    pub fn check_role(role: TeamRole, min_role: TeamRole) -> Result<(), AppError> {
        if role.satisfies(min_role) {
            Ok(())
        } else {
            Err(AppError::InsufficientRole(format!(
                "{:?} 이상의 권한이 필요합니다.",
                min_role
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_role_should_reject_lower_role() {
        let err = AccessGate::check_role(TeamRole::Viewer, TeamRole::Member).unwrap_err();
        assert!(matches!(err, AppError::InsufficientRole(_)));
    }

    #[test]
    fn check_role_should_accept_higher_role() {
        assert!(AccessGate::check_role(TeamRole::Owner, TeamRole::Admin).is_ok());
        assert!(AccessGate::check_role(TeamRole::Member, TeamRole::Viewer).is_ok());
    }
}
