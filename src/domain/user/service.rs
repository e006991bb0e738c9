use sea_orm::EntityTrait;

use crate::domain::team::service::TeamService;
use crate::state::AppState;
use crate::utils::error::AppError;

use super::dto::MeResponse;
use super::entity::user;

pub struct UserService;

impl UserService {
    /// 토큰 주인의 정보와 소속 팀
    pub async fn get_me(state: AppState, user_id: i64) -> Result<MeResponse, AppError> {
        let found = user::Entity::find_by_id(user_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::unauthorized("존재하지 않는 사용자입니다."))?;

        let teams = TeamService::list_my_teams(state, user_id).await?;
        Ok(MeResponse::new(found, teams))
    }
}
