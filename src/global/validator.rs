use std::collections::HashSet;

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::domain::defender::entity::defender;
use crate::domain::game::entity::offensive_player;
use crate::utils::error::AppError;

/// id 목록에 중복이 없는지 확인합니다.
pub fn ensure_distinct(ids: &[i64], field: &str) -> Result<(), AppError> {
    let mut seen = HashSet::with_capacity(ids.len());
    if let Some(dup) = ids.iter().find(|id| !seen.insert(**id)) {
        return Err(AppError::field(field, format!("중복된 id가 있습니다: {}", dup)));
    }
    Ok(())
}

/// id 목록 길이 상한 확인 (Vec 길이 규칙을 derive로 걸 수 없는 경로용)
pub fn ensure_max_len(ids: &[i64], max: usize, field: &str) -> Result<(), AppError> {
    if ids.len() > max {
        return Err(AppError::field(
            field,
            format!("최대 {}개까지 지정할 수 있습니다.", max),
        ));
    }
    Ok(())
}

/// 모든 수비수가 해당 팀 소속인지 확인합니다.
pub async fn ensure_team_defenders<C: ConnectionTrait>(
    db: &C,
    team_id: i64,
    defender_ids: &[i64],
    field: &str,
) -> Result<(), AppError> {
    if defender_ids.is_empty() {
        return Ok(());
    }

    let found: HashSet<i64> = defender::Entity::find()
        .filter(defender::Column::TeamId.eq(team_id))
        .filter(defender::Column::DefenderId.is_in(defender_ids.to_vec()))
        .all(db)
        .await?
        .into_iter()
        .map(|d| d.defender_id)
        .collect();

    match defender_ids.iter().find(|id| !found.contains(id)) {
        Some(missing) => Err(AppError::field(
            field,
            format!("팀에 속하지 않은 수비수입니다: {}", missing),
        )),
        None => Ok(()),
    }
}

/// 모든 공격수가 해당 게임 소속인지 확인합니다.
pub async fn ensure_game_players<C: ConnectionTrait>(
    db: &C,
    game_id: i64,
    player_ids: &[i64],
    field: &str,
) -> Result<(), AppError> {
    if player_ids.is_empty() {
        return Ok(());
    }

    let found: HashSet<i64> = offensive_player::Entity::find()
        .filter(offensive_player::Column::GameId.eq(game_id))
        .filter(offensive_player::Column::OffensivePlayerId.is_in(player_ids.to_vec()))
        .all(db)
        .await?
        .into_iter()
        .map(|p| p.offensive_player_id)
        .collect();

    match player_ids.iter().find(|id| !found.contains(id)) {
        Some(missing) => Err(AppError::field(
            field,
            format!("게임에 속하지 않은 공격수입니다: {}", missing),
        )),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_pass_distinct_ids() {
        assert!(ensure_distinct(&[1, 2, 3], "ids").is_ok());
        assert!(ensure_distinct(&[], "ids").is_ok());
    }

    #[test]
    fn should_reject_duplicate_ids() {
        let err = ensure_distinct(&[4, 5, 4], "defenderIds").unwrap_err();

        let AppError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        assert_eq!(fields[0].field, "defenderIds");
        assert!(fields[0].message.contains('4'));
    }

    #[test]
    fn should_reject_too_many_ids() {
        assert!(ensure_max_len(&[1, 2, 3, 4, 5, 6, 7], 7, "ids").is_ok());
        assert!(ensure_max_len(&[1, 2, 3, 4, 5, 6, 7, 8], 7, "ids").is_err());
    }
}
