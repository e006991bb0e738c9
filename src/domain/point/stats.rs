use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set,
};
use tracing::warn;

use crate::domain::defender::entity::defender_stats;
use crate::utils::error::AppError;

/// DefenderStats 한 행에 더할 증감량
///
/// 포인트 생성/수정/삭제는 모두 이 값으로 표현되며, 같은 트랜잭션 안에서
/// 출전 수비수 전원에게 동일하게 적용됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatDelta {
    pub points_played: i32,
    pub breaks: i32,
    pub no_breaks: i32,
}

impl StatDelta {
    /// 포인트 출전 기록
    pub fn credit(got_break: bool) -> Self {
        Self {
            points_played: 1,
            breaks: i32::from(got_break),
            no_breaks: i32::from(!got_break),
        }
    }

    /// 포인트 삭제 시 출전 기록 회수
    pub fn revoke(got_break: bool) -> Self {
        let credit = Self::credit(got_break);
        Self {
            points_played: -credit.points_played,
            breaks: -credit.breaks,
            no_breaks: -credit.no_breaks,
        }
    }

    /// 결과가 바뀐 경우의 이동량. pointsPlayed는 건드리지 않습니다.
    pub fn outcome_change(was_break: bool, now_break: bool) -> Self {
        if was_break == now_break {
            return Self::default();
        }
        let shift = if now_break { 1 } else { -1 };
        Self {
            points_played: 0,
            breaks: shift,
            no_breaks: -shift,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }

    /// 기존 카운터에 적용한 결과 (음수는 0으로 고정)
    pub fn applied_to(&self, points_played: i32, breaks: i32, no_breaks: i32) -> (i32, i32, i32) {
        (
            (points_played + self.points_played).max(0),
            (breaks + self.breaks).max(0),
            (no_breaks + self.no_breaks).max(0),
        )
    }
}

/// 수비수 목록의 (defender, game) 통계 행에 증감량을 반영합니다.
///
/// 행이 없으면 양수 증감일 때만 새로 만듭니다. 반드시 포인트 변경과 같은
/// 트랜잭션 커넥션으로 호출해야 합니다.
pub async fn apply_delta<C: ConnectionTrait>(
    conn: &C,
    game_id: i64,
    defender_ids: &[i64],
    delta: StatDelta,
) -> Result<(), AppError> {
    if delta.is_zero() || defender_ids.is_empty() {
        return Ok(());
    }

    let now = Utc::now().naive_utc();
    let existing = defender_stats::Entity::find()
        .filter(defender_stats::Column::GameId.eq(game_id))
        .filter(defender_stats::Column::DefenderId.is_in(defender_ids.to_vec()))
        .all(conn)
        .await?;

    for &defender_id in defender_ids {
        match existing.iter().find(|s| s.defender_id == defender_id) {
            Some(row) => {
                let (points_played, breaks, no_breaks) =
                    delta.applied_to(row.points_played, row.breaks, row.no_breaks);
                if points_played != breaks + no_breaks {
                    warn!(
                        game_id,
                        defender_id, points_played, breaks, no_breaks, "통계 불변식 불일치"
                    );
                }

                let mut active: defender_stats::ActiveModel = row.clone().into();
                active.points_played = Set(points_played);
                active.breaks = Set(breaks);
                active.no_breaks = Set(no_breaks);
                active.updated_at = Set(now);
                active.update(conn).await?;
            }
            None if delta.points_played > 0 => {
                let (points_played, breaks, no_breaks) = delta.applied_to(0, 0, 0);
                defender_stats::ActiveModel {
                    defender_id: Set(defender_id),
                    game_id: Set(game_id),
                    points_played: Set(points_played),
                    breaks: Set(breaks),
                    no_breaks: Set(no_breaks),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(conn)
                .await?;
            }
            None => {
                warn!(game_id, defender_id, ?delta, "감소할 통계 행이 없습니다.");
            }
        }
    }

    Ok(())
}

/// 브레이크 비율 (0~100 반올림). 출전 0이면 0.
pub fn break_percentage(breaks: i32, points_played: i32) -> i32 {
    if points_played <= 0 {
        return 0;
    }
    ((f64::from(breaks) / f64::from(points_played)) * 100.0).round() as i32
}

/// 표시용 비율 문자열. 출전 0이면 "N/A".
pub fn break_percentage_label(breaks: i32, points_played: i32) -> String {
    if points_played <= 0 {
        "N/A".to_string()
    } else {
        format!("{}%", break_percentage(breaks, points_played))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(counters: (i32, i32, i32), delta: StatDelta) -> (i32, i32, i32) {
        delta.applied_to(counters.0, counters.1, counters.2)
    }

    #[test]
    fn credit_should_add_one_point_and_one_outcome() {
        assert_eq!(apply((0, 0, 0), StatDelta::credit(true)), (1, 1, 0));
        assert_eq!(apply((0, 0, 0), StatDelta::credit(false)), (1, 0, 1));
    }

    #[test]
    fn revoke_should_undo_credit() {
        let after = apply((0, 0, 0), StatDelta::credit(true));
        assert_eq!(apply(after, StatDelta::revoke(true)), (0, 0, 0));
    }

    #[test]
    fn toggling_outcome_twice_should_restore_counters() {
        let start = (3, 2, 1);

        let flipped = apply(start, StatDelta::outcome_change(true, false));
        let restored = apply(flipped, StatDelta::outcome_change(false, true));

        assert_eq!(flipped, (3, 1, 2));
        assert_eq!(restored, start);
    }

    #[test]
    fn unchanged_outcome_should_be_zero_delta() {
        assert!(StatDelta::outcome_change(true, true).is_zero());
        assert!(StatDelta::outcome_change(false, false).is_zero());
    }

    #[test]
    fn decrement_should_clamp_at_zero() {
        assert_eq!(apply((0, 0, 0), StatDelta::revoke(false)), (0, 0, 0));
    }

    #[test]
    fn break_percentage_should_round_and_handle_zero() {
        assert_eq!(break_percentage(0, 0), 0);
        assert_eq!(break_percentage(1, 3), 33);
        assert_eq!(break_percentage(2, 3), 67);
        assert_eq!(break_percentage(1, 2), 50);
        assert_eq!(break_percentage_label(0, 0), "N/A");
        assert_eq!(break_percentage_label(1, 2), "50%");
    }
}
