use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 수비수-게임 단위 누적 통계. (defender_id, game_id) unique
///
/// 읽을 때 파생하지 않고 포인트 생성/수정/삭제 시 같은 트랜잭션에서 증감합니다.
/// 불변식: `points_played == breaks + no_breaks`
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "defender_stats")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub defender_stats_id: i64,
    pub defender_id: i64,
    pub game_id: i64,
    pub points_played: i32,
    pub breaks: i32,
    pub no_breaks: i32,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::defender::Entity",
        from = "Column::DefenderId",
        to = "super::defender::Column::DefenderId",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Defender,
    #[sea_orm(
        belongs_to = "crate::domain::game::entity::game::Entity",
        from = "Column::GameId",
        to = "crate::domain::game::entity::game::Column::GameId",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Game,
}

impl Related<super::defender::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Defender.def()
    }
}

impl Related<crate::domain::game::entity::game::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Game.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
