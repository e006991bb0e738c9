use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 다음 포인트에 나갈 수비 라인 (Call-Your-Line). 게임당 최대 7명, 매번 전체 교체
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "selected_defender")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub selected_defender_id: i64,
    pub game_id: i64,
    pub defender_id: i64,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::domain::game::entity::game::Entity",
        from = "Column::GameId",
        to = "crate::domain::game::entity::game::Column::GameId",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Game,
    #[sea_orm(
        belongs_to = "crate::domain::defender::entity::defender::Entity",
        from = "Column::DefenderId",
        to = "crate::domain::defender::entity::defender::Column::DefenderId",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Defender,
}

impl Related<crate::domain::game::entity::game::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Game.def()
    }
}

impl Related<crate::domain::defender::entity::defender::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Defender.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
