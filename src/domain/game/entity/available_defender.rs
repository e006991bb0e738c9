use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 이 게임에 출전 가능한 팀 수비수 명단. (game_id, defender_id) unique
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "available_defender")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub available_defender_id: i64,
    pub game_id: i64,
    pub defender_id: i64,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::game::Entity",
        from = "Column::GameId",
        to = "super::game::Column::GameId",
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

impl Related<super::game::Entity> for Entity {
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
