use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 저장 전 작성 중인 포인트의 공격수별 수비 배정. (game_id, offensive_player_id) unique
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "current_point_defender")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub current_point_defender_id: i64,
    pub game_id: i64,
    pub offensive_player_id: i64,
    pub defender_id: i64,
    pub updated_at: DateTime,
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
        belongs_to = "crate::domain::game::entity::offensive_player::Entity",
        from = "Column::OffensivePlayerId",
        to = "crate::domain::game::entity::offensive_player::Column::OffensivePlayerId",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    OffensivePlayer,
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

impl Related<crate::domain::game::entity::offensive_player::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OffensivePlayer.def()
    }
}

impl Related<crate::domain::defender::entity::defender::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Defender.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
