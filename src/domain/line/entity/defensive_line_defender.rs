use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "defensive_line_defender")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub defensive_line_defender_id: i64,
    pub defensive_line_id: i64,
    pub defender_id: i64,
    pub sort_order: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::defensive_line::Entity",
        from = "Column::DefensiveLineId",
        to = "super::defensive_line::Column::DefensiveLineId",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    DefensiveLine,
    #[sea_orm(
        belongs_to = "crate::domain::defender::entity::defender::Entity",
        from = "Column::DefenderId",
        to = "crate::domain::defender::entity::defender::Column::DefenderId",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Defender,
}

impl Related<super::defensive_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DefensiveLine.def()
    }
}

impl Related<crate::domain::defender::entity::defender::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Defender.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
