use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 포인트에서 "실제로 뛴" 수비수 (통계 집계의 유일한 기준, `selectedDefenderIds`)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "point_defender")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub point_defender_id: i64,
    pub point_id: i64,
    pub defender_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::point::Entity",
        from = "Column::PointId",
        to = "super::point::Column::PointId",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Point,
    #[sea_orm(
        belongs_to = "crate::domain::defender::entity::defender::Entity",
        from = "Column::DefenderId",
        to = "crate::domain::defender::entity::defender::Column::DefenderId",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Defender,
}

impl Related<super::point::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Point.def()
    }
}

impl Related<crate::domain::defender::entity::defender::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Defender.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
