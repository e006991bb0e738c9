use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "defender")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub defender_id: i64,
    pub team_id: i64,
    pub name: String,
    pub jersey_number: Option<i32>,
    pub position: Option<String>,
    pub notes: Option<String>,
    /// 비활성화(soft-disable). 삭제는 별도의 hard delete
    pub active: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::domain::team::entity::team::Entity",
        from = "Column::TeamId",
        to = "crate::domain::team::entity::team::Column::TeamId",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Team,
    #[sea_orm(has_many = "super::defender_stats::Entity")]
    DefenderStats,
}

impl Related<crate::domain::team::entity::team::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Team.def()
    }
}

impl Related<super::defender_stats::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DefenderStats.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
