use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 재사용 가능한 수비 라인 템플릿 (최대 7명)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "defensive_line")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub defensive_line_id: i64,
    pub team_id: i64,
    pub name: String,
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
    #[sea_orm(has_many = "super::defensive_line_defender::Entity")]
    DefensiveLineDefender,
}

impl Related<crate::domain::team::entity::team::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Team.def()
    }
}

impl Related<super::defensive_line_defender::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DefensiveLineDefender.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
