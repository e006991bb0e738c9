use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 게임 진행 상태. 전이 테이블은 강제하지 않으며 업데이트로 어떤 상태든 지정할 수 있습니다.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum GameStatus {
    #[sea_orm(string_value = "SETUP")]
    Setup,
    #[sea_orm(string_value = "IN_PROGRESS")]
    InProgress,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
    #[sea_orm(string_value = "ARCHIVED")]
    Archived,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "game")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub game_id: i64,
    pub team_id: i64,
    pub name: String,
    pub opponent: String,
    pub location: Option<String>,
    pub game_date: DateTime,
    #[sea_orm(unique)]
    pub slug: String,
    /// 공개 읽기 전용 접근 토큰
    #[sea_orm(unique)]
    pub share_code: String,
    pub status: GameStatus,
    pub is_public: bool,
    pub notes: Option<String>,
    pub created_by: i64,
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
    #[sea_orm(has_many = "super::offensive_player::Entity")]
    OffensivePlayer,
    #[sea_orm(has_many = "crate::domain::point::entity::point::Entity")]
    Point,
}

impl Related<crate::domain::team::entity::team::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Team.def()
    }
}

impl Related<super::offensive_player::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OffensivePlayer.def()
    }
}

impl Related<crate::domain::point::entity::point::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Point.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
