use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum MatchupResult {
    #[sea_orm(string_value = "SHUTDOWN")]
    Shutdown,
    #[sea_orm(string_value = "CONTAINED")]
    Contained,
    #[sea_orm(string_value = "SCORED_ON")]
    ScoredOn,
    #[sea_orm(string_value = "NEUTRAL")]
    Neutral,
}

impl MatchupResult {
    pub fn label(self) -> &'static str {
        match self {
            MatchupResult::Shutdown => "Shutdown",
            MatchupResult::Contained => "Contained",
            MatchupResult::ScoredOn => "Scored On",
            MatchupResult::Neutral => "Neutral",
        }
    }
}

/// 표시/배정용 기록. 통계에는 반영하지 않습니다.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "matchup")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub matchup_id: i64,
    pub point_id: i64,
    pub offensive_player_id: i64,
    pub defender_id: Option<i64>,
    pub result: MatchupResult,
    pub is_active: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
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
        on_delete = "SetNull"
    )]
    Defender,
}

impl Related<super::point::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Point.def()
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
