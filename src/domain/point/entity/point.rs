use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "point")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub point_id: i64,
    pub game_id: i64,
    /// 게임 내 1부터 시작하는 연속 번호 (삭제 시 뒤 번호를 당겨 빈 번호 없음)
    pub point_number: i32,
    pub got_break: bool,
    pub wind_speed: Option<i32>,
    pub wind_direction: Option<String>,
    pub notes: Option<String>,
    /// 클라이언트 재전송 중복 방지 키. (game_id, client_key) unique
    pub client_key: Option<String>,
    pub created_by: i64,
    pub created_at: DateTime,
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
    #[sea_orm(has_many = "super::matchup::Entity")]
    Matchup,
    #[sea_orm(has_many = "super::point_defender::Entity")]
    PointDefender,
}

impl Related<crate::domain::game::entity::game::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Game.def()
    }
}

impl Related<super::matchup::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Matchup.def()
    }
}

impl Related<super::point_defender::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PointDefender.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
