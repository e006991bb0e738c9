use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum PlayerPosition {
    #[sea_orm(string_value = "HANDLER")]
    Handler,
    #[sea_orm(string_value = "CUTTER")]
    Cutter,
    #[sea_orm(string_value = "HYBRID")]
    Hybrid,
    #[sea_orm(string_value = "DEEP")]
    Deep,
    #[sea_orm(string_value = "POPPER")]
    Popper,
    #[sea_orm(string_value = "RESET")]
    Reset,
    #[sea_orm(string_value = "WING")]
    Wing,
    #[sea_orm(string_value = "OTHER")]
    Other,
}

impl PlayerPosition {
    /// CSV 등 표시용 이름
    pub fn label(self) -> &'static str {
        match self {
            PlayerPosition::Handler => "Handler",
            PlayerPosition::Cutter => "Cutter",
            PlayerPosition::Hybrid => "Hybrid",
            PlayerPosition::Deep => "Deep",
            PlayerPosition::Popper => "Popper",
            PlayerPosition::Reset => "Reset",
            PlayerPosition::Wing => "Wing",
            PlayerPosition::Other => "Other",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "offensive_player")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub offensive_player_id: i64,
    pub game_id: i64,
    pub name: String,
    pub position: PlayerPosition,
    pub is_bench: bool,
    /// 목록 표시 순서. 재정렬 시 0..n-1로 다시 씁니다.
    pub sort_order: i32,
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
}

impl Related<super::game::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Game.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
