use serde::{Deserialize, Serialize};

use crate::domain::game::dto::{GameResponse, OffensivePlayerResponse};
use crate::domain::point::dto::{MatchupResponse, PointResponse};

/// 게임 룸으로 전파되는 변경 이벤트
///
/// 직렬화 형식: `{"name": "point-created", "payload": {...}}`
#[derive(Debug, Clone, Serialize)]
#[serde(
    tag = "name",
    content = "payload",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum LiveEvent {
    PointCreated(PointResponse),
    PointUpdated(PointResponse),
    PointDeleted {
        point_id: i64,
        point_number: i32,
    },
    MatchupUpdated(MatchupResponse),
    PlayerAdded(OffensivePlayerResponse),
    PlayerUpdated(OffensivePlayerResponse),
    PlayerRemoved {
        offensive_player_id: i64,
    },
    PlayersReordered {
        offensive_player_ids: Vec<i64>,
    },
    SelectedDefendersUpdated {
        defender_ids: Vec<i64>,
    },
    CurrentPointDefenderUpdated {
        offensive_player_id: i64,
        defender_id: Option<i64>,
    },
    AvailableDefenderAdded {
        defender_id: i64,
    },
    AvailableDefenderRemoved {
        defender_id: i64,
    },
    GameUpdated(GameResponse),
}

impl LiveEvent {
    pub fn name(&self) -> &'static str {
        match self {
            LiveEvent::PointCreated(_) => "point-created",
            LiveEvent::PointUpdated(_) => "point-updated",
            LiveEvent::PointDeleted { .. } => "point-deleted",
            LiveEvent::MatchupUpdated(_) => "matchup-updated",
            LiveEvent::PlayerAdded(_) => "player-added",
            LiveEvent::PlayerUpdated(_) => "player-updated",
            LiveEvent::PlayerRemoved { .. } => "player-removed",
            LiveEvent::PlayersReordered { .. } => "players-reordered",
            LiveEvent::SelectedDefendersUpdated { .. } => "selected-defenders-updated",
            LiveEvent::CurrentPointDefenderUpdated { .. } => "current-point-defender-updated",
            LiveEvent::AvailableDefenderAdded { .. } => "available-defender-added",
            LiveEvent::AvailableDefenderRemoved { .. } => "available-defender-removed",
            LiveEvent::GameUpdated(_) => "game-updated",
        }
    }
}

/// 서버 → 클라이언트 메시지
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ServerMessage<'a> {
    Joined { game_id: i64, seq: u64 },
    Left { game_id: i64 },
    Pong,
    Error { message: String },
    /// 수신 지연으로 이벤트를 놓친 경우. 클라이언트는 게임을 다시 조회해야 합니다.
    Resync { game_id: i64, seq: u64 },
    Event {
        game_id: i64,
        seq: u64,
        event: &'a LiveEvent,
    },
}

impl ServerMessage<'_> {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"type":"error","message":"serialization failed: {}"}}"#, e)
        })
    }
}

/// 클라이언트 → 서버 메시지
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    JoinGame { game_id: i64 },
    LeaveGame { game_id: i64 },
    Ping,
}
