use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::{IntoResponse, Response},
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::{
    sync::{
        broadcast::{self, error::RecvError},
        mpsc::{self, error::TrySendError},
    },
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::domain::access::AccessGate;
use crate::state::AppState;
use crate::utils::auth::{user_id_from_token, OptionalAuthUser};
use crate::utils::error::AppError;

use super::event::{ClientMessage, ServerMessage};
use super::relay::{GameRelay, RelayFrame};

#[derive(Debug, Deserialize)]
pub struct LiveQuery {
    pub token: Option<String>,
}

/// 실시간 게임 동기화 WebSocket
///
/// 토큰은 `?token=` 또는 Authorization 헤더로 전달합니다. 토큰이 없으면
/// 공개 게임에만 참가할 수 있습니다. 토큰은 업그레이드 전에 검증합니다.
#[utoipa::path(
    get,
    path = "/ws",
    params(("token" = Option<String>, Query, description = "액세스 토큰")),
    responses(
        (status = 101, description = "WebSocket 전환"),
        (status = 401, description = "유효하지 않은 토큰", body = ErrorResponse)
    ),
    tag = "Live"
)]
pub async fn live_socket(
    State(state): State<AppState>,
    Query(query): Query<LiveQuery>,
    auth: OptionalAuthUser,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Result<Response, AppError> {
    let user_id = match (auth.user_id()?, query.token) {
        (Some(user_id), _) => Some(user_id),
        (None, Some(token)) => Some(user_id_from_token(&token, &state.config.jwt_secret)?),
        (None, None) => None,
    };

    Ok(match ws {
        Ok(ws) => ws
            .on_upgrade(move |socket| handle_socket(state, socket, user_id))
            .into_response(),
        Err(rejection) => rejection.into_response(),
    })
}

async fn handle_socket(state: AppState, socket: WebSocket, user_id: Option<i64>) {
    let (mut sender, mut receiver) = socket.split();
    let (outbound_tx, mut outbound_rx) =
        mpsc::channel::<String>(state.config.live_channel_capacity.max(1));

    let writer_task = tokio::spawn(async move {
        while let Some(text) = outbound_rx.recv().await {
            if sender.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    info!(?user_id, "live socket connected");
    let mut session = LiveSession::new(state, user_id, outbound_tx.clone());

    while let Some(frame) = receiver.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            // Ping에 대한 Pong은 axum이 자동으로 응답
            Ok(_) => continue,
            Err(e) => {
                debug!(error = %e, "live socket read failed");
                break;
            }
        };

        let reply = session.handle_text(&text).await;
        if outbound_tx.send(reply).await.is_err() {
            break;
        }
    }

    drop(session);
    drop(outbound_tx);
    let _ = writer_task.await;
    info!(?user_id, "live socket closed");
}

/// 소켓 하나의 룸 구독 상태
///
/// 클라이언트 메시지마다 응답 프레임 하나를 돌려주고, 참가한 룸의 이벤트는
/// `outbound`로 흘려보냅니다. 드롭되면 모든 룸 구독을 끊습니다.
pub struct LiveSession {
    state: AppState,
    user_id: Option<i64>,
    outbound: mpsc::Sender<String>,
    rooms: HashMap<i64, JoinHandle<()>>,
}

impl LiveSession {
    pub fn new(state: AppState, user_id: Option<i64>, outbound: mpsc::Sender<String>) -> Self {
        Self {
            state,
            user_id,
            outbound,
            rooms: HashMap::new(),
        }
    }

    pub async fn handle_text(&mut self, text: &str) -> String {
        match serde_json::from_str::<ClientMessage>(text) {
            Ok(ClientMessage::JoinGame { game_id }) => self.join(game_id).await,
            Ok(ClientMessage::LeaveGame { game_id }) => self.leave(game_id),
            Ok(ClientMessage::Ping) => ServerMessage::Pong.to_json(),
            Err(e) => ServerMessage::Error {
                message: format!("알 수 없는 메시지입니다: {}", e),
            }
            .to_json(),
        }
    }

    pub fn joined_rooms(&self) -> usize {
        self.rooms.len()
    }

    async fn join(&mut self, game_id: i64) -> String {
        let user_id = self.user_id;
        if let Err(e) = AccessGate::readable_game_by_id(&self.state.db, user_id, game_id).await {
            warn!(?user_id, game_id, error = %e, "live join rejected");
            return ServerMessage::Error {
                message: e.message(),
            }
            .to_json();
        }

        if self.rooms.contains_key(&game_id) {
            let seq = self.state.relay.current_seq(game_id);
            return ServerMessage::Joined { game_id, seq }.to_json();
        }

        let (receiver, seq) = self.state.relay.subscribe(game_id);
        let task = tokio::spawn(forward_room(
            self.state.relay.clone(),
            game_id,
            receiver,
            self.outbound.clone(),
        ));
        self.rooms.insert(game_id, task);

        debug!(?user_id, game_id, seq, "live room joined");
        ServerMessage::Joined { game_id, seq }.to_json()
    }

    fn leave(&mut self, game_id: i64) -> String {
        if let Some(task) = self.rooms.remove(&game_id) {
            task.abort();
        }
        ServerMessage::Left { game_id }.to_json()
    }
}

impl Drop for LiveSession {
    fn drop(&mut self) {
        for (_, task) in self.rooms.drain() {
            task.abort();
        }
    }
}

/// 룸 이벤트를 소켓 송신 큐로 옮깁니다.
///
/// 송신 큐가 가득 차거나 broadcast 수신이 밀리면 이후 프레임을 버리고
/// 최신 위치로 다시 구독한 뒤 `resync`를 보냅니다. 클라이언트는 이를 받으면
/// 게임을 다시 조회합니다.
async fn forward_room(
    relay: Arc<GameRelay>,
    game_id: i64,
    mut receiver: broadcast::Receiver<RelayFrame>,
    outbound: mpsc::Sender<String>,
) {
    loop {
        match receiver.recv().await {
            Ok(frame) => match outbound.try_send(frame.text.to_string()) {
                Ok(()) => continue,
                Err(TrySendError::Closed(_)) => break,
                Err(TrySendError::Full(_)) => {
                    warn!(game_id, seq = frame.seq, "live outbound queue full")
                }
            },
            Err(RecvError::Lagged(skipped)) => warn!(game_id, skipped, "live subscriber lagged"),
            Err(RecvError::Closed) => break,
        }

        receiver = receiver.resubscribe();
        let resync = ServerMessage::Resync {
            game_id,
            seq: relay.current_seq(game_id),
        }
        .to_json();
        if outbound.send(resync).await.is_err() {
            break;
        }
    }
}
