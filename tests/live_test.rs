//! 실시간 동기화 소켓 테스트
//!
//! 테스트 대상:
//! - GET /ws (토큰 검증)
//! - 소켓 메시지 처리: join-game, leave-game, ping, 잘못된 메시지

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::Value;
use tokio::{sync::mpsc, time::timeout};

use matchup_server::domain::live::handler::LiveSession;
use matchup_server::domain::live::LiveEvent;

use common::*;

struct Fixture {
    app: TestApp,
    owner: i64,
    private_game: i64,
    public_game: i64,
}

async fn fixture() -> Fixture {
    let app = setup().await;
    let owner = seed_user(&app, "coach").await;
    let team_id = seed_team(&app, owner, "Ring").await;
    let private_game = create_game(&app, owner, team_id, false).await["gameId"]
        .as_i64()
        .unwrap();
    let public_game = create_game(&app, owner, team_id, true).await["gameId"]
        .as_i64()
        .unwrap();

    Fixture {
        app,
        owner,
        private_game,
        public_game,
    }
}

fn session(f: &Fixture, user_id: Option<i64>) -> (LiveSession, mpsc::Receiver<String>) {
    let (tx, rx) = mpsc::channel(16);
    (LiveSession::new(f.app.state.clone(), user_id, tx), rx)
}

async fn send(session: &mut LiveSession, text: &str) -> Value {
    serde_json::from_str(&session.handle_text(text).await).unwrap()
}

async fn next_frame(rx: &mut mpsc::Receiver<String>) -> Option<Value> {
    match timeout(Duration::from_millis(100), rx.recv()).await {
        Ok(Some(text)) => Some(serde_json::from_str(&text).unwrap()),
        _ => None,
    }
}

fn removed(id: i64) -> LiveEvent {
    LiveEvent::PlayerRemoved {
        offensive_player_id: id,
    }
}

mod join {
    use super::*;

    #[tokio::test]
    async fn should_join_team_game_and_receive_events() {
        // Arrange
        let f = fixture().await;
        let (mut session, mut rx) = session(&f, Some(f.owner));
        let join = format!(r#"{{"type":"join-game","gameId":{}}}"#, f.private_game);

        // Act
        let reply = send(&mut session, &join).await;
        let seq = f.app.state.relay.publish(f.private_game, removed(3));

        // Assert
        assert_eq!(reply["type"], "joined");
        assert_eq!(reply["gameId"], f.private_game);
        assert_eq!(reply["seq"].as_u64().unwrap() + 1, seq);
        let frame = next_frame(&mut rx).await.expect("event frame");
        assert_eq!(frame["type"], "event");
        assert_eq!(frame["seq"], seq);
        assert_eq!(frame["event"]["name"], "player-removed");
    }

    #[tokio::test]
    async fn should_reject_anonymous_join_of_private_game() {
        let f = fixture().await;
        let (mut session, _rx) = session(&f, None);

        let reply = send(
            &mut session,
            &format!(r#"{{"type":"join-game","gameId":{}}}"#, f.private_game),
        )
        .await;

        assert_eq!(reply["type"], "error");
        assert_eq!(session.joined_rooms(), 0);
    }

    #[tokio::test]
    async fn should_allow_anonymous_join_of_public_game() {
        let f = fixture().await;
        let (mut session, _rx) = session(&f, None);

        let reply = send(
            &mut session,
            &format!(r#"{{"type":"join-game","gameId":{}}}"#, f.public_game),
        )
        .await;

        assert_eq!(reply["type"], "joined");
        assert_eq!(session.joined_rooms(), 1);
    }

    #[tokio::test]
    async fn should_reject_join_by_non_member() {
        let f = fixture().await;
        let outsider = seed_user(&f.app, "outsider").await;
        let (mut session, _rx) = session(&f, Some(outsider));

        let reply = send(
            &mut session,
            &format!(r#"{{"type":"join-game","gameId":{}}}"#, f.private_game),
        )
        .await;

        assert_eq!(reply["type"], "error");
    }
}

mod leave {
    use super::*;

    #[tokio::test]
    async fn should_stop_delivery_after_leaving() {
        // Arrange
        let f = fixture().await;
        let (mut session, mut rx) = session(&f, Some(f.owner));
        send(
            &mut session,
            &format!(r#"{{"type":"join-game","gameId":{}}}"#, f.private_game),
        )
        .await;
        f.app.state.relay.publish(f.private_game, removed(1));
        assert!(next_frame(&mut rx).await.is_some());

        // Act
        let reply = send(
            &mut session,
            &format!(r#"{{"type":"leave-game","gameId":{}}}"#, f.private_game),
        )
        .await;
        f.app.state.relay.publish(f.private_game, removed(2));

        // Assert
        assert_eq!(reply["type"], "left");
        assert_eq!(session.joined_rooms(), 0);
        assert!(next_frame(&mut rx).await.is_none());
    }
}

mod control {
    use super::*;

    #[tokio::test]
    async fn should_answer_ping_with_pong() {
        let f = fixture().await;
        let (mut session, _rx) = session(&f, None);

        let reply = send(&mut session, r#"{"type":"ping"}"#).await;

        assert_eq!(reply["type"], "pong");
    }

    #[tokio::test]
    async fn should_reply_error_to_malformed_message() {
        let f = fixture().await;
        let (mut session, _rx) = session(&f, None);

        let reply = send(&mut session, "{not json").await;
        let unknown = send(&mut session, r#"{"type":"dance"}"#).await;

        assert_eq!(reply["type"], "error");
        assert!(reply["message"].is_string());
        assert_eq!(unknown["type"], "error");
    }
}

mod upgrade {
    use super::*;

    #[tokio::test]
    async fn should_return_401_for_invalid_query_token() {
        let app = setup().await;

        let (status, body) = call(&app, "GET", "/ws?token=garbage", None, None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "AUTH4001");
    }

    #[tokio::test]
    async fn should_reject_plain_http_request_without_upgrade() {
        let app = setup().await;

        let (status, _) = call(&app, "GET", "/ws", None, None).await;

        assert!(status.is_client_error());
        assert_ne!(status, StatusCode::UNAUTHORIZED);
    }
}
