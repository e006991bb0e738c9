//! 선택 수비수(최대 7명)와 현재 포인트 배정 테스트
//!
//! 테스트 대상:
//! - PUT /api/selected-defenders/{game_id}
//! - PUT/DELETE /api/selected-defenders/{game_id}/current-point
//! - POST /api/lines/{line_id}/apply/{game_id}

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};
use tokio::sync::broadcast::error::TryRecvError;

use common::*;

struct Fixture {
    app: TestApp,
    owner: i64,
    team_id: i64,
    game_id: i64,
    defenders: Vec<i64>,
}

async fn fixture(defender_count: usize) -> Fixture {
    let app = setup().await;
    let owner = seed_user(&app, "captain").await;
    let team_id = seed_team(&app, owner, "Revolver").await;
    let mut defenders = Vec::new();
    for i in 0..defender_count {
        defenders.push(seed_defender(&app, team_id, &format!("D{}", i)).await);
    }
    let game = create_game(&app, owner, team_id, false).await;

    Fixture {
        game_id: game["gameId"].as_i64().unwrap(),
        app,
        owner,
        team_id,
        defenders,
    }
}

async fn put_selected(f: &Fixture, ids: &[i64]) -> (StatusCode, Value) {
    call(
        &f.app,
        "PUT",
        &format!("/api/selected-defenders/{}", f.game_id),
        Some(f.owner),
        Some(json!({ "defenderIds": ids })),
    )
    .await
}

async fn selected(f: &Fixture) -> Vec<i64> {
    let (_, body) = call(
        &f.app,
        "GET",
        &format!("/api/selected-defenders/{}", f.game_id),
        Some(f.owner),
        None,
    )
    .await;
    body["result"]["defenderIds"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_i64().unwrap())
        .collect()
}

mod selection_limit {
    use super::*;

    #[tokio::test]
    async fn should_accept_seven_defenders() {
        let f = fixture(8).await;

        let (status, body) = put_selected(&f, &f.defenders[..7]).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["defenderIds"].as_array().unwrap().len(), 7);
        assert_eq!(selected(&f).await, f.defenders[..7].to_vec());
    }

    #[tokio::test]
    async fn should_reject_eighth_defender_without_writing() {
        // Arrange
        let f = fixture(8).await;
        put_selected(&f, &f.defenders[..2]).await;

        // Act
        let (status, body) = put_selected(&f, &f.defenders).await;

        // Assert
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "COMMON400");
        assert_eq!(selected(&f).await, f.defenders[..2].to_vec());
    }

    #[tokio::test]
    async fn should_reject_duplicate_ids() {
        let f = fixture(2).await;

        let (status, _) = put_selected(&f, &[f.defenders[0], f.defenders[0]]).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(selected(&f).await.is_empty());
    }
}

mod current_point {
    use super::*;

    async fn assign(f: &Fixture, player: i64, defender: Option<i64>) -> (StatusCode, Value) {
        call(
            &f.app,
            "PUT",
            &format!("/api/selected-defenders/{}/current-point", f.game_id),
            Some(f.owner),
            Some(json!({ "offensivePlayerId": player, "defenderId": defender })),
        )
        .await
    }

    #[tokio::test]
    async fn should_reject_assignment_of_unselected_defender() {
        let f = fixture(2).await;
        let player = add_player(&f.app, f.owner, f.game_id, "Jordan").await;
        put_selected(&f, &[f.defenders[0]]).await;

        let (status, _) = assign(&f, player, Some(f.defenders[1])).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_reject_reassigning_defender_dropped_from_selection() {
        // Arrange
        let f = fixture(2).await;
        let player = add_player(&f.app, f.owner, f.game_id, "Jordan").await;
        put_selected(&f, &[f.defenders[0]]).await;
        assert_eq!(assign(&f, player, Some(f.defenders[0])).await.0, StatusCode::OK);
        put_selected(&f, &[f.defenders[1]]).await;

        // Act
        let (status, _) = assign(&f, player, Some(f.defenders[0])).await;

        // Assert
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (_, body) = call(
            &f.app,
            "GET",
            &format!("/api/selected-defenders/{}/current-point", f.game_id),
            Some(f.owner),
            None,
        )
        .await;
        assert!(body["result"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_update_existing_assignment_within_selection() {
        let f = fixture(2).await;
        let player = add_player(&f.app, f.owner, f.game_id, "Jordan").await;
        put_selected(&f, &[f.defenders[0], f.defenders[1]]).await;
        assign(&f, player, Some(f.defenders[0])).await;

        let (status, body) = assign(&f, player, Some(f.defenders[1])).await;

        assert_eq!(status, StatusCode::OK);
        let rows = body["result"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["defenderId"], f.defenders[1]);
    }

    #[tokio::test]
    async fn should_clear_assignment_and_notify_once_per_player() {
        // Arrange
        let f = fixture(3).await;
        let p1 = add_player(&f.app, f.owner, f.game_id, "Jordan").await;
        let p2 = add_player(&f.app, f.owner, f.game_id, "Sam").await;
        let p3 = add_player(&f.app, f.owner, f.game_id, "Riley").await;
        let (gone, kept) = (f.defenders[0], f.defenders[1]);
        put_selected(&f, &[gone, kept]).await;
        assert_eq!(assign(&f, p1, Some(gone)).await.0, StatusCode::OK);
        assert_eq!(assign(&f, p2, Some(gone)).await.0, StatusCode::OK);
        assert_eq!(assign(&f, p3, Some(kept)).await.0, StatusCode::OK);

        let (mut rx, _) = f.app.state.relay.subscribe(f.game_id);

        // Act
        let (status, body) = put_selected(&f, &[kept]).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        let mut cleared: Vec<i64> = body["result"]["clearedOffensivePlayerIds"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_i64().unwrap())
            .collect();
        cleared.sort();
        assert_eq!(cleared, vec![p1, p2]);

        let mut names = Vec::new();
        let mut clearing = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(frame) => {
                    let msg: Value = serde_json::from_str(&frame.text).unwrap();
                    let name = msg["event"]["name"].as_str().unwrap().to_string();
                    if name == "current-point-defender-updated" {
                        assert!(msg["event"]["payload"]["defenderId"].is_null());
                        clearing.push(msg["event"]["payload"]["offensivePlayerId"].as_i64().unwrap());
                    }
                    names.push(name);
                }
                Err(TryRecvError::Empty) => break,
                Err(e) => panic!("unexpected relay error: {:?}", e),
            }
        }
        clearing.sort();
        assert_eq!(clearing, vec![p1, p2]);
        assert_eq!(names[0], "selected-defenders-updated");

        let (_, current) = call(
            &f.app,
            "GET",
            &format!("/api/selected-defenders/{}/current-point", f.game_id),
            Some(f.owner),
            None,
        )
        .await;
        let remaining = current["result"].as_array().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0]["offensivePlayerId"], p3);
    }
}

mod lines {
    use super::*;

    #[tokio::test]
    async fn should_apply_saved_line_as_selection() {
        // Arrange
        let f = fixture(4).await;
        let (status, line) = call(
            &f.app,
            "POST",
            "/api/lines",
            Some(f.owner),
            Some(json!({
                "teamId": f.team_id,
                "name": "O-line zone",
                "defenderIds": [f.defenders[2], f.defenders[0]]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        // Act
        let (status, _) = call(
            &f.app,
            "POST",
            &format!(
                "/api/lines/{}/apply/{}",
                line["result"]["defensiveLineId"], f.game_id
            ),
            Some(f.owner),
            None,
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(selected(&f).await, vec![f.defenders[2], f.defenders[0]]);
    }

    #[tokio::test]
    async fn should_reject_line_with_eight_defenders() {
        let f = fixture(8).await;

        let (status, _) = call(
            &f.app,
            "POST",
            "/api/lines",
            Some(f.owner),
            Some(json!({ "teamId": f.team_id, "name": "Too many", "defenderIds": f.defenders })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
