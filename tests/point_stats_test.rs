//! 포인트 기록과 DefenderStats 누적 카운터 테스트
//!
//! 테스트 대상:
//! - POST /api/points
//! - PUT/DELETE /api/points/{point_id}
//! - GET /api/points/game/{game_id}

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::*;

struct Fixture {
    app: TestApp,
    owner: i64,
    game_id: i64,
    a: i64,
    b: i64,
}

async fn fixture() -> Fixture {
    let app = setup().await;
    let owner = seed_user(&app, "coach").await;
    let team_id = seed_team(&app, owner, "Ring").await;
    let a = seed_defender(&app, team_id, "Alex").await;
    let b = seed_defender(&app, team_id, "Blair").await;
    let game = create_game(&app, owner, team_id, false).await;
    let game_id = game["gameId"].as_i64().unwrap();

    Fixture {
        app,
        owner,
        game_id,
        a,
        b,
    }
}

async fn point_numbers(f: &Fixture) -> Vec<i64> {
    let (status, body) = call(
        &f.app,
        "GET",
        &format!("/api/points/game/{}", f.game_id),
        Some(f.owner),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["result"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["pointNumber"].as_i64().unwrap())
        .collect()
}

mod scenario {
    use super::*;

    #[tokio::test]
    async fn should_credit_selected_defenders_per_point() {
        // Arrange
        let f = fixture().await;

        // Act
        create_point(&f.app, f.owner, f.game_id, true, &[f.a, f.b]).await;
        create_point(&f.app, f.owner, f.game_id, false, &[f.a]).await;

        // Assert
        assert_eq!(stats_of(&f.app, f.owner, f.game_id, f.a).await, (2, 1, 1));
        assert_eq!(stats_of(&f.app, f.owner, f.game_id, f.b).await, (1, 1, 0));
        assert_eq!(point_numbers(&f).await, vec![1, 2]);
    }

    #[tokio::test]
    async fn should_renumber_and_revoke_credit_on_delete() {
        // Arrange
        let f = fixture().await;
        let p1 = create_point(&f.app, f.owner, f.game_id, true, &[f.a, f.b]).await;
        let p2 = create_point(&f.app, f.owner, f.game_id, false, &[f.a]).await;

        // Act
        let (status, body) = call(
            &f.app,
            "DELETE",
            &format!("/api/points/{}", p1["pointId"]),
            Some(f.owner),
            None,
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["renumbered"], 1);
        assert_eq!(point_numbers(&f).await, vec![1]);

        let (_, points) = call(
            &f.app,
            "GET",
            &format!("/api/points/game/{}", f.game_id),
            Some(f.owner),
            None,
        )
        .await;
        assert_eq!(points["result"][0]["pointId"], p2["pointId"]);

        assert_eq!(stats_of(&f.app, f.owner, f.game_id, f.a).await, (1, 0, 1));
        assert_eq!(stats_of(&f.app, f.owner, f.game_id, f.b).await, (0, 0, 0));
    }

    #[tokio::test]
    async fn should_keep_numbers_contiguous_when_deleting_middle_point() {
        let f = fixture().await;
        create_point(&f.app, f.owner, f.game_id, true, &[f.a]).await;
        let middle = create_point(&f.app, f.owner, f.game_id, false, &[f.a]).await;
        create_point(&f.app, f.owner, f.game_id, true, &[f.b]).await;

        call(
            &f.app,
            "DELETE",
            &format!("/api/points/{}", middle["pointId"]),
            Some(f.owner),
            None,
        )
        .await;

        assert_eq!(point_numbers(&f).await, vec![1, 2]);
        assert_eq!(stats_of(&f.app, f.owner, f.game_id, f.a).await, (1, 1, 0));
    }
}

mod outcome_toggle {
    use super::*;

    #[tokio::test]
    async fn should_restore_counters_after_toggling_twice() {
        // Arrange
        let f = fixture().await;
        let point = create_point(&f.app, f.owner, f.game_id, true, &[f.a, f.b]).await;
        let uri = format!("/api/points/{}", point["pointId"]);

        // Act & Assert
        let (status, _) = call(&f.app, "PUT", &uri, Some(f.owner), Some(json!({ "gotBreak": false }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats_of(&f.app, f.owner, f.game_id, f.a).await, (1, 0, 1));

        let (status, _) = call(&f.app, "PUT", &uri, Some(f.owner), Some(json!({ "gotBreak": true }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats_of(&f.app, f.owner, f.game_id, f.a).await, (1, 1, 0));
        assert_eq!(stats_of(&f.app, f.owner, f.game_id, f.b).await, (1, 1, 0));
    }

    #[tokio::test]
    async fn should_not_touch_counters_when_outcome_unchanged() {
        let f = fixture().await;
        let point = create_point(&f.app, f.owner, f.game_id, true, &[f.a]).await;

        let (status, body) = call(
            &f.app,
            "PUT",
            &format!("/api/points/{}", point["pointId"]),
            Some(f.owner),
            Some(json!({ "gotBreak": true, "notes": "zone look" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["notes"], "zone look");
        assert_eq!(stats_of(&f.app, f.owner, f.game_id, f.a).await, (1, 1, 0));
    }
}

mod create_point_validation {
    use super::*;

    #[tokio::test]
    async fn should_return_same_point_for_repeated_client_key() {
        // Arrange
        let f = fixture().await;
        let body = json!({
            "gameId": f.game_id,
            "gotBreak": true,
            "selectedDefenderIds": [f.a],
            "clientKey": "tablet-1:42"
        });

        // Act
        let (first_status, first) = call(&f.app, "POST", "/api/points", Some(f.owner), Some(body.clone())).await;
        let (second_status, second) = call(&f.app, "POST", "/api/points", Some(f.owner), Some(body)).await;

        // Assert
        assert_eq!(first_status, StatusCode::OK);
        assert_eq!(second_status, StatusCode::OK);
        assert_eq!(first["result"]["pointId"], second["result"]["pointId"]);
        assert_eq!(point_numbers(&f).await, vec![1]);
        assert_eq!(stats_of(&f.app, f.owner, f.game_id, f.a).await, (1, 1, 0));
    }

    #[tokio::test]
    async fn should_reject_eight_credited_defenders() {
        let f = fixture().await;

        let (status, body) = call(
            &f.app,
            "POST",
            "/api/points",
            Some(f.owner),
            Some(json!({
                "gameId": f.game_id,
                "gotBreak": false,
                "selectedDefenderIds": [1, 2, 3, 4, 5, 6, 7, 8]
            })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "COMMON400");
        assert!(point_numbers(&f).await.is_empty());
    }

    #[tokio::test]
    async fn should_reject_defender_from_another_team() {
        let f = fixture().await;
        let rival = seed_user(&f.app, "rival").await;
        let other_team = seed_team(&f.app, rival, "Other").await;
        let outsider = seed_defender(&f.app, other_team, "Outsider").await;

        let (status, _) = call(
            &f.app,
            "POST",
            "/api/points",
            Some(f.owner),
            Some(json!({
                "gameId": f.game_id,
                "gotBreak": true,
                "selectedDefenderIds": [f.a, outsider]
            })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(stats_of(&f.app, f.owner, f.game_id, f.a).await, (0, 0, 0));
    }

    #[tokio::test]
    async fn should_store_matchups_without_crediting_matchup_defenders() {
        // Arrange
        let f = fixture().await;
        let player = add_player(&f.app, f.owner, f.game_id, "Jordan").await;

        // Act
        let (status, body) = call(
            &f.app,
            "POST",
            "/api/points",
            Some(f.owner),
            Some(json!({
                "gameId": f.game_id,
                "gotBreak": true,
                "selectedDefenderIds": [f.a],
                "matchups": [{ "offensivePlayerId": player, "defenderId": f.b, "result": "SHUTDOWN" }]
            })),
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        let matchups = body["result"]["matchups"].as_array().unwrap();
        assert_eq!(matchups.len(), 1);
        assert_eq!(matchups[0]["result"], "SHUTDOWN");
        assert_eq!(stats_of(&f.app, f.owner, f.game_id, f.b).await, (0, 0, 0));
    }

    #[tokio::test]
    async fn should_move_game_to_in_progress_on_first_point() {
        let f = fixture().await;

        create_point(&f.app, f.owner, f.game_id, false, &[f.a]).await;

        let (_, body) = call(&f.app, "GET", &format!("/api/games/{}", f.game_id), Some(f.owner), None).await;
        assert_eq!(body["result"]["game"]["status"], "IN_PROGRESS");
    }
}

mod matchup_update {
    use super::*;
    use serde_json::Value;
    use tokio::sync::broadcast::error::TryRecvError;

    #[tokio::test]
    async fn should_reassign_defender_without_recomputing_stats() {
        // Arrange
        let f = fixture().await;
        let player = add_player(&f.app, f.owner, f.game_id, "Jordan").await;
        let (_, body) = call(
            &f.app,
            "POST",
            "/api/points",
            Some(f.owner),
            Some(json!({
                "gameId": f.game_id,
                "gotBreak": true,
                "selectedDefenderIds": [f.a],
                "matchups": [{ "offensivePlayerId": player, "defenderId": f.a }]
            })),
        )
        .await;
        let matchup_id = body["result"]["matchups"][0]["matchupId"].as_i64().unwrap();
        let (mut rx, _) = f.app.state.relay.subscribe(f.game_id);

        // Act
        let (status, body) = call(
            &f.app,
            "PUT",
            &format!("/api/points/matchups/{}", matchup_id),
            Some(f.owner),
            Some(json!({ "defenderId": f.b, "result": "CONTAINED", "isActive": true })),
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["defenderId"], f.b);
        assert_eq!(body["result"]["result"], "CONTAINED");
        assert_eq!(stats_of(&f.app, f.owner, f.game_id, f.a).await, (1, 1, 0));

        let (_, detail) = call(&f.app, "GET", &format!("/api/games/{}", f.game_id), Some(f.owner), None).await;
        let has_b_row = detail["result"]["defenderStats"]
            .as_array()
            .unwrap()
            .iter()
            .any(|s| s["defenderId"] == f.b);
        assert!(!has_b_row);

        let mut names = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(frame) => {
                    let msg: Value = serde_json::from_str(&frame.text).unwrap();
                    names.push(msg["event"]["name"].as_str().unwrap().to_string());
                }
                Err(TryRecvError::Empty) => break,
                Err(e) => panic!("relay receive failed: {:?}", e),
            }
        }
        assert_eq!(names, vec!["matchup-updated".to_string()]);
    }

    #[tokio::test]
    async fn should_return_404_for_unknown_matchup() {
        let f = fixture().await;

        let (status, body) = call(
            &f.app,
            "PUT",
            "/api/points/matchups/9999",
            Some(f.owner),
            Some(json!({ "defenderId": null, "result": "NEUTRAL", "isActive": false })),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "COMMON404");
    }
}
