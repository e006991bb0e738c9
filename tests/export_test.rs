//! 통계/내보내기 테스트
//!
//! 테스트 대상:
//! - GET /api/export/games/{game_id}?format=json|csv
//! - GET /api/export/teams/{team_id}/stats
//! - GET /api/defenders/{defender_id}/stats

mod common;

use axum::http::{header, StatusCode};
use serde_json::json;

use common::*;

#[tokio::test]
async fn should_export_csv_with_one_row_per_matchup() {
    // Arrange
    let app = setup().await;
    let owner = seed_user(&app, "stats").await;
    let team_id = seed_team(&app, owner, "Ironside").await;
    let alex = seed_defender(&app, team_id, "Alex").await;
    let game = create_game(&app, owner, team_id, false).await;
    let game_id = game["gameId"].as_i64().unwrap();
    let jordan = add_player(&app, owner, game_id, "Jordan").await;
    let sam = add_player(&app, owner, game_id, "Sam").await;

    call(
        &app,
        "POST",
        "/api/points",
        Some(owner),
        Some(json!({
            "gameId": game_id,
            "gotBreak": true,
            "windSpeed": 12,
            "notes": "force flick, then \"cup\"",
            "selectedDefenderIds": [alex],
            "matchups": [
                { "offensivePlayerId": jordan, "defenderId": alex, "result": "SHUTDOWN" },
                { "offensivePlayerId": sam }
            ]
        })),
    )
    .await;
    create_point(&app, owner, game_id, false, &[]).await;

    // Act
    let (status, headers, body) = call_raw(
        &app,
        "GET",
        &format!("/api/export/games/{}?format=csv", game_id),
        Some(owner),
        None,
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/csv"));
    assert!(headers[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .contains(".csv"));

    let lines: Vec<&str> = body.split("\r\n").filter(|l| !l.is_empty()).collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(
        lines[0],
        "Game,Opponent,Location,Date,Point #,Got Break,Wind Speed,Wind Direction,Offensive Player,Position,Defender,Result,Notes"
    );
    assert_eq!(
        lines[1],
        "Pool Play Round 1,Sockeye,Field 3,2026-05-01,1,Yes,12,,Jordan,Handler,Alex,Shutdown,\"force flick, then \"\"cup\"\"\""
    );
    assert!(lines[2].contains(",Sam,Handler,,Neutral,"));
    assert_eq!(
        lines[3],
        "Pool Play Round 1,Sockeye,Field 3,2026-05-01,2,No,,,,,,,"
    );
}

#[tokio::test]
async fn should_export_json_with_statistics() {
    // Arrange
    let app = setup().await;
    let owner = seed_user(&app, "stats").await;
    let team_id = seed_team(&app, owner, "Ironside").await;
    let a = seed_defender(&app, team_id, "Alex").await;
    let b = seed_defender(&app, team_id, "Blair").await;
    seed_defender(&app, team_id, "Bench").await;
    let game = create_game(&app, owner, team_id, false).await;
    let game_id = game["gameId"].as_i64().unwrap();
    create_point(&app, owner, game_id, true, &[a, b]).await;
    create_point(&app, owner, game_id, false, &[a]).await;

    // Act
    let (status, body) = call(
        &app,
        "GET",
        &format!("/api/export/games/{}", game_id),
        Some(owner),
        None,
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    let stats = &body["result"]["statistics"];
    assert_eq!(stats["totals"]["points"], 2);
    assert_eq!(stats["totals"]["breakPercentage"], 50);

    let defenders = stats["defenders"].as_array().unwrap();
    assert_eq!(defenders.len(), 2);
    assert_eq!(defenders[0]["defenderId"], a);
    assert_eq!(defenders[0]["pointsPlayed"], 2);
    assert_eq!(defenders[0]["breakPercentageLabel"], "50%");
    assert_eq!(defenders[1]["defenderId"], b);
    assert_eq!(defenders[1]["breakPercentage"], 100);
    assert_eq!(body["result"]["game"]["points"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn should_sum_team_stats_across_games() {
    // Arrange
    let app = setup().await;
    let owner = seed_user(&app, "stats").await;
    let team_id = seed_team(&app, owner, "Ironside").await;
    let a = seed_defender(&app, team_id, "Alex").await;
    let idle = seed_defender(&app, team_id, "Idle").await;
    let first = create_game(&app, owner, team_id, false).await["gameId"].as_i64().unwrap();
    let second = create_game(&app, owner, team_id, false).await["gameId"].as_i64().unwrap();
    create_point(&app, owner, first, true, &[a]).await;
    create_point(&app, owner, second, true, &[a]).await;
    create_point(&app, owner, second, false, &[a]).await;

    // Act
    let (status, body) = call(
        &app,
        "GET",
        &format!("/api/export/teams/{}/stats", team_id),
        Some(owner),
        None,
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["games"], 2);
    let defenders = body["result"]["defenders"].as_array().unwrap();
    let alex = defenders.iter().find(|d| d["defenderId"] == a).unwrap();
    assert_eq!(alex["pointsPlayed"], 3);
    assert_eq!(alex["breaks"], 2);
    assert_eq!(alex["breakPercentage"], 67);
    let idle = defenders.iter().find(|d| d["defenderId"] == idle).unwrap();
    assert_eq!(idle["breakPercentage"], 0);
    assert_eq!(idle["breakPercentageLabel"], "N/A");
}

#[tokio::test]
async fn should_report_stored_stats_per_game_for_defender() {
    let app = setup().await;
    let owner = seed_user(&app, "stats").await;
    let team_id = seed_team(&app, owner, "Ironside").await;
    let a = seed_defender(&app, team_id, "Alex").await;
    let game_id = create_game(&app, owner, team_id, false).await["gameId"].as_i64().unwrap();
    create_point(&app, owner, game_id, false, &[a]).await;

    let (status, body) = call(
        &app,
        "GET",
        &format!("/api/defenders/{}/stats", a),
        Some(owner),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let games = body["result"]["games"].as_array().unwrap();
    assert_eq!(games.len(), 1);
    assert_eq!(games[0]["pointsPlayed"], 1);
    assert_eq!(games[0]["noBreaks"], 1);
    assert_eq!(games[0]["breakPercentage"], 0);
}

#[tokio::test]
async fn should_reject_unknown_export_format() {
    let app = setup().await;
    let owner = seed_user(&app, "stats").await;
    let team_id = seed_team(&app, owner, "Ironside").await;
    let game_id = create_game(&app, owner, team_id, false).await["gameId"].as_i64().unwrap();

    let (status, _, _) = call_raw(
        &app,
        "GET",
        &format!("/api/export/games/{}?format=pdf", game_id),
        Some(owner),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
