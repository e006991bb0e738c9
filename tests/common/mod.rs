//! 통합 테스트 공용 헬퍼
//!
//! 인메모리 SQLite 위에 라우터를 띄우고, 엔티티를 직접 넣어 시드 데이터를 만듭니다.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use chrono::Utc;
use http_body_util::BodyExt;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::{json, Value};
use tower::ServiceExt;

use matchup_server::config::{establish_connection, AppConfig};
use matchup_server::domain::defender::entity::defender;
use matchup_server::domain::team::entity::team;
use matchup_server::domain::team::entity::team_member::{self, TeamRole};
use matchup_server::domain::user::entity::user;
use matchup_server::utils::jwt::encode_token;
use matchup_server::{create_router, AppState};

pub const TEST_SECRET: &str = "test-secret-key";

pub struct TestApp {
    pub state: AppState,
    pub router: Router,
}

pub async fn setup() -> TestApp {
    let config = AppConfig::for_test(TEST_SECRET);
    let db = establish_connection(&config.database_url, true)
        .await
        .expect("in-memory sqlite");
    let state = AppState::new(db, config);
    let router = create_router(state.clone());
    TestApp { state, router }
}

pub fn token(user_id: i64) -> String {
    encode_token(user_id.to_string(), TEST_SECRET, 3600).expect("token")
}

// ===== Seed =====

pub async fn seed_user(app: &TestApp, username: &str) -> i64 {
    let now = Utc::now().naive_utc();
    user::ActiveModel {
        username: Set(username.to_string()),
        email: Set(format!("{}@example.com", username)),
        password_hash: Set("not-a-real-hash".to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&app.state.db)
    .await
    .expect("seed user")
    .user_id
}

/// 팀을 만들고 `owner_id`를 OWNER로 등록
pub async fn seed_team(app: &TestApp, owner_id: i64, name: &str) -> i64 {
    let now = Utc::now().naive_utc();
    let created = team::ActiveModel {
        name: Set(name.to_string()),
        slug: Set(format!("{}-{}", name.to_lowercase(), owner_id)),
        invite_code: Set(format!("INV{:05}", owner_id)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&app.state.db)
    .await
    .expect("seed team");

    add_member(app, created.team_id, owner_id, TeamRole::Owner).await;
    created.team_id
}

pub async fn add_member(app: &TestApp, team_id: i64, user_id: i64, role: TeamRole) {
    team_member::ActiveModel {
        user_id: Set(user_id),
        team_id: Set(team_id),
        role: Set(role),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(&app.state.db)
    .await
    .expect("seed member");
}

pub async fn seed_defender(app: &TestApp, team_id: i64, name: &str) -> i64 {
    let now = Utc::now().naive_utc();
    defender::ActiveModel {
        team_id: Set(team_id),
        name: Set(name.to_string()),
        jersey_number: Set(None),
        position: Set(None),
        notes: Set(None),
        active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&app.state.db)
    .await
    .expect("seed defender")
    .defender_id
}

/// API로 게임 생성 후 result 반환
pub async fn create_game(app: &TestApp, user_id: i64, team_id: i64, is_public: bool) -> Value {
    let (status, body) = call(
        app,
        "POST",
        "/api/games",
        Some(user_id),
        Some(json!({
            "teamId": team_id,
            "name": "Pool Play Round 1",
            "opponent": "Sockeye",
            "location": "Field 3",
            "gameDate": "2026-05-01T10:00:00",
            "isPublic": is_public
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create game failed: {}", body);
    body["result"].clone()
}

pub async fn add_player(app: &TestApp, user_id: i64, game_id: i64, name: &str) -> i64 {
    let (status, body) = call(
        app,
        "POST",
        &format!("/api/games/{}/players", game_id),
        Some(user_id),
        Some(json!({ "name": name, "position": "HANDLER" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "add player failed: {}", body);
    body["result"]["offensivePlayerId"].as_i64().expect("player id")
}

pub async fn create_point(
    app: &TestApp,
    user_id: i64,
    game_id: i64,
    got_break: bool,
    defender_ids: &[i64],
) -> Value {
    let (status, body) = call(
        app,
        "POST",
        "/api/points",
        Some(user_id),
        Some(json!({
            "gameId": game_id,
            "gotBreak": got_break,
            "selectedDefenderIds": defender_ids,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create point failed: {}", body);
    body["result"].clone()
}

// ===== HTTP =====

pub fn request(method: &str, uri: &str, user_id: Option<i64>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user_id) = user_id {
        builder = builder.header("Authorization", format!("Bearer {}", token(user_id)));
    }
    match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn call(
    app: &TestApp,
    method: &str,
    uri: &str,
    user_id: Option<i64>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let (status, _, text) = call_raw(app, method, uri, user_id, body).await;
    let json = if text.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    };
    (status, json)
}

pub async fn call_raw(
    app: &TestApp,
    method: &str,
    uri: &str,
    user_id: Option<i64>,
    body: Option<Value>,
) -> (StatusCode, HeaderMap, String) {
    let response = app
        .router
        .clone()
        .oneshot(request(method, uri, user_id, body))
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, String::from_utf8_lossy(&bytes).into_owned())
}

/// 게임 상세의 defenderStats에서 (출전, 브레이크, 노브레이크). 행이 없으면 0.
pub async fn stats_of(app: &TestApp, user_id: i64, game_id: i64, defender_id: i64) -> (i64, i64, i64) {
    let (_, body) = call(app, "GET", &format!("/api/games/{}", game_id), Some(user_id), None).await;
    body["result"]["defenderStats"]
        .as_array()
        .expect("defenderStats")
        .iter()
        .find(|s| s["defenderId"] == defender_id)
        .map(|s| {
            (
                s["pointsPlayed"].as_i64().unwrap(),
                s["breaks"].as_i64().unwrap(),
                s["noBreaks"].as_i64().unwrap(),
            )
        })
        .unwrap_or((0, 0, 0))
}
